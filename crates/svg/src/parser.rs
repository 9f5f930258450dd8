//! Tokenizer for SVG path data (the `d` attribute).

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Offset {offset}: Expected number, got {src:?}.")]
    Number { src: String, offset: usize },
    #[error("Offset {offset}: Expected flag (0/1), got {src:?}.")]
    Flag { src: char, offset: usize },
    #[error("Offset {offset}: Invalid command {command:?}.")]
    Command { command: char, offset: usize },
    #[error("Offset {offset}: Expected move-to command, got {command:?}.")]
    MissingMoveTo { command: char, offset: usize },
    #[error("Offset {offset}: Missing arguments for command {command:?}.")]
    MissingArguments { command: char, offset: usize },
}

impl ParseError {
    /// Character offset in the source where the problem was detected.
    pub fn offset(&self) -> usize {
        match *self {
            ParseError::Number { offset, .. }
            | ParseError::Flag { offset, .. }
            | ParseError::Command { offset, .. }
            | ParseError::MissingMoveTo { offset, .. }
            | ParseError::MissingArguments { offset, .. } => offset,
        }
    }
}

/// A path command and its arguments.
///
/// Flags are stored as `0.0` or `1.0`. Repeated argument groups are split into
/// one token each, so that `M 0 0 1 1` produces a `M` token followed by a `L`
/// token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub command: char,
    pub args: Vec<f64>,
    /// Character offset of the command (or of its first argument for implicit
    /// commands).
    pub offset: usize,
}

impl Token {
    #[inline]
    pub fn is_relative(&self) -> bool {
        self.command.is_ascii_lowercase()
    }

    /// Number of arguments the command takes, `None` for unknown commands.
    pub fn arity(command: char) -> Option<usize> {
        match command.to_ascii_uppercase() {
            'M' | 'L' | 'T' => Some(2),
            'H' | 'V' => Some(1),
            'C' => Some(6),
            'S' | 'Q' => Some(4),
            'A' => Some(7),
            'Z' => Some(0),
            _ => None,
        }
    }
}

// A buffered iterator of characters keeping track of the offset.
pub struct Source<Iter> {
    src: Iter,
    current: char,
    offset: usize,
    finished: bool,
}

impl<Iter: Iterator<Item = char>> Source<Iter> {
    pub fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter();

        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };

        Source {
            current,
            finished,
            src,
            offset: 0,
        }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn skip_whitespace(&mut self) {
        while !self.finished && (self.current.is_whitespace() || self.current == ',') {
            self.advance_one();
        }
    }

    fn advance_one(&mut self) {
        if self.finished {
            return;
        }
        self.offset += 1;
        match self.src.next() {
            Some(c) => {
                self.current = c;
            }
            None => {
                self.current = '~';
                self.finished = true;
            }
        }
    }
}

/// Splits path data into tokens.
#[derive(Debug, Default)]
pub struct PathParser {
    float_buffer: String,
}

impl PathParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize the whole source.
    ///
    /// The first command must be a move-to. Any error aborts the parse.
    pub fn parse<Iter>(&mut self, src: &mut Source<Iter>) -> Result<Vec<Token>, ParseError>
    where
        Iter: Iterator<Item = char>,
    {
        let mut tokens = Vec::new();
        let mut implicit_cmd = None;

        src.skip_whitespace();

        while !src.finished {
            let offset = src.offset;
            let explicit = src.current.is_ascii_alphabetic();
            let cmd = if explicit {
                let cmd = src.current;
                src.advance_one();
                cmd
            } else {
                match implicit_cmd {
                    Some(cmd) => cmd,
                    None if tokens.is_empty() => {
                        return Err(ParseError::MissingMoveTo {
                            command: src.current,
                            offset,
                        });
                    }
                    None => {
                        return Err(ParseError::Command {
                            command: src.current,
                            offset,
                        });
                    }
                }
            };

            let arity = match Token::arity(cmd) {
                Some(arity) => arity,
                None => {
                    return Err(ParseError::Command {
                        command: cmd,
                        offset,
                    });
                }
            };

            if tokens.is_empty() && cmd != 'M' && cmd != 'm' {
                return Err(ParseError::MissingMoveTo {
                    command: cmd,
                    offset,
                });
            }

            let mut args = Vec::with_capacity(arity);
            for i in 0..arity {
                src.skip_whitespace();
                if src.finished || src.current.is_ascii_alphabetic() {
                    return Err(ParseError::MissingArguments {
                        command: cmd,
                        offset: src.offset,
                    });
                }

                let is_flag = cmd.eq_ignore_ascii_case(&'A') && (i == 3 || i == 4);
                let value = if is_flag {
                    self.parse_flag(src)?
                } else {
                    self.parse_number(src)?
                };
                args.push(value);
            }

            tokens.push(Token {
                command: cmd,
                args,
                offset,
            });

            implicit_cmd = match cmd {
                'm' => Some('l'),
                'M' => Some('L'),
                'z' | 'Z' => None,
                c => Some(c),
            };

            src.skip_whitespace();
        }

        Ok(tokens)
    }

    fn parse_number(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f64, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        let offset = src.offset;

        if src.current == '-' || src.current == '+' {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        while !src.finished && src.current.is_ascii_digit() {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        if !src.finished && src.current == '.' {
            self.float_buffer.push('.');
            src.advance_one();

            while !src.finished && src.current.is_ascii_digit() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        if !src.finished && (src.current == 'e' || src.current == 'E') {
            self.float_buffer.push(src.current);
            src.advance_one();

            if src.current == '-' || src.current == '+' {
                self.float_buffer.push(src.current);
                src.advance_one();
            }

            while !src.finished && src.current.is_ascii_digit() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        match self.float_buffer.parse::<f64>() {
            Ok(val) => Ok(val),
            Err(_) => {
                if self.float_buffer.is_empty() && !src.finished {
                    self.float_buffer.push(src.current);
                }
                Err(ParseError::Number {
                    src: std::mem::take(&mut self.float_buffer),
                    offset,
                })
            }
        }
    }

    // Flags are a single digit and don't need a separator: "a1 1 0 01 5 5".
    fn parse_flag(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f64, ParseError> {
        src.skip_whitespace();
        match src.current {
            '1' if !src.finished => {
                src.advance_one();
                Ok(1.0)
            }
            '0' if !src.finished => {
                src.advance_one();
                Ok(0.0)
            }
            _ => Err(ParseError::Flag {
                src: src.current,
                offset: src.offset,
            }),
        }
    }
}

/// Tokenize SVG path data.
pub fn parse_path_data(src: &str) -> Result<Vec<Token>, ParseError> {
    PathParser::new().parse(&mut Source::new(src.chars()))
}

#[cfg(test)]
fn commands(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.command).collect()
}

#[test]
fn empty() {
    assert_eq!(parse_path_data(""), Ok(vec![]));
    assert_eq!(parse_path_data("  \n "), Ok(vec![]));
}

#[test]
fn simple_square() {
    let tokens = parse_path_data("M 0 0 L 1 0 L 1 1 L 0 1 Z").unwrap();
    assert_eq!(commands(&tokens), "MLLLZ");
    assert_eq!(tokens[2].args, vec![1.0, 1.0]);
    assert_eq!(tokens[4].args, Vec::<f64>::new());
}

#[test]
fn implicit_commands() {
    let tokens = parse_path_data("m 1 2 3 4 5 6 M 0 0 1 1 L 1 2 3 4").unwrap();
    assert_eq!(commands(&tokens), "mllMLLL");
    assert_eq!(tokens[2].args, vec![5.0, 6.0]);
    assert!(tokens[1].is_relative());
    assert!(!tokens[4].is_relative());
}

#[test]
fn compact_numbers() {
    let tokens = parse_path_data("M.5.5-1-2e1L+3,1e-1").unwrap();
    assert_eq!(commands(&tokens), "MLL");
    assert_eq!(tokens[0].args, vec![0.5, 0.5]);
    assert_eq!(tokens[1].args, vec![-1.0, -20.0]);
    assert_eq!(tokens[2].args, vec![3.0, 0.1]);
}

#[test]
fn arc_flags() {
    let tokens = parse_path_data("M0 0a25 26 -30 0110 20A1 1 0 1 0 5 5").unwrap();
    assert_eq!(commands(&tokens), "MaA");
    assert_eq!(tokens[1].args, vec![25.0, 26.0, -30.0, 0.0, 1.0, 10.0, 20.0]);
    assert_eq!(tokens[2].args, vec![1.0, 1.0, 0.0, 1.0, 0.0, 5.0, 5.0]);

    assert_eq!(
        parse_path_data("M0 0 A1 1 0 2 0 5 5"),
        Err(ParseError::Flag { src: '2', offset: 13 })
    );
}

#[test]
fn errors_carry_offsets() {
    assert_eq!(
        parse_path_data("L 1 1"),
        Err(ParseError::MissingMoveTo {
            command: 'L',
            offset: 0
        })
    );
    assert_eq!(
        parse_path_data("M 0 0 L 1 #"),
        Err(ParseError::Number {
            src: "#".to_string(),
            offset: 10
        })
    );
    assert_eq!(
        parse_path_data("M 0 0 X 1 1"),
        Err(ParseError::Command {
            command: 'X',
            offset: 6
        })
    );
    assert_eq!(
        parse_path_data("M 0 0 L"),
        Err(ParseError::MissingArguments {
            command: 'L',
            offset: 7
        })
    );
    assert_eq!(
        parse_path_data("M 0 0 C 1 1 2 2 L 1 1"),
        Err(ParseError::MissingArguments {
            command: 'C',
            offset: 16
        })
    );
    assert_eq!(parse_path_data("M 0 0 L 1 #").unwrap_err().offset(), 10);
}

#[test]
fn numbers_after_close() {
    assert_eq!(
        parse_path_data("M 0 0 L 1 1 Z 5 5"),
        Err(ParseError::Command {
            command: '5',
            offset: 14
        })
    );
    // Drawing commands may follow a close without a move-to.
    let tokens = parse_path_data("M 0 0 L 1 1 Z L 5 5").unwrap();
    assert_eq!(commands(&tokens), "MLZL");
}
