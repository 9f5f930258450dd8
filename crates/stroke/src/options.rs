use quill_path::{LineCap, LineJoin, Stroke};

/// Parameters of the outline builder.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct OutlineOptions {
    /// Distance between the centerline and each rail, half of the stroke
    /// thickness.
    ///
    /// Default value: `OutlineOptions::DEFAULT_WIDTH`.
    pub width: f64,

    /// What cap to use at the start of each open subpath.
    ///
    /// Default value: `LineCap::Butt`.
    pub start_cap: LineCap,

    /// What cap to use at the end of each open subpath.
    ///
    /// Default value: `LineCap::Butt`.
    pub end_cap: LineCap,

    /// How rails are connected where they don't intersect.
    ///
    /// Default value: `LineJoin::Miter`.
    pub line_join: LineJoin,

    /// Maximum ratio between the miter length and the width.
    ///
    /// Must be greater than or equal to 1.0.
    /// Default value: `OutlineOptions::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f64,

    /// Maximum distance between an offset curve and the exact offset.
    ///
    /// Default value: `OutlineOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f64,

    /// Share of each rail, next to a joint, in which rail intersections are
    /// looked for before falling back to a join.
    ///
    /// Default value: `OutlineOptions::DEFAULT_TRIM_SEARCH_FRACTION`.
    pub trim_search_fraction: f64,
}

impl OutlineOptions {
    pub const MINIMUM_MITER_LIMIT: f64 = 1.0;
    pub const DEFAULT_MITER_LIMIT: f64 = 4.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_WIDTH: f64 = 0.5;
    pub const DEFAULT_TOLERANCE: f64 = 0.1;
    pub const DEFAULT_TRIM_SEARCH_FRACTION: f64 = 0.5;

    pub const DEFAULT: Self = OutlineOptions {
        width: Self::DEFAULT_WIDTH,
        start_cap: Self::DEFAULT_LINE_CAP,
        end_cap: Self::DEFAULT_LINE_CAP,
        line_join: Self::DEFAULT_LINE_JOIN,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        tolerance: Self::DEFAULT_TOLERANCE,
        trim_search_fraction: Self::DEFAULT_TRIM_SEARCH_FRACTION,
    };

    /// Options matching the stroke of a layer.
    ///
    /// The stroke's width is a full thickness and is halved.
    pub fn from_stroke(stroke: &Stroke) -> Self {
        Self::DEFAULT
            .with_width(stroke.width * 0.5)
            .with_start_cap(stroke.start_cap)
            .with_end_cap(stroke.end_cap)
            .with_line_join(stroke.join)
    }

    #[inline]
    pub fn width(width: f64) -> Self {
        Self::DEFAULT.with_width(width)
    }

    #[inline]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_start_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self
    }

    #[inline]
    pub const fn with_end_cap(mut self, cap: LineCap) -> Self {
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    /// Values below `MINIMUM_MITER_LIMIT` are raised to it.
    #[inline]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit.max(Self::MINIMUM_MITER_LIMIT);
        self
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_trim_search_fraction(mut self, fraction: f64) -> Self {
        self.trim_search_fraction = fraction;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn options_from_stroke() {
    let stroke = Stroke::new("black", 4.0)
        .with_caps(LineCap::Round)
        .with_join(LineJoin::Bevel);
    let options = OutlineOptions::from_stroke(&stroke);
    assert_eq!(options.width, 2.0);
    assert_eq!(options.start_cap, LineCap::Round);
    assert_eq!(options.end_cap, LineCap::Round);
    assert_eq!(options.line_join, LineJoin::Bevel);
    assert_eq!(options.miter_limit, OutlineOptions::DEFAULT_MITER_LIMIT);

    assert_eq!(OutlineOptions::DEFAULT.with_miter_limit(0.2).miter_limit, 1.0);
}
