//! The anchor arena and its subpaths.

use crate::anchor::{Anchor, Handle, MirrorMode};
use crate::commands::{build_commands, DrawCommand};
use crate::geom::utils::fuzzy_eq_point;
use crate::geom::EPSILON;
use crate::math::{Box2D, Point, Vector};
use crate::winding::compute_winding;
use crate::{AnchorId, SubpathId, Winding};

use std::ops::Index;

/// An ordered sequence of anchors.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Subpath {
    anchors: Vec<AnchorId>,
    closed: bool,
    winding: Option<Winding>,
}

impl Subpath {
    #[inline]
    pub fn anchors(&self) -> &[AnchorId] {
        &self.anchors
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Winding computed when the subpath was closed.
    #[inline]
    pub fn winding(&self) -> Option<Winding> {
        self.winding
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<AnchorId> {
        self.anchors.first().cloned()
    }

    #[inline]
    pub fn last(&self) -> Option<AnchorId> {
        self.anchors.last().cloned()
    }
}

/// Owns the anchors of an editing session.
///
/// Anchors are referred to by `AnchorId`, and grouped into subpaths referred to
/// by `SubpathId`. Slots of removed anchors are recycled, the ids of the other
/// anchors stay valid.
///
/// All mutations go through the path so that each anchor's mirror constraint is
/// restored right after an edit.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path {
    anchors: Vec<Option<Anchor>>,
    free_list: Vec<AnchorId>,
    subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new() -> Self {
        Path {
            anchors: Vec::new(),
            free_list: Vec::new(),
            subpaths: Vec::new(),
        }
    }

    pub fn with_capacity(anchors: usize) -> Self {
        Path {
            anchors: Vec::with_capacity(anchors),
            free_list: Vec::new(),
            subpaths: Vec::new(),
        }
    }

    /// Number of live anchors.
    pub fn num_anchors(&self) -> usize {
        self.anchors.len() - self.free_list.len()
    }

    pub fn num_subpaths(&self) -> usize {
        self.subpaths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_anchors() == 0
    }

    #[inline]
    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.to_usize()).and_then(Option::as_ref)
    }

    #[inline]
    fn get_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.get_mut(id.to_usize()).and_then(Option::as_mut)
    }

    #[inline]
    pub fn subpath(&self, id: SubpathId) -> Option<&Subpath> {
        self.subpaths.get(id.to_usize())
    }

    pub fn subpath_ids(&self) -> impl Iterator<Item = SubpathId> {
        (0..self.subpaths.len()).map(SubpathId::from_usize)
    }

    /// The anchors of a subpath, in order.
    pub fn subpath_anchors(&self, id: SubpathId) -> impl Iterator<Item = &Anchor> + '_ {
        self.subpath(id)
            .map(|sp| sp.anchors.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&a| self.get(a))
    }

    /// The anchors of a subpath that take part in the committed geometry.
    pub fn visible_anchors(&self, id: SubpathId) -> Vec<&Anchor> {
        self.subpath_anchors(id)
            .filter(|anchor| anchor.is_visible())
            .collect()
    }

    fn alloc(&mut self, anchor: Anchor) -> AnchorId {
        match self.free_list.pop() {
            Some(id) => {
                self.anchors[id.to_usize()] = Some(anchor);
                id
            }
            None => {
                self.anchors.push(Some(anchor));
                AnchorId::from_usize(self.anchors.len() - 1)
            }
        }
    }

    fn release(&mut self, id: AnchorId) -> Option<Anchor> {
        let anchor = self.anchors.get_mut(id.to_usize())?.take()?;
        self.free_list.push(id);

        Some(anchor)
    }

    /// Start a new subpath with its first anchor.
    pub fn begin_subpath(&mut self, at: Point) -> (SubpathId, AnchorId) {
        let mut anchor = Anchor::new(at);
        anchor.start = true;
        anchor.end = true;
        let anchor_id = self.alloc(anchor);

        self.subpaths.push(Subpath {
            anchors: vec![anchor_id],
            closed: false,
            winding: None,
        });

        (SubpathId::from_usize(self.subpaths.len() - 1), anchor_id)
    }

    /// Add an anchor at the end of a subpath.
    ///
    /// Returns `None` if the subpath doesn't exist.
    pub fn append_anchor(&mut self, subpath: SubpathId, mut anchor: Anchor) -> Option<AnchorId> {
        let index = subpath.to_usize();
        if index >= self.subpaths.len() {
            return None;
        }

        let previous = self.subpaths[index].last();
        anchor.start = previous.is_none();
        anchor.end = true;
        if let Some(prev) = previous.and_then(|id| self.get_mut(id)) {
            prev.end = false;
        }

        let id = self.alloc(anchor);
        self.subpaths[index].anchors.push(id);

        Some(id)
    }

    /// Remove the last anchor of a subpath and return it.
    pub fn remove_last_anchor(&mut self, subpath: SubpathId) -> Option<Anchor> {
        let id = self.subpaths.get_mut(subpath.to_usize())?.anchors.pop()?;
        if let Some(prev) = self.subpaths[subpath.to_usize()]
            .last()
            .and_then(|id| self.get_mut(id))
        {
            prev.end = true;
        }

        self.release(id)
    }

    /// Set one of an anchor's handles, updating the other one if it is mirrored.
    pub fn set_handle(&mut self, id: AnchorId, handle: Handle, position: Point) -> bool {
        match self.get_mut(id) {
            Some(anchor) => {
                anchor.set_handle(handle, position);
                true
            }
            None => false,
        }
    }

    pub fn delete_handle(&mut self, id: AnchorId, handle: Handle) -> bool {
        match self.get_mut(id) {
            Some(anchor) => {
                anchor.delete_handle(handle);
                true
            }
            None => false,
        }
    }

    /// Move an anchor along with its handles, returning the displacement.
    pub fn move_anchor(&mut self, id: AnchorId, position: Point) -> Option<Vector> {
        self.get_mut(id).map(|anchor| anchor.move_to(position))
    }

    pub fn set_mirror(&mut self, id: AnchorId, mirror: MirrorMode) -> bool {
        match self.get_mut(id) {
            Some(anchor) => {
                anchor.set_mirror(mirror);
                true
            }
            None => false,
        }
    }

    /// Pick the mirror mode matching the anchor's current handles, without
    /// moving them.
    pub fn infer_mirror(&mut self, id: AnchorId) -> Option<MirrorMode> {
        self.get_mut(id).map(Anchor::infer_mirror)
    }

    pub fn set_hidden(&mut self, id: AnchorId, hidden: bool) -> bool {
        match self.get_mut(id) {
            Some(anchor) => {
                anchor.hidden = hidden;
                true
            }
            None => false,
        }
    }

    pub fn set_virtual(&mut self, id: AnchorId, is_virtual: bool) -> bool {
        match self.get_mut(id) {
            Some(anchor) => {
                anchor.is_virtual = is_virtual;
                true
            }
            None => false,
        }
    }

    /// Close a subpath.
    ///
    /// If the last anchor sits on top of the first one it is redundant: its `from`
    /// handle is copied onto the first anchor and it is removed. The first anchor
    /// gets the `closed` flag, its mirror mode is inferred from its handles and
    /// the winding of the subpath is computed.
    ///
    /// Returns the winding, `None` if the subpath doesn't exist or has a null area.
    pub fn close_subpath(&mut self, subpath: SubpathId) -> Option<Winding> {
        let index = subpath.to_usize();
        let first = self.subpaths.get(index)?.first()?;

        if self.subpaths[index].len() > 1 {
            let last = self.subpaths[index].last()?;
            let first_point = self.get(first)?.point;
            let (last_point, last_from, last_arc) = {
                let anchor = self.get(last)?;
                (anchor.point, anchor.from, anchor.arc)
            };

            if fuzzy_eq_point(first_point, last_point, EPSILON) {
                self.remove_last_anchor(subpath);
                if let Some(anchor) = self.get_mut(first) {
                    if last_from.is_some() {
                        anchor.from = last_from;
                    }
                    if last_arc.is_some() {
                        anchor.arc = last_arc;
                    }
                }
            }
        }

        if let Some(anchor) = self.get_mut(first) {
            anchor.closed = true;
            anchor.infer_mirror();
        }

        let winding = compute_winding(self.subpath_anchors(subpath).map(|a| a.point));
        let sp = &mut self.subpaths[index];
        sp.closed = true;
        sp.winding = winding;

        winding
    }

    /// Winding of a subpath's anchor polygon.
    pub fn winding(&self, subpath: SubpathId) -> Option<Winding> {
        compute_winding(self.subpath_anchors(subpath).map(|a| a.point))
    }

    /// The smallest rectangle containing every visible segment of the path.
    pub fn bounding_box(&self) -> Option<Box2D> {
        let mut result: Option<Box2D> = None;
        let mut add = |b: Box2D| {
            result = Some(match result {
                Some(r) => r.union(&b),
                None => b,
            });
        };

        for id in self.subpath_ids() {
            let anchors = self.visible_anchors(id);
            if let Some(first) = anchors.first() {
                add(Box2D {
                    min: first.point,
                    max: first.point,
                });
            }
            for pair in anchors.windows(2) {
                add(pair[0].curve_to(pair[1]).bounding_box());
            }
            let closed = self.subpaths[id.to_usize()].closed;
            if closed && anchors.len() > 1 {
                add(anchors[anchors.len() - 1].curve_to(anchors[0]).bounding_box());
            }
        }

        result
    }

    /// Drawing commands for every subpath, hidden and virtual anchors excluded.
    pub fn build_commands(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        for id in self.subpath_ids() {
            let anchors = self.visible_anchors(id);
            let closed = self.subpaths[id.to_usize()].closed;
            commands.extend(build_commands(&anchors, closed));
        }

        commands
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.anchors.clear();
        self.free_list.clear();
        self.subpaths.clear();
    }
}

impl Index<AnchorId> for Path {
    type Output = Anchor;
    fn index(&self, id: AnchorId) -> &Anchor {
        match self.get(id) {
            Some(anchor) => anchor,
            None => panic!("invalid anchor id {:?}", id),
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn append_and_remove() {
    let mut path = Path::new();
    let (sp, a0) = path.begin_subpath(point(0.0, 0.0));
    let a1 = path.append_anchor(sp, Anchor::new(point(10.0, 0.0))).unwrap();
    let a2 = path.append_anchor(sp, Anchor::new(point(10.0, 10.0))).unwrap();

    assert_eq!(path.num_anchors(), 3);
    assert!(path[a0].start);
    assert!(!path[a0].end);
    assert!(!path[a1].start && !path[a1].end);
    assert!(path[a2].end);

    let removed = path.remove_last_anchor(sp).unwrap();
    assert_eq!(removed.point, point(10.0, 10.0));
    assert!(path[a1].end);
    assert!(path.get(a2).is_none());
    assert_eq!(path.num_anchors(), 2);

    // The freed slot is recycled.
    let a3 = path.append_anchor(sp, Anchor::new(point(0.0, 10.0))).unwrap();
    assert_eq!(a3, a2);
    assert_eq!(path.subpath(sp).unwrap().anchors(), &[a0, a1, a3]);

    assert!(path.append_anchor(SubpathId(12), Anchor::new(point(0.0, 0.0))).is_none());
}

#[test]
fn editing_through_the_arena() {
    let mut path = Path::new();
    let (sp, a0) = path.begin_subpath(point(0.0, 0.0));
    let a1 = path.append_anchor(sp, Anchor::new(point(10.0, 0.0))).unwrap();

    assert!(path.set_mirror(a1, MirrorMode::MirrorAngleAndLength));
    assert!(path.set_handle(a1, Handle::From, point(5.0, 5.0)));
    assert_eq!(path[a1].to, Some(point(15.0, -5.0)));

    assert_eq!(path.move_anchor(a1, point(20.0, 0.0)), Some(Vector::new(10.0, 0.0)));
    assert_eq!(path[a1].from, Some(point(15.0, 5.0)));

    assert!(path.delete_handle(a1, Handle::To));
    assert_eq!(path[a1].mirror, MirrorMode::NoMirror);

    assert!(path.set_hidden(a0, true));
    assert_eq!(path.visible_anchors(sp).len(), 1);
    assert!(path.set_virtual(a0, false));
    assert!(!path.set_hidden(AnchorId(99), true));
}

#[test]
fn closing_drops_coincident_anchor() {
    let mut path = Path::new();
    let (sp, a0) = path.begin_subpath(point(0.0, 0.0));
    path.append_anchor(sp, Anchor::new(point(10.0, 0.0)));
    path.append_anchor(sp, Anchor::new(point(10.0, 10.0)));
    path.append_anchor(
        sp,
        Anchor::with_handles(point(0.0, 0.0), Some(point(0.0, 5.0)), None),
    );

    let winding = path.close_subpath(sp);
    assert_eq!(winding, Some(Winding::Positive));

    let subpath = path.subpath(sp).unwrap();
    assert!(subpath.is_closed());
    assert_eq!(subpath.len(), 3);
    assert_eq!(path[a0].from, Some(point(0.0, 5.0)));
    assert!(path[a0].closed);
}

#[test]
fn closing_keeps_distinct_anchor() {
    let mut path = Path::new();
    let (sp, _) = path.begin_subpath(point(0.0, 0.0));
    path.append_anchor(sp, Anchor::new(point(0.0, 10.0)));
    path.append_anchor(sp, Anchor::new(point(10.0, 10.0)));

    assert_eq!(path.close_subpath(sp), Some(Winding::Negative));
    assert_eq!(path.subpath(sp).unwrap().len(), 3);
    assert_eq!(path.winding(sp), Some(Winding::Negative));
}

#[test]
fn bounding_box_covers_curves() {
    let mut path = Path::new();
    let (sp, a0) = path.begin_subpath(point(0.0, 0.0));
    path.set_handle(a0, Handle::To, point(0.0, 100.0));
    path.append_anchor(
        sp,
        Anchor::with_handles(point(100.0, 0.0), Some(point(100.0, 100.0)), None),
    );

    let bb = path.bounding_box().unwrap();
    assert_eq!(bb.min, point(0.0, 0.0));
    assert!((bb.max.x - 100.0).abs() < 1e-9);
    assert!((bb.max.y - 75.0).abs() < 1e-9);

    assert!(Path::new().bounding_box().is_none());
}
