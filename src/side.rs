//! Node sides and the link algebra of bidirected graphs.
//!
//! In a bidirected graph every node has two sides and an edge connects a
//! *side* of one node to a *side* of another, so each edge has one of four
//! orientations. A [`Side`] names one endpoint, a [`Link`] is an ordered pair
//! of sides, and a [`LinkType`] encodes the orientation of a link compactly:
//!
//! | from  | to    | type |
//! |-------|-------|------|
//! | start | start | 0    |
//! | start | end   | 1    |
//! | end   | start | 2    |
//! | end   | end   | 3    |
//!
//! The directed degenerate case collapses both sides into one: only type `0`
//! is valid there and every from-start/to-end query answers `false`. No store
//! in this crate instantiates it; the algebra below is the bidirected one.

use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::IdType;

/// Which of a node's two sides an endpoint refers to.
///
/// `Start` is the side entered when the node's sequence is read forward;
/// `End` is the side left when it is read forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SideTag {
    Start = 0,
    End = 1,
}

impl SideTag {
    /// The other side of the same node.
    #[inline]
    pub fn opposite(self) -> SideTag {
        match self {
            SideTag::Start => SideTag::End,
            SideTag::End => SideTag::Start,
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// One of the two endpoints of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Side<Ix> {
    id: Ix,
    tag: SideTag,
}

impl<Ix: IdType> Side<Ix> {
    #[inline]
    pub fn new(id: Ix, tag: SideTag) -> Self {
        Side { id, tag }
    }

    /// The start side of node `id`.
    #[inline]
    pub fn start(id: Ix) -> Self {
        Side {
            id,
            tag: SideTag::Start,
        }
    }

    /// The end side of node `id`.
    #[inline]
    pub fn end(id: Ix) -> Self {
        Side {
            id,
            tag: SideTag::End,
        }
    }

    #[inline]
    pub fn id(self) -> Ix {
        self.id
    }

    #[inline]
    pub fn tag(self) -> SideTag {
        self.tag
    }

    #[inline]
    pub fn is_start(self) -> bool {
        self.tag == SideTag::Start
    }

    #[inline]
    pub fn is_end(self) -> bool {
        self.tag == SideTag::End
    }

    /// The opposite side of the same node.
    #[inline]
    pub fn opposite(self) -> Self {
        Side {
            id: self.id,
            tag: self.tag.opposite(),
        }
    }

    /// Replace the side's tag by its opposite in place.
    #[inline]
    pub(crate) fn flip_tag(&mut self) {
        self.tag = self.tag.opposite();
    }
}

// The tag is folded into the id hash (complemented for `End`) so that the two
// sides of a node land in unrelated buckets of a side-keyed table.
impl<Ix: IdType> Hash for Side<Ix> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let h = self.id.index() as u64;
        state.write_u64(match self.tag {
            SideTag::Start => h,
            SideTag::End => !h,
        });
    }
}

/// Call `f` on the start side and then the end side of node `id`, stopping
/// early when `f` returns `false`.
///
/// Returns `false` iff the iteration was interrupted.
#[inline]
pub fn for_each_side<Ix, F>(id: Ix, mut f: F) -> bool
where
    Ix: IdType,
    F: FnMut(Side<Ix>) -> bool,
{
    f(Side::start(id)) && f(Side::end(id))
}

/// Compact encoding of a link's orientation: `from_tag * 2 + to_tag`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum LinkType {
    StartStart = 0,
    StartEnd = 1,
    EndStart = 2,
    EndEnd = 3,
}

impl LinkType {
    /// The canonical orientation: out of the end side, into the start side.
    pub const DEFAULT: LinkType = LinkType::EndStart;

    /// Decode an integer link type. `None` for values outside `0..=3`.
    #[inline]
    pub fn from_index(value: u8) -> Option<LinkType> {
        match value {
            0 => Some(LinkType::StartStart),
            1 => Some(LinkType::StartEnd),
            2 => Some(LinkType::EndStart),
            3 => Some(LinkType::EndEnd),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The orientation of the link from `from` to `to`.
    #[inline]
    pub fn of<Ix: IdType>(from: Side<Ix>, to: Side<Ix>) -> LinkType {
        Self::between(from.tag(), to.tag())
    }

    #[inline]
    pub fn between(from: SideTag, to: SideTag) -> LinkType {
        // from * 2 + to, bit-exact
        match Self::from_index((from.index() << 1) | to.index()) {
            Some(t) => t,
            None => unreachable!(),
        }
    }

    /// Tag of the from-side encoded in the type.
    #[inline]
    pub fn from_tag(self) -> SideTag {
        if self.index() >> 1 == 0 {
            SideTag::Start
        } else {
            SideTag::End
        }
    }

    /// Tag of the to-side encoded in the type.
    #[inline]
    pub fn to_tag(self) -> SideTag {
        if self.index() & 1 == 0 {
            SideTag::Start
        } else {
            SideTag::End
        }
    }

    #[inline]
    pub fn is_from_start(self) -> bool {
        self.from_tag() == SideTag::Start
    }

    #[inline]
    pub fn is_to_end(self) -> bool {
        self.to_tag() == SideTag::End
    }

    /// `true` if a link of this type can leave the side `from`.
    #[inline]
    pub fn is_valid_from<Ix: IdType>(self, from: Side<Ix>) -> bool {
        from.tag() == self.from_tag()
    }

    /// `true` if a link of this type can enter the side `to`.
    #[inline]
    pub fn is_valid_to<Ix: IdType>(self, to: Side<Ix>) -> bool {
        to.tag() == self.to_tag()
    }
}

/// An ordered pair of sides; the edge from `from` to `to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link<Ix> {
    from: Side<Ix>,
    to: Side<Ix>,
}

impl<Ix: IdType> Link<Ix> {
    #[inline]
    pub fn new(from: Side<Ix>, to: Side<Ix>) -> Self {
        Link { from, to }
    }

    /// Build a link from its endpoint ids and orientation.
    #[inline]
    pub fn from_parts(from_id: Ix, to_id: Ix, ty: LinkType) -> Self {
        Link {
            from: Side::new(from_id, ty.from_tag()),
            to: Side::new(to_id, ty.to_tag()),
        }
    }

    #[inline]
    pub fn from(self) -> Side<Ix> {
        self.from
    }

    #[inline]
    pub fn to(self) -> Side<Ix> {
        self.to
    }

    #[inline]
    pub fn from_id(self) -> Ix {
        self.from.id()
    }

    #[inline]
    pub fn to_id(self) -> Ix {
        self.to.id()
    }

    #[inline]
    pub fn link_type(self) -> LinkType {
        LinkType::of(self.from, self.to)
    }

    /// The same edge traversed the other way round.
    #[inline]
    pub fn reversed(self) -> Self {
        Link {
            from: self.to,
            to: self.from,
        }
    }
}

// Only the endpoint ids are folded into the hash. Orientation-rewriting
// transformations move payloads between links that differ in their side tags
// alone, and those keys must collide rather than scatter.
impl<Ix: IdType> Hash for Link<Ix> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let from = self.from.id().index() as u64;
        let to = self.to.id().index() as u64;
        state.write_u64(from.wrapping_add(to));
    }
}
