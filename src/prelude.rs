//! Commonly used items.
//!
//! ```
//! use seqgraph::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::error::GraphError;
#[doc(no_inline)]
pub use crate::index::{DefaultIx, IdType};
#[doc(no_inline)]
pub use crate::props::{Edge, Node};
#[doc(no_inline)]
pub use crate::seqgraph::packed::PackedSeqGraph;
#[doc(no_inline)]
pub use crate::seqgraph::{EdgeFlipper, NodeFlipper, SeqGraph};
#[doc(no_inline)]
pub use crate::side::{for_each_side, Link, LinkType, Side, SideTag};
#[doc(no_inline)]
pub use crate::visit::{GraphBase, NodeRanked, SideEdges};
