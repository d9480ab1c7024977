//! **seqgraph** is a sequence graph (variation graph) data structure library.
//!
//! A sequence graph is a bidirected graph whose nodes carry DNA sequences:
//! every node has a *start* and an *end* side, and edges connect sides
//! rather than nodes, so a node can be traversed in either orientation.
//! Graphs of this shape represent genomic variation between many related
//! sequences, with embedded *paths* spelling out the individual genomes as
//! walks over oriented nodes.
//!
//! Two representations of the same logical graph are provided:
//!
//! - [`SeqGraph`] — the dynamic representation: adjacency maps keyed by node
//!   side, freely mutable, the form a graph is built and edited in. This is
//!   where orientation editing lives: node and edge flips, the batched
//!   [`NodeFlipper`]/[`EdgeFlipper`] handles, and whole-graph edge
//!   canonicalization.
//! - [`PackedSeqGraph`] — the packed representation: the entire adjacency
//!   structure plus node and edge payloads in a single integer vector with
//!   rank/select indexing, built from a dynamic graph by a one-way
//!   conversion and immutable afterwards. An embedded coordinate map
//!   ([`coordinate`]) recovers the original node ids.
//!
//! File-format frontends (GFA and friends) are deliberately out of scope;
//! they are plain clients of `add_node`/`add_edge`/`add_path`.
//!
//! # Example
//!
//! ```
//! use seqgraph::{Edge, Link, LinkType, Node, PackedSeqGraph, SeqGraph, Side};
//!
//! let mut graph = SeqGraph::<u64>::new();
//! let a = graph.add_node(Node::new("AC", "a"));
//! let b = graph.add_node(Node::new("TG", "b"));
//! graph.add_edge(Link::new(Side::end(a), Side::start(b)), Edge::default())?;
//!
//! let packed = PackedSeqGraph::<u64>::from_dynamic(&graph);
//! let pa = packed.id_by_coordinate(a);
//! let pb = packed.id_by_coordinate(b);
//! assert_eq!(packed.node_sequence(pa), "AC");
//! assert!(packed.has_link(pa, pb, LinkType::EndStart));
//! # Ok::<(), seqgraph::GraphError>(())
//! ```
//!
//! # Conventions
//!
//! - Node and path ids are positive integers of a caller-chosen width
//!   ([`IdType`], default `u64`); zero means "no such node". In the packed
//!   representation an id doubles as the offset of the node's record, which
//!   makes ids direct traversal handles.
//! - *Ranks* are 1-based dense indices over live nodes (or paths) in
//!   storage order, and every `for_each_*` traversal visits in rank or
//!   insertion order, taking a callback that returns `false` to halt.
//! - All structures are single-threaded; reads may run concurrently only
//!   while no mutation is in flight.

pub mod adj;
pub mod bitvector;
pub mod coordinate;
mod error;
pub mod index;
pub mod packed;
pub mod path;
pub mod prelude;
pub mod props;
pub mod seqgraph;
pub mod side;
pub mod stringset;
mod util;
pub mod visit;

pub use crate::adj::AdjGraph;
pub use crate::error::GraphError;
pub use crate::index::{DefaultIx, IdType};
pub use crate::packed::PackedGraph;
pub use crate::path::{PackedPathSet, Path, PathSet, Step};
pub use crate::props::{Edge, Node};
pub use crate::seqgraph::packed::PackedSeqGraph;
pub use crate::seqgraph::{EdgeFlipper, NodeFlipper, SeqGraph};
pub use crate::side::{for_each_side, Link, LinkType, Side, SideTag};
