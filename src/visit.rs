//! Read-only traits shared by the dynamic and packed representations.
//!
//! The two stores are distinct concrete types; these traits cover the query
//! surface they have in common so that generic code — invariant checks,
//! traversals, round-trip tests — can run against either. All iteration
//! follows the crate-wide callback convention: the callback returns `false`
//! to halt, and the traversal returns `false` iff it was halted.

use crate::adj::AdjGraph;
use crate::coordinate::Coordinate;
use crate::index::IdType;
use crate::packed::PackedGraph;
use crate::seqgraph::packed::PackedSeqGraph;
use crate::seqgraph::SeqGraph;
use crate::side::{Link, LinkType, Side};

/// Base queries every graph representation answers.
pub trait GraphBase {
    type Ix: IdType;

    fn node_count(&self) -> usize;
    fn edge_count(&self) -> usize;
}

/// Rank-ordered node access.
pub trait NodeRanked: GraphBase {
    fn has_node(&self, id: Self::Ix) -> bool;
    /// Rank of a node; 0 when absent in the dynamic store, while packed
    /// stores require the id to be live.
    fn id_to_rank(&self, id: Self::Ix) -> usize;
    fn rank_to_id(&self, rank: usize) -> Self::Ix;
    fn successor_id(&self, id: Self::Ix) -> Self::Ix;

    fn for_each_node_from<F>(&self, rank: usize, f: F) -> bool
    where
        F: FnMut(usize, Self::Ix) -> bool;

    fn for_each_node<F>(&self, f: F) -> bool
    where
        F: FnMut(usize, Self::Ix) -> bool,
    {
        self.for_each_node_from(1, f)
    }
}

/// Side-level edge queries and iteration.
pub trait SideEdges: GraphBase {
    fn has_edge(&self, from: Side<Self::Ix>, to: Side<Self::Ix>) -> bool;

    fn has_link(&self, from: Self::Ix, to: Self::Ix, ty: LinkType) -> bool {
        let link = Link::from_parts(from, to, ty);
        self.has_edge(link.from(), link.to())
    }

    fn outdegree(&self, side: Side<Self::Ix>) -> usize;
    fn indegree(&self, side: Side<Self::Ix>) -> usize;
    fn node_outdegree(&self, id: Self::Ix) -> usize;
    fn node_indegree(&self, id: Self::Ix) -> usize;

    fn for_each_edge_out<F>(&self, from: Side<Self::Ix>, f: F) -> bool
    where
        F: FnMut(Side<Self::Ix>) -> bool;

    fn for_each_edge_in<F>(&self, to: Side<Self::Ix>, f: F) -> bool
    where
        F: FnMut(Side<Self::Ix>) -> bool;

    fn for_each_link_out<F>(&self, id: Self::Ix, f: F) -> bool
    where
        F: FnMut(Self::Ix, LinkType) -> bool;

    fn for_each_link_in<F>(&self, id: Self::Ix, f: F) -> bool
    where
        F: FnMut(Self::Ix, LinkType) -> bool;
}

macro_rules! delegate_graph_traits {
    ($ty:ident, $has_edge:ident) => {
        impl<Ix, C> GraphBase for $ty<Ix, C>
        where
            Ix: IdType,
            C: Coordinate<Ix>,
        {
            type Ix = Ix;

            fn node_count(&self) -> usize {
                $ty::node_count(self)
            }

            fn edge_count(&self) -> usize {
                $ty::edge_count(self)
            }
        }

        impl<Ix, C> NodeRanked for $ty<Ix, C>
        where
            Ix: IdType,
            C: Coordinate<Ix>,
        {
            fn has_node(&self, id: Ix) -> bool {
                $ty::has_node(self, id)
            }

            fn id_to_rank(&self, id: Ix) -> usize {
                $ty::id_to_rank(self, id)
            }

            fn rank_to_id(&self, rank: usize) -> Ix {
                $ty::rank_to_id(self, rank)
            }

            fn successor_id(&self, id: Ix) -> Ix {
                $ty::successor_id(self, id)
            }

            fn for_each_node_from<F>(&self, rank: usize, f: F) -> bool
            where
                F: FnMut(usize, Ix) -> bool,
            {
                $ty::for_each_node_from(self, rank, f)
            }
        }

        impl<Ix, C> SideEdges for $ty<Ix, C>
        where
            Ix: IdType,
            C: Coordinate<Ix>,
        {
            fn has_edge(&self, from: Side<Ix>, to: Side<Ix>) -> bool {
                $ty::$has_edge(self, from, to)
            }

            fn outdegree(&self, side: Side<Ix>) -> usize {
                $ty::outdegree(self, side)
            }

            fn indegree(&self, side: Side<Ix>) -> usize {
                $ty::indegree(self, side)
            }

            fn node_outdegree(&self, id: Ix) -> usize {
                $ty::node_outdegree(self, id)
            }

            fn node_indegree(&self, id: Ix) -> usize {
                $ty::node_indegree(self, id)
            }

            fn for_each_edge_out<F>(&self, from: Side<Ix>, f: F) -> bool
            where
                F: FnMut(Side<Ix>) -> bool,
            {
                $ty::for_each_edge_out(self, from, f)
            }

            fn for_each_edge_in<F>(&self, to: Side<Ix>, f: F) -> bool
            where
                F: FnMut(Side<Ix>) -> bool,
            {
                $ty::for_each_edge_in(self, to, f)
            }

            fn for_each_link_out<F>(&self, id: Ix, f: F) -> bool
            where
                F: FnMut(Ix, LinkType) -> bool,
            {
                $ty::for_each_link_out(self, id, f)
            }

            fn for_each_link_in<F>(&self, id: Ix, f: F) -> bool
            where
                F: FnMut(Ix, LinkType) -> bool,
            {
                $ty::for_each_link_in(self, id, f)
            }
        }
    };
}

delegate_graph_traits!(AdjGraph, has_edge);
delegate_graph_traits!(PackedGraph, has_edge);
delegate_graph_traits!(SeqGraph, has_edge_between);
delegate_graph_traits!(PackedSeqGraph, has_edge_between);
