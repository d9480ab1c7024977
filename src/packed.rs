//! The succinct topology store: one packed vector, rank/select indexed.
//!
//! [`PackedGraph`] lays the whole adjacency structure out in a single
//! integer vector `nodes`, one record per node:
//!
//! ```text
//! [ payload : outdegree : indegree : <node pads> ]
//! [ adj_id : linktype : <edge pads> ] ... outgoing entries
//! [ adj_id : linktype : <edge pads> ] ... incoming entries
//! ```
//!
//! A parallel bit vector marks record starts; a node's id *is* the offset of
//! its record, so rank/select on the bit vector translates between ids and
//! ranks in constant time and traversal needs no auxiliary tables. Index 0
//! of both vectors is a dummy entry, keeping ids strictly positive.
//!
//! The pad slots are reserved by the composing layer for per-node and
//! per-edge payloads (sequence offsets, overlaps) so that the entire graph
//! lives in one allocation. The store is built from an [`AdjGraph`] and is
//! immutable afterwards apart from [`clear`](PackedGraph::clear).

use crate::adj::AdjGraph;
use crate::bitvector::{BitVector, IndexedBits};
use crate::coordinate::{Coordinate, Dense};
use crate::index::{is_sentinel, zero, DefaultIx, IdType};
use crate::side::{for_each_side, LinkType, Side};

/// Length of the fixed node header: payload, outdegree, indegree.
const HEADER_CORE_LEN: usize = 3;
const OUTDEGREE_OFFSET: usize = 1;
const INDEGREE_OFFSET: usize = 2;

/// Length of the fixed edge entry: adjacent id, link type.
const EDGE_CORE_LEN: usize = 2;
const ADJ_ID_OFFSET: usize = 0;
const ADJ_LINKTYPE_OFFSET: usize = 1;

/// An immutable bidirected graph in a single packed vector.
///
/// Node ids are offsets into the vector and thereby direct traversal
/// handles. The embedded coordinate map `C` recovers the original ids the
/// graph was built with; it defaults to [`Dense`], which fits the common
/// case of near-contiguous external ids.
#[derive(Clone, Debug)]
pub struct PackedGraph<Ix = DefaultIx, C = Dense<Ix>>
where
    Ix: IdType,
{
    np_padding: usize,
    ep_padding: usize,
    node_count: usize,
    edge_count: usize,
    nodes: Vec<Ix>,
    ids: IndexedBits,
    coordinate: C,
}

impl<Ix, C> Default for PackedGraph<Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    fn default() -> Self {
        Self::with_padding(0, 0)
    }
}

impl<Ix, C> PackedGraph<Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    /// An empty store reserving `np_padding` slots per node header and
    /// `ep_padding` slots per edge entry.
    pub fn with_padding(np_padding: usize, ep_padding: usize) -> Self {
        PackedGraph {
            np_padding,
            ep_padding,
            node_count: 0,
            edge_count: 0,
            nodes: vec![zero(); 1],
            ids: IndexedBits::build(BitVector::with_len(1)),
            coordinate: C::default(),
        }
    }

    /// Pack a dynamic graph.
    ///
    /// Nodes are laid out in rank order and edge entries keep the dynamic
    /// store's listing order. During the fill, adjacency entries hold node
    /// *ranks* as provisional ids; a second pass rewrites them to final ids
    /// once the rank/select directory exists.
    pub fn from_adjacency<C2>(
        source: &AdjGraph<Ix, C2>,
        np_padding: usize,
        ep_padding: usize,
    ) -> Self
    where
        C2: Coordinate<Ix>,
    {
        let node_count = source.node_count();
        let edge_count = source.edge_count();
        let header_len = HEADER_CORE_LEN + np_padding;
        let edge_len = EDGE_CORE_LEN + ep_padding;
        let total = node_count * header_len + 2 * edge_count * edge_len + 1;

        let mut nodes: Vec<Ix> = vec![zero(); total];
        let mut bits = BitVector::with_len(total);
        let mut coordinate = C::default();

        let mut pos = 1;
        for rank in 1..=node_count {
            let d_id = source.rank_to_id(rank);
            bits.set(pos - 1, true);
            let id = Ix::new(pos);
            nodes[pos] = d_id;
            coordinate.insert(d_id, id);
            let outdegree = source.node_outdegree(d_id);
            let indegree = source.node_indegree(d_id);
            nodes[pos + OUTDEGREE_OFFSET] = Ix::new(outdegree);
            nodes[pos + INDEGREE_OFFSET] = Ix::new(indegree);

            let mut entry = pos + header_len;
            source.for_each_link_out(d_id, |to, ty| {
                nodes[entry + ADJ_ID_OFFSET] = Ix::new(source.id_to_rank(to));
                nodes[entry + ADJ_LINKTYPE_OFFSET] = Ix::new(ty.index() as usize);
                entry += edge_len;
                true
            });
            source.for_each_link_in(d_id, |from, ty| {
                nodes[entry + ADJ_ID_OFFSET] = Ix::new(source.id_to_rank(from));
                nodes[entry + ADJ_LINKTYPE_OFFSET] = Ix::new(ty.index() as usize);
                entry += edge_len;
                true
            });

            pos += header_len + (outdegree + indegree) * edge_len;
        }
        debug_assert_eq!(pos, total);

        let mut graph = PackedGraph {
            np_padding,
            ep_padding,
            node_count,
            edge_count,
            nodes,
            ids: IndexedBits::build(bits),
            coordinate,
        };
        graph.identificate();
        graph
    }

    /// Replace the provisional ranks written by the fill pass with final
    /// node ids, resolvable now that select support is in place.
    fn identificate(&mut self) {
        let edge_len = self.edge_entry_len();
        for rank in 1..=self.node_count {
            let id = self.rank_to_id(rank);
            let degree = self.node_outdegree(id) + self.node_indegree(id);
            let mut entry = self.edges_out_pos(id);
            for _ in 0..degree {
                let adj_rank = self.nodes[entry + ADJ_ID_OFFSET].index();
                let adj_id = self.rank_to_id(adj_rank);
                self.nodes[entry + ADJ_ID_OFFSET] = adj_id;
                entry += edge_len;
            }
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    pub fn coordinate(&self) -> &C {
        &self.coordinate
    }

    /// The original (external) id recorded for node `id`.
    #[inline]
    pub fn coordinate_id(&self, id: Ix) -> Ix {
        debug_assert!(self.has_node(id));
        self.nodes[id.index()]
    }

    /// Resolve an external coordinate id to a node id.
    #[inline]
    pub fn id_by_coordinate(&self, external: Ix) -> Ix {
        self.coordinate.lookup(external)
    }

    #[inline]
    pub fn has_node(&self, id: Ix) -> bool {
        let idx = id.index();
        idx > 0 && idx < self.nodes.len() && self.ids.get(idx - 1)
    }

    #[inline]
    pub fn has_side(&self, side: Side<Ix>) -> bool {
        self.has_node(side.id())
    }

    /// Rank of a node.
    ///
    /// The id must be in the graph; verify with
    /// [`has_node`](Self::has_node) first.
    #[inline]
    pub fn id_to_rank(&self, id: Ix) -> usize {
        debug_assert!(self.has_node(id));
        self.ids.rank1(id.index())
    }

    /// Node id at `rank`, which must lie in `[1, node_count]`.
    #[inline]
    pub fn rank_to_id(&self, rank: usize) -> Ix {
        debug_assert!(rank >= 1 && rank <= self.node_count);
        Ix::new(self.ids.select1(rank) + 1)
    }

    /// Id of the node at the next rank, or 0 at the end.
    pub fn successor_id(&self, id: Ix) -> Ix {
        debug_assert!(self.has_node(id));
        let next = id.index() + self.node_entry_len(id);
        if next < self.nodes.len() {
            Ix::new(next)
        } else {
            zero()
        }
    }

    /// Call `f` with `(rank, id)` for every node in rank order starting at
    /// `rank`; `f` returns `false` to halt.
    pub fn for_each_node_from<F>(&self, mut rank: usize, mut f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        debug_assert!(rank >= 1);
        if rank > self.node_count {
            return true;
        }
        let mut id = self.rank_to_id(rank);
        while !is_sentinel(id) {
            if !f(rank, id) {
                return false;
            }
            id = self.successor_id(id);
            rank += 1;
        }
        true
    }

    /// [`for_each_node_from`](Self::for_each_node_from) starting at rank 1.
    #[inline]
    pub fn for_each_node<F>(&self, f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        self.for_each_node_from(1, f)
    }

    /// Number of edges out of both sides of a node. O(1).
    #[inline]
    pub fn node_outdegree(&self, id: Ix) -> usize {
        debug_assert!(self.has_node(id));
        self.nodes[id.index() + OUTDEGREE_OFFSET].index()
    }

    /// Number of edges into both sides of a node. O(1).
    #[inline]
    pub fn node_indegree(&self, id: Ix) -> usize {
        debug_assert!(self.has_node(id));
        self.nodes[id.index() + INDEGREE_OFFSET].index()
    }

    /// Number of edges out of one side. O(degree).
    pub fn outdegree(&self, side: Side<Ix>) -> usize {
        let mut count = 0;
        self.for_each_edge_out(side, |_| {
            count += 1;
            true
        });
        count
    }

    /// Number of edges into one side. O(degree).
    pub fn indegree(&self, side: Side<Ix>) -> usize {
        let mut count = 0;
        self.for_each_edge_in(side, |_| {
            count += 1;
            true
        });
        count
    }

    #[inline]
    pub fn has_edges_out(&self, id: Ix) -> bool {
        self.node_outdegree(id) != 0
    }

    #[inline]
    pub fn has_edges_in(&self, id: Ix) -> bool {
        self.node_indegree(id) != 0
    }

    /// More than one edge leaves the node.
    #[inline]
    pub fn is_branch(&self, id: Ix) -> bool {
        self.node_outdegree(id) > 1
    }

    /// More than one edge enters the node.
    #[inline]
    pub fn is_merge(&self, id: Ix) -> bool {
        self.node_indegree(id) > 1
    }

    /// `true` if an edge from `from` to `to` with orientation `ty` is
    /// recorded. Scans the shorter adjacency list, preferring the outgoing
    /// one on ties.
    pub fn has_link(&self, from: Ix, to: Ix, ty: LinkType) -> bool {
        if !self.has_node(from) || !self.has_node(to) {
            return false;
        }
        if self.node_outdegree(from) <= self.node_indegree(to) {
            !self.for_each_link_out(from, |id, t| !(id == to && t == ty))
        } else {
            !self.for_each_link_in(to, |id, t| !(id == from && t == ty))
        }
    }

    #[inline]
    pub fn has_edge(&self, from: Side<Ix>, to: Side<Ix>) -> bool {
        self.has_link(from.id(), to.id(), LinkType::of(from, to))
    }

    /// Call `f` with `(adjacent id, link type)` for every edge leaving
    /// either side of node `id`, in stored order.
    pub fn for_each_link_out<F>(&self, id: Ix, mut f: F) -> bool
    where
        F: FnMut(Ix, LinkType) -> bool,
    {
        self.for_each_edges_out_pos(id, |pos| f(self.adj_id_at(pos), self.adj_linktype_at(pos)))
    }

    /// Call `f` with `(adjacent id, link type)` for every edge entering
    /// either side of node `id`, in stored order.
    pub fn for_each_link_in<F>(&self, id: Ix, mut f: F) -> bool
    where
        F: FnMut(Ix, LinkType) -> bool,
    {
        self.for_each_edges_in_pos(id, |pos| f(self.adj_id_at(pos), self.adj_linktype_at(pos)))
    }

    /// Call `f` on the head side of every edge out of `from`, in stored
    /// order.
    pub fn for_each_edge_out<F>(&self, from: Side<Ix>, mut f: F) -> bool
    where
        F: FnMut(Side<Ix>) -> bool,
    {
        self.for_each_link_out(from.id(), |id, ty| {
            if !ty.is_valid_from(from) {
                return true;
            }
            f(Side::new(id, ty.to_tag()))
        })
    }

    /// Call `f` on the tail side of every edge into `to`, in stored order.
    pub fn for_each_edge_in<F>(&self, to: Side<Ix>, mut f: F) -> bool
    where
        F: FnMut(Side<Ix>) -> bool,
    {
        self.for_each_link_in(to.id(), |id, ty| {
            if !ty.is_valid_to(to) {
                return true;
            }
            f(Side::new(id, ty.from_tag()))
        })
    }

    /// A copy of the sides reachable over edges out of `from`.
    pub fn adjacents_out(&self, from: Side<Ix>) -> Vec<Side<Ix>> {
        // Reserve for the whole node; cheaper than an exact side count.
        let mut adjs = Vec::with_capacity(self.node_outdegree(from.id()));
        self.for_each_edge_out(from, |to| {
            adjs.push(to);
            true
        });
        adjs
    }

    /// A copy of the sides with edges into `to`.
    pub fn adjacents_in(&self, to: Side<Ix>) -> Vec<Side<Ix>> {
        let mut adjs = Vec::with_capacity(self.node_indegree(to.id()));
        self.for_each_edge_in(to, |from| {
            adjs.push(from);
            true
        });
        adjs
    }

    /// Reset to the empty store, keeping the padding configuration.
    pub fn clear(&mut self) {
        self.node_count = 0;
        self.edge_count = 0;
        self.nodes = vec![zero(); 1];
        self.ids = IndexedBits::build(BitVector::with_len(1));
        self.coordinate = C::default();
    }

    /* === record geometry === */

    #[inline]
    pub(crate) fn header_core_len(&self) -> usize {
        HEADER_CORE_LEN
    }

    #[inline]
    fn header_entry_len(&self) -> usize {
        HEADER_CORE_LEN + self.np_padding
    }

    #[inline]
    pub(crate) fn edge_core_len(&self) -> usize {
        EDGE_CORE_LEN
    }

    #[inline]
    pub(crate) fn edge_entry_len(&self) -> usize {
        EDGE_CORE_LEN + self.ep_padding
    }

    #[inline]
    fn node_entry_len(&self, id: Ix) -> usize {
        self.header_entry_len()
            + (self.node_outdegree(id) + self.node_indegree(id)) * self.edge_entry_len()
    }

    #[inline]
    pub(crate) fn edges_out_pos(&self, id: Ix) -> usize {
        id.index() + self.header_entry_len()
    }

    #[inline]
    pub(crate) fn edges_in_pos(&self, id: Ix) -> usize {
        self.edges_out_pos(id) + self.node_outdegree(id) * self.edge_entry_len()
    }

    /// Call `f` with the start position of every outgoing edge entry.
    pub(crate) fn for_each_edges_out_pos<F>(&self, id: Ix, mut f: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let mut pos = self.edges_out_pos(id);
        for _ in 0..self.node_outdegree(id) {
            if !f(pos) {
                return false;
            }
            pos += self.edge_entry_len();
        }
        true
    }

    /// Call `f` with the start position of every incoming edge entry.
    pub(crate) fn for_each_edges_in_pos<F>(&self, id: Ix, mut f: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let mut pos = self.edges_in_pos(id);
        for _ in 0..self.node_indegree(id) {
            if !f(pos) {
                return false;
            }
            pos += self.edge_entry_len();
        }
        true
    }

    #[inline]
    pub(crate) fn adj_id_at(&self, pos: usize) -> Ix {
        self.nodes[pos + ADJ_ID_OFFSET]
    }

    #[inline]
    pub(crate) fn adj_linktype_at(&self, pos: usize) -> LinkType {
        LinkType::from_index(self.nodes[pos + ADJ_LINKTYPE_OFFSET].index() as u8)
            .expect("corrupt link type slot")
    }

    #[inline]
    pub(crate) fn value_at(&self, pos: usize) -> Ix {
        self.nodes[pos]
    }

    #[inline]
    pub(crate) fn set_value_at(&mut self, pos: usize, value: Ix) {
        self.nodes[pos] = value;
    }
}

// Equality covers the packed layout and counters; the coordinate map is
// derived data.
impl<Ix, C> PartialEq for PackedGraph<Ix, C>
where
    Ix: IdType,
{
    fn eq(&self, other: &Self) -> bool {
        self.np_padding == other.np_padding
            && self.ep_padding == other.ep_padding
            && self.node_count == other.node_count
            && self.edge_count == other.edge_count
            && self.nodes == other.nodes
    }
}
