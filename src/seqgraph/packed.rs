//! The packed sequence graph and the one-way conversion that builds it.
//!
//! [`PackedSeqGraph`] stores topology, sequence offsets and edge overlaps in
//! the packed node vector (the composition reserves two pad slots per node
//! header and one per edge entry), sequences in a DNA5-packed string set,
//! names in a byte-packed one, and paths in the packed path vector. It is
//! built from a [`SeqGraph`] and immutable afterwards apart from
//! [`clear`](PackedSeqGraph::clear).

use crate::coordinate::{Coordinate, Dense};
use crate::index::{DefaultIx, IdType};
use crate::packed::PackedGraph;
use crate::path::{PackedPathSet, Step};
use crate::side::{Link, LinkType, Side};
use crate::stringset::{Byte, Dna5, StringSet};

use super::SeqGraph;

/// Pad slots reserved per node header: sequence start and sequence length.
const NODE_PADDING: usize = 2;
/// Pad slots reserved per edge entry: overlap length.
const EDGE_PADDING: usize = 1;

const NP_SEQSTART_OFFSET: usize = 0;
const NP_SEQLEN_OFFSET: usize = 1;
const EP_OVERLAP_OFFSET: usize = 0;

/// An immutable, packed bidirected sequence graph.
///
/// Node ids are traversal handles into the packed vector; the embedded
/// coordinate map (default [`Dense`]) recovers the ids of the dynamic graph
/// this one was built from. Prefer `Sparse` when the original ids are
/// scattered, or `Identity` to drop the table altogether.
#[derive(Clone, Debug)]
pub struct PackedSeqGraph<Ix = DefaultIx, C = Dense<Ix>>
where
    Ix: IdType,
{
    topology: PackedGraph<Ix, C>,
    sequences: StringSet<Dna5>,
    names: StringSet<Byte>,
    paths: PackedPathSet<Ix>,
}

impl<Ix, C> Default for PackedSeqGraph<Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    fn default() -> Self {
        PackedSeqGraph {
            topology: PackedGraph::with_padding(NODE_PADDING, EDGE_PADDING),
            sequences: StringSet::new(),
            names: StringSet::new(),
            paths: PackedPathSet::default(),
        }
    }
}

impl<Ix, C> PackedSeqGraph<Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack a dynamic sequence graph.
    ///
    /// The topology packs first, filling the embedded coordinate map; the
    /// fill pass then writes sequence offsets and overlaps into the pad
    /// slots, and paths pack last with their step ids translated through
    /// the fresh coordinates.
    pub fn from_dynamic<C2>(source: &SeqGraph<Ix, C2>) -> Self
    where
        C2: Coordinate<Ix>,
    {
        let mut topology =
            PackedGraph::from_adjacency(source.topology(), NODE_PADDING, EDGE_PADDING);
        let sequences: StringSet<Dna5> = source
            .node_props()
            .iter()
            .map(|node| node.sequence.as_str())
            .collect();
        let names: StringSet<Byte> = source
            .node_props()
            .iter()
            .map(|node| node.name.as_str())
            .collect();
        fill_pad_slots(&mut topology, &sequences, source);
        let paths =
            PackedPathSet::from_paths(source.paths(), |id| topology.id_by_coordinate(id));
        PackedSeqGraph {
            topology,
            sequences,
            names,
            paths,
        }
    }

    /* === nodes === */

    #[inline]
    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.path_count()
    }

    #[inline]
    pub fn has_node(&self, id: Ix) -> bool {
        self.topology.has_node(id)
    }

    #[inline]
    pub fn id_to_rank(&self, id: Ix) -> usize {
        self.topology.id_to_rank(id)
    }

    #[inline]
    pub fn rank_to_id(&self, rank: usize) -> Ix {
        self.topology.rank_to_id(rank)
    }

    #[inline]
    pub fn successor_id(&self, id: Ix) -> Ix {
        self.topology.successor_id(id)
    }

    #[inline]
    pub fn coordinate(&self) -> &C {
        self.topology.coordinate()
    }

    /// The original id the node carried in the dynamic graph.
    #[inline]
    pub fn coordinate_id(&self, id: Ix) -> Ix {
        self.topology.coordinate_id(id)
    }

    /// Resolve an original id to a node id of this graph.
    #[inline]
    pub fn id_by_coordinate(&self, external: Ix) -> Ix {
        self.topology.id_by_coordinate(external)
    }

    #[inline]
    pub fn for_each_node<F>(&self, f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        self.topology.for_each_node(f)
    }

    #[inline]
    pub fn for_each_node_from<F>(&self, rank: usize, f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        self.topology.for_each_node_from(rank, f)
    }

    /// The node's sequence, decoded from the packed store.
    pub fn node_sequence(&self, id: Ix) -> String {
        let start = self.np_value(id, NP_SEQSTART_OFFSET);
        let len = self.np_value(id, NP_SEQLEN_OFFSET);
        self.sequences.slice(start, len)
    }

    /// The node's sequence length in bases. O(1).
    #[inline]
    pub fn node_length(&self, id: Ix) -> usize {
        self.np_value(id, NP_SEQLEN_OFFSET)
    }

    /// The node's name.
    pub fn node_name(&self, id: Ix) -> String {
        self.names.get(self.topology.id_to_rank(id) - 1)
    }

    /* === edges === */

    #[inline]
    pub fn outdegree(&self, side: Side<Ix>) -> usize {
        self.topology.outdegree(side)
    }

    #[inline]
    pub fn indegree(&self, side: Side<Ix>) -> usize {
        self.topology.indegree(side)
    }

    #[inline]
    pub fn node_outdegree(&self, id: Ix) -> usize {
        self.topology.node_outdegree(id)
    }

    #[inline]
    pub fn node_indegree(&self, id: Ix) -> usize {
        self.topology.node_indegree(id)
    }

    #[inline]
    pub fn is_branch(&self, id: Ix) -> bool {
        self.topology.is_branch(id)
    }

    #[inline]
    pub fn is_merge(&self, id: Ix) -> bool {
        self.topology.is_merge(id)
    }

    #[inline]
    pub fn has_link(&self, from: Ix, to: Ix, ty: LinkType) -> bool {
        self.topology.has_link(from, to, ty)
    }

    #[inline]
    pub fn has_edge(&self, link: Link<Ix>) -> bool {
        self.topology.has_edge(link.from(), link.to())
    }

    #[inline]
    pub fn has_edge_between(&self, from: Side<Ix>, to: Side<Ix>) -> bool {
        self.topology.has_edge(from, to)
    }

    #[inline]
    pub fn adjacents_out(&self, from: Side<Ix>) -> Vec<Side<Ix>> {
        self.topology.adjacents_out(from)
    }

    #[inline]
    pub fn adjacents_in(&self, to: Side<Ix>) -> Vec<Side<Ix>> {
        self.topology.adjacents_in(to)
    }

    #[inline]
    pub fn for_each_edge_out<F>(&self, from: Side<Ix>, f: F) -> bool
    where
        F: FnMut(Side<Ix>) -> bool,
    {
        self.topology.for_each_edge_out(from, f)
    }

    #[inline]
    pub fn for_each_edge_in<F>(&self, to: Side<Ix>, f: F) -> bool
    where
        F: FnMut(Side<Ix>) -> bool,
    {
        self.topology.for_each_edge_in(to, f)
    }

    #[inline]
    pub fn for_each_link_out<F>(&self, id: Ix, f: F) -> bool
    where
        F: FnMut(Ix, LinkType) -> bool,
    {
        self.topology.for_each_link_out(id, f)
    }

    #[inline]
    pub fn for_each_link_in<F>(&self, id: Ix, f: F) -> bool
    where
        F: FnMut(Ix, LinkType) -> bool,
    {
        self.topology.for_each_link_in(id, f)
    }

    /// The edge's overlap length, or `None` when the edge is absent.
    ///
    /// Scans the shorter adjacency list, preferring the outgoing one on
    /// ties.
    pub fn link_overlap(&self, from: Ix, to: Ix, ty: LinkType) -> Option<usize> {
        if !self.has_node(from) || !self.has_node(to) {
            return None;
        }
        let slot_offset = self.topology.edge_core_len() + EP_OVERLAP_OFFSET;
        let mut overlap = None;
        let mut check = |pos: usize, id: Ix| {
            if self.topology.adj_id_at(pos) == id && self.topology.adj_linktype_at(pos) == ty {
                overlap = Some(self.topology.value_at(pos + slot_offset).index());
                return false;
            }
            true
        };
        if self.topology.node_outdegree(from) <= self.topology.node_indegree(to) {
            self.topology.for_each_edges_out_pos(from, |pos| check(pos, to));
        } else {
            self.topology.for_each_edges_in_pos(to, |pos| check(pos, from));
        }
        overlap
    }

    #[inline]
    pub fn edge_overlap(&self, link: Link<Ix>) -> Option<usize> {
        self.link_overlap(link.from_id(), link.to_id(), link.link_type())
    }

    /* === paths === */

    #[inline]
    pub fn paths(&self) -> &PackedPathSet<Ix> {
        &self.paths
    }

    #[inline]
    pub fn has_path(&self, id: Ix) -> bool {
        self.paths.has_path(id)
    }

    #[inline]
    pub fn path_id_to_rank(&self, id: Ix) -> usize {
        self.paths.id_to_rank(id)
    }

    #[inline]
    pub fn path_rank_to_id(&self, rank: usize) -> Ix {
        self.paths.rank_to_id(rank)
    }

    #[inline]
    pub fn path_name(&self, id: Ix) -> &str {
        self.paths.path_name(id)
    }

    #[inline]
    pub fn path_length(&self, id: Ix) -> usize {
        self.paths.path_length(id)
    }

    #[inline]
    pub fn path_steps(&self, id: Ix) -> Vec<Step<Ix>> {
        self.paths.steps(id)
    }

    #[inline]
    pub fn for_each_path<F>(&self, f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        self.paths.for_each_path(f)
    }

    #[inline]
    pub fn for_each_step<F>(&self, id: Ix, f: F) -> bool
    where
        F: FnMut(Ix, bool) -> bool,
    {
        self.paths.for_each_step(id, f)
    }

    /// Reset to the empty graph.
    pub fn clear(&mut self) {
        self.topology.clear();
        self.sequences.clear();
        self.names.clear();
        self.paths.clear();
    }

    #[inline]
    fn np_value(&self, id: Ix, offset: usize) -> usize {
        debug_assert!(self.has_node(id));
        self.topology
            .value_at(id.index() + self.topology.header_core_len() + offset)
            .index()
    }
}

impl<Ix, C, C2> From<&SeqGraph<Ix, C2>> for PackedSeqGraph<Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
    C2: Coordinate<Ix>,
{
    fn from(source: &SeqGraph<Ix, C2>) -> Self {
        Self::from_dynamic(source)
    }
}

impl<Ix, C> PartialEq for PackedSeqGraph<Ix, C>
where
    Ix: IdType,
{
    fn eq(&self, other: &Self) -> bool {
        self.topology == other.topology
            && self.sequences == other.sequences
            && self.names == other.names
            && self.paths == other.paths
    }
}

/// Write sequence offsets into the node pads and overlaps into the edge
/// pads of both copies of every edge.
fn fill_pad_slots<Ix, C, C2>(
    topology: &mut PackedGraph<Ix, C>,
    sequences: &StringSet<Dna5>,
    source: &SeqGraph<Ix, C2>,
) where
    Ix: IdType,
    C: Coordinate<Ix>,
    C2: Coordinate<Ix>,
{
    let edge_len = topology.edge_entry_len();
    let slot_offset = topology.edge_core_len() + EP_OVERLAP_OFFSET;
    for rank in 1..=topology.node_count() {
        let id = topology.rank_to_id(rank);
        let prop_pos = id.index() + topology.header_core_len();
        let seq_start = Ix::new(sequences.start_position(rank - 1));
        let seq_len = Ix::new(sequences.length(rank - 1));
        topology.set_value_at(prop_pos + NP_SEQSTART_OFFSET, seq_start);
        topology.set_value_at(prop_pos + NP_SEQLEN_OFFSET, seq_len);

        let d_id = source.rank_to_id(rank);
        let outdegree = topology.node_outdegree(id);
        let indegree = topology.node_indegree(id);
        let mut pos = topology.edges_out_pos(id);
        for entry in 0..outdegree + indegree {
            let adj = topology.adj_id_at(pos);
            let ty = topology.adj_linktype_at(pos);
            let d_adj = source.rank_to_id(topology.id_to_rank(adj));
            let link = if entry < outdegree {
                Link::from_parts(d_id, d_adj, ty)
            } else {
                Link::from_parts(d_adj, d_id, ty)
            };
            let overlap = source.edge_overlap(link).unwrap_or(0);
            topology.set_value_at(pos + slot_offset, Ix::new(overlap));
            pos += edge_len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{Edge, Node};

    fn sample() -> SeqGraph<u64> {
        let mut g = SeqGraph::new();
        g.add_node(Node::new("AC", "n1"));
        g.add_node(Node::new("TG", "n2"));
        g.add_edge(
            Link::new(Side::end(1), Side::start(2)),
            Edge::new(1),
        )
        .unwrap();
        g.add_path_with_steps("walk", [(1, false), (2, true)]).unwrap();
        g
    }

    #[test]
    fn packing_preserves_payloads() {
        let d = sample();
        let s = PackedSeqGraph::<u64>::from_dynamic(&d);
        assert_eq!(s.node_count(), 2);
        assert_eq!(s.edge_count(), 1);
        assert_eq!(s.path_count(), 1);

        let n1 = s.id_by_coordinate(1);
        let n2 = s.id_by_coordinate(2);
        assert_eq!(s.node_sequence(n1), "AC");
        assert_eq!(s.node_sequence(n2), "TG");
        assert_eq!(s.node_length(n2), 2);
        assert_eq!(s.node_name(n1), "n1");
        assert_eq!(s.link_overlap(n1, n2, LinkType::EndStart), Some(1));
        assert_eq!(s.link_overlap(n2, n1, LinkType::EndStart), None);
    }

    #[test]
    fn path_steps_use_packed_ids() {
        let d = sample();
        let s = PackedSeqGraph::<u64>::from_dynamic(&d);
        let pid = s.path_rank_to_id(1);
        assert_eq!(s.path_name(pid), "walk");
        let steps = s.path_steps(pid);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].id(), s.id_by_coordinate(1));
        assert!(!steps[0].is_reversed());
        assert_eq!(steps[1].id(), s.id_by_coordinate(2));
        assert!(steps[1].is_reversed());
    }

    #[test]
    fn clear_empties_every_layer() {
        let d = sample();
        let mut s = PackedSeqGraph::<u64>::from_dynamic(&d);
        s.clear();
        assert_eq!(s.node_count(), 0);
        assert_eq!(s.path_count(), 0);
        assert!(s.for_each_node(|_, _| false));
    }
}
