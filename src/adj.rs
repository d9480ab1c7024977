//! The dynamic topology store: side-keyed adjacency maps.
//!
//! [`AdjGraph`] represents the connectivity of a bidirected graph in a
//! mutable way, in contrast with the packed representation which is built
//! once and then read-only. Nodes live in an insertion-ordered set whose
//! position is the node's 1-based *rank*; every side of a node owns its own
//! outgoing and incoming adjacency list.

use hashbrown::{HashMap, HashSet};
use indexmap::IndexSet;

use crate::coordinate::{Coordinate, Identity};
use crate::error::GraphError;
use crate::index::{is_sentinel, zero, DefaultIx, IdType};
use crate::side::{for_each_side, LinkType, Side};
use crate::util::{apply_permutation, sort_permutation};

/// A mutable bidirected graph.
///
/// Node ids are either chosen by the caller (any unique positive integer) or
/// assigned sequentially. Edges connect sides of nodes and are kept in
/// insertion order per side. The embedded coordinate map `C` records the
/// external-to-internal id translation and defaults to the no-op
/// [`Identity`] since dynamic ids are the caller's own.
#[derive(Clone, Debug, Default)]
pub struct AdjGraph<Ix = DefaultIx, C = Identity>
where
    Ix: IdType,
{
    nodes: IndexSet<Ix>,
    adj_out: HashMap<Side<Ix>, Vec<Side<Ix>>>,
    adj_in: HashMap<Side<Ix>, Vec<Side<Ix>>>,
    edge_count: usize,
    coordinate: C,
}

impl<Ix, C> AdjGraph<Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of recorded edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    pub fn coordinate(&self) -> &C {
        &self.coordinate
    }

    /// The embedded coordinate id of a node; dynamic graphs hold a single
    /// coordinate system, so this is the identity.
    #[inline]
    pub fn coordinate_id(&self, id: Ix) -> Ix {
        id
    }

    /// Resolve an external coordinate id to a node id.
    #[inline]
    pub fn id_by_coordinate(&self, external: Ix) -> Ix {
        self.coordinate.lookup(external)
    }

    /// Append a node with an internally assigned id.
    ///
    /// Assignment is O(1) as long as ids are either always assigned
    /// internally or always supplied externally; switching between the two
    /// may fall back to a scan over all nodes.
    pub fn add_node(&mut self) -> Ix {
        let id = self.next_id();
        let inserted = self.nodes.insert(id);
        debug_assert!(inserted);
        id
    }

    /// Append a node with a caller-chosen id.
    ///
    /// Fails with [`GraphError::InvalidId`] for the zero sentinel and
    /// [`GraphError::DuplicateId`] when the id is taken.
    pub fn add_node_with_id(&mut self, ext_id: Ix) -> Result<Ix, GraphError> {
        if is_sentinel(ext_id) {
            return Err(GraphError::InvalidId);
        }
        if !self.nodes.insert(ext_id) {
            return Err(GraphError::DuplicateId(ext_id.index()));
        }
        Ok(ext_id)
    }

    /// Append `count` nodes, reporting each new id through `f`.
    pub fn add_nodes<F>(&mut self, count: usize, mut f: F)
    where
        F: FnMut(Ix),
    {
        self.nodes.reserve(count);
        for _ in 0..count {
            f(self.add_node());
        }
    }

    fn next_id(&self) -> Ix {
        let candidate = match self.nodes.last() {
            None => Ix::new(1),
            Some(last) => Ix::new(last.index() + 1),
        };
        if !is_sentinel(candidate) && !self.nodes.contains(&candidate) {
            return candidate;
        }
        // Externally supplied ids got in the way; scan for the maximum.
        let max = self
            .nodes
            .iter()
            .map(|id| id.index())
            .max()
            .unwrap_or_default();
        Ix::new(max + 1)
    }

    #[inline]
    pub fn has_node(&self, id: Ix) -> bool {
        self.nodes.contains(&id)
    }

    #[inline]
    pub fn has_side(&self, side: Side<Ix>) -> bool {
        self.has_node(side.id())
    }

    /// Rank of a node, or 0 when the id is not in the graph.
    #[inline]
    pub fn id_to_rank(&self, id: Ix) -> usize {
        match self.nodes.get_index_of(&id) {
            Some(i) => i + 1,
            None => 0,
        }
    }

    /// Node id at `rank`.
    ///
    /// **Panics** when `rank` is outside `[1, node_count]`.
    #[inline]
    pub fn rank_to_id(&self, rank: usize) -> Ix {
        debug_assert!(rank >= 1 && rank <= self.node_count());
        *self
            .nodes
            .get_index(rank - 1)
            .expect("node rank out of range")
    }

    /// Id of the node at the next rank, or 0 at the end.
    pub fn successor_id(&self, id: Ix) -> Ix {
        let rank = self.id_to_rank(id);
        if rank == 0 || rank == self.node_count() {
            return zero();
        }
        self.rank_to_id(rank + 1)
    }

    /// Call `f` with `(rank, id)` for every node in rank order starting at
    /// `rank`; `f` returns `false` to halt.
    ///
    /// Returns `false` iff the iteration was interrupted.
    pub fn for_each_node_from<F>(&self, mut rank: usize, mut f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        debug_assert!(rank >= 1);
        if rank > self.node_count() {
            return true;
        }
        for &id in self.nodes.iter().skip(rank - 1) {
            if !f(rank, id) {
                return false;
            }
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

    /// Record an edge after validating both endpoints and its novelty.
    pub fn add_edge(&mut self, from: Side<Ix>, to: Side<Ix>) -> Result<(), GraphError> {
        if !self.has_side(from) {
            return Err(GraphError::MissingNode(from.id().index()));
        }
        if !self.has_side(to) {
            return Err(GraphError::MissingNode(to.id().index()));
        }
        if self.has_edge(from, to) {
            return Err(GraphError::DuplicateEdge);
        }
        self.add_edge_unchecked(from, to);
        Ok(())
    }

    /// Record an edge without the duplicate probe, for bulk loaders that
    /// have already deduplicated.
    pub fn add_edge_unchecked(&mut self, from: Side<Ix>, to: Side<Ix>) {
        debug_assert!(self.has_side(from) && self.has_side(to));
        self.adj_out.entry(from).or_default().push(to);
        self.adj_in.entry(to).or_default().push(from);
        self.edge_count += 1;
    }

    /// `true` if the edge from `from` to `to` is recorded.
    ///
    /// Probes the shorter of the two adjacency lists, preferring the
    /// outgoing one on ties.
    pub fn has_edge(&self, from: Side<Ix>, to: Side<Ix>) -> bool {
        let (Some(outs), Some(ins)) = (self.adj_out.get(&from), self.adj_in.get(&to)) else {
            return false;
        };
        if outs.len() <= ins.len() {
            outs.contains(&to)
        } else {
            ins.contains(&from)
        }
    }

    /// A copy of the outgoing adjacency list of `from`.
    pub fn adjacents_out(&self, from: Side<Ix>) -> Vec<Side<Ix>> {
        self.adj_out.get(&from).cloned().unwrap_or_default()
    }

    /// A copy of the incoming adjacency list of `to`.
    pub fn adjacents_in(&self, to: Side<Ix>) -> Vec<Side<Ix>> {
        self.adj_in.get(&to).cloned().unwrap_or_default()
    }

    /// Call `f` on the head side of every edge out of `from`, in insertion
    /// order; `f` returns `false` to halt.
    pub fn for_each_edge_out<F>(&self, from: Side<Ix>, mut f: F) -> bool
    where
        F: FnMut(Side<Ix>) -> bool,
    {
        let Some(outs) = self.adj_out.get(&from) else {
            return true;
        };
        for &to in outs {
            if !f(to) {
                return false;
            }
        }
        true
    }

    /// Call `f` on the tail side of every edge into `to`, in insertion
    /// order; `f` returns `false` to halt.
    pub fn for_each_edge_in<F>(&self, to: Side<Ix>, mut f: F) -> bool
    where
        F: FnMut(Side<Ix>) -> bool,
    {
        let Some(ins) = self.adj_in.get(&to) else {
            return true;
        };
        for &from in ins {
            if !f(from) {
                return false;
            }
        }
        true
    }

    /// Call `f` with `(adjacent id, link type)` for every edge leaving
    /// either side of node `id`.
    pub fn for_each_link_out<F>(&self, id: Ix, mut f: F) -> bool
    where
        F: FnMut(Ix, LinkType) -> bool,
    {
        for_each_side(id, |from| {
            self.for_each_edge_out(from, |to| f(to.id(), LinkType::of(from, to)))
        })
    }

    /// Call `f` with `(adjacent id, link type)` for every edge entering
    /// either side of node `id`.
    pub fn for_each_link_in<F>(&self, id: Ix, mut f: F) -> bool
    where
        F: FnMut(Ix, LinkType) -> bool,
    {
        for_each_side(id, |to| {
            self.for_each_edge_in(to, |from| f(from.id(), LinkType::of(from, to)))
        })
    }

    /// Number of edges out of one side.
    #[inline]
    pub fn outdegree(&self, side: Side<Ix>) -> usize {
        self.adj_out.get(&side).map_or(0, Vec::len)
    }

    /// Number of edges into one side.
    #[inline]
    pub fn indegree(&self, side: Side<Ix>) -> usize {
        self.adj_in.get(&side).map_or(0, Vec::len)
    }

    /// Number of edges out of both sides of a node.
    pub fn node_outdegree(&self, id: Ix) -> usize {
        self.outdegree(Side::start(id)) + self.outdegree(Side::end(id))
    }

    /// Number of edges into both sides of a node.
    pub fn node_indegree(&self, id: Ix) -> usize {
        self.indegree(Side::start(id)) + self.indegree(Side::end(id))
    }

    #[inline]
    pub fn has_edges_out(&self, side: Side<Ix>) -> bool {
        self.outdegree(side) != 0
    }

    #[inline]
    pub fn has_edges_in(&self, side: Side<Ix>) -> bool {
        self.indegree(side) != 0
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

    /// Exchange the roles of the two sides of node `id`.
    ///
    /// The node's own adjacency lists swap sides and every adjacency entry
    /// referring to a side of `id` — in neighbours' lists and, for self
    /// loops, in the node's own — is rewritten to the opposite side.
    /// Returns `false` when the node is not in the graph.
    pub fn flip_node(&mut self, id: Ix) -> bool {
        if !self.has_node(id) {
            return false;
        }
        let start = Side::start(id);
        let end = Side::end(id);

        let mut adjacent: HashSet<Side<Ix>> = HashSet::new();
        for side in [start, end] {
            if let Some(list) = self.adj_out.get(&side) {
                adjacent.extend(list.iter().copied());
            }
            if let Some(list) = self.adj_in.get(&side) {
                adjacent.extend(list.iter().copied());
            }
        }
        for side in adjacent {
            if let Some(list) = self.adj_out.get_mut(&side) {
                for entry in list.iter_mut() {
                    if entry.id() == id {
                        entry.flip_tag();
                    }
                }
            }
            if let Some(list) = self.adj_in.get_mut(&side) {
                for entry in list.iter_mut() {
                    if entry.id() == id {
                        entry.flip_tag();
                    }
                }
            }
        }

        swap_keys(&mut self.adj_out, start, end);
        swap_keys(&mut self.adj_in, start, end);
        true
    }

    /// Turn the recorded edge `(from, to)` into `(to, from)`.
    ///
    /// When the reversed edge is already recorded, `swap` lets the call
    /// succeed as a no-op (the two records exchange roles); without it the
    /// flip is refused to avoid a duplicate. Returns `false` when the edge
    /// is absent.
    pub fn flip_edge(&mut self, from: Side<Ix>, to: Side<Ix>, swap: bool) -> bool {
        if !self.has_edge(from, to) {
            return false;
        }
        if self.has_edge(to, from) {
            return swap;
        }
        remove_entry(&mut self.adj_out, from, to);
        remove_entry(&mut self.adj_in, to, from);
        self.adj_out.entry(to).or_default().push(from);
        self.adj_in.entry(from).or_default().push(to);
        true
    }

    /// Reorder nodes by `perm` (position `i` receives the node previously
    /// at rank `perm[i] + 1`); ranks are rebuilt from the new order.
    pub fn sort_nodes_by_permutation(&mut self, perm: &[usize]) {
        let mut order: Vec<Ix> = self.nodes.iter().copied().collect();
        apply_permutation(perm, &mut order);
        self.nodes = order.into_iter().collect();
    }

    /// Sort nodes by id and return the applied permutation.
    pub fn sort_nodes(&mut self) -> Vec<usize> {
        let order: Vec<Ix> = self.nodes.iter().copied().collect();
        let perm = sort_permutation(&order, Ord::cmp);
        self.sort_nodes_by_permutation(&perm);
        perm
    }

    /// Drop all nodes and edges and reset the counters.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.adj_out.clear();
        self.adj_in.clear();
        self.edge_count = 0;
        self.coordinate = C::default();
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }
}

// Node order and list contents define equality; the coordinate map is a
// lookup aid, not part of the graph value.
impl<Ix, C> PartialEq for AdjGraph<Ix, C>
where
    Ix: IdType,
{
    fn eq(&self, other: &Self) -> bool {
        self.edge_count == other.edge_count
            && self.nodes.iter().eq(other.nodes.iter())
            && self.adj_out == other.adj_out
            && self.adj_in == other.adj_in
    }
}

fn swap_keys<Ix: IdType>(
    map: &mut HashMap<Side<Ix>, Vec<Side<Ix>>>,
    a: Side<Ix>,
    b: Side<Ix>,
) {
    let at_a = map.remove(&a);
    let at_b = map.remove(&b);
    if let Some(list) = at_b {
        map.insert(a, list);
    }
    if let Some(list) = at_a {
        map.insert(b, list);
    }
}

fn remove_entry<Ix: IdType>(
    map: &mut HashMap<Side<Ix>, Vec<Side<Ix>>>,
    key: Side<Ix>,
    value: Side<Ix>,
) {
    let Some(list) = map.get_mut(&key) else {
        return;
    };
    if let Some(pos) = list.iter().position(|&s| s == value) {
        list.remove(pos);
    }
    if list.is_empty() {
        map.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::side::SideTag;

    fn graph_with(n: usize) -> AdjGraph<u64> {
        let mut g = AdjGraph::new();
        g.add_nodes(n, |_| {});
        g
    }

    #[test]
    fn ids_are_assigned_sequentially() {
        let mut g = AdjGraph::<u64>::new();
        assert_eq!(g.add_node(), 1);
        assert_eq!(g.add_node(), 2);
        assert_eq!(g.add_node_with_id(10).unwrap(), 10);
        // next internal id resumes after the largest live id
        assert_eq!(g.add_node(), 11);
        assert_eq!(g.node_count(), 4);
    }

    #[test]
    fn duplicate_and_zero_ids_are_rejected() {
        let mut g = AdjGraph::<u64>::new();
        g.add_node_with_id(5).unwrap();
        assert_eq!(g.add_node_with_id(5), Err(GraphError::DuplicateId(5)));
        assert_eq!(g.add_node_with_id(0), Err(GraphError::InvalidId));
    }

    #[test]
    fn rank_bijection_holds() {
        let mut g = AdjGraph::<u64>::new();
        for id in [4u64, 2, 9] {
            g.add_node_with_id(id).unwrap();
        }
        for rank in 1..=3 {
            assert_eq!(g.id_to_rank(g.rank_to_id(rank)), rank);
        }
        assert_eq!(g.id_to_rank(7), 0);
        assert_eq!(g.successor_id(4), 2);
        assert_eq!(g.successor_id(9), 0);
    }

    #[test]
    fn edges_update_both_lists() {
        let mut g = graph_with(2);
        g.add_edge(Side::end(1), Side::start(2)).unwrap();
        assert!(g.has_edge(Side::end(1), Side::start(2)));
        assert!(!g.has_edge(Side::start(2), Side::end(1)));
        assert_eq!(g.adjacents_out(Side::end(1)), vec![Side::start(2)]);
        assert_eq!(g.adjacents_in(Side::start(2)), vec![Side::end(1)]);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(
            g.add_edge(Side::end(1), Side::start(2)),
            Err(GraphError::DuplicateEdge)
        );
        assert_eq!(
            g.add_edge(Side::end(1), Side::start(3)),
            Err(GraphError::MissingNode(3))
        );
    }

    #[test]
    fn link_iteration_reports_types() {
        let mut g = graph_with(3);
        g.add_edge(Side::end(1), Side::start(2)).unwrap();
        g.add_edge(Side::start(1), Side::end(3)).unwrap();
        let mut seen = Vec::new();
        g.for_each_link_out(1, |id, ty| {
            seen.push((id, ty));
            true
        });
        assert_eq!(
            seen,
            vec![(3, LinkType::StartEnd), (2, LinkType::EndStart)]
        );
        assert_eq!(g.node_outdegree(1), 2);
        assert_eq!(g.outdegree(Side::end(1)), 1);
    }

    #[test]
    fn flip_node_rewrites_neighbours_and_self_loops() {
        let mut g = graph_with(3);
        g.add_edge(Side::end(1), Side::start(2)).unwrap();
        g.add_edge(Side::end(2), Side::start(3)).unwrap();
        g.add_edge(Side::start(2), Side::start(2)).unwrap();

        assert!(g.flip_node(2));
        assert!(g.has_edge(Side::end(1), Side::end(2)));
        assert!(g.has_edge(Side::start(2), Side::start(3)));
        assert!(g.has_edge(Side::end(2), Side::end(2)));
        assert_eq!(g.edge_count(), 3);

        // a second flip restores the original state
        assert!(g.flip_node(2));
        assert!(g.has_edge(Side::end(1), Side::start(2)));
        assert!(g.has_edge(Side::end(2), Side::start(3)));
        assert!(g.has_edge(Side::start(2), Side::start(2)));
        assert!(!g.flip_node(9));
    }

    #[test]
    fn flip_edge_reverses_a_recorded_edge() {
        let mut g = graph_with(2);
        g.add_edge(Side::start(1), Side::end(2)).unwrap();
        assert!(g.flip_edge(Side::start(1), Side::end(2), false));
        assert!(!g.has_edge(Side::start(1), Side::end(2)));
        assert!(g.has_edge(Side::end(2), Side::start(1)));
        assert!(!g.flip_edge(Side::start(1), Side::end(2), false));
    }

    #[test]
    fn sorting_rebuilds_ranks() {
        let mut g = AdjGraph::<u64>::new();
        for id in [4u64, 2, 9] {
            g.add_node_with_id(id).unwrap();
        }
        let perm = g.sort_nodes();
        assert_eq!(perm, vec![1, 0, 2]);
        assert_eq!(g.rank_to_id(1), 2);
        assert_eq!(g.rank_to_id(2), 4);
        assert_eq!(g.rank_to_id(3), 9);
    }

    #[test]
    fn halting_callback_stops_node_iteration() {
        let g = graph_with(5);
        let mut visited = Vec::new();
        let completed = g.for_each_node(|rank, id| {
            visited.push((rank, id));
            rank < 2
        });
        assert!(!completed);
        assert_eq!(visited, vec![(1, 1), (2, 2)]);
        assert!(g.for_each_node_from(6, |_, _| false));
    }

    #[test]
    fn side_tags_distinguish_adjacency() {
        let mut g = graph_with(2);
        g.add_edge(Side::new(1, SideTag::End), Side::new(2, SideTag::Start))
            .unwrap();
        assert_eq!(g.outdegree(Side::start(1)), 0);
        assert_eq!(g.outdegree(Side::end(1)), 1);
        assert_eq!(g.indegree(Side::start(2)), 1);
        assert_eq!(g.indegree(Side::end(2)), 0);
    }
}
