//! The mutable sequence graph: topology plus node, edge and path payloads.
//!
//! [`SeqGraph`] composes the dynamic topology store with node records, edge
//! payloads and embedded paths, and owns the operations that must keep all
//! four in lockstep: node orientation flips, edge flips and whole-graph edge
//! canonicalization. The batched [`NodeFlipper`] and [`EdgeFlipper`] amortize
//! the path-rewriting cost of flipping many nodes at once.

pub mod packed;

use fixedbitset::FixedBitSet;
use hashbrown::HashSet;

use crate::adj::AdjGraph;
use crate::coordinate::{Coordinate, Identity};
use crate::error::GraphError;
use crate::index::{DefaultIx, IdType};
use crate::path::{Path, PathSet};
use crate::props::{Edge, EdgeProps, Node, NodeProps};
use crate::side::{Link, LinkType, Side};

type Sink<'a> = Option<Box<dyn FnMut(&str) + 'a>>;

/// A mutable bidirected sequence graph.
///
/// Nodes carry DNA sequences and names, edges carry overlap lengths, and
/// paths record named walks as oriented node references. The coordinate map
/// `C` defaults to [`Identity`] because dynamic node ids are the caller's
/// own.
#[derive(Clone, Debug, Default)]
pub struct SeqGraph<Ix = DefaultIx, C = Identity>
where
    Ix: IdType,
{
    topology: AdjGraph<Ix, C>,
    node_props: NodeProps,
    edge_props: EdgeProps<Ix>,
    paths: PathSet<Ix>,
}

impl<Ix, C> SeqGraph<Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /* === accessors === */

    #[inline]
    pub fn topology(&self) -> &AdjGraph<Ix, C> {
        &self.topology
    }

    #[inline]
    pub fn node_props(&self) -> &NodeProps {
        &self.node_props
    }

    #[inline]
    pub fn edge_props(&self) -> &EdgeProps<Ix> {
        &self.edge_props
    }

    #[inline]
    pub fn paths(&self) -> &PathSet<Ix> {
        &self.paths
    }

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

    /* === nodes === */

    /// Append a node with an internally assigned id.
    pub fn add_node(&mut self, node: Node) -> Ix {
        self.node_props.push(node);
        self.topology.add_node()
    }

    /// Append a node with a caller-chosen id.
    pub fn add_node_with_id(&mut self, node: Node, ext_id: Ix) -> Result<Ix, GraphError> {
        let id = self.topology.add_node_with_id(ext_id)?;
        self.node_props.push(node);
        Ok(id)
    }

    /// Append `count` empty nodes, reporting each new id through `f`.
    pub fn add_nodes<F>(&mut self, count: usize, f: F)
    where
        F: FnMut(Ix),
    {
        for _ in 0..count {
            self.node_props.push(Node::default());
        }
        self.topology.add_nodes(count, f);
    }

    /// Replace the payload of an existing node.
    pub fn update_node(&mut self, id: Ix, node: Node) -> Result<(), GraphError> {
        let rank = self.topology.id_to_rank(id);
        if rank == 0 {
            return Err(GraphError::MissingNode(id.index()));
        }
        self.node_props.update(rank, node);
        Ok(())
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

    /// The node's sequence.
    pub fn node_sequence(&self, id: Ix) -> &str {
        debug_assert!(self.has_node(id));
        &self.node_props.get(self.topology.id_to_rank(id)).sequence
    }

    /// The node's sequence length in bases.
    pub fn node_length(&self, id: Ix) -> usize {
        self.node_sequence(id).len()
    }

    /// The node's name.
    pub fn node_name(&self, id: Ix) -> &str {
        debug_assert!(self.has_node(id));
        &self.node_props.get(self.topology.id_to_rank(id)).name
    }

    /// Sort nodes by id and return the applied permutation.
    pub fn sort_nodes(&mut self) -> Vec<usize> {
        let perm = self.topology.sort_nodes();
        self.node_props.sort_by_permutation(&perm);
        perm
    }

    /// Reorder nodes by `perm`; ranks are rebuilt from the new order.
    pub fn sort_nodes_by_permutation(&mut self, perm: &[usize]) {
        self.topology.sort_nodes_by_permutation(perm);
        self.node_props.sort_by_permutation(perm);
    }

    /* === edges === */

    /// Record an edge with its payload after validating both endpoints and
    /// its novelty.
    pub fn add_edge(&mut self, link: Link<Ix>, edge: Edge) -> Result<(), GraphError> {
        if !self.has_node(link.from_id()) {
            return Err(GraphError::MissingNode(link.from_id().index()));
        }
        if !self.has_node(link.to_id()) {
            return Err(GraphError::MissingNode(link.to_id().index()));
        }
        if self.has_edge(link) {
            return Err(GraphError::DuplicateEdge);
        }
        self.topology.add_edge_unchecked(link.from(), link.to());
        self.edge_props.insert(link, edge);
        Ok(())
    }

    /// Record an edge without the duplicate probe, for bulk loaders that
    /// have already deduplicated.
    pub fn add_edge_unchecked(&mut self, link: Link<Ix>, edge: Edge) {
        self.topology.add_edge_unchecked(link.from(), link.to());
        self.edge_props.insert(link, edge);
    }

    /// `true` if the edge is recorded. O(1) through the payload map.
    #[inline]
    pub fn has_edge(&self, link: Link<Ix>) -> bool {
        self.edge_props.has_edge(link)
    }

    #[inline]
    pub fn has_edge_between(&self, from: Side<Ix>, to: Side<Ix>) -> bool {
        self.has_edge(Link::new(from, to))
    }

    #[inline]
    pub fn has_link(&self, from: Ix, to: Ix, ty: LinkType) -> bool {
        self.has_edge(Link::from_parts(from, to, ty))
    }

    /// The edge's overlap length, or `None` when the edge is absent.
    #[inline]
    pub fn edge_overlap(&self, link: Link<Ix>) -> Option<usize> {
        self.edge_props.get(link).map(|edge| edge.overlap)
    }

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

    /* === paths === */

    /// Create an empty named path.
    pub fn add_path(&mut self, name: impl Into<String>) -> Ix {
        self.paths.add_path(name)
    }

    /// Create a path from `(node id, reversed)` steps; every referenced
    /// node must exist.
    pub fn add_path_with_steps<I>(
        &mut self,
        name: impl Into<String>,
        steps: I,
    ) -> Result<Ix, GraphError>
    where
        I: IntoIterator<Item = (Ix, bool)>,
    {
        let steps: Vec<(Ix, bool)> = steps.into_iter().collect();
        for &(id, _) in &steps {
            if !self.has_node(id) {
                return Err(GraphError::MissingNode(id.index()));
            }
        }
        Ok(self.paths.add_path_with_steps(name, steps))
    }

    /// Append one step to a path; the referenced node must exist.
    pub fn extend_path(&mut self, pid: Ix, node_id: Ix, reversed: bool) -> Result<(), GraphError> {
        if !self.has_node(node_id) {
            return Err(GraphError::MissingNode(node_id.index()));
        }
        self.paths.extend_path(pid, node_id, reversed)
    }

    /// Append a batch of `(node id, reversed)` steps to a path.
    pub fn extend_path_with<I>(&mut self, pid: Ix, steps: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (Ix, bool)>,
    {
        let steps: Vec<(Ix, bool)> = steps.into_iter().collect();
        for &(id, _) in &steps {
            if !self.has_node(id) {
                return Err(GraphError::MissingNode(id.index()));
            }
        }
        self.paths.extend_path_with(pid, steps)
    }

    #[inline]
    pub fn has_path(&self, id: Ix) -> bool {
        self.paths.has_path(id)
    }

    #[inline]
    pub fn path(&self, id: Ix) -> Option<&Path<Ix>> {
        self.paths.path(id)
    }

    #[inline]
    pub fn path_name(&self, id: Ix) -> Option<&str> {
        self.paths.path_name(id)
    }

    #[inline]
    pub fn path_length(&self, id: Ix) -> usize {
        self.paths.path_length(id)
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
    pub fn for_each_path<F>(&self, f: F) -> bool
    where
        F: FnMut(usize, Ix) -> bool,
    {
        self.paths.for_each_path(f)
    }

    /* === orientation === */

    /// Flip the orientation of a node.
    ///
    /// Atomically reverse-complements the sequence (toggling a trailing `-`
    /// on the name when `annotate` is set), rewrites the edge-payload keys
    /// and the adjacency of both sides, and toggles the reverse flag of
    /// every path step visiting the node. Returns `false` when the node is
    /// absent.
    ///
    /// The payload-key rewrite is per side, so flipping a node that carries
    /// a self loop leaves the loop's payload key unmoved.
    ///
    /// Flipping nodes one at a time re-scans all paths per call; flip many
    /// nodes through [`node_flipper`](Self::node_flipper) instead.
    pub fn flip_orientation(&mut self, id: Ix, annotate: bool) -> bool {
        if !self.flip_impl(id, annotate) {
            return false;
        }
        self.paths.flip_orientation(id);
        true
    }

    /// Flip every node in `node_set`; returns `true` if any flip applied.
    pub fn flip_orientation_set(&mut self, node_set: &HashSet<Ix>, annotate: bool) -> bool {
        let mut count = 0;
        for &id in node_set {
            if self.flip_impl(id, annotate) {
                count += 1;
            }
        }
        if count > 0 {
            self.paths.flip_orientation_set(node_set);
        }
        count > 0
    }

    /// A batched node-flip handle; staged flips apply on
    /// [`flush`](NodeFlipper::flush) or drop.
    pub fn node_flipper(&mut self, annotate: bool, lazy: bool) -> NodeFlipper<'_, Ix, C> {
        NodeFlipper {
            graph: self,
            annotate,
            lazy,
            stash: HashSet::new(),
            info: None,
            warn: None,
        }
    }

    /// A batched edge-flip handle; staged flips apply on
    /// [`flush`](EdgeFlipper::flush) or drop.
    pub fn edge_flipper(&mut self, swap: bool, lazy: bool) -> EdgeFlipper<'_, Ix, C> {
        EdgeFlipper {
            graph: self,
            swap,
            lazy,
            stash: HashSet::new(),
            info: None,
            warn: None,
        }
    }

    /// Turn the recorded edge `(from, to)` into `(to, from)`, moving its
    /// payload along; the topology change is reverted when the payload move
    /// fails. Returns `false` when nothing changed.
    pub fn flip_edge(&mut self, from: Side<Ix>, to: Side<Ix>, swap: bool) -> bool {
        let old = Link::new(from, to);
        let new = Link::new(to, from);
        if !self.topology.flip_edge(from, to, swap) {
            return false;
        }
        if !self.edge_props.change_edge(old, new, swap) {
            let reverted = self.topology.flip_edge(to, from, swap);
            debug_assert!(reverted);
            return false;
        }
        true
    }

    fn flip_impl(&mut self, id: Ix, annotate: bool) -> bool {
        let rank = self.topology.id_to_rank(id);
        if rank == 0 {
            return false;
        }
        self.flip_edge_props(id);
        self.node_props.flip_orientation(rank, annotate);
        let flipped = self.topology.flip_node(id);
        debug_assert!(flipped);
        flipped
    }

    /// Move the payload keys of every edge touching `id` to the opposite
    /// side of `id`. A link touching both sides of the node is exchanged
    /// exactly once, through the swap semantics of the payload map.
    fn flip_edge_props(&mut self, id: Ix) {
        let mut seen: HashSet<Side<Ix>> = HashSet::new();
        for side in [Side::start(id), Side::end(id)] {
            for to in self.topology.adjacents_out(side) {
                if !seen.insert(to) {
                    continue;
                }
                let old = Link::new(side, to);
                let new = Link::new(side.opposite(), to);
                self.edge_props.change_edge(old, new, true);
            }
        }
        seen.clear();
        for side in [Side::start(id), Side::end(id)] {
            for from in self.topology.adjacents_in(side) {
                if !seen.insert(from) {
                    continue;
                }
                let old = Link::new(from, side);
                let new = Link::new(from, side.opposite());
                self.edge_props.change_edge(old, new, true);
            }
        }
    }

    /* === canonicalization === */

    /// `true` if any pair of nodes is connected by more than one edge.
    pub fn has_any_parallel_edge(&self) -> bool {
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut parallel = false;
        self.for_each_node(|_, id| {
            self.for_each_link_out(id, |to, _| {
                let a = id.index();
                let b = to.index();
                if !seen.insert((a.min(b), a.max(b))) {
                    parallel = true;
                    return false;
                }
                true
            })
        });
        parallel
    }

    /// Rewrite the graph so that, wherever possible, every edge leaves an
    /// end side and enters a start side.
    ///
    /// Nodes are fixed forward in rank order; a neighbour whose local frame
    /// is backwards is flipped, and the touched edges are rewritten into
    /// canonical orientation. A node whose orientation cannot be decided
    /// against the already-fixed part of the graph is reported through
    /// `warn` and left as-is. The initial rank order determines the result;
    /// this is a single deterministic pass, not an optimizer.
    pub fn make_edges_canonical<FI, FW>(&mut self, mut info: FI, mut warn: FW)
    where
        FI: FnMut(&str),
        FW: FnMut(&str),
    {
        if self.has_any_parallel_edge() {
            warn("graph has parallel edges");
        }

        let mut visited = FixedBitSet::with_capacity(self.node_count() + 1);
        for rank in 1..=self.node_count() {
            let id = self.rank_to_id(rank);
            // assume this node is forward
            visited.insert(rank);

            if self.is_unambiguously_forward(id, &visited) {
                let forward = self.make_outgoing_edges_canonical(id, &mut visited, &mut info, &mut warn);
                debug_assert!(forward);
                debug_assert_eq!(self.indegree(Side::end(id)), 0);
                let forward = self.make_incoming_edges_canonical(id, &mut visited, &mut info, &mut warn);
                debug_assert!(forward);
                debug_assert_eq!(self.outdegree(Side::start(id)), 0);
            } else {
                warn(&format!(
                    "cannot unambiguously determine orientation of node '{:?}'",
                    id
                ));
            }
        }
    }

    /// Treating `id` as forward must not contradict any already-visited
    /// neighbour: no end-to-end contact with a fixed node on the end side,
    /// no start-to-start contact on the start side, and no neighbour shared
    /// between both sides (a parallel split).
    fn is_unambiguously_forward(&self, id: Ix, visited: &FixedBitSet) -> bool {
        let start = Side::start(id);
        let end = Side::end(id);
        let mut fwd_adjs: HashSet<Side<Ix>> = HashSet::new();

        self.for_each_edge_in(end, |from| {
            let rank = self.topology.id_to_rank(from.id());
            fwd_adjs.insert(from);
            !(from.is_end() && visited.contains(rank))
        }) && self.for_each_edge_out(end, |to| {
            let rank = self.topology.id_to_rank(to.id());
            fwd_adjs.insert(to);
            !(to.is_end() && visited.contains(rank))
        }) && self.for_each_edge_out(start, |to| {
            let rank = self.topology.id_to_rank(to.id());
            !((to.is_start() && visited.contains(rank)) || fwd_adjs.contains(&to))
        })
    }

    fn make_outgoing_edges_canonical<FI, FW>(
        &mut self,
        id: Ix,
        visited: &mut FixedBitSet,
        info: &mut FI,
        warn: &mut FW,
    ) -> bool
    where
        FI: FnMut(&str),
        FW: FnMut(&str),
    {
        let end = Side::end(id);
        let mut unanimously_fwd = true;
        let mut staged_nodes: Vec<Ix> = Vec::new();
        let mut staged_edges: Vec<(Side<Ix>, Side<Ix>)> = Vec::new();

        // Edges into the end side: flip neighbours presenting their end
        // side, then rewrite each edge into canonical orientation.
        self.for_each_edge_in(end, |mut from| {
            let from_rank = self.topology.id_to_rank(from.id());
            if from.is_end() {
                if visited.contains(from_rank) {
                    unanimously_fwd = false;
                    return true;
                }
                info(&format!("flipping node '{:?}'", from.id()));
                staged_nodes.push(from.id());
                from = Side::start(from.id());
            }
            // assume the neighbour's orientation
            visited.insert(from_rank);
            info(&format!("flipping edge {}", format_edge(from, end)));
            staged_edges.push((from, end));
            true
        });
        self.apply_staged(staged_nodes, staged_edges, info, warn);

        // Edges out of the end side: fix neighbours forward, flipping the
        // ones reached on their end side.
        let mut staged_nodes: Vec<Ix> = Vec::new();
        self.for_each_edge_out(end, |to| {
            let to_rank = self.topology.id_to_rank(to.id());
            if to.is_end() {
                if visited.contains(to_rank) {
                    unanimously_fwd = false;
                    return true;
                }
                info(&format!("flipping node '{:?}'", to.id()));
                staged_nodes.push(to.id());
            }
            visited.insert(to_rank);
            true
        });
        self.apply_staged(staged_nodes, Vec::new(), info, warn);

        unanimously_fwd
    }

    fn make_incoming_edges_canonical<FI, FW>(
        &mut self,
        id: Ix,
        visited: &mut FixedBitSet,
        info: &mut FI,
        warn: &mut FW,
    ) -> bool
    where
        FI: FnMut(&str),
        FW: FnMut(&str),
    {
        let start = Side::start(id);
        let mut unanimously_fwd = true;
        let mut staged_nodes: Vec<Ix> = Vec::new();
        let mut staged_edges: Vec<(Side<Ix>, Side<Ix>)> = Vec::new();

        self.for_each_edge_out(start, |mut to| {
            let to_rank = self.topology.id_to_rank(to.id());
            if to.is_start() {
                if visited.contains(to_rank) {
                    unanimously_fwd = false;
                    return true;
                }
                info(&format!("flipping node '{:?}'", to.id()));
                staged_nodes.push(to.id());
                to = Side::end(to.id());
            }
            visited.insert(to_rank);
            info(&format!("flipping edge {}", format_edge(start, to)));
            staged_edges.push((start, to));
            true
        });
        self.apply_staged(staged_nodes, staged_edges, info, warn);

        unanimously_fwd
    }

    /// Flush a round of staged work: node flips (with their single batched
    /// path pass) first, edge rewrites second.
    fn apply_staged<FI, FW>(
        &mut self,
        nodes: Vec<Ix>,
        edges: Vec<(Side<Ix>, Side<Ix>)>,
        info: &mut FI,
        warn: &mut FW,
    ) where
        FI: FnMut(&str),
        FW: FnMut(&str),
    {
        if !nodes.is_empty() {
            let mut flipper = self
                .node_flipper(false, true)
                .with_info(&mut *info)
                .with_warn(&mut *warn);
            for id in nodes {
                flipper.flip_orientation(id);
            }
        }
        if !edges.is_empty() {
            let mut flipper = self
                .edge_flipper(false, true)
                .with_info(&mut *info)
                .with_warn(&mut *warn);
            for (from, to) in edges {
                flipper.flip_edge(from, to);
            }
        }
    }

    /* === lifecycle === */

    pub fn clear(&mut self) {
        self.topology.clear();
        self.node_props.clear();
        self.edge_props.clear();
        self.paths.clear();
    }

    pub fn shrink_to_fit(&mut self) {
        self.topology.shrink_to_fit();
        self.node_props.shrink_to_fit();
        self.paths.shrink_to_fit();
    }
}

impl<Ix, C> PartialEq for SeqGraph<Ix, C>
where
    Ix: IdType,
{
    fn eq(&self, other: &Self) -> bool {
        self.topology == other.topology
            && self.node_props == other.node_props
            && self.edge_props == other.edge_props
            && self.paths == other.paths
    }
}

fn format_edge<Ix: IdType>(from: Side<Ix>, to: Side<Ix>) -> String {
    format!(
        "({:?}{}, {:?}{})",
        from.id(),
        if from.is_end() { "" } else { "-" },
        to.id(),
        if to.is_start() { "" } else { "-" },
    )
}

/// A batch of node orientation flips.
///
/// Staging the same node twice cancels the flip and reports it through the
/// info sink. In lazy mode topology changes wait for the flush; otherwise
/// they apply immediately. Either way, path-step toggles are applied in a
/// single pass over the paths, keyed on the staged id set, when the batch
/// flushes — explicitly or on drop. Rejected flips are reported through the
/// warn sink and do not abort the batch. Without sinks, reports fall back to
/// the [`log`] crate (`debug!` for info, `warn!` for warnings).
pub struct NodeFlipper<'a, Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    graph: &'a mut SeqGraph<Ix, C>,
    annotate: bool,
    lazy: bool,
    stash: HashSet<Ix>,
    info: Sink<'a>,
    warn: Sink<'a>,
}

impl<'a, Ix, C> NodeFlipper<'a, Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    pub fn with_info(mut self, f: impl FnMut(&str) + 'a) -> Self {
        self.info = Some(Box::new(f));
        self
    }

    pub fn with_warn(mut self, f: impl FnMut(&str) + 'a) -> Self {
        self.warn = Some(Box::new(f));
        self
    }

    /// Stage the flip of node `id`; in non-lazy mode the topology flips
    /// right away. Returns `false` when a non-lazy flip is rejected.
    pub fn flip_orientation(&mut self, id: Ix) -> bool {
        if !self.lazy && !self.flip(id) {
            return false;
        }
        self.stage(id);
        true
    }

    /// Apply all staged flips and the batched path update.
    pub fn flush(&mut self) {
        if self.lazy {
            let staged: Vec<Ix> = self.stash.iter().copied().collect();
            for id in staged {
                self.flip(id);
            }
        }
        self.graph.paths.flip_orientation_set(&self.stash);
        self.stash.clear();
    }

    /// Abandon all staged work.
    pub fn discard(&mut self) {
        self.stash.clear();
    }

    fn flip(&mut self, id: Ix) -> bool {
        if self.graph.flip_impl(id, self.annotate) {
            return true;
        }
        let msg = format!("cannot flip the orientation of node '{:?}'", id);
        emit(&mut self.warn, &msg, true);
        false
    }

    fn stage(&mut self, id: Ix) {
        if self.stash.remove(&id) {
            let msg = format!("double flip of node '{:?}' cancelled", id);
            emit(&mut self.info, &msg, false);
        } else {
            self.stash.insert(id);
        }
    }
}

impl<Ix, C> Drop for NodeFlipper<'_, Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    fn drop(&mut self) {
        self.flush();
    }
}

/// A batch of edge flips; the counterpart of [`NodeFlipper`] for rewriting
/// edges into their opposite direction.
pub struct EdgeFlipper<'a, Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    graph: &'a mut SeqGraph<Ix, C>,
    swap: bool,
    lazy: bool,
    stash: HashSet<(Side<Ix>, Side<Ix>)>,
    info: Sink<'a>,
    warn: Sink<'a>,
}

impl<'a, Ix, C> EdgeFlipper<'a, Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    pub fn with_info(mut self, f: impl FnMut(&str) + 'a) -> Self {
        self.info = Some(Box::new(f));
        self
    }

    pub fn with_warn(mut self, f: impl FnMut(&str) + 'a) -> Self {
        self.warn = Some(Box::new(f));
        self
    }

    /// Stage the flip of the edge `(from, to)`; in non-lazy mode the flip
    /// applies right away and its outcome is returned.
    pub fn flip_edge(&mut self, from: Side<Ix>, to: Side<Ix>) -> bool {
        if !self.lazy {
            return self.flip(from, to);
        }
        self.stage(from, to);
        true
    }

    /// Apply all staged flips.
    pub fn flush(&mut self) {
        let staged: Vec<(Side<Ix>, Side<Ix>)> = self.stash.drain().collect();
        for (from, to) in staged {
            self.flip(from, to);
        }
    }

    /// Abandon all staged work.
    pub fn discard(&mut self) {
        self.stash.clear();
    }

    fn flip(&mut self, from: Side<Ix>, to: Side<Ix>) -> bool {
        if self.graph.flip_edge(from, to, self.swap) {
            return true;
        }
        let msg = format!("cannot flip edge {}", format_edge(from, to));
        emit(&mut self.warn, &msg, true);
        false
    }

    fn stage(&mut self, from: Side<Ix>, to: Side<Ix>) {
        if self.stash.remove(&(from, to)) {
            let msg = format!("double flip of edge {} cancelled", format_edge(from, to));
            emit(&mut self.info, &msg, false);
        } else {
            self.stash.insert((from, to));
        }
    }
}

impl<Ix, C> Drop for EdgeFlipper<'_, Ix, C>
where
    Ix: IdType,
    C: Coordinate<Ix>,
{
    fn drop(&mut self) {
        self.flush();
    }
}

fn emit(sink: &mut Sink<'_>, msg: &str, warning: bool) {
    match sink.as_mut() {
        Some(f) => f(msg),
        None if warning => log::warn!("{}", msg),
        None => log::debug!("{}", msg),
    }
}
