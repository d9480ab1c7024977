use proptest::prelude::*;

use seqgraph::{Edge, Link, LinkType, Node, PackedSeqGraph, SeqGraph, Side};

/// Blueprint for a random graph; indices are 0-based and mapped onto node
/// ids `1..=n` when built.
#[derive(Clone, Debug)]
struct Blueprint {
    seqs: Vec<String>,
    edges: Vec<(usize, usize, u8)>,
    paths: Vec<Vec<(usize, bool)>>,
}

fn dna() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof!["A", "C", "G", "T", "N"], 1..8)
        .prop_map(|bases| bases.concat())
}

fn blueprint() -> impl Strategy<Value = Blueprint> {
    (1usize..10).prop_flat_map(|n| {
        (
            proptest::collection::vec(dna(), n),
            proptest::collection::vec((0..n, 0..n, 0u8..4), 0..20),
            proptest::collection::vec(
                proptest::collection::vec((0..n, any::<bool>()), 1..6),
                0..3,
            ),
        )
            .prop_map(|(seqs, edges, paths)| Blueprint { seqs, edges, paths })
    })
}

fn build(blueprint: &Blueprint) -> SeqGraph<u64> {
    let mut graph = SeqGraph::new();
    for (i, seq) in blueprint.seqs.iter().enumerate() {
        graph.add_node(Node::new(seq.clone(), format!("n{}", i + 1)));
    }
    for (k, &(a, b, ty)) in blueprint.edges.iter().enumerate() {
        if a == b {
            // flipping a self-looped node is not supported, see DESIGN.md
            continue;
        }
        let link = Link::from_parts(
            a as u64 + 1,
            b as u64 + 1,
            LinkType::from_index(ty).unwrap(),
        );
        // duplicates from the generator are simply skipped
        let _ = graph.add_edge(link, Edge::new(k + 1));
    }
    for (p, steps) in blueprint.paths.iter().enumerate() {
        graph
            .add_path_with_steps(
                format!("p{p}"),
                steps.iter().map(|&(i, rev)| (i as u64 + 1, rev)),
            )
            .unwrap();
    }
    graph
}

proptest! {
    #[test]
    fn packed_graph_matches_its_dynamic_source(blueprint in blueprint()) {
        let dynamic = build(&blueprint);
        let packed = PackedSeqGraph::<u64>::from_dynamic(&dynamic);

        prop_assert_eq!(packed.node_count(), dynamic.node_count());
        prop_assert_eq!(packed.edge_count(), dynamic.edge_count());
        prop_assert_eq!(packed.path_count(), dynamic.path_count());

        for rank in 1..=dynamic.node_count() {
            let d_id = dynamic.rank_to_id(rank);
            let p_id = packed.id_by_coordinate(d_id);
            prop_assert_eq!(packed.id_to_rank(p_id), rank);
            prop_assert_eq!(packed.coordinate_id(p_id), d_id);
            prop_assert_eq!(packed.node_outdegree(p_id), dynamic.node_outdegree(d_id));
            prop_assert_eq!(packed.node_indegree(p_id), dynamic.node_indegree(d_id));
            prop_assert_eq!(packed.node_sequence(p_id), dynamic.node_sequence(d_id));
            prop_assert_eq!(packed.node_length(p_id), dynamic.node_length(d_id));
            prop_assert_eq!(packed.node_name(p_id), dynamic.node_name(d_id));

            let mut ok = true;
            dynamic.for_each_link_out(d_id, |to, ty| {
                let p_to = packed.id_by_coordinate(to);
                ok &= packed.has_link(p_id, p_to, ty);
                let link = Link::from_parts(d_id, to, ty);
                ok &= packed.link_overlap(p_id, p_to, ty) == dynamic.edge_overlap(link);
                true
            });
            prop_assert!(ok, "an outgoing link of node {} went missing", d_id);
        }

        for path_rank in 1..=dynamic.path_count() {
            let d_pid = dynamic.path_rank_to_id(path_rank);
            let p_pid = packed.path_rank_to_id(path_rank);
            prop_assert_eq!(packed.path_name(p_pid), dynamic.path_name(d_pid).unwrap());
            prop_assert_eq!(packed.path_length(p_pid), dynamic.path_length(d_pid));

            let d_steps: Vec<(u64, bool)> = dynamic
                .path(d_pid)
                .unwrap()
                .steps()
                .iter()
                .map(|step| (step.id(), step.is_reversed()))
                .collect();
            let p_steps: Vec<(u64, bool)> = packed
                .path_steps(p_pid)
                .iter()
                .map(|step| (packed.coordinate_id(step.id()), step.is_reversed()))
                .collect();
            prop_assert_eq!(d_steps, p_steps);
        }
    }

    #[test]
    fn rank_and_id_are_a_bijection(blueprint in blueprint()) {
        let dynamic = build(&blueprint);
        let packed = PackedSeqGraph::<u64>::from_dynamic(&dynamic);

        for rank in 1..=dynamic.node_count() {
            prop_assert_eq!(dynamic.id_to_rank(dynamic.rank_to_id(rank)), rank);
            prop_assert_eq!(packed.id_to_rank(packed.rank_to_id(rank)), rank);
        }

        // successor chains visit every node once, in rank order
        let mut id = dynamic.rank_to_id(1);
        for rank in 1..=dynamic.node_count() {
            prop_assert_eq!(dynamic.id_to_rank(id), rank);
            id = dynamic.successor_id(id);
        }
        prop_assert_eq!(id, 0);
    }

    #[test]
    fn adjacency_lists_reciprocate(blueprint in blueprint()) {
        let dynamic = build(&blueprint);
        let mut ok = true;
        dynamic.for_each_node(|_, id| {
            for side in [Side::start(id), Side::end(id)] {
                for to in dynamic.adjacents_out(side) {
                    ok &= dynamic.adjacents_in(to).contains(&side);
                }
                for from in dynamic.adjacents_in(side) {
                    ok &= dynamic.adjacents_out(from).contains(&side);
                }
            }
            true
        });
        prop_assert!(ok);
    }

    #[test]
    fn double_flip_restores_the_graph(blueprint in blueprint(), pick in any::<prop::sample::Index>()) {
        let mut graph = build(&blueprint);
        let id = graph.rank_to_id(pick.index(graph.node_count()) + 1);
        let pristine = graph.clone();

        prop_assert!(graph.flip_orientation(id, true));
        prop_assert!(graph.flip_orientation(id, true));
        prop_assert_eq!(graph, pristine);
    }

    #[test]
    fn node_iteration_halts_exactly_at_false(blueprint in blueprint(), pick in any::<prop::sample::Index>()) {
        let graph = build(&blueprint);
        let stop_after = pick.index(graph.node_count()) + 1;
        let mut visited = 0;
        let completed = graph.for_each_node(|_, _| {
            visited += 1;
            visited < stop_after
        });
        // the callback returned false on call number `stop_after`, so the
        // traversal reports the interruption and visits nothing further
        prop_assert_eq!(visited, stop_after);
        prop_assert!(!completed);

        let mut total = 0;
        let completed_all = graph.for_each_node(|_, _| {
            total += 1;
            true
        });
        prop_assert!(completed_all);
        prop_assert_eq!(total, graph.node_count());
    }

    /// A chain whose edges all ran end-to-start, scrambled by flipping a
    /// random node subset, canonicalizes back to the invariant everywhere:
    /// every neighbour is first reached from the node one rank earlier, so
    /// no orientation decision can conflict with an already-fixed node.
    #[test]
    fn canonicalization_normalizes_scrambled_chains(
        n in 2usize..12,
        flips in proptest::collection::vec(any::<bool>(), 12),
    ) {
        let mut graph = SeqGraph::<u64>::new();
        for i in 1..=n as u64 {
            graph.add_node(Node::new("ACGT", format!("n{i}")));
        }
        for i in 1..n as u64 {
            graph
                .add_edge(
                    Link::new(Side::end(i), Side::start(i + 1)),
                    Edge::default(),
                )
                .unwrap();
        }
        for (i, &flip) in flips.iter().take(n).enumerate() {
            if flip {
                graph.flip_orientation(i as u64 + 1, false);
            }
        }

        let mut warnings = Vec::new();
        graph.make_edges_canonical(|_| {}, |msg| warnings.push(msg.to_string()));
        prop_assert!(warnings.is_empty(), "warnings: {:?}", warnings);

        let mut canonical = true;
        graph.for_each_node(|_, id| {
            canonical &= graph.indegree(Side::end(id)) == 0;
            canonical &= graph.outdegree(Side::start(id)) == 0;
            graph.for_each_link_out(id, |_, ty| {
                canonical &= ty == LinkType::EndStart;
                true
            });
            true
        });
        prop_assert!(canonical);
    }

    /// On arbitrary scrambled forward graphs the single greedy pass may have
    /// to leave a node undecided (and says so); every node it did not warn
    /// about must end up fully canonical.
    #[test]
    fn canonicalization_is_canonical_wherever_it_does_not_warn(
        n in 2usize..10,
        raw_edges in proptest::collection::vec((0usize..10, 0usize..10), 1..15),
        flips in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let mut graph = SeqGraph::<u64>::new();
        for i in 1..=n as u64 {
            graph.add_node(Node::new("ACGT", format!("n{i}")));
        }
        for &(a, b) in &raw_edges {
            let (a, b) = (a % n, b % n);
            if a == b {
                continue;
            }
            let link = Link::new(Side::end(a as u64 + 1), Side::start(b as u64 + 1));
            if graph.has_link(b as u64 + 1, a as u64 + 1, LinkType::EndStart) {
                continue; // keep node pairs singly connected
            }
            let _ = graph.add_edge(link, Edge::default());
        }
        for (i, &flip) in flips.iter().take(n).enumerate() {
            if flip {
                graph.flip_orientation(i as u64 + 1, false);
            }
        }

        let mut warnings = Vec::new();
        graph.make_edges_canonical(|_| {}, |msg| warnings.push(msg.to_string()));

        let mut ok = true;
        graph.for_each_node(|_, id| {
            let warned = format!(
                "cannot unambiguously determine orientation of node '{:?}'",
                id
            );
            if !warnings.contains(&warned) {
                ok &= graph.indegree(Side::end(id)) == 0;
                ok &= graph.outdegree(Side::start(id)) == 0;
            }
            true
        });
        prop_assert!(ok, "warnings: {:?}", warnings);
    }
}
