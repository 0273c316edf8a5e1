use std::collections::HashSet;

use proptest::prelude::*;
use syncgraph::dag::{Graph, find_cycle_member, sort};

// Strategy to generate a DAG.
// Acyclic by construction: vertex i only gets edges from vertices < i.
fn dag_strategy(max_vertices: usize) -> impl Strategy<Value = Graph> {
    (1..=max_vertices).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..n), n).prop_map(
            move |raw| {
                let mut g = Graph::new(n);
                for (i, potential) in raw.into_iter().enumerate() {
                    if i == 0 {
                        continue;
                    }
                    let deps: HashSet<usize> = potential.into_iter().map(|d| d % i).collect();
                    for d in deps {
                        g.add_edge(d, i);
                    }
                }
                g
            },
        )
    })
}

// Arbitrary directed graph, possibly cyclic.
fn any_graph_strategy(max_vertices: usize) -> impl Strategy<Value = Graph> {
    (1..=max_vertices).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 0..(n * 2)).prop_map(move |edges| {
            let mut g = Graph::new(n);
            for (from, to) in edges {
                g.add_edge(from, to);
            }
            g
        })
    })
}

proptest! {
    #[test]
    fn dag_sort_is_a_permutation_respecting_edges(g in dag_strategy(12)) {
        let order = sort(&g);

        prop_assert_eq!(order.len(), g.vertices());
        let unique: HashSet<_> = order.iter().copied().collect();
        prop_assert_eq!(unique.len(), g.vertices());

        let mut pos = vec![0usize; g.vertices()];
        for (i, &v) in order.iter().enumerate() {
            pos[v] = i;
        }
        for (from, to) in g.edges() {
            prop_assert!(pos[from] < pos[to], "edge {} -> {} out of order", from, to);
        }
        prop_assert_eq!(find_cycle_member(&g), None);
    }

    #[test]
    fn incomplete_sort_means_a_cycle(g in any_graph_strategy(8)) {
        let order = sort(&g);
        let complete = order.len() == g.vertices();
        prop_assert_eq!(complete, find_cycle_member(&g).is_none());

        // A cycle member can never be ordered.
        if let Some(member) = find_cycle_member(&g) {
            prop_assert!(!order.contains(&member));
        }
    }
}
