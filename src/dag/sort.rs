// src/dag/sort.rs

//! Ordering algorithms over [`Graph`].

use std::collections::BTreeSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::trace;

use crate::dag::graph::Graph;

/// Kahn's algorithm: order vertices so that every edge `u -> v` has `u`
/// before `v`.
///
/// Vertices on a cycle never reach in-degree zero and are left out, so the
/// result is shorter than `graph.vertices()` when the graph is cyclic. This
/// function does not report cycles itself.
///
/// Among vertices that are ready at the same time the order is unspecified.
pub fn sort(graph: &Graph) -> Vec<usize> {
    let n = graph.vertices();

    let mut in_degree = vec![0usize; n];
    for (_, to) in graph.edges() {
        in_degree[to] += 1;
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut sorted = Vec::with_capacity(n);

    while let Some(v) = ready.pop_first() {
        sorted.push(v);
        for &w in graph.adjacent(v) {
            in_degree[w] -= 1;
            if in_degree[w] == 0 {
                ready.insert(w);
            }
        }
    }

    trace!(?sorted, vertices = n, "topological sort finished");
    sorted
}

/// Depth-first walk calling `visit` on each vertex after all of its
/// successors (post-order), starting from every vertex in index order.
///
/// Each vertex is visited at most once; edges back into a vertex that is
/// still being explored are ignored. The first error returned by `visit`
/// stops the walk.
pub fn dfs<E>(graph: &Graph, mut visit: impl FnMut(usize) -> Result<(), E>) -> Result<(), E> {
    let n = graph.vertices();
    let mut seen = vec![false; n];
    // (vertex, index of the next successor to explore)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        stack.push((root, 0));

        while let Some((v, next)) = stack.last_mut() {
            let succ = graph.adjacent(*v);
            if let Some(&w) = succ.get(*next) {
                *next += 1;
                if !seen[w] {
                    seen[w] = true;
                    stack.push((w, 0));
                }
            } else {
                let done = *v;
                stack.pop();
                visit(done)?;
            }
        }
    }

    Ok(())
}

/// A vertex that lies on a cycle, or `None` if the graph is acyclic.
///
/// Used for diagnostics only; scheduling never depends on it.
pub fn find_cycle_member(graph: &Graph) -> Option<usize> {
    let mut g: DiGraphMap<usize, ()> = DiGraphMap::new();
    for v in 0..graph.vertices() {
        g.add_node(v);
    }
    for (from, to) in graph.edges() {
        g.add_edge(from, to, ());
    }

    match toposort(&g, None) {
        Ok(_) => None,
        Err(cycle) => Some(cycle.node_id()),
    }
}
