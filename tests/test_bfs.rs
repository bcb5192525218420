/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use mapgraph::algo::bfs;
use mapgraph::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sequential reference: distances from `root`, `usize::MAX` if unreached.
fn bfs_distances(graph: &CsrGraph, root: usize) -> Vec<usize> {
    let mut dist = vec![usize::MAX; graph.num_nodes()];
    dist[root] = 0;
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        for &succ in graph.successors(node) {
            if dist[succ] == usize::MAX {
                dist[succ] = dist[node] + 1;
                queue.push_back(succ);
            }
        }
    }
    dist
}

#[test]
fn test_path_graph() {
    let graph = CsrGraph::from_arcs(5, [(0, 1), (1, 2), (2, 3), (3, 4)]);
    assert_eq!(&*bfs::parents(&graph, 0), &[0, 0, 1, 2, 3]);

    // From the middle, the prefix of the path is unreachable.
    assert_eq!(&*bfs::parents(&graph, 2), &[NO_NODE, NO_NODE, 2, 2, 3]);
}

/// The per-round frontier sizes of a path graph are 1, 1, 1, 1, 1, 0.
#[test]
fn test_path_graph_frontier_sizes() {
    let graph = CsrGraph::from_arcs(5, [(0, 1), (1, 2), (2, 3), (3, 4)]);
    let parents: Vec<AtomicUsize> = (0..5).map(|_| AtomicUsize::new(NO_NODE)).collect();
    parents[0].store(0, Ordering::Relaxed);

    struct Parents<'a>(&'a [AtomicUsize]);
    impl EdgeOp for Parents<'_> {
        fn cond(&self, d: usize) -> bool {
            self.0[d].load(Ordering::Relaxed) == NO_NODE
        }
        fn update(&self, s: usize, d: usize) -> bool {
            if self.0[d].load(Ordering::Relaxed) == NO_NODE {
                self.0[d].store(s, Ordering::Relaxed);
                true
            } else {
                false
            }
        }
        fn update_atomic(&self, s: usize, d: usize) -> bool {
            self.0[d]
                .compare_exchange(NO_NODE, s, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        }
    }

    let mut sizes = Vec::new();
    let mut frontier = VertexSubset::singleton(5, 0);
    loop {
        sizes.push(frontier.len());
        if frontier.is_empty() {
            break;
        }
        frontier = edge_map(&graph, &mut frontier, &Parents(&parents));
    }
    assert_eq!(sizes, vec![1, 1, 1, 1, 1, 0]);
}

#[test]
fn test_star_graph() {
    let graph = CsrGraph::from_arcs(6, (1..6).map(|d| (0, d)));
    let parents = bfs::parents(&graph, 0);
    assert_eq!(&*parents, &[0, 0, 0, 0, 0, 0]);

    // Two rounds: the root, then the five leaves.
    let dist = bfs_distances(&graph, 0);
    assert_eq!(dist, vec![0, 1, 1, 1, 1, 1]);
}

/// On random graphs, the parallel parents array induces exactly the
/// distances of a sequential visit: the same nodes are reached, the root
/// is its own parent, and every other reached node has a parent one level
/// closer to the root.
#[test]
fn test_random_vs_sequential() {
    for seed in 0..10 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = 300;
        let mut arcs = Vec::new();
        for src in 0..n {
            for dst in 0..n {
                if src != dst && rng.random::<f64>() < 0.005 {
                    arcs.push((src, dst));
                }
            }
        }
        let graph = CsrGraph::from_arcs(n, arcs);
        let root = rng.random_range(0..n);

        let parents = bfs::parents(&graph, root);
        let dist = bfs_distances(&graph, root);

        assert_eq!(parents[root], root);
        for node in 0..n {
            if node == root {
                continue;
            }
            match parents[node] {
                NO_NODE => assert_eq!(dist[node], usize::MAX, "node {node}, seed {seed}"),
                parent => {
                    assert!(
                        graph.successors(parent).contains(&node),
                        "parent {parent} of {node} has no such arc, seed {seed}"
                    );
                    assert_eq!(dist[node], dist[parent] + 1, "node {node}, seed {seed}");
                }
            }
        }
    }
}
