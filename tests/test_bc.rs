/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use mapgraph::algo::bc;
use mapgraph::graph::CsrGraph;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Sequential single-source Brandes reference: returns the dependency
/// δ(v) = Σ σ(v)/σ(w) · (1 + δ(w)) over the successors w of v in the
/// shortest-path DAG from `root`, with δ(root) forced to 0.
fn brandes_dependencies(graph: &CsrGraph, root: usize) -> Vec<f64> {
    let n = graph.num_nodes();
    let mut sigma = vec![0.0f64; n];
    let mut dist = vec![usize::MAX; n];
    let mut order = Vec::new();
    sigma[root] = 1.0;
    dist[root] = 0;
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &succ in graph.successors(node) {
            if dist[succ] == usize::MAX {
                dist[succ] = dist[node] + 1;
                queue.push_back(succ);
            }
            if dist[succ] == dist[node] + 1 {
                sigma[succ] += sigma[node];
            }
        }
    }

    let mut delta = vec![0.0f64; n];
    for &node in order.iter().rev() {
        for &succ in graph.successors(node) {
            if dist[succ] == dist[node] + 1 {
                delta[node] += sigma[node] / sigma[succ] * (1.0 + delta[succ]);
            }
        }
    }
    delta[root] = 0.0;
    delta
}

#[test]
fn test_diamond() {
    let mut graph = CsrGraph::from_arcs(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
    let scores = bc::betweenness(&mut graph, 0);
    assert_eq!(&*scores, &[0.0, 0.5, 0.5, 0.0]);
    // The transpose flag was restored.
    assert_eq!(graph.successors(0), &[1, 2]);
}

#[test]
fn test_path() {
    let mut graph = CsrGraph::from_arcs(4, [(0, 1), (1, 2), (2, 3)]);
    let scores = bc::betweenness(&mut graph, 0);
    assert_eq!(&*scores, &[0.0, 2.0, 1.0, 0.0]);
}

#[test]
fn test_unreachable_nodes_score_zero() {
    // Node 3 cannot be reached from 0; node 4 is isolated.
    let mut graph = CsrGraph::from_arcs(5, [(0, 1), (1, 2), (3, 2)]);
    let scores = bc::betweenness(&mut graph, 0);
    assert_eq!(&*scores, &[0.0, 1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_random_vs_brandes() {
    for seed in 0..10 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = 60;
        let mut arcs = Vec::new();
        for src in 0..n {
            for dst in 0..n {
                if src != dst && rng.random::<f64>() < 0.05 {
                    arcs.push((src, dst));
                }
            }
        }
        let mut graph = CsrGraph::from_arcs(n, arcs);
        let root = rng.random_range(0..n);

        let scores = bc::betweenness(&mut graph, root);
        let expected = brandes_dependencies(&graph, root);
        for node in 0..n {
            assert!(
                (scores[node] - expected[node]).abs() < 1E-9,
                "node {node}, root {root}, seed {seed}: {} != {}",
                scores[node],
                expected[node]
            );
        }
    }
}
