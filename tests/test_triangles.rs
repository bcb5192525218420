/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use mapgraph::algo::triangles;
use mapgraph::graph::CsrGraph;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Brute-force reference: counts node triples that are pairwise adjacent.
fn count_triples(n: usize, edges: &[(usize, usize)]) -> u64 {
    let mut adj = vec![false; n * n];
    for &(u, v) in edges {
        adj[u * n + v] = true;
        adj[v * n + u] = true;
    }
    let mut count = 0;
    for a in 0..n {
        for b in a + 1..n {
            if !adj[a * n + b] {
                continue;
            }
            for c in b + 1..n {
                if adj[a * n + c] && adj[b * n + c] {
                    count += 1;
                }
            }
        }
    }
    count
}

#[test]
fn test_k4() {
    let graph = CsrGraph::symmetric_from_arcs(
        4,
        [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
    );
    assert_eq!(triangles::count(&graph), 4);
}

#[test]
fn test_triangle_free() {
    // A path and a 4-cycle have no triangles.
    let path = CsrGraph::symmetric_from_arcs(4, [(0, 1), (1, 2), (2, 3)]);
    assert_eq!(triangles::count(&path), 0);
    let cycle = CsrGraph::symmetric_from_arcs(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
    assert_eq!(triangles::count(&cycle), 0);
}

#[test]
fn test_complete_graph() {
    let n = 7;
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|u| (u + 1..n).map(move |v| (u, v)))
        .collect();
    let graph = CsrGraph::symmetric_from_arcs(n, edges);
    // C(7, 3)
    assert_eq!(triangles::count(&graph), 35);
}

#[test]
#[should_panic(expected = "symmetric")]
fn test_directed_graph_rejected() {
    let graph = CsrGraph::from_arcs(3, [(0, 1), (1, 2), (2, 0)]);
    triangles::count(&graph);
}

#[test]
fn test_random_vs_brute_force() {
    for seed in 0..10 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = 50;
        let mut edges = Vec::new();
        for u in 0..n {
            for v in u + 1..n {
                if rng.random::<f64>() < 0.2 {
                    edges.push((u, v));
                }
            }
        }
        let graph = CsrGraph::symmetric_from_arcs(n, edges.clone());
        assert_eq!(
            triangles::count(&graph),
            count_triples(n, &edges),
            "seed {seed}"
        );
    }
}
