/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Single-source betweenness centrality (Brandes' algorithm).
//!
//! The forward phase counts shortest paths level by level, keeping the
//! per-level frontiers on a stack; the backward phase runs over the
//! transpose, accumulating dependencies from the deepest level up. Both
//! phases are plain edge-map/vertex-map loops.

use crate::graph::CsrGraph;
use crate::ops::{edge_map, edge_map_no_output, vertex_for_each, EdgeOp};
use crate::par::AtomicF64;
use crate::subset::VertexSubset;
use rayon::prelude::*;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;

/// Forward-phase operator: accumulates shortest-path counts. A destination
/// joins the next frontier on the arc that contributes first.
struct PathCountOp<'a> {
    num_paths: &'a [AtomicF64],
    visited: &'a AtomicBitVec,
}

impl EdgeOp for PathCountOp<'_> {
    fn cond(&self, d: usize) -> bool {
        !self.visited.get(d, Ordering::Relaxed)
    }

    fn update(&self, s: usize, d: usize) -> bool {
        let old = self.num_paths[d].load(Ordering::Relaxed);
        self.num_paths[d].store(old + self.num_paths[s].load(Ordering::Relaxed), Ordering::Relaxed);
        old == 0.0
    }

    fn update_atomic(&self, s: usize, d: usize) -> bool {
        self.num_paths[d].fetch_add(self.num_paths[s].load(Ordering::Relaxed), Ordering::Relaxed)
            == 0.0
    }
}

/// Backward-phase operator: accumulates dependency scores over the
/// transposed graph. Structurally identical to the forward operator, but
/// runs for side effects only.
struct DependencyOp<'a> {
    dependencies: &'a [AtomicF64],
    visited: &'a AtomicBitVec,
}

impl EdgeOp for DependencyOp<'_> {
    fn cond(&self, d: usize) -> bool {
        !self.visited.get(d, Ordering::Relaxed)
    }

    fn update(&self, s: usize, d: usize) -> bool {
        let old = self.dependencies[d].load(Ordering::Relaxed);
        self.dependencies[d]
            .store(old + self.dependencies[s].load(Ordering::Relaxed), Ordering::Relaxed);
        old == 0.0
    }

    fn update_atomic(&self, s: usize, d: usize) -> bool {
        self.dependencies[d]
            .fetch_add(self.dependencies[s].load(Ordering::Relaxed), Ordering::Relaxed)
            == 0.0
    }
}

/// Computes the dependency scores of all nodes with respect to the
/// shortest paths from `root`.
///
/// The score of a node `v` is the Brandes dependency δ(v) = Σ σ(v)/σ(w) ·
/// (1 + δ(w)) over the successors `w` of `v` in the shortest-path DAG;
/// betweenness centrality is the sum of these scores over all roots. The
/// root itself and nodes unreachable from it score 0.
///
/// The graph is transposed in place during the backward phase and restored
/// before returning.
///
/// # Panics
///
/// Panics if `root` is not smaller than the number of nodes.
///
/// # Examples
///
/// ```
/// use mapgraph::algo::bc;
/// use mapgraph::graph::CsrGraph;
///
/// // A diamond: both shortest paths from 0 to 3 pass through 1 or 2.
/// let mut graph = CsrGraph::from_arcs(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
/// assert_eq!(&*bc::betweenness(&mut graph, 0), &[0.0, 0.5, 0.5, 0.0]);
/// ```
pub fn betweenness(graph: &mut CsrGraph, root: usize) -> Box<[f64]> {
    let num_nodes = graph.num_nodes();
    assert!(
        root < num_nodes,
        "Root {root} out of bounds for {num_nodes} nodes"
    );

    let num_paths: Vec<AtomicF64> = (0..num_nodes).map(|_| AtomicF64::new(0.0)).collect();
    num_paths[root].store(1.0, Ordering::Relaxed);
    let visited = AtomicBitVec::new(num_nodes);
    visited.set(root, true, Ordering::Relaxed);

    // Forward phase: count shortest paths, stacking one frontier per level.
    let mut levels = vec![VertexSubset::singleton(num_nodes, root)];
    {
        let op = PathCountOp {
            num_paths: &num_paths,
            visited: &visited,
        };
        loop {
            let current = levels.last_mut().unwrap();
            if current.is_empty() {
                break;
            }
            let next = edge_map(graph, current, &op);
            vertex_for_each(&next, |v| visited.set(v, true, Ordering::Relaxed));
            levels.push(next);
        }
    }
    // Discard the empty frontier that ended the phase.
    levels.pop();
    log::debug!("Forward phase completed in {} levels", levels.len());

    // Invert the path counts; unreached nodes keep 0 and are skipped below.
    let inv_paths: Vec<f64> = num_paths
        .par_iter()
        .with_min_len(crate::par::RAYON_MIN_LEN)
        .map(|p| {
            let p = p.load(Ordering::Relaxed);
            if p == 0.0 {
                0.0
            } else {
                1.0 / p
            }
        })
        .collect();

    let dependencies: Vec<AtomicF64> = (0..num_nodes).map(|_| AtomicF64::new(0.0)).collect();
    (0..num_nodes)
        .into_par_iter()
        .with_min_len(crate::par::RAYON_MIN_LEN)
        .for_each(|v| visited.set(v, false, Ordering::Relaxed));

    // Backward phase, from the deepest level up, over the transpose.
    let mut frontier = levels.pop().unwrap();
    vertex_for_each(&frontier, |v| {
        visited.set(v, true, Ordering::Relaxed);
        dependencies[v].fetch_add(inv_paths[v], Ordering::Relaxed);
    });
    graph.transpose();
    {
        let op = DependencyOp {
            dependencies: &dependencies,
            visited: &visited,
        };
        while let Some(previous) = levels.pop() {
            edge_map_no_output(graph, &mut frontier, &op);
            frontier = previous;
            vertex_for_each(&frontier, |v| {
                visited.set(v, true, Ordering::Relaxed);
                dependencies[v].fetch_add(inv_paths[v], Ordering::Relaxed);
            });
        }
    }
    graph.transpose();

    // Undo the self-contribution and rescale by the path counts.
    dependencies
        .into_par_iter()
        .with_min_len(crate::par::RAYON_MIN_LEN)
        .enumerate()
        .map(|(v, dep)| {
            if v == root || inv_paths[v] == 0.0 {
                0.0
            } else {
                (dep.into_inner() - inv_paths[v]) / inv_paths[v]
            }
        })
        .collect::<Vec<_>>()
        .into_boxed_slice()
}
