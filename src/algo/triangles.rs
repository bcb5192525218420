/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel triangle counting on symmetric graphs.
//!
//! One full-frontier, output-free edge map visits every oriented arc
//! `(s, d)`; for arcs with `s > d` the sorted successor lists of the two
//! endpoints are merge-intersected below `min(s, d)`, so each triangle is
//! counted exactly once, at its highest-numbered node.

use crate::graph::CsrGraph;
use crate::ops::{edge_map_no_output, EdgeOp};
use crate::par;
use crate::subset::VertexSubset;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts the common elements of two sorted lists, considering only
/// elements smaller than `a_cap` and `b_cap`, respectively.
fn common_below(a: &[usize], b: &[usize], a_cap: usize, b_cap: usize) -> u64 {
    let mut i = 0;
    let mut j = 0;
    let mut count = 0;
    while i < a.len() && j < b.len() && a[i] < a_cap && b[j] < b_cap {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
                count += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    count
}

struct CountOp<'a> {
    graph: &'a CsrGraph,
    counts: &'a [AtomicU64],
}

impl CountOp<'_> {
    fn count_arc(&self, s: usize, d: usize) {
        if s > d {
            let common = common_below(
                self.graph.successors(s),
                self.graph.successors(d),
                s,
                d,
            );
            if common > 0 {
                self.counts[s].fetch_add(common, Ordering::Relaxed);
            }
        }
    }
}

impl EdgeOp for CountOp<'_> {
    fn update(&self, s: usize, d: usize) -> bool {
        self.count_arc(s, d);
        true
    }

    fn update_atomic(&self, s: usize, d: usize) -> bool {
        self.count_arc(s, d);
        true
    }
}

/// Counts the triangles of a symmetric graph.
///
/// # Panics
///
/// Panics if the graph is not symmetric.
///
/// # Examples
///
/// ```
/// use mapgraph::algo::triangles;
/// use mapgraph::graph::CsrGraph;
///
/// // K4 contains every 3-subset of its nodes as a triangle.
/// let graph = CsrGraph::symmetric_from_arcs(
///     4,
///     [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
/// );
/// assert_eq!(triangles::count(&graph), 4);
/// ```
pub fn count(graph: &CsrGraph) -> u64 {
    assert!(
        graph.is_symmetric(),
        "Triangle counting requires a symmetric graph"
    );
    let num_nodes = graph.num_nodes();
    let counts: Vec<AtomicU64> = (0..num_nodes).map(|_| AtomicU64::new(0)).collect();
    let op = CountOp {
        graph,
        counts: &counts,
    };
    let mut all = VertexSubset::full(num_nodes);
    edge_map_no_output(graph, &mut all, &op);

    let counts: Vec<u64> = counts.into_iter().map(AtomicU64::into_inner).collect();
    par::plus_reduce(&counts)
}
