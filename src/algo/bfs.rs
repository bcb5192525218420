/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel breadth-first search.

use crate::graph::CsrGraph;
use crate::ops::{edge_map, EdgeOp};
use crate::subset::VertexSubset;
use crate::NO_NODE;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The classic frontier edge operator: a destination joins the next
/// frontier iff this arc claims its slot in the parents array.
struct ParentsOp<'a> {
    parents: &'a [AtomicUsize],
}

impl EdgeOp for ParentsOp<'_> {
    fn cond(&self, d: usize) -> bool {
        self.parents[d].load(Ordering::Relaxed) == NO_NODE
    }

    fn update(&self, s: usize, d: usize) -> bool {
        if self.parents[d].load(Ordering::Relaxed) == NO_NODE {
            self.parents[d].store(s, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    fn update_atomic(&self, s: usize, d: usize) -> bool {
        self.parents[d]
            .compare_exchange(NO_NODE, s, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }
}

/// Computes a breadth-first tree of the graph rooted at `root`.
///
/// Returns, for each node, its parent in the tree; the root is its own
/// parent and unreachable nodes get [`NO_NODE`]. Which parent a node gets
/// among those at the previous distance is unspecified (the traversal is
/// parallel), but parent distances are always one less than child
/// distances.
///
/// # Panics
///
/// Panics if `root` is not smaller than the number of nodes.
///
/// # Examples
///
/// ```
/// use mapgraph::algo::bfs;
/// use mapgraph::graph::CsrGraph;
///
/// let graph = CsrGraph::from_arcs(5, [(0, 1), (1, 2), (2, 3), (3, 4)]);
/// assert_eq!(&*bfs::parents(&graph, 0), &[0, 0, 1, 2, 3]);
/// ```
pub fn parents(graph: &CsrGraph, root: usize) -> Box<[usize]> {
    let num_nodes = graph.num_nodes();
    assert!(
        root < num_nodes,
        "Root {root} out of bounds for {num_nodes} nodes"
    );

    let parents: Vec<AtomicUsize> = (0..num_nodes).map(|_| AtomicUsize::new(NO_NODE)).collect();
    parents[root].store(root, Ordering::Relaxed);

    let op = ParentsOp { parents: &parents };
    let mut frontier = VertexSubset::singleton(num_nodes, root);
    let mut rounds = 0;
    while !frontier.is_empty() {
        frontier = edge_map(graph, &mut frontier, &op);
        rounds += 1;
    }
    log::debug!("Breadth-first search completed in {rounds} rounds");

    parents.into_iter().map(AtomicUsize::into_inner).collect()
}
