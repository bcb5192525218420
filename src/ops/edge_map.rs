/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Direction, EdgeMapOptions, EdgeOp, OutputMode};
use crate::graph::CsrGraph;
use crate::par;
use crate::subset::{Repr, VertexSubset};
use crate::NO_NODE;
use rayon::prelude::*;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;
use sync_cell_slice::SyncSlice;

/// Denominator of the default work threshold: the automatic plan switches
/// to pull when the frontier size plus its total outdegree exceeds
/// `num_arcs / 20`.
const WORK_THRESHOLD_DENOM: u64 = 20;

/// Denominator of the output switchover: a sparse push output larger than
/// `num_nodes / 20` is converted to the dense encoding before returning.
const DENSE_OUTPUT_DENOM: usize = 20;

/// Maps an edge operator over the arcs leaving a frontier, with default
/// [options](EdgeMapOptions).
///
/// Returns the subset of destinations `d` such that some arc `(s, d)` with
/// `s` in the frontier had `op.cond(d)` true and the update callback
/// returned true. Each qualifying arc receives exactly one invocation of
/// [`update`](EdgeOp::update) or [`update_atomic`](EdgeOp::update_atomic);
/// the output contains each destination at most once, provided the
/// operator follows the claim discipline documented on [`EdgeOp`].
///
/// The frontier is taken by mutable reference because the traversal plan
/// may convert its encoding in place; its element set is never changed.
///
/// # Panics
///
/// Panics if the frontier universe differs from the number of nodes of the
/// graph.
///
/// # Examples
///
/// One breadth-first step:
///
/// ```
/// use mapgraph::prelude::*;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct Parents<'a>(&'a [AtomicUsize]);
///
/// impl EdgeOp for Parents<'_> {
///     fn cond(&self, d: usize) -> bool {
///         self.0[d].load(Ordering::Relaxed) == NO_NODE
///     }
///     fn update(&self, s: usize, d: usize) -> bool {
///         if self.0[d].load(Ordering::Relaxed) == NO_NODE {
///             self.0[d].store(s, Ordering::Relaxed);
///             true
///         } else {
///             false
///         }
///     }
///     fn update_atomic(&self, s: usize, d: usize) -> bool {
///         self.0[d]
///             .compare_exchange(NO_NODE, s, Ordering::Relaxed, Ordering::Relaxed)
///             .is_ok()
///     }
/// }
///
/// let graph = CsrGraph::from_arcs(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
/// let parents: Vec<AtomicUsize> = (0..4).map(|_| AtomicUsize::new(NO_NODE)).collect();
/// parents[0].store(0, Ordering::Relaxed);
///
/// let mut frontier = VertexSubset::singleton(4, 0);
/// let mut next = edge_map(&graph, &mut frontier, &Parents(&parents));
/// let mut nodes = next.to_sparse().to_vec();
/// nodes.sort();
/// assert_eq!(nodes, vec![1, 2]);
/// ```
pub fn edge_map<F: EdgeOp>(
    graph: &CsrGraph,
    frontier: &mut VertexSubset,
    op: &F,
) -> VertexSubset {
    edge_map_with(graph, frontier, op, EdgeMapOptions::default())
}

/// [`edge_map`] for side effects only: every qualifying arc is visited and
/// no output frontier is materialized.
pub fn edge_map_no_output<F: EdgeOp>(graph: &CsrGraph, frontier: &mut VertexSubset, op: &F) {
    edge_map_with(
        graph,
        frontier,
        op,
        EdgeMapOptions {
            output: OutputMode::NoOutput,
            ..EdgeMapOptions::default()
        },
    );
}

/// [`edge_map`] with explicit [options](EdgeMapOptions).
pub fn edge_map_with<F: EdgeOp>(
    graph: &CsrGraph,
    frontier: &mut VertexSubset,
    op: &F,
    options: EdgeMapOptions,
) -> VertexSubset {
    let num_nodes = graph.num_nodes();
    assert_eq!(
        frontier.universe(),
        num_nodes,
        "Frontier universe ({}) does not match the number of nodes ({num_nodes})",
        frontier.universe()
    );
    if frontier.is_empty() {
        return VertexSubset::empty(num_nodes);
    }

    let plan = match options.direction {
        Direction::Auto => {
            // Lower bound on the push work: frontier size plus the sum of
            // the outdegrees of its members, computed on whichever encoding
            // the frontier currently has.
            let out_degrees = match frontier.repr() {
                Repr::Sparse(nodes) => nodes
                    .par_iter()
                    .with_min_len(par::RAYON_MIN_LEN)
                    .map(|&s| graph.outdegree(s) as u64)
                    .sum::<u64>(),
                Repr::Dense(bits) => (0..num_nodes)
                    .into_par_iter()
                    .with_min_len(par::RAYON_MIN_LEN)
                    .map(|s| {
                        if bits.get(s, Ordering::Relaxed) {
                            graph.outdegree(s) as u64
                        } else {
                            0
                        }
                    })
                    .sum::<u64>(),
            };
            let work = frontier.len() as u64 + out_degrees;
            let threshold = options
                .threshold
                .unwrap_or(graph.num_arcs() / WORK_THRESHOLD_DENOM);
            if work > threshold {
                Direction::Pull
            } else {
                Direction::Push
            }
        }
        forced => forced,
    };

    match plan {
        Direction::Push => push(graph, frontier, op, options.output),
        Direction::Pull => pull(graph, frontier, op, options.output),
        Direction::Auto => unreachable!(),
    }
}

/// Push traversal: iterate over the frontier members and their successors,
/// updating destinations atomically since several sources may share one.
fn push<F: EdgeOp>(
    graph: &CsrGraph,
    frontier: &mut VertexSubset,
    op: &F,
    output: OutputMode,
) -> VertexSubset {
    let num_nodes = graph.num_nodes();
    let nodes = frontier.to_sparse();

    if output == OutputMode::NoOutput {
        nodes.par_iter().for_each(|&s| {
            for &d in graph.successors(s) {
                if op.cond(d) {
                    op.update_atomic(s, d);
                }
            }
        });
        return VertexSubset::empty(num_nodes);
    }

    // Per-source offsets into a scratch buffer of arc reports.
    let degrees: Vec<usize> = nodes
        .par_iter()
        .with_min_len(par::RAYON_MIN_LEN)
        .map(|&s| graph.outdegree(s))
        .collect();
    let offsets = par::exclusive_scan(&degrees);
    let total = offsets[nodes.len()];

    let mut reports = vec![NO_NODE; total];
    let slots = reports.as_sync_slice();
    nodes.par_iter().enumerate().for_each(|(i, &s)| {
        let mut w = offsets[i];
        for &d in graph.successors(s) {
            if op.cond(d) && op.update_atomic(s, d) {
                // SAFETY: source i writes exactly the slots in
                // offsets[i]..offsets[i + 1], and no other source does.
                unsafe { slots[w].set(d) };
            }
            w += 1;
        }
    });

    let out_nodes = par::pack(&reports, |&d| d != NO_NODE);
    let mut out = VertexSubset::from_distinct(num_nodes, out_nodes);
    if out.len() > num_nodes / DENSE_OUTPUT_DENOM {
        out.to_dense();
    }
    out
}

/// Pull traversal: iterate over all destinations, scanning their
/// predecessors for frontier members. A single thread owns each
/// destination, so updates need no atomicity; the scan of a destination
/// stops once its `cond` turns false, but keeps going after a true update
/// so that operators accumulating over all arcs see every contribution.
fn pull<F: EdgeOp>(
    graph: &CsrGraph,
    frontier: &mut VertexSubset,
    op: &F,
    output: OutputMode,
) -> VertexSubset {
    let num_nodes = graph.num_nodes();
    let active = frontier.to_dense();

    if output == OutputMode::NoOutput {
        (0..num_nodes)
            .into_par_iter()
            .with_min_len(par::RAYON_MIN_LEN)
            .for_each(|d| {
                if !op.cond(d) {
                    return;
                }
                for &s in graph.predecessors(d) {
                    if active.get(s, Ordering::Relaxed) {
                        op.update(s, d);
                        if !op.cond(d) {
                            break;
                        }
                    }
                }
            });
        return VertexSubset::empty(num_nodes);
    }

    let bits = AtomicBitVec::new(num_nodes);
    let len = (0..num_nodes)
        .into_par_iter()
        .with_min_len(par::RAYON_MIN_LEN)
        .map(|d| {
            if !op.cond(d) {
                return 0;
            }
            let mut member = false;
            for &s in graph.predecessors(d) {
                if active.get(s, Ordering::Relaxed) {
                    member |= op.update(s, d);
                    if !op.cond(d) {
                        break;
                    }
                }
            }
            if member {
                bits.set(d, true, Ordering::Relaxed);
                1
            } else {
                0
            }
        })
        .sum();
    VertexSubset::from_dense_with_len(num_nodes, bits, len)
}
