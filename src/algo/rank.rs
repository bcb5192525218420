/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel PageRank by power iteration.
//!
//! Each iteration scatters `rank[s] / outdegree(s)` along every arc with a
//! full-frontier, output-free edge map, then applies the damping with a
//! vertex map. The iteration stops when the ℓ₁ distance between successive
//! rank vectors falls below a tolerance, or after a maximum number of
//! iterations.
//!
//! Dangling nodes simply lose their rank mass, as in the classic
//! frontier-engine formulation; the rank vector therefore sums to 1 only on
//! graphs without them.

use crate::graph::CsrGraph;
use crate::ops::{edge_map_no_output, vertex_for_each};
use crate::par::{self, AtomicF64};
use crate::subset::VertexSubset;
use kahan::KahanSum;
use rayon::prelude::*;
use std::sync::atomic::Ordering;

/// Full-frontier operator scattering rank contributions along every arc.
struct RankOp<'a> {
    graph: &'a CsrGraph,
    curr: &'a [AtomicF64],
    next: &'a [AtomicF64],
}

impl crate::ops::EdgeOp for RankOp<'_> {
    fn update(&self, s: usize, d: usize) -> bool {
        let next = &self.next[d];
        let contribution =
            self.curr[s].load(Ordering::Relaxed) / self.graph.outdegree(s) as f64;
        next.store(next.load(Ordering::Relaxed) + contribution, Ordering::Relaxed);
        true
    }

    fn update_atomic(&self, s: usize, d: usize) -> bool {
        self.next[d].fetch_add(
            self.curr[s].load(Ordering::Relaxed) / self.graph.outdegree(s) as f64,
            Ordering::Relaxed,
        );
        true
    }
}

/// Computes PageRank by damped power iteration.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run); afterwards the rank vector is available through
/// [`rank`](Self::rank).
///
/// # Examples
///
/// ```
/// use mapgraph::algo::rank::PageRank;
/// use mapgraph::graph::CsrGraph;
///
/// // On a directed cycle the rank is uniform.
/// let graph = CsrGraph::from_arcs(3, [(0, 1), (1, 2), (2, 0)]);
/// let mut pr = PageRank::new(&graph);
/// pr.run();
/// for &r in pr.rank() {
///     assert!((r - 1.0 / 3.0).abs() < 1E-7);
/// }
/// ```
pub struct PageRank<'a> {
    graph: &'a CsrGraph,
    damping: f64,
    tolerance: f64,
    max_iters: usize,
    rank: Box<[f64]>,
    iterations: usize,
}

impl<'a> PageRank<'a> {
    /// Default damping factor.
    pub const DEFAULT_DAMPING: f64 = 0.85;
    /// Default ℓ₁ stopping tolerance.
    pub const DEFAULT_TOLERANCE: f64 = 1E-7;
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITERS: usize = 100;

    /// Creates a new PageRank computation over `graph`.
    pub fn new(graph: &'a CsrGraph) -> Self {
        Self {
            graph,
            damping: Self::DEFAULT_DAMPING,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iters: Self::DEFAULT_MAX_ITERS,
            rank: vec![0.0; graph.num_nodes()].into_boxed_slice(),
            iterations: 0,
        }
    }

    /// Sets the damping factor.
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in the interval [0 . . 1).
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        assert!(
            (0.0..1.0).contains(&damping),
            "The damping factor must be in [0 . . 1), got {damping}"
        );
        self.damping = damping;
        self
    }

    /// Sets the ℓ₁ stopping tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is not positive.
    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        assert!(tolerance > 0.0, "The tolerance must be positive");
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    pub fn max_iters(&mut self, max_iters: usize) -> &mut Self {
        self.max_iters = max_iters;
        self
    }

    /// Returns the rank vector computed by the last call to
    /// [`run`](Self::run).
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Returns the number of iterations performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Runs the power iteration until the ℓ₁ distance between successive
    /// approximations falls below the tolerance or the iteration cap is
    /// reached.
    pub fn run(&mut self) {
        let num_nodes = self.graph.num_nodes();
        if num_nodes == 0 {
            return;
        }

        log::info!("Damping: {}", self.damping);
        log::info!("Tolerance: {}", self.tolerance);

        let one_over_n = 1.0 / num_nodes as f64;
        let mut curr: Vec<AtomicF64> = (0..num_nodes).map(|_| AtomicF64::new(one_over_n)).collect();
        let mut next: Vec<AtomicF64> = (0..num_nodes).map(|_| AtomicF64::new(0.0)).collect();
        let mut all = VertexSubset::full(num_nodes);
        let added_constant = (1.0 - self.damping) * one_over_n;

        self.iterations = 0;
        while self.iterations < self.max_iters {
            self.iterations += 1;
            {
                let op = RankOp {
                    graph: self.graph,
                    curr: &curr,
                    next: &next,
                };
                edge_map_no_output(self.graph, &mut all, &op);
            }
            vertex_for_each(&all, |v| {
                let x = next[v].load(Ordering::Relaxed);
                next[v].store(self.damping * x + added_constant, Ordering::Relaxed);
            });

            let norm: f64 = curr
                .par_iter()
                .with_min_len(par::RAYON_MIN_LEN)
                .zip(next.par_iter())
                .fold(KahanSum::<f64>::new, |mut acc, (c, x)| {
                    acc += (c.load(Ordering::Relaxed) - x.load(Ordering::Relaxed)).abs();
                    acc
                })
                .map(|acc| acc.sum())
                .sum();
            log::info!("Iteration {}: norm delta = {norm}", self.iterations);

            // The current vector becomes the scratch of the next round.
            vertex_for_each(&all, |v| curr[v].store(0.0, Ordering::Relaxed));
            std::mem::swap(&mut curr, &mut next);

            if norm < self.tolerance {
                break;
            }
        }

        self.rank = curr
            .into_iter()
            .map(AtomicF64::into_inner)
            .collect::<Vec<_>>()
            .into_boxed_slice();
    }
}
