/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::par;
use crate::subset::{Repr, VertexSubset};
use rayon::prelude::*;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;

/// Applies `f` to every member of a subset in parallel and returns the
/// subset of members for which it returned true.
///
/// The result inherits the universe and the encoding of the input. The
/// engine provides no synchronization between members: side effects of `f`
/// on shared state must be thread-safe, and are visible to subsequent
/// operator calls.
///
/// # Examples
///
/// ```
/// use mapgraph::prelude::*;
///
/// let s = VertexSubset::from_sparse(10, vec![1, 4, 7, 8]);
/// let mut even = vertex_map(&s, |v| v % 2 == 0);
/// let mut nodes = even.to_sparse().to_vec();
/// nodes.sort();
/// assert_eq!(nodes, vec![4, 8]);
/// ```
pub fn vertex_map(subset: &VertexSubset, f: impl Fn(usize) -> bool + Sync) -> VertexSubset {
    let universe = subset.universe();
    match subset.repr() {
        Repr::Sparse(nodes) => {
            VertexSubset::from_distinct(universe, par::pack(nodes, |&v| f(v)))
        }
        Repr::Dense(bits) => {
            let out = AtomicBitVec::new(universe);
            let len = (0..universe)
                .into_par_iter()
                .with_min_len(par::RAYON_MIN_LEN)
                .map(|v| {
                    if bits.get(v, Ordering::Relaxed) && f(v) {
                        out.set(v, true, Ordering::Relaxed);
                        1
                    } else {
                        0
                    }
                })
                .sum();
            VertexSubset::from_dense_with_len(universe, out, len)
        }
    }
}

/// Applies `f` to every member of a subset in parallel, for its side
/// effects only.
pub fn vertex_for_each(subset: &VertexSubset, f: impl Fn(usize) + Sync) {
    match subset.repr() {
        Repr::Sparse(nodes) => nodes
            .par_iter()
            .with_min_len(par::RAYON_MIN_LEN)
            .for_each(|&v| f(v)),
        Repr::Dense(bits) => (0..subset.universe())
            .into_par_iter()
            .with_min_len(par::RAYON_MIN_LEN)
            .for_each(|v| {
                if bits.get(v, Ordering::Relaxed) {
                    f(v)
                }
            }),
    }
}
