/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Subsets of a vertex universe with dual sparse/dense encodings.
//!
//! A [`VertexSubset`] is a set of node identifiers drawn from `[0, n)`,
//! held either as a packed array of identifiers (sparse) or as a bitmap of
//! length `n` (dense). The encoding is an implementation detail: the
//! identity of a subset is its element set, and the bulk operators convert
//! in place to whichever encoding they need via
//! [`to_sparse`](VertexSubset::to_sparse) and
//! [`to_dense`](VertexSubset::to_dense).
//!
//! The dense encoding is an [`AtomicBitVec`] because the engine fills it
//! from concurrent writers during pull-directed edge maps.

use crate::par;
use rayon::prelude::*;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;

pub(crate) enum Repr {
    Sparse(Vec<usize>),
    Dense(AtomicBitVec),
}

/// A set of node identifiers over a universe `[0, n)`.
///
/// Subsets are owned values: they are produced by the constructors below
/// and by the bulk operators, consumed by the next operator call, and
/// released by `Drop`.
///
/// # Examples
///
/// ```
/// use mapgraph::subset::VertexSubset;
///
/// let mut s = VertexSubset::from_sparse(10, vec![3, 1, 7]);
/// assert_eq!(s.len(), 3);
/// assert!(s.contains(7));
/// assert!(!s.contains(0));
///
/// // Round-trip through the dense encoding.
/// s.to_dense();
/// s.to_sparse();
/// let mut nodes = s.to_sparse().to_vec();
/// nodes.sort();
/// assert_eq!(nodes, vec![1, 3, 7]);
/// ```
pub struct VertexSubset {
    universe: usize,
    len: usize,
    repr: Repr,
}

impl VertexSubset {
    /// Returns the empty subset over `[0, universe)`.
    pub fn empty(universe: usize) -> Self {
        Self {
            universe,
            len: 0,
            repr: Repr::Sparse(Vec::new()),
        }
    }

    /// Returns the subset `{node}` over `[0, universe)`, in sparse form.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not smaller than `universe`.
    pub fn singleton(universe: usize, node: usize) -> Self {
        assert!(
            node < universe,
            "Node {node} out of bounds for universe {universe}"
        );
        Self {
            universe,
            len: 1,
            repr: Repr::Sparse(vec![node]),
        }
    }

    /// Returns the subset containing the whole universe, in dense form.
    pub fn full(universe: usize) -> Self {
        let bits = AtomicBitVec::new(universe);
        (0..universe)
            .into_par_iter()
            .with_min_len(par::RAYON_MIN_LEN)
            .for_each(|node| bits.set(node, true, Ordering::Relaxed));
        Self {
            universe,
            len: universe,
            repr: Repr::Dense(bits),
        }
    }

    /// Creates a subset from an array of distinct node identifiers.
    ///
    /// # Panics
    ///
    /// Panics if an identifier is not smaller than `universe`. Distinctness
    /// is checked in debug builds only.
    pub fn from_sparse(universe: usize, nodes: Vec<usize>) -> Self {
        for &node in &nodes {
            assert!(
                node < universe,
                "Node {node} out of bounds for universe {universe}"
            );
        }
        #[cfg(debug_assertions)]
        {
            let mut sorted = nodes.clone();
            sorted.sort_unstable();
            sorted.dedup();
            debug_assert_eq!(sorted.len(), nodes.len(), "Duplicate nodes in sparse subset");
        }
        Self::from_distinct(universe, nodes)
    }

    /// Creates a subset from identifiers already known to be distinct and
    /// in range.
    pub(crate) fn from_distinct(universe: usize, nodes: Vec<usize>) -> Self {
        Self {
            universe,
            len: nodes.len(),
            repr: Repr::Sparse(nodes),
        }
    }

    /// Creates a subset over `[0, universe)` from a bitmap of that length;
    /// the size is the popcount.
    pub fn from_dense(universe: usize, bits: AtomicBitVec) -> Self {
        let len = (0..universe)
            .into_par_iter()
            .with_min_len(par::RAYON_MIN_LEN)
            .filter(|&i| bits.get(i, Ordering::Relaxed))
            .count();
        Self::from_dense_with_len(universe, bits, len)
    }

    /// Creates a subset from a bitmap whose popcount the caller already
    /// knows.
    pub(crate) fn from_dense_with_len(universe: usize, bits: AtomicBitVec, len: usize) -> Self {
        Self {
            universe,
            len,
            repr: Repr::Dense(bits),
        }
    }

    /// Returns the universe size.
    pub fn universe(&self) -> usize {
        self.universe
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the subset is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether the subset is currently in the dense encoding.
    pub fn is_dense(&self) -> bool {
        matches!(self.repr, Repr::Dense(_))
    }

    /// Returns whether `node` is a member.
    ///
    /// Constant time on the dense encoding, linear in the size on the
    /// sparse one.
    pub fn contains(&self, node: usize) -> bool {
        match &self.repr {
            Repr::Sparse(nodes) => nodes.contains(&node),
            Repr::Dense(bits) => bits.get(node, Ordering::Relaxed),
        }
    }

    pub(crate) fn repr(&self) -> &Repr {
        &self.repr
    }

    /// Converts to the sparse encoding if needed and returns the member
    /// identifiers.
    ///
    /// The compaction out of a bitmap is a parallel
    /// [pack-index](crate::par::pack_index); the result is cached in place,
    /// so repeated calls are free. Identifiers produced by a conversion are
    /// in ascending order, but in general the order is unspecified.
    pub fn to_sparse(&mut self) -> &[usize] {
        if let Repr::Dense(bits) = &self.repr {
            let nodes = par::pack_index(self.universe, |i| bits.get(i, Ordering::Relaxed));
            debug_assert_eq!(nodes.len(), self.len);
            self.repr = Repr::Sparse(nodes);
        }
        match &self.repr {
            Repr::Sparse(nodes) => nodes,
            Repr::Dense(_) => unreachable!(),
        }
    }

    /// Converts to the dense encoding if needed and returns the bitmap.
    ///
    /// The scatter into a fresh zeroed bitmap is parallel; the result is
    /// cached in place, so repeated calls are free.
    pub fn to_dense(&mut self) -> &AtomicBitVec {
        if let Repr::Sparse(nodes) = &self.repr {
            let bits = AtomicBitVec::new(self.universe);
            nodes
                .par_iter()
                .with_min_len(par::RAYON_MIN_LEN)
                .for_each(|&node| bits.set(node, true, Ordering::Relaxed));
            self.repr = Repr::Dense(bits);
        }
        match &self.repr {
            Repr::Dense(bits) => bits,
            Repr::Sparse(_) => unreachable!(),
        }
    }
}

impl std::fmt::Debug for VertexSubset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexSubset")
            .field("universe", &self.universe)
            .field("len", &self.len)
            .field(
                "encoding",
                match &self.repr {
                    Repr::Sparse(_) => &"sparse",
                    Repr::Dense(_) => &"dense",
                },
            )
            .finish()
    }
}
