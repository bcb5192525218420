/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel runtime primitives.
//!
//! The bulk operators of this crate are built on a small set of
//! data-parallel primitives: parallel reduction, two-pass parallel
//! compaction ([`pack`] and [`pack_index`]), exclusive prefix sums
//! ([`exclusive_scan`]), and an atomic floating-point cell ([`AtomicF64`])
//! complementing the integer atomics of [`std::sync::atomic`].
//!
//! All primitives run on the global [rayon](rayon) pool and block the
//! caller until every iteration has completed. None of them makes ordering
//! guarantees between iterations.

use rayon::prelude::*;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};
use sync_cell_slice::SyncSlice;

/// Minimum number of elements handed to a Rayon task by the loops of this
/// crate.
///
/// Keeps per-task overhead negligible on large inputs while degenerating to
/// a single sequential task on small ones.
pub const RAYON_MIN_LEN: usize = 1024;

/// Returns the chunk length used by the two-pass compaction primitives for
/// an input of `num_elements` elements.
///
/// The length is the number of elements divided by four times the number of
/// threads, clamped between 1000 and 1000000, mirroring a relative
/// granularity with slack factor 4.
fn chunk_len(num_elements: usize) -> usize {
    let tasks = rayon::current_num_threads() * 4;
    (num_elements / tasks.max(1)).clamp(1000, 1000000)
}

/// Returns the sum of the elements of a slice, computed in parallel.
pub fn plus_reduce<T>(a: &[T]) -> T
where
    T: Copy + Send + Sync + std::iter::Sum<T>,
{
    a.par_iter().with_min_len(RAYON_MIN_LEN).copied().sum()
}

/// Returns the exclusive prefix sum of `a`, with the grand total appended.
///
/// The result has length `a.len() + 1`: position `i` holds the sum of
/// `a[..i]`, and the last position holds the sum of the whole slice. The
/// scan is chunked: per-chunk totals are computed in parallel, combined
/// sequentially, and the chunks are then filled in parallel.
///
/// # Examples
///
/// ```
/// assert_eq!(mapgraph::par::exclusive_scan(&[3, 0, 2, 1]), vec![0, 3, 3, 5, 6]);
/// ```
pub fn exclusive_scan(a: &[usize]) -> Vec<usize> {
    let chunk = chunk_len(a.len());
    let totals: Vec<usize> = a
        .par_chunks(chunk)
        .map(|c| c.iter().sum::<usize>())
        .collect();
    let mut base = 0;
    let bases: Vec<usize> = totals
        .iter()
        .map(|&t| {
            let b = base;
            base += t;
            b
        })
        .collect();

    let mut out = vec![0; a.len() + 1];
    out[a.len()] = base;
    out[..a.len()]
        .par_chunks_mut(chunk)
        .zip(a.par_chunks(chunk))
        .enumerate()
        .for_each(|(k, (dst, src))| {
            let mut acc = bases[k];
            for (d, &x) in dst.iter_mut().zip(src) {
                *d = acc;
                acc += x;
            }
        });
    out
}

/// Compacts in parallel the elements of `src` satisfying `keep`, preserving
/// their relative order.
///
/// This is a two-pass compaction: a counting pass over fixed-size chunks,
/// an exclusive scan of the chunk counts, and a scatter pass writing each
/// chunk's survivors at its offset.
pub fn pack<T: Copy + Send + Sync>(src: &[T], keep: impl Fn(&T) -> bool + Sync) -> Vec<T> {
    let chunk = chunk_len(src.len());
    let counts: Vec<usize> = src
        .par_chunks(chunk)
        .map(|c| c.iter().filter(|&x| keep(x)).count())
        .collect();
    let offsets = exclusive_scan(&counts);
    let total = offsets[counts.len()];

    let mut out = Box::new_uninit_slice(total);
    let slots = out.as_sync_slice();
    src.par_chunks(chunk).enumerate().for_each(|(k, c)| {
        let mut w = offsets[k];
        for x in c {
            if keep(x) {
                // SAFETY: chunk k writes exactly the slots in
                // offsets[k]..offsets[k + 1], and no other chunk does.
                unsafe { slots[w].set(MaybeUninit::new(*x)) };
                w += 1;
            }
        }
    });
    // SAFETY: the chunk counts guarantee every slot has been written.
    let out = unsafe { out.assume_init() };
    out.into_vec()
}

/// Returns, in ascending order, the indices in `[0, n)` satisfying `pred`.
pub fn pack_index(n: usize, pred: impl Fn(usize) -> bool + Sync) -> Vec<usize> {
    let chunk = chunk_len(n);
    let num_chunks = n.div_ceil(chunk);
    let counts: Vec<usize> = (0..num_chunks)
        .into_par_iter()
        .map(|k| {
            let start = k * chunk;
            (start..(start + chunk).min(n)).filter(|&i| pred(i)).count()
        })
        .collect();
    let offsets = exclusive_scan(&counts);
    let total = offsets[counts.len()];

    let mut out = Box::new_uninit_slice(total);
    let slots = out.as_sync_slice();
    (0..num_chunks).into_par_iter().for_each(|k| {
        let start = k * chunk;
        let mut w = offsets[k];
        for i in start..(start + chunk).min(n) {
            if pred(i) {
                // SAFETY: chunk k writes exactly the slots in
                // offsets[k]..offsets[k + 1], and no other chunk does.
                unsafe { slots[w].set(MaybeUninit::new(i)) };
                w += 1;
            }
        }
    });
    // SAFETY: the chunk counts guarantee every slot has been written.
    let out = unsafe { out.assume_init() };
    out.into_vec()
}

/// An `f64` cell updatable atomically, backed by an [`AtomicU64`] holding
/// the bit pattern.
///
/// [`fetch_add`](AtomicF64::fetch_add) is a compare-and-swap loop; it is
/// the floating-point analogue of [`AtomicU64::fetch_add`] and the
/// primitive edge operators use to accumulate into shared floating-point
/// state from concurrent updates.
#[derive(Debug, Default)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    /// Creates a new cell holding `value`.
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    /// Loads the current value.
    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.0.load(order))
    }

    /// Stores `value`.
    pub fn store(&self, value: f64, order: Ordering) {
        self.0.store(value.to_bits(), order)
    }

    /// Adds `delta` to the cell, returning the previous value.
    pub fn fetch_add(&self, delta: f64, order: Ordering) -> f64 {
        let mut cur = self.0.load(Ordering::Relaxed);
        loop {
            let new = (f64::from_bits(cur) + delta).to_bits();
            match self.0.compare_exchange_weak(cur, new, order, Ordering::Relaxed) {
                Ok(prev) => return f64::from_bits(prev),
                Err(prev) => cur = prev,
            }
        }
    }

    /// Consumes the cell and returns the contained value.
    pub fn into_inner(self) -> f64 {
        f64::from_bits(self.0.into_inner())
    }
}

impl From<f64> for AtomicF64 {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        assert_eq!(exclusive_scan(&[]), vec![0]);
        assert_eq!(exclusive_scan(&[5]), vec![0, 5]);
        let a: Vec<usize> = (0..10000).map(|i| i % 7).collect();
        let scan = exclusive_scan(&a);
        let mut acc = 0;
        for (i, &x) in a.iter().enumerate() {
            assert_eq!(scan[i], acc);
            acc += x;
        }
        assert_eq!(scan[a.len()], acc);
    }

    #[test]
    fn test_pack() {
        let src: Vec<usize> = (0..10000).collect();
        let even = pack(&src, |&x| x % 2 == 0);
        assert_eq!(even.len(), 5000);
        assert!(even.windows(2).all(|w| w[0] < w[1]));
        assert!(pack(&src, |_| false).is_empty());
        assert_eq!(pack(&src, |_| true), src);
    }

    #[test]
    fn test_pack_index() {
        assert!(pack_index(0, |_| true).is_empty());
        let idx = pack_index(10000, |i| i % 3 == 0);
        assert!(idx.iter().all(|&i| i % 3 == 0));
        assert_eq!(idx.len(), 3334);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_plus_reduce() {
        let a: Vec<u64> = (0..10000).collect();
        assert_eq!(plus_reduce(&a), 9999 * 10000 / 2);
    }

    #[test]
    fn test_atomic_f64() {
        let cell = AtomicF64::new(1.5);
        assert_eq!(cell.load(Ordering::Relaxed), 1.5);
        assert_eq!(cell.fetch_add(2.0, Ordering::Relaxed), 1.5);
        assert_eq!(cell.load(Ordering::Relaxed), 3.5);
        cell.store(0.0, Ordering::Relaxed);
        assert_eq!(cell.into_inner(), 0.0);
    }
}
