/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use mapgraph::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_constructors() {
    let s = VertexSubset::empty(10);
    assert_eq!(s.universe(), 10);
    assert_eq!(s.len(), 0);
    assert!(s.is_empty());

    let s = VertexSubset::singleton(10, 3);
    assert_eq!(s.len(), 1);
    assert!(s.contains(3));
    assert!(!s.contains(4));

    let s = VertexSubset::full(10);
    assert_eq!(s.len(), 10);
    assert!(s.is_dense());
    assert!((0..10).all(|v| s.contains(v)));

    let s = VertexSubset::from_sparse(10, vec![9, 0, 4]);
    assert_eq!(s.len(), 3);
    assert!(s.contains(9) && s.contains(0) && s.contains(4));
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_singleton_out_of_bounds() {
    VertexSubset::singleton(10, 10);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_from_sparse_out_of_bounds() {
    VertexSubset::from_sparse(10, vec![3, 10]);
}

/// Round-trips through both encodings must preserve the element set
/// ("encoding round-trip" property).
#[test]
fn test_encoding_round_trip() {
    let mut rng = SmallRng::seed_from_u64(0);
    for n in [1, 10, 1000, 10000] {
        let members: Vec<usize> = (0..n).filter(|_| rng.random::<f64>() < 0.3).collect();
        let mut s = VertexSubset::from_sparse(n, members.clone());

        s.to_dense();
        assert!(s.is_dense());
        assert_eq!(s.len(), members.len());
        let sparse: Vec<usize> = s.to_sparse().to_vec();
        assert!(!s.is_dense());
        // Conversion out of a bitmap produces ascending identifiers.
        assert_eq!(sparse, members);

        // Converting an already-converted subset is the identity.
        s.to_sparse();
        s.to_dense();
        s.to_dense();
        assert_eq!(s.len(), members.len());
        for &v in &members {
            assert!(s.contains(v));
        }
    }
}

#[test]
fn test_from_dense_counts_members() {
    use std::sync::atomic::Ordering;
    use sux::bits::AtomicBitVec;

    let bits = AtomicBitVec::new(5000);
    for v in (0..5000).step_by(7) {
        bits.set(v, true, Ordering::Relaxed);
    }
    let s = VertexSubset::from_dense(5000, bits);
    assert_eq!(s.universe(), 5000);
    assert_eq!(s.len(), 5000usize.div_ceil(7));
}

/// `vertex_map` keeps exactly the members satisfying the predicate, in
/// both encodings ("vertex-map filter" property).
#[test]
fn test_vertex_map_filter() {
    let n = 2000;
    let members: Vec<usize> = (0..n).step_by(3).collect();

    let sparse = VertexSubset::from_sparse(n, members.clone());
    let mut out = vertex_map(&sparse, |v| v % 2 == 0);
    assert!(out.len() <= sparse.len());
    let mut nodes = out.to_sparse().to_vec();
    nodes.sort();
    let expected: Vec<usize> = members.iter().copied().filter(|v| v % 2 == 0).collect();
    assert_eq!(nodes, expected);

    let mut dense = VertexSubset::from_sparse(n, members.clone());
    dense.to_dense();
    let mut out = vertex_map(&dense, |v| v % 2 == 0);
    assert!(out.is_dense());
    let mut nodes = out.to_sparse().to_vec();
    nodes.sort();
    assert_eq!(nodes, expected);
}

#[test]
fn test_vertex_for_each_visits_every_member() {
    let n = 1000;
    let members: Vec<usize> = (0..n).step_by(3).collect();
    let hits: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();

    let mut s = VertexSubset::from_sparse(n, members.clone());
    vertex_for_each(&s, |v| {
        hits[v].fetch_add(1, Ordering::Relaxed);
    });
    s.to_dense();
    vertex_for_each(&s, |v| {
        hits[v].fetch_add(1, Ordering::Relaxed);
    });

    for v in 0..n {
        let expected = if v % 3 == 0 { 2 } else { 0 };
        assert_eq!(hits[v].load(Ordering::Relaxed), expected);
    }
}
