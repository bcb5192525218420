/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Immutable graphs in compressed-sparse-row form.
//!
//! A [`CsrGraph`] stores, for every node, a contiguous sorted slice of
//! successors and (for directed graphs) a contiguous sorted slice of
//! predecessors. Directed graphs can be [transposed](CsrGraph::transpose)
//! in constant time by swapping the role of the two adjacency sides;
//! symmetric graphs store a single side that serves both.

use rayon::prelude::*;

/// One side of the adjacency structure: per-node offsets into a flat
/// successor array, plus optional parallel arc weights.
struct Adjacency {
    /// `offsets[u]..offsets[u + 1]` delimits the successors of `u`;
    /// `offsets.len()` is `num_nodes + 1`.
    offsets: Box<[usize]>,
    succ: Box<[usize]>,
    weights: Option<Box<[i64]>>,
}

impl Adjacency {
    fn degree(&self, node: usize) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }

    fn successors(&self, node: usize) -> &[usize] {
        &self.succ[self.offsets[node]..self.offsets[node + 1]]
    }

    fn weights(&self, node: usize) -> Option<&[i64]> {
        self.weights
            .as_ref()
            .map(|w| &w[self.offsets[node]..self.offsets[node + 1]])
    }
}

/// Builds one adjacency side from an unsorted arc list.
///
/// Sorts the arcs by source and then by destination, so successor lists
/// come out sorted ascending. Parallel arcs are kept.
fn build_adjacency(num_nodes: usize, mut arcs: Vec<(usize, usize)>) -> Adjacency {
    arcs.par_sort_unstable();
    let mut offsets = vec![0; num_nodes + 1];
    for &(src, _) in &arcs {
        offsets[src + 1] += 1;
    }
    for u in 0..num_nodes {
        offsets[u + 1] += offsets[u];
    }
    let succ = arcs.into_iter().map(|(_, dst)| dst).collect();
    Adjacency {
        offsets: offsets.into_boxed_slice(),
        succ,
        weights: None,
    }
}

/// Weighted variant of [`build_adjacency`]; arcs are `(src, dst, weight)`.
fn build_weighted_adjacency(num_nodes: usize, mut arcs: Vec<(usize, usize, i64)>) -> Adjacency {
    arcs.par_sort_unstable();
    let mut offsets = vec![0; num_nodes + 1];
    for &(src, _, _) in &arcs {
        offsets[src + 1] += 1;
    }
    for u in 0..num_nodes {
        offsets[u + 1] += offsets[u];
    }
    let mut succ = Vec::with_capacity(arcs.len());
    let mut weights = Vec::with_capacity(arcs.len());
    for (_, dst, w) in arcs {
        succ.push(dst);
        weights.push(w);
    }
    Adjacency {
        offsets: offsets.into_boxed_slice(),
        succ: succ.into_boxed_slice(),
        weights: Some(weights.into_boxed_slice()),
    }
}

/// An immutable graph in compressed-sparse-row form.
///
/// Node identifiers go from 0 to `num_nodes − 1`. Successor and predecessor
/// lists are sorted ascending; this is a constructor-established invariant
/// that merge-based algorithms (e.g.,
/// [triangle counting](crate::algo::triangles)) rely on.
///
/// Symmetric graphs store one adjacency side; for them
/// [`transpose`](Self::transpose) is a no-op and predecessors coincide
/// with successors.
///
/// # Examples
///
/// ```
/// use mapgraph::graph::CsrGraph;
///
/// let g = CsrGraph::from_arcs(4, [(0, 1), (0, 2), (2, 1), (3, 0)]);
/// assert_eq!(g.num_nodes(), 4);
/// assert_eq!(g.num_arcs(), 4);
/// assert_eq!(g.successors(0), &[1, 2]);
/// assert_eq!(g.predecessors(1), &[0, 2]);
///
/// let mut g = g;
/// g.transpose();
/// assert_eq!(g.successors(1), &[0, 2]);
/// g.transpose();
/// assert_eq!(g.successors(0), &[1, 2]);
/// ```
pub struct CsrGraph {
    num_arcs: u64,
    outgoing: Adjacency,
    /// `None` for symmetric graphs, where `outgoing` serves both sides.
    incoming: Option<Adjacency>,
    transposed: bool,
}

impl CsrGraph {
    /// Creates a directed graph from an arc list.
    ///
    /// Both adjacency sides are materialized, so the graph supports
    /// predecessor enumeration and constant-time
    /// [`transpose`](Self::transpose).
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is not smaller than `num_nodes`.
    pub fn from_arcs(num_nodes: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let arcs: Vec<(usize, usize)> = arcs.into_iter().collect();
        for &(src, dst) in &arcs {
            assert!(
                src < num_nodes && dst < num_nodes,
                "Arc ({src}, {dst}) out of bounds for {num_nodes} nodes"
            );
        }
        let reversed: Vec<(usize, usize)> = arcs.par_iter().map(|&(src, dst)| (dst, src)).collect();
        let num_arcs = arcs.len() as u64;
        Self {
            num_arcs,
            outgoing: build_adjacency(num_nodes, arcs),
            incoming: Some(build_adjacency(num_nodes, reversed)),
            transposed: false,
        }
    }

    /// Creates a symmetric graph from an arc list.
    ///
    /// The arc set is closed under reversal and deduplicated, so each input
    /// edge `{u, v}` appears as both `(u, v)` and `(v, u)` exactly once;
    /// [`num_arcs`](Self::num_arcs) counts both orientations.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is not smaller than `num_nodes`.
    pub fn symmetric_from_arcs(
        num_nodes: usize,
        arcs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut all: Vec<(usize, usize)> = Vec::new();
        for (src, dst) in arcs {
            assert!(
                src < num_nodes && dst < num_nodes,
                "Arc ({src}, {dst}) out of bounds for {num_nodes} nodes"
            );
            all.push((src, dst));
            if src != dst {
                all.push((dst, src));
            }
        }
        all.par_sort_unstable();
        all.dedup();
        let num_arcs = all.len() as u64;
        Self {
            num_arcs,
            outgoing: build_adjacency(num_nodes, all),
            incoming: None,
            transposed: false,
        }
    }

    /// Creates a graph directly from CSR arrays, as produced by the
    /// [loaders](crate::io).
    ///
    /// `offsets` has length `num_nodes + 1` and must be nondecreasing with
    /// `offsets[num_nodes] == succ.len()`; callers validate this. For
    /// directed graphs the incoming side is derived by reversing the arcs.
    pub(crate) fn from_csr(
        offsets: Vec<usize>,
        succ: Vec<usize>,
        weights: Option<Vec<i64>>,
        symmetric: bool,
    ) -> Self {
        let num_nodes = offsets.len() - 1;
        let num_arcs = succ.len() as u64;
        // Route both sides through the arc-list builders so the sortedness
        // invariant holds whatever order the file stored.
        let side = |reverse: bool| {
            match &weights {
                None => {
                    let mut arcs = Vec::with_capacity(succ.len());
                    for src in 0..num_nodes {
                        for &dst in &succ[offsets[src]..offsets[src + 1]] {
                            arcs.push(if reverse { (dst, src) } else { (src, dst) });
                        }
                    }
                    build_adjacency(num_nodes, arcs)
                }
                Some(w) => {
                    let mut arcs = Vec::with_capacity(succ.len());
                    for src in 0..num_nodes {
                        for i in offsets[src]..offsets[src + 1] {
                            arcs.push(if reverse {
                                (succ[i], src, w[i])
                            } else {
                                (src, succ[i], w[i])
                            });
                        }
                    }
                    build_weighted_adjacency(num_nodes, arcs)
                }
            }
        };
        Self {
            num_arcs,
            outgoing: side(false),
            incoming: if symmetric { None } else { Some(side(true)) },
            transposed: false,
        }
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.outgoing.offsets.len() - 1
    }

    /// Returns the number of arcs.
    ///
    /// For symmetric graphs both orientations of each edge are counted.
    pub fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    /// Returns whether the graph is symmetric (a single adjacency side
    /// serves both directions).
    pub fn is_symmetric(&self) -> bool {
        self.incoming.is_none()
    }

    fn forward(&self) -> &Adjacency {
        if self.transposed {
            self.incoming.as_ref().unwrap_or(&self.outgoing)
        } else {
            &self.outgoing
        }
    }

    fn backward(&self) -> &Adjacency {
        if self.transposed {
            &self.outgoing
        } else {
            self.incoming.as_ref().unwrap_or(&self.outgoing)
        }
    }

    /// Returns the outdegree of `node`.
    pub fn outdegree(&self, node: usize) -> usize {
        self.forward().degree(node)
    }

    /// Returns the indegree of `node`.
    pub fn indegree(&self, node: usize) -> usize {
        self.backward().degree(node)
    }

    /// Returns the successors of `node`, sorted ascending.
    pub fn successors(&self, node: usize) -> &[usize] {
        self.forward().successors(node)
    }

    /// Returns the predecessors of `node`, sorted ascending.
    pub fn predecessors(&self, node: usize) -> &[usize] {
        self.backward().successors(node)
    }

    /// Returns the weights of the arcs leaving `node`, aligned with
    /// [`successors`](Self::successors), or `None` for unweighted graphs.
    pub fn successor_weights(&self, node: usize) -> Option<&[i64]> {
        self.forward().weights(node)
    }

    /// Logically transposes the graph by swapping the role of the two
    /// adjacency sides.
    ///
    /// Runs in constant time; indegrees and outdegrees swap, and
    /// [`num_arcs`](Self::num_arcs) is unchanged. Transposing twice is the
    /// identity. On symmetric graphs this is a no-op.
    pub fn transpose(&mut self) {
        if self.incoming.is_some() {
            self.transposed = !self.transposed;
        }
    }
}
