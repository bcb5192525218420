/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]

pub mod algo;
pub mod graph;
pub mod io;
pub mod ops;
pub mod par;
pub mod subset;

/// Sentinel node identifier meaning "no node" (e.g., an unvisited vertex in a
/// parents array, or an empty slot in a scratch buffer).
///
/// Since node identifiers live in `[0, n)` and a graph with `usize::MAX`
/// nodes cannot be represented, this value can never clash with a real node.
pub const NO_NODE: usize = usize::MAX;

pub mod prelude {
    pub use crate::graph::CsrGraph;
    pub use crate::ops::{
        edge_map, edge_map_no_output, edge_map_with, vertex_for_each, vertex_map, Direction,
        EdgeMapOptions, EdgeOp, OutputMode,
    };
    pub use crate::subset::VertexSubset;
    pub use crate::NO_NODE;
}
