/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph algorithms written against the bulk-operator API.
//!
//! These are the standard clients of [`edge_map`](crate::ops::edge_map)
//! and [`vertex_map`](crate::ops::vertex_map): each allocates its own
//! per-node arrays and passes them to the engine inside a small edge
//! operator.

pub mod bc;
pub mod bfs;
pub mod rank;
pub mod triangles;
