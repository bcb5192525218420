/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The bulk operators: edge map and vertex map.
//!
//! Frontier-based algorithms are loops that build a new active set from the
//! previous one by applying [`edge_map`] (over the arcs leaving, or
//! entering, the active set) and [`vertex_map`] (over its members) with
//! user-supplied callbacks. See the [crate-level documentation](crate) for
//! a worked example.

mod edge_map;
mod vertex_map;

pub use edge_map::{edge_map, edge_map_no_output, edge_map_with};
pub use vertex_map::{vertex_for_each, vertex_map};

/// A user-supplied edge operator for [`edge_map`].
///
/// The engine applies the operator to every arc `(s, d)` leaving the input
/// frontier whose destination satisfies [`cond`](EdgeOp::cond), choosing
/// between the two update capabilities according to the traversal plan:
///
/// * [`update`](EdgeOp::update) is invoked when the engine guarantees that
///   no other thread touches `d` concurrently (pull traversal: one thread
///   owns each destination);
/// * [`update_atomic`](EdgeOp::update_atomic) is invoked when concurrent
///   writers to `d` are possible (push traversal) and must update any
///   shared state through atomic operations.
///
/// Both return whether `d` should join the output frontier. The engine does
/// not deduplicate the output: an operator must return true at most once
/// per destination, which is naturally obtained by returning true only on
/// the state transition that "claims" `d` — a successful compare-and-swap
/// from the unvisited state, or a fetch-add whose previous value was zero.
pub trait EdgeOp: Sync {
    /// Returns whether destination `d` is still interesting.
    ///
    /// Used to prune work in both traversal directions; may be evaluated
    /// more than once per candidate destination and must therefore be free
    /// of side effects. The default never prunes.
    fn cond(&self, d: usize) -> bool {
        let _ = d;
        true
    }

    /// Applies the operator to arc `(s, d)` assuming exclusive access to
    /// the state of `d`. Returns whether `d` joins the output frontier.
    fn update(&self, s: usize, d: usize) -> bool;

    /// Applies the operator to arc `(s, d)` under possible concurrent
    /// updates of `d`. Returns whether `d` joins the output frontier.
    fn update_atomic(&self, s: usize, d: usize) -> bool;
}

/// The traversal plan of an [`edge_map`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Choose per call: push, unless the frontier size plus its total
    /// outdegree exceeds the [threshold](EdgeMapOptions::threshold).
    #[default]
    Auto,
    /// Iterate over the arcs leaving the frontier, updating destinations
    /// atomically.
    Push,
    /// Iterate over all destinations, scanning their predecessors for
    /// frontier members; one thread owns each destination.
    Pull,
}

/// Whether an [`edge_map`] call materializes its output frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Materialize and return the new frontier.
    #[default]
    WithOutput,
    /// Run for side effects only and return an empty subset. In this mode
    /// every qualifying arc is visited regardless of the values returned by
    /// the update callbacks, so operators that accumulate over all arcs
    /// (e.g., PageRank) see every contribution.
    NoOutput,
}

/// Options for [`edge_map_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeMapOptions {
    /// The traversal plan.
    pub direction: Direction,
    /// Whether the output frontier is materialized.
    pub output: OutputMode,
    /// The work threshold of the [`Auto`](Direction::Auto) plan; `None`
    /// means one twentieth of the number of arcs.
    pub threshold: Option<u64>,
}
