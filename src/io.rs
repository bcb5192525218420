/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph loaders.
//!
//! Two on-disk formats are supported:
//!
//! * a *text* adjacency format: the literal token `AdjacencyGraph` (or
//!   `WeightedAdjacencyGraph`), the number of nodes *n*, the number of
//!   arcs *m*, then *n* offsets into the successor list, then *m*
//!   successor identifiers (followed by *m* integer weights in the
//!   weighted case);
//! * a *binary* three-file format: `<basename>.config` holds *n* in text,
//!   `<basename>.idx` holds *n* offsets as native-endian 64-bit words, and
//!   `<basename>.adj` holds the successors as 32-bit unsigned integers
//!   (*m* is implied by the file length, and `idx[n] = m` is implied).
//!   The two array files are memory-mapped.
//!
//! Both loaders validate sizes, ranges, and offset monotonicity, and
//! surface failures as [`anyhow`] errors with context; neither assumes the
//! successor lists on disk are sorted (the [`CsrGraph`] constructors
//! restore that invariant).

use crate::graph::CsrGraph;
use anyhow::{bail, ensure, Context, Result};
use dsi_progress_logger::prelude::*;
use mmap_rs::Mmap;
use std::path::{Path, PathBuf};

/// Reads a graph in the text adjacency format.
///
/// If `symmetric` is true the file is taken to already contain both
/// orientations of each edge, and a single adjacency side is built.
pub fn read_adjacency_graph(
    path: impl AsRef<Path>,
    symmetric: bool,
    pl: &mut impl ProgressLog,
) -> Result<CsrGraph> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let mut tokens = data.split_ascii_whitespace();

    let header = tokens.next().context("Missing header token")?;
    let weighted = match header {
        "AdjacencyGraph" => false,
        "WeightedAdjacencyGraph" => true,
        _ => bail!(
            "Bad header {header:?}: expected \"AdjacencyGraph\" or \"WeightedAdjacencyGraph\""
        ),
    };
    let num_nodes: usize = tokens
        .next()
        .context("Missing number of nodes")?
        .parse()
        .context("Invalid number of nodes")?;
    let num_arcs: usize = tokens
        .next()
        .context("Missing number of arcs")?
        .parse()
        .context("Invalid number of arcs")?;

    pl.item_name("node");
    pl.expected_updates(Some(num_nodes));
    pl.start(format!("Reading {}...", path.display()));

    let mut offsets = Vec::with_capacity(num_nodes + 1);
    for node in 0..num_nodes {
        let offset: usize = tokens
            .next()
            .with_context(|| format!("Missing offset of node {node}"))?
            .parse()
            .with_context(|| format!("Invalid offset of node {node}"))?;
        ensure!(
            offset <= num_arcs,
            "Offset {offset} of node {node} beyond the number of arcs ({num_arcs})"
        );
        if let Some(&prev) = offsets.last() {
            ensure!(
                prev <= offset,
                "Offsets are not nondecreasing at node {node} ({prev} > {offset})"
            );
        }
        offsets.push(offset);
        pl.light_update();
    }
    offsets.push(num_arcs);

    let mut succ = Vec::with_capacity(num_arcs);
    for arc in 0..num_arcs {
        let dst: usize = tokens
            .next()
            .with_context(|| format!("Missing destination of arc {arc}"))?
            .parse()
            .with_context(|| format!("Invalid destination of arc {arc}"))?;
        ensure!(
            dst < num_nodes,
            "Destination {dst} of arc {arc} out of bounds for {num_nodes} nodes"
        );
        succ.push(dst);
    }

    let weights = if weighted {
        let mut weights = Vec::with_capacity(num_arcs);
        for arc in 0..num_arcs {
            let weight: i64 = tokens
                .next()
                .with_context(|| format!("Missing weight of arc {arc}"))?
                .parse()
                .with_context(|| format!("Invalid weight of arc {arc}"))?;
            weights.push(weight);
        }
        Some(weights)
    } else {
        None
    };
    ensure!(tokens.next().is_none(), "Trailing tokens after the arc data");

    pl.done();
    Ok(CsrGraph::from_csr(offsets, succ, weights, symmetric))
}

/// Memory-maps a file, or returns `None` for an empty one.
fn mmap_file(path: &Path) -> Result<Option<Mmap>> {
    let file_len = path
        .metadata()
        .with_context(|| format!("Cannot stat {}", path.display()))?
        .len();
    if file_len == 0 {
        return Ok(None);
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    let mmap = unsafe {
        mmap_rs::MmapOptions::new(file_len as _)?
            .with_file(&file, 0)
            .map()
            .with_context(|| format!("Cannot mmap {} (size {file_len})", path.display()))?
    };
    Ok(Some(mmap))
}

/// Reads a graph in the binary three-file format.
pub fn read_binary_graph(
    basename: impl AsRef<Path>,
    symmetric: bool,
    pl: &mut impl ProgressLog,
) -> Result<CsrGraph> {
    let basename = basename.as_ref();
    let with_ext = |ext: &str| {
        let mut name = basename.as_os_str().to_owned();
        name.push(ext);
        PathBuf::from(name)
    };
    let config_path = with_ext(".config");
    let idx_path = with_ext(".idx");
    let adj_path = with_ext(".adj");

    let num_nodes: usize = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Cannot read {}", config_path.display()))?
        .trim()
        .parse()
        .with_context(|| format!("Invalid number of nodes in {}", config_path.display()))?;

    pl.start(format!("Mapping {}...", basename.display()));

    let idx = mmap_file(&idx_path)?;
    let idx_bytes: &[u8] = idx.as_ref().map(|m| m.as_ref()).unwrap_or(&[]);
    ensure!(
        idx_bytes.len() == num_nodes * 8,
        "Index file {} has {} bytes, expected {} for {num_nodes} nodes",
        idx_path.display(),
        idx_bytes.len(),
        num_nodes * 8
    );

    let adj = mmap_file(&adj_path)?;
    let adj_bytes: &[u8] = adj.as_ref().map(|m| m.as_ref()).unwrap_or(&[]);
    ensure!(
        adj_bytes.len() % 4 == 0,
        "Adjacency file {} has {} bytes, not a multiple of 4",
        adj_path.display(),
        adj_bytes.len()
    );
    let num_arcs = adj_bytes.len() / 4;

    let mut offsets = Vec::with_capacity(num_nodes + 1);
    for (node, chunk) in idx_bytes.chunks_exact(8).enumerate() {
        let offset = u64::from_ne_bytes(chunk.try_into().unwrap()) as usize;
        ensure!(
            offset <= num_arcs,
            "Offset {offset} of node {node} beyond the number of arcs ({num_arcs})"
        );
        if let Some(&prev) = offsets.last() {
            ensure!(
                prev <= offset,
                "Offsets are not nondecreasing at node {node} ({prev} > {offset})"
            );
        }
        offsets.push(offset);
    }
    offsets.push(num_arcs);

    let mut succ = Vec::with_capacity(num_arcs);
    for (arc, chunk) in adj_bytes.chunks_exact(4).enumerate() {
        let dst = u32::from_ne_bytes(chunk.try_into().unwrap()) as usize;
        ensure!(
            dst < num_nodes,
            "Destination {dst} of arc {arc} out of bounds for {num_nodes} nodes"
        );
        succ.push(dst);
    }

    pl.done_with_count(num_nodes);
    Ok(CsrGraph::from_csr(offsets, succ, None, symmetric))
}

/// Reads a graph from `path`, dispatching on the format.
pub fn read_graph(
    path: impl AsRef<Path>,
    symmetric: bool,
    binary: bool,
    pl: &mut impl ProgressLog,
) -> Result<CsrGraph> {
    if binary {
        read_binary_graph(path, symmetric, pl)
    } else {
        read_adjacency_graph(path, symmetric, pl)
    }
}
