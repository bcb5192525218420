/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dsi_progress_logger::prelude::*;
use mapgraph::algo::{bc, bfs, rank::PageRank, triangles};
use mapgraph::io::read_graph;
use mapgraph::NO_NODE;
use std::path::PathBuf;

#[derive(Args, Debug)]
struct GraphArgs {
    /// The graph file (text adjacency format), or the basename of the
    /// .config/.idx/.adj triple with --binary.
    path: PathBuf,
    /// The graph is symmetric: the file contains both orientations of each
    /// edge and a single adjacency side is built.
    #[arg(short = 's', long)]
    symmetric: bool,
    /// Read the binary three-file format instead of the text format.
    #[arg(short = 'b', long)]
    binary: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Frontier-based parallel graph algorithms.", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Computes a breadth-first tree and reports the number of reached nodes.
    Bfs {
        #[command(flatten)]
        graph: GraphArgs,
        /// The root node.
        #[arg(short = 'r', long, default_value_t = 0)]
        root: usize,
    },
    /// Computes single-source betweenness dependency scores.
    Bc {
        #[command(flatten)]
        graph: GraphArgs,
        /// The root node.
        #[arg(short = 'r', long, default_value_t = 0)]
        root: usize,
    },
    /// Computes PageRank by damped power iteration.
    Pagerank {
        #[command(flatten)]
        graph: GraphArgs,
        /// The damping factor.
        #[arg(long, default_value_t = PageRank::DEFAULT_DAMPING)]
        damping: f64,
        /// The L1 stopping tolerance.
        #[arg(long, default_value_t = PageRank::DEFAULT_TOLERANCE)]
        tolerance: f64,
        /// The iteration cap.
        #[arg(long, default_value_t = PageRank::DEFAULT_MAX_ITERS)]
        max_iters: usize,
    },
    /// Counts the triangles of a symmetric graph.
    Triangles {
        #[command(flatten)]
        graph: GraphArgs,
    },
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;

    let cli = Cli::parse();
    let mut pl = ProgressLogger::default();

    match cli.command {
        Command::Bfs { graph, root } => {
            let g = read_graph(&graph.path, graph.symmetric, graph.binary, &mut pl)?;
            pl.start("Visiting...");
            let parents = bfs::parents(&g, root);
            pl.done_with_count(g.num_nodes());
            let reached = parents.iter().filter(|&&p| p != NO_NODE).count();
            println!("Reached {reached} of {} nodes from root {root}", g.num_nodes());
        }
        Command::Bc { graph, root } => {
            let mut g = read_graph(&graph.path, graph.symmetric, graph.binary, &mut pl)?;
            pl.start("Computing dependency scores...");
            let scores = bc::betweenness(&mut g, root);
            pl.done_with_count(g.num_nodes());
            let (argmax, max) = scores
                .iter()
                .enumerate()
                .fold((0, 0.0), |acc, (v, &x)| if x > acc.1 { (v, x) } else { acc });
            println!("Highest dependency score from root {root}: {max} (node {argmax})");
        }
        Command::Pagerank {
            graph,
            damping,
            tolerance,
            max_iters,
        } => {
            let g = read_graph(&graph.path, graph.symmetric, graph.binary, &mut pl)?;
            let mut pr = PageRank::new(&g);
            pr.damping(damping).tolerance(tolerance).max_iters(max_iters);
            pl.start("Computing PageRank...");
            pr.run();
            pl.done_with_count(pr.iterations());
            let (argmax, max) = pr
                .rank()
                .iter()
                .enumerate()
                .fold((0, 0.0), |acc, (v, &x)| if x > acc.1 { (v, x) } else { acc });
            println!(
                "Converged in {} iterations; highest rank: {max} (node {argmax})",
                pr.iterations()
            );
        }
        Command::Triangles { graph } => {
            let g = read_graph(&graph.path, graph.symmetric, graph.binary, &mut pl)?;
            pl.start("Counting triangles...");
            let count = triangles::count(&g);
            pl.done_with_count(g.num_nodes());
            println!("Triangle count: {count}");
        }
    }
    Ok(())
}
