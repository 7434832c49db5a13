// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the minidex command-line interface.
//!
//! Four subcommands: `index` builds a snapshot from a directory of JSON
//! documents, `search` queries a snapshot and prints ranked results,
//! `suggest` runs autosuggest against a snapshot, and `inspect` prints a
//! snapshot's structure and stats.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "minidex", about = "In-memory full-text search engine", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a snapshot from a directory of JSON document files
    Index {
        /// Input directory containing one JSON document per file
        #[arg(short, long)]
        input: String,

        /// Path to a JSON config file declaring fields (see EngineOptions)
        #[arg(short, long)]
        config: String,

        /// Output path for the snapshot file
        #[arg(short, long)]
        output: String,
    },

    /// Query a snapshot and print ranked results
    Search {
        /// Path to a snapshot file produced by `index`
        snapshot: String,

        /// Search query (boolean grammar: word/"exact phrase"/AND/OR)
        query: String,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Run autosuggest against a snapshot
    Suggest {
        /// Path to a snapshot file produced by `index`
        snapshot: String,

        /// Partial query to complete
        input: String,

        /// Maximum number of suggestions to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print a snapshot's structure and stats
    Inspect {
        /// Path to a snapshot file
        snapshot: String,
    },
}
