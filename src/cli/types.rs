//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ragline")]
#[command(about = "ragline - chunk, embed and retrieve documents for RAG", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .ragline/config.yaml and .ragline/local.yaml)
    #[arg(short, long, global = true, env = "RAGLINE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk, embed and store text files
    Ingest {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Override chunking.chunk_size
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Override chunking.overlap
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Retrieve the chunks most relevant to a question
    Query {
        /// Question text (positional argument)
        question: String,

        /// Number of chunks to retrieve (defaults to retrieval.top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Metadata filter as key=value; repeat to require several
        #[arg(short, long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Print the augmented prompt instead of the result table
        #[arg(short, long)]
        prompt: bool,
    },

    /// Show the store backend and record count
    Stats,

    /// Print the effective configuration
    Config,
}
