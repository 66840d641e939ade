//! # wiki2git CLI
//!
//! This is the binary entry point for the `wiki2git` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors and translating them into a
//!   non-zero exit status with a diagnostic on stderr.
//!
//! The core conversion logic is defined in the `lib.rs` library crate,
//! ensuring that the binary is a thin wrapper around the reusable library
//! functionality. Only the fast-import command stream is ever written to
//! stdout; diagnostics and progress stay on stderr.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
