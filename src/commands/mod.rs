//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `wiki2git` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args`, calls into the
//!   `wiki2git` library to perform the core logic, and reports the
//!   outcome.

pub mod completions;
pub mod convert;
