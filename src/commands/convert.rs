//! Convert command implementation
//!
//! Streams an export (file or stdin) through the two-phase conversion
//! pipeline and writes the fast-import command stream to stdout. The
//! typical invocation pipes straight into the importer:
//!
//! ```text
//! bzcat dump.xml.bz2 | wiki2git convert | GIT_DIR=repo git fast-import
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use wiki2git::blacklist::Blacklist;
use wiki2git::pipeline::{self, Options, DEFAULT_COMMITTER};

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Export file to read (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Committer identity used for the generated commits
    #[arg(
        short,
        long,
        value_name = "IDENT",
        env = "WIKI2GIT_COMMITTER",
        default_value = DEFAULT_COMMITTER
    )]
    pub committer: String,

    /// Directory levels derived from a title's leading characters
    #[arg(short, long, value_name = "N", default_value_t = 3)]
    pub deepness: u32,

    /// Maximum number of revisions (not pages!) to import (0 = all)
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub max_revisions: u64,

    /// Total number of revisions in the export (used to calculate the ETA)
    #[arg(short, long, value_name = "N")]
    pub revision_count: Option<u64>,

    /// Spool commit metadata to this file to minimize RAM usage
    #[arg(short = 't', long, value_name = "PATH", env = "WIKI2GIT_SPOOL")]
    pub spool: Option<PathBuf>,

    /// Namespace blacklist file (one namespace per line, # comments)
    #[arg(short, long, value_name = "PATH")]
    pub blacklist: Option<PathBuf>,

    /// Date commits at the revision's own time instead of the current time
    #[arg(short, long)]
    pub wikitime: bool,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    let started = Instant::now();

    let blacklist = match &args.blacklist {
        Some(path) => Blacklist::from_file(path),
        None => Blacklist::empty(),
    };

    let options = Options {
        committer: args.committer.clone(),
        deepness: args.deepness,
        max_revisions: (args.max_revisions > 0).then_some(args.max_revisions),
        revision_hint: args.revision_count,
        spool_path: args.spool.clone(),
        wikitime: args.wikitime,
    };

    let stdout = io::stdout().lock();
    let mut output = BufWriter::new(stdout);

    let summary = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("can't open export file '{}'", path.display()))?;
            pipeline::run(&options, &blacklist, BufReader::new(file), &mut output)?
        }
        None => {
            let stdin = io::stdin().lock();
            pipeline::run(&options, &blacklist, stdin, &mut output)?
        }
    };

    let elapsed = started.elapsed();
    if summary.commits_written == 0 {
        log::warn!("no revisions read; nothing to import");
    } else {
        log::info!(
            "processed {} revisions ({} pages) in {:.1}s",
            summary.commits_written,
            summary.stats.pages_seen,
            elapsed.as_secs_f64()
        );
    }
    if summary.stats.ignored_pages > 0 {
        log::info!(
            "ignored {} blacklisted pages ({} revisions)",
            summary.stats.ignored_pages,
            summary.stats.ignored_revisions
        );
    }

    Ok(())
}
