//! # Conversion Pipeline
//!
//! The orchestrator that wires the components into the strictly two-phase
//! run:
//!
//! 1. **Extraction** — stream the export through the tokenizer and the
//!    extraction state machine; each completed revision has its blob
//!    written to the output immediately and its commit descriptor parked
//!    in the spool, keyed by timestamp. Fully interleaved with input
//!    arrival; a configured revision cap stops consumption early.
//! 2. **Ordered drain** — only after the source is exhausted (a
//!    later-arriving revision may predate everything seen so far, so the
//!    ordering guarantee cannot be provided incrementally), the emitter
//!    drains the spool in ascending-timestamp order and chains the
//!    commits.
//!
//! The pipeline is generic over `BufRead` input and `Write` output so the
//! whole conversion can run against in-memory buffers in tests.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::blacklist::Blacklist;
use crate::commit::CommitFormatter;
use crate::emit;
use crate::error::{Error, Result};
use crate::extract::{Extractor, Outcome};
use crate::progress::Progress;
use crate::record::Stats;
use crate::spool::OrderedSpool;
use crate::xml::{Event, Reader};

/// Committer identity used when the caller does not configure one.
pub const DEFAULT_COMMITTER: &str = "wiki2git <wiki2git@localhost>";

/// Conversion options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Committer identity (`Name <email>`) for the generated commits.
    pub committer: String,
    /// Directory levels derived from a title's leading bytes.
    pub deepness: u32,
    /// Stop extracting after this many revisions; `None` means all.
    pub max_revisions: Option<u64>,
    /// Expected total number of revisions, for the ETA display only.
    pub revision_hint: Option<u64>,
    /// Auxiliary spool file; set to trade memory for I/O on huge exports.
    pub spool_path: Option<PathBuf>,
    /// Date commits at the revision's own time instead of the wall clock.
    pub wikitime: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            committer: DEFAULT_COMMITTER.to_string(),
            deepness: 3,
            max_revisions: None,
            revision_hint: None,
            spool_path: None,
            wikitime: false,
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Commits written in phase 2.
    pub commits_written: u64,
    /// Extraction counters.
    pub stats: Stats,
}

/// Convert one export stream into a fast-import command stream.
///
/// Writes blob commands as revisions are extracted and commit commands
/// after the source is exhausted. All diagnostics go through `log`; the
/// output stream receives nothing but the command stream.
pub fn run<R: BufRead, W: Write>(
    options: &Options,
    blacklist: &Blacklist,
    input: R,
    output: &mut W,
) -> Result<Summary> {
    let mut reader = Reader::new(input);
    let mut extractor = Extractor::new(blacklist);
    let formatter = CommitFormatter::new(&options.committer, options.deepness, options.wikitime);
    let mut spool = match &options.spool_path {
        Some(path) => OrderedSpool::on_disk(path)?,
        None => OrderedSpool::in_memory(),
    };
    // With a cap but no hint, the cap is the best available ETA basis.
    let progress = Progress::new(options.revision_hint.or(options.max_revisions));
    let cap = options.max_revisions.unwrap_or(u64::MAX);

    log::info!("step 1: extracting revisions and writing blobs");
    let mut capped = false;
    loop {
        if extractor.stats().revisions_read >= cap {
            capped = true;
            break;
        }
        let position = reader.position();
        let event = reader.next_event()?;
        if event == Event::Eof {
            break;
        }
        match extractor.handle(event, position)? {
            Outcome::Nothing => {}
            Outcome::NewPage => {
                progress.on_page(extractor.page_title());
                if extractor.page_skipped() {
                    log::debug!("page '{}' is blacklisted, ignoring", extractor.page_title());
                }
            }
            Outcome::Completed(record) => {
                let date = record.epoch_seconds()?;
                let descriptor = formatter.descriptor(&record, date)?;
                formatter.write_blob(output, &record)?;
                spool.insert(date, descriptor)?;
                let stats = extractor.stats();
                progress.on_revisions(stats.revisions_read + stats.ignored_revisions);
            }
        }
    }
    progress.finish();

    if !capped && extractor.depth() != 0 {
        let position = reader.position();
        return Err(Error::Parse {
            message: "unexpected end of input inside an open element".to_string(),
            line: position.line,
            offset: position.offset,
        });
    }

    let stats = extractor.stats();
    if spool.is_empty() {
        log::info!("no revisions read");
        // Still runs the drain so a disk-backed spool cleans up its file.
        spool.drain(0, |_| Ok(()))?;
        return Ok(Summary {
            commits_written: 0,
            stats,
        });
    }

    log::info!("step 2: writing {} commits", spool.len().min(cap));
    let commits_written = emit::emit(output, spool, cap)?;
    output.flush()?;
    log::info!(
        "processed {} revisions in {:.1}s",
        commits_written,
        progress.elapsed().as_secs_f64()
    );
    Ok(Summary {
        commits_written,
        stats,
    })
}
