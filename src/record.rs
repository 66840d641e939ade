//! # Extraction Data Model
//!
//! This module defines the state the extractor assembles while walking the
//! export stream:
//!
//! - **`RevisionRecord`**: one historical version of one page, built
//!   field-by-field as the extractor descends into a revision's
//!   sub-elements and consumed exactly once when the revision closes.
//!
//! - **`PageContext`**: the page-level fields carried across all revisions
//!   of the current page, reset whenever a new page's title is observed.
//!
//! - **`Stats`**: run counters used for progress reporting and the final
//!   summary.
//!
//! Identifiers coming out of the export are kept verbatim as strings. The
//! two places where a value is interpreted numerically — the timestamp and
//! the revision id — live here as explicit, fallible conversions.

use chrono::NaiveDateTime;

use crate::error::{Error, Result};

/// Lexical timestamp format used throughout an export: `2009-12-01T12:09:31Z`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const TIMESTAMP_LEN: usize = 20;

/// One historical version of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevisionRecord {
    /// Page identifier, verbatim from the export.
    pub page_id: String,
    /// Revision identifier, verbatim; unique across the whole export.
    pub revision_id: String,
    /// Contributor identifier, verbatim; empty for anonymous edits.
    pub contributor_id: String,
    /// Page title with any namespace prefix already split off.
    pub title: String,
    /// Namespace prefix of the title, empty when the title had none.
    pub title_namespace: String,
    /// Registered author name; empty for anonymous edits.
    pub username: String,
    /// Anonymous author IP; empty for registered edits.
    pub ip: String,
    /// Lexical timestamp, exactly [`TIMESTAMP_LEN`] characters.
    pub timestamp: String,
    /// Edit summary, becomes part of the commit message.
    pub comment: String,
    /// Page content at this revision, becomes the blob payload.
    pub text: String,
    /// Minor-edit flag.
    pub is_minor: bool,
}

impl RevisionRecord {
    /// Whether this revision was made by an anonymous (IP) contributor.
    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
    }

    /// Parse the lexical timestamp into epoch seconds (UTC).
    ///
    /// The export always carries the fixed 20-character form; any other
    /// length or shape is a hard error.
    pub fn epoch_seconds(&self) -> Result<i64> {
        if self.timestamp.len() != TIMESTAMP_LEN {
            return Err(Error::Timestamp {
                value: self.timestamp.clone(),
            });
        }
        let parsed = NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).map_err(
            |_| Error::Timestamp {
                value: self.timestamp.clone(),
            },
        )?;
        Ok(parsed.and_utc().timestamp())
    }

    /// The fast-import mark addressing this revision's blob and commit.
    ///
    /// Marks are the revision id plus one, so mark 0 is unreachable even
    /// for an export whose revision ids start at 0.
    pub fn mark(&self) -> Result<u64> {
        self.revision_id
            .parse::<u64>()
            .map(|id| id + 1)
            .map_err(|_| Error::RevisionId {
                value: self.revision_id.clone(),
            })
    }
}

/// Page-level fields carried across all revisions of the current page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Current page title, namespace prefix removed.
    pub title: String,
    /// Namespace prefix of the current page, empty when absent.
    pub namespace: String,
    /// Page identifier, verbatim from the export.
    pub page_id: String,
    /// True when the page's namespace is blacklisted; all of the page's
    /// revisions are then discarded.
    pub skip: bool,
}

/// Run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    /// Pages whose title element has been seen.
    pub pages_seen: u64,
    /// Revisions extracted and handed to the formatter.
    pub revisions_read: u64,
    /// Pages discarded because their namespace is blacklisted.
    pub ignored_pages: u64,
    /// Revisions discarded because their page is blacklisted.
    pub ignored_revisions: u64,
}
