//! # Commit Formatting
//!
//! Turns a completed [`RevisionRecord`] into its two output artifacts:
//!
//! - the **blob command**, written to the output stream immediately — blob
//!   marks have no ordering requirement, so content never waits for the
//!   chronological sort;
//! - the **[`CommitDescriptor`]**, the serialized commit half that goes
//!   into the spool until the drain phase puts it in timestamp order.
//!
//! Every `data` header carries the exact byte count of the payload that
//! follows; the consuming importer reads fixed-length frames, so character
//! counts would corrupt the stream on any non-ASCII content.
//!
//! Marks are `revision_id + 1` (mark 0 is reserved by the importer). The
//! same mark first addresses the revision's blob, then is reassigned to
//! its commit, which is what lets the file-modification line and the next
//! commit's parent reference both use it.

use std::io::Write;

use chrono::Local;

use crate::error::Result;
use crate::path;
use crate::record::RevisionRecord;

/// Domain used for the synthetic author addresses; `.invalid` is reserved
/// and can never collide with a real mail domain.
pub const MAIL_DOMAIN: &str = "wiki.invalid";

/// The serialized, not-yet-ordered commit half of one revision.
///
/// `meta` holds the author line, committer line, and length-prefixed
/// message; `file_line` holds the file-modification line. They are kept
/// separate because the emitter inserts the parent reference between them.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitDescriptor {
    /// Mark addressing this revision's blob, then its commit.
    pub mark: u64,
    /// Author line, committer line, and length-prefixed message.
    pub meta: Vec<u8>,
    /// `M 100644 :<mark> <path>`, without a trailing newline.
    pub file_line: Vec<u8>,
}

/// Stateless formatter configured once per run.
pub struct CommitFormatter {
    committer: String,
    deepness: u32,
    wikitime: bool,
}

impl CommitFormatter {
    /// `committer` is the configured identity (`Name <email>`); `deepness`
    /// controls the directory spread of generated paths; with `wikitime`
    /// the committer timestamp is the revision's own time instead of the
    /// current wall clock, making output reproducible.
    pub fn new(committer: &str, deepness: u32, wikitime: bool) -> Self {
        Self {
            committer: committer.to_string(),
            deepness,
            wikitime,
        }
    }

    /// Write the revision's blob command.
    pub fn write_blob<W: Write>(&self, out: &mut W, record: &RevisionRecord) -> Result<()> {
        let mark = record.mark()?;
        write!(out, "blob\nmark :{}\ndata {}\n", mark, record.text.len())?;
        out.write_all(record.text.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }

    /// Build the commit descriptor for a revision whose timestamp parses
    /// to `date` (epoch seconds, UTC).
    pub fn descriptor(&self, record: &RevisionRecord, date: i64) -> Result<CommitDescriptor> {
        let mark = record.mark()?;
        let mut meta = Vec::new();

        if record.is_anonymous() {
            write!(
                meta,
                "author {} <ip@{}> {} +0000\n",
                record.ip, MAIL_DOMAIN, date
            )?;
        } else {
            write!(
                meta,
                "author {} <uid-{}@{}> {} +0000\n",
                record.username, record.contributor_id, MAIL_DOMAIN, date
            )?;
        }

        let (committer_date, committer_zone) = if self.wikitime {
            (date, "+0000".to_string())
        } else {
            let now = Local::now();
            (
                now.timestamp(),
                format_zone(now.offset().local_minus_utc()),
            )
        };
        write!(
            meta,
            "committer {} {} {}\n",
            self.committer, committer_date, committer_zone
        )?;

        let message = build_message(record);
        write!(meta, "data {}\n", message.len())?;
        meta.extend_from_slice(message.as_bytes());
        meta.push(b'\n');

        let file_path = path::file_path(
            &record.title,
            &record.title_namespace,
            record.is_minor,
            record.is_anonymous(),
            self.deepness,
        );
        let mut file_line = Vec::new();
        write!(file_line, "M 100644 :{} {}", mark, file_path)?;

        Ok(CommitDescriptor {
            mark,
            meta,
            file_line,
        })
    }
}

/// Commit message: title line, blank line, edit summary, then the import
/// provenance trailer.
fn build_message(record: &RevisionRecord) -> String {
    let mut message = String::new();
    if !record.title_namespace.is_empty() {
        message.push_str(&record.title_namespace);
        message.push(':');
    }
    message.push_str(&record.title);
    message.push_str("\n\n");
    message.push_str(&record.comment);
    message.push_str(&format!(
        "\n\n{} import of page {} rev {}{}.\n",
        env!("CARGO_PKG_NAME"),
        record.page_id,
        record.revision_id,
        if record.is_minor { " (minor)" } else { "" }
    ));
    message
}

/// Format a UTC offset in seconds as a `±HHMM` zone token.
fn format_zone(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.abs();
    format!("{}{:02}{:02}", sign, abs / 3600, (abs % 3600) / 60)
}
