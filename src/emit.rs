//! # Commit Emission
//!
//! The final phase: drain the spool in ascending-timestamp order and write
//! the commit commands, threading each commit to the one emitted just
//! before it. The result is one strictly linear chain on a single branch —
//! no merges, no fan-out.
//!
//! The parent reference (`from :<mark>`) goes between the length-prefixed
//! message and the file-modification line, which is why descriptors keep
//! those two parts separate. The mark comes straight off the descriptor;
//! nothing here re-scans serialized text.

use std::io::Write;

use crate::commit::CommitDescriptor;
use crate::error::Result;
use crate::spool::OrderedSpool;

/// Branch all commits land on.
pub const BRANCH_REF: &str = "refs/heads/master";

/// Drain `spool` and write at most `limit` commit commands to `out`.
/// Returns the number of commits written.
pub fn emit<W: Write>(out: &mut W, spool: OrderedSpool, limit: u64) -> Result<u64> {
    let mut previous: Option<u64> = None;
    spool.drain(limit, |descriptor| {
        write_commit(out, &descriptor, previous)?;
        previous = Some(descriptor.mark);
        Ok(())
    })
}

fn write_commit<W: Write>(
    out: &mut W,
    descriptor: &CommitDescriptor,
    parent: Option<u64>,
) -> Result<()> {
    write!(out, "commit {}\nmark :{}\n", BRANCH_REF, descriptor.mark)?;
    out.write_all(&descriptor.meta)?;
    if let Some(parent_mark) = parent {
        write!(out, "from :{}\n", parent_mark)?;
    }
    out.write_all(&descriptor.file_line)?;
    out.write_all(b"\n")?;
    Ok(())
}
