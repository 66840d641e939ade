//! # Ordered Commit Spool
//!
//! The chronological reordering buffer between extraction and emission.
//! Revisions arrive in document order, which is not global timestamp
//! order, so every commit descriptor is parked here until the source is
//! exhausted and then drained in ascending-timestamp order. Entries with
//! equal timestamps keep their insertion order.
//!
//! Two operating modes, selected once at construction:
//!
//! - **in-memory**: a `BTreeMap<i64, Vec<CommitDescriptor>>` holding the
//!   full descriptors; fine for moderate exports.
//! - **disk-backed**: descriptors are appended to an auxiliary file as
//!   length-prefixed frames and only `(timestamp, offset)` stays in
//!   memory. This is the arena/index shape: small sortable keys in RAM,
//!   bulky payloads addressed by offset. Blob content is never spooled —
//!   it is emitted immediately — so the file carries only the much
//!   smaller commit metadata.
//!
//! Frame layout, little-endian: `u64` mark, `u32` meta length, meta bytes,
//! `u32` file-line length, file-line bytes.
//!
//! Any I/O failure against the auxiliary file is fatal: an ordered history
//! with missing entries is worse than no history. On a successful drain
//! the file is removed.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::commit::CommitDescriptor;
use crate::error::{Error, Result};

enum Store {
    Memory(BTreeMap<i64, Vec<CommitDescriptor>>),
    Disk(DiskStore),
}

struct DiskStore {
    path: PathBuf,
    file: File,
    index: BTreeMap<i64, Vec<u64>>,
    offset: u64,
}

/// Chronological reordering buffer for commit descriptors.
pub struct OrderedSpool {
    store: Store,
    len: u64,
}

impl OrderedSpool {
    /// Purely in-memory spool.
    pub fn in_memory() -> Self {
        Self {
            store: Store::Memory(BTreeMap::new()),
            len: 0,
        }
    }

    /// Disk-backed spool using `path` as the auxiliary file. The file is
    /// created (truncated if it exists) and exclusively owned by this
    /// spool for the run's duration.
    pub fn on_disk(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| Error::Spool {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            store: Store::Disk(DiskStore {
                path: path.to_path_buf(),
                file,
                index: BTreeMap::new(),
                offset: 0,
            }),
            len: 0,
        })
    }

    /// Number of descriptors inserted so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a descriptor keyed by its revision's timestamp.
    pub fn insert(&mut self, timestamp: i64, descriptor: CommitDescriptor) -> Result<()> {
        match &mut self.store {
            Store::Memory(entries) => {
                entries.entry(timestamp).or_default().push(descriptor);
            }
            Store::Disk(disk) => {
                let offset = disk.append(&descriptor)?;
                disk.index.entry(timestamp).or_default().push(offset);
            }
        }
        self.len += 1;
        Ok(())
    }

    /// Drain up to `limit` descriptors in ascending-timestamp order,
    /// calling `each` for every one. Returns the number drained. In disk
    /// mode the auxiliary file is removed after a successful drain.
    pub fn drain<F>(self, limit: u64, mut each: F) -> Result<u64>
    where
        F: FnMut(CommitDescriptor) -> Result<()>,
    {
        let mut drained = 0u64;
        match self.store {
            Store::Memory(entries) => {
                'outer: for (_timestamp, descriptors) in entries {
                    for descriptor in descriptors {
                        if drained == limit {
                            break 'outer;
                        }
                        each(descriptor)?;
                        drained += 1;
                    }
                }
            }
            Store::Disk(mut disk) => {
                let index = std::mem::take(&mut disk.index);
                'outer_disk: for (_timestamp, offsets) in index {
                    for offset in offsets {
                        if drained == limit {
                            break 'outer_disk;
                        }
                        let descriptor = disk.read_at(offset)?;
                        each(descriptor)?;
                        drained += 1;
                    }
                }
                drop(disk.file);
                if let Err(err) = std::fs::remove_file(&disk.path) {
                    // The history is already complete at this point.
                    log::warn!(
                        "can't remove spool file '{}': {}",
                        disk.path.display(),
                        err
                    );
                }
            }
        }
        Ok(drained)
    }
}

impl DiskStore {
    fn spool_error(&self, source: std::io::Error) -> Error {
        Error::Spool {
            path: self.path.clone(),
            source,
        }
    }

    /// Append one frame; returns the offset it was written at.
    fn append(&mut self, descriptor: &CommitDescriptor) -> Result<u64> {
        let mut frame =
            Vec::with_capacity(16 + descriptor.meta.len() + descriptor.file_line.len());
        frame.write_u64::<LittleEndian>(descriptor.mark)?;
        frame.write_u32::<LittleEndian>(descriptor.meta.len() as u32)?;
        frame.extend_from_slice(&descriptor.meta);
        frame.write_u32::<LittleEndian>(descriptor.file_line.len() as u32)?;
        frame.extend_from_slice(&descriptor.file_line);

        let offset = self.offset;
        self.file
            .write_all(&frame)
            .map_err(|err| self.spool_error(err))?;
        self.offset += frame.len() as u64;
        Ok(offset)
    }

    /// Read back the frame at `offset`.
    fn read_at(&mut self, offset: u64) -> Result<CommitDescriptor> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|err| self.spool_error(err))?;
        let mark = self
            .file
            .read_u64::<LittleEndian>()
            .map_err(|err| self.spool_error(err))?;
        let meta_len = self
            .file
            .read_u32::<LittleEndian>()
            .map_err(|err| self.spool_error(err))?;
        let mut meta = vec![0u8; meta_len as usize];
        self.file
            .read_exact(&mut meta)
            .map_err(|err| self.spool_error(err))?;
        let file_len = self
            .file
            .read_u32::<LittleEndian>()
            .map_err(|err| self.spool_error(err))?;
        let mut file_line = vec![0u8; file_len as usize];
        self.file
            .read_exact(&mut file_line)
            .map_err(|err| self.spool_error(err))?;
        Ok(CommitDescriptor {
            mark,
            meta,
            file_line,
        })
    }
}
