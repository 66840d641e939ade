//! # wiki2git Library
//!
//! This library converts MediaWiki revision-history exports (the
//! `pages-meta-history` XML dumps) into a `git fast-import` command
//! stream: one file per page, one commit per revision, all revisions
//! across all pages re-sorted into a single chronological branch.
//!
//! It is designed to be used by the `wiki2git` command-line tool but can
//! be embedded anywhere a conversion from export bytes to an import
//! stream is needed.
//!
//! ## Quick Example
//!
//! ```
//! use wiki2git::blacklist::Blacklist;
//! use wiki2git::pipeline::{self, Options};
//!
//! let export = r#"<mediawiki>
//!   <page>
//!     <title>Example</title>
//!     <id>1</id>
//!     <revision>
//!       <id>10</id>
//!       <timestamp>2009-12-01T12:09:31Z</timestamp>
//!       <contributor><username>Alice</username><id>7</id></contributor>
//!       <text>hello</text>
//!     </revision>
//!   </page>
//! </mediawiki>"#;
//!
//! let options = Options {
//!     wikitime: true,
//!     ..Default::default()
//! };
//! let mut stream = Vec::new();
//! let summary = pipeline::run(
//!     &options,
//!     &Blacklist::empty(),
//!     export.as_bytes(),
//!     &mut stream,
//! )
//! .unwrap();
//!
//! assert_eq!(summary.commits_written, 1);
//! assert!(stream.starts_with(b"blob\nmark :11\n"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Tokenizer (`xml`)**: a forward-only pull tokenizer over the
//!   export's tag-delimited structure; nothing materializes a document
//!   tree, so multi-gigabyte exports stream in constant memory.
//! - **Extraction (`extract`, `record`)**: a depth-keyed state machine
//!   that reassembles one `RevisionRecord` at a time and tracks the
//!   current page context, including namespace blacklisting.
//! - **Formatting (`commit`, `path`)**: each completed revision becomes a
//!   blob command (emitted immediately) and a commit descriptor, with
//!   page titles encoded into filesystem-safe, directory-spread paths.
//! - **Ordering (`spool`)**: commit descriptors wait in a
//!   timestamp-keyed spool — fully in memory, or on disk with only a
//!   sorted offset index in memory — because the export is not globally
//!   chronological but the output history must be.
//! - **Emission (`emit`)**: after the source is exhausted the spool is
//!   drained in timestamp order, threading every commit to its
//!   predecessor on a single linear branch.
//!
//! The `pipeline` module sequences the two phases; `blacklist`,
//! `progress`, and `error` carry the supporting concerns.

pub mod blacklist;
pub mod commit;
pub mod emit;
pub mod error;
pub mod extract;
pub mod path;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod spool;
pub mod xml;

#[cfg(test)]
mod path_proptest;
