//! Namespace blacklist loading
//!
//! A line-oriented list of namespace tokens whose pages are skipped
//! entirely. Blank lines and lines starting with `#` are ignored. An
//! unreadable file is the one non-fatal failure in the tool: conversion is
//! still correct without a blacklist, so we log a warning and continue
//! with an empty set.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read-only set of blacklisted namespace tokens.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    namespaces: HashSet<String>,
}

impl Blacklist {
    /// An empty blacklist; nothing is skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a blacklist file, falling back to an empty set if the file
    /// cannot be opened or read.
    pub fn from_file(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                log::warn!(
                    "can't open blacklist file '{}': {}; continuing without one",
                    path.display(),
                    err
                );
                return Self::empty();
            }
        };
        let mut blacklist = Self::empty();
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::warn!(
                        "error reading blacklist file '{}': {}; continuing without one",
                        path.display(),
                        err
                    );
                    return Self::empty();
                }
            };
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            blacklist.namespaces.insert(line.to_string());
        }
        blacklist
    }

    /// Add a namespace token.
    pub fn insert(&mut self, namespace: &str) {
        self.namespaces.insert(namespace.to_string());
    }

    /// Whether the namespace is blacklisted.
    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
