//! Primary-key index
//!
//! In-memory map from key to the byte offset of that key's line in the data
//! file. Derived entirely from the file and never persisted: it is rebuilt by
//! a full scan on open and after every rewrite.

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::Result;
use crate::record::{key_of, trim_line};

/// Key → offset map for the current rewrite era of the data file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyIndex {
    offsets: HashMap<String, u64>,
}

/// Summary of an index build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Lines read from the file (blank lines included)
    pub lines_scanned: u64,

    /// Distinct keys in the resulting index
    pub keys_indexed: u64,

    /// Lines whose key was seen again further down the file
    pub duplicates_shadowed: u64,

    /// Total bytes read
    pub bytes_scanned: u64,
}

impl KeyIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by scanning every line of `reader` from its start
    ///
    /// The offset of each line is the running byte count before it. A key
    /// that appears more than once keeps the offset of its last line.
    pub fn build<R: BufRead>(mut reader: R) -> Result<(Self, IndexStats)> {
        let mut index = Self::new();
        let mut stats = IndexStats::default();
        let mut buf = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }
            stats.lines_scanned += 1;

            let line = String::from_utf8_lossy(&buf);
            if !trim_line(&line).is_empty() {
                let key = key_of(&line);
                if index.offsets.insert(key.to_string(), cursor).is_some() {
                    stats.duplicates_shadowed += 1;
                }
            }

            cursor += read as u64;
        }

        stats.bytes_scanned = cursor;
        stats.keys_indexed = index.offsets.len() as u64;
        Ok((index, stats))
    }

    /// Offset of the line for `key`
    pub fn get(&self, key: &str) -> Option<u64> {
        self.offsets.get(key).copied()
    }

    /// Record the offset for `key`, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, offset: u64) -> Option<u64> {
        self.offsets.insert(key.into(), offset)
    }

    pub fn remove(&mut self, key: &str) -> Option<u64> {
        self.offsets.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.offsets.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterate over (key, offset) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.offsets.iter().map(|(k, &off)| (k.as_str(), off))
    }

    /// Copy of the underlying map
    pub fn to_map(&self) -> HashMap<String, u64> {
        self.offsets.clone()
    }
}
