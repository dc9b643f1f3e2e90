//! Record Store
//!
//! The storage engine: one data file plus the primary-key index derived from it.
//!
//! ## Responsibilities
//! - Build the index from the file on open
//! - Insert by appending a line and recording its offset
//! - Exact lookup through the index (one seek, one line)
//! - Linear scans over every line for field searches
//! - Delete by rewriting the file, then rebuilding the index
//! - Update as delete followed by insert

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::{IsamError, Result};
use crate::index::{IndexStats, KeyIndex};
use crate::log::RecordLog;
use crate::protocol::Command;
use crate::record::{field_of, key_of, parse_marks, validate_key, Field, Record};

/// Outcome of an executed command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Mutation applied
    Done,

    /// Exact-key lookup result
    Record(String),

    /// Scan results in file order (possibly empty)
    Records(Vec<String>),

    Pong,
}

/// The record store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (insert/delete/update/compact/rebuild): serialized by `write_lock`
///   - Only ONE mutation at a time, so appends never race on the offset
/// - **Exact reads**: hold the index read lock while seeking, so a rewrite
///   (which holds the write lock across rename + rebuild) can't invalidate
///   the offset mid-read
/// - **Scans**: open the file directly; rewrites are renamed into place, so a
///   scan sees either the old file or the new one
pub struct RecordStore {
    /// Store configuration
    config: Config,

    /// The data file
    log: RecordLog,

    /// Key → offset for the current rewrite era
    index: RwLock<KeyIndex>,

    /// Serializes mutations
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Name of the data file inside `data_dir`
    pub const DATA_FILENAME: &'static str = "isamfile.txt";

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory and file if missing
    /// 2. Discard a leftover rewrite file (its rename never happened)
    /// 3. Build the index by scanning the whole file
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let path = config.data_dir.join(Self::DATA_FILENAME);
        let log = RecordLog::open(&path, config.sync_strategy)?;

        let leftover = log.rewrite_path();
        if leftover.exists() {
            tracing::warn!(
                "Removing incomplete rewrite file {}",
                leftover.display()
            );
            fs::remove_file(&leftover)?;
        }

        let (index, stats) = log.build_index()?;
        if stats.duplicates_shadowed > 0 {
            tracing::warn!(
                "{} duplicate key line(s) in {} are shadowed by later lines; run compact to drop them",
                stats.duplicates_shadowed,
                path.display()
            );
        }

        tracing::info!(
            path = %path.display(),
            keys = stats.keys_indexed,
            lines = stats.lines_scanned,
            bytes = stats.bytes_scanned,
            "Record store opened"
        );

        Ok(Self {
            config,
            log,
            index: RwLock::new(index),
            write_lock: Mutex::new(()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Insert { key, record } => {
                self.insert(&key, &record)?;
                Ok(Reply::Done)
            }
            Command::Search { key } => self.search(&key).map(Reply::Record),
            Command::SearchByNamePrefix { prefix } => {
                self.search_by_name_prefix(&prefix).map(Reply::Records)
            }
            Command::SearchByMarksRange { min, max } => {
                self.search_by_marks_range(min, max).map(Reply::Records)
            }
            Command::SearchByEmail { query } => self.search_by_email(&query).map(Reply::Records),
            Command::SearchByRollNo { query } => {
                self.search_by_roll_no(&query).map(Reply::Records)
            }
            Command::Delete { key } => {
                self.delete(&key)?;
                Ok(Reply::Done)
            }
            Command::Update { key, record } => {
                self.update(&key, &record)?;
                Ok(Reply::Done)
            }
            Command::Ping => Ok(Reply::Pong),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert a new record
    ///
    /// Fails with `DuplicateKey` if `key` is already indexed, and with
    /// `InvalidRecord` if any field would break the line format.
    pub fn insert(&self, key: &str, record: &Record) -> Result<()> {
        validate_key(key)?;
        record.validate()?;

        let _write_guard = self.write_lock.lock();
        self.insert_locked(key, record)
    }

    /// Remove the record under `key`
    ///
    /// Rewrites the whole file without that key's line(s) and rebuilds the
    /// index from the result.
    pub fn delete(&self, key: &str) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.delete_locked(key)
    }

    /// Replace the record under `key`
    ///
    /// Delete then insert, both under one write lock. The new record is
    /// validated before anything is removed.
    pub fn update(&self, key: &str, record: &Record) -> Result<()> {
        validate_key(key)?;
        record.validate()?;

        let _write_guard = self.write_lock.lock();
        self.delete_locked(key)?;
        self.insert_locked(key, record)
    }

    /// Drop every line the index doesn't point at
    ///
    /// Clears out lines shadowed by duplicate keys. Returns the number of
    /// lines removed.
    pub fn compact(&self) -> Result<u64> {
        let _write_guard = self.write_lock.lock();
        let mut index = self.index.write();

        let live = index.clone();
        let stats = self
            .log
            .rewrite(|offset, line| !line.is_empty() && live.get(key_of(line)) == Some(offset))?;

        let (rebuilt, _) = self.log.build_index()?;
        *index = rebuilt;

        tracing::info!("Compaction removed {} line(s)", stats.lines_removed);
        Ok(stats.lines_removed)
    }

    /// Re-scan the file and replace the in-memory index
    pub fn rebuild_index(&self) -> Result<IndexStats> {
        let _write_guard = self.write_lock.lock();
        let (rebuilt, stats) = self.log.build_index()?;
        *self.index.write() = rebuilt;
        Ok(stats)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Exact-key lookup, returning the stored line without its newline
    pub fn search(&self, key: &str) -> Result<String> {
        let index = self.index.read();
        let offset = index
            .get(key)
            .ok_or_else(|| IsamError::NotFound(key.to_string()))?;

        let line = self.log.read_line_at(offset)?;
        if key_of(&line) != key {
            return Err(IsamError::Parse(format!(
                "index entry for '{}' points at a line for '{}' (offset {})",
                key,
                key_of(&line),
                offset
            )));
        }
        Ok(line)
    }

    /// Exact-key lookup, parsed into a [`Record`]
    pub fn get(&self, key: &str) -> Result<Record> {
        let line = self.search(key)?;
        let (_, record) = Record::from_line(&line)?;
        Ok(record)
    }

    /// Records whose name starts with `prefix` (case-sensitive)
    pub fn search_by_name_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.scan(|line| Ok(field_of(line, Field::Name)?.starts_with(prefix)))
    }

    /// Records with `min <= marks <= max`
    ///
    /// A non-numeric marks field anywhere in the file fails the whole scan.
    pub fn search_by_marks_range(&self, min: f64, max: f64) -> Result<Vec<String>> {
        self.scan(|line| {
            let marks = parse_marks(field_of(line, Field::Marks)?)?;
            Ok(min <= marks && marks <= max)
        })
    }

    /// Records whose email contains `query`
    pub fn search_by_email(&self, query: &str) -> Result<Vec<String>> {
        self.scan(|line| Ok(field_of(line, Field::Email)?.contains(query)))
    }

    /// Records whose roll number contains `query`
    pub fn search_by_roll_no(&self, query: &str) -> Result<Vec<String>> {
        self.scan(|line| Ok(field_of(line, Field::RollNo)?.contains(query)))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Force the data file to disk
    pub fn sync(&self) -> Result<()> {
        self.log.sync()
    }

    /// Close the store, syncing the data file first
    pub fn close(self) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.log.sync()?;
        tracing::info!(path = %self.log.path().display(), "Record store closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.read().contains(key)
    }

    /// Copy of the current key → offset map
    pub fn index_snapshot(&self) -> HashMap<String, u64> {
        self.index.read().to_map()
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        self.log.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers (called with write lock held)
    // =========================================================================

    fn insert_locked(&self, key: &str, record: &Record) -> Result<()> {
        if self.index.read().contains(key) {
            return Err(IsamError::DuplicateKey(key.to_string()));
        }

        let offset = self.log.append(&record.to_line(key))?;
        self.index.write().insert(key, offset);

        tracing::debug!(key, offset, "Inserted record");
        Ok(())
    }

    fn delete_locked(&self, key: &str) -> Result<()> {
        let mut index = self.index.write();
        if !index.contains(key) {
            return Err(IsamError::NotFound(key.to_string()));
        }

        let stats = self.log.rewrite(|_, line| key_of(line) != key)?;
        let (rebuilt, _) = self.log.build_index()?;
        *index = rebuilt;

        tracing::debug!(key, removed = stats.lines_removed, "Deleted record");
        Ok(())
    }

    fn scan<F>(&self, mut matches: F) -> Result<Vec<String>>
    where
        F: FnMut(&str) -> Result<bool>,
    {
        let mut found = Vec::new();
        self.log.for_each_line(|_, line| {
            if matches(line)? {
                found.push(line.to_string());
            }
            Ok(())
        })?;
        Ok(found)
    }
}
