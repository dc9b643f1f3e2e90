//! Record Log
//!
//! The append-only data file: one record per line, UTF-8, no header.
//!
//! ## Responsibilities
//! - Append a line and report the offset it was written at
//! - Read the single line at a known offset
//! - Stream every line in file order (scans, index builds)
//! - Rewrite the file through a temporary path + atomic rename
//!
//! File handles are opened per call and dropped before returning, on
//! success and error paths alike.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::SyncStrategy;
use crate::error::{IsamError, Result};
use crate::index::{IndexStats, KeyIndex};
use crate::record::trim_line;

/// Suffix of the temporary file used while rewriting
const REWRITE_SUFFIX: &str = "rewrite";

/// Outcome of a rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Lines carried over into the new file
    pub lines_kept: u64,

    /// Lines dropped
    pub lines_removed: u64,

    /// Size of the new file in bytes
    pub bytes_written: u64,
}

/// Handle on the data file
///
/// Holds only the path and sync bookkeeping; no file stays open between
/// calls.
#[derive(Debug)]
pub struct RecordLog {
    path: PathBuf,
    sync_strategy: SyncStrategy,
    appends_since_sync: AtomicUsize,
}

impl RecordLog {
    /// Open (creating if needed) the data file at `path`
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            sync_strategy,
            appends_since_sync: AtomicUsize::new(0),
        })
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path used for the in-progress rewrite
    pub fn rewrite_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".");
        name.push(REWRITE_SUFFIX);
        PathBuf::from(name)
    }

    /// Current size of the data file in bytes
    pub fn size(&self) -> Result<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Scan the whole file and build a fresh index
    pub fn build_index(&self) -> Result<(KeyIndex, IndexStats)> {
        match File::open(&self.path) {
            Ok(file) => KeyIndex::build(BufReader::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok((KeyIndex::new(), IndexStats::default())),
            Err(e) => Err(e.into()),
        }
    }

    /// Append one line and return the offset of its first byte
    ///
    /// The offset is the stream position taken right before the write. If a
    /// previous writer left the file without a final newline, one is inserted
    /// first so the new line starts on its own.
    pub fn append(&self, line: &str) -> Result<u64> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut offset = file.seek(SeekFrom::End(0))?;

        let mut buf = String::with_capacity(line.len() + 2);
        if offset > 0 && !Self::ends_with_newline(&mut file)? {
            buf.push('\n');
            offset += 1;
        }
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes())?;
        file.flush()?;
        self.sync_after_append(&file)?;

        Ok(offset)
    }

    /// Read the line starting at `offset`, without its terminator
    pub fn read_line_at(&self, offset: u64) -> Result<String> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        reader.seek(SeekFrom::Start(offset))?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(IsamError::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("no line at offset {} in {}", offset, self.path.display()),
            )));
        }
        Ok(trim_line(&line).to_string())
    }

    /// Call `f(offset, line)` for every non-blank line, in file order
    ///
    /// `line` has its terminator stripped. An error from `f` stops the scan.
    pub fn for_each_line<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(u64, &str) -> Result<()>,
    {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let mut offset = 0u64;

        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            if read == 0 {
                break;
            }
            let trimmed = trim_line(&line);
            if !trimmed.is_empty() {
                f(offset, trimmed)?;
            }
            offset += read as u64;
        }
        Ok(())
    }

    /// Rewrite the file keeping only lines for which `keep(offset, line)` is true
    ///
    /// The new contents go to [`rewrite_path`](Self::rewrite_path) first and
    /// are renamed over the data file once complete, so a concurrent reader
    /// opens either the old file or the new one.
    pub fn rewrite<F>(&self, mut keep: F) -> Result<RewriteStats>
    where
        F: FnMut(u64, &str) -> bool,
    {
        let tmp_path = self.rewrite_path();
        let mut stats = RewriteStats::default();

        {
            let source = match File::open(&self.path) {
                Ok(file) => Some(file),
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            };

            let tmp = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            let mut writer = BufWriter::new(tmp);

            if let Some(source) = source {
                let mut reader = BufReader::new(source);
                let mut buf = Vec::new();
                let mut offset = 0u64;

                loop {
                    buf.clear();
                    let read = reader.read_until(b'\n', &mut buf)?;
                    if read == 0 {
                        break;
                    }

                    let text = String::from_utf8_lossy(&buf);
                    if keep(offset, trim_line(&text)) {
                        writer.write_all(&buf)?;
                        stats.bytes_written += read as u64;
                        if buf.last() != Some(&b'\n') {
                            writer.write_all(b"\n")?;
                            stats.bytes_written += 1;
                        }
                        stats.lines_kept += 1;
                    } else {
                        stats.lines_removed += 1;
                    }
                    offset += read as u64;
                }
            }

            writer.flush()?;
            let tmp = writer
                .into_inner()
                .map_err(|e| IsamError::Io(e.into_error()))?;
            if self.sync_strategy != SyncStrategy::Never {
                tmp.sync_all()?;
            }
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        if self.sync_strategy != SyncStrategy::Never {
            self.sync_parent_dir()?;
        }
        self.appends_since_sync.store(0, Ordering::Relaxed);

        tracing::debug!(
            path = %self.path.display(),
            kept = stats.lines_kept,
            removed = stats.lines_removed,
            bytes = stats.bytes_written,
            "Rewrote data file"
        );

        Ok(stats)
    }

    /// Force the data file to disk
    pub fn sync(&self) -> Result<()> {
        match File::open(&self.path) {
            Ok(file) => {
                file.sync_all()?;
                self.appends_since_sync.store(0, Ordering::Relaxed);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn ends_with_newline(file: &mut File) -> Result<bool> {
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }

    fn sync_after_append(&self, file: &File) -> Result<()> {
        match self.sync_strategy {
            SyncStrategy::EveryWrite => file.sync_data()?,
            SyncStrategy::EveryNWrites { count } => {
                let pending = self.appends_since_sync.fetch_add(1, Ordering::Relaxed) + 1;
                if pending >= count {
                    file.sync_data()?;
                    self.appends_since_sync.store(0, Ordering::Relaxed);
                }
            }
            SyncStrategy::Never => {}
        }
        Ok(())
    }

    #[cfg(unix)]
    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            File::open(dir)?.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) -> Result<()> {
        Ok(())
    }
}
