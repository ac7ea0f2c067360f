//! JSON Lines result store.
//!
//! Each graded sheet is appended as one JSON object per line, so a store can
//! be shared by several grading runs and read back per exam.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use omr_core::{GradingResult, ResultOutput};
use tracing::{debug, warn};

/// Append-only store of grading results.
pub struct JsonlResultStore {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlResultStore {
    /// Opens (creating if needed) a store file for appending.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open result store: {}", path.display()))?;

        debug!("Opened result store {}", path.display());
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every stored result for one exam, in insertion order.
    ///
    /// Lines that fail to parse are logged and skipped. A missing store file
    /// yields no results.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn results_for_exam(path: impl AsRef<Path>, exam_id: &str) -> Result<Vec<GradingResult>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open result store: {}", path.display()))?;

        let mut results = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<GradingResult>(&line) {
                Ok(result) if result.exam_id == exam_id => results.push(result),
                Ok(_) => {}
                Err(e) => warn!("Skipping line {} of {}: {e}", number + 1, path.display()),
            }
        }

        Ok(results)
    }
}

impl ResultOutput for JsonlResultStore {
    fn write(&self, result: &GradingResult) -> Result<()> {
        let json = serde_json::to_string(result)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{json}")
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }
}
