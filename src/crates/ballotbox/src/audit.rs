//! Append-only CSV log of accepted votes
//!
//! One file per day, `<log_dir>/votes_YYYYMMDD.csv`. The database remains the
//! authoritative record; the log is a human-readable trail that can be
//! downloaded as a ZIP archive.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::db::models::VoteRecord;
use crate::{BallotError, Result};

/// Column header written at the top of each daily file
pub const CSV_HEADER: [&str; 4] = ["timestamp", "vote_id", "token", "choice"];

/// Daily CSV vote log
#[derive(Debug)]
pub struct AuditLog {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the daily files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of today's log file
    pub fn current_file(&self) -> PathBuf {
        self.dir
            .join(format!("votes_{}.csv", Local::now().format("%Y%m%d")))
    }

    /// Append one accepted vote
    ///
    /// File I/O runs on the blocking pool while the write lock is held.
    pub async fn record(&self, record: &VoteRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let dir = self.dir.clone();
        let path = self.current_file();
        let row = record.clone();
        let written = path.clone();
        run_blocking(move || append_row(&dir, &path, &row)).await?;

        debug!(path = %written.display(), vote_id = %record.vote_id, "Vote appended to audit log");
        Ok(())
    }

    /// Append one accepted vote, logging instead of failing
    ///
    /// Used after the vote is committed: a broken log must not undo it.
    pub async fn record_or_log(&self, record: &VoteRecord) {
        if let Err(e) = self.record(record).await {
            error!(
                error = %e,
                vote_id = %record.vote_id,
                "Failed to write vote to audit log"
            );
        }
    }

    /// Bundle every CSV file in the log directory into a ZIP archive
    pub async fn export_zip(&self) -> Result<Vec<u8>> {
        let _guard = self.write_lock.lock().await;
        let dir = self.dir.clone();
        run_blocking(move || zip_csv_files(&dir)).await
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| BallotError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}

fn append_row(dir: &Path, path: &Path, record: &VoteRecord) -> Result<()> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_new = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer.write_record(CSV_HEADER).map_err(std::io::Error::from)?;
    }
    writer
        .write_record([
            record.timestamp.as_str(),
            record.vote_id.as_str(),
            record.token.as_str(),
            record.choice.as_str(),
        ])
        .map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
}

fn zip_csv_files(dir: &Path) -> Result<Vec<u8>> {
    let mut files: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
            .collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    files.sort();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = fs::read(path)?;
        zip.start_file(name, options)
            .map_err(|e| BallotError::Encoding(e.to_string()))?;
        zip.write_all(&content)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| BallotError::Encoding(e.to_string()))?;
    Ok(cursor.into_inner())
}
