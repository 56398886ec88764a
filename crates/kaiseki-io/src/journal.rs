use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use kaiseki_types::LogRecord;

const SEPARATOR_WIDTH: usize = 50;

/// Append-only daily log, one file per calendar day
pub struct Journal {
    dir: PathBuf,
}

impl Journal {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/log_YYYYMMDD.txt` for the day of `at`
    pub fn path_for(&self, at: DateTime<Local>) -> PathBuf {
        self.dir.join(format!("log_{}.txt", at.format("%Y%m%d")))
    }

    /// Append one record to the file of its day, returns that file
    pub fn append(&self, record: &LogRecord) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(record.timestamp);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(format_record(record).as_bytes())?;

        tracing::debug!("Appended record to {}", path.display());
        Ok(path)
    }
}

fn format_record(record: &LogRecord) -> String {
    format!(
        "[{}] Screenshot: {}\n{}\n{}\n",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.screenshot.display(),
        record.body,
        "=".repeat(SEPARATOR_WIDTH)
    )
}
