//! Sequential directory scanning

use crate::error::{ScanError, ScanResult};
use crate::scan::{ScanOutcome, Scanner};
use crate::types::{ArchiveEntry, Diagnostic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Receives coarse per-file progress during a directory scan
pub trait BatchProgress {
    /// Called after the `index`-th file (1-based) of `total` is scanned
    fn file_scanned(&mut self, index: usize, total: usize);

    /// Called once after the last file
    fn finished(&mut self, _total: usize) {}
}

/// Writes `scanning archive: N of M` lines, overwriting in place
#[derive(Debug)]
pub struct ConsoleProgress<W: Write = Stdout> {
    out: W,
}

impl ConsoleProgress<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BatchProgress for ConsoleProgress<W> {
    fn file_scanned(&mut self, index: usize, total: usize) {
        // Progress output is best effort
        let _ = write!(self.out, "scanning archive: {index} of {total}\r");
        let _ = self.out.flush();
    }

    fn finished(&mut self, total: usize) {
        if total > 0 {
            let _ = writeln!(self.out);
        }
    }
}

/// Full result of a directory scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryReport {
    /// Scanned directory
    pub directory: PathBuf,
    /// Number of files visited
    pub files_total: usize,
    /// All entries, in file-name order
    pub entries: Vec<ArchiveEntry>,
    /// Files that produced a diagnostic
    pub diagnostics: Vec<Diagnostic>,
    /// When the scan finished
    pub scanned_at: DateTime<Utc>,
}

impl Scanner {
    /// Scan every file in `directory`, reporting progress on stdout
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read or a file cannot be
    /// accessed
    pub fn scan_directory(&self, directory: &Path) -> ScanResult<Vec<ArchiveEntry>> {
        self.scan_directory_with(directory, &mut ConsoleProgress::stdout())
    }

    /// Scan every file in `directory` with a custom progress reporter
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read or a file cannot be
    /// accessed
    pub fn scan_directory_with(
        &self,
        directory: &Path,
        progress: &mut dyn BatchProgress,
    ) -> ScanResult<Vec<ArchiveEntry>> {
        self.scan_directory_report(directory, progress)
            .map(|report| report.entries)
    }

    /// Scan every file in `directory`, keeping diagnostics
    ///
    /// Only regular files directly inside `directory` are visited,
    /// in file-name order.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read or a file cannot be
    /// accessed
    pub fn scan_directory_report(
        &self,
        directory: &Path,
        progress: &mut dyn BatchProgress,
    ) -> ScanResult<DirectoryReport> {
        if !directory.is_dir() {
            return Err(ScanError::NotADirectory(directory.to_path_buf()));
        }

        let files = list_files(directory)?;
        let files_total = files.len();
        let mut entries = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, path) in files.iter().enumerate() {
            match self.scan_file(path)? {
                ScanOutcome::Entries(mut stream) => {
                    for entry in stream.by_ref() {
                        entries.push(entry?);
                    }
                    if let Some(diagnostic) = stream.into_diagnostic() {
                        diagnostics.push(diagnostic);
                    }
                }
                ScanOutcome::Skipped(diagnostic) => diagnostics.push(diagnostic),
            }
            progress.file_scanned(index + 1, files_total);
        }
        progress.finished(files_total);

        Ok(DirectoryReport {
            directory: directory.to_path_buf(),
            files_total,
            entries,
            diagnostics,
            scanned_at: Utc::now(),
        })
    }
}

fn list_files(directory: &Path) -> ScanResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_console_progress_format() {
        let mut progress = ConsoleProgress::new(Vec::new());
        progress.file_scanned(1, 3);
        progress.file_scanned(2, 3);
        progress.finished(3);

        let out = String::from_utf8(progress.into_inner()).unwrap();
        assert_eq!(out, "scanning archive: 1 of 3\rscanning archive: 2 of 3\r\n");
    }

    #[test]
    fn test_list_files_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.bin"), b"b").unwrap();
        fs::write(temp_dir.path().join("a.bin"), b"a").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("c.bin"), b"c").unwrap();

        let files = list_files(temp_dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.bin", "b.bin"]);
    }

    #[test]
    fn test_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.bin");
        fs::write(&file, b"x").unwrap();

        let result =
            Scanner::default().scan_directory_with(&file, &mut ConsoleProgress::new(Vec::new()));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }
}
