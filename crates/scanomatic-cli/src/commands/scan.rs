//! `scanomatic scan`

use super::split_pair;
use anyhow::{Context, Result};
use clap::ValueEnum;
use scanomatic_core::Config;
use scanomatic_scanner::output::{json, table};
use scanomatic_scanner::{
    ArchiveEntry, ConsoleProgress, Diagnostic, FormatOffsets, ProgressSink, ScanOutcome, Scanner,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Table,
}

pub struct ScanArgs {
    pub paths: Vec<PathBuf>,
    pub md5: bool,
    pub clean: bool,
    pub offsets: Vec<String>,
    pub legacy_offsets: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Member progress for a single archive, written to stderr
#[derive(Default)]
struct MemberProgress {
    active: bool,
}

impl ProgressSink for MemberProgress {
    fn started(&mut self, _archive: &Path, total: usize) {
        self.active = total > 1;
    }

    fn advanced(&mut self, member: &str, completed: usize, total: usize) {
        if self.active {
            let mut err = io::stderr();
            let _ = write!(err, "\x1b[2K[{completed:03}/{total:03}] {member}\r");
            let _ = err.flush();
        }
    }
}

impl MemberProgress {
    fn finish(&self) {
        if self.active {
            eprintln!();
        }
    }
}

pub fn run(args: &ScanArgs, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let scanner = build_scanner(args, &config)?;

    let mut entries: Vec<ArchiveEntry> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for path in &args.paths {
        if path.is_dir() {
            // Keep stdout clean when it carries the scan output
            let report = if args.output.is_some() {
                scanner.scan_directory_report(path, &mut ConsoleProgress::stdout())
            } else {
                scanner.scan_directory_report(path, &mut ConsoleProgress::new(io::stderr()))
            }
            .with_context(|| format!("Failed to scan directory {}", path.display()))?;

            entries.extend(report.entries);
            diagnostics.extend(report.diagnostics);
            continue;
        }

        match scanner
            .scan_file(path)
            .with_context(|| format!("Failed to scan {}", path.display()))?
        {
            ScanOutcome::Entries(stream) => {
                let mut progress = MemberProgress::default();
                let mut stream = stream.with_progress(&mut progress);
                for entry in stream.by_ref() {
                    entries.push(entry?);
                }
                if let Some(diagnostic) = stream.into_diagnostic() {
                    diagnostics.push(diagnostic);
                }
                progress.finish();
            }
            ScanOutcome::Skipped(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    let rendered = match args.format {
        OutputFormat::Json => {
            let mut out = json::to_json(&entries)?;
            out.push('\n');
            out
        }
        OutputFormat::Jsonl => json::to_json_lines(&entries)?,
        OutputFormat::Table => table::to_table(&entries),
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    if !diagnostics.is_empty() {
        let removed = diagnostics.iter().filter(|d| d.removed).count();
        eprintln!("Skipped {} file(s), {removed} deleted", diagnostics.len());
    }

    Ok(())
}

/// Layer offsets: legacy preset, then config file, then `--offset` flags
fn build_scanner(args: &ScanArgs, config: &Config) -> Result<Scanner> {
    let base = if args.legacy_offsets {
        FormatOffsets::legacy_consoles()
    } else {
        FormatOffsets::new()
    };
    let offsets = base
        .merged(&config.format_offsets())
        .merged(&parse_offsets(&args.offsets)?);

    Ok(Scanner::new(offsets)
        .with_full_hash(args.md5 || config.full_hash)
        .with_cleanup(args.clean || config.cleanup_corrupt)
        .with_chunk_size(config.chunk_size))
}

fn parse_offsets(args: &[String]) -> Result<FormatOffsets> {
    let mut pairs = Vec::with_capacity(args.len());
    for arg in args {
        let (ext, bytes) = split_pair(arg, "offset")?;
        let bytes: u64 = bytes
            .parse()
            .with_context(|| format!("Invalid offset value in '{arg}'"))?;
        pairs.push((ext.to_string(), bytes));
    }
    Ok(pairs.into_iter().collect())
}
