//! Plain-text table output formatter

use crate::types::ArchiveEntry;
use std::fmt::Write;

/// Render entries as an aligned text table
#[must_use]
pub fn to_table(entries: &[ArchiveEntry]) -> String {
    let with_md5 = entries.iter().any(|e| e.md5.is_some());

    let mut header = vec!["ARCHIVE", "MEMBER", "CRC", "SIZE", "TYPE"];
    if with_md5 {
        header.push("MD5");
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            let archive = entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let size = entry
                .size_bytes()
                .map(format_bytes)
                .unwrap_or_else(|| entry.size.clone());

            let mut row = vec![
                archive,
                entry.file_name.clone(),
                entry.crc.clone(),
                size,
                entry.kind.to_string(),
            ];
            if with_md5 {
                row.push(entry.md5.clone().unwrap_or_else(|| "-".to_string()));
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, header.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut output, row.iter().map(String::as_str), &widths);
    }
    let _ = writeln!(output, "\n{} entries", entries.len());
    output
}

fn push_row<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    output.push_str(line.join("  ").trim_end());
    output.push('\n');
}

/// Human-readable size, exact below 1 KiB and binary units above
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} bytes");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
