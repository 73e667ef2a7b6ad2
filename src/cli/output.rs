//! Terminal reporting of packaging results.

use std::io::{self, Write};

use crate::packager::PackageResult;

const UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Formats a byte count with decimal units and three significant digits
/// (`0 B`, `999 B`, `1 kB`, `1.34 MB`).
pub fn format_size(bytes: u64) -> String {
    let mut exponent = 0;
    let mut threshold = 1000u128;
    while exponent < UNITS.len() - 1 && u128::from(bytes) >= threshold {
        exponent += 1;
        threshold *= 1000;
    }

    let scaled = bytes as f64 / 1000f64.powi(exponent as i32);
    format!("{} {}", three_significant(scaled), UNITS[exponent])
}

fn three_significant(value: f64) -> String {
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };

    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// One report line for a written artifact.
///
/// The first occurrence of `cwd` in the artifact path is shortened to `.`.
pub fn wrote_line(result: &PackageResult, cwd: Option<&str>) -> String {
    let name = match cwd {
        Some(cwd) if !cwd.is_empty() => result.name.replacen(cwd, ".", 1),
        _ => result.name.clone(),
    };
    format!(
        "> wrote: {} ({}) sha512:{}",
        name,
        format_size(result.size),
        result.sha512
    )
}

/// Writes one line per produced artifact, skipping empty entries.
///
/// Returns the number of lines written.
pub fn report_results<W: Write>(
    out: &mut W,
    results: &[Option<PackageResult>],
    cwd: Option<&str>,
) -> io::Result<usize> {
    let mut written = 0;
    for result in results.iter().flatten() {
        writeln!(out, "{}", wrote_line(result, cwd))?;
        written += 1;
    }
    Ok(written)
}
