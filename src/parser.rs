//! Parser for the line-oriented coverage profile format.
//!
//! Format:
//!   mode: set|count|atomic
//!   <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>
//!
//! The first line is a header and is never treated as a block, whether or
//! not it carries a `mode:` prefix. Block lines that do not match the
//! expected shape are skipped silently; numeric fields that fail to parse
//! coerce to zero. Only open and read failures are errors.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CovhtmlError, Result};
use crate::model::{CoverageBlock, CoverageReport};

/// Parse the coverage profile at `path`.
///
/// A missing `mode:` header or a profile with zero valid block lines both
/// produce an empty (but valid) report.
pub fn parse_coverage_file(path: &Path) -> Result<CoverageReport> {
    let file = File::open(path).map_err(|source| CovhtmlError::OpenProfile {
        path: path.to_path_buf(),
        source,
    })?;
    parse(BufReader::new(file))
}

/// Parse a coverage profile from any buffered reader.
pub fn parse(mut reader: impl BufRead) -> Result<CoverageReport> {
    let mut report = CoverageReport::new();
    let mut raw_line = String::new();
    let mut line_num = 0u64;

    loop {
        raw_line.clear();
        let n = reader
            .read_line(&mut raw_line)
            .map_err(CovhtmlError::ReadProfile)?;
        if n == 0 {
            break;
        }
        line_num += 1;

        // The header line is consumed unconditionally, block-shaped or not.
        if line_num == 1 {
            if let Some(mode) = raw_line.strip_prefix("mode:") {
                report.mode = mode.trim().to_string();
            }
            continue;
        }

        if let Some((path, block)) = parse_block_line(&raw_line) {
            report.add_block(path, block);
        }
    }

    Ok(report)
}

/// Parse one block line, returning the file path and block, or `None` for
/// any line that does not match the expected shape.
fn parse_block_line(line: &str) -> Option<(&str, CoverageBlock)> {
    let mut fields = line.split_whitespace();
    let position = fields.next()?;
    let num_stmt = fields.next()?;
    let count = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    // The first `:` separates the file path from the position span.
    let (path, span) = position.split_once(':')?;
    let (start, end) = split_exact2(span, ',')?;
    let (start_line, start_col) = parse_position(start)?;
    let (end_line, end_col) = parse_position(end)?;

    Some((
        path,
        CoverageBlock {
            start_line,
            start_col,
            end_line,
            end_col,
            num_stmt: parse_or_zero(num_stmt),
            count: parse_or_zero(count),
        },
    ))
}

/// A `<line>.<col>` pair. Exactly one dot is required; the numbers
/// themselves are lenient.
fn parse_position(pair: &str) -> Option<(u32, u32)> {
    let (line, col) = split_exact2(pair, '.')?;
    Some((parse_or_zero(line), parse_or_zero(col)))
}

/// Split into exactly two parts on `sep`, rejecting extra separators.
fn split_exact2(s: &str, sep: char) -> Option<(&str, &str)> {
    let (head, tail) = s.split_once(sep)?;
    if tail.contains(sep) {
        return None;
    }
    Some((head, tail))
}

/// Integer parse with the profile's leniency: a field that is not an
/// integer counts as zero.
fn parse_or_zero<T: std::str::FromStr + Default>(field: &str) -> T {
    field.parse().unwrap_or_default()
}
