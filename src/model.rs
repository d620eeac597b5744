//! In-memory representation of a parsed coverage profile, plus the
//! statement statistics derived from it. The parser produces a
//! `CoverageReport` which the tree builder, source correlator, and renderer
//! all read without mutating.

use std::collections::BTreeMap;

/// Compute a coverage percentage, returning 0.0 when the total is zero.
#[must_use]
pub fn percentage(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    }
}

/// One entry from the coverage profile: a span of source positions, the
/// number of statements in the span, and how many times it executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageBlock {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub num_stmt: u32,
    pub count: u64,
}

/// All blocks recorded for a single source file, in profile order.
#[derive(Debug, Clone, Default)]
pub struct FileCoverage {
    pub path: String,
    pub blocks: Vec<CoverageBlock>,
}

impl FileCoverage {
    pub fn new(path: String) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Statement totals for this file. A block's statements count as covered
    /// when its execution count is non-zero.
    #[must_use]
    pub fn stats(&self) -> CoverageStats {
        let mut stats = CoverageStats::default();
        for block in &self.blocks {
            stats.total += u64::from(block.num_stmt);
            if block.count > 0 {
                stats.covered += u64::from(block.num_stmt);
            }
        }
        stats
    }
}

/// Statement totals for a file, a directory subtree, or a whole report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageStats {
    pub total: u64,
    pub covered: u64,
}

impl CoverageStats {
    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(self.covered, self.total)
    }

    pub fn add(&mut self, other: CoverageStats) {
        self.total += other.total;
        self.covered += other.covered;
    }
}

/// A fully parsed coverage profile: the mode header plus per-file blocks,
/// keyed by the path recorded in the profile.
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    /// Whatever followed `mode:` on the header line, trimmed. Not
    /// interpreted beyond being displayed.
    pub mode: String,
    pub files: BTreeMap<String, FileCoverage>,
}

impl CoverageReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block to the file's entry, creating the entry on first sight
    /// of the path.
    pub fn add_block(&mut self, path: &str, block: CoverageBlock) {
        self.files
            .entry(path.to_string())
            .or_insert_with(|| FileCoverage::new(path.to_string()))
            .blocks
            .push(block);
    }

    /// Statement totals summed across every file.
    #[must_use]
    pub fn overall_stats(&self) -> CoverageStats {
        let mut stats = CoverageStats::default();
        for file in self.files.values() {
            stats.add(file.stats());
        }
        stats
    }
}

/// Badge color for a coverage percentage. The bands partition [0, 100] and
/// boundary values belong to the higher band.
#[must_use]
pub fn coverage_color(pct: f64) -> &'static str {
    if pct >= 80.0 {
        "#4caf50"
    } else if pct >= 60.0 {
        "#8bc34a"
    } else if pct >= 40.0 {
        "#ff9800"
    } else if pct >= 20.0 {
        "#ff5722"
    } else {
        "#f44336"
    }
}

/// Render a percentage the way the report displays it, e.g. "82.5%".
#[must_use]
pub fn format_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}
