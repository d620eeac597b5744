//! Correlation of coverage blocks with on-disk source content.
//!
//! The correlator reads the literal path recorded in the profile; an
//! unreadable file is not an error, it just renders as "source not found".
//! The candidate-path search is a CLI-side diagnostic and plays no part in
//! correlation.

use std::path::{Path, PathBuf};

use crate::model::{CoverageStats, FileCoverage};

/// One physical source line annotated with its execution count.
#[derive(Debug, Clone)]
pub struct LineCoverage {
    /// 1-based line number.
    pub line_number: u32,
    /// Raw line text, without the trailing newline.
    pub content: String,
    pub count: u64,
    pub is_covered: bool,
    /// Whether any block touched this line. Distinguishes a line that ran
    /// zero times from a line with no coverage data at all.
    pub has_data: bool,
}

/// A source file's annotated lines plus its statement totals.
#[derive(Debug)]
pub struct FileWithSource {
    pub path: String,
    pub lines: Vec<LineCoverage>,
    pub has_source: bool,
    pub stats: CoverageStats,
}

/// Read the file at the literal recorded path and annotate each line with
/// its coverage count.
///
/// Every line starts at count 0 with no data. Blocks are then applied in
/// stored order: each physical line in `[start_line, end_line]` that exists
/// in the file takes the block's count, so later blocks win on overlaps.
/// A file that cannot be read yields an empty line list with `has_source`
/// false, never an error.
#[must_use]
pub fn file_with_source(path: &str, coverage: &FileCoverage) -> FileWithSource {
    let stats = coverage.stats();

    let Ok(content) = std::fs::read_to_string(path) else {
        return FileWithSource {
            path: path.to_string(),
            lines: Vec::new(),
            has_source: false,
            stats,
        };
    };

    let mut lines: Vec<LineCoverage> = content
        .lines()
        .enumerate()
        .map(|(i, text)| LineCoverage {
            line_number: i as u32 + 1,
            content: text.to_string(),
            count: 0,
            is_covered: false,
            has_data: false,
        })
        .collect();

    for block in &coverage.blocks {
        let first = block.start_line.max(1) as usize;
        let last = (block.end_line as usize).min(lines.len());
        for line_num in first..=last {
            let line = &mut lines[line_num - 1];
            line.count = block.count;
            line.is_covered = block.count > 0;
            line.has_data = true;
        }
    }

    FileWithSource {
        path: path.to_string(),
        lines,
        has_source: true,
        stats,
    }
}

/// Candidate on-disk locations for a profile path, in the order the CLI's
/// pre-flight check tries them: the literal path, the bare file name, then
/// each suffix produced by dropping leading segments one at a time.
#[must_use]
pub fn candidate_paths(path: &str) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(path)];

    if let Some(name) = Path::new(path).file_name() {
        candidates.push(PathBuf::from(name));
    }

    let parts: Vec<&str> = path.split('/').collect();
    for i in 1..parts.len() {
        candidates.push(parts[i..].iter().collect());
    }

    candidates
}

/// Whether any candidate location for `path` exists on disk. Used only for
/// the CLI's "sources missing" warning.
#[must_use]
pub fn source_exists(path: &str) -> bool {
    candidate_paths(path).iter().any(|c| c.exists())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::model::CoverageBlock;

    fn block(start_line: u32, end_line: u32, num_stmt: u32, count: u64) -> CoverageBlock {
        CoverageBlock {
            start_line,
            start_col: 1,
            end_line,
            end_col: 2,
            num_stmt,
            count,
        }
    }

    fn write_source(dir: &tempfile::TempDir, name: &str, lines: usize) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for i in 1..=lines {
            writeln!(file, "line {i}").unwrap();
        }
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_annotates_lines_from_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "main.go", 6);

        let coverage = FileCoverage {
            path: path.clone(),
            blocks: vec![block(2, 3, 2, 4), block(5, 6, 1, 0)],
        };
        let source = file_with_source(&path, &coverage);

        assert!(source.has_source);
        assert_eq!(source.lines.len(), 6);
        assert_eq!(source.lines[0].count, 0);
        assert!(!source.lines[0].has_data);

        assert_eq!(source.lines[1].count, 4);
        assert!(source.lines[1].is_covered);
        assert!(source.lines[1].has_data);
        assert_eq!(source.lines[2].count, 4);

        // Touched by a zero-count block: uncovered, but has data.
        assert_eq!(source.lines[4].count, 0);
        assert!(!source.lines[4].is_covered);
        assert!(source.lines[4].has_data);

        assert_eq!(source.lines[3].content, "line 4");
        assert_eq!(source.stats.total, 3);
        assert_eq!(source.stats.covered, 2);
    }

    #[test]
    fn test_overlapping_blocks_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "overlap.go", 10);

        let coverage = FileCoverage {
            path: path.clone(),
            blocks: vec![block(1, 8, 3, 7), block(5, 10, 2, 0)],
        };
        let source = file_with_source(&path, &coverage);

        // Lines 1-4 keep the first block's count; 5-8 are overwritten by
        // the later zero-count block even though they ran 7 times before.
        assert_eq!(source.lines[3].count, 7);
        assert!(source.lines[3].is_covered);
        assert_eq!(source.lines[4].count, 0);
        assert!(!source.lines[4].is_covered);
        assert!(source.lines[4].has_data);
        assert_eq!(source.lines[9].count, 0);
    }

    #[test]
    fn test_out_of_range_lines_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "short.go", 3);

        let coverage = FileCoverage {
            path: path.clone(),
            blocks: vec![block(2, 99, 1, 5), block(0, 0, 1, 9)],
        };
        let source = file_with_source(&path, &coverage);

        assert_eq!(source.lines.len(), 3);
        assert_eq!(source.lines[0].count, 0);
        assert_eq!(source.lines[1].count, 5);
        assert_eq!(source.lines[2].count, 5);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let coverage = FileCoverage {
            path: "does/not/exist.go".to_string(),
            blocks: vec![block(1, 2, 3, 1)],
        };
        let source = file_with_source("does/not/exist.go", &coverage);

        assert!(!source.has_source);
        assert!(source.lines.is_empty());
        // Stats still come from the blocks.
        assert_eq!(source.stats.total, 3);
        assert_eq!(source.stats.covered, 3);
    }

    #[test]
    fn test_candidate_paths_order() {
        let candidates = candidate_paths("a/b/c.go");
        let expected: Vec<PathBuf> = ["a/b/c.go", "c.go", "b/c.go", "c.go"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn test_candidate_paths_bare_name() {
        assert_eq!(candidate_paths("main.go"), vec![PathBuf::from("main.go"), PathBuf::from("main.go")]);
    }

    #[test]
    fn test_source_exists_via_literal_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "here.go", 1);
        assert!(source_exists(&path));
        assert!(!source_exists("nope/missing.go"));
    }
}
