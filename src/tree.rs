//! Hierarchical file tree synthesized from the report's flat path set, with
//! bottom-up statement aggregation for directory badges. The tree borrows
//! its coverage data from the report and is never mutated after building.

use crate::model::{CoverageReport, CoverageStats, FileCoverage};

/// One node of the synthesized tree. File nodes carry a reference to their
/// coverage; directories own nothing but their children.
#[derive(Debug)]
pub struct FileNode<'a> {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub children: Vec<FileNode<'a>>,
    pub coverage: Option<&'a FileCoverage>,
}

impl<'a> FileNode<'a> {
    fn new(name: &str, path: String, is_dir: bool) -> Self {
        Self {
            name: name.to_string(),
            path,
            is_dir,
            children: Vec::new(),
            coverage: None,
        }
    }

    /// Coverage percentage for this node.
    ///
    /// A file reports its own stats. A directory sums over its direct
    /// children: file children always contribute their totals, directory
    /// children contribute theirs only when their own recursive percentage
    /// is non-zero.
    #[must_use]
    pub fn coverage_percentage(&self) -> f64 {
        if !self.is_dir {
            return self.coverage.map_or(0.0, |c| c.stats().percentage());
        }

        let mut sums = CoverageStats::default();
        for child in &self.children {
            if let Some(coverage) = child.coverage {
                sums.add(coverage.stats());
            } else if child.is_dir && child.coverage_percentage() > 0.0 {
                sums.add(child.total_statements());
            }
        }
        sums.percentage()
    }

    /// Statement totals over every file in this subtree.
    #[must_use]
    pub fn total_statements(&self) -> CoverageStats {
        if let Some(coverage) = self.coverage {
            return coverage.stats();
        }

        let mut sums = CoverageStats::default();
        for child in &self.children {
            sums.add(child.total_statements());
        }
        sums
    }
}

/// Build the tree for every file in the report.
///
/// Each path is split on `/` and walked from the root, reusing existing
/// children by name. The final segment becomes a file node holding the
/// coverage reference; intermediate segments become directories. Every
/// child list is then sorted recursively: directories before files,
/// alphabetical within each group.
#[must_use]
pub fn build_file_tree(report: &CoverageReport) -> FileNode<'_> {
    let mut root = FileNode::new("root", String::new(), true);

    for (path, coverage) in &report.files {
        let parts: Vec<&str> = path.split('/').collect();
        let mut current = &mut root;
        for (i, part) in parts.iter().enumerate() {
            let is_last = i == parts.len() - 1;
            let pos = match current.children.iter().position(|c| c.name == *part) {
                Some(pos) => pos,
                None => {
                    let node_path = parts[..=i].join("/");
                    current
                        .children
                        .push(FileNode::new(part, node_path, !is_last));
                    current.children.len() - 1
                }
            };
            current = &mut current.children[pos];
            if is_last {
                current.coverage = Some(coverage);
            }
        }
    }

    sort_file_tree(&mut root);
    root
}

fn sort_file_tree(node: &mut FileNode<'_>) {
    node.children
        .sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    for child in &mut node.children {
        sort_file_tree(child);
    }
}
