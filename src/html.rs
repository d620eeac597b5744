//! HTML report generation.
//!
//! The report is a single self-contained document with inline styling and
//! script, safe to open offline. Files appear in sorted-by-path order in
//! the sidebar tree, the summary table, and the detail sections.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;

use crate::error::{CovhtmlError, Result};
use crate::model::{coverage_color, format_pct, CoverageReport, CoverageStats};
use crate::source::{file_with_source, FileWithSource};
use crate::tree::{build_file_tree, FileNode};

/// Per-file data projected for the document: stats plus annotated source.
struct FileDetail<'a> {
    path: &'a str,
    pct: f64,
    color: &'static str,
    stats: CoverageStats,
    source: FileWithSource,
}

/// Render `report` into a newly created file at `output_path`.
pub fn generate_report(report: &CoverageReport, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|source| CovhtmlError::CreateOutput {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    render_report(report, &mut writer)?;
    writer.flush().map_err(CovhtmlError::WriteReport)
}

/// Render the full document to `out`. Write failures are the only error
/// condition; the document content is deterministic for a given report and
/// filesystem state, apart from the generation timestamp in the footer.
pub fn render_report(report: &CoverageReport, out: &mut impl Write) -> Result<()> {
    let html = render_to_string(report);
    out.write_all(html.as_bytes())
        .map_err(CovhtmlError::WriteReport)
}

fn render_to_string(report: &CoverageReport) -> String {
    // BTreeMap iteration gives sorted-by-path order everywhere below.
    let details: Vec<FileDetail<'_>> = report
        .files
        .iter()
        .map(|(path, coverage)| {
            let stats = coverage.stats();
            let pct = stats.percentage();
            FileDetail {
                path,
                pct,
                color: coverage_color(pct),
                stats,
                source: file_with_source(path, coverage),
            }
        })
        .collect();

    // Section anchors by path, shared by the sidebar and summary table.
    let anchors: HashMap<&str, usize> = details
        .iter()
        .enumerate()
        .map(|(i, d)| (d.path, i))
        .collect();

    let overall = report.overall_stats();
    let overall_pct = overall.percentage();
    let tree = build_file_tree(report);

    let mut sidebar = String::new();
    render_tree_level(&tree, &anchors, &mut sidebar);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Coverage Report</title>
    <style>{style}</style>
</head>
<body>
    {header}
    <div class="container">
        <div class="sidebar">
            <div class="sidebar-header">&#128193; Files</div>
            <div class="file-tree">{sidebar}</div>
        </div>
        <div class="content">
            {summary}
            {sections}
            <div class="footer">Generated by covhtml on {timestamp} UTC</div>
        </div>
    </div>
    <script>{script}</script>
</body>
</html>
"#,
        style = inline_css(),
        header = render_header(report, overall, overall_pct),
        sidebar = sidebar,
        summary = render_summary_table(&details, &anchors),
        sections = render_file_sections(&details),
        timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S"),
        script = inline_script(),
    )
}

fn render_header(report: &CoverageReport, overall: CoverageStats, overall_pct: f64) -> String {
    format!(
        r#"<div class="header">
        <h1>Coverage Report</h1>
        <div class="overall-stats">
            <div class="stat">
                <span class="stat-label">Overall coverage:</span>
                <span class="coverage-badge" style="background: {color}">{pct}</span>
            </div>
            <div class="stat">
                <span class="stat-label">Statements:</span>
                <span class="stat-value">{covered} / {total}</span>
            </div>
            <div class="stat">
                <span class="stat-label">Mode:</span>
                <span class="stat-value">{mode}</span>
            </div>
        </div>
    </div>"#,
        color = coverage_color(overall_pct),
        pct = format_pct(overall_pct),
        covered = overall.covered,
        total = overall.total,
        mode = html_escape(&report.mode),
    )
}

/// Render one level of the sidebar tree as a nested list. Directories show
/// their aggregated badge; files link to their detail section.
fn render_tree_level(node: &FileNode<'_>, anchors: &HashMap<&str, usize>, out: &mut String) {
    if node.children.is_empty() {
        return;
    }
    out.push_str("<ul class=\"tree\">");
    for child in &node.children {
        if child.is_dir {
            let pct = child.coverage_percentage();
            write!(
                out,
                "<li><div class=\"tree-dir\"><span class=\"tree-icon\">&#128193;</span>\
                 <span class=\"tree-name\">{name}</span>\
                 <span class=\"tree-coverage\" style=\"background: {color}\">{pct}</span></div>",
                name = html_escape(&child.name),
                color = coverage_color(pct),
                pct = format_pct(pct),
            )
            .unwrap();
            render_tree_level(child, anchors, out);
            out.push_str("</li>");
        } else {
            let pct = child.coverage.map_or(0.0, |c| c.stats().percentage());
            let anchor = anchors.get(child.path.as_str()).copied().unwrap_or(0);
            write!(
                out,
                "<li><div class=\"tree-node\" data-target=\"file-{anchor}\">\
                 <span class=\"tree-icon\">&#128196;</span>\
                 <span class=\"tree-name\">{name}</span>\
                 <span class=\"tree-coverage\" style=\"background: {color}\">{pct}</span></div></li>",
                name = html_escape(&child.name),
                color = coverage_color(pct),
                pct = format_pct(pct),
            )
            .unwrap();
        }
    }
    out.push_str("</ul>");
}

fn render_summary_table(details: &[FileDetail<'_>], anchors: &HashMap<&str, usize>) -> String {
    let mut rows = String::new();
    for detail in details {
        let anchor = anchors.get(detail.path).copied().unwrap_or(0);
        write!(
            rows,
            r#"<tr class="summary-row" data-target="file-{anchor}">
                <td class="path-cell">{path}</td>
                <td class="coverage-cell"><span class="coverage-badge" style="background: {color}">{pct}</span></td>
                <td class="statements-cell">{covered} / {total}</td>
            </tr>"#,
            path = html_escape(detail.path),
            color = detail.color,
            pct = format_pct(detail.pct),
            covered = detail.stats.covered,
            total = detail.stats.total,
        )
        .unwrap();
    }

    format!(
        r#"<div class="section-title">Coverage Summary</div>
            <div class="file-section">
                <table class="summary-table">
                    <thead>
                        <tr><th>File</th><th class="coverage-cell">Coverage</th><th class="statements-cell">Statements</th></tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>"#
    )
}

fn render_file_sections(details: &[FileDetail<'_>]) -> String {
    let mut out = String::from(r#"<div class="section-title">File Details</div>"#);
    for (index, detail) in details.iter().enumerate() {
        let body = if detail.source.has_source {
            let mut table = String::from(r#"<div class="code-container"><table class="code-table">"#);
            for line in &detail.source.lines {
                let class = if line.is_covered {
                    "line-covered"
                } else if line.has_data {
                    "line-uncovered"
                } else {
                    "line-neutral"
                };
                write!(
                    table,
                    r#"<tr class="{class}"><td class="line-number">{num}</td><td class="line-content">{content}</td></tr>"#,
                    num = line.line_number,
                    content = html_escape(&line.content),
                )
                .unwrap();
            }
            table.push_str("</table></div>");
            table
        } else {
            r#"<div class="no-source">&#9888; Source file not found<br><small>Run covhtml from your project root so sources can be annotated</small></div>"#.to_string()
        };

        write!(
            out,
            r#"<div class="file-section" id="file-{index}">
                <div class="file-header">
                    <div class="file-name">{path}</div>
                    <div class="file-stats">
                        <span>{covered} / {total} statements</span>
                        <span class="coverage-badge" style="background: {color}">{pct}</span>
                    </div>
                </div>
                {body}
            </div>"#,
            path = html_escape(detail.path),
            covered = detail.stats.covered,
            total = detail.stats.total,
            color = detail.color,
            pct = format_pct(detail.pct),
        )
        .unwrap();
    }
    out
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn inline_css() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f6f8fa; color: #24292e; line-height: 1.5; }
    .header { background: #24292e; color: white; padding: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    .header h1 { font-size: 28px; font-weight: 600; margin-bottom: 10px; }
    .overall-stats { display: flex; gap: 30px; margin-top: 15px; font-size: 14px; }
    .stat { display: flex; align-items: center; gap: 8px; }
    .stat-label { opacity: 0.8; }
    .stat-value { font-weight: 600; font-size: 16px; }
    .coverage-badge { display: inline-block; padding: 4px 12px; border-radius: 12px; font-weight: 600; font-size: 14px; color: white; }
    .container { display: flex; max-width: 100%; margin: 0 auto; min-height: calc(100vh - 120px); }
    .sidebar { width: 320px; background: white; border-right: 1px solid #e1e4e8; overflow-y: auto; position: sticky; top: 0; height: 100vh; }
    .sidebar-header { padding: 15px 20px; border-bottom: 1px solid #e1e4e8; font-weight: 600; background: #f6f8fa; }
    .file-tree { padding: 10px; font-size: 13px; }
    .file-tree ul.tree { list-style: none; padding-left: 14px; }
    .file-tree > ul.tree { padding-left: 0; }
    .tree-node, .tree-dir { padding: 4px 6px; display: flex; align-items: center; gap: 6px; border-radius: 4px; }
    .tree-node { cursor: pointer; transition: background 0.2s; }
    .tree-node:hover { background: #f6f8fa; }
    .tree-node.active { background: #e1e4e8; font-weight: 600; }
    .tree-icon { width: 16px; font-size: 12px; }
    .tree-name { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
    .tree-coverage { margin-left: auto; font-size: 11px; padding: 1px 6px; border-radius: 6px; font-weight: 600; color: white; }
    .content { flex: 1; padding: 20px; overflow-x: auto; }
    .file-section { background: white; border-radius: 6px; margin-bottom: 20px; border: 1px solid #e1e4e8; overflow: hidden; }
    .file-header { padding: 15px 20px; background: #f6f8fa; border-bottom: 1px solid #e1e4e8; display: flex; justify-content: space-between; align-items: center; }
    .file-name { font-weight: 600; font-size: 16px; font-family: monospace; }
    .file-stats { display: flex; gap: 15px; font-size: 13px; align-items: center; }
    .code-container { overflow-x: auto; }
    .code-table { width: 100%; border-collapse: collapse; font-family: monospace; font-size: 13px; }
    .code-table td { padding: 0; vertical-align: top; }
    .line-number { width: 50px; text-align: right; padding: 2px 10px; color: #6a737d; user-select: none; background: #f6f8fa; border-right: 1px solid #e1e4e8; }
    .line-content { padding: 2px 10px; white-space: pre; overflow-x: auto; }
    .line-covered { background: #e6ffed; }
    .line-uncovered { background: #ffeef0; }
    .line-neutral { background: white; }
    .no-source { padding: 40px; text-align: center; color: #6a737d; }
    .summary-table { width: 100%; border-collapse: collapse; background: white; }
    .summary-table th { background: #f6f8fa; padding: 12px 15px; text-align: left; font-weight: 600; border-bottom: 1px solid #e1e4e8; }
    .summary-table td { padding: 10px 15px; border-bottom: 1px solid #e1e4e8; }
    .summary-table tr:last-child td { border-bottom: none; }
    .summary-row { cursor: pointer; }
    .summary-row:hover { background: #f6f8fa; }
    .path-cell { font-family: monospace; font-size: 13px; }
    .coverage-cell { text-align: center; width: 100px; }
    .statements-cell { text-align: center; width: 120px; font-size: 13px; color: #6a737d; }
    .section-title { font-size: 20px; font-weight: 600; margin: 20px 0 15px; padding-bottom: 10px; border-bottom: 2px solid #e1e4e8; }
    .footer { margin-top: 30px; padding: 10px 0; font-size: 12px; color: #6a737d; text-align: center; }
    "#
}

fn inline_script() -> &'static str {
    r#"
    function revealFile(targetId) {
        const section = document.getElementById(targetId);
        if (!section) return;
        section.scrollIntoView({ behavior: 'smooth', block: 'start' });
        document.querySelectorAll('.tree-node').forEach(n => n.classList.remove('active'));
        const node = document.querySelector('.tree-node[data-target="' + targetId + '"]');
        if (node) node.classList.add('active');
    }
    document.querySelectorAll('[data-target]').forEach(el => {
        el.addEventListener('click', () => revealFile(el.dataset.target));
    });
    "#
}
