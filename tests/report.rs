use std::io::Write;
use std::path::Path;

use covhtml::error::CovhtmlError;
use covhtml::{html, parser};

/// Write a throwaway source file and return its absolute path as a string,
/// suitable for use as a profile path (the correlator reads literal paths).
fn write_source(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn end_to_end_report() {
    let dir = tempfile::tempdir().unwrap();

    let main_path = write_source(
        &dir,
        "main.go",
        "package main\n\nfunc main() {\n\trun()\n}\n\nfunc run() {\n\tpanic(\"never\")\n}\n",
    );
    let gone_path = dir.path().join("gone.go");
    let gone_path = gone_path.to_str().unwrap();

    let profile = format!(
        "mode: count\n\
         {main_path}:3.13,5.2 2 4\n\
         {main_path}:7.12,9.2 1 0\n\
         {gone_path}:1.1,2.2 1 1\n\
         malformed line here extra\n"
    );
    let profile_path = dir.path().join("coverage.out");
    std::fs::write(&profile_path, profile).unwrap();

    let report = parser::parse_coverage_file(&profile_path).unwrap();
    assert_eq!(report.mode, "count");
    assert_eq!(report.files.len(), 2);

    let overall = report.overall_stats();
    assert_eq!(overall.total, 4);
    assert_eq!(overall.covered, 3);

    let out_path = dir.path().join("coverage.html");
    html::generate_report(&report, &out_path).unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("count"));
    assert!(written.contains(&main_path));
    assert!(written.contains(gone_path));

    // Annotated source for the file that exists...
    assert!(written.contains(r#"<tr class="line-covered">"#));
    assert!(written.contains(r#"<tr class="line-uncovered">"#));
    assert!(written.contains("panic(&quot;never&quot;)"));
    // ...and the placeholder for the one that does not.
    assert!(written.contains("Source file not found"));
}

#[test]
fn missing_profile_is_an_open_error() {
    let err = parser::parse_coverage_file(Path::new("no/such/coverage.out")).unwrap_err();
    assert!(matches!(err, CovhtmlError::OpenProfile { .. }));
}

#[test]
fn empty_profile_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let profile_path = dir.path().join("coverage.out");
    std::fs::write(&profile_path, "mode: set\n").unwrap();

    let report = parser::parse_coverage_file(&profile_path).unwrap();
    assert!(report.files.is_empty());
    assert_eq!(report.overall_stats().percentage(), 0.0);

    let out_path = dir.path().join("coverage.html");
    html::generate_report(&report, &out_path).unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>"));
    assert!(written.contains("0.0%"));
}
