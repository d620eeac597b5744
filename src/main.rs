use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use covhtml::{html, parser, source};

/// covhtml — render a Go coverage profile as a self-contained HTML report.
#[derive(Parser)]
#[command(name = "covhtml", version, about)]
struct Cli {
    /// Path to the coverage profile.
    #[arg(short, long, default_value = "coverage.out")]
    input: PathBuf,

    /// Path to the output HTML file.
    #[arg(short, long, default_value = "coverage.html")]
    output: PathBuf,

    /// Suppress progress messages.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    ensure!(
        cli.input.exists(),
        "coverage profile '{}' does not exist",
        cli.input.display()
    );

    if !cli.quiet {
        println!("Parsing coverage profile: {}", cli.input.display());
    }

    let report = parser::parse_coverage_file(&cli.input)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    if !cli.quiet {
        let overall = report.overall_stats();
        println!(
            "Overall coverage: {:.1}% ({}/{} statements)",
            overall.percentage(),
            overall.covered,
            overall.total
        );
        println!("Files analyzed: {}", report.files.len());

        let missing = report
            .files
            .keys()
            .filter(|path| !source::source_exists(path.as_str()))
            .count();
        if missing > 0 {
            println!("Warning: {missing} source files not found in the current directory");
            println!("  Run covhtml from your project root so sources can be annotated");
        }

        println!("Generating HTML report: {}", cli.output.display());
    }

    html::generate_report(&report, &cli.output)
        .with_context(|| format!("failed to generate {}", cli.output.display()))?;

    if !cli.quiet {
        println!(
            "Report generated; open {} in a browser to view it",
            cli.output.display()
        );
    }

    Ok(())
}
