use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use covpr::{github, ingest, process, render};

/// covpr — Post JaCoCo coverage summaries as pull request comments.
#[derive(Parser)]
#[command(name = "covpr", version, about)]
struct Cli {
    /// Comma-separated paths to JaCoCo XML reports.
    #[arg(long, value_delimiter = ',', required = true)]
    paths: Vec<PathBuf>,

    /// Minimum overall project coverage (percent).
    #[arg(long, default_value_t = 80.0)]
    min_coverage_overall: f64,

    /// Minimum coverage for each changed file (percent).
    #[arg(long, default_value_t = 80.0)]
    min_coverage_changed_files: f64,

    /// Title heading for the comment.
    #[arg(long, default_value = "")]
    title: String,

    /// Update an existing comment (matched by title) instead of adding one.
    #[arg(long)]
    update_comment: bool,

    /// Base revision of the compare range.
    #[arg(long)]
    base: String,

    /// Head revision of the compare range.
    #[arg(long)]
    head: String,

    /// Pull request number. Defaults to the one in GITHUB_REF; when neither
    /// is available the comment is printed to stdout instead of posted.
    #[arg(long)]
    pr_number: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let reports = ingest::load_reports(&cli.paths).context("Failed to load coverage reports")?;
    eprintln!("Loaded {} report(s)", reports.len());

    let overall = process::overall_coverage(&reports)
        .context("Failed to compute overall coverage")?;
    set_output("coverage-overall", &format!("{:.2}", overall.project))?;

    let ctx = github::Context::from_env()?;
    let changed_files = ctx.fetch_changed_files(&cli.base, &cli.head)?;
    eprintln!("{} file(s) changed", changed_files.len());

    let files_coverage = process::file_coverage(&reports, &changed_files);
    set_output(
        "coverage-changed-files",
        &format!("{:.2}", files_coverage.percentage),
    )?;

    let body = render::pr_comment(
        overall.project,
        &files_coverage,
        cli.min_coverage_overall,
        cli.min_coverage_changed_files,
        &cli.title,
    );

    match cli.pr_number.or(ctx.pr_number) {
        Some(pr_number) => {
            ctx.post_comment(pr_number, &render::title_line(&cli.title), &body, cli.update_comment)?;
        }
        None => println!("{body}"),
    }

    // Low coverage is not an error: the comment is posted first, then the
    // run itself is marked failed.
    let below_threshold = files_coverage
        .files
        .iter()
        .any(|f| f.percentage < cli.min_coverage_changed_files);
    if below_threshold {
        bail!(
            "Changed files must have at least {}% coverage",
            cli.min_coverage_changed_files
        );
    }

    Ok(())
}

/// Emit a machine-readable output. Appended to the $GITHUB_OUTPUT file when
/// running inside GitHub Actions, printed to stderr otherwise.
fn set_output(name: &str, value: &str) -> Result<()> {
    match std::env::var("GITHUB_OUTPUT") {
        Ok(path) => {
            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&path)
                .with_context(|| format!("Failed to open output file {path}"))?;
            writeln!(file, "{name}={value}")?;
        }
        Err(_) => eprintln!("{name}={value}"),
    }
    Ok(())
}
