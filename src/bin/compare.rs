//! OpenAPI comparison CLI
//!
//! Compares a current OpenAPI document against a previous one and reports
//! severity-ranked differences.
//!
//! Usage:
//!   openapi-compare --current current.json --previous previous.json --csv
//!   openapi-compare --make-rules-file
//!   openapi-compare --help
//!
//! Exit status: 0 when no breaking findings, 1 when at least one Error- or
//! Critical-severity finding exists, 2 on any fatal error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use openapi_compare::{
    finalize, is_broken, ApiDocument, CompareConfig, Comparator, Diagnostic, RulePolicy,
};

#[derive(Parser)]
#[command(name = "openapi-compare")]
#[command(about = "Compare two OpenAPI documents and report breaking changes")]
struct Cli {
    /// Current (new) OpenAPI JSON document
    #[arg(short = 'c', long)]
    current: Option<PathBuf>,

    /// Previous (baseline) OpenAPI JSON document
    #[arg(short = 'p', long)]
    previous: Option<PathBuf>,

    /// JSON rule file overriding built-in severities
    #[arg(short = 'r', long)]
    rule_file: Option<PathBuf>,

    /// Output folder for report files
    #[arg(short = 'o', long)]
    output_folder: Option<PathBuf>,

    /// Write a CSV report
    #[arg(short = 'e', long)]
    csv: bool,

    /// Write a JSON dump of the diagnostics
    #[arg(short = 'j', long)]
    json_dump: bool,

    /// Write an HTML report
    #[arg(short = 'w', long)]
    web_report: bool,

    /// Write a sample rule file with the built-in defaults and exit
    #[arg(short = 'm', long)]
    make_rules_file: bool,

    /// Config file path
    #[arg(long)]
    config: Option<String>,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match run(cli) {
        Ok(false) => {
            eprintln!("✅ No breaking findings");
            std::process::exit(0);
        }
        Ok(true) => {
            eprintln!("❌ BREAKING FINDINGS DETECTED");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = CompareConfig::load_from(cli.config.as_deref())
        .context("loading configuration")?;

    // CLI flags override config values.
    if let Some(folder) = &cli.output_folder {
        config.reports.output_dir = folder.clone();
    }
    config.reports.csv |= cli.csv;
    config.reports.json |= cli.json_dump;
    config.reports.html |= cli.web_report;
    if cli.rule_file.is_some() {
        config.rules.file = cli.rule_file.clone();
    }

    if cli.make_rules_file {
        let path = config.reports.output_dir.join("rules.json");
        let bytes = RulePolicy::default().to_json()?;
        fs::write(&path, bytes)
            .with_context(|| format!("writing sample rule file {:?}", path))?;
        println!("Rules: {}", path.display());
        return Ok(false);
    }

    let current_path = cli
        .current
        .as_deref()
        .ok_or_else(|| anyhow!("--current is required"))?;
    let previous_path = cli
        .previous
        .as_deref()
        .ok_or_else(|| anyhow!("--previous is required"))?;

    let current = load_document(current_path)?;
    let previous = load_document(previous_path)?;

    let rules = match &config.rules.file {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("reading rule file {:?}", path))?;
            RulePolicy::load(&bytes).with_context(|| format!("parsing rule file {:?}", path))?
        }
        None => RulePolicy::default(),
    };

    let diagnostics = Comparator::new(&rules).compare(&current, &previous)?;
    let diagnostics = finalize(diagnostics);
    print_summary(&diagnostics);

    if config.reports.csv {
        let path = config.report_path("csv");
        openapi_compare::report::write_csv(&diagnostics, &path)?;
        println!("CSV: {}", path.display());
    }
    if config.reports.json {
        let path = config.report_path("json");
        openapi_compare::report::write_json(&diagnostics, &path)?;
        println!("JSON: {}", path.display());
    }
    if config.reports.html {
        let path = config.report_path("html");
        openapi_compare::report::write_html(&diagnostics, &path)?;
        println!("HTML: {}", path.display());
    }

    Ok(is_broken(&diagnostics))
}

fn load_document(path: &Path) -> anyhow::Result<ApiDocument> {
    let bytes = fs::read(path).with_context(|| format!("reading document {:?}", path))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing document {:?}", path))
}

fn print_summary(diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        println!(
            "{:<12} {:<12} {:<40} {}",
            d.severity, d.element, d.element_name, d.message
        );
    }

    let broken = diagnostics.iter().filter(|d| d.severity.is_breaking()).count();
    println!(
        "\n{} finding(s), {} breaking",
        diagnostics.len(),
        broken
    );
}
