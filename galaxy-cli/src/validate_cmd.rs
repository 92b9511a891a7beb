//! Validate command - lint submissions before they are scored

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use galaxy_extract::{find_mission_files, lint_document, LintReport};

#[derive(Args)]
pub struct ValidateArgs {
    /// Submission files or directories to check
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// File-name pattern used inside directories
    #[arg(long, default_value = "*.json")]
    pub pattern: String,

    /// Output the reports as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(serde::Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    #[serde(flatten)]
    report: LintReport,
}

/// Run validate command; fails when any file is invalid
pub fn run(args: ValidateArgs) -> Result<()> {
    let files = collect_files(&args.paths, &args.pattern)?;
    if files.is_empty() {
        bail!("No files matching {} found", args.pattern);
    }

    let reports: Vec<FileReport> = files.iter().map(|path| lint_file(path)).collect();
    let invalid = reports.iter().filter(|r| !r.valid).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
    }

    if invalid > 0 {
        bail!("{} of {} files are invalid", invalid, reports.len());
    }
    Ok(())
}

fn collect_files(paths: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = find_mission_files(path, Some(pattern))
                .with_context(|| format!("Failed to read directory {}", path.display()))?;
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn lint_file(path: &Path) -> FileReport {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));

    let report = match parsed {
        Ok(document) => lint_document(&document, path),
        Err(reason) => LintReport {
            errors: vec![format!("unreadable JSON: {}", reason)],
            suggestions: Vec::new(),
        },
    };

    FileReport {
        file: path.display().to_string(),
        valid: report.is_valid(),
        report,
    }
}

fn print_reports(reports: &[FileReport]) {
    for entry in reports {
        let status = if entry.valid { "OK" } else { "INVALID" };
        println!("{:<8} {}", status, entry.file);
        for error in &entry.report.errors {
            println!("  error: {}", error);
        }
        for suggestion in &entry.report.suggestions {
            println!("  hint:  {}", suggestion);
        }
    }

    let valid = reports.iter().filter(|r| r.valid).count();
    println!("\nValid: {}  Invalid: {}  Total: {}", valid, reports.len() - valid, reports.len());
}
