use clap::Parser;
use color_eyre::eyre::{Result, eyre};

mod config;
mod correlate;
mod error;
mod git;
mod logging;
mod patch;

use config::{Args, Config};
use correlate::{CorrelationReport, correlate};

include!(concat!(env!("OUT_DIR"), "/git_sha.rs"));

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("revline version 0.1.0 (git: {GIT_SHA})");
        return Ok(());
    }

    let config = Config::load()?;
    let final_config = config.merge_with_args(&args);

    logging::init_logging(final_config.debug.unwrap_or(false))?;
    color_eyre::install()?;

    let base = args
        .base
        .clone()
        .ok_or_else(|| eyre!("missing <base> revision"))?;
    let target = args
        .target
        .clone()
        .ok_or_else(|| eyre!("missing <target> revision"))?;
    let repo_path = match args.repo {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    log::info!("Correlating {base}..{target} in {repo_path:?}");
    let report = correlate(&repo_path, &base, &target, final_config.correlate_options()).await?;

    if final_config.json.unwrap_or(false) {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, final_config.patch.unwrap_or(false));
    }

    Ok(())
}

fn print_report(report: &CorrelationReport, show_patch: bool) {
    println!("base:   {}", report.base);
    println!("target: {}", report.target);

    for entry in &report.entries {
        let touched = entry.new_lines_touched();
        let name = match &entry.old_path {
            Some(old_path) => format!("{} -> {}", old_path, entry.path),
            None => entry.path.clone(),
        };
        if entry.patch.is_binary {
            println!("{} {name} (binary)", entry.kind.as_char());
        } else {
            println!(
                "{} {name} ({} hunks, {} new lines)",
                entry.kind.as_char(),
                entry.patch.hunks.len(),
                touched.len()
            );
            if show_patch {
                print!("{}", entry.patch.to_unified_string());
            }
        }
    }

    for failure in &report.failures {
        println!("! {}: {}", failure.path, failure.reason);
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    println!(
        "{} files correlated, {} failed",
        report.entries.len(),
        report.failures.len()
    );
}
