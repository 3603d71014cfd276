use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::correlate::CorrelateOptions;
use crate::git::RenameOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub debug: Option<bool>,
    pub context_lines: Option<u32>,
    pub rename_detection: Option<bool>,
    pub rename_threshold: Option<f32>,
    pub workers: Option<usize>,
    pub json: Option<bool>,
    pub patch: Option<bool>,
}

impl Config {
    pub fn load() -> color_eyre::eyre::Result<Self> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn get_config_path() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("revline")
            .join("config.json")
    }

    pub fn merge_with_args(&self, args: &Args) -> Self {
        Self {
            debug: if args.debug { Some(true) } else { self.debug },
            context_lines: args.context_lines.or(self.context_lines),
            rename_detection: if args.no_renames {
                Some(false)
            } else {
                self.rename_detection
            },
            rename_threshold: args.rename_threshold.or(self.rename_threshold),
            workers: args.workers.or(self.workers),
            json: if args.json { Some(true) } else { self.json },
            patch: if args.patch { Some(true) } else { self.patch },
        }
    }

    /// Get the per-hunk context line count with the conventional default
    pub fn get_context_lines(&self) -> u32 {
        self.context_lines.unwrap_or(3)
    }

    pub fn rename_options(&self) -> RenameOptions {
        let defaults = RenameOptions::default();
        RenameOptions {
            detect: self.rename_detection.unwrap_or(defaults.detect),
            threshold: self.rename_threshold.unwrap_or(defaults.threshold),
        }
    }

    pub fn correlate_options(&self) -> CorrelateOptions {
        CorrelateOptions {
            context_lines: self.get_context_lines(),
            rename: self.rename_options(),
            workers: self.workers,
        }
    }
}

#[derive(Debug, Clone, clap::Parser)]
pub struct Args {
    #[arg(help = "Base revision (branch, tag, SHA, or relative like HEAD~1)")]
    pub base: Option<String>,

    #[arg(help = "Target revision whose lines get annotated")]
    pub target: Option<String>,

    #[arg(short, long, help = "Repository root (defaults to current directory)")]
    pub repo: Option<PathBuf>,

    #[arg(short, long, help = "Unchanged context lines around each hunk")]
    pub context_lines: Option<u32>,

    #[arg(long, help = "Disable rename detection")]
    pub no_renames: bool,

    #[arg(
        long,
        help = "Minimum content similarity (0.0-1.0) to classify a rename"
    )]
    pub rename_threshold: Option<f32>,

    #[arg(
        long,
        help = "Concurrent file diffs (defaults to available parallelism)"
    )]
    pub workers: Option<usize>,

    #[arg(long, help = "Emit the report as JSON")]
    pub json: bool,

    #[arg(short, long, help = "Print each file's hunks in unified-diff form")]
    pub patch: bool,

    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    #[arg(short, long, help = "Print version information and exit")]
    pub version: bool,
}
