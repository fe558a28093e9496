//! Class file enhancer CLI.
//!
//! Reads `src/<main|test>/<tool>/classes` manifests, rewrites the listed class
//! files with the configured transformer, and keeps the originals under
//! `<build_dir>/<tool>/orig-classes` and `orig-test-classes`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use enhancer::core::types::{ArtifactOutcome, ArtifactSet, RunReport, SetStatus};
use enhancer::exit_codes;
use enhancer::io::config::{CONFIG_FILE, EnhancerConfig, load_config};
use enhancer::io::layout::SetLayout;
use enhancer::io::transformer::CommandTransformer;
use enhancer::logging;
use enhancer::pipeline::run_pipeline;
use enhancer::status::collect_status;

#[derive(Parser)]
#[command(
    name = "enhancer",
    version,
    about = "Rewrite compiled class files in place with an external bytecode transformer"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Project root that relative paths resolve against.
    #[arg(long, global = true, default_value = ".")]
    project_root: PathBuf,

    /// Config file (default: `<project-root>/enhance.toml`).
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Compiled main classes directory.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Compiled test classes directory.
    #[arg(long, global = true)]
    test_output_dir: Option<PathBuf>,

    /// Build output directory used for default backup locations.
    #[arg(long, global = true)]
    build_dir: Option<PathBuf>,

    /// Classpath entry for the transformer (repeatable; replaces configured entries).
    #[arg(long = "classpath", global = true)]
    classpath: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Enhance every stale artifact listed in the manifests.
    Enhance {
        /// Process only one artifact set.
        #[arg(long, value_enum)]
        only: Option<SetArg>,

        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Report which artifacts need enhancement without modifying anything.
    Status {
        /// Inspect only one artifact set.
        #[arg(long, value_enum)]
        only: Option<SetArg>,

        /// Print the status report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SetArg {
    Main,
    Test,
}

impl SetArg {
    fn sets(only: Option<SetArg>) -> Vec<ArtifactSet> {
        match only {
            None => ArtifactSet::ALL.to_vec(),
            Some(SetArg::Main) => vec![ArtifactSet::Main],
            Some(SetArg::Test) => vec![ArtifactSet::Test],
        }
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = cli.global.project_root.clone();
    let cfg = resolve_config(&root, &cli.global)?;
    match cli.command {
        Command::Enhance { only, json } => cmd_enhance(&root, &cfg, &SetArg::sets(only), json),
        Command::Status { only, json } => cmd_status(&root, &cfg, &SetArg::sets(only), json),
    }
}

/// Load the config file and apply command-line overrides.
fn resolve_config(root: &Path, args: &GlobalArgs) -> Result<EnhancerConfig> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILE));
    let mut cfg = load_config(&path).context("load config")?;

    if let Some(dir) = &args.output_dir {
        cfg.set_mut(ArtifactSet::Main).output_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.test_output_dir {
        cfg.set_mut(ArtifactSet::Test).output_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.build_dir {
        cfg.build_dir = dir.clone();
    }
    if !args.classpath.is_empty() {
        cfg.transformer.classpath = args.classpath.clone();
    }
    cfg.validate().context("validate config overrides")?;
    Ok(cfg)
}

fn cmd_enhance(root: &Path, cfg: &EnhancerConfig, sets: &[ArtifactSet], json: bool) -> Result<i32> {
    let has_manifest = sets
        .iter()
        .any(|&set| SetLayout::resolve(root, cfg, set).has_manifest());
    let report = if has_manifest {
        let transformer = CommandTransformer::from_config(root, &cfg.transformer)?;
        run_pipeline(root, cfg, sets, &transformer)?
    } else {
        info!("no manifests found, nothing to enhance");
        RunReport::default()
    };

    if json {
        print_json(&report)?;
    } else {
        for set in &report.sets {
            println!(
                "enhance: set={} enhanced={} up_to_date={}",
                set.set,
                set.count(ArtifactOutcome::Enhanced),
                set.count(ArtifactOutcome::UpToDate)
            );
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_status(root: &Path, cfg: &EnhancerConfig, sets: &[ArtifactSet], json: bool) -> Result<i32> {
    let statuses = collect_status(root, cfg, sets)?;

    if json {
        print_json(&statuses)?;
    } else {
        for set in &statuses {
            for artifact in &set.artifacts {
                let label = if artifact.staleness.needs_enhancement() {
                    "stale"
                } else {
                    "up-to-date"
                };
                println!("{} {} {}", set.set, label, artifact.artifact);
            }
        }
    }

    let stale: usize = statuses.iter().map(SetStatus::stale_count).sum();
    Ok(if stale > 0 {
        exit_codes::STALE
    } else {
        exit_codes::OK
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{payload}");
    Ok(())
}
