use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use litepatch_core::{Config, Outcome, RunReport, StepRecord};
use litepatch_engine::Orchestrator;
use litepatch_templates::TemplateCatalog;

/// litepatch - switch a workspace's database package from PostgreSQL to SQLite
#[derive(Parser)]
#[command(name = "litepatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: <dir>/litepatch.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workspace root to patch (default: current directory)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch the manifest and write every artifact (default)
    Apply {
        /// Also save the run report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Show what apply would touch without writing anything
    Plan {
        /// Also save the run report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// List artifacts and their destinations
    List,

    /// Print one rendered artifact to stdout
    Render {
        /// Artifact name (e.g. "seed script") or destination path
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose))))
        .init();

    let base_dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    tracing::debug!(base_dir = %base_dir.display(), "resolved workspace root");

    match cli.command.unwrap_or(Commands::Apply { report: None }) {
        Commands::Apply { report } => {
            let config = load_config(&base_dir, cli.config.as_deref())?;
            apply_command(&base_dir, config, report.as_deref(), false)
        }
        Commands::Plan { report } => {
            let config = load_config(&base_dir, cli.config.as_deref())?;
            apply_command(&base_dir, config, report.as_deref(), true)
        }
        Commands::List => list_command(),
        Commands::Render { name } => render_command(&name),
    }
}

/// Log filter used when `RUST_LOG` is unset
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn load_config(base_dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    let (config, source) = Config::discover(base_dir, explicit)
        .context("Failed to load litepatch config")?;

    match source {
        Some(path) => tracing::debug!(config = %path.display(), "using config file"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    Ok(config)
}

/// Apply (or plan) command - run every step and report as it goes
fn apply_command(base_dir: &Path, config: Config, report_path: Option<&Path>, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{}", "Planning SQLite patches...".cyan());
    } else {
        println!("{}", "Applying SQLite patches...".cyan());
    }

    let orchestrator = Orchestrator::new(base_dir, config).with_dry_run(dry_run);
    let report = orchestrator.run_with_progress(print_step);

    if let Some(path) = report_path {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        eprintln!("{} {}", "Report saved to:".green(), path.display());
    }

    print_summary(&report, dry_run);

    let code = exit_code(&report, orchestrator.config());
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// List command - catalog in write order
fn list_command() -> Result<()> {
    let catalog = TemplateCatalog::default();

    for (i, (name, destination)) in catalog.names().enumerate() {
        println!("  {}. {} {}", i + 1, format!("{:<30}", name).bold(), destination);
    }

    Ok(())
}

/// Render command - print one artifact body
fn render_command(name: &str) -> Result<()> {
    let artifact = TemplateCatalog::default()
        .get(name)
        .with_context(|| format!("Failed to render '{}'. Run 'litepatch list' for valid names", name))?;

    print!("{}", artifact.content);
    Ok(())
}

/// One console line per step
fn print_step(step: &StepRecord) {
    match &step.outcome {
        Outcome::Written | Outcome::Patched => {
            println!("{} {}", "Updated".green(), step.path);
        }
        Outcome::Unchanged => {
            println!("{} {}", "Unchanged".dimmed(), step.path);
        }
        Outcome::Skipped => {
            println!("{} {} (not found)", "Skipped".yellow(), step.path);
        }
        Outcome::Planned => {
            println!("{} {}", "Would update".cyan(), step.path);
        }
        Outcome::Failed { kind, cause } => {
            let target = if step.path.is_empty() { step.step.as_str() } else { step.path.as_str() };
            eprintln!("{} {} [{}]: {}", "Failed to update".red().bold(), target, kind, cause);
        }
    }
}

fn print_summary(report: &RunReport, dry_run: bool) {
    if report.has_failures() {
        println!(
            "{}",
            format!(
                "Patches finished with {} failed step(s) out of {}.",
                report.summary.failed, report.summary.total
            )
            .red()
            .bold()
        );
    } else if dry_run {
        println!("{}", format!("{} step(s) planned.", report.summary.total).green());
    } else {
        println!("{}", "Patches applied successfully.".green().bold());
    }
}

/// Non-zero when a step failed and the config asks for it
fn exit_code(report: &RunReport, config: &Config) -> i32 {
    if report.has_failures() && config.fail_on_error {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litepatch_core::FailureKind;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_apply() {
        let cli = Cli::try_parse_from(["litepatch"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["litepatch", "plan", "--dir", "/tmp/ws"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Plan { report: None })));
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/ws")));
    }

    #[test]
    fn verbose_raises_log_filter() {
        assert_eq!(default_filter(false), "warn");
        assert_eq!(default_filter(true), "debug");
    }

    #[test]
    fn config_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());

        std::fs::write(dir.path().join("litepatch.toml"), "fail_on_error = false\n").unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert!(!config.fail_on_error);

        let missing = dir.path().join("missing.toml");
        assert!(load_config(dir.path(), Some(missing.as_path())).is_err());
    }

    #[test]
    fn failures_set_exit_code() {
        let report = RunReport::from_steps(vec![StepRecord::failed(
            "world handler",
            "packages/db/handlers/World.ts",
            FailureKind::Write,
            "denied",
        )]);

        assert_eq!(exit_code(&report, &Config::default()), 1);

        let lenient = Config { fail_on_error: false, ..Config::default() };
        assert_eq!(exit_code(&report, &lenient), 0);

        assert_eq!(exit_code(&RunReport::new(), &Config::default()), 0);
    }
}
