use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lockplane_core::{CheckOutput, Config, Severity, CONFIG_FILE_NAME};
use lockplane_engine::{SchemaChecker, SchemaLoader};

/// Lockplane - declarative PostgreSQL schema checks
#[derive(Parser)]
#[command(name = "lockplane")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: lockplane.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate .lp.sql schema files
    #[command(alias = "check-schema")]
    Check {
        /// Schema file or directory of .lp.sql files
        path: PathBuf,

        /// Print the parsed schema as JSON instead of checking it
        #[arg(long, conflicts_with = "output")]
        print_schema: bool,

        /// Emit the check report in a machine-readable format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(dialect = %config.dialect, "using dialect");

    match cli.command {
        Commands::Check {
            path,
            print_schema,
            output,
        } => check_command(&config, &path, print_schema, output),
    }
}

/// Log to stderr so stdout stays machine-readable
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::from_file(path).with_context(|| format!("failed to load config {}", path.display()));
    }

    let default_path = Path::new(CONFIG_FILE_NAME);
    if default_path.exists() {
        return Config::from_file(default_path)
            .with_context(|| format!("failed to load config {}", default_path.display()));
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}

/// Check command - validate schema files
fn check_command(config: &Config, path: &Path, print_schema: bool, output: Option<OutputFormat>) -> Result<()> {
    let loader = SchemaLoader::from_config(config);

    if print_schema {
        let schema = loader.load(path)?;
        println!("{}", schema.to_json()?);
        return Ok(());
    }

    let report = SchemaChecker::new(loader).check(path);

    match output {
        Some(OutputFormat::Json) => {
            println!("{}", report.to_json().context("failed to marshal check output")?);
        }
        None => {
            print_report_summary(path, &report);
            if !report.summary.valid {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Print a human-readable report to stdout
fn print_report_summary(path: &Path, report: &CheckOutput) {
    println!("{} {}", "Checking".cyan(), path.display());
    println!();

    for diag in &report.diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warning => "WARN".yellow().bold(),
            Severity::Info => "INFO".cyan(),
        };

        match &diag.code {
            Some(code) => println!("  [{}] {}: {}", severity_str, code, diag.message),
            None => println!("  [{}] {}", severity_str, diag.message),
        }

        if let (Some(file), Some(line), Some(column)) = (&diag.file, diag.line, diag.column) {
            println!("    at {}:{}:{}", file, line, column);
        } else if let Some(line) = diag.line {
            println!("    at line {}", line);
        }
    }

    if !report.diagnostics.is_empty() {
        println!();
    }

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }
    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    }
    println!();

    if report.summary.valid {
        println!("{}", "✓ Schema is valid".green().bold());
    } else {
        println!("{}", "✗ Schema is invalid".red().bold());
    }
}
