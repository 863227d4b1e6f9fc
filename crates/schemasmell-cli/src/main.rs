use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemasmell_catalog::{derive_facts, CatalogBuilder, Snapshot};
use schemasmell_core::{Config, Database, Report, ReportSummary, Status};
use schemasmell_engine::{checks, entities, Orchestrator};
use schemasmell_sql::parse_script;

mod render;

/// schemasmell - MySQL schema smell detector
#[derive(Parser)]
#[command(name = "schemasmell")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemasmell.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Also write the JSON report to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a DDL script (mysqldump output, migrations)
    Check {
        /// SQL script to build the catalog from
        script: PathBuf,
    },

    /// Check a catalog snapshot captured from a live server
    Snapshot {
        /// Snapshot JSON file
        file: PathBuf,
    },

    /// List the available checks
    ListChecks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    let database = match &cli.command {
        Commands::Check { script } => build_from_script(&config, script)?,
        Commands::Snapshot { file } => load_snapshot(&config, file)?,
        Commands::ListChecks => {
            for name in checks::names() {
                let state = if config.is_check_disabled(name) {
                    "disabled".yellow()
                } else {
                    "enabled".green()
                };
                println!("{:<26} {}", name, state);
            }
            return Ok(());
        }
    };

    let reports = run_checks(&config, &database)?;
    let critical = reports.iter().any(|r| r.status() == Status::Critical);

    let shown = render::visible(&config, &reports);
    let summary = ReportSummary::from_reports(&reports);

    if let Some(output) = &cli.output {
        let json = render::to_json(&database.name, &shown, &summary);
        std::fs::write(output, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        if cli.verbose {
            eprintln!("{} {}", "Report saved to:".green(), output.display());
        }
    }

    match cli.format {
        Format::Table => render::print_table(&database.name, &shown, &summary),
        Format::Json => {
            let json = render::to_json(&database.name, &shown, &summary);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    // Exit with error code if anything is critical
    if critical {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let default_path = Path::new("schemasmell.toml");
    if default_path.exists() {
        return Config::from_file(default_path).context("Failed to load schemasmell.toml");
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

/// Seed a database with the configured session variables
fn seeded_database(config: &Config, name: String) -> Database {
    let mut database = Database::new(name);
    for (variable, value) in &config.variables {
        database.set_variable(variable, value.clone());
    }
    database
}

fn build_from_script(config: &Config, path: &Path) -> Result<Database> {
    let source = path.display().to_string();
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", source))?;

    let statements =
        parse_script(&script).with_context(|| format!("Failed to parse {}", source))?;
    tracing::info!(statements = statements.len(), "parsed {}", source);

    let mut builder = CatalogBuilder::with_database(seeded_database(config, source.clone()));
    for parsed in &statements {
        builder.apply(parsed).with_context(|| {
            format!("{}:{}: {}", source, parsed.line, first_line(&parsed.text))
        })?;
    }

    let mut database = builder.finish();
    derive_facts(&mut database);
    Ok(database)
}

fn load_snapshot(config: &Config, path: &Path) -> Result<Database> {
    let snapshot = Snapshot::from_file(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;

    let mut database = snapshot.into_database();
    if database.name.is_empty() {
        database.name = path.display().to_string();
    }
    // Configured variables only fill gaps in what the server reported
    for (variable, value) in &config.variables {
        if database.variable(variable).is_none() {
            database.set_variable(variable, value.clone());
        }
    }
    Ok(database)
}

fn run_checks(config: &Config, database: &Database) -> Result<Vec<Report>> {
    let mut orchestrator = Orchestrator::new();
    orchestrator
        .add_checks(checks::all())
        .disable_checks(&config.disabled_checks)
        .add_entities(entities(database));

    let reports = orchestrator.run().context("Check run aborted")?;
    Ok(render::apply_overrides(config, reports))
}

fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("")
}
