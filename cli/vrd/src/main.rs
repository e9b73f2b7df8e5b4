//! vrd CLI — create, validate, inspect and project death documents.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use config::VrdConfig;

#[derive(Parser)]
#[command(name = "vrd", version, about = "Vital records death documents")]
struct Cli {
    /// Log level (trace|debug|info|warn|error); overrides vrd.toml
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh empty death document
    New {
        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Parse and resolve a document, reporting every structural problem
    Validate {
        /// Input JSON file
        file: PathBuf,
        /// Skip the strict structural pre-validation walk
        #[arg(long)]
        permissive: bool,
    },
    /// Print the category-organized field view of a document
    Inspect {
        /// Input JSON file
        file: PathBuf,
    },
    /// Derive a scoped projection from a full document
    Project {
        /// Input JSON file
        file: PathBuf,
        /// Projection profile (cause-of-death | demographic | roster)
        #[arg(long)]
        profile: String,
        /// Mark the roster projection as alias-suppressed
        #[arg(long)]
        alias: bool,
        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

// Backend startup stays best-effort; the level itself is validated before
// this runs. The handle must stay alive for the run.
fn init_logging(level: &str) -> Option<flexi_logger::LoggerHandle> {
    flexi_logger::Logger::try_with_str(level)
        .ok()?
        .log_to_stderr()
        .start()
        .ok()
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = VrdConfig::load(&cwd)?;
    // An unrecognized level is rejected, whether it came from the flag or
    // from vrd.toml (the latter is already normalized by load).
    let level = match cli.log_level.as_deref() {
        Some(level) => config::normalize_level(level)?,
        None => config.log_level.as_deref().unwrap_or("warn"),
    };
    let _logger = init_logging(level);

    match cli.command {
        Commands::New { out } => commands::new::run(&config, out.as_deref()),
        Commands::Validate { file, permissive } => commands::validate::run(&file, permissive),
        Commands::Inspect { file } => commands::inspect::run(&file),
        Commands::Project {
            file,
            profile,
            alias,
            out,
        } => commands::project::run(&file, &profile, alias, out.as_deref()),
    }
}
