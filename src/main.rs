//! eol-scanner: offline end-of-life catalog and container component scanner
//!
//! Keeps a local copy of the endoflife.date catalog and checks component
//! inventories produced by SBOM generators against it.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use eol_scanner::{
    EolScanError,
    cli::{self, exit_codes},
    config::{AppConfig, CONFIG_FILE_NAMES, ConfigPreset, Validatable},
    reports::ReportFormat,
    sync::CancelToken,
};
use std::io::{self, Write as _};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with supported inputs
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nCatalog source:",
        "\n  https://endoflife.date/api/v1/products/full (or a saved snapshot)",
        "\n\nInventory formats:",
        "\n  native JSON component list, syft JSON",
        "\n\nOutput Formats:",
        "\n  table, summary, json"
    )
}

#[derive(Parser)]
#[command(name = "eol-scanner")]
#[command(author = "Binarly.io")]
#[command(version, long_version = build_long_version())]
#[command(about = "Offline end-of-life catalog and component EOL scanner", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Sync finished with item errors
    2  EOL components found (with --fail-on-eol)
    3  Error occurred
    130  Interrupted

EXAMPLES:
    # Populate the local catalog
    eol-scanner db sync

    # Scan a syft inventory of an image
    syft python:3.12-slim -o json | eol-scanner scan -

    # CI/CD check
    eol-scanner scan inventory.json --only-eol --fail-on-eol -o json

    # List everything that goes EOL in the next 6 months
    eol-scanner db eol --include-future --days 180")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog database path
    #[arg(long, global = true, env = "EOL_SCANNER_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Output options shared by reporting commands
#[derive(Args)]
struct OutputArgs {
    /// Output format (auto: table if interactive, json otherwise)
    #[arg(short, long, global = true)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long, global = true)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `db sync` subcommand
#[derive(Args)]
struct DbSyncArgs {
    /// Categories to sync (comma-separated)
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// Sync from a saved `products/full` response instead of the network
    #[arg(long, conflicts_with = "save_snapshot")]
    snapshot: Option<PathBuf>,

    /// Save the downloaded response to this file before syncing from it
    #[arg(long)]
    save_snapshot: Option<PathBuf>,

    /// Remove identifiers that upstream no longer lists
    #[arg(long)]
    prune_identifiers: bool,

    /// endoflife.date base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

/// Arguments for the `scan` subcommand
#[derive(Args)]
struct ScanArgs {
    /// Inventory file (native or syft JSON), `-` for stdin
    inventory: PathBuf,

    /// Forward lookup days for upcoming EOL
    #[arg(short, long)]
    days: Option<u32>,

    /// Skip automatic catalog update
    #[arg(long)]
    no_update: bool,

    /// Re-sync when the catalog is older than this (e.g. 12h, 7d)
    #[arg(long)]
    max_age: Option<String>,

    /// Only show EOL and EOL-soon components
    #[arg(long)]
    only_eol: bool,

    /// Exit with code 2 if any component is EOL
    #[arg(long)]
    fail_on_eol: bool,

    /// Catalog snapshot used for automatic syncs
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the EOL catalog database
    Db {
        #[command(flatten)]
        output: OutputArgs,

        #[command(subcommand)]
        action: DbAction,
    },

    /// Check an inventory's components for end-of-life status
    Scan {
        #[command(flatten)]
        args: ScanArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate a man page and print it to stdout
    Man,
}

/// Sub-subcommands for the `db` command
#[derive(Subcommand)]
enum DbAction {
    /// Sync the catalog from endoflife.date
    Sync(DbSyncArgs),
    /// Show catalog statistics
    Stats,
    /// Show the database file path
    Path,
    /// List cycles that have reached end of life
    Eol {
        /// Also list cycles whose EOL date is still ahead
        #[arg(long)]
        include_future: bool,

        /// With --include-future, only list cycles ending within this many days
        #[arg(long, requires = "include_future")]
        days: Option<u32>,
    },
    /// List catalog products
    Products {
        /// Only products in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// List the release cycles of a product
    Cycles {
        /// Product name, e.g. `python`
        product: String,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .eol-scanner.yaml in the current directory
    Init {
        /// Start from a preset (default, ci-cd, offline)
        #[arg(long)]
        preset: Option<String>,
    },
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            let cancelled = e
                .downcast_ref::<EolScanError>()
                .is_some_and(EolScanError::is_cancelled);
            if cancelled {
                eprintln!("Interrupted");
                130
            } else {
                eprintln!("Error: {e:#}");
                exit_codes::ERROR
            }
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    // Graceful shutdown flag
    let cancel = CancelToken::new();
    {
        let token = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
            tracing::debug!("Could not install Ctrl-C handler: {e}");
        }
    }

    let mut overrides = AppConfig::builder().no_color(cli.no_color).build();
    overrides.database.path.clone_from(&cli.db);

    // Dispatch to command handlers
    match cli.command {
        Commands::Db { output, action } => {
            apply_output(&mut overrides, output);
            if let DbAction::Sync(args) = &action {
                if !args.categories.is_empty() {
                    overrides.sync.categories.clone_from(&args.categories);
                }
                overrides.sync.snapshot.clone_from(&args.snapshot);
                overrides.sync.prune_identifiers = args.prune_identifiers;
                if let Some(url) = &args.base_url {
                    overrides.sync.base_url.clone_from(url);
                }
                if let Some(timeout) = args.timeout {
                    overrides.sync.timeout_secs = timeout;
                }
            }
            let config = load_config(cli.config.as_deref(), &overrides)?;

            match action {
                DbAction::Sync(args) => {
                    cli::run_db_sync(&config, args.save_snapshot.as_deref(), &cancel, cli.quiet)
                }
                DbAction::Stats => cli::run_db_stats(&config, cli.quiet),
                DbAction::Path => cli::run_db_path(&config),
                DbAction::Eol {
                    include_future,
                    days,
                } => cli::run_db_eol(&config, include_future, days, cli.quiet),
                DbAction::Products { category } => {
                    cli::run_db_products(&config, category.as_deref(), cli.quiet)
                }
                DbAction::Cycles { product } => cli::run_db_cycles(&config, &product, cli.quiet),
            }
        }

        Commands::Scan { args, output } => {
            apply_output(&mut overrides, output);
            if let Some(days) = args.days {
                overrides.scan.forward_lookup_days = days;
            }
            if let Some(max_age) = args.max_age {
                overrides.database.max_age = max_age;
            }
            overrides.scan.auto_update = !args.no_update;
            overrides.scan.only_eol = args.only_eol;
            overrides.scan.fail_on_eol = args.fail_on_eol;
            overrides.sync.snapshot = args.snapshot;

            let config = load_config(cli.config.as_deref(), &overrides)?;
            cli::run_scan(&config, &args.inventory, &cancel, cli.quiet)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "eol-scanner", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = eol_scanner::config::generate_json_schema()
                .context("failed to serialize schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml =
                    serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    eol_scanner::config::user_config_dir().map(|p| p.display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match eol_scanner::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init { preset } => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".eol-scanner.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = match preset.as_deref() {
                    None => eol_scanner::config::generate_full_example_config(),
                    Some(name) => {
                        let Some(preset) = ConfigPreset::from_name(name) else {
                            let known: Vec<_> =
                                ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                            anyhow::bail!(
                                "unknown preset '{name}' (expected one of: {})",
                                known.join(", ")
                            );
                        };
                        eol_scanner::config::generate_example_config(preset)
                    }
                };
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },

        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut buf = Vec::new();
            man.render(&mut buf).context("failed to render man page")?;
            io::stdout().write_all(&buf)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn apply_output(overrides: &mut AppConfig, output: OutputArgs) {
    if let Some(format) = output.output {
        overrides.output.format = format;
    }
    overrides.output.file = output.output_file;
}

/// Merge file config with CLI overrides and reject invalid results.
fn load_config(path: Option<&std::path::Path>, overrides: &AppConfig) -> Result<AppConfig> {
    let (config, loaded_from) = AppConfig::from_file_with_overrides(path, overrides);
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    config.ensure_valid()?;
    Ok(config)
}
