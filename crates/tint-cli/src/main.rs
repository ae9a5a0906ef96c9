//! Tint command line interface.
//!
//! Resolves a theme variables file and prints the result.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a theme and print it back as variables
//! tint resolve variables.less
//!
//! # Resolve on top of a parent theme, as JSON
//! tint resolve overrides.less --base variables.less --format json
//!
//! # Print a single token
//! tint get variables.less linkColorHover
//!
//! # Check a theme from stdin
//! cat variables.less | tint check -
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tint_core::TokenTable;
use tint_parser::parse_variables;
use tint_resolver::Resolver;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "tint")]
#[command(version)]
#[command(about = "Resolve design tokens from a stylesheet variables file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Variables,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every token and print the table
    Resolve {
        /// Variables file, `-` for stdin
        file: PathBuf,

        /// Parent theme resolved first; its tokens can be referenced and overridden
        #[arg(long)]
        base: Option<PathBuf>,

        #[arg(long, short, default_value = "variables", value_enum)]
        format: OutputFormat,
    },

    /// Print the resolved value of one token
    Get {
        /// Variables file, `-` for stdin
        file: PathBuf,

        /// Token name, with or without the leading `@`
        name: String,

        #[arg(long, short, default_value = "variables", value_enum)]
        format: OutputFormat,
    },

    /// Resolve a file and report problems without printing the table
    Check {
        /// Variables file, `-` for stdin
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve { file, base, format } => cmd_resolve(&file, base.as_deref(), format),
        Commands::Get { file, name, format } => cmd_get(&file, &name, format),
        Commands::Check { file } => cmd_check(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .init();
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_resolve(file: &Path, base: Option<&Path>, format: OutputFormat) -> Result<()> {
    let resolver = match base {
        Some(base) => Resolver::with_table(load(&Resolver::new(), base)?),
        None => Resolver::new(),
    };
    let table = load(&resolver, file)?;

    match format {
        OutputFormat::Variables => print!("{}", table.to_variables()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&table).context("JSON serialization failed")?
        ),
    }
    Ok(())
}

fn cmd_get(file: &Path, name: &str, format: OutputFormat) -> Result<()> {
    let table = load(&Resolver::new(), file)?;
    let name = name.strip_prefix('@').unwrap_or(name);
    let value = table.lookup(name)?;

    match format {
        OutputFormat::Variables => println!("{}", value),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        ),
    }
    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let table = load(&Resolver::new(), file)?;

    for name in table.redefined() {
        warn!(token = %name, "token is defined more than once, the last definition wins");
    }
    println!(
        "OK {} token(s), {} redefined",
        table.len(),
        table.redefined().len()
    );
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn load(resolver: &Resolver, path: &Path) -> Result<TokenTable> {
    let source = read_input(path)?;
    let definitions =
        parse_variables(&source).with_context(|| format!("failed to read {}", path.display()))?;
    debug!(path = %path.display(), definitions = definitions.len(), "loaded theme");

    resolver
        .resolve_with_context(&definitions)
        .with_context(|| format!("failed to resolve {}", path.display()))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}
