//! usermap command-line inspection tool.
//!
//! Loads a mapper configuration, validates it, and shows how principal names
//! would be translated.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use usermap_core::config::AppConfig;
use usermap_core::mapper::stop_mapper;
use usermap_core::NameMapper;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// usermap command-line inspection tool.
#[derive(Parser, Debug)]
#[command(
    name = "usermap",
    version,
    about = "Inspect and test principal name mappings"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "./usermap.toml")]
    config: PathBuf,

    /// Override the log level from the config file (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a configuration file and start its mapper.
    Validate,

    /// Map principal names through the configured mapper.
    Map {
        /// Principal names to map.
        names: Vec<String>,

        /// Also map the absent principal (no name supplied).
        #[arg(long)]
        none: bool,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate a sample configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./usermap.toml")]
        output: PathBuf,

        /// Mapper strategy for the sample.
        #[arg(long, value_enum, default_value_t = SampleKind::Dictionary)]
        kind: SampleKind,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SampleKind {
    Dictionary,
    Constant,
}

/// One line of `map` output.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct MapResult {
    input: Option<String>,
    mapped: Option<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output, kind } => {
            init_tracing(cli.log_level.as_deref().unwrap_or("warn"));
            cmd_init(&output, kind)
        }
        Commands::Validate => cmd_validate(
            &cli.config,
            cli.log_level.as_deref(),
            &mut std::io::stdout(),
        ),
        Commands::Map { names, none, json } => {
            let config = load_config(&cli.config, cli.log_level.as_deref())?;
            cmd_map(config, &names, none, json)
        }
    }
}

// ---------------------------------------------------------------------------
// Config & logging helpers
// ---------------------------------------------------------------------------

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    // Tests may install a subscriber more than once.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Replace `log.level` with the `--log-level` override, if one was given, so
/// validation and logging see the level actually in effect.
fn apply_log_level(config: &mut AppConfig, log_level: Option<&str>) {
    if let Some(level) = log_level {
        config.log.level = level.to_string();
    }
}

fn load_config(path: &Path, log_level: Option<&str>) -> Result<AppConfig> {
    let mut config =
        AppConfig::load_from_file(path).context("failed to load configuration file")?;
    apply_log_level(&mut config, log_level);
    config.validate().context("configuration validation failed")?;

    init_tracing(&config.log.level);
    Ok(config)
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

const DICTIONARY_SAMPLE: &str = r#"# usermap configuration

[log]
level = "info"

[mapper]
kind = "dictionary"
# Used when a principal has no entry below. Omit to defer to the caller.
default_name = "nobody"

[mapper.mappings]
alice = "hdfs"
bob = "yarn"
"#;

const CONSTANT_SAMPLE: &str = r#"# usermap configuration

[log]
level = "info"

[mapper]
kind = "constant"
# Every principal runs as this user. Omit to use the process owner.
user_name = "hdfs"
"#;

fn sample_config(kind: SampleKind) -> &'static str {
    match kind {
        SampleKind::Dictionary => DICTIONARY_SAMPLE,
        SampleKind::Constant => CONSTANT_SAMPLE,
    }
}

fn cmd_init(output: &Path, kind: SampleKind) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, sample_config(kind)).context("failed to write config file")?;

    println!("Sample configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the mapper settings");
    println!(
        "  2. Validate with: usermap validate --config {}",
        output.display()
    );
    println!(
        "  3. Try a lookup: usermap map --config {} alice",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path, log_level: Option<&str>, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Validating configuration: {}", config_path.display())?;
    writeln!(out)?;

    let mut config = match AppConfig::load_from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            writeln!(out, "  [FAIL] {}", e)?;
            anyhow::bail!("failed to load configuration file");
        }
    };
    writeln!(out, "  [OK] TOML structure is valid")?;

    apply_log_level(&mut config, log_level);
    if let Err(e) = config.validate() {
        writeln!(out, "  [FAIL] {}", e)?;
        anyhow::bail!("configuration validation failed");
    }
    init_tracing(&config.log.level);
    writeln!(out, "  [OK] Log level '{}' is valid", config.log.level)?;

    let summary = config.mapper.to_string();
    let kind = config.mapper.kind();
    match config.mapper.build() {
        Ok(mapper) => {
            writeln!(out, "  [OK] Mapper started")?;
            stop_mapper(mapper.as_ref()).context("failed to stop mapper")?;
        }
        Err(e) => {
            writeln!(out, "  [FAIL] {}", e)?;
            anyhow::bail!("mapper failed to start");
        }
    }

    writeln!(out)?;
    writeln!(out, "Configuration summary:")?;
    writeln!(out, "  Kind   : {}", kind)?;
    writeln!(out, "  Mapper : {}", summary)?;

    Ok(())
}

fn cmd_map(config: AppConfig, names: &[String], none: bool, json: bool) -> Result<()> {
    if names.is_empty() && !none {
        anyhow::bail!("nothing to map: pass one or more names, or --none");
    }

    let mapper = config
        .mapper
        .build()
        .context("failed to start name mapper")?;

    let results = map_all(mapper.as_ref(), names, none);
    stop_mapper(mapper.as_ref()).context("failed to stop mapper")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("{}", render_result(result));
        }
    }

    Ok(())
}

fn map_all(mapper: &dyn NameMapper, names: &[String], none: bool) -> Vec<MapResult> {
    let inputs = none
        .then_some(None)
        .into_iter()
        .chain(names.iter().map(|name| Some(name.as_str())));

    inputs
        .map(|input| {
            let mapped = mapper.map(input);
            debug!(?input, ?mapped, "mapped principal");
            MapResult {
                input: input.map(str::to_string),
                mapped,
            }
        })
        .collect()
}

fn render_result(result: &MapResult) -> String {
    let input = result.input.as_deref().unwrap_or("(none)");
    let mapped = result.mapped.as_deref().unwrap_or("(caller identity)");
    format!("{} -> {}", input, mapped)
}
