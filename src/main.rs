//! sit: SBOM interoperability tool
//!
//! Generates, merges, exports and converts SBOMs across SPDX, CycloneDX,
//! OSSBOM and the canonical middleware schema.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sit::{
    cli::{self, OutputSettings},
    config::{self, AppConfig, Validatable},
    generate::GenerateRequest,
    merge::MergeRelationship,
    model::SbomFormat,
    pipeline::{exit_code_for, OutputTarget},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  SPDX:       2.2, 2.3 in; 2.3 out (JSON)",
        "\n  CycloneDX:  1.4, 1.5, 1.6 in; 1.6 out (JSON)",
        "\n  OSSBOM:     1.0 (JSON)",
        "\n  middleware: 1.0 (JSON, lossless)"
    )
}

#[derive(Parser)]
#[command(name = "sit")]
#[command(version, long_version = build_long_version())]
#[command(about = "SBOM interoperability tool: generate, merge, export and convert SBOMs", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  I/O, configuration or other error
    2  Malformed input document
    3  Lossy mapping refused (--strict)
    4  Component not found
    5  Merge conflict

EXAMPLES:
    # Inventory a directory as SPDX
    sit generate -i ./build --env production --model spdx -o sbom.spdx.json

    # Attach a vendor SBOM under the application
    sit merge -i app.cdx.json vendor.spdx.json --relationship contains

    # Cut the dependency closure of one component
    sit export -i app.cdx.json --id pkg:npm/lodash@4.17.21 --model ossbom

    # Convert, failing on anything CycloneDX cannot hold
    sit convert -i app.spdx.json --model cyclonedx --strict")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "SIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Output options shared by every SBOM-producing command
#[derive(Args)]
struct OutputArgs {
    /// Output file path (`-` or omitted for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format [default: middleware, or `output.model` from the config file]
    #[arg(long, value_enum, env = "SIT_MODEL")]
    model: Option<SbomFormat>,

    /// Fail instead of dropping constructs the output format cannot represent
    #[arg(long)]
    strict: bool,
}

impl OutputArgs {
    /// Layer the flags over the file configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(model) = self.model {
            config.output.model = model;
        }
        if self.strict {
            config.conversion.policy = sit::formats::LossPolicy::Strict;
        }
    }

    fn settings(&self, config: &AppConfig) -> OutputSettings {
        OutputSettings::from_config(config, OutputTarget::from_arg(self.output.as_deref()))
    }
}

/// Arguments for the `generate` subcommand
#[derive(Args)]
struct GenerateArgs {
    /// Directory to inventory
    #[arg(short, long = "input", value_name = "PATH")]
    input: PathBuf,

    /// Environment label recorded in the document
    #[arg(long = "env", value_name = "ENV", default_value = "")]
    environment: String,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `merge` subcommand
#[derive(Args)]
struct MergeArgs {
    /// Root SBOM, then the sub SBOM to attach under it
    #[arg(short, long = "input", num_args = 2, value_names = ["ROOT", "SUB"], required = true)]
    input: Vec<PathBuf>,

    /// Edge kind attaching the sub roots
    #[arg(long, value_enum)]
    relationship: Option<MergeRelationship>,

    /// Component ID in the root SBOM to attach under (default: its first root)
    #[arg(long, value_name = "ID")]
    target: Option<String>,

    /// Prefix for renamed sub components (default: the sub document name)
    #[arg(long, value_name = "NS")]
    namespace: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `export` subcommand
#[derive(Args)]
struct ExportArgs {
    /// Input SBOM
    #[arg(short, long = "input", value_name = "INPUT")]
    input: PathBuf,

    /// Component ID to export from (repeatable)
    #[arg(long = "id", value_name = "ID", num_args = 1.., required = true)]
    ids: Vec<String>,

    /// Only follow these relationship kinds, e.g. depends-on (repeatable)
    #[arg(long = "relation", value_name = "KIND", num_args = 1..)]
    relations: Vec<String>,

    /// Maximum number of hops from the requested components
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `convert` subcommand
#[derive(Args)]
struct ConvertArgs {
    /// Input SBOM
    #[arg(short, long = "input", value_name = "INPUT")]
    input: PathBuf,

    /// Input format (auto-detected when omitted)
    #[arg(long, value_enum, value_name = "M")]
    from: Option<SbomFormat>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an SBOM by inventorying a directory
    Generate(GenerateArgs),

    /// Merge a sub SBOM into a root SBOM
    Merge(MergeArgs),

    /// Export the subgraph reachable from one or more components
    Export(ExportArgs),

    /// Convert an SBOM to another format
    Convert(ConvertArgs),

    /// Show, locate, or describe configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (defaults + file)
    Show,
    /// Print config file search paths and the discovered config file
    Path,
    /// Print the JSON Schema of the config file format
    Schema,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the SBOM
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

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code_for(&err));
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let (config, loaded_from) = config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    Ok(config)
}

/// Reject CLI overrides that would not pass file validation either
fn check_config(config: &AppConfig) -> Result<()> {
    match config.validate().into_iter().next() {
        Some(err) => Err(sit::SitError::from(err).into()),
        None => Ok(()),
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate(args) => {
            let mut config = load_config(&cli)?;
            args.output.apply(&mut config);
            let request = GenerateRequest::new(&args.input, args.environment.as_str());
            cli::run_generate(&request, &args.output.settings(&config))?;
            Ok(())
        }

        Commands::Merge(args) => {
            let mut config = load_config(&cli)?;
            args.output.apply(&mut config);
            if let Some(relationship) = args.relationship {
                config.merge.relationship = relationship;
            }
            if args.target.is_some() {
                config.merge.target.clone_from(&args.target);
            }
            if args.namespace.is_some() {
                config.merge.namespace.clone_from(&args.namespace);
            }
            check_config(&config)?;

            let [root, sub] = args.input.as_slice() else {
                anyhow::bail!("merge takes exactly two inputs: ROOT and SUB");
            };
            cli::run_merge(
                root,
                sub,
                config.merge_options(),
                &args.output.settings(&config),
            )?;
            Ok(())
        }

        Commands::Export(args) => {
            let mut config = load_config(&cli)?;
            args.output.apply(&mut config);
            if !args.relations.is_empty() {
                config.export.relation_filter.clone_from(&args.relations);
            }
            if args.max_depth.is_some() {
                config.export.max_depth = args.max_depth;
            }
            check_config(&config)?;

            cli::run_export(
                &args.input,
                &args.ids,
                config.export_options(),
                &args.output.settings(&config),
            )?;
            Ok(())
        }

        Commands::Convert(args) => {
            let mut config = load_config(&cli)?;
            args.output.apply(&mut config);
            cli::run_convert(&args.input, args.from, &args.output.settings(&config))?;
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref())
                    .context("Failed to load configuration")?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                eprintln!("Config file search paths (in order):");
                if let Ok(cwd) = std::env::current_dir() {
                    eprintln!("  {} (and its parent directories)", cwd.display());
                }
                if let Some(dir) = ::dirs::config_dir() {
                    eprintln!("  {}", dir.join("sit").display());
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::file::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => println!("{}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Schema => {
                let schema =
                    config::generate_json_schema().context("failed to serialize config schema")?;
                println!("{schema}");
                Ok(())
            }
        },

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "sit", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge() {
        let cli = Cli::try_parse_from([
            "sit",
            "merge",
            "-i",
            "root.json",
            "sub.json",
            "--relationship",
            "contains",
            "--model",
            "cyclonedx",
        ])
        .unwrap();
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.input.len(), 2);
                assert_eq!(args.relationship, Some(MergeRelationship::Contains));
                assert_eq!(args.output.model, Some(SbomFormat::CycloneDx));
            }
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn test_parse_export_repeated_ids() {
        let cli = Cli::try_parse_from([
            "sit", "export", "-i", "in.json", "--id", "a", "--id", "b", "--max-depth", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.ids, vec!["a", "b"]);
                assert_eq!(args.max_depth, Some(2));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_merge_requires_two_inputs() {
        assert!(Cli::try_parse_from(["sit", "merge", "-i", "root.json"]).is_err());
    }
}
