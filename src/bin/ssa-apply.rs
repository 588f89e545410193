//! ssa-apply - Server-side apply inspection tool
//!
//! Shows what the applier would send to the store for a YAML/JSON manifest.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use work_apply::apply::prepare_patch;
use work_apply::{
    remove_creation_timestamp, value, ApplierConfig, OwnerReference, Unstructured, Value,
};

#[derive(Debug, Parser)]
#[command(name = "ssa-apply", version, about = "Server-side apply inspection tool")]
struct Cli {
    /// Output location. Use '-' for stdout.
    #[arg(short, long, default_value = "-", global = true)]
    output: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Yaml, global = true)]
    format: Format,

    /// Applier config file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a manifest with creation timestamps removed
    Sanitize {
        /// Manifest file (YAML or JSON)
        file: PathBuf,
    },
    /// Print the body the applier would send for a manifest
    Patch {
        /// Manifest file (YAML or JSON)
        file: PathBuf,
        #[arg(long)]
        owner_name: String,
        #[arg(long)]
        owner_uid: String,
        #[arg(long, default_value = "v1")]
        owner_api_version: String,
        #[arg(long, default_value = "")]
        owner_kind: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => ApplierConfig::load(path)?,
        None => ApplierConfig::default(),
    };
    tracing::debug!(field_manager = %config.field_manager, "loaded applier config");

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    let document = match cli.command {
        Command::Sanitize { file } => {
            let mut obj = read_manifest(&file)?;
            remove_creation_timestamp(obj.object_mut());
            Value::from(obj)
        }
        Command::Patch {
            file,
            owner_name,
            owner_uid,
            owner_api_version,
            owner_kind,
        } => {
            let obj = read_manifest(&file)?;
            let owner = OwnerReference::new(owner_api_version, owner_kind, owner_name, owner_uid);
            let patch = prepare_patch(&obj, &owner)?;
            eprintln!(
                "# fieldManager={} force={}",
                config.field_manager, config.force_conflicts
            );
            value::from_json_slice(&patch)?
        }
    };

    write_document(&document, cli.format, &mut output)
}

fn read_manifest(file: &Path) -> Result<Unstructured, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read file {:?}: {}", file, e))?;
    Ok(Unstructured::from_yaml(&content)
        .map_err(|e| format!("Failed to parse {:?}: {}", file, e))?)
}

fn write_document(
    document: &Value,
    format: Format,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => writeln!(output, "{}", serde_json::to_string_pretty(document)?)?,
        Format::Yaml => write!(output, "{}", value::to_yaml(document)?)?,
    }
    Ok(())
}
