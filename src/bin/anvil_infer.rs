//! anvil-infer: Infer typed models from example JSON documents
//!
//! Every document becomes a set of entities named after the file; entities
//! that share a name across documents are merged.
//!
//! Usage:
//!   # One file, JSON output on stdout
//!   anvil-infer user.json
//!
//!   # A directory of samples (its .config.json is applied), as an outline
//!   anvil-infer samples/ --format outline
//!
//!   # Read from stdin with a type prefix
//!   echo '{"id": 1, "first_name": "Ada"}' | anvil-infer --prefix PT

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{stdin, stdout, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use anvil::loader::{load_config_file, load_documents, load_sidecar_config};
use anvil::{
    ArrayShapePolicy, ConstructKind, GenerationConfig, MappingStyle, MultiDocumentMerger, OutputFormat, SchemaWriter,
};

#[derive(Parser, Debug)]
#[command(name = "anvil-infer")]
#[command(about = "Infer typed models from example JSON documents", long_about = None)]
struct Args {
    /// Input files, directories or glob patterns (use stdin if omitted)
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Prefix prepended to every entity name
    #[arg(long)]
    prefix: Option<String>,

    /// Root entity name for stdin input
    #[arg(long, value_name = "NAME")]
    base_name: Option<String>,

    /// Mapping style of the generated models
    #[arg(long, value_enum)]
    style: Option<MappingStyle>,

    /// Value or reference types
    #[arg(long, value_enum)]
    construct: Option<ConstructKind>,

    /// Mark every field optional
    #[arg(long)]
    optional: bool,

    /// Use only the first element of arrays of objects
    #[arg(long)]
    first_element: bool,

    /// Config file (defaults to the .config.json of a directory input)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Output file (use stdout if omitted)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&args)?;
    let merger = MultiDocumentMerger::new(&config);

    let generation = if args.inputs.is_empty() {
        let mut text = String::new();
        stdin().read_to_string(&mut text).context("Failed to read stdin")?;

        let mut sources = BTreeMap::new();
        sources.insert(config.base_entity_name.clone(), text);
        merger.generate_from_sources(&sources)?
    } else {
        let sources = load_documents(&args.inputs)?;
        info!(documents = sources.len(), "loaded documents");
        merger.generate_from_sources(&sources)?
    };

    if generation.is_empty() {
        warn!("no models generated");
    }

    let output: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(stdout())),
    };

    let mut writer = SchemaWriter::new(output, args.format);
    writer.write_generation(&generation)?;
    writer.flush()?;

    Ok(())
}

/// Defaults, then the config file or directory sidecar, then flags
fn resolve_config(args: &Args) -> Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => first_directory(&args.inputs)
            .map(load_sidecar_config)
            .transpose()?
            .flatten()
            .unwrap_or_default(),
    };

    if let Some(prefix) = &args.prefix {
        config.name_prefix = Some(prefix.clone());
    }
    if let Some(name) = &args.base_name {
        config.base_entity_name = name.clone();
    }
    if let Some(style) = args.style {
        config.mapping_style = style;
    }
    if let Some(construct) = args.construct {
        config.construct_kind = construct;
    }
    if args.optional {
        config.fields_optional_by_default = true;
    }
    if args.first_element {
        config.array_shape = ArrayShapePolicy::FirstElement;
    }

    Ok(config)
}

fn first_directory(inputs: &[String]) -> Option<&Path> {
    inputs.iter().map(Path::new).find(|path| path.is_dir())
}
