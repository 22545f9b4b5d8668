use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cloudmaker_config::{DEFAULT_OUTPUT_BUCKET, HandlerConfig, Request};
use cloudmaker_ops::{MagickConfig, default_registry};
use cloudmaker_pipeline::Handler;
use cloudmaker_registry::FunctionRegistry;
use cloudmaker_store::FsObjectStore;

/// Cloudmaker - chain image operations over stored objects
#[derive(Parser)]
#[command(name = "cloudmaker")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory holding buckets (default: ~/.cloudmaker)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Bucket that receives the final result of every pipeline
  #[arg(long, global = true, default_value = DEFAULT_OUTPUT_BUCKET)]
  output_bucket: String,

  /// Image tool command line, e.g. "magick convert"
  #[arg(long, global = true, default_value = "convert")]
  convert: String,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate and execute a request
  Run {
    /// Path to the request file (JSON). Reads stdin when omitted.
    request_file: Option<PathBuf>,
  },

  /// Validate a request without executing it
  Validate {
    /// Path to the request file (JSON). Reads stdin when omitted.
    request_file: Option<PathBuf>,
  },

  /// List the registered functions and their parameter defaults
  Functions,
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cloudmaker=info")))
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".cloudmaker"),
  };

  let magick = MagickConfig::from_command(&cli.convert)
    .context("image tool command is empty")?
    .with_temp_dir(data_dir.join(".scratch"));

  let store = Arc::new(FsObjectStore::new(&data_dir));
  let registry = default_registry(store.clone(), magick).context("failed to build function registry")?;
  let config = HandlerConfig {
    output_bucket: cli.output_bucket,
  };
  let handler = Handler::new(Arc::new(registry), store, config);

  match cli.command {
    Some(Commands::Run { request_file }) => {
      let request = read_request(request_file.as_deref())?;
      let result = handler.run(&request).await?;

      info!(
        execution_id = %result.execution_id,
        steps = result.steps.len(),
        "request_completed"
      );

      println!("{}", serde_json::to_string_pretty(&result.output)?);
    }
    Some(Commands::Validate { request_file }) => {
      let request = read_request(request_file.as_deref())?;
      let validated = handler.validate(&request)?;

      info!(functions = validated.functions.len(), "request_valid");
    }
    Some(Commands::Functions) => {
      println!("{}", serde_json::to_string_pretty(&describe(handler.registry()))?);
    }
    None => {
      println!("cloudmaker - use --help to see available commands");
    }
  }

  Ok(())
}

fn read_request(path: Option<&Path>) -> Result<Request> {
  let content = match path {
    Some(path) => std::fs::read_to_string(path)
      .with_context(|| format!("failed to read request file: {}", path.display()))?,
    None => {
      let mut input = String::new();
      io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;
      input
    }
  };

  let request = serde_json::from_str(&content).context("failed to parse request JSON")?;
  info!(
    source = %path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string()),
    "request_loaded"
  );
  Ok(request)
}

/// Each registered function mapped to its parameters and their defaults.
fn describe(registry: &FunctionRegistry) -> Map<String, Value> {
  registry
    .names()
    .into_iter()
    .filter_map(|name| registry.lookup(name).ok())
    .map(|op| {
      let parameters: Map<String, Value> = op
        .schema()
        .iter()
        .map(|(key, spec)| (key.to_string(), spec.default_value().clone()))
        .collect();
      (op.name().to_string(), Value::Object(parameters))
    })
    .collect()
}
