//! Non-interactive driver: fetch the node catalog, resolve the requested
//! node (auto by default), merge options, and print the assembled task
//! configuration as JSON.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;

use nodeform::app::FormRuntime;
use nodeform::catalog::NodeKey;
use nodeform::config::Config;
use nodeform::fetch::HttpNodeFetcher;
use nodeform::tea::{Message, Phase};
use nodeform::{nlog, PriorTask, Result};

#[derive(Parser, Debug)]
#[command(name = "nodeform", about = "Configure a processing task against a node farm")]
struct Cli {
    /// Catalog endpoint (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Task name (defaults to a timestamped placeholder)
    #[arg(long)]
    name: Option<String>,

    /// Node to use: a node id, or "auto" (default)
    #[arg(long, default_value = "auto")]
    node: NodeKey,

    /// Collect option overrides (advanced mode)
    #[arg(long)]
    advanced: bool,

    /// Option override, repeatable: --set name=value (value parsed as JSON,
    /// falling back to a plain string)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Previously saved task to edit, as a JSON file
    #[arg(long, value_name = "PATH")]
    task_file: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    nodeform::log::init_with_debug(cli.debug);

    let mut config = Config::load()?;
    if cli.endpoint.is_some() {
        config.endpoint = cli.endpoint.clone();
    }

    let prior: Option<PriorTask> = match &cli.task_file {
        Some(path) => Some(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => None,
    };

    let overrides = parse_overrides(&cli.set)?;

    let fetcher = Arc::new(HttpNodeFetcher::from_config(&config)?);
    nlog!("Fetching catalog from {}", fetcher.endpoint());

    let mut runtime = FormRuntime::new(config, prior, fetcher)
        .on_loaded(|| nlog!("Form ready"));
    runtime.run_until_settled().await?;

    if let Phase::Error { message, .. } = &runtime.model().phase {
        eprintln!("{}", message);
        runtime.shutdown();
        std::process::exit(1);
    }

    if let Some(name) = cli.name {
        runtime.apply(Message::NameChanged(name));
    }
    runtime.apply(Message::SelectNode(cli.node));
    if runtime.model().selected != Some(cli.node) {
        eprintln!("Node {} is not available for selection", cli.node);
        runtime.shutdown();
        std::process::exit(1);
    }
    runtime.apply(Message::SetAdvancedOptions(cli.advanced || !overrides.is_empty()));

    for (name, value) in overrides {
        runtime.apply(Message::OptionChanged(name, Some(value)));
    }

    let task = runtime.model().assemble()?;
    println!("{}", serde_json::to_string_pretty(&task)?);
    runtime.shutdown();
    Ok(())
}

fn parse_overrides(pairs: &[String]) -> Result<Vec<(String, Value)>> {
    pairs
        .iter()
        .map(|pair| {
            let (name, raw) = pair.split_once('=').ok_or_else(|| {
                nodeform::Error::Validation(format!("expected NAME=VALUE, got: {}", pair))
            })?;
            let value = serde_json::from_str(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((name.to_string(), value))
        })
        .collect()
}
