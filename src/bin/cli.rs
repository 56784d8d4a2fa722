//! Apify loader CLI
//!
//! Runs actors or reads existing datasets and prints the mapped documents as
//! JSON on stdout.

use std::path::PathBuf;

use apify_loader::{
    ApifyWrapper, Config, DatasetLoader, DocumentLoader, RunOptions,
    error::Result,
    models::CallOptions,
    default_mapping, mapping,
};
use clap::{Parser, Subcommand};
use serde_json::Value;

/// apify-loader - Apify datasets as documents
#[derive(Parser, Debug)]
#[command(name = "apify-loader", version, about = "Load Apify actor results as documents")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "apify.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an actor and load its default dataset
    Call {
        /// Actor id, e.g. `apify/web-scraper`
        actor_id: String,

        /// JSON file with the actor input (empty object when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Build tag or number to run
        #[arg(long)]
        build: Option<String>,

        /// Memory limit in megabytes
        #[arg(long)]
        memory: Option<u32>,

        /// Wait for the run without blocking a thread
        #[arg(long = "async")]
        use_async: bool,
    },

    /// Crawl URLs with the default content crawler
    Crawl {
        /// Start URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Crawler actor to use instead of the default
        #[arg(long)]
        actor: Option<String>,

        /// Wait for the run without blocking a thread
        #[arg(long = "async")]
        use_async: bool,
    },

    /// Load an existing dataset
    Load {
        /// Dataset id
        dataset_id: String,
    },

    /// Validate configuration and build the API clients
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<Value> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(Value::Object(Default::default())),
    }
}

/// Wait on an async call from this synchronous entry point.
fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn print_documents(loader: &DatasetLoader) -> Result<()> {
    let documents = loader.load()?;
    println!("{}", serde_json::to_string_pretty(&documents)?);
    log::info!(
        "Loaded {} documents from dataset {}",
        documents.len(),
        loader.dataset_id()
    );
    Ok(())
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            ApifyWrapper::new(&config.apify)?;
            log::info!("✓ Config OK, API token found and clients built");
        }

        Command::Call {
            actor_id,
            input,
            build,
            memory,
            use_async,
        } => {
            let wrapper = ApifyWrapper::new(&config.apify)?;
            let input = read_input(input.as_ref())?;
            let options = CallOptions {
                build,
                memory_mbytes: memory,
                timeout_secs: None,
            };
            let loader = if use_async {
                block_on(wrapper.acall_actor_with(
                    &actor_id,
                    &input,
                    mapping(default_mapping),
                    &options,
                ))??
            } else {
                wrapper.call_actor_with(&actor_id, &input, mapping(default_mapping), &options)?
            };
            print_documents(&loader)?;
        }

        Command::Crawl {
            urls,
            actor,
            use_async,
        } => {
            let wrapper = ApifyWrapper::new(&config.apify)?;
            let options = RunOptions {
                actor_id: actor,
                ..RunOptions::default()
            };
            let loader = if use_async {
                block_on(wrapper.arun(&urls, options))??
            } else {
                wrapper.run(&urls, options)?
            };
            print_documents(&loader)?;
        }

        Command::Load { dataset_id } => {
            let loader =
                DatasetLoader::from_config(&config.apify, dataset_id, mapping(default_mapping))?;
            print_documents(&loader)?;
        }
    }

    Ok(())
}
