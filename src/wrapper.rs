// src/wrapper.rs

//! Entry point for running actors and loading what they produce.
//!
//! [`ApifyWrapper`] resolves credentials once, holds a blocking and an async
//! client, and turns every finished run into a [`DatasetLoader`] over the
//! run's default dataset.

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::loader::{DatasetLoader, MappingFn, default_mapping, mapping};
use crate::models::{ActorRun, ApifyConfig, CallOptions};
use crate::services::{ActorClient, ApifyClient, ApifyClientAsync, AsyncActorClient};

/// Actor used by [`ApifyWrapper::run`] when none is given.
pub const DEFAULT_CRAWLER_ACTOR: &str = "jirimoravcik/content-crawler-copy";

const EXTEND_OUTPUT_FUNCTION: &str = "($) => {\n    const result = {};\n    // Uncomment to add a title to the output\n    // result.pageTitle = $('title').text().trim();\n\n    return result;\n}";

/// Input for the default crawler actor starting from `urls`.
pub fn default_run_input<S: AsRef<str>>(urls: &[S]) -> Value {
    let start_urls: Vec<Value> = urls
        .iter()
        .map(|url| json!({ "url": url.as_ref() }))
        .collect();

    json!({
        "extendOutputFunction": EXTEND_OUTPUT_FUNCTION,
        "proxyConfiguration": { "useApifyProxy": true },
        "saveHtml": "link",
        "saveSnapshots": true,
        "startUrls": start_urls,
        "crawlerType": "browserPuppeteer",
        "maxDepth": 9999,
        "maxPagesPerCrawl": 9999999,
        "maxConcurrency": 200,
    })
}

/// Overrides for [`ApifyWrapper::run`] / [`ApifyWrapper::arun`].
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Actor to run; [`DEFAULT_CRAWLER_ACTOR`] when unset
    pub actor_id: Option<String>,
    /// Full actor input; built by [`default_run_input`] when unset
    pub run_input: Option<Value>,
    /// Item mapping; [`default_mapping`] when unset
    pub mapping: Option<MappingFn>,
    pub call: CallOptions,
}

impl RunOptions {
    fn resolve<S: AsRef<str>>(self, urls: &[S]) -> (String, Value, MappingFn, CallOptions) {
        (
            self.actor_id
                .unwrap_or_else(|| DEFAULT_CRAWLER_ACTOR.to_string()),
            self.run_input.unwrap_or_else(|| default_run_input(urls)),
            self.mapping.unwrap_or_else(|| mapping(default_mapping)),
            self.call,
        )
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("actor_id", &self.actor_id)
            .field("run_input", &self.run_input)
            .field("mapping", &self.mapping.as_ref().map(|_| "custom"))
            .field("call", &self.call)
            .finish()
    }
}

/// Runs actors and hands back loaders for their results.
#[derive(Clone)]
pub struct ApifyWrapper {
    client: Arc<dyn ActorClient>,
    async_client: Arc<dyn AsyncActorClient>,
}

impl ApifyWrapper {
    /// Validate `config`, resolve the token and build both clients.
    pub fn new(config: &ApifyConfig) -> Result<Self> {
        config.validate()?;
        let token = config.resolve_token()?;

        let client = ApifyClient::with_token(config, &token)?;
        let async_client = ApifyClientAsync::with_token(config, &token)?;
        log::debug!("Apify clients ready for {}", config.base_url);

        Ok(Self::with_clients(Arc::new(client), Arc::new(async_client)))
    }

    /// Default settings, token from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(&ApifyConfig::default())
    }

    /// Use the given client implementations.
    pub fn with_clients(
        client: Arc<dyn ActorClient>,
        async_client: Arc<dyn AsyncActorClient>,
    ) -> Self {
        Self {
            client,
            async_client,
        }
    }

    /// The blocking client, shared with every loader this wrapper creates.
    pub fn client(&self) -> Arc<dyn ActorClient> {
        Arc::clone(&self.client)
    }

    /// Run an actor, block until it finishes, and return a loader for its
    /// default dataset.
    pub fn call_actor(
        &self,
        actor_id: &str,
        input: &Value,
        mapping: MappingFn,
    ) -> Result<DatasetLoader> {
        self.call_actor_with(actor_id, input, mapping, &CallOptions::default())
    }

    /// [`call_actor`](Self::call_actor) with platform-side run options.
    pub fn call_actor_with(
        &self,
        actor_id: &str,
        input: &Value,
        mapping: MappingFn,
        options: &CallOptions,
    ) -> Result<DatasetLoader> {
        let run = self.client.call(actor_id, input, options)?;
        self.loader_for(run, mapping)
    }

    /// Async counterpart of [`call_actor`](Self::call_actor).
    pub async fn acall_actor(
        &self,
        actor_id: &str,
        input: &Value,
        mapping: MappingFn,
    ) -> Result<DatasetLoader> {
        self.acall_actor_with(actor_id, input, mapping, &CallOptions::default())
            .await
    }

    /// Async counterpart of [`call_actor_with`](Self::call_actor_with).
    pub async fn acall_actor_with(
        &self,
        actor_id: &str,
        input: &Value,
        mapping: MappingFn,
        options: &CallOptions,
    ) -> Result<DatasetLoader> {
        let run = self.async_client.call(actor_id, input, options).await?;
        self.loader_for(run, mapping)
    }

    /// Crawl `urls` with the default crawler actor unless overridden.
    pub fn run<S: AsRef<str>>(&self, urls: &[S], options: RunOptions) -> Result<DatasetLoader> {
        let (actor_id, input, mapping, call) = options.resolve(urls);
        self.call_actor_with(&actor_id, &input, mapping, &call)
    }

    /// Async counterpart of [`run`](Self::run).
    pub async fn arun<S: AsRef<str>>(
        &self,
        urls: &[S],
        options: RunOptions,
    ) -> Result<DatasetLoader> {
        let (actor_id, input, mapping, call) = options.resolve(urls);
        self.acall_actor_with(&actor_id, &input, mapping, &call)
            .await
    }

    /// Loader for a dataset that already exists.
    pub fn dataset_loader(&self, dataset_id: impl Into<String>, mapping: MappingFn) -> DatasetLoader {
        DatasetLoader::new(self.client(), dataset_id, mapping)
    }

    fn loader_for(&self, run: ActorRun, mapping: MappingFn) -> Result<DatasetLoader> {
        if !run.status.is_success() {
            return Err(AppError::ActorRun {
                run_id: run.id,
                status: run.status,
            });
        }
        log::info!(
            "Run {} produced dataset {}",
            run.id,
            run.default_dataset_id
        );
        Ok(self.dataset_loader(run.default_dataset_id, mapping))
    }
}

impl fmt::Debug for ApifyWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApifyWrapper").finish_non_exhaustive()
    }
}
