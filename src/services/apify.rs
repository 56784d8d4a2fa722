// src/services/apify.rs

//! HTTP implementations of the platform client traits.
//!
//! A call starts the run with a server-side wait window, then keeps
//! long-polling the run until it reaches a terminal status. Nothing is
//! retried: the first failing request ends the call.

use std::fmt;
use std::sync::OnceLock;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::models::{ActorRun, ApifyConfig, CallOptions, DatasetItem};
use crate::services::{ActorClient, AsyncActorClient};
use crate::utils::http::{api_error, auth_headers, create_async_client, create_blocking_client};
use crate::utils::url::Endpoints;

/// Single-object responses are wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

fn decode<T: DeserializeOwned>(status: reqwest::StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        return Err(api_error(status, body));
    }
    Ok(serde_json::from_str(body)?)
}

// --- Blocking Client ---

/// Blocking platform client.
///
/// The underlying `reqwest::blocking::Client` owns a private runtime, so it
/// is only built on the first request. Constructing and dropping an unused
/// client is therefore safe inside an async context.
#[derive(Clone)]
pub struct ApifyClient {
    config: ApifyConfig,
    token: String,
    http: OnceLock<reqwest::blocking::Client>,
    endpoints: Endpoints,
}

impl ApifyClient {
    /// Build a client, resolving the token from `config` or the environment.
    pub fn new(config: &ApifyConfig) -> Result<Self> {
        let token = config.resolve_token()?;
        Self::with_token(config, &token)
    }

    /// Build a client for an already resolved token.
    pub fn with_token(config: &ApifyConfig, token: &str) -> Result<Self> {
        auth_headers(token)?;
        Ok(Self {
            config: config.clone(),
            token: token.to_string(),
            http: OnceLock::new(),
            endpoints: Endpoints::new(&config.base_url)?,
        })
    }

    fn http(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(http) = self.http.get() {
            return Ok(http);
        }
        let http = create_blocking_client(&self.config, &self.token)?;
        Ok(self.http.get_or_init(|| http))
    }

    fn read<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
        let status = response.status();
        let body = response.text()?;
        decode(status, &body)
    }

    fn get_run(&self, run_id: &str) -> Result<ActorRun> {
        let url = self.endpoints.actor_run(run_id, self.config.wait_secs);
        let envelope: DataEnvelope<ActorRun> = Self::read(self.http()?.get(url).send()?)?;
        Ok(envelope.data)
    }
}

impl ActorClient for ApifyClient {
    fn call(&self, actor_id: &str, input: &Value, options: &CallOptions) -> Result<ActorRun> {
        let url = self
            .endpoints
            .actor_runs(actor_id, self.config.wait_secs, options);
        log::info!("Starting actor {}", actor_id);

        let envelope: DataEnvelope<ActorRun> =
            Self::read(self.http()?.post(url).json(input).send()?)?;
        let mut run = envelope.data;

        while !run.status.is_terminal() {
            log::debug!("Run {} is {}, waiting", run.id, run.status);
            run = self.get_run(&run.id)?;
        }

        log::info!("Run {} finished with status {}", run.id, run.status);
        Ok(run)
    }

    fn list_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>> {
        let url = self.endpoints.dataset_items(dataset_id);
        log::debug!("Fetching items of dataset {}", dataset_id);
        Self::read(self.http()?.get(url).send()?)
    }
}

impl Drop for ApifyClient {
    fn drop(&mut self) {
        // tokio refuses to shut down the blocking client's runtime on an
        // async worker thread; hand it to a plain thread instead
        if let Some(http) = self.http.take() {
            if tokio::runtime::Handle::try_current().is_ok() {
                std::thread::spawn(move || drop(http));
            }
        }
    }
}

impl fmt::Debug for ApifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApifyClient")
            .field("endpoints", &self.endpoints)
            .field("connected", &self.http.get().is_some())
            .finish_non_exhaustive()
    }
}

// --- Async Client ---

/// Asynchronous platform client.
#[derive(Debug, Clone)]
pub struct ApifyClientAsync {
    http: reqwest::Client,
    endpoints: Endpoints,
    wait_secs: u64,
}

impl ApifyClientAsync {
    /// Build a client, resolving the token from `config` or the environment.
    pub fn new(config: &ApifyConfig) -> Result<Self> {
        let token = config.resolve_token()?;
        Self::with_token(config, &token)
    }

    /// Build a client for an already resolved token.
    pub fn with_token(config: &ApifyConfig, token: &str) -> Result<Self> {
        Ok(Self {
            http: create_async_client(config, token)?,
            endpoints: Endpoints::new(&config.base_url)?,
            wait_secs: config.wait_secs,
        })
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        decode(status, &body)
    }

    async fn get_run(&self, run_id: &str) -> Result<ActorRun> {
        let url = self.endpoints.actor_run(run_id, self.wait_secs);
        let envelope: DataEnvelope<ActorRun> =
            Self::read(self.http.get(url).send().await?).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl AsyncActorClient for ApifyClientAsync {
    async fn call(
        &self,
        actor_id: &str,
        input: &Value,
        options: &CallOptions,
    ) -> Result<ActorRun> {
        let url = self.endpoints.actor_runs(actor_id, self.wait_secs, options);
        log::info!("Starting actor {}", actor_id);

        let envelope: DataEnvelope<ActorRun> =
            Self::read(self.http.post(url).json(input).send().await?).await?;
        let mut run = envelope.data;

        while !run.status.is_terminal() {
            log::debug!("Run {} is {}, waiting", run.id, run.status);
            run = self.get_run(&run.id).await?;
        }

        log::info!("Run {} finished with status {}", run.id, run.status);
        Ok(run)
    }
}
