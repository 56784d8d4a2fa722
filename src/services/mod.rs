//! Platform client layer.
//!
//! - `ActorClient`: blocking calls, used by the wrapper and the dataset loader
//! - `AsyncActorClient`: the run call as a future; datasets are only read
//!   through the blocking client
//!
//! `ApifyClient` and `ApifyClientAsync` implement them over the HTTP API.

mod apify;
#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{ActorRun, CallOptions, DatasetItem};

pub use apify::{ApifyClient, ApifyClientAsync};

/// Blocking access to the platform.
pub trait ActorClient: Send + Sync {
    /// Start `actor_id` with `input` and wait until the run is terminal.
    fn call(&self, actor_id: &str, input: &Value, options: &CallOptions) -> Result<ActorRun>;

    /// Fetch every item of a dataset in a single request.
    fn list_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>>;
}

/// Non-blocking access to the platform.
#[async_trait]
pub trait AsyncActorClient: Send + Sync {
    /// Start `actor_id` with `input` and wait until the run is terminal.
    async fn call(&self, actor_id: &str, input: &Value, options: &CallOptions)
    -> Result<ActorRun>;
}
