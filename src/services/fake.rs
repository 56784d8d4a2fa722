//! In-memory platform used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{ActorRun, CallOptions, DatasetItem, RunStatus};
use crate::services::{ActorClient, AsyncActorClient};

/// Recorded `call` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub actor_id: String,
    pub input: Value,
    pub options: CallOptions,
}

#[derive(Default)]
pub struct FakeClient {
    runs: HashMap<String, ActorRun>,
    datasets: HashMap<String, Vec<DatasetItem>>,
    calls: Mutex<Vec<RecordedCall>>,
    list_calls: AtomicUsize,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls to `actor_id` finish immediately with `run`.
    pub fn with_run(mut self, actor_id: &str, run: ActorRun) -> Self {
        self.runs.insert(actor_id.to_string(), run);
        self
    }

    pub fn with_dataset(mut self, dataset_id: &str, items: Vec<DatasetItem>) -> Self {
        self.datasets.insert(dataset_id.to_string(), items);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn record_call(&self, actor_id: &str, input: &Value, options: &CallOptions) -> Result<ActorRun> {
        self.calls.lock().unwrap().push(RecordedCall {
            actor_id: actor_id.to_string(),
            input: input.clone(),
            options: options.clone(),
        });
        self.runs.get(actor_id).cloned().ok_or_else(|| {
            AppError::api(404, "record-not-found", format!("Actor {actor_id} was not found"))
        })
    }

    fn items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.datasets.get(dataset_id).cloned().ok_or_else(|| {
            AppError::api(
                404,
                "record-not-found",
                format!("Dataset {dataset_id} was not found"),
            )
        })
    }
}

impl ActorClient for FakeClient {
    fn call(&self, actor_id: &str, input: &Value, options: &CallOptions) -> Result<ActorRun> {
        self.record_call(actor_id, input, options)
    }

    fn list_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>> {
        self.items(dataset_id)
    }
}

#[async_trait]
impl AsyncActorClient for FakeClient {
    async fn call(
        &self,
        actor_id: &str,
        input: &Value,
        options: &CallOptions,
    ) -> Result<ActorRun> {
        tokio::task::yield_now().await;
        self.record_call(actor_id, input, options)
    }
}

/// A finished run writing to `dataset_id`.
pub fn run(id: &str, status: RunStatus, dataset_id: &str) -> ActorRun {
    ActorRun {
        id: id.to_string(),
        act_id: "fake".to_string(),
        status,
        started_at: None,
        finished_at: None,
        default_dataset_id: dataset_id.to_string(),
        default_key_value_store_id: None,
    }
}

/// Convert a JSON array literal into dataset items.
pub fn items(value: Value) -> Vec<DatasetItem> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                other => panic!("dataset item is not an object: {other}"),
            })
            .collect(),
        other => panic!("not an array: {other}"),
    }
}
