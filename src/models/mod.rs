// src/models/mod.rs

//! Domain models for the loader.
//!
//! This module contains the data structures shared by the clients, the
//! wrapper and the dataset loader.

mod config;
mod document;
mod run;

// Re-export all public types
pub use config::{ApifyConfig, Config, LEGACY_TOKEN_ENV_VAR, TOKEN_ENV_VAR};
pub use document::{DatasetItem, Document};
pub use run::{ActorRun, CallOptions, RunStatus};
