// src/lib.rs

//! Apify dataset loader library
//!
//! Runs actors on the Apify platform and turns the items of their datasets
//! into [`models::Document`]s.

pub mod error;
pub mod loader;
pub mod models;
pub mod services;
pub mod utils;
pub mod wrapper;

pub use error::{AppError, Result};
pub use loader::{DatasetLoader, DocumentLoader, MappingFn, default_mapping, mapping};
pub use models::{ApifyConfig, Config, DatasetItem, Document};
pub use wrapper::{ApifyWrapper, RunOptions};
