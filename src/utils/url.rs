// src/utils/url.rs

//! Platform endpoint construction.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::CallOptions;

const API_VERSION: &str = "v2";

/// Encode an actor id for use in a URL path.
///
/// # Examples
/// ```
/// use apify_loader::utils::url::encode_actor_id;
///
/// assert_eq!(encode_actor_id("apify/web-scraper"), "apify~web-scraper");
/// ```
pub fn encode_actor_id(actor_id: &str) -> String {
    actor_id.replace('/', "~")
}

/// Builds API URLs relative to a configured base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "apify.base_url is not a usable base URL: {base_url}"
            )));
        }
        Ok(Self { base })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(API_VERSION).extend(segments);
        }
        url
    }

    /// `POST` target that starts a run of `actor_id`.
    pub fn actor_runs(&self, actor_id: &str, wait_secs: u64, options: &CallOptions) -> Url {
        let encoded = encode_actor_id(actor_id);
        let mut url = self.url(&["acts", encoded.as_str(), "runs"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("waitForFinish", &wait_secs.to_string());
            if let Some(build) = &options.build {
                query.append_pair("build", build);
            }
            if let Some(memory) = options.memory_mbytes {
                query.append_pair("memory", &memory.to_string());
            }
            if let Some(timeout) = options.timeout_secs {
                query.append_pair("timeout", &timeout.to_string());
            }
        }
        url
    }

    /// `GET` target that reports (and long-polls) a single run.
    pub fn actor_run(&self, run_id: &str, wait_secs: u64) -> Url {
        let mut url = self.url(&["actor-runs", run_id]);
        url.query_pairs_mut()
            .append_pair("waitForFinish", &wait_secs.to_string());
        url
    }

    /// `GET` target listing every item of a dataset as a JSON array.
    pub fn dataset_items(&self, dataset_id: &str) -> Url {
        let mut url = self.url(&["datasets", dataset_id, "items"]);
        url.query_pairs_mut().append_pair("format", "json");
        url
    }
}
