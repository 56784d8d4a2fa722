//! Document loaders.
//!
//! A loader turns some external source into a list of [`Document`]s. The
//! only source here is a platform dataset, see [`DatasetLoader`].

mod dataset;

use std::sync::Arc;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{DatasetItem, Document};

pub use dataset::DatasetLoader;

/// Converts one dataset item into a document.
pub type MappingFn = Arc<dyn Fn(&DatasetItem) -> Result<Document> + Send + Sync>;

/// Anything that can produce a list of documents on demand.
pub trait DocumentLoader {
    /// Load all documents. Every call hits the source again.
    fn load(&self) -> Result<Vec<Document>>;
}

/// Wrap a closure as a [`MappingFn`].
pub fn mapping<F>(f: F) -> MappingFn
where
    F: Fn(&DatasetItem) -> Result<Document> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Map a crawler result item: `text` becomes the content, `url` the `source`.
pub fn default_mapping(item: &DatasetItem) -> Result<Document> {
    let text = string_field(item, "text")?;
    let url = string_field(item, "url")?;
    Ok(Document::new(text).with_metadata("source", url))
}

fn string_field<'a>(item: &'a DatasetItem, key: &str) -> Result<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::mapping(format!("dataset item has no string field `{key}`")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> DatasetItem {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_default_mapping() {
        let doc = default_mapping(&item(json!({
            "text": "hello",
            "url": "https://example.com",
            "crawl": {"depth": 0}
        })))
        .unwrap();

        assert_eq!(
            doc,
            Document::new("hello").with_metadata("source", "https://example.com")
        );
    }

    #[test]
    fn test_default_mapping_missing_field() {
        let err = default_mapping(&item(json!({"text": "hello"}))).unwrap_err();
        assert!(matches!(err, AppError::Mapping(_)));

        let err = default_mapping(&item(json!({"text": 3, "url": "u"}))).unwrap_err();
        assert!(matches!(err, AppError::Mapping(_)));
    }

    #[test]
    fn test_mapping_wraps_closure() {
        let title = mapping(|item: &DatasetItem| {
            Ok(Document::new(item["title"].as_str().unwrap_or_default()))
        });
        let doc = title(&item(json!({"title": "Example"}))).unwrap();
        assert_eq!(doc.page_content, "Example");
    }
}
