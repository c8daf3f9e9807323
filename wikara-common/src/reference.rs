//! Reference hierarchy loading
//!
//! The hierarchy is a static JSON resource. It may live on disk next to the
//! service or behind a URL; both are read fresh on every load.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::hierarchy::Region;
use crate::{Error, Result};

/// Source of the reference hierarchy
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Load the full hierarchy in reference order
    async fn load(&self) -> Result<Vec<Region>>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

/// Hierarchy read from a local JSON file
pub struct FileReference {
    path: PathBuf,
}

impl FileReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReferenceSource for FileReference {
    async fn load(&self) -> Result<Vec<Region>> {
        debug!(path = %self.path.display(), "Reading reference hierarchy");
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Hierarchy fetched over HTTP
pub struct HttpReference {
    client: Client,
    url: String,
}

impl HttpReference {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ReferenceSource for HttpReference {
    async fn load(&self) -> Result<Vec<Region>> {
        debug!(url = %self.url, "Fetching reference hierarchy");
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "reference hierarchy returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source from a configured location: URLs are fetched, anything else is a file path
pub fn reference_source(location: &str, client: Client) -> Arc<dyn ReferenceSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpReference::new(client, location))
    } else {
        Arc::new(FileReference::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_reference_loads_hierarchy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "010", "name": "Selemadeg", "desa": [{{"id": "001", "name": "Antap", "sls": [{{"id": "51020100010001", "name": "Banjar Antap"}}]}}]}}]"#
        )
        .unwrap();

        let source = FileReference::new(file.path());
        let regions = source.load().await.unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].sub_regions[0].sub_units[0].name, "Banjar Antap");
    }

    #[tokio::test]
    async fn test_file_reference_missing_file_is_io_error() {
        let source = FileReference::new("/nonexistent/wikara/kecamatan-data.json");
        assert!(matches!(source.load().await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_file_reference_malformed_json_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let source = FileReference::new(file.path());
        assert!(matches!(source.load().await, Err(Error::Json(_))));
    }

    #[test]
    fn test_reference_source_selects_by_scheme() {
        let client = Client::new();
        assert_eq!(
            reference_source("https://example.org/data.json", client.clone()).location(),
            "https://example.org/data.json"
        );
        assert_eq!(
            reference_source("data/kecamatan-data.json", client).location(),
            "data/kecamatan-data.json"
        );
    }
}
