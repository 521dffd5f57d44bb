use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("{reference} is not valid JSON: {source}")]
    Json {
        reference: String,
        source: serde_json::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Where a manifest, list or image lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(String),
    Local(PathBuf),
}

impl Source {
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Source::Remote(reference.to_string())
        } else {
            let path = reference.strip_prefix("file://").unwrap_or(reference);
            Source::Local(PathBuf::from(path))
        }
    }
}

/// Reads sources over HTTP or from disk
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("paleo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn bytes(&self, reference: &str) -> Result<Vec<u8>, FetchError> {
        match Source::parse(reference) {
            Source::Remote(url) => {
                tracing::debug!("GET {url}");
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|source| FetchError::Network {
                        url: url.clone(),
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url,
                        status: status.as_u16(),
                    });
                }

                let body = response
                    .bytes()
                    .await
                    .map_err(|source| FetchError::Network { url, source })?;
                Ok(body.to_vec())
            }
            Source::Local(path) => {
                tracing::debug!("Reading {}", path.display());
                tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }

    pub async fn text(&self, reference: &str) -> Result<String, FetchError> {
        let bytes = self.bytes(reference).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn json(&self, reference: &str) -> Result<Value, FetchError> {
        let bytes = self.bytes(reference).await?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Json {
            reference: reference.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            Source::parse("https://example.org/manifest.json"),
            Source::Remote("https://example.org/manifest.json".into())
        );
        assert_eq!(
            Source::parse("file:///tmp/manifest.json"),
            Source::Local(PathBuf::from("/tmp/manifest.json"))
        );
        assert_eq!(
            Source::parse(" fixtures/m.json "),
            Source::Local(PathBuf::from("fixtures/m.json"))
        );
    }

    #[tokio::test]
    async fn test_json_from_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "@id": "https://example.org/m" }}"#).unwrap();

        let value = fetcher()
            .json(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(value["@id"], "https://example.org/m");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        let err = fetcher()
            .json(missing.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html>").unwrap();

        let err = fetcher()
            .json(file.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Json { .. }));
    }
}
