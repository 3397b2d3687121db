// src/fetch/client.rs
use crate::utils::error::FetchError;
use crate::fetch::source::DocumentSource;
use reqwest::header;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("opinion_extractor/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a reqwest client configured for opinion pages.
/// One attempt per page; the timeout bounds the whole request.
pub struct PageClient {
    client: reqwest::Client,
}

impl PageClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        tracing::debug!("Built HTTP client (User-Agent: {}, timeout: {:?})", user_agent, timeout);
        Ok(Self { client })
    }

    /// Downloads a page and returns its body as text. Non-2xx responses are errors.
    pub async fn download_page(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Downloading page from: {}", url);

        let response = self.client.get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url.to_string()));
            }
            return Err(FetchError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }

    /// Loads raw markup for any source kind.
    pub async fn load(&self, source: &DocumentSource) -> Result<String, FetchError> {
        match source {
            DocumentSource::Url(url) => self.download_page(url).await,
            DocumentSource::File(path) => {
                let body = tokio::fs::read_to_string(path).await.map_err(|source| FetchError::File {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!("Read {} bytes from {}", body.len(), path.display());
                Ok(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<html><title>T</title></html>").unwrap();

        let client = PageClient::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let body = tokio_test::block_on(client.load(&DocumentSource::File(path))).unwrap();
        assert_eq!(body, "<html><title>T</title></html>");
    }

    #[test]
    fn test_load_missing_file_is_file_error() {
        let client = PageClient::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let source = DocumentSource::File("/no/such/opinion.html".into());
        let err = tokio_test::block_on(client.load(&source)).unwrap_err();
        assert!(matches!(err, FetchError::File { .. }));
    }

    #[test]
    fn test_default_user_agent_carries_version() {
        assert!(DEFAULT_USER_AGENT.starts_with("opinion_extractor/"));
    }
}
