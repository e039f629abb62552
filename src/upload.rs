use crate::error::{Error, Result};
use reqwest::{Client, header};
use std::path::Path;

/// Destination for the rendered page.
#[async_trait::async_trait]
pub trait Uploader {
    async fn upload(&self, path: &Path, destination: &str) -> Result<()>;
}

/// PUTs the file to `{endpoint}/{destination}` as `text/html`.
pub struct HttpUploader {
    client: Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn object_url(&self, destination: &str) -> String {
        format!("{}/{}", self.endpoint, destination.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, path: &Path, destination: &str) -> Result<()> {
        let body = std::fs::read(path)?;
        let url = self.object_url(destination);
        let bytes = body.len();

        let resp = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, "text/html")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Upload(format!("{url}: {e}")))?;
        resp.error_for_status()
            .map_err(|e| Error::Upload(format!("{url}: {e}")))?;

        tracing::info!(%url, bytes, "page uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_joins_with_one_slash() {
        let up = HttpUploader::new("https://bucket.example/listings/").unwrap();
        assert_eq!(
            up.object_url("/index.html"),
            "https://bucket.example/listings/index.html"
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let up = HttpUploader::new("http://127.0.0.1:9").unwrap();
        let err = up
            .upload(Path::new("/nonexistent/index.html"), "index.html")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
