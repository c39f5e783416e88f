use crate::{
    config::ClientConfig,
    fetch::{Fetch, HeaderCodec},
    merge::{FetchFuture, SegmentStream},
    Result,
};
use bytes::Bytes;
use futures::{future::BoxFuture, TryStreamExt};
use reqwest::{Client, Response};
use std::io;
use tokio_util::io::StreamReader;

/// HTTP client for playlists and segment bodies.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(HeaderCodec::to_header_map(&config.headers)?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn send(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(crate::Error::FetchFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        Ok(response)
    }

    /// Fetch a body and return it as a string.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let bytes = self.send(url).await?.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| crate::Error::FetchFailed {
            url: url.to_string(),
            reason: format!("Invalid UTF-8: {}", e),
        })
    }

    /// Open a body as a byte stream without buffering it.
    pub async fn get_stream(&self, url: &str) -> Result<SegmentStream> {
        let response = self.send(url).await?;
        let body = response.bytes_stream().map_err(io::Error::other);
        let reader: StreamReader<_, Bytes> = StreamReader::new(body);
        Ok(Box::pin(reader))
    }
}

impl Fetch for HttpClient {
    fn fetch(&self, url: &str) -> FetchFuture {
        let client = self.clone();
        let url = url.to_string();
        Box::pin(async move {
            tracing::debug!("Fetching segment: {}", url);
            client.get_stream(&url).await
        })
    }

    fn fetch_text(&self, url: &str) -> BoxFuture<'static, Result<String>> {
        let client = self.clone();
        let url = url.to_string();
        Box::pin(async move {
            tracing::debug!("Fetching playlist: {}", url);
            client.get_text(&url).await
        })
    }
}
