pub mod client;
pub mod headers;

pub use client::HttpClient;
pub use headers::HeaderCodec;

use futures::future::BoxFuture;

use crate::{
    merge::{FetchFuture, FetchOperation},
    Result,
};

/// Transport for playlists and segment bodies.
///
/// Returned futures own everything they need, so a fetch can be deferred
/// until the merger reaches its segment.
pub trait Fetch: Clone + Send + Sync + 'static {
    /// Open the body at `url` as a byte stream.
    fn fetch(&self, url: &str) -> FetchFuture;

    /// Fetch the whole body at `url` as text.
    fn fetch_text(&self, url: &str) -> BoxFuture<'static, Result<String>>;
}

/// Deferred fetch of one segment URL.
pub struct SegmentFetch<F> {
    fetcher: F,
    url: String,
}

impl<F: Fetch> SegmentFetch<F> {
    pub fn new(fetcher: F, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

impl<F: Fetch> FetchOperation for SegmentFetch<F> {
    fn invoke(self: Box<Self>) -> FetchFuture {
        self.fetcher.fetch(&self.url)
    }

    fn describe(&self) -> &str {
        &self.url
    }
}
