use futures::future::BoxFuture;
use std::pin::Pin;
use tokio::io::AsyncRead;

use crate::Result;

/// Body of one fetched segment.
pub type SegmentStream = Pin<Box<dyn AsyncRead + Send>>;

pub type FetchFuture = BoxFuture<'static, Result<SegmentStream>>;

/// A deferred fetch of one segment body.
///
/// `invoke` consumes the operation, so each one runs at most once.
pub trait FetchOperation: Send {
    fn invoke(self: Box<Self>) -> FetchFuture;

    /// Where the operation fetches from, for logging.
    fn describe(&self) -> &str {
        "segment"
    }
}
