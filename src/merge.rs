pub mod merger;
pub mod operation;

pub use merger::Merger;
pub use operation::{FetchFuture, FetchOperation, SegmentStream};
