use std::{
    fmt,
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, ReadBuf};

use super::operation::{FetchFuture, FetchOperation, SegmentStream};
use crate::Error;

enum State {
    /// Waiting for a read before invoking the next operation.
    Idle,
    Fetching(FetchFuture),
    Streaming(SegmentStream),
    Exhausted,
    Failed(Error),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching(_) => "fetching",
            Self::Streaming(_) => "streaming",
            Self::Exhausted => "exhausted",
            Self::Failed(_) => "failed",
        }
    }
}

/// Concatenates segment bodies into one readable stream.
///
/// Operations are invoked lazily, one at a time and in order, only once the
/// previous segment's stream has been read to its end and dropped. The first
/// error is returned by every later read.
pub struct Merger {
    operations: std::vec::IntoIter<Box<dyn FetchOperation>>,
    total: usize,
    cursor: usize,
    state: State,
}

impl Merger {
    pub fn new(operations: Vec<Box<dyn FetchOperation>>) -> Self {
        Self {
            total: operations.len(),
            operations: operations.into_iter(),
            cursor: 0,
            state: State::Idle,
        }
    }

    /// Number of segments this merger was created with.
    pub fn total_segments(&self) -> usize {
        self.total
    }

    /// Number of segments fetched so far, including the one being read.
    pub fn processed_segments(&self) -> usize {
        self.cursor
    }

    /// True once every segment has been read to its end.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            State::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn fail(&mut self, err: Error) -> io::Error {
        tracing::warn!(segment = self.cursor, error = %err, "Merge failed");
        self.state = State::Failed(err.clone());
        err.into()
    }
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merger")
            .field("total", &self.total)
            .field("cursor", &self.cursor)
            .field("state", &self.state.name())
            .finish()
    }
}

impl AsyncRead for Merger {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        // An empty buffer would look like end of segment below.
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        loop {
            match &mut this.state {
                State::Failed(err) => return Poll::Ready(Err(err.clone().into())),
                State::Exhausted => return Poll::Ready(Ok(())),
                State::Idle => match this.operations.next() {
                    Some(operation) => {
                        tracing::debug!(
                            segment = this.cursor,
                            total = this.total,
                            url = operation.describe(),
                            "Fetching segment"
                        );
                        this.state = State::Fetching(operation.invoke());
                    }
                    None => {
                        tracing::debug!(total = this.total, "All segments merged");
                        this.state = State::Exhausted;
                    }
                },
                State::Fetching(fetch) => match fetch.as_mut().poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Ok(stream)) => {
                        this.cursor += 1;
                        this.state = State::Streaming(stream);
                    }
                    Poll::Ready(Err(err)) => return Poll::Ready(Err(this.fail(err))),
                },
                State::Streaming(stream) => {
                    let filled = buf.filled().len();
                    match stream.as_mut().poll_read(cx, buf) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Ok(())) if buf.filled().len() > filled => {
                            return Poll::Ready(Ok(()));
                        }
                        Poll::Ready(Ok(())) => {
                            tracing::debug!(segment = this.cursor - 1, "Segment finished");
                            // Dropping the stream releases the connection before the next fetch.
                            this.state = State::Idle;
                        }
                        Poll::Ready(Err(e)) => {
                            let err = Error::from_io(&e).cloned().unwrap_or_else(|| {
                                Error::StreamInterrupted {
                                    segment: this.cursor - 1,
                                    reason: e.to_string(),
                                }
                            });
                            return Poll::Ready(Err(this.fail(err)));
                        }
                    }
                }
            }
        }
    }
}
