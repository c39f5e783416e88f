use hlsdl::Merger;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, ReadBuf};

/// Reports segment and byte progress while a [`Merger`] is read.
pub struct MergerProgress {
    merger: Merger,
    bar: ProgressBar,
    bytes: u64,
}

impl MergerProgress {
    pub fn new(merger: Merger) -> Self {
        let bar = ProgressBar::new(merger.total_segments() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({msg})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self {
            merger,
            bar,
            bytes: 0,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message(HumanBytes(self.bytes).to_string());
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl AsyncRead for MergerProgress {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let poll = Pin::new(&mut this.merger).poll_read(cx, buf);

        if let Poll::Ready(Ok(())) = poll {
            this.bytes += (buf.filled().len() - before) as u64;
            this.bar.set_position(this.merger.processed_segments() as u64);
            this.bar.set_message(HumanBytes(this.bytes).to_string());
        }
        poll
    }
}
