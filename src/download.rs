use std::time::Duration;
use url::Url;

use crate::{
    fetch::{Fetch, SegmentFetch},
    hls::{select_range, MasterPlaylist, MediaPlaylist, MediaSegment, Variant},
    merge::{FetchOperation, Merger},
    Result,
};

/// Quality keyword that picks the variant with the highest bandwidth.
pub const BEST_QUALITY: &str = "best";

/// Resolves a quality and time range of a stream into a [`Merger`].
#[derive(Clone)]
pub struct Downloader<F> {
    fetcher: F,
}

impl<F: Fetch> Downloader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch and parse the master playlist at `url`.
    pub async fn master(&self, url: &str) -> Result<MasterPlaylist> {
        tracing::info!("Fetching master playlist: {}", url);
        let text = self.fetcher.fetch_text(url).await?;
        MasterPlaylist::parse(&text)
    }

    /// Quality names offered by the master playlist at `url`.
    pub async fn qualities(&self, url: &str) -> Result<Vec<String>> {
        let master = self.master(url).await?;
        Ok(master.qualities().into_iter().map(String::from).collect())
    }

    /// Fetch and parse the media playlist at `url`, resolving segment URIs
    /// against it.
    pub async fn media(&self, url: &str) -> Result<MediaPlaylist> {
        tracing::info!("Fetching media playlist: {}", url);
        let text = self.fetcher.fetch_text(url).await?;
        MediaPlaylist::parse(&text, Some(url))
    }

    /// Build a merger over `segments` without fetching anything yet.
    pub fn merger(&self, segments: &[MediaSegment]) -> Merger {
        let operations = segments
            .iter()
            .map(|s| {
                Box::new(SegmentFetch::new(self.fetcher.clone(), s.url.as_str()))
                    as Box<dyn FetchOperation>
            })
            .collect();
        Merger::new(operations)
    }

    /// Resolve `quality` in the master playlist at `url` and open a merger
    /// over the segments overlapping `[start, end)`.
    ///
    /// Zero for both bounds selects the whole stream; a zero `end` runs to
    /// the last segment.
    pub async fn open(
        &self,
        url: &str,
        quality: &str,
        start: Duration,
        end: Duration,
    ) -> Result<Merger> {
        let master = self.master(url).await?;
        let variant = select_variant(&master, quality)?;
        let media_url = Url::parse(url)?.join(&variant.url)?;

        let playlist = self.media(media_url.as_str()).await?;
        let segments = select_range(&playlist.segments, start, end)?;

        tracing::info!(
            quality,
            segments = segments.len(),
            total = playlist.segments.len(),
            "Selected segments"
        );
        Ok(self.merger(segments))
    }
}

/// Variant for `quality`, where [`BEST_QUALITY`] picks the highest bandwidth
/// unless an alternative is literally named that.
pub fn select_variant<'a>(master: &'a MasterPlaylist, quality: &str) -> Result<&'a Variant> {
    match master.variant_by_quality(quality) {
        Err(_) if quality.eq_ignore_ascii_case(BEST_QUALITY) => master.best_variant(),
        found => found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        merge::{FetchFuture, SegmentStream},
        Error,
    };
    use futures::future::BoxFuture;
    use std::{
        collections::HashMap,
        io::Cursor,
        sync::{Arc, Mutex},
    };
    use tokio::io::AsyncReadExt;

    const MASTER: &str = r#"#EXTM3U
#EXT-X-MEDIA:TYPE=VIDEO,GROUP-ID="chunked",NAME="1080p",AUTOSELECT=YES,DEFAULT=YES
#EXT-X-STREAM-INF:BANDWIDTH=6847192,RESOLUTION=1920x1080,VIDEO="chunked"
chunked/index-dvr.m3u8
#EXT-X-MEDIA:TYPE=VIDEO,GROUP-ID="720p30",NAME="720p"
#EXT-X-STREAM-INF:BANDWIDTH=2303475,RESOLUTION=1280x720,VIDEO="720p30"
http://cdn.test/720p30/index-dvr.m3u8"#;

    const MEDIA: &str = "#EXTM3U
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:0
#EXTINF:10.000,
0.ts
#EXTINF:10.000,
1.ts
#EXTINF:10.000,
2.ts
#EXT-X-ENDLIST";

    /// In-memory transport that records every URL it was asked for.
    #[derive(Clone, Default)]
    struct FakeFetcher {
        bodies: Arc<HashMap<String, Vec<u8>>>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl FakeFetcher {
        fn new(bodies: &[(&str, &[u8])]) -> Self {
            Self {
                bodies: Arc::new(
                    bodies
                        .iter()
                        .map(|(url, body)| (url.to_string(), body.to_vec()))
                        .collect(),
                ),
                requested: Arc::default(),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }

        fn body(&self, url: &str) -> Result<Vec<u8>> {
            self.requested.lock().unwrap().push(url.to_string());
            self.bodies.get(url).cloned().ok_or_else(|| Error::FetchFailed {
                url: url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &str) -> FetchFuture {
            let result = self
                .body(url)
                .map(|body| Box::pin(Cursor::new(body)) as SegmentStream);
            Box::pin(async move { result })
        }

        fn fetch_text(&self, url: &str) -> BoxFuture<'static, Result<String>> {
            let result = self.body(url).map(|body| String::from_utf8(body).unwrap());
            Box::pin(async move { result })
        }
    }

    fn stream() -> FakeFetcher {
        FakeFetcher::new(&[
            ("http://cdn.test/master.m3u8", MASTER.as_bytes()),
            ("http://cdn.test/720p30/index-dvr.m3u8", MEDIA.as_bytes()),
            ("http://cdn.test/chunked/index-dvr.m3u8", MEDIA.as_bytes()),
            ("http://cdn.test/720p30/0.ts", b"aaa"),
            ("http://cdn.test/720p30/1.ts", b"bbb"),
            ("http://cdn.test/720p30/2.ts", b"ccc"),
            ("http://cdn.test/chunked/0.ts", b"AAA"),
            ("http://cdn.test/chunked/1.ts", b"BBB"),
            ("http://cdn.test/chunked/2.ts", b"CCC"),
        ])
    }

    async fn read_all(mut merger: Merger) -> Vec<u8> {
        let mut out = Vec::new();
        merger.read_to_end(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn test_qualities() {
        let downloader = Downloader::new(stream());
        let qualities = downloader.qualities("http://cdn.test/master.m3u8").await.unwrap();
        assert_eq!(qualities, vec!["1080p", "720p"]);
    }

    #[tokio::test]
    async fn test_open_whole_stream() {
        let fetcher = stream();
        let downloader = Downloader::new(fetcher.clone());
        let merger = downloader
            .open("http://cdn.test/master.m3u8", "720p", Duration::ZERO, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(merger.total_segments(), 3);
        // Segments are only requested once the merger is read.
        assert_eq!(fetcher.requested().len(), 2);

        assert_eq!(read_all(merger).await, b"aaabbbccc");
        assert_eq!(
            fetcher.requested()[2..],
            [
                "http://cdn.test/720p30/0.ts",
                "http://cdn.test/720p30/1.ts",
                "http://cdn.test/720p30/2.ts",
            ]
        );
    }

    #[tokio::test]
    async fn test_open_range_with_relative_variant() {
        let downloader = Downloader::new(stream());
        let merger = downloader
            .open(
                "http://cdn.test/master.m3u8",
                "1080p",
                Duration::from_secs(12),
                Duration::from_secs(25),
            )
            .await
            .unwrap();
        assert_eq!(read_all(merger).await, b"BBBCCC");
    }

    #[tokio::test]
    async fn test_open_best() {
        let downloader = Downloader::new(stream());
        let merger = downloader
            .open("http://cdn.test/master.m3u8", "best", Duration::ZERO, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(read_all(merger).await, b"AAA");
    }

    #[tokio::test]
    async fn test_open_unknown_quality() {
        let downloader = Downloader::new(stream());
        let err = downloader
            .open("http://cdn.test/master.m3u8", "480p", Duration::ZERO, Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err, Error::QualityNotFound("480p".to_string()));
    }

    #[tokio::test]
    async fn test_open_range_outside_video() {
        let downloader = Downloader::new(stream());
        let err = downloader
            .open(
                "http://cdn.test/master.m3u8",
                "720p",
                Duration::from_secs(60),
                Duration::from_secs(90),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::RangeNotInVideo {
                total: Duration::from_secs(30)
            }
        );
    }

    #[tokio::test]
    async fn test_missing_master() {
        let downloader = Downloader::new(FakeFetcher::default());
        let err = downloader.master("http://cdn.test/master.m3u8").await.unwrap_err();
        assert_eq!(err.error_code(), "FETCH_FAILED");
    }
}
