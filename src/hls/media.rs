//! Media playlist parsing.
//!
//! See RFC 8216 section 4.3.3 for the tags handled here.

use std::time::Duration;
use url::Url;

use super::{
    classifier::{expect_signature, expect_uri, LineClassifier, LineType},
    range::total_duration,
};
use crate::{Error, Result};

/// A media segment: one `#EXTINF` tag and its URI line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSegment {
    /// Media sequence base plus the segment's position in the playlist.
    pub number: u64,
    pub duration: Duration,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPlaylist {
    pub target_duration: Duration,
    pub playlist_type: Option<String>,
    pub sequence: u64,
    pub ended: bool,
    pub segments: Vec<MediaSegment>,
}

impl MediaPlaylist {
    /// Parse a media playlist.
    ///
    /// `base_url` is the URL the playlist was fetched from. When given,
    /// relative segment URIs are resolved against it; absolute ones are kept
    /// as written.
    pub fn parse(input: &str, base_url: Option<&str>) -> Result<Self> {
        let base = base_url.map(Url::parse).transpose()?;

        let mut lines = input.lines();
        expect_signature(&mut lines)?;

        let mut playlist = Self::default();

        while let Some(line) = lines.next() {
            let line_type = LineClassifier::classify(line);
            match line_type {
                LineType::ExtXTargetDuration => {
                    let secs = parse_number("target duration", line_type.value(line))?;
                    playlist.target_duration = Duration::from_secs(secs);
                }
                LineType::ExtXPlaylistType => {
                    playlist.playlist_type = Some(line_type.value(line).to_string());
                }
                LineType::ExtXMediaSequence => {
                    playlist.sequence = parse_number("media sequence", line_type.value(line))?;
                }
                LineType::ExtXEndList => playlist.ended = true,
                LineType::ExtInf => {
                    let duration = parse_extinf(line_type.value(line))?;
                    let uri = expect_uri(&mut lines, "#EXTINF")?;
                    playlist.segments.push(MediaSegment {
                        number: 0,
                        duration,
                        url: resolve(base.as_ref(), &uri)?,
                    });
                }
                _ => {}
            }
        }

        // Numbering is applied once the base is final so it stays contiguous.
        for (index, segment) in playlist.segments.iter_mut().enumerate() {
            segment.number = playlist.sequence.checked_add(index as u64).ok_or_else(|| {
                Error::MalformedNumericField {
                    field: "media sequence",
                    value: playlist.sequence.to_string(),
                }
            })?;
        }

        tracing::debug!(
            segments = playlist.segments.len(),
            sequence = playlist.sequence,
            ended = playlist.ended,
            "Parsed media playlist"
        );

        Ok(playlist)
    }

    /// Sum of all segment durations.
    pub fn duration(&self) -> Duration {
        total_duration(&self.segments)
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| Error::MalformedNumericField {
        field,
        value: value.to_string(),
    })
}

/// Parse the duration in `<seconds>[,<title>]`; the title is ignored.
fn parse_extinf(value: &str) -> Result<Duration> {
    let secs = value.split(',').next().unwrap_or("").trim();
    let malformed = || Error::MalformedNumericField {
        field: "segment duration",
        value: secs.to_string(),
    };

    let secs: f64 = secs.parse().map_err(|_| malformed())?;
    Duration::try_from_secs_f64(secs).map_err(|_| malformed())
}

fn resolve(base: Option<&Url>, uri: &str) -> Result<String> {
    match base {
        Some(base) if Url::parse(uri).is_err() => Ok(base.join(uri)?.to_string()),
        _ => Ok(uri.to_string()),
    }
}
