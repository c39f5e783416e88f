use std::time::Duration;

use super::media::MediaSegment;
use crate::{Error, Result};

/// Sum of the durations of `segments`.
pub fn total_duration(segments: &[MediaSegment]) -> Duration {
    segments
        .iter()
        .fold(Duration::ZERO, |acc, s| acc.saturating_add(s.duration))
}

/// Select the contiguous run of segments overlapping `[start, end)`.
///
/// An `end` of zero means "until the last segment"; `start` and `end` both
/// zero returns `segments` untouched.
pub fn select_range(
    segments: &[MediaSegment],
    start: Duration,
    end: Duration,
) -> Result<&[MediaSegment]> {
    if !end.is_zero() && start >= end {
        return Err(Error::InvalidRange(format!(
            "end {end:?} is not after start {start:?}"
        )));
    }
    if start.is_zero() && end.is_zero() {
        return Ok(segments);
    }
    let end = if end.is_zero() { Duration::MAX } else { end };

    let mut first = None;
    let mut last = 0;
    let mut segment_start = Duration::ZERO;

    for (i, segment) in segments.iter().enumerate() {
        if segment_start >= end {
            break;
        }
        let segment_end = segment_start.saturating_add(segment.duration);
        if segment_end > start {
            first.get_or_insert(i);
            last = i;
        }
        segment_start = segment_end;
    }

    match first {
        Some(first) => Ok(&segments[first..=last]),
        None => Err(Error::RangeNotInVideo {
            total: total_duration(segments),
        }),
    }
}
