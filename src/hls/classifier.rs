use crate::{Error, Result};

/// Playlist signature every M3U8 document starts with.
pub const SIGNATURE: &str = "#EXTM3U";

/// Represents the type of a line in an M3U8 playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Empty,
    ExtM3U,
    ExtXStreamInf,
    ExtXMedia,
    ExtXTargetDuration,
    ExtXPlaylistType,
    ExtXMediaSequence,
    ExtInf,
    ExtXEndList,
    UnknownExtTag,
    Comment,
    Uri,
}

impl LineType {
    /// Tag prefix (including the colon) that precedes the tag's value.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::ExtXStreamInf => Some("#EXT-X-STREAM-INF:"),
            Self::ExtXMedia => Some("#EXT-X-MEDIA:"),
            Self::ExtXTargetDuration => Some("#EXT-X-TARGETDURATION:"),
            Self::ExtXPlaylistType => Some("#EXT-X-PLAYLIST-TYPE:"),
            Self::ExtXMediaSequence => Some("#EXT-X-MEDIA-SEQUENCE:"),
            Self::ExtInf => Some("#EXTINF:"),
            _ => None,
        }
    }

    /// Returns the part of `line` after this type's tag prefix.
    pub fn value<'a>(&self, line: &'a str) -> &'a str {
        let line = line.trim();
        self.prefix()
            .and_then(|p| line.strip_prefix(p))
            .unwrap_or("")
            .trim()
    }
}

/// Classifier for M3U8 lines.
pub struct LineClassifier;

impl LineClassifier {
    /// Classify a line from an M3U8 playlist.
    pub fn classify(line: &str) -> LineType {
        let line = line.trim();

        if line.is_empty() {
            return LineType::Empty;
        }

        if !line.starts_with('#') {
            return LineType::Uri;
        }

        if line == SIGNATURE {
            LineType::ExtM3U
        } else if line.starts_with("#EXT-X-STREAM-INF:") {
            LineType::ExtXStreamInf
        } else if line.starts_with("#EXT-X-MEDIA:") {
            LineType::ExtXMedia
        } else if line.starts_with("#EXT-X-MEDIA-SEQUENCE:") {
            LineType::ExtXMediaSequence
        } else if line.starts_with("#EXTINF:") {
            LineType::ExtInf
        } else if line == "#EXT-X-ENDLIST" {
            LineType::ExtXEndList
        } else if line.starts_with("#EXT-X-TARGETDURATION:") {
            LineType::ExtXTargetDuration
        } else if line.starts_with("#EXT-X-PLAYLIST-TYPE:") {
            LineType::ExtXPlaylistType
        } else if line.starts_with("#EXT") {
            LineType::UnknownExtTag
        } else {
            LineType::Comment
        }
    }
}

/// Consume the first line and check it is the `#EXTM3U` signature.
pub fn expect_signature<'a>(lines: &mut impl Iterator<Item = &'a str>) -> Result<()> {
    let first = lines
        .next()
        .ok_or_else(|| Error::UnexpectedEndOfInput("missing #EXTM3U signature".to_string()))?;
    if first.trim_end() != SIGNATURE {
        return Err(Error::InvalidSignature(first.to_string()));
    }
    Ok(())
}

/// Consume the URI line that must follow `tag`.
pub fn expect_uri<'a>(lines: &mut impl Iterator<Item = &'a str>, tag: &str) -> Result<String> {
    lines
        .next()
        .map(|line| line.trim().to_string())
        .ok_or_else(|| Error::UnexpectedEndOfInput(format!("missing URI after {tag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_extm3u() {
        assert_eq!(LineClassifier::classify("#EXTM3U"), LineType::ExtM3U);
    }

    #[test]
    fn test_classify_media_vs_media_sequence() {
        assert_eq!(
            LineClassifier::classify("#EXT-X-MEDIA:TYPE=AUDIO"),
            LineType::ExtXMedia
        );
        assert_eq!(
            LineClassifier::classify("#EXT-X-MEDIA-SEQUENCE:7"),
            LineType::ExtXMediaSequence
        );
    }

    #[test]
    fn test_classify_uri() {
        assert_eq!(
            LineClassifier::classify("https://example.com/playlist.m3u8"),
            LineType::Uri
        );
        assert_eq!(LineClassifier::classify("segment001.ts"), LineType::Uri);
    }

    #[test]
    fn test_classify_unknown_and_comment() {
        assert_eq!(
            LineClassifier::classify("#EXT-X-TWITCH-ELAPSED-SECS:0.000"),
            LineType::UnknownExtTag
        );
        assert_eq!(
            LineClassifier::classify("# This is a comment"),
            LineType::Comment
        );
        assert_eq!(LineClassifier::classify("  "), LineType::Empty);
    }

    #[test]
    fn test_value_strips_prefix() {
        assert_eq!(LineType::ExtInf.value("#EXTINF:11.5,title"), "11.5,title");
        assert_eq!(LineType::ExtXTargetDuration.value("#EXT-X-TARGETDURATION:15 "), "15");
        assert_eq!(LineType::Comment.value("# hi"), "");
    }

    #[test]
    fn test_expect_signature() {
        assert!(expect_signature(&mut "#EXTM3U\n".lines()).is_ok());
        assert!(matches!(
            expect_signature(&mut "#EXTM3U8\n".lines()),
            Err(Error::InvalidSignature(_))
        ));
        assert!(matches!(
            expect_signature(&mut "".lines()),
            Err(Error::UnexpectedEndOfInput(_))
        ));
    }

    #[test]
    fn test_expect_uri_consumes_next_line() {
        let mut lines = "a.ts \nb.ts".lines();
        assert_eq!(expect_uri(&mut lines, "#EXTINF").unwrap(), "a.ts");
        assert_eq!(expect_uri(&mut lines, "#EXTINF").unwrap(), "b.ts");
        assert!(matches!(
            expect_uri(&mut lines, "#EXTINF"),
            Err(Error::UnexpectedEndOfInput(_))
        ));
    }
}
