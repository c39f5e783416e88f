use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid playlist signature: expected #EXTM3U, got {0:?}")]
    InvalidSignature(String),

    #[error("Unexpected end of input: {0}")]
    UnexpectedEndOfInput(String),

    #[error("Malformed attribute: {0}")]
    MalformedAttribute(String),

    #[error("Malformed {field}: {value:?}")]
    MalformedNumericField { field: &'static str, value: String },

    #[error("Unsupported alternative type: {0}")]
    UnsupportedAlternativeType(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Timestamps are not a subset of the video (video duration is {total:?})")]
    RangeNotInVideo { total: Duration },

    #[error("Quality {0} not found")]
    QualityNotFound(String),

    #[error("Failed to fetch URL: {url} - {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Fetch timeout for URL: {0}")]
    FetchTimeout(String),

    #[error("Segment {segment} stream interrupted: {reason}")]
    StreamInterrupted { segment: usize, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSignature(_) => "INVALID_SIGNATURE",
            Self::UnexpectedEndOfInput(_) => "UNEXPECTED_END_OF_INPUT",
            Self::MalformedAttribute(_) => "MALFORMED_ATTRIBUTE",
            Self::MalformedNumericField { .. } => "MALFORMED_NUMERIC_FIELD",
            Self::UnsupportedAlternativeType(_) => "UNSUPPORTED_ALTERNATIVE_TYPE",
            Self::InvalidRange(_) => "INVALID_RANGE",
            Self::RangeNotInVideo { .. } => "RANGE_NOT_IN_VIDEO",
            Self::QualityNotFound(_) => "QUALITY_NOT_FOUND",
            Self::FetchFailed { .. } => "FETCH_FAILED",
            Self::FetchTimeout(_) => "FETCH_TIMEOUT",
            Self::StreamInterrupted { .. } => "STREAM_INTERRUPTED",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::InvalidHeader(_) => "INVALID_HEADER",
        }
    }

    /// Returns true for errors raised while reading playlist text.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature(_)
                | Self::UnexpectedEndOfInput(_)
                | Self::MalformedAttribute(_)
                | Self::MalformedNumericField { .. }
                | Self::UnsupportedAlternativeType(_)
        )
    }

    /// Recover an `Error` that was wrapped into an `std::io::Error` by the merger.
    pub fn from_io(err: &std::io::Error) -> Option<&Self> {
        err.get_ref().and_then(|inner| inner.downcast_ref::<Self>())
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        std::io::Error::other(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::FetchTimeout(e.url().map(|u| u.to_string()).unwrap_or_default())
        } else {
            Self::FetchFailed {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: e.to_string(),
            }
        }
    }
}
