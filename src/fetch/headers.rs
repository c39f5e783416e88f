use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Codec for the textual forms extra request headers arrive in.
pub struct HeaderCodec;

impl HeaderCodec {
    /// Decode headers from a JSON object of name/value strings.
    pub fn decode_json(encoded: &str) -> Result<HashMap<String, String>> {
        serde_json::from_str(encoded).map_err(|e| Error::InvalidHeader(e.to_string()))
    }

    /// Parse a single `Name: value` header line.
    pub fn parse_line(line: &str) -> Result<(String, String)> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeader(line.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidHeader(line.to_string()));
        }
        Ok((name.to_string(), value.trim().to_string()))
    }

    /// Convert to a header map, validating names and values.
    pub fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}
