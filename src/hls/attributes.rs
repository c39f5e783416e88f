use crate::{Error, Result};
use std::collections::HashMap;

/// Attribute list of a single tag line, e.g. the part after `#EXT-X-STREAM-INF:`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Attributes<'a> {
    /// Parse a comma-separated `KEY=VALUE` list.
    ///
    /// Commas inside double quotes do not split, and surrounding quotes are
    /// stripped from values. No other escaping exists in the format.
    pub fn parse(s: &'a str) -> Result<Self> {
        let mut values = HashMap::new();

        for token in split_unquoted(s) {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| Error::MalformedAttribute(token.to_string()))?;
            let key = key.trim();
            let value = value.trim();

            // A second '=' is only allowed inside a quoted string.
            if key.is_empty() || (!is_quoted(value) && value.contains('=')) {
                return Err(Error::MalformedAttribute(token.to_string()));
            }

            values.insert(key, value.trim_matches('"'));
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied()
    }

    /// `YES` is the only truthy enumerated value.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("YES")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('"') && value.ends_with('"')
}

fn split_unquoted(s: &str) -> Vec<&str> {
    let mut attrs = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                attrs.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() {
        attrs.push(s[start..].trim());
    }

    attrs.retain(|a| !a.is_empty());
    attrs
}
