//! Multivariant ("master") playlist parsing.
//!
//! See RFC 8216 section 4.3.4 for the tags handled here.

use serde::Serialize;

use super::{
    attributes::Attributes,
    classifier::{expect_signature, expect_uri, LineClassifier, LineType},
};
use crate::{Error, Result};

/// Pixel resolution advertised by a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Parse the `WxH` form. Anything else is treated as absent.
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once('x')?;
        Some(Self {
            width: w.trim().parse().ok()?,
            height: h.trim().parse().ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlternativeType {
    Video,
    Audio,
}

impl AlternativeType {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "VIDEO" => Ok(Self::Video),
            "AUDIO" => Ok(Self::Audio),
            other => Err(Error::UnsupportedAlternativeType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "VIDEO",
            Self::Audio => "AUDIO",
        }
    }
}

/// A named rendition from an `#EXT-X-MEDIA` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternative {
    #[serde(rename = "type")]
    pub kind: AlternativeType,
    pub group_id: String,
    pub name: String,
    pub autoselect: bool,
    pub default: bool,
}

impl Alternative {
    fn from_attributes(attrs: &Attributes<'_>) -> Result<Self> {
        Ok(Self {
            kind: AlternativeType::parse(attrs.get("TYPE").unwrap_or(""))?,
            group_id: attrs.get("GROUP-ID").unwrap_or("").to_string(),
            name: attrs.get("NAME").unwrap_or("").to_string(),
            autoselect: attrs.flag("AUTOSELECT"),
            default: attrs.flag("DEFAULT"),
        })
    }
}

/// A variant stream from an `#EXT-X-STREAM-INF` tag and its URI line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub url: String,
    pub bandwidth: u64,
    pub codecs: Vec<String>,
    pub resolution: Option<Resolution>,
    pub video_group_id: Option<String>,
    pub audio_group_id: Option<String>,
    pub alternatives: Vec<Alternative>,
}

impl Variant {
    fn from_attributes(attrs: &Attributes<'_>) -> Result<Self> {
        let bandwidth = match attrs.get("BANDWIDTH") {
            Some(value) => value.parse().map_err(|_| Error::MalformedNumericField {
                field: "BANDWIDTH",
                value: value.to_string(),
            })?,
            None => 0,
        };

        let codecs = attrs
            .get("CODECS")
            .map(|c| {
                c.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            url: String::new(),
            bandwidth,
            codecs,
            resolution: attrs.get("RESOLUTION").and_then(Resolution::parse),
            video_group_id: attrs.get("VIDEO").map(String::from),
            audio_group_id: attrs.get("AUDIO").map(String::from),
            alternatives: Vec::new(),
        })
    }

    fn group_id(&self, kind: AlternativeType) -> Option<&str> {
        match kind {
            AlternativeType::Video => self.video_group_id.as_deref(),
            AlternativeType::Audio => self.audio_group_id.as_deref(),
        }
    }

    /// Whether one of the attached alternatives is called `name`.
    pub fn has_quality(&self, name: &str) -> bool {
        self.alternatives.iter().any(|a| a.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterPlaylist {
    pub variants: Vec<Variant>,
}

impl MasterPlaylist {
    /// Parse a multivariant playlist.
    ///
    /// Alternatives are attached after the scan to the first variant whose
    /// group id of the same type matches; alternatives matching no variant
    /// are dropped.
    pub fn parse(input: &str) -> Result<Self> {
        let mut lines = input.lines();
        expect_signature(&mut lines)?;

        let mut variants = Vec::new();
        let mut pending = Vec::new();

        while let Some(line) = lines.next() {
            let line_type = LineClassifier::classify(line);
            match line_type {
                LineType::ExtXStreamInf => {
                    let attrs = Attributes::parse(line_type.value(line))?;
                    let mut variant = Variant::from_attributes(&attrs)?;
                    variant.url = expect_uri(&mut lines, "#EXT-X-STREAM-INF")?;
                    variants.push(variant);
                }
                LineType::ExtXMedia => {
                    pending.push(Attributes::parse(line_type.value(line))?);
                }
                _ => {}
            }
        }

        let mut playlist = Self { variants };
        for attrs in &pending {
            let alternative = Alternative::from_attributes(attrs)?;
            playlist.attach(alternative);
        }

        tracing::debug!(
            variants = playlist.variants.len(),
            alternatives = pending.len(),
            "Parsed master playlist"
        );

        Ok(playlist)
    }

    fn attach(&mut self, alternative: Alternative) {
        let target = self
            .variants
            .iter_mut()
            .find(|v| v.group_id(alternative.kind) == Some(alternative.group_id.as_str()));

        match target {
            Some(variant) => variant.alternatives.push(alternative),
            None => tracing::debug!(
                kind = alternative.kind.as_str(),
                group_id = %alternative.group_id,
                name = %alternative.name,
                "Dropping alternative with no matching variant"
            ),
        }
    }

    /// Names of all attached alternatives, in declaration order.
    pub fn qualities(&self) -> Vec<&str> {
        self.variants
            .iter()
            .flat_map(|v| v.alternatives.iter().map(|a| a.name.as_str()))
            .collect()
    }

    /// First variant carrying an alternative named `name`.
    pub fn variant_by_quality(&self, name: &str) -> Result<&Variant> {
        self.variants
            .iter()
            .find(|v| v.has_quality(name))
            .ok_or_else(|| Error::QualityNotFound(name.to_string()))
    }

    /// Variant with the highest advertised bandwidth; the first one wins ties.
    pub fn best_variant(&self) -> Result<&Variant> {
        self.variants
            .iter()
            .reduce(|best, v| if v.bandwidth > best.bandwidth { v } else { best })
            .ok_or_else(|| Error::QualityNotFound("best".to_string()))
    }
}
