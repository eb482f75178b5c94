//! Content encodings a watch body may be written in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use watcher_buffers::WireEnum;

/// Encoding of a watch body.
///
/// The declaration order is the wire ordinal. Do not reorder.
///
/// Serializes as the short name; deserializes from a short name or a
/// `Content-Type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MediaType {
    #[default]
    Json,
    Smile,
    Yaml,
    Cbor,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Json,
        MediaType::Smile,
        MediaType::Yaml,
        MediaType::Cbor,
    ];

    /// Short format name, e.g. `json`.
    pub fn short_name(self) -> &'static str {
        match self {
            MediaType::Json => "json",
            MediaType::Smile => "smile",
            MediaType::Yaml => "yaml",
            MediaType::Cbor => "cbor",
        }
    }

    /// MIME type without parameters, e.g. `application/json`.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Smile => "application/smile",
            MediaType::Yaml => "application/yaml",
            MediaType::Cbor => "application/cbor",
        }
    }

    /// Looks up a media type by its short format name, ignoring case.
    pub fn from_format(format: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.short_name().eq_ignore_ascii_case(format.trim()))
    }

    /// Parses a `Content-Type` style value such as
    /// `application/json; charset=UTF-8`. Parameters are ignored.
    pub fn from_media_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|t| t.mime_type().eq_ignore_ascii_case(essence))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown media type [{0}]")]
pub struct ParseMediaTypeError(String);

impl FromStr for MediaType {
    type Err = ParseMediaTypeError;

    /// Accepts a short name (`yaml`) or a MIME type (`application/yaml`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_format(s)
            .or_else(|| Self::from_media_type(s))
            .ok_or_else(|| ParseMediaTypeError(s.to_string()))
    }
}

impl TryFrom<String> for MediaType {
    type Error = ParseMediaTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl WireEnum for MediaType {
    const NAME: &'static str = "MediaType";

    fn ordinal(self) -> u32 {
        self as u32
    }

    fn from_ordinal(ordinal: u32) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}
