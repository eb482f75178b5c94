//! Watch body assembly and body transcoding.
//!
//! The watch grammar itself (trigger schedules, inputs, conditions, actions)
//! belongs to the execution engine. Here each section is an opaque JSON
//! value; the builder only decides which sections exist and in what order
//! they are written.

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::media_type::MediaType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchSourceError {
    #[error("failed to build watch source. no trigger defined")]
    MissingTrigger,
    #[error("media type [{0}] is not supported for watch sources")]
    UnsupportedMediaType(MediaType),
    #[error("failed to encode watch source as {media_type}: {message}")]
    Encode {
        media_type: MediaType,
        message: String,
    },
    #[error("failed to decode watch source as {media_type}: {message}")]
    Decode {
        media_type: MediaType,
        message: String,
    },
}

/// Builds a watch body section by section.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use watcher_core::{MediaType, WatchSourceBuilder};
///
/// let source = WatchSourceBuilder::new()
///     .trigger(json!({"schedule": {"interval": "10s"}}))
///     .add_action("log", json!({"logging": {"text": "hi"}}));
/// let bytes = source.build_as_bytes(MediaType::Json).unwrap();
/// assert!(bytes.starts_with(br#"{"trigger":"#));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchSourceBuilder {
    #[serde(skip_serializing_if = "Option::is_none")]
    trigger: Option<Value>,
    input: Value,
    condition: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    transform: Option<Value>,
    #[serde(
        rename = "throttle_period_in_millis",
        skip_serializing_if = "Option::is_none"
    )]
    throttle_period_millis: Option<u64>,
    actions: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Map<String, Value>>,
}

impl Default for WatchSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchSourceBuilder {
    /// A builder with no trigger, the `none` input and the `always` condition.
    pub fn new() -> Self {
        Self {
            trigger: None,
            input: json!({"none": {}}),
            condition: json!({"always": {}}),
            transform: None,
            throttle_period_millis: None,
            actions: Map::new(),
            metadata: None,
        }
    }

    pub fn trigger(mut self, trigger: Value) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    pub fn condition(mut self, condition: Value) -> Self {
        self.condition = condition;
        self
    }

    pub fn transform(mut self, transform: Value) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn throttle_period_millis(mut self, millis: u64) -> Self {
        self.throttle_period_millis = Some(millis);
        self
    }

    /// Adds or replaces a named action. Actions keep insertion order.
    pub fn add_action(mut self, name: impl Into<String>, action: Value) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Serializes the body in the requested encoding.
    pub fn build_as_bytes(&self, media_type: MediaType) -> Result<Vec<u8>, WatchSourceError> {
        if self.trigger.is_none() {
            return Err(WatchSourceError::MissingTrigger);
        }
        let bytes = encode_body(self, media_type)?;
        debug!(%media_type, len = bytes.len(), actions = self.actions.len(), "built watch source");
        Ok(bytes)
    }
}

/// Encodes any serializable body in the given media type.
///
/// SMILE has no encoder here and is rejected.
pub fn encode_body<T>(body: &T, media_type: MediaType) -> Result<Vec<u8>, WatchSourceError>
where
    T: Serialize + ?Sized,
{
    let encode_err = |message: String| WatchSourceError::Encode {
        media_type,
        message,
    };
    match media_type {
        MediaType::Json => serde_json::to_vec(body).map_err(|e| encode_err(e.to_string())),
        MediaType::Yaml => serde_yaml::to_string(body)
            .map(String::into_bytes)
            .map_err(|e| encode_err(e.to_string())),
        MediaType::Cbor => {
            let mut out = Vec::new();
            ciborium::into_writer(body, &mut out).map_err(|e| encode_err(e.to_string()))?;
            Ok(out)
        }
        MediaType::Smile => Err(WatchSourceError::UnsupportedMediaType(media_type)),
    }
}

/// Decodes a body written in the given media type into a JSON value.
pub fn decode_body(bytes: &[u8], media_type: MediaType) -> Result<Value, WatchSourceError> {
    let decode_err = |message: String| WatchSourceError::Decode {
        media_type,
        message,
    };
    match media_type {
        MediaType::Json => serde_json::from_slice(bytes).map_err(|e| decode_err(e.to_string())),
        MediaType::Yaml => serde_yaml::from_slice(bytes).map_err(|e| decode_err(e.to_string())),
        MediaType::Cbor => ciborium::from_reader(bytes).map_err(|e| decode_err(e.to_string())),
        MediaType::Smile => Err(WatchSourceError::UnsupportedMediaType(media_type)),
    }
}
