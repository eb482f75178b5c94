//! Core logic behind the `put-watch-pack` and `put-watch-unpack` binaries.
//!
//! Both speak a JSON request descriptor:
//!
//! ```json
//! {"id": "my_watch", "body": {"trigger": {}}, "media_type": "yaml",
//!  "active": false, "version": 42, "parent_task": "node-1:7"}
//! ```
//!
//! Only `id` and `body` are needed; the rest take the request defaults. The
//! body is given as JSON and stored in the wire request encoded per
//! `media_type`, which takes a short name (`yaml`) or a MIME type
//! (`application/yaml`).
//!
//! A body that cannot be shown as JSON travels as `body_bytes`, the raw
//! source bytes. Unpack emits it for empty sources, SMILE bodies and bodies
//! that fail to decode; pack writes it to the wire unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::media_type::MediaType;
use crate::put_watch::PutWatchRequest;
use crate::source::{decode_body, encode_body, WatchSourceError};
use crate::transport::{ActionRequest, ParseTaskIdError, TaskId, TransportError, Writeable};
use crate::validation::ValidationErrors;
use crate::versions;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid request descriptor: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Source(#[from] WatchSourceError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    TaskId(#[from] ParseTaskIdError),
    #[error("invalid request descriptor: body and body_bytes are mutually exclusive")]
    ConflictingBody,
}

// ── Descriptor ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_bytes: Option<Vec<u8>>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_version")]
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task: Option<String>,
}

fn default_active() -> bool {
    true
}

fn default_version() -> i64 {
    versions::MATCH_ANY
}

impl RequestDescriptor {
    /// Builds the wire request, encoding `body` per `media_type` or taking
    /// `body_bytes` as is.
    pub fn to_request(&self) -> Result<PutWatchRequest, CliError> {
        let source = match (&self.body, &self.body_bytes) {
            (Some(_), Some(_)) => return Err(CliError::ConflictingBody),
            (Some(body), None) => Some(encode_body(body, self.media_type)?),
            (None, Some(bytes)) => Some(bytes.clone()),
            (None, None) => None,
        };
        let mut request = PutWatchRequest::default();
        request.set_id(self.id.clone());
        request.set_source(source, Some(self.media_type));
        request.set_active(self.active);
        request.set_version(self.version);
        if let Some(task) = &self.parent_task {
            request.set_parent_task(task.parse::<TaskId>()?);
        }
        Ok(request)
    }

    /// Describes a received request, decoding its body back to JSON where
    /// possible and keeping the raw bytes otherwise.
    pub fn from_request(request: &PutWatchRequest) -> Self {
        let media_type = request.media_type().unwrap_or_default();
        let (body, body_bytes) = match request.source() {
            None => (None, None),
            Some([]) => (None, Some(Vec::new())),
            Some(bytes) => match decode_body(bytes, media_type) {
                Ok(body) => (Some(body), None),
                Err(e) => {
                    debug!(
                        content_type = media_type.mime_type(),
                        len = bytes.len(),
                        "keeping raw body: {e}"
                    );
                    (None, Some(bytes.to_vec()))
                }
            },
        };
        let parent_task = request.parent_task();
        Self {
            id: request.id().map(str::to_string),
            body,
            body_bytes,
            media_type,
            active: request.is_active(),
            version: request.version(),
            parent_task: parent_task.is_set().then(|| parent_task.to_string()),
        }
    }
}

// ── put-watch-pack ────────────────────────────────────────────────────────

/// Encodes a JSON request descriptor into wire bytes.
///
/// The request is validated first unless `skip_validation` is set.
pub fn pack(json: &str, skip_validation: bool) -> Result<Vec<u8>, CliError> {
    let descriptor: RequestDescriptor = serde_json::from_str(json)?;
    let request = descriptor.to_request()?;
    if !skip_validation {
        request.validate().into_result()?;
    }
    let bytes = request.to_bytes()?;
    debug!(len = bytes.len(), "packed put watch request");
    Ok(bytes)
}

// ── put-watch-unpack ──────────────────────────────────────────────────────

/// Decodes wire bytes into a JSON request descriptor.
pub fn unpack(bytes: &[u8], pretty: bool) -> Result<String, CliError> {
    let request = PutWatchRequest::from_bytes(bytes)?;
    let descriptor = RequestDescriptor::from_request(&request);
    let json = if pretty {
        serde_json::to_string_pretty(&descriptor)?
    } else {
        serde_json::to_string(&descriptor)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_defaults() {
        let descriptor: RequestDescriptor =
            serde_json::from_str(r#"{"id": "w", "body": {}}"#).unwrap();
        assert_eq!(descriptor.media_type, MediaType::Json);
        assert!(descriptor.active);
        assert_eq!(descriptor.version, versions::MATCH_ANY);
        assert_eq!(descriptor.parent_task, None);
        assert_eq!(descriptor.body_bytes, None);
    }

    #[test]
    fn descriptor_accepts_content_type() {
        let descriptor: RequestDescriptor = serde_json::from_str(
            r#"{"id": "w", "body": {}, "media_type": "application/cbor; charset=UTF-8"}"#,
        )
        .unwrap();
        assert_eq!(descriptor.media_type, MediaType::Cbor);

        let err = pack(r#"{"id": "w", "body": {}, "media_type": "text/xml"}"#, false).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
        assert!(err.to_string().contains("unknown media type [text/xml]"));
    }

    #[test]
    fn pack_rejects_both_body_forms() {
        let err = pack(r#"{"id": "w", "body": {}, "body_bytes": [1]}"#, false).unwrap_err();
        assert!(matches!(err, CliError::ConflictingBody));
    }

    #[test]
    fn pack_rejects_invalid_request() {
        let err = pack(r#"{"id": "my watch", "body": {}}"#, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation Failed: 1: watch id contains whitespace;"
        );
    }

    #[test]
    fn pack_skip_validation_still_needs_wire_fields() {
        let bytes = pack(r#"{"id": "my watch", "body": {}}"#, true).unwrap();
        let request = PutWatchRequest::from_bytes(&bytes).unwrap();
        assert_eq!(request.id(), Some("my watch"));

        let err = pack(r#"{"body": {}}"#, true).unwrap_err();
        assert!(matches!(
            err,
            CliError::Transport(TransportError::MissingField("id"))
        ));
    }

    #[test]
    fn pack_bad_parent_task() {
        let err = pack(r#"{"id": "w", "body": {}, "parent_task": "nope"}"#, false).unwrap_err();
        assert!(matches!(err, CliError::TaskId(_)));
    }

    #[test]
    fn unpack_garbage() {
        let err = unpack(&[0x00, 0x05, b'a'], false).unwrap_err();
        assert!(matches!(err, CliError::Transport(TransportError::Stream(_))));
    }
}
