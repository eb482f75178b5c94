//! The request that creates or replaces a watch.

use tracing::{debug, trace};
use watcher_buffers::{StreamInput, StreamOutput};

use crate::media_type::MediaType;
use crate::source::{WatchSourceBuilder, WatchSourceError};
use crate::transport::{ActionRequest, TaskId, TransportError, Writeable};
use crate::validation::ValidationErrors;
use crate::versions;

/// A watch id is valid when it is non-empty and has no whitespace.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(char::is_whitespace)
}

/// Creates or replaces the watch named `id` with the body in `source`.
///
/// The id becomes the identifier of the stored watch document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutWatchRequest {
    parent_task: TaskId,
    id: Option<String>,
    source: Option<Vec<u8>>,
    active: bool,
    media_type: Option<MediaType>,
    version: i64,
}

impl Default for PutWatchRequest {
    fn default() -> Self {
        Self {
            parent_task: TaskId::EMPTY,
            id: None,
            source: None,
            active: true,
            media_type: Some(MediaType::Json),
            version: versions::MATCH_ANY,
        }
    }
}

impl PutWatchRequest {
    /// Creates an active request that accepts any stored version.
    pub fn new(id: impl Into<String>, source: impl Into<Vec<u8>>, media_type: MediaType) -> Self {
        Self {
            id: Some(id.into()),
            source: Some(source.into()),
            media_type: Some(media_type),
            ..Self::default()
        }
    }

    /// Reads a request positioned at the transport header.
    pub fn read(input: &mut StreamInput<'_>) -> Result<Self, TransportError> {
        let parent_task = TaskId::read(input)?;
        let id = input.read_string()?.to_string();
        let source = input.read_bytes_reference()?.to_vec();
        let active = input.read_boolean()?;
        let media_type = input.read_enum::<MediaType>()?;
        let version = input.read_zlong()?;
        trace!(%id, %media_type, len = source.len(), "read put watch request");
        Ok(Self {
            parent_task,
            id: Some(id),
            source: Some(source),
            active,
            media_type: Some(media_type),
            version,
        })
    }

    /// Decodes a request that must span `bytes` exactly.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransportError> {
        let mut input = StreamInput::new(bytes);
        let request = Self::read(&mut input)?;
        input.expect_end()?;
        Ok(request)
    }

    /// Name of the watch; becomes the stored document id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Sets or clears the watch name.
    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// The watch body, encoded per [`PutWatchRequest::media_type`].
    pub fn source(&self) -> Option<&[u8]> {
        self.source.as_deref()
    }

    /// Installs a body together with the media type it is encoded in.
    pub fn set_source(&mut self, source: Option<Vec<u8>>, media_type: Option<MediaType>) {
        self.source = source;
        self.media_type = media_type;
    }

    /// Installs the JSON rendering of `builder` as the body.
    pub fn set_source_builder(
        &mut self,
        builder: &WatchSourceBuilder,
    ) -> Result<(), WatchSourceError> {
        let bytes = builder.build_as_bytes(MediaType::Json)?;
        self.set_source(Some(bytes), Some(MediaType::Json));
        Ok(())
    }

    /// Encoding of the body; `None` only when cleared through `set_source`.
    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type
    }

    /// Initial state of the watch; defaults to active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the initial active state of the watch.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Expected stored version, [`versions::MATCH_ANY`] by default.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Sets the expected stored version.
    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    /// Sets the task this request was spawned by.
    pub fn set_parent_task(&mut self, parent_task: TaskId) {
        self.parent_task = parent_task;
    }
}

impl Writeable for PutWatchRequest {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), TransportError> {
        let id = self.id.as_deref().ok_or(TransportError::MissingField("id"))?;
        let source = self
            .source
            .as_deref()
            .ok_or(TransportError::MissingField("source"))?;
        let media_type = self
            .media_type
            .ok_or(TransportError::MissingField("media_type"))?;

        self.parent_task.write_to(out)?;
        out.write_string(id)?;
        out.write_bytes_reference(source)?;
        out.write_boolean(self.active);
        out.write_enum(media_type);
        out.write_zlong(self.version);
        trace!(%id, %media_type, len = source.len(), "wrote put watch request");
        Ok(())
    }
}

impl ActionRequest for PutWatchRequest {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match self.id.as_deref() {
            None => errors.add("watch id is missing"),
            Some(id) if !is_valid_id(id) => errors.add("watch id contains whitespace"),
            Some(_) => {}
        }
        if self.source.is_none() {
            errors.add("watch source is missing");
        }
        if self.media_type.is_none() {
            errors.add("request body is missing");
        }
        errors
    }

    fn parent_task(&self) -> &TaskId {
        &self.parent_task
    }

    fn read_from(&mut self, _input: &mut StreamInput<'_>) -> Result<(), TransportError> {
        debug!("refusing in-place read of put watch request");
        Err(TransportError::Unsupported(
            "usage of Streamable is to be replaced by Writeable",
        ))
    }
}
