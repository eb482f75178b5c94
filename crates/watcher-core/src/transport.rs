//! Transport-level request plumbing: the parent task header every request
//! carries, and the traits requests implement to reach the wire.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use watcher_buffers::{StreamError, StreamInput, StreamOutput};

use crate::validation::ValidationErrors;

/// Errors raised while moving a request to or from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("cannot serialize request: {0} is missing")]
    MissingField(&'static str),
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

/// Identifier of the task that spawned a request.
///
/// `TaskId::EMPTY` marks a request with no parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId {
    node_id: String,
    id: i64,
}

impl TaskId {
    pub const EMPTY: TaskId = TaskId {
        node_id: String::new(),
        id: -1,
    };

    /// Creates a task id. An empty `node_id` yields [`TaskId::EMPTY`]
    /// whatever `id` is, since the wire form drops the id of an unset task.
    pub fn new(node_id: impl Into<String>, id: i64) -> Self {
        let node_id = node_id.into();
        if node_id.is_empty() {
            return Self::EMPTY;
        }
        Self { node_id, id }
    }

    /// Node that owns the parent task; empty when unset.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Task number on its node; -1 when unset.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether a parent task is recorded.
    pub fn is_set(&self) -> bool {
        !self.node_id.is_empty()
    }

    /// Writes the node id, followed by the numeric id only when set.
    pub fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.node_id)?;
        if self.is_set() {
            out.write_i64(self.id);
        }
        Ok(())
    }

    /// Reads a task id written by [`TaskId::write_to`].
    pub fn read(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        let node_id = input.read_string()?;
        if node_id.is_empty() {
            return Ok(Self::EMPTY);
        }
        let id = input.read_i64()?;
        Ok(Self::new(node_id, id))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "{}:{}", self.node_id, self.id)
        } else {
            f.write_str("unset")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed task id [{0}], expecting node:id or unset")]
pub struct ParseTaskIdError(String);

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "unset" {
            return Ok(Self::EMPTY);
        }
        let (node_id, id) = s
            .rsplit_once(':')
            .ok_or_else(|| ParseTaskIdError(s.to_string()))?;
        if node_id.is_empty() {
            return Err(ParseTaskIdError(s.to_string()));
        }
        let id = id
            .parse::<i64>()
            .map_err(|_| ParseTaskIdError(s.to_string()))?;
        Ok(Self::new(node_id, id))
    }
}

/// A value with a binary wire form.
pub trait Writeable {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), TransportError>;

    /// Encodes `self` into a fresh buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, TransportError> {
        let mut out = StreamOutput::new();
        self.write_to(&mut out)?;
        Ok(out.flush())
    }
}

/// A request dispatched through the transport layer.
pub trait ActionRequest: Writeable {
    /// Problems that make the request unfit to send; empty when valid.
    fn validate(&self) -> ValidationErrors;

    /// Task that spawned this request, [`TaskId::EMPTY`] when none.
    fn parent_task(&self) -> &TaskId;

    /// Legacy in-place deserialization. Requests built from a stream through
    /// their constructor refuse it.
    fn read_from(&mut self, input: &mut StreamInput<'_>) -> Result<(), TransportError>;
}
