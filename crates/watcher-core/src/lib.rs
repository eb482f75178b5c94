//! Put-watch transport request for the watcher subsystem.
//!
//! A [`PutWatchRequest`] carries the id and body of a watch from a client to
//! the node that stores it. It validates itself before dispatch and
//! round-trips through the binary stream codec of `watcher-buffers`.
//!
//! # Example
//!
//! ```
//! use watcher_core::{ActionRequest, MediaType, PutWatchRequest, Writeable};
//!
//! let request = PutWatchRequest::new("my_watch", br#"{"trigger":{}}"#.to_vec(), MediaType::Json);
//! assert!(request.validate().is_empty());
//!
//! let bytes = request.to_bytes().unwrap();
//! assert_eq!(PutWatchRequest::from_bytes(&bytes).unwrap(), request);
//! ```

pub mod cli;
pub mod media_type;
pub mod put_watch;
pub mod source;
pub mod transport;
pub mod validation;
pub mod versions;

pub use media_type::MediaType;
pub use put_watch::{is_valid_id, PutWatchRequest};
pub use source::{decode_body, encode_body, WatchSourceBuilder, WatchSourceError};
pub use transport::{ActionRequest, ParseTaskIdError, TaskId, TransportError, Writeable};
pub use validation::ValidationErrors;
