//! # mdocs Protocol Library
//!
//! Wire types shared by the mdocs server and its clients.
//!
//! ## Overview
//!
//! The documentation API speaks JSON over HTTP:
//!
//! - **Document Descriptor**: `{id, filename, title}` entries of the listing
//! - **Document Content**: `{filename, content, html}` for a single document
//! - **Error Body**: `{error}` for every failed request
//!
//! ## Example Usage
//!
//! ```rust
//! use mdocs_protocol::DocumentDescriptor;
//!
//! let doc = DocumentDescriptor::from_filename("001-intro.md");
//! assert_eq!(doc.id, "001-intro");
//! assert_eq!(doc.title, "intro");
//! assert!(doc.matches("INTRO"));
//! ```
//!
//! ## Modules
//!
//! - [`messages`]: Payload definitions and JSON helpers
//! - [`error`]: Error types

pub mod error;
pub mod messages;

pub use error::{ProtocolError, Result};
pub use messages::{
    from_json, is_document_filename, strip_extension, to_json_pretty, DocumentContent,
    DocumentDescriptor, ErrorBody, DOC_EXTENSION,
};
