//! Wire types for the documentation API.
//!
//! Every payload the server emits is one of the structures below, serialized
//! as JSON. Descriptors are derived purely from filenames; nothing here
//! touches the filesystem.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Extension every servable document carries.
pub const DOC_EXTENSION: &str = ".md";

// ============================================================================
// Listing
// ============================================================================

/// Lightweight metadata for one document, used to populate the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentDescriptor {
    /// Filename without its extension.
    pub id: String,
    /// Filename as it appears in the docs directory.
    pub filename: String,
    /// Human readable title.
    pub title: String,
}

impl DocumentDescriptor {
    /// Build a descriptor for a directory entry, refusing anything that is
    /// not a document.
    ///
    /// See [`is_document_filename`] for the rule.
    pub fn parse(filename: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        if !is_document_filename(&filename) {
            return Err(ProtocolError::NotADocument { filename });
        }
        Ok(Self::from_filename(filename))
    }

    /// Derive a descriptor from a filename.
    ///
    /// The title drops the extension and a leading numeric prefix such as
    /// `001-`, then replaces hyphens with spaces. If that leaves nothing, the
    /// id is used instead, and failing that the filename, so the title is
    /// never empty for a non-empty filename.
    pub fn from_filename(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let id = strip_extension(&filename).to_string();
        let title = derive_title(&id, &filename);

        Self {
            id,
            filename,
            title,
        }
    }

    /// Case-insensitive substring match on title or filename.
    ///
    /// An empty query matches every descriptor.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }

        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.filename.to_lowercase().contains(&query)
    }
}

/// True for visible `*.md` filenames.
///
/// Dot-files are hidden: they are neither listed nor served.
pub fn is_document_filename(filename: &str) -> bool {
    filename.ends_with(DOC_EXTENSION) && !filename.starts_with('.')
}

/// Strip the document extension if present.
pub fn strip_extension(filename: &str) -> &str {
    filename.strip_suffix(DOC_EXTENSION).unwrap_or(filename)
}

fn derive_title(id: &str, filename: &str) -> String {
    let title = strip_numeric_prefix(id).replace('-', " ");

    if !title.is_empty() {
        title
    } else if !id.is_empty() {
        id.to_string()
    } else {
        filename.to_string()
    }
}

/// Remove a leading `<digits>-` ordering prefix.
fn strip_numeric_prefix(name: &str) -> &str {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && name.as_bytes().get(digits) == Some(&b'-') {
        &name[digits + 1..]
    } else {
        name
    }
}

// ============================================================================
// Content
// ============================================================================

/// A single document: its Markdown source and the rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentContent {
    /// Filename including the extension.
    pub filename: String,
    /// Raw Markdown text.
    pub content: String,
    /// Rendered HTML.
    pub html: String,
}

// ============================================================================
// Errors
// ============================================================================

/// Generic body of every API error response.
///
/// Carries a fixed, human readable message only. Internal details stay in the
/// server log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorBody {
    /// Message shown to the client.
    pub error: String,
}

impl ErrorBody {
    /// Create an error body with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// ============================================================================
// Encoding helpers
// ============================================================================

/// Serialize a payload to pretty-printed JSON.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(ProtocolError::Encode)
}

/// Deserialize and shape-check a JSON payload.
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
}
