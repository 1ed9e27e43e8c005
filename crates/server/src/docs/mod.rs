//! Document resolution, listing and rendering.
//!
//! This module provides:
//! - Safe resolution of untrusted document names against the docs directory
//! - Directory listing into document descriptors
//! - Reading and rendering of a single document
//!
//! # Security
//!
//! Names are validated twice: lexically by the resolver (traversal syntax and
//! normalized containment), then against the real filesystem by the store,
//! which canonicalizes the path so symlinks cannot escape the docs directory.

pub mod render;
pub mod resolver;
pub mod store;

pub use render::{MarkdownRenderer, Renderer};
pub use resolver::{normalize, resolve, DocumentResolver, ResolveError};
pub use store::{DocsError, DocumentStore};
