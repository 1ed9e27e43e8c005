//! # mdocs Server Library
//!
//! Lists, resolves and renders a directory of Markdown documentation and
//! serves it as JSON over HTTP, next to a static single-page viewer.
//!
//! ## Overview
//!
//! - **Resolver**: turns an untrusted document name into a path strictly
//!   inside the docs directory, or a typed rejection
//! - **Store**: lists descriptors, reads documents (symlink-hardened) and
//!   renders them with `pulldown-cmark`
//! - **HTTP**: axum router mapping store results and errors onto responses
//! - **Config / Logging**: TOML + environment configuration, tracing setup
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                axum Router                   │
//! │  /api/docs   /api/docs/{filename}   static   │
//! ├──────────────────────────────────────────────┤
//! │               DocumentStore                  │
//! │   list()        load() ── canonicalize       │
//! ├──────────────────────┬───────────────────────┤
//! │  DocumentResolver    │   Renderer            │
//! │  (pure, lexical)     │   (pulldown-cmark)    │
//! └──────────────────────┴───────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//! use mdocs_server::docs::{resolve, ResolveError};
//!
//! let path = resolve(Path::new("/srv/docs"), "001-intro").unwrap();
//! assert_eq!(path, Path::new("/srv/docs/001-intro.md"));
//!
//! assert!(matches!(
//!     resolve(Path::new("/srv/docs"), "../etc/passwd"),
//!     Err(ResolveError::InvalidName(_))
//! ));
//! ```

pub mod config;
pub mod docs;
pub mod http;
pub mod logging;

pub use config::Config;
pub use docs::{DocsError, DocumentResolver, DocumentStore, MarkdownRenderer, Renderer, ResolveError};
pub use http::{router, AppState, SharedState};
