//! Safe resolution of untrusted document names.
//!
//! A requested name comes straight from an HTTP path segment. Before anything
//! touches the disk it goes through two independent checks:
//!
//! 1. Syntax: names containing `..`, a path separator or a NUL byte are
//!    rejected outright.
//! 2. Containment: the joined path is normalized lexically and must be a
//!    strict descendant of the base directory, compared component by
//!    component.
//!
//! Resolution is pure. It never reads the filesystem, so a symlink inside the
//! base directory is not detected here; [`DocumentStore`](super::DocumentStore)
//! canonicalizes before reading.

use std::borrow::Cow;
use std::io;
use std::path::{Component, Path, PathBuf};

use mdocs_protocol::DOC_EXTENSION;
use thiserror::Error;

/// Reasons a requested document name is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The name looks like a traversal attempt or is otherwise malformed.
    #[error("invalid document name: {0:?}")]
    InvalidName(String),

    /// The resolved path lies outside the base directory.
    #[error("path escapes the docs directory: {0}")]
    AccessDenied(PathBuf),
}

/// Resolves untrusted names against a fixed base directory.
#[derive(Debug, Clone)]
pub struct DocumentResolver {
    /// Absolute, normalized base directory.
    base_dir: PathBuf,
}

impl DocumentResolver {
    /// Create a resolver rooted at `base_dir`.
    ///
    /// Relative paths are made absolute against the current working
    /// directory, then normalized.
    pub fn new(base_dir: impl AsRef<Path>) -> io::Result<Self> {
        let absolute = std::path::absolute(base_dir.as_ref())?;
        Ok(Self {
            base_dir: normalize(&absolute),
        })
    }

    /// The absolute, normalized base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve `requested_name` to a path inside the base directory.
    pub fn resolve(&self, requested_name: &str) -> Result<PathBuf, ResolveError> {
        resolve_normalized(&self.base_dir, requested_name)
    }
}

/// Resolve `requested_name` against an absolute `base_dir`.
///
/// Appends the document extension when missing, rejects traversal syntax with
/// [`ResolveError::InvalidName`] and anything that normalizes outside
/// `base_dir` with [`ResolveError::AccessDenied`].
pub fn resolve(base_dir: &Path, requested_name: &str) -> Result<PathBuf, ResolveError> {
    resolve_normalized(&normalize(base_dir), requested_name)
}

fn resolve_normalized(base_dir: &Path, requested_name: &str) -> Result<PathBuf, ResolveError> {
    let name = with_extension(requested_name);

    if has_traversal_syntax(&name) {
        return Err(ResolveError::InvalidName(requested_name.to_string()));
    }

    let candidate = normalize(&base_dir.join(name.as_ref()));
    if !is_contained(base_dir, &candidate) {
        return Err(ResolveError::AccessDenied(candidate));
    }

    Ok(candidate)
}

/// Append the document extension unless the name already ends with it.
pub fn with_extension(requested_name: &str) -> Cow<'_, str> {
    if requested_name.ends_with(DOC_EXTENSION) {
        Cow::Borrowed(requested_name)
    } else {
        Cow::Owned(format!("{requested_name}{DOC_EXTENSION}"))
    }
}

fn has_traversal_syntax(name: &str) -> bool {
    name.contains("..") || name.contains(['/', '\\', '\0'])
}

/// True when `candidate` is a strict descendant of `base_dir`.
///
/// `Path::starts_with` compares whole components, so `/docs-other/x` is not
/// inside `/docs`.
pub(crate) fn is_contained(base_dir: &Path, candidate: &Path) -> bool {
    candidate != base_dir && candidate.starts_with(base_dir)
}

/// Lexically normalize a path: drop `.` segments, fold `..` into the
/// preceding segment and collapse redundant separators.
///
/// `..` at the root stays at the root; leading `..` on a relative path is
/// preserved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }

    out
}
