//! Document listing and loading.
//!
//! The store owns the resolver and the renderer. Every call re-reads the
//! filesystem; nothing is cached between requests.

use std::io;
use std::path::{Path, PathBuf};

use mdocs_protocol::{is_document_filename, DocumentContent, DocumentDescriptor};
use thiserror::Error;
use tokio::fs;

use super::render::{MarkdownRenderer, Renderer};
use super::resolver::{is_contained, with_extension, DocumentResolver, ResolveError};

/// Errors that can occur while listing or loading documents.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The requested name was refused by the resolver.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The document does not exist or is not a regular file.
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    /// Any other filesystem failure.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl DocsError {
    fn io(path: &Path, source: io::Error) -> Self {
        DocsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn from_read(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            DocsError::NotFound(path.to_path_buf())
        } else {
            DocsError::io(path, source)
        }
    }
}

/// Lists, resolves, reads and renders documents from one directory.
pub struct DocumentStore {
    resolver: DocumentResolver,
    renderer: Box<dyn Renderer>,
}

impl DocumentStore {
    /// Create a store over `docs_dir` with the default Markdown renderer.
    pub fn new(docs_dir: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_renderer(docs_dir, MarkdownRenderer::new())
    }

    /// Create a store over `docs_dir` with a custom renderer.
    pub fn with_renderer(
        docs_dir: impl AsRef<Path>,
        renderer: impl Renderer + 'static,
    ) -> io::Result<Self> {
        Ok(Self {
            resolver: DocumentResolver::new(docs_dir)?,
            renderer: Box::new(renderer),
        })
    }

    /// Absolute path of the docs directory.
    pub fn docs_dir(&self) -> &Path {
        self.resolver.base_dir()
    }

    /// List every document in the docs directory, sorted by filename.
    ///
    /// Only `*.md` entries are listed. Directories, dot-files and names that
    /// are not valid UTF-8 are skipped.
    pub async fn list(&self) -> Result<Vec<DocumentDescriptor>, DocsError> {
        let dir = self.docs_dir();
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| DocsError::io(dir, e))?;

        let mut docs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DocsError::io(dir, e))?
        {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::debug!("Skipping non UTF-8 entry {:?}", raw);
                    continue;
                }
            };

            let descriptor = match DocumentDescriptor::parse(name) {
                Ok(descriptor) => descriptor,
                Err(_) => continue,
            };

            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", descriptor.filename, e);
                    continue;
                }
            }

            docs.push(descriptor);
        }

        docs.sort_by(|a, b| a.filename.cmp(&b.filename));
        tracing::debug!("Listed {} documents in {:?}", docs.len(), dir);

        Ok(docs)
    }

    /// Resolve and read the raw Markdown of a document.
    ///
    /// Returns the filename (with extension) and the text. After lexical
    /// resolution the path is canonicalized, so a symlink that points out of
    /// the docs directory is refused with [`ResolveError::AccessDenied`].
    /// Hidden files are never listed, so they read as [`DocsError::NotFound`].
    pub async fn read(&self, requested_name: &str) -> Result<(String, String), DocsError> {
        let path = self.resolver.resolve(requested_name)?;
        let filename = with_extension(requested_name).into_owned();

        if !is_document_filename(&filename) {
            tracing::debug!("Refusing hidden document {:?}", path);
            return Err(DocsError::NotFound(path));
        }

        let real_path = fs::canonicalize(&path)
            .await
            .map_err(|e| DocsError::from_read(&path, e))?;
        let real_base = fs::canonicalize(self.docs_dir())
            .await
            .map_err(|e| DocsError::io(self.docs_dir(), e))?;

        if !is_contained(&real_base, &real_path) {
            tracing::warn!(
                "Refusing {:?}: resolves to {:?} outside {:?}",
                path,
                real_path,
                real_base
            );
            return Err(ResolveError::AccessDenied(path).into());
        }

        let metadata = fs::metadata(&real_path)
            .await
            .map_err(|e| DocsError::from_read(&path, e))?;
        if !metadata.is_file() {
            return Err(DocsError::NotFound(path));
        }

        let content = fs::read_to_string(&real_path)
            .await
            .map_err(|e| DocsError::from_read(&path, e))?;

        Ok((filename, content))
    }

    /// Resolve, read and render a document.
    pub async fn load(&self, requested_name: &str) -> Result<DocumentContent, DocsError> {
        let (filename, content) = self.read(requested_name).await?;
        let html = self.renderer.render(&content);

        tracing::debug!(
            "Rendered {} ({} bytes markdown, {} bytes html)",
            filename,
            content.len(),
            html.len()
        );

        Ok(DocumentContent {
            filename,
            content,
            html,
        })
    }
}
