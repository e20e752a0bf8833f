//! Image uploads for product forms.

use std::future::Future;
use std::path::PathBuf;

use storefront_data::DataError;

use crate::error::CatalogError;

/// A file received from an admin form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Stores a file and returns the URL it will be served from.
pub trait BlobStore: Send + Sync {
    fn upload(&self, file: Upload) -> impl Future<Output = Result<String, CatalogError>> + Send;

    /// Remove a file previously returned by [`BlobStore::upload`].
    /// Unknown URLs are ignored.
    fn discard(&self, url: &str) -> impl Future<Output = Result<(), CatalogError>> + Send;
}

/// Writes uploads into a local directory served under `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl BlobStore for LocalBlobStore {
    async fn upload(&self, file: Upload) -> Result<String, CatalogError> {
        check_upload(&file)?;
        let name = format!("{}-{}", uuid::Uuid::new_v4().simple(), sanitize(&file.file_name));
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_failure)?;
        tokio::fs::write(self.dir.join(&name), &file.bytes)
            .await
            .map_err(io_failure)?;
        tracing::info!(file = %name, bytes = file.bytes.len(), "image stored");
        Ok(format!("{}/{name}", self.public_base_url))
    }

    async fn discard(&self, url: &str) -> Result<(), CatalogError> {
        let Some(name) = self.stored_name(url) else {
            return Ok(());
        };
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                tracing::info!(file = %name, "image discarded");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_failure(err)),
        }
    }
}

impl LocalBlobStore {
    /// File name behind a URL this store handed out, if it is one.
    fn stored_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url
            .strip_prefix(self.public_base_url.as_str())?
            .strip_prefix('/')?;
        let plain = !name.is_empty() && !name.starts_with('.') && sanitize(name) == name;
        plain.then_some(name)
    }
}

fn io_failure(err: std::io::Error) -> CatalogError {
    CatalogError::from_data("upload images", DataError::database(err))
}

/// Reject empty files and anything that does not claim to be an image.
pub fn check_upload(file: &Upload) -> Result<(), CatalogError> {
    if file.bytes.is_empty() {
        return Err(CatalogError::validation("file", "Uploaded file is empty"));
    }
    if !file.content_type.to_ascii_lowercase().starts_with("image/") {
        return Err(CatalogError::validation("file", "Only image uploads are allowed"));
    }
    Ok(())
}

/// Keep ASCII letters, digits, `.`, `_` and `-`; everything else becomes `-`.
fn sanitize(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
