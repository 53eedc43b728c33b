//! Image store - uploads listing photos and hands back stable URLs.
//!
//! Listings only ever hold the returned URLs; image bytes never pass through
//! the query or presentation code.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::listing::MAX_IMAGES;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image {0} is empty")]
    Empty(String),
    #[error("a listing takes between 1 and 6 images, got {0}")]
    Count(usize),
    #[error("image upload failed: {0}")]
    UploadFailed(String),
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the bytes and return a URL that stays valid for the image's lifetime.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ImageError>;
}

/// Upload a listing's images in order, returning their URLs in the same order.
pub async fn upload_all<I>(store: &I, files: Vec<(String, Vec<u8>)>) -> Result<Vec<String>, ImageError>
where
    I: ImageStore + ?Sized,
{
    if files.is_empty() || files.len() > MAX_IMAGES {
        return Err(ImageError::Count(files.len()));
    }

    let mut urls = Vec::with_capacity(files.len());
    for (file_name, bytes) in files {
        urls.push(store.upload(&file_name, bytes).await?);
    }
    Ok(urls)
}

/// In-memory image store. URLs look like `memory://images/<uuid>/<file name>`.
#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    images: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Result<Option<Vec<u8>>, ImageError> {
        let images = self
            .images
            .read()
            .map_err(|_| ImageError::UploadFailed("lock poisoned".into()))?;
        Ok(images.get(url).cloned())
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty(file_name.to_string()));
        }

        let url = format!("memory://images/{}/{}", Uuid::new_v4(), file_name);
        let mut images = self
            .images
            .write()
            .map_err(|_| ImageError::UploadFailed("lock poisoned".into()))?;
        images.insert(url.clone(), bytes);

        tracing::debug!(url = %url, "image uploaded");
        Ok(url)
    }
}
