use async_trait::async_trait;

use crate::{entities::media::StoredObject, errors::StorageError};

/// Flat object bucket; objects are addressed by name only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError>;
    async fn upload_object(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;
    async fn remove_object(&self, name: &str) -> Result<(), StorageError>;

    /// Pure string construction; performs no request.
    fn public_url(&self, name: &str) -> String;
}
