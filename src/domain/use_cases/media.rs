use std::sync::Arc;

use crate::{
    entities::media::{
        object_extension, random_object_name, validate_object_name, MediaObject, UploadedMedia,
        FALLBACK_CONTENT_TYPE,
    },
    errors::AppError,
    repositories::media::MediaStore,
};

pub struct MediaHandler {
    pub store: Arc<dyn MediaStore>,
    pub max_upload_bytes: usize,
}

impl MediaHandler {
    pub fn new(store: Arc<dyn MediaStore>, max_upload_bytes: usize) -> Self {
        MediaHandler { store, max_upload_bytes }
    }

    pub async fn list_media(&self) -> Result<Vec<MediaObject>, AppError> {
        let objects = self.store.list_objects().await?;
        Ok(objects
            .into_iter()
            .map(|object| {
                let url = self.store.public_url(&object.name);
                MediaObject::new(object, url)
            })
            .collect())
    }

    /// Stores `bytes` under a fresh random name. The content type is sniffed
    /// from the bytes, not taken from the client.
    pub async fn upload_media(&self, original_name: Option<&str>, bytes: Vec<u8>) -> Result<UploadedMedia, AppError> {
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".into()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(self.max_upload_bytes));
        }

        let sniffed = infer::get(&bytes);
        let mime_type = sniffed
            .map(|kind| kind.mime_type())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let extension = object_extension(original_name, sniffed.map(|kind| kind.extension()));
        let name = random_object_name(&extension);
        let size = bytes.len() as u64;

        self.store.upload_object(&name, bytes, &mime_type).await?;
        tracing::info!(object = %name, size, mime_type = %mime_type, "Media uploaded");

        Ok(UploadedMedia {
            public_url: self.store.public_url(&name),
            name,
            size,
            mime_type,
        })
    }

    pub async fn delete_media(&self, name: &str, confirmed: bool) -> Result<(), AppError> {
        validate_object_name(name)?;
        if !confirmed {
            return Err(AppError::ConfirmationRequired("media object".into()));
        }
        self.store.remove_object(name).await?;
        Ok(())
    }

    pub fn public_url(&self, name: &str) -> Result<String, AppError> {
        validate_object_name(name)?;
        Ok(self.store.public_url(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::media::MockMediaStore;

    const PNG_HEADER: [u8; 16] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    ];

    #[actix_rt::test]
    async fn empty_upload_is_rejected() {
        let mut store = MockMediaStore::new();
        store.expect_upload_object().never();

        let handler = MediaHandler::new(Arc::new(store), 1024);
        assert!(matches!(handler.upload_media(Some("a.png"), vec![]).await, Err(AppError::InvalidInput(_))));
    }

    #[actix_rt::test]
    async fn oversized_upload_is_rejected() {
        let mut store = MockMediaStore::new();
        store.expect_upload_object().never();

        let handler = MediaHandler::new(Arc::new(store), 8);
        let err = handler.upload_media(Some("a.png"), PNG_HEADER.to_vec()).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(8)));
    }

    #[actix_rt::test]
    async fn sniffs_content_type_and_keeps_original_extension() {
        let mut store = MockMediaStore::new();
        store
            .expect_upload_object()
            .withf(|name, _, content_type| name.ends_with(".jpeg") && content_type == "image/png")
            .times(1)
            .returning(|_, _, _| Ok(()));
        store
            .expect_public_url()
            .returning(|name| format!("https://cdn.test/media/{}", name));

        let handler = MediaHandler::new(Arc::new(store), 1024);
        let uploaded = handler.upload_media(Some("photo.JPEG"), PNG_HEADER.to_vec()).await.unwrap();
        assert_eq!(uploaded.mime_type, "image/png");
        assert!(uploaded.public_url.ends_with(&uploaded.name));
        let fraction: f64 = uploaded.name.trim_end_matches(".jpeg").parse().unwrap();
        assert!((0.0..1.0).contains(&fraction));
    }

    #[actix_rt::test]
    async fn unknown_bytes_fall_back_to_octet_stream() {
        let mut store = MockMediaStore::new();
        store
            .expect_upload_object()
            .withf(|name, _, content_type| name.ends_with(".bin") && content_type == FALLBACK_CONTENT_TYPE)
            .returning(|_, _, _| Ok(()));
        store.expect_public_url().returning(|name| name.to_string());

        let handler = MediaHandler::new(Arc::new(store), 1024);
        assert!(handler.upload_media(None, b"plain words".to_vec()).await.is_ok());
    }

    #[actix_rt::test]
    async fn traversal_names_are_rejected() {
        let mut store = MockMediaStore::new();
        store.expect_remove_object().never();

        let handler = MediaHandler::new(Arc::new(store), 1024);
        assert!(handler.delete_media("../secrets", true).await.is_err());
    }
}
