use std::{future::Future, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::{
    entities::media::StoredObject,
    errors::StorageError,
    repositories::media::MediaStore,
    settings::AppConfig,
};

const LIST_PAGE_SIZE: usize = 1000;
const FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

/// Bucket client for a Supabase-compatible storage REST API.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    bucket: String,
    service_key: Zeroizing<String>,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    size: Option<u64>,
    mimetype: Option<String>,
}

impl ListedObject {
    /// Folders come back without an id and are skipped.
    fn into_stored(self) -> Option<StoredObject> {
        if self.id.is_none() || self.name == FOLDER_PLACEHOLDER {
            return None;
        }
        let (size, mime_type) = match self.metadata {
            Some(meta) => (meta.size.unwrap_or(0), meta.mimetype),
            None => (0, None),
        };
        Some(StoredObject {
            name: self.name,
            size,
            mime_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SupabaseStorage {
    pub fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.storage_timeout_secs))
            .build()
            .map_err(StorageError::from)?;

        Ok(SupabaseStorage {
            client,
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            bucket: config.storage_bucket.clone(),
            service_key: Zeroizing::new(config.storage_service_key.clone()),
        })
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, urlencoding::encode(name))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.service_key.as_str())
            .header("apikey", self.service_key.as_str())
    }
}

fn list_request(offset: usize, limit: usize) -> serde_json::Value {
    serde_json::json!({
        "prefix": "",
        "limit": limit,
        "offset": offset,
        "sortBy": { "column": "created_at", "order": "desc" }
    })
}

/// Pulls pages until one comes back short of `page_size`.
async fn collect_pages<F, Fut>(page_size: usize, mut fetch: F) -> Result<Vec<StoredObject>, StorageError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<ListedObject>, StorageError>>,
{
    let mut objects = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset).await?;
        let fetched = page.len();
        objects.extend(page.into_iter().filter_map(ListedObject::into_stored));

        if fetched < page_size {
            return Ok(objects);
        }
        offset += fetched;
    }
}

async fn check_status(response: Response, name: Option<&str>) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StorageError::NotFound(name.unwrap_or_default().to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Status { status: status.as_u16(), body })
}

#[async_trait]
impl MediaStore for SupabaseStorage {
    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
        let url = format!("{}/object/list/{}", self.base_url, self.bucket);

        let objects = collect_pages(LIST_PAGE_SIZE, |offset| {
            let request = self
                .authorized(self.client.post(&url))
                .json(&list_request(offset, LIST_PAGE_SIZE));
            async move {
                let response = request.send().await?;
                let page: Vec<ListedObject> = check_status(response, None).await?.json().await?;
                Ok(page)
            }
        })
        .await?;

        tracing::debug!(count = objects.len(), bucket = %self.bucket, "Listed media objects");
        Ok(objects)
    }

    async fn upload_object(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let response = self
            .authorized(self.client.post(self.object_url(name)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        check_status(response, Some(name)).await?;
        tracing::info!(object = name, bucket = %self.bucket, "Uploaded media object");
        Ok(())
    }

    async fn remove_object(&self, name: &str) -> Result<(), StorageError> {
        let url = format!("{}/object/{}", self.base_url, self.bucket);
        let response = self
            .authorized(self.client.delete(url))
            .json(&serde_json::json!({ "prefixes": [name] }))
            .send()
            .await?;

        let removed: Vec<serde_json::Value> = check_status(response, Some(name)).await?.json().await?;
        if removed.is_empty() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        tracing::info!(object = name, bucket = %self.bucket, "Removed media object");
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, urlencoding::encode(name))
    }
}
