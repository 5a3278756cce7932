use std::path::Path;

use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::errors::AppError;

pub const FALLBACK_EXTENSION: &str = "bin";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const MAX_OBJECT_NAME_LENGTH: usize = 255;

#[derive(Debug, MultipartForm)]
pub struct MediaUpload {
    #[multipart(limit = "64MB")]
    pub file: TempFile,
}

/// Object as reported by the bucket listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaObject {
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub public_url: String,
}

impl MediaObject {
    pub fn new(object: StoredObject, public_url: String) -> Self {
        MediaObject {
            name: object.name,
            size: object.size,
            mime_type: object.mime_type,
            created_at: object.created_at,
            updated_at: object.updated_at,
            public_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadedMedia {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub public_url: String,
}

/// Extension for a new object: the original file's (lower-cased), else the
/// sniffed one, else `bin`.
pub fn object_extension(original_name: Option<&str>, sniffed: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .or(sniffed)
        .unwrap_or(FALLBACK_EXTENSION)
        .to_ascii_lowercase()
}

/// `"{random fraction}.{ext}"`, e.g. `0.5738261949.png`.
pub fn random_object_name(extension: &str) -> String {
    let fraction: f64 = rand::thread_rng().gen_range(0.0..1.0);
    format!("{}.{}", fraction, extension)
}

pub fn validate_object_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("Object name cannot be empty".into()));
    }
    if name.len() > MAX_OBJECT_NAME_LENGTH {
        return Err(AppError::InvalidInput("Object name is too long".into()));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") || name.chars().any(|c| c.is_control()) {
        return Err(AppError::InvalidInput(format!("Invalid object name: {}", name)));
    }
    Ok(())
}
