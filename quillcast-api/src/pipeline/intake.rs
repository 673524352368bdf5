//! Multipart upload intake.
//!
//! Splits a multipart request into metadata fields and file parts. Text
//! parts collect into a JSON object the route layer deserializes into its
//! request DTO (a `data` part containing a JSON object is merged in, for
//! clients that send their metadata as one blob). File parts keep the first
//! file per field name and are checked against the upload allowlist.
//!
//! Absent file fields are not an error: [`store_optional`] turns a missing
//! file into `None` so the caller can thread the option through the rest of
//! the pipeline.

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::clients::storage::{object_key, ObjectStorage};
use crate::error::ApiError;

/// Mime types admitted by the upload filter.
const ALLOWED_MIME_TYPES: [&str; 10] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "video/mp4",
    "audio/mpeg",
    "video/x-matroska",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// One uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as sent by the client
    pub file_name: String,

    /// Declared mime type
    pub content_type: String,

    /// File contents
    pub bytes: Bytes,
}

/// A parsed multipart request: metadata fields plus file parts keyed by
/// field name.
#[derive(Debug, Default)]
pub struct MultipartIntake {
    pub fields: Map<String, Value>,
    pub files: HashMap<String, UploadedFile>,
}

impl MultipartIntake {
    /// Removes and returns the file uploaded under `field`, if any.
    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        self.files.remove(field)
    }

    /// Deserializes the collected metadata fields into a request DTO.
    pub fn parse_fields<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
    }
}

/// Reads every part of a multipart request into a [`MultipartIntake`].
///
/// # Errors
///
/// Returns 400 for malformed multipart data or a file whose mime type is
/// not on the allowlist.
pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartIntake, ApiError> {
    let mut intake = MultipartIntake::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name() {
            let file_name = file_name.to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();

            if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
                return Err(ApiError::BadRequest("File type not allowed".to_string()));
            }

            let bytes = field.bytes().await?;

            // One file per field; later duplicates are ignored.
            intake.files.entry(name).or_insert(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let text = field.text().await?;

            if name == "data" {
                // Metadata sent as one JSON blob.
                let parsed: Value = serde_json::from_str(&text)
                    .map_err(|e| ApiError::BadRequest(format!("Invalid data field: {e}")))?;
                match parsed {
                    Value::Object(object) => intake.fields.extend(object),
                    _ => {
                        return Err(ApiError::BadRequest(
                            "data field must be a JSON object".to_string(),
                        ))
                    }
                }
            } else {
                intake.fields.insert(name, Value::String(text));
            }
        }
    }

    Ok(intake)
}

/// Uploads `file` into the `folder` namespace and returns its URL.
pub async fn store_upload(
    storage: &dyn ObjectStorage,
    file: &UploadedFile,
    folder: &str,
) -> Result<String, ApiError> {
    let key = object_key(folder, &file.file_name, Utc::now().timestamp_millis());
    let url = storage
        .store(&key, &file.content_type, file.bytes.clone())
        .await?;
    Ok(url)
}

/// Uploads an optional file; an absent file yields `None` rather than an
/// error.
pub async fn store_optional(
    storage: &dyn ObjectStorage,
    file: Option<&UploadedFile>,
    folder: &str,
) -> Result<Option<String>, ApiError> {
    match file {
        Some(file) => Ok(Some(store_upload(storage, file, folder).await?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::storage::MemoryStorage;

    fn pdf_file() -> UploadedFile {
        UploadedFile {
            file_name: "draft.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    #[tokio::test]
    async fn absent_file_yields_none() {
        let storage = MemoryStorage::new();
        let url = store_optional(&storage, None, "documentUrl").await.unwrap();
        assert!(url.is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn present_file_is_stored_under_its_field_namespace() {
        let storage = MemoryStorage::new();
        let file = pdf_file();

        let url = store_optional(&storage, Some(&file), "documentUrl")
            .await
            .unwrap()
            .unwrap();

        assert!(url.starts_with("memory://courses/class/documentUrl/"));
        assert!(url.ends_with("_draft.pdf"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn fields_deserialize_into_a_dto() {
        #[derive(serde::Deserialize)]
        struct Dto {
            title: String,
        }

        let mut intake = MultipartIntake::default();
        intake
            .fields
            .insert("title".to_string(), Value::String("Tides".to_string()));

        let dto: Dto = intake.parse_fields().unwrap();
        assert_eq!(dto.title, "Tides");
    }

    #[test]
    fn missing_required_field_is_a_bad_request() {
        #[derive(serde::Deserialize)]
        struct Dto {
            #[allow(dead_code)]
            title: String,
        }

        let intake = MultipartIntake::default();
        let result = intake.parse_fields::<Dto>();
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
