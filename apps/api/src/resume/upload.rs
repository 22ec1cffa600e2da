//! Résumé upload intake: pulls the single `resume` file out of a multipart body,
//! applies the extension allow-list and size cap, and writes it under the uploads directory.
//!
//! Nothing is written to disk until the whole body has been read and accepted.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Multipart field the file must be sent under.
pub const UPLOAD_FIELD: &str = "resume";

/// Largest accepted file, in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Request body cap for the upload route: the file limit plus room for multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// An accepted file that has been written to disk.
#[derive(Debug)]
pub struct StoredUpload {
    pub filename: String,
    pub original_name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Extension of `name` without the dot, as supplied by the client.
pub fn extension_of(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|ext| ext.to_str())
}

pub fn is_allowed_extension(name: &str) -> bool {
    extension_of(name)
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// `resume-<unix millis>-<random below 1e9>` plus the original extension.
pub fn generate_filename(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().as_u128() % 1_000_000_000;
    match extension_of(original_name) {
        Some(ext) => format!("{UPLOAD_FIELD}-{millis}-{suffix}.{ext}"),
        None => format!("{UPLOAD_FIELD}-{millis}-{suffix}"),
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "File exceeds the {} MB upload limit",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}

/// Reads the body and returns the accepted file, or `None` when no `resume` file was sent.
///
/// Non-file fields and fields under other names are skipped.
pub async fn receive_resume(
    multipart: &mut Multipart,
    uploads_dir: &Path,
) -> Result<Option<StoredUpload>, AppError> {
    let mut accepted: Option<(String, Bytes)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if accepted.is_some() {
            return Err(AppError::Validation(
                "Only one resume file may be uploaded per request".to_string(),
            ));
        }
        if !is_allowed_extension(&original_name) {
            warn!("Rejected upload '{original_name}': disallowed file type");
            return Err(AppError::Validation(
                "Only PDF, DOC, and DOCX files are allowed".to_string(),
            ));
        }

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                warn!("Rejected upload '{original_name}': exceeds size limit");
                return Err(too_large());
            }
            data.extend_from_slice(&chunk);
        }
        accepted = Some((original_name, data.freeze()));
    }

    let Some((original_name, data)) = accepted else {
        return Ok(None);
    };

    let filename = generate_filename(&original_name);
    let path = uploads_dir.join(&filename);
    if let Err(e) = tokio::fs::write(&path, &data).await {
        error!("Failed to write upload to {}: {e}", path.display());
        let _ = tokio::fs::remove_file(&path).await;
        return Err(AppError::Io(e));
    }

    Ok(Some(StoredUpload {
        filename,
        original_name,
        path,
        size: data.len() as u64,
    }))
}
