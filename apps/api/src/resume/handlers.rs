use std::io::ErrorKind;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::resume::{NewResume, Resume};
use crate::resume::upload::{extension_of, receive_resume};
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub resume: Resume,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn resume_not_found() -> AppError {
    AppError::NotFound("Resume not found".to_string())
}

/// Ids that don't parse can't name a stored résumé, so they are reported as not found.
fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| resume_not_found())
}

/// POST /api/resume/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    let upload = receive_resume(&mut multipart, &state.config.uploads_dir)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let new_resume = NewResume {
        filename: upload.filename,
        original_name: upload.original_name,
        path: upload.path.to_string_lossy().into_owned(),
        size: upload.size,
    };
    let resume = match state.storage.create_resume(new_resume).await {
        Ok(resume) => resume,
        Err(e) => {
            let _ = tokio::fs::remove_file(&upload.path).await;
            return Err(e.into());
        }
    };

    info!(
        "Stored resume {} ('{}', {} bytes)",
        resume.id, resume.original_name, resume.size
    );
    Ok(Json(UploadResponse {
        message: "Resume uploaded successfully",
        resume,
    }))
}

/// GET /api/resume/latest
pub async fn handle_latest(State(state): State<AppState>) -> Result<Json<Resume>, AppError> {
    state
        .storage
        .get_latest_resume()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No resume found".to_string()))
}

/// GET /api/resume/download/:id
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let resume = state
        .storage
        .get_resume(id)
        .await?
        .ok_or_else(resume_not_found)?;

    let bytes = match tokio::fs::read(&resume.path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Resume {id} is missing its file at {}", resume.path);
            return Err(AppError::NotFound("Resume file not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&resume.original_name).to_string()),
        (header::CONTENT_DISPOSITION, attachment_disposition(&resume.original_name)),
    ];
    Ok((headers, bytes).into_response())
}

/// GET /api/resumes
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.storage.get_all_resumes().await?))
}

/// DELETE /api/resume/:id
/// Removes the file first, then the record.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    let resume = state
        .storage
        .get_resume(id)
        .await?
        .ok_or_else(resume_not_found)?;

    match tokio::fs::remove_file(&resume.path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Resume {id} file already gone at {}", resume.path);
        }
        Err(e) => {
            error!("Failed to remove {}: {e}", resume.path);
            return Err(e.into());
        }
    }

    if !state.storage.delete_resume(id).await? {
        return Err(resume_not_found());
    }

    info!("Deleted resume {id}");
    Ok(Json(MessageResponse {
        message: "Resume deleted successfully",
    }))
}

fn content_type_for(name: &str) -> &'static str {
    match extension_of(name).map(str::to_ascii_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// `attachment` disposition carrying the client's filename: a quoted ASCII
/// fallback plus an RFC 5987 `filename*` for anything outside plain ASCII.
fn attachment_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect();

    if fallback == name {
        return format!("attachment; filename=\"{fallback}\"");
    }

    let mut encoded = String::new();
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'!' | b'#' | b'$' | b'&' | b'+' | b'-'
            | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
