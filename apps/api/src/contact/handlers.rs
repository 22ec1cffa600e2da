use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::contact::validation::{validate_contact, ContactRequest};
use crate::errors::AppError;
use crate::models::contact::Contact;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ContactResponse {
    pub message: &'static str,
    pub contact: Contact,
}

/// POST /api/contact
pub async fn handle_submit(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, AppError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected contact submission: {}", e.body_text());
        AppError::Validation(format!("Invalid contact data: {}", e.body_text()))
    })?;

    let new_contact = validate_contact(req).map_err(|errors| {
        let detail = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        warn!("Rejected contact submission: {detail}");
        AppError::Validation(format!("Invalid contact data: {detail}"))
    })?;

    let contact = state.storage.create_contact(new_contact).await?;
    info!("Recorded contact message {}", contact.id);

    Ok(Json(ContactResponse {
        message: "Message sent successfully",
        contact,
    }))
}

/// GET /api/contacts
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(state.storage.get_all_contacts().await?))
}
