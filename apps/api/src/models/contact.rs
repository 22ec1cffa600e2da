use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Validated contact-form submission, ready for `Storage::create_contact`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl Contact {
    pub fn from_new(id: i32, created_at: DateTime<Utc>, new: NewContact) -> Self {
        Contact {
            id,
            name: new.name,
            email: new.email,
            subject: new.subject,
            message: new.message,
            created_at,
        }
    }
}
