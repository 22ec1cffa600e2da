#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Opaque credential. Never written into a response body.
    #[serde(skip_serializing)]
    pub password: String,
}

/// Insert payload for `Storage::create_user`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn from_new(id: i32, new: NewUser) -> Self {
        User {
            id,
            username: new.username,
            password: new.password,
        }
    }
}
