use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored résumé file. `path` points at the bytes on disk under the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: i32,
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert payload for `Storage::create_resume`. The id and `uploaded_at` are assigned by storage.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub size: u64,
}

impl Resume {
    pub fn from_new(id: i32, uploaded_at: DateTime<Utc>, new: NewResume) -> Self {
        Resume {
            id,
            filename: new.filename,
            original_name: new.original_name,
            path: new.path,
            size: new.size,
            uploaded_at,
        }
    }
}
