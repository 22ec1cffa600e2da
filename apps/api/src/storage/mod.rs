//! Repository layer — the data-access seam between handlers and whatever holds the records.
//!
//! `AppState` carries an `Arc<dyn Storage>`. The only backend is `MemStorage`; a durable
//! backend implements the same trait without touching handler code.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::contact::{Contact, NewContact};
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{NewUser, User};

pub use memory::MemStorage;

// Neither variant is produced on a routed path yet: users have no HTTP surface
// and `MemStorage` has no backend failures.
#[allow(dead_code)]
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// Failure reported by a backing store. `MemStorage` never produces this.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait Storage: Send + Sync {
    #[allow(dead_code)]
    async fn get_user(&self, id: i32) -> Result<Option<User>, StorageError>;

    /// First user whose username matches exactly.
    #[allow(dead_code)]
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    /// Fails with `UsernameTaken` if the username exists. No id is consumed on failure.
    #[allow(dead_code)]
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError>;

    /// Assigns the next résumé id and stamps `uploaded_at`.
    async fn create_resume(&self, resume: NewResume) -> Result<Resume, StorageError>;

    async fn get_resume(&self, id: i32) -> Result<Option<Resume>, StorageError>;

    async fn get_latest_resume(&self) -> Result<Option<Resume>, StorageError>;

    /// Newest `uploaded_at` first.
    async fn get_all_resumes(&self) -> Result<Vec<Resume>, StorageError>;

    /// Returns whether a record was actually removed.
    async fn delete_resume(&self, id: i32) -> Result<bool, StorageError>;

    /// Assigns the next contact id and stamps `created_at`.
    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StorageError>;

    /// Newest `created_at` first.
    async fn get_all_contacts(&self) -> Result<Vec<Contact>, StorageError>;
}
