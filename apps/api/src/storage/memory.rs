//! In-memory `Storage` backend. Volatile: everything is lost on restart.
//!
//! All maps and id counters sit behind a single mutex, so every operation is
//! serialized. Ids start at 1 per entity kind and are never reused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{Storage, StorageError};
use crate::models::contact::{Contact, NewContact};
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{NewUser, User};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct Tables {
    #[allow(dead_code)]
    users: BTreeMap<i32, User>,
    resumes: BTreeMap<i32, Resume>,
    contacts: BTreeMap<i32, Contact>,
    #[allow(dead_code)]
    next_user_id: i32,
    next_resume_id: i32,
    next_contact_id: i32,
}

impl Tables {
    fn new() -> Self {
        Tables {
            users: BTreeMap::new(),
            resumes: BTreeMap::new(),
            contacts: BTreeMap::new(),
            next_user_id: 1,
            next_resume_id: 1,
            next_contact_id: 1,
        }
    }
}

pub struct MemStorage {
    tables: Mutex<Tables>,
    clock: Clock,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Uses `clock` instead of `Utc::now` to stamp `uploaded_at` / `created_at`.
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        MemStorage {
            tables: Mutex::new(Tables::new()),
            clock: Box::new(clock),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn take_id(counter: &mut i32) -> i32 {
    let id = *counter;
    *counter += 1;
    id
}

fn resumes_newest_first(tables: &Tables) -> Vec<Resume> {
    let mut resumes: Vec<Resume> = tables.resumes.values().cloned().collect();
    resumes.sort_by(|a, b| {
        b.uploaded_at
            .cmp(&a.uploaded_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    resumes
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::UsernameTaken(user.username));
        }
        let id = take_id(&mut tables.next_user_id);
        let user = User::from_new(id, user);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, StorageError> {
        let uploaded_at = (self.clock)();
        let mut tables = self.tables.lock().await;
        let id = take_id(&mut tables.next_resume_id);
        let resume = Resume::from_new(id, uploaded_at, resume);
        tables.resumes.insert(id, resume.clone());
        Ok(resume)
    }

    async fn get_resume(&self, id: i32) -> Result<Option<Resume>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(tables.resumes.get(&id).cloned())
    }

    async fn get_latest_resume(&self) -> Result<Option<Resume>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .resumes
            .values()
            .max_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then_with(|| a.id.cmp(&b.id)))
            .cloned())
    }

    async fn get_all_resumes(&self) -> Result<Vec<Resume>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(resumes_newest_first(&tables))
    }

    async fn delete_resume(&self, id: i32) -> Result<bool, StorageError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.resumes.remove(&id).is_some())
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StorageError> {
        let created_at = (self.clock)();
        let mut tables = self.tables.lock().await;
        let id = take_id(&mut tables.next_contact_id);
        let contact = Contact::from_new(id, created_at, contact);
        tables.contacts.insert(id, contact.clone());
        Ok(contact)
    }

    async fn get_all_contacts(&self) -> Result<Vec<Contact>, StorageError> {
        let tables = self.tables.lock().await;
        let mut contacts: Vec<Contact> = tables.contacts.values().cloned().collect();
        contacts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex as StdMutex;

    fn new_resume(name: &str) -> NewResume {
        NewResume {
            filename: format!("resume-1-1-{name}"),
            original_name: name.to_string(),
            path: format!("uploads/resume-1-1-{name}"),
            size: 1024,
        }
    }

    fn new_contact(name: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            subject: None,
            message: "Hello".to_string(),
        }
    }

    /// Clock that hands out the given unix timestamps in order.
    fn scripted_clock(seconds: Vec<i64>) -> impl Fn() -> DateTime<Utc> + Send + Sync {
        let remaining = StdMutex::new(seconds.into_iter());
        move || {
            let secs = remaining.lock().unwrap().next().expect("clock exhausted");
            Utc.timestamp_opt(secs, 0).unwrap()
        }
    }

    #[tokio::test]
    async fn test_resume_ids_strictly_increase_from_one() {
        let storage = MemStorage::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            let resume = storage
                .create_resume(new_resume(&format!("cv{i}.pdf")))
                .await
                .unwrap();
            ids.push(resume.id);
        }
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let storage = MemStorage::new();
        let first = storage.create_resume(new_resume("a.pdf")).await.unwrap();
        assert!(storage.delete_resume(first.id).await.unwrap());
        let second = storage.create_resume(new_resume("b.pdf")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_counters_are_per_kind() {
        let storage = MemStorage::new();
        let resume = storage.create_resume(new_resume("a.pdf")).await.unwrap();
        let contact = storage.create_contact(new_contact("Ana")).await.unwrap();
        assert_eq!(resume.id, 1);
        assert_eq!(contact.id, 1);
    }

    #[tokio::test]
    async fn test_all_resumes_sorted_newest_first_regardless_of_insert_order() {
        let storage = MemStorage::with_clock(scripted_clock(vec![200, 100, 300, 150]));
        for name in ["a.pdf", "b.pdf", "c.pdf", "d.pdf"] {
            storage.create_resume(new_resume(name)).await.unwrap();
        }
        let names: Vec<String> = storage
            .get_all_resumes()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.original_name)
            .collect();
        assert_eq!(names, vec!["c.pdf", "a.pdf", "d.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_latest_resume_is_max_uploaded_at() {
        let storage = MemStorage::with_clock(scripted_clock(vec![500, 900, 100]));
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            storage.create_resume(new_resume(name)).await.unwrap();
        }
        let latest = storage.get_latest_resume().await.unwrap().unwrap();
        assert_eq!(latest.original_name, "b.pdf");
        assert_eq!(latest.uploaded_at, Utc.timestamp_opt(900, 0).unwrap());
    }

    #[tokio::test]
    async fn test_latest_resume_none_when_empty() {
        let storage = MemStorage::new();
        assert!(storage.get_latest_resume().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_equal_timestamps_break_ties_by_id() {
        let storage = MemStorage::with_clock(scripted_clock(vec![100, 100]));
        storage.create_resume(new_resume("a.pdf")).await.unwrap();
        storage.create_resume(new_resume("b.pdf")).await.unwrap();
        let all = storage.get_all_resumes().await.unwrap();
        assert_eq!(all[0].id, 2);
        let latest = storage.get_latest_resume().await.unwrap().unwrap();
        assert_eq!(latest.id, 2);
    }

    #[tokio::test]
    async fn test_delete_resume_true_once_then_false() {
        let storage = MemStorage::new();
        let resume = storage.create_resume(new_resume("a.pdf")).await.unwrap();
        assert!(storage.delete_resume(resume.id).await.unwrap());
        assert!(!storage.delete_resume(resume.id).await.unwrap());
        assert!(storage.get_resume(resume.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_resume_is_false() {
        let storage = MemStorage::new();
        assert!(!storage.delete_resume(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_contacts_sorted_newest_first() {
        let storage = MemStorage::with_clock(scripted_clock(vec![30, 10, 20]));
        for name in ["Ana", "Ben", "Cid"] {
            storage.create_contact(new_contact(name)).await.unwrap();
        }
        let names: Vec<String> = storage
            .get_all_contacts()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Cid", "Ben"]);
    }

    #[tokio::test]
    async fn test_create_contact_stamps_created_at() {
        let storage = MemStorage::with_clock(scripted_clock(vec![1_700_000_000]));
        let contact = storage.create_contact(new_contact("Ana")).await.unwrap();
        assert_eq!(contact.created_at, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        assert_eq!(contact.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_user_lookup_by_id_and_username() {
        let storage = MemStorage::new();
        let user = storage
            .create_user(NewUser {
                username: "ana".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(storage.get_user(1).await.unwrap(), Some(user.clone()));
        assert_eq!(storage.get_user_by_username("ana").await.unwrap(), Some(user));
        assert!(storage.get_user_by_username("ben").await.unwrap().is_none());
        assert!(storage.get_user(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_without_consuming_id() {
        let storage = MemStorage::new();
        let make = |name: &str| NewUser {
            username: name.to_string(),
            password: "pw".to_string(),
        };
        storage.create_user(make("ana")).await.unwrap();
        let err = storage.create_user(make("ana")).await.unwrap_err();
        assert!(matches!(err, StorageError::UsernameTaken(ref name) if name == "ana"));
        let ben = storage.create_user(make("ben")).await.unwrap();
        assert_eq!(ben.id, 2);
    }

    #[tokio::test]
    async fn test_password_not_serialized() {
        let storage = MemStorage::new();
        let user = storage
            .create_user(NewUser {
                username: "ana".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "ana");
    }
}
