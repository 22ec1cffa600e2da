pub mod contact;
pub mod resume;
pub mod user;
