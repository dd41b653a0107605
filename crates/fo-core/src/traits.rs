//! Core traits shared by models and services

use chrono::{DateTime, Utc};

/// Primary key type of backend records
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities that carry the backend's last modification time
pub trait Timestamped {
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}
