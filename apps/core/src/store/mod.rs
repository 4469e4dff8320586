//! Record store: four named JSON slots persisted outside the core.
//!
//! The portal reads every slot at startup and writes a slot whenever the
//! matching collection changes. Values are opaque JSON strings here; parsing
//! and corruption handling belong to the caller.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::AppError;
use async_trait::async_trait;
use std::fmt;

/// Named storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    User,
    Courses,
    Assignments,
    Exams,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::User, Slot::Courses, Slot::Assignments, Slot::Exams];

    /// Storage key of the slot.
    pub fn key(&self) -> &'static str {
        match self {
            Slot::User => "acee-user",
            Slot::Courses => "acee-courses",
            Slot::Assignments => "acee-assignments",
            Slot::Exams => "acee-exams",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Defines the key-value persistence boundary of the portal.
///
/// Implementations only move strings in and out; they never interpret them.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Returns the raw value of a slot, `None` if it was never written.
    async fn load(&self, slot: Slot) -> Result<Option<String>, AppError>;

    /// Overwrites the value of a slot.
    async fn save(&self, slot: Slot, value: &str) -> Result<(), AppError>;

    /// Deletes a slot. Removing a missing slot is not an error.
    async fn remove(&self, slot: Slot) -> Result<(), AppError>;
}
