use crate::error::AppError;
use crate::store::{RecordStore, Slot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-process [`RecordStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<Slot, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store with pre-populated slots.
    pub fn with_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (Slot, String)>,
    {
        Self {
            slots: Mutex::new(values.into_iter().collect()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<Slot, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self, slot: Slot) -> Result<Option<String>, AppError> {
        Ok(self.slots().get(&slot).cloned())
    }

    async fn save(&self, slot: Slot, value: &str) -> Result<(), AppError> {
        self.slots().insert(slot, value.to_string());
        Ok(())
    }

    async fn remove(&self, slot: Slot) -> Result<(), AppError> {
        self.slots().remove(&slot);
        Ok(())
    }
}
