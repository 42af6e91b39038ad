use chrono::{DateTime, NaiveDate, Utc};

use super::records::Record;
use super::CollectionStore;
use crate::error::Result;
use crate::models::{DailyFocus, DailyReflection, Project, Task, UserId, WikiEntry};

/// Every collection, held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub focuses: Vec<DailyFocus>,
    pub reflections: Vec<DailyReflection>,
    pub wiki: Vec<WikiEntry>,
}

/// Store that never touches the disk. Used for the demo backend and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Collections,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn from_collections(data: Collections) -> Self {
        MemoryStore { data }
    }

    /// A store pre-filled with the demo data, owned by `user`.
    pub fn with_fixture(user: &UserId, today: NaiveDate, now: DateTime<Utc>) -> Self {
        MemoryStore { data: super::seed_fixture(user, today, now) }
    }

    pub fn collections(&self) -> &Collections {
        &self.data
    }
}

impl CollectionStore for MemoryStore {
    fn read<R: Record>(&self) -> Result<Vec<R>> {
        Ok(R::slot(&self.data).clone())
    }

    fn write<R: Record>(&mut self, records: &[R]) -> Result<()> {
        *R::slot_mut(&mut self.data) = records.to_vec();
        Ok(())
    }
}
