//! Data access: the collaborator that fetches and mutates records.
//!
//! Two implementations exist, [`JsonStore`] (one JSON file per collection)
//! and [`MemoryStore`] (in-memory, optionally seeded with demo data). Both
//! only provide raw collection reads and writes through [`CollectionStore`];
//! the scoping, ordering and validation rules live once, in the blanket
//! [`DataSource`] and [`Mutations`] impls.

mod fixture;
mod json;
mod memory;
mod records;

use chrono::{NaiveDate, Utc};

use crate::auth::demo_user;
use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::models::{DailyFocus, DailyReflection, Priority, Project, Task, UserId, WikiCategory, WikiEntry, WikiStatus};

pub use fixture::seed_fixture;
pub use json::JsonStore;
pub use memory::{Collections, MemoryStore};
pub use records::Record;

/// Which tasks to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    All,
    /// Incomplete tasks plus tasks due on or after `today`.
    Relevant { today: NaiveDate },
}

/// Which projects to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScope {
    All,
    /// Projects not yet completed.
    Active,
}

/// Inclusive range of calendar days. Open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        DateRange::default()
    }

    pub fn day(date: NaiveDate) -> Self {
        DateRange { from: Some(date), to: Some(date) }
    }

    pub fn since(date: NaiveDate) -> Self {
        DateRange { from: Some(date), to: None }
    }

    /// Both ends inclusive.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange { from: Some(from), to: Some(to) }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |f| date >= f) && self.to.map_or(true, |t| date <= t)
    }
}

/// Read side of the data collaborator. Every call is scoped to `user`.
///
/// An empty result means "no matching record"; an `Err` means this one
/// collection could not be read.
pub trait DataSource {
    /// Newest first.
    fn tasks(&self, user: &UserId, scope: TaskScope) -> Result<Vec<Task>>;
    /// Ordered by title.
    fn projects(&self, user: &UserId, scope: ProjectScope) -> Result<Vec<Project>>;
    /// Latest day first.
    fn focuses(&self, user: &UserId, range: DateRange) -> Result<Vec<DailyFocus>>;
    /// Latest day first.
    fn reflections(&self, user: &UserId, range: DateRange) -> Result<Vec<DailyReflection>>;
    /// Most recently updated first.
    fn wiki_entries(&self, user: &UserId) -> Result<Vec<WikiEntry>>;
}

/// Write side of the data collaborator.
pub trait Mutations {
    fn create_task(&mut self, user: &UserId, task: NewTask) -> Result<Task>;
    fn update_task(&mut self, user: &UserId, id: u64, patch: TaskPatch) -> Result<Task>;
    fn delete_task(&mut self, user: &UserId, id: u64) -> Result<()>;

    fn create_project(&mut self, user: &UserId, project: NewProject) -> Result<Project>;
    fn update_project(&mut self, user: &UserId, id: u64, patch: ProjectPatch) -> Result<Project>;
    /// Also detaches the user's tasks from the project.
    fn delete_project(&mut self, user: &UserId, id: u64) -> Result<()>;

    /// Fails with [`crate::Error::DuplicateFocus`] if the day already has one.
    fn create_focus(&mut self, user: &UserId, focus: NewFocus) -> Result<DailyFocus>;
    fn update_focus(&mut self, user: &UserId, id: u64, patch: FocusPatch) -> Result<DailyFocus>;
    fn delete_focus(&mut self, user: &UserId, id: u64) -> Result<()>;

    /// Creates the reflection for the day or replaces the existing one.
    fn save_reflection(&mut self, user: &UserId, reflection: ReflectionInput) -> Result<DailyReflection>;
    fn delete_reflection(&mut self, user: &UserId, id: u64) -> Result<()>;

    fn create_wiki_entry(&mut self, user: &UserId, draft: WikiDraft) -> Result<WikiEntry>;
    fn update_wiki_entry(&mut self, user: &UserId, id: u64, draft: WikiDraft) -> Result<WikiEntry>;
    fn delete_wiki_entry(&mut self, user: &UserId, id: u64) -> Result<()>;
}

/// A full data backend, usable as a trait object.
pub trait Backend: DataSource + Mutations {}

impl<T: DataSource + Mutations> Backend for T {}

/// Raw access to whole collections. Implement this to get [`DataSource`] and
/// [`Mutations`] for free.
pub trait CollectionStore {
    fn read<R: Record>(&self) -> Result<Vec<R>>;
    fn write<R: Record>(&mut self, records: &[R]) -> Result<()>;
}

/// Opens the backend selected by `config.backend`.
///
/// The fixture backend is seeded for [`demo_user`], the identity
/// [`crate::auth::FixtureAuth`] always reports.
pub fn open_backend(config: &Config, today: NaiveDate) -> Result<Box<dyn Backend>> {
    match config.backend {
        BackendKind::Json => {
            tracing::debug!(dir = %config.data_dir.display(), "opening json store");
            Ok(Box::new(JsonStore::open(&config.data_dir)?))
        }
        BackendKind::Fixture => {
            tracing::debug!("opening fixture store");
            Ok(Box::new(MemoryStore::with_fixture(&demo_user().id, today, Utc::now())))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub priority: Priority,
    pub starred: bool,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<u64>,
}

/// Fields left `None` are unchanged. For the nested options, `Some(None)` clears.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub emoji: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub starred: Option<bool>,
    pub due_date: Option<Option<NaiveDate>>,
    pub project_id: Option<Option<u64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub emoji: Option<Option<String>>,
    pub color: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFocus {
    pub focus_date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    /// Setting this also sets or clears `completed_at`.
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionInput {
    pub reflection_date: NaiveDate,
    pub accomplishments: Option<String>,
    pub learnings: Option<String>,
    pub improvements: Option<String>,
    pub mood_rating: Option<u8>,
}

/// Every editable field of a wiki entry. Used for both create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct WikiDraft {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: WikiCategory,
    pub status: WikiStatus,
    pub priority: Priority,
    pub is_public: bool,
    pub rating: Option<u8>,
    pub related_links: Vec<String>,
    pub file_urls: Vec<String>,
}

impl Default for WikiDraft {
    fn default() -> Self {
        WikiDraft {
            title: String::new(),
            summary: String::new(),
            content: String::new(),
            tags: Vec::new(),
            category: WikiCategory::General,
            status: WikiStatus::Draft,
            priority: Priority::Medium,
            is_public: false,
            rating: None,
            related_links: Vec::new(),
            file_urls: Vec::new(),
        }
    }
}

impl From<&WikiEntry> for WikiDraft {
    fn from(entry: &WikiEntry) -> Self {
        WikiDraft {
            title: entry.title.clone(),
            summary: entry.summary.clone(),
            content: entry.content.clone(),
            tags: entry.tags.clone(),
            category: entry.category,
            status: entry.status,
            priority: entry.priority,
            is_public: entry.is_public,
            rating: entry.rating,
            related_links: entry.related_links.clone(),
            file_urls: entry.file_urls.clone(),
        }
    }
}
