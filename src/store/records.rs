use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::memory::Collections;
use super::{
    CollectionStore, DataSource, DateRange, FocusPatch, Mutations, NewFocus, NewProject, NewTask, ProjectPatch,
    ProjectScope, ReflectionInput, TaskPatch, TaskScope, WikiDraft,
};
use crate::error::{Error, Result};
use crate::models::{DailyFocus, DailyReflection, Project, Task, UserId, WikiEntry, DEFAULT_PROJECT_COLOR};

/// A stored entity: owned by one user, identified by a numeric id.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Singular name used in messages ("task", "project", ...).
    const KIND: &'static str;
    /// File holding the collection in a [`super::JsonStore`].
    const FILE_NAME: &'static str;

    fn id(&self) -> u64;
    fn owner(&self) -> &UserId;
    fn slot(data: &Collections) -> &Vec<Self>;
    fn slot_mut(data: &mut Collections) -> &mut Vec<Self>;
}

macro_rules! impl_record {
    ($ty:ty, $kind:literal, $file:literal, $field:ident) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;
            const FILE_NAME: &'static str = $file;

            fn id(&self) -> u64 {
                self.id
            }

            fn owner(&self) -> &UserId {
                &self.user_id
            }

            fn slot(data: &Collections) -> &Vec<Self> {
                &data.$field
            }

            fn slot_mut(data: &mut Collections) -> &mut Vec<Self> {
                &mut data.$field
            }
        }
    };
}

impl_record!(Task, "task", "tasks.json", tasks);
impl_record!(Project, "project", "projects.json", projects);
impl_record!(DailyFocus, "focus", "focuses.json", focuses);
impl_record!(DailyReflection, "reflection", "reflections.json", reflections);
impl_record!(WikiEntry, "wiki entry", "wiki.json", wiki);

fn next_id<R: Record>(records: &[R]) -> u64 {
    records.iter().map(Record::id).max().unwrap_or(0) + 1
}

fn owned_by<R: Record>(records: Vec<R>, user: &UserId) -> Vec<R> {
    records.into_iter().filter(|r| r.owner() == user).collect()
}

fn find_owned_mut<'a, R: Record>(records: &'a mut [R], user: &UserId, id: u64) -> Result<&'a mut R> {
    records
        .iter_mut()
        .find(|r| r.id() == id && r.owner() == user)
        .ok_or(Error::NotFound { kind: R::KIND, id })
}

fn remove_owned<R: Record>(records: &mut Vec<R>, user: &UserId, id: u64) -> Result<R> {
    let idx = records
        .iter()
        .position(|r| r.id() == id && r.owner() == user)
        .ok_or(Error::NotFound { kind: R::KIND, id })?;
    Ok(records.remove(idx))
}

fn clean_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Trims optional text; blank becomes `None`.
fn clean_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn check_rating(rating: Option<u8>) -> Result<Option<u8>> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => Err(Error::InvalidRating(r)),
        other => Ok(other),
    }
}

/// Trimmed, non-blank, first occurrence kept.
fn clean_list(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for item in raw {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|t| t == item) {
            out.push(item.to_string());
        }
    }
    out
}

fn apply_draft(entry: &mut WikiEntry, draft: WikiDraft) -> Result<()> {
    entry.title = clean_title(&draft.title)?;
    entry.rating = check_rating(draft.rating)?;
    entry.summary = draft.summary.trim().to_string();
    entry.content = draft.content;
    entry.tags = clean_list(draft.tags);
    entry.category = draft.category;
    entry.status = draft.status;
    entry.priority = draft.priority;
    entry.is_public = draft.is_public;
    entry.related_links = clean_list(draft.related_links);
    entry.file_urls = clean_list(draft.file_urls);
    Ok(())
}

impl<S: CollectionStore> DataSource for S {
    fn tasks(&self, user: &UserId, scope: TaskScope) -> Result<Vec<Task>> {
        let mut tasks = owned_by(self.read::<Task>()?, user);
        if let TaskScope::Relevant { today } = scope {
            tasks.retain(|t| !t.completed || t.due_date.is_some_and(|d| d >= today));
        }
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    fn projects(&self, user: &UserId, scope: ProjectScope) -> Result<Vec<Project>> {
        let mut projects = owned_by(self.read::<Project>()?, user);
        if scope == ProjectScope::Active {
            projects.retain(|p| !p.completed);
        }
        projects.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(projects)
    }

    fn focuses(&self, user: &UserId, range: DateRange) -> Result<Vec<DailyFocus>> {
        let mut focuses = owned_by(self.read::<DailyFocus>()?, user);
        focuses.retain(|f| range.contains(f.focus_date));
        focuses.sort_by(|a, b| b.focus_date.cmp(&a.focus_date));
        Ok(focuses)
    }

    fn reflections(&self, user: &UserId, range: DateRange) -> Result<Vec<DailyReflection>> {
        let mut reflections = owned_by(self.read::<DailyReflection>()?, user);
        reflections.retain(|r| range.contains(r.reflection_date));
        reflections.sort_by(|a, b| b.reflection_date.cmp(&a.reflection_date));
        Ok(reflections)
    }

    fn wiki_entries(&self, user: &UserId) -> Result<Vec<WikiEntry>> {
        let mut entries = owned_by(self.read::<WikiEntry>()?, user);
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }
}

impl<S: CollectionStore> Mutations for S {
    fn create_task(&mut self, user: &UserId, new: NewTask) -> Result<Task> {
        let title = clean_title(&new.title)?;
        let mut tasks = self.read::<Task>()?;
        let now = Utc::now();
        let task = Task {
            id: next_id(&tasks),
            user_id: user.clone(),
            title,
            description: clean_text(new.description),
            emoji: clean_text(new.emoji),
            priority: new.priority,
            completed: false,
            starred: new.starred,
            due_date: new.due_date,
            project_id: new.project_id,
            created_at: now,
            updated_at: now,
        };
        tasks.push(task.clone());
        self.write(&tasks)?;
        tracing::debug!(id = task.id, user = %user, "task created");
        Ok(task)
    }

    fn update_task(&mut self, user: &UserId, id: u64, patch: TaskPatch) -> Result<Task> {
        let mut tasks = self.read::<Task>()?;
        let task = find_owned_mut(&mut tasks, user, id)?;
        if let Some(title) = patch.title {
            task.title = clean_title(&title)?;
        }
        if let Some(description) = patch.description {
            task.description = clean_text(description);
        }
        if let Some(emoji) = patch.emoji {
            task.emoji = clean_text(emoji);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(starred) = patch.starred {
            task.starred = starred;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = project_id;
        }
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.write(&tasks)?;
        Ok(updated)
    }

    fn delete_task(&mut self, user: &UserId, id: u64) -> Result<()> {
        let mut tasks = self.read::<Task>()?;
        remove_owned(&mut tasks, user, id)?;
        self.write(&tasks)
    }

    fn create_project(&mut self, user: &UserId, new: NewProject) -> Result<Project> {
        let title = clean_title(&new.title)?;
        let mut projects = self.read::<Project>()?;
        let now = Utc::now();
        let project = Project {
            id: next_id(&projects),
            user_id: user.clone(),
            title,
            description: clean_text(new.description),
            emoji: clean_text(new.emoji),
            color: clean_text(new.color).unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        projects.push(project.clone());
        self.write(&projects)?;
        tracing::debug!(id = project.id, user = %user, "project created");
        Ok(project)
    }

    fn update_project(&mut self, user: &UserId, id: u64, patch: ProjectPatch) -> Result<Project> {
        let mut projects = self.read::<Project>()?;
        let project = find_owned_mut(&mut projects, user, id)?;
        if let Some(title) = patch.title {
            project.title = clean_title(&title)?;
        }
        if let Some(description) = patch.description {
            project.description = clean_text(description);
        }
        if let Some(emoji) = patch.emoji {
            project.emoji = clean_text(emoji);
        }
        if let Some(color) = clean_text(patch.color) {
            project.color = color;
        }
        if let Some(completed) = patch.completed {
            project.completed = completed;
        }
        project.updated_at = Utc::now();
        let updated = project.clone();
        self.write(&projects)?;
        Ok(updated)
    }

    fn delete_project(&mut self, user: &UserId, id: u64) -> Result<()> {
        let mut projects = self.read::<Project>()?;
        remove_owned(&mut projects, user, id)?;

        // tasks are detached before the project file is rewritten
        let mut tasks = self.read::<Task>()?;
        let now = Utc::now();
        let mut detached = 0;
        for task in tasks.iter_mut().filter(|t| t.owner() == user && t.project_id == Some(id)) {
            task.project_id = None;
            task.updated_at = now;
            detached += 1;
        }
        if detached > 0 {
            self.write(&tasks)?;
            tracing::debug!(project = id, detached, "tasks detached from deleted project");
        }
        self.write(&projects)
    }

    fn create_focus(&mut self, user: &UserId, new: NewFocus) -> Result<DailyFocus> {
        let title = clean_title(&new.title)?;
        let mut focuses = self.read::<DailyFocus>()?;
        if focuses.iter().any(|f| f.owner() == user && f.focus_date == new.focus_date) {
            return Err(Error::DuplicateFocus(new.focus_date));
        }
        let now = Utc::now();
        let focus = DailyFocus {
            id: next_id(&focuses),
            user_id: user.clone(),
            focus_date: new.focus_date,
            title,
            description: clean_text(new.description),
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        focuses.push(focus.clone());
        self.write(&focuses)?;
        tracing::debug!(id = focus.id, date = %focus.focus_date, "focus created");
        Ok(focus)
    }

    fn update_focus(&mut self, user: &UserId, id: u64, patch: FocusPatch) -> Result<DailyFocus> {
        let mut focuses = self.read::<DailyFocus>()?;
        let focus = find_owned_mut(&mut focuses, user, id)?;
        let now = Utc::now();
        if let Some(title) = patch.title {
            focus.title = clean_title(&title)?;
        }
        if let Some(description) = patch.description {
            focus.description = clean_text(description);
        }
        if let Some(completed) = patch.completed {
            if completed != focus.completed {
                focus.completed = completed;
                focus.completed_at = completed.then_some(now);
            }
        }
        focus.updated_at = now;
        let updated = focus.clone();
        self.write(&focuses)?;
        Ok(updated)
    }

    fn delete_focus(&mut self, user: &UserId, id: u64) -> Result<()> {
        let mut focuses = self.read::<DailyFocus>()?;
        remove_owned(&mut focuses, user, id)?;
        self.write(&focuses)
    }

    fn save_reflection(&mut self, user: &UserId, input: ReflectionInput) -> Result<DailyReflection> {
        let mood_rating = check_rating(input.mood_rating)?;
        let mut reflections = self.read::<DailyReflection>()?;
        let now = Utc::now();

        let existing = reflections
            .iter_mut()
            .find(|r| r.owner() == user && r.reflection_date == input.reflection_date);
        let saved = match existing {
            Some(reflection) => {
                reflection.accomplishments = clean_text(input.accomplishments);
                reflection.learnings = clean_text(input.learnings);
                reflection.improvements = clean_text(input.improvements);
                reflection.mood_rating = mood_rating;
                reflection.updated_at = now;
                reflection.clone()
            }
            None => {
                let reflection = DailyReflection {
                    id: next_id(&reflections),
                    user_id: user.clone(),
                    reflection_date: input.reflection_date,
                    accomplishments: clean_text(input.accomplishments),
                    learnings: clean_text(input.learnings),
                    improvements: clean_text(input.improvements),
                    mood_rating,
                    created_at: now,
                    updated_at: now,
                };
                reflections.push(reflection.clone());
                reflection
            }
        };
        self.write(&reflections)?;
        Ok(saved)
    }

    fn delete_reflection(&mut self, user: &UserId, id: u64) -> Result<()> {
        let mut reflections = self.read::<DailyReflection>()?;
        remove_owned(&mut reflections, user, id)?;
        self.write(&reflections)
    }

    fn create_wiki_entry(&mut self, user: &UserId, draft: WikiDraft) -> Result<WikiEntry> {
        let mut entries = self.read::<WikiEntry>()?;
        let now = Utc::now();
        let mut entry = WikiEntry {
            id: next_id(&entries),
            user_id: user.clone(),
            title: String::new(),
            summary: String::new(),
            content: String::new(),
            tags: Vec::new(),
            category: draft.category,
            status: draft.status,
            priority: draft.priority,
            is_public: false,
            rating: None,
            related_links: Vec::new(),
            file_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        apply_draft(&mut entry, draft)?;
        entries.push(entry.clone());
        self.write(&entries)?;
        tracing::debug!(id = entry.id, user = %user, "wiki entry created");
        Ok(entry)
    }

    fn update_wiki_entry(&mut self, user: &UserId, id: u64, draft: WikiDraft) -> Result<WikiEntry> {
        let mut entries = self.read::<WikiEntry>()?;
        let entry = find_owned_mut(&mut entries, user, id)?;
        apply_draft(entry, draft)?;
        entry.updated_at = Utc::now();
        let updated = entry.clone();
        self.write(&entries)?;
        Ok(updated)
    }

    fn delete_wiki_entry(&mut self, user: &UserId, id: u64) -> Result<()> {
        let mut entries = self.read::<WikiEntry>()?;
        remove_owned(&mut entries, user, id)?;
        self.write(&entries)
    }
}
