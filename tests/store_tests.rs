use chrono::{NaiveDate, Utc};
use cosmictasks::models::{Priority, UserId, WikiCategory, WikiStatus};
use cosmictasks::store::*;
use cosmictasks::{Error, Result};
use std::fs;
use std::io;
use tempfile::TempDir;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn alice() -> UserId {
    UserId::new("user-alice")
}

fn bob() -> UserId {
    UserId::new("user-bob")
}

fn new_task(title: &str) -> NewTask {
    NewTask { title: title.to_string(), ..NewTask::default() }
}

fn with_json_store<F>(f: F)
where
    F: FnOnce(&mut JsonStore, &TempDir),
{
    let dir = TempDir::new().unwrap();
    let mut store = JsonStore::open(dir.path()).unwrap();
    f(&mut store, &dir);
}

#[test]
fn test_json_store_persists_across_instances() {
    with_json_store(|store, dir| {
        let project = store
            .create_project(&alice(), NewProject { title: "Launch".into(), ..NewProject::default() })
            .unwrap();
        let task = NewTask {
            title: "  Write docs  ".into(),
            priority: Priority::High,
            due_date: Some(date(14)),
            project_id: Some(project.id),
            ..NewTask::default()
        };
        store.create_task(&alice(), task).unwrap();

        let reopened = JsonStore::open(dir.path()).unwrap();
        let tasks = reopened.tasks(&alice(), TaskScope::All).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write docs");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].project_id, Some(project.id));
        assert!(dir.path().join("tasks.json").exists());
        assert!(dir.path().join("projects.json").exists());
    });
}

#[test]
fn test_json_writes_leave_no_temp_files() {
    with_json_store(|store, dir| {
        // leftover of an interrupted write
        fs::write(dir.path().join("tasks.json.tmp"), "[{\"id\": 1, \"ti").unwrap();

        store.create_task(&alice(), new_task("First")).unwrap();
        store.create_task(&alice(), new_task("Second")).unwrap();

        assert_eq!(store.tasks(&alice(), TaskScope::All).unwrap().len(), 2);
        let names: Vec<String> =
            fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["tasks.json"]);
    });
}

#[test]
fn test_missing_files_are_empty_collections() {
    with_json_store(|store, _dir| {
        assert!(store.tasks(&alice(), TaskScope::All).unwrap().is_empty());
        assert!(store.wiki_entries(&alice()).unwrap().is_empty());
        assert!(store.focuses(&alice(), DateRange::all()).unwrap().is_empty());
    });
}

#[test]
fn test_corrupt_file_fails_only_its_collection() {
    with_json_store(|store, dir| {
        store.create_task(&alice(), new_task("Still here")).unwrap();
        fs::write(dir.path().join("wiki.json"), "{ not json").unwrap();

        assert!(matches!(store.wiki_entries(&alice()), Err(Error::Json(_))));
        assert_eq!(store.tasks(&alice(), TaskScope::All).unwrap().len(), 1);
    });
}

#[test]
fn test_unknown_enum_values_are_normalised() {
    with_json_store(|store, dir| {
        let raw = r#"[{
            "id": 1, "user_id": "user-alice", "title": "Odd",
            "tags": [], "category": "gardening", "status": "deleted", "priority": "urgent",
            "is_public": false, "rating": null,
            "created_at": "2025-03-01T09:00:00Z", "updated_at": "2025-03-01T09:00:00Z"
        }]"#;
        fs::write(dir.path().join("wiki.json"), raw).unwrap();

        let entries = store.wiki_entries(&alice()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, WikiCategory::General);
        assert_eq!(entries[0].status, WikiStatus::Draft);
        assert_eq!(entries[0].priority, Priority::Low);
        assert!(entries[0].related_links.is_empty());
    });
}

#[test]
fn test_records_are_scoped_to_their_owner() {
    let mut store = MemoryStore::new();
    let task = store.create_task(&alice(), new_task("Private")).unwrap();
    store.create_task(&bob(), new_task("Bob's")).unwrap();

    let bobs = store.tasks(&bob(), TaskScope::All).unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].title, "Bob's");

    let err = store.update_task(&bob(), task.id, TaskPatch::default()).unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "task", .. }));
    assert!(matches!(store.delete_task(&bob(), task.id), Err(Error::NotFound { .. })));
    assert_eq!(store.tasks(&alice(), TaskScope::All).unwrap().len(), 1);
}

#[test]
fn test_relevant_scope_keeps_open_and_upcoming_tasks() {
    let mut store = MemoryStore::new();
    let open_old = store.create_task(&alice(), NewTask { due_date: Some(date(1)), ..new_task("open, overdue") }).unwrap();
    let done_old = store.create_task(&alice(), NewTask { due_date: Some(date(1)), ..new_task("done, past") }).unwrap();
    let done_later = store.create_task(&alice(), NewTask { due_date: Some(date(20)), ..new_task("done, later") }).unwrap();
    let done_undated = store.create_task(&alice(), new_task("done, undated")).unwrap();
    for id in [done_old.id, done_later.id, done_undated.id] {
        store.update_task(&alice(), id, TaskPatch { completed: Some(true), ..TaskPatch::default() }).unwrap();
    }

    let mut relevant: Vec<u64> = store
        .tasks(&alice(), TaskScope::Relevant { today: date(10) })
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    relevant.sort();
    assert_eq!(relevant, vec![open_old.id, done_later.id]);
}

#[test]
fn test_task_validation() {
    let mut store = MemoryStore::new();
    assert!(matches!(store.create_task(&alice(), new_task("   ")), Err(Error::EmptyTitle)));

    let task = store
        .create_task(&alice(), NewTask { description: Some("  ".into()), ..new_task("Plan") })
        .unwrap();
    assert_eq!(task.description, None);

    let patch = TaskPatch { due_date: Some(Some(date(3))), starred: Some(true), ..TaskPatch::default() };
    let task = store.update_task(&alice(), task.id, patch).unwrap();
    assert_eq!(task.due_date, Some(date(3)));
    assert!(task.starred);

    let patch = TaskPatch { due_date: Some(None), ..TaskPatch::default() };
    let task = store.update_task(&alice(), task.id, patch).unwrap();
    assert_eq!(task.due_date, None);
    assert!(task.starred);
}

#[test]
fn test_projects_sorted_and_active_scope() {
    let mut store = MemoryStore::new();
    let zeta = store.create_project(&alice(), NewProject { title: "Zeta".into(), ..NewProject::default() }).unwrap();
    store.create_project(&alice(), NewProject { title: "Alpha".into(), ..NewProject::default() }).unwrap();
    store
        .update_project(&alice(), zeta.id, ProjectPatch { completed: Some(true), ..ProjectPatch::default() })
        .unwrap();

    let all: Vec<String> = store.projects(&alice(), ProjectScope::All).unwrap().into_iter().map(|p| p.title).collect();
    assert_eq!(all, vec!["Alpha", "Zeta"]);
    let active = store.projects(&alice(), ProjectScope::Active).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].color, "#6366f1");
}

#[test]
fn test_deleting_a_project_detaches_its_tasks() {
    let mut store = MemoryStore::new();
    let project = store.create_project(&alice(), NewProject { title: "Gone".into(), ..NewProject::default() }).unwrap();
    store.create_task(&alice(), NewTask { project_id: Some(project.id), ..new_task("Keep me") }).unwrap();

    store.delete_project(&alice(), project.id).unwrap();

    assert!(store.projects(&alice(), ProjectScope::All).unwrap().is_empty());
    let tasks = store.tasks(&alice(), TaskScope::All).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].project_id, None);
}

/// Memory store that refuses to write tasks.
struct ReadOnlyTasks(MemoryStore);

impl CollectionStore for ReadOnlyTasks {
    fn read<R: Record>(&self) -> Result<Vec<R>> {
        self.0.read()
    }

    fn write<R: Record>(&mut self, records: &[R]) -> Result<()> {
        if R::FILE_NAME == "tasks.json" {
            return Err(Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")));
        }
        self.0.write(records)
    }
}

#[test]
fn test_failed_detach_keeps_the_project() {
    let mut inner = MemoryStore::new();
    let project = inner.create_project(&alice(), NewProject { title: "Stays".into(), ..NewProject::default() }).unwrap();
    inner.create_task(&alice(), NewTask { project_id: Some(project.id), ..new_task("Linked") }).unwrap();
    let mut store = ReadOnlyTasks(inner);

    assert!(matches!(store.delete_project(&alice(), project.id), Err(Error::Io(_))));

    assert_eq!(store.projects(&alice(), ProjectScope::All).unwrap().len(), 1);
    assert_eq!(store.tasks(&alice(), TaskScope::All).unwrap()[0].project_id, Some(project.id));
}

#[test]
fn test_one_focus_per_day() {
    let mut store = MemoryStore::new();
    let focus = NewFocus { focus_date: date(5), title: "Ship it".into(), description: None };
    store.create_focus(&alice(), focus.clone()).unwrap();

    assert!(matches!(store.create_focus(&alice(), focus.clone()), Err(Error::DuplicateFocus(d)) if d == date(5)));
    // another user may pick the same day
    store.create_focus(&bob(), focus).unwrap();
}

#[test]
fn test_focus_completion_sets_and_clears_timestamp() {
    let mut store = MemoryStore::new();
    let focus = store
        .create_focus(&alice(), NewFocus { focus_date: date(5), title: "Ship it".into(), description: None })
        .unwrap();
    assert_eq!(focus.completed_at, None);

    let done = store
        .update_focus(&alice(), focus.id, FocusPatch { completed: Some(true), ..FocusPatch::default() })
        .unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    let renamed = store
        .update_focus(&alice(), focus.id, FocusPatch { title: Some("Ship it today".into()), ..FocusPatch::default() })
        .unwrap();
    assert_eq!(renamed.completed_at, done.completed_at);

    let reopened = store
        .update_focus(&alice(), focus.id, FocusPatch { completed: Some(false), ..FocusPatch::default() })
        .unwrap();
    assert!(!reopened.completed);
    assert_eq!(reopened.completed_at, None);
}

#[test]
fn test_focuses_newest_first_within_range() {
    let mut store = MemoryStore::new();
    for day in [3, 9, 6] {
        store
            .create_focus(&alice(), NewFocus { focus_date: date(day), title: format!("Day {day}"), description: None })
            .unwrap();
    }
    let dates: Vec<NaiveDate> =
        store.focuses(&alice(), DateRange::since(date(5))).unwrap().into_iter().map(|f| f.focus_date).collect();
    assert_eq!(dates, vec![date(9), date(6)]);
    assert_eq!(store.focuses(&alice(), DateRange::day(date(3))).unwrap().len(), 1);
}

#[test]
fn test_reflection_upsert() {
    let mut store = MemoryStore::new();
    let input = ReflectionInput {
        reflection_date: date(5),
        accomplishments: Some("Shipped".into()),
        learnings: None,
        improvements: None,
        mood_rating: Some(3),
    };
    let first = store.save_reflection(&alice(), input.clone()).unwrap();
    let second = store
        .save_reflection(&alice(), ReflectionInput { mood_rating: Some(5), learnings: Some("Rest".into()), ..input })
        .unwrap();

    assert_eq!(first.id, second.id);
    let saved = store.reflections(&alice(), DateRange::all()).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].mood_rating, Some(5));
    assert_eq!(saved[0].learnings.as_deref(), Some("Rest"));
}

#[test]
fn test_ratings_outside_range_are_rejected() {
    let mut store = MemoryStore::new();
    let input = ReflectionInput {
        reflection_date: date(5),
        accomplishments: None,
        learnings: None,
        improvements: None,
        mood_rating: Some(6),
    };
    assert!(matches!(store.save_reflection(&alice(), input), Err(Error::InvalidRating(6))));

    let draft = WikiDraft { title: "Rated".into(), rating: Some(0), ..WikiDraft::default() };
    assert!(matches!(store.create_wiki_entry(&alice(), draft), Err(Error::InvalidRating(0))));
}

#[test]
fn test_wiki_tags_are_cleaned() {
    let mut store = MemoryStore::new();
    let draft = WikiDraft {
        title: "Notes".into(),
        tags: vec![" rust ".into(), "".into(), "cli".into(), "rust".into()],
        ..WikiDraft::default()
    };
    let entry = store.create_wiki_entry(&alice(), draft).unwrap();
    assert_eq!(entry.tags, vec!["rust", "cli"]);

    let mut draft = WikiDraft::from(&entry);
    draft.status = WikiStatus::Published;
    draft.is_public = true;
    let updated = store.update_wiki_entry(&alice(), entry.id, draft).unwrap();
    assert_eq!(updated.status, WikiStatus::Published);
    assert!(updated.is_public);
    assert_eq!(updated.created_at, entry.created_at);
    assert!(updated.updated_at >= entry.updated_at);
}

#[test]
fn test_fixture_matches_demo_data() {
    let today = date(14);
    let store = MemoryStore::with_fixture(&alice(), today, Utc::now());

    assert_eq!(store.projects(&alice(), ProjectScope::Active).unwrap().len(), 3);
    assert_eq!(store.tasks(&alice(), TaskScope::All).unwrap().len(), 3);
    assert_eq!(store.focuses(&alice(), DateRange::day(today)).unwrap().len(), 1);
    assert_eq!(store.wiki_entries(&alice()).unwrap().len(), 4);
    assert!(store.tasks(&bob(), TaskScope::All).unwrap().is_empty());
}
