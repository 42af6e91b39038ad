use chrono::NaiveDate;
use cosmictasks::auth::{open_authenticator, Authenticator, SessionFile};
use cosmictasks::commands::*;
use cosmictasks::config::{BackendKind, Config};
use cosmictasks::context::Context;
use cosmictasks::models::{Priority, UserId, WikiCategory, WikiStatus};
use cosmictasks::projector::WikiFilter;
use cosmictasks::store::*;
use cosmictasks::Error;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn user(ctx: &Context) -> UserId {
    ctx.user().unwrap().id
}

/// A signed-in context over a JSON store in a fresh directory.
fn with_test_ctx<F>(f: F)
where
    F: FnOnce(&mut Context, &TempDir),
{
    let dir = TempDir::new().unwrap();
    let config = Config::with_data_dir(dir.path());
    let store = JsonStore::open(dir.path()).unwrap();
    let mut ctx = Context::new(Box::new(store), open_authenticator(&config), today());
    cmd_login(&mut ctx, "tester@example.com", Some("Test Pilot".into()), true).unwrap();
    f(&mut ctx, &dir);
}

fn add_task(ctx: &mut Context, title: &str) {
    cmd_task_add(ctx, NewTask { title: title.into(), ..NewTask::default() }, true).unwrap();
}

#[test]
fn test_add_and_list() {
    with_test_ctx(|ctx, _dir| {
        let task = NewTask {
            title: "Test Task".into(),
            priority: Priority::High,
            due_date: Some(today()),
            ..NewTask::default()
        };
        cmd_task_add(ctx, task, true).unwrap();

        let tasks = ctx.store.tasks(&user(ctx), TaskScope::All).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Test Task");
        assert_eq!(tasks[0].priority, Priority::High);
        cmd_task_list(ctx, None, false, None).unwrap();
        cmd_task_list(ctx, None, true, Some(1)).unwrap();
    });
}

#[test]
fn test_commands_require_sign_in() {
    with_test_ctx(|ctx, _dir| {
        cmd_logout(ctx, true).unwrap();
        assert!(matches!(cmd_task_list(ctx, None, false, None), Err(Error::NotSignedIn)));
        assert!(matches!(cmd_dashboard(ctx, None), Err(Error::NotSignedIn)));
        cmd_whoami(ctx).unwrap();
    });
}

#[test]
fn test_session_is_stored_in_the_data_dir() {
    with_test_ctx(|ctx, dir| {
        let stored = SessionFile::new(dir.path());
        assert_eq!(stored.require_user().unwrap().id, user(ctx));
        assert_eq!(user(ctx).as_str(), "user-tester@example.com");
    });
}

#[test]
fn test_complete_and_undo_task() {
    with_test_ctx(|ctx, _dir| {
        add_task(ctx, "Task to complete");
        let id = ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].id;

        cmd_task_set_completed(ctx, id, true, true).unwrap();
        assert!(ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].completed);

        cmd_task_set_completed(ctx, id, false, true).unwrap();
        assert!(!ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].completed);
    });
}

#[test]
fn test_star_task() {
    with_test_ctx(|ctx, _dir| {
        add_task(ctx, "Shiny");
        let id = ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].id;
        cmd_task_set_starred(ctx, id, true, true).unwrap();
        assert!(ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].starred);
        cmd_task_set_starred(ctx, id, false, true).unwrap();
        assert!(!ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].starred);
    });
}

#[test]
fn test_remove_task() {
    with_test_ctx(|ctx, _dir| {
        add_task(ctx, "To remove");
        let id = ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].id;

        cmd_task_remove(ctx, id, true).unwrap();
        assert!(ctx.store.tasks(&user(ctx), TaskScope::All).unwrap().is_empty());
        assert!(matches!(cmd_task_remove(ctx, id, true), Err(Error::NotFound { kind: "task", .. })));
    });
}

#[test]
fn test_edit_task() {
    with_test_ctx(|ctx, _dir| {
        cmd_project_add(ctx, NewProject { title: "Work".into(), ..NewProject::default() }, true).unwrap();
        let project = ctx.store.projects(&user(ctx), ProjectScope::All).unwrap()[0].id;
        cmd_task_add(ctx, NewTask { title: "First draft".into(), due_date: Some(today()), ..NewTask::default() }, true)
            .unwrap();
        let id = ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].id;

        let patch = TaskPatch {
            title: Some("New Name".into()),
            priority: Some(Priority::Low),
            due_date: Some(None),
            project_id: Some(Some(project)),
            ..TaskPatch::default()
        };
        cmd_task_edit(ctx, id, patch, true).unwrap();

        let t = ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].clone();
        assert_eq!(t.title, "New Name");
        assert_eq!(t.priority, Priority::Low);
        assert_eq!(t.due_date, None);
        assert_eq!(t.project_id, Some(project));
    });
}

#[test]
fn test_unknown_project_is_rejected() {
    with_test_ctx(|ctx, _dir| {
        let task = NewTask { title: "Orphan".into(), project_id: Some(42), ..NewTask::default() };
        assert!(matches!(cmd_task_add(ctx, task, true), Err(Error::NotFound { kind: "project", id: 42 })));
        assert!(ctx.store.tasks(&user(ctx), TaskScope::All).unwrap().is_empty());
    });
}

#[test]
fn test_project_lifecycle() {
    with_test_ctx(|ctx, _dir| {
        cmd_project_add(ctx, NewProject { title: "Garden".into(), color: Some("#10b981".into()), ..NewProject::default() }, true)
            .unwrap();
        let project = ctx.store.projects(&user(ctx), ProjectScope::All).unwrap()[0].clone();
        assert_eq!(project.color, "#10b981");
        cmd_task_add(ctx, NewTask { title: "Plant".into(), project_id: Some(project.id), ..NewTask::default() }, true)
            .unwrap();

        cmd_project_complete(ctx, project.id, true).unwrap();
        assert!(ctx.store.projects(&user(ctx), ProjectScope::Active).unwrap().is_empty());
        cmd_project_list(ctx, true).unwrap();

        cmd_project_remove(ctx, project.id, true).unwrap();
        assert!(ctx.store.projects(&user(ctx), ProjectScope::All).unwrap().is_empty());
        assert_eq!(ctx.store.tasks(&user(ctx), TaskScope::All).unwrap()[0].project_id, None);
    });
}

#[test]
fn test_focus_set_done_and_edit() {
    with_test_ctx(|ctx, _dir| {
        let focus = NewFocus { focus_date: today(), title: "Ship".into(), description: None };
        cmd_focus_set(ctx, focus.clone(), true).unwrap();
        assert!(matches!(cmd_focus_set(ctx, focus, true), Err(Error::DuplicateFocus(_))));

        cmd_focus_done(ctx, None, true).unwrap();
        let saved = ctx.store.focuses(&user(ctx), DateRange::day(today())).unwrap();
        assert!(saved[0].completed);
        assert!(saved[0].completed_at.is_some());

        let patch = FocusPatch { description: Some(Some("All of it".into())), ..FocusPatch::default() };
        cmd_focus_edit(ctx, None, patch, true).unwrap();
        let saved = ctx.store.focuses(&user(ctx), DateRange::day(today())).unwrap();
        assert_eq!(saved[0].description.as_deref(), Some("All of it"));
        assert!(saved[0].completed);

        cmd_focus_done(ctx, Some(today()), true).unwrap();
        assert!(!ctx.store.focuses(&user(ctx), DateRange::day(today())).unwrap()[0].completed);

        cmd_focus_show(ctx, None).unwrap();
        cmd_focus_history(ctx).unwrap();
    });
}

#[test]
fn test_focus_commands_without_a_focus() {
    with_test_ctx(|ctx, _dir| {
        assert!(matches!(cmd_focus_done(ctx, None, true), Err(Error::NoFocus(d)) if d == today()));
        assert!(matches!(cmd_focus_show(ctx, None), Err(Error::NoFocus(_))));
        cmd_focus_history(ctx).unwrap();
    });
}

#[test]
fn test_reflect_merges_with_existing() {
    with_test_ctx(|ctx, _dir| {
        let first = ReflectionFields { accomplishments: Some("Shipped".into()), mood_rating: Some(3), ..Default::default() };
        cmd_reflect(ctx, None, first, true).unwrap();
        let second = ReflectionFields { learnings: Some("Sleep".into()), mood_rating: Some(4), ..Default::default() };
        cmd_reflect(ctx, None, second, true).unwrap();

        let saved = ctx.store.reflections(&user(ctx), DateRange::all()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].accomplishments.as_deref(), Some("Shipped"));
        assert_eq!(saved[0].learnings.as_deref(), Some("Sleep"));
        assert_eq!(saved[0].mood_rating, Some(4));

        // no fields only shows it
        cmd_reflect(ctx, None, ReflectionFields::default(), true).unwrap();
        assert_eq!(ctx.store.reflections(&user(ctx), DateRange::all()).unwrap(), saved);

        let bad = ReflectionFields { mood_rating: Some(9), ..Default::default() };
        assert!(matches!(cmd_reflect(ctx, None, bad, true), Err(Error::InvalidRating(9))));
    });
}

#[test]
fn test_wiki_add_edit_remove() {
    with_test_ctx(|ctx, _dir| {
        let changes = WikiChanges {
            title: Some("Deploy notes".into()),
            category: Some(WikiCategory::Work),
            tags: Some(vec!["ops".into(), "deploy".into()]),
            ..WikiChanges::default()
        };
        cmd_wiki_add(ctx, changes, true).unwrap();
        let entry = ctx.store.wiki_entries(&user(ctx)).unwrap()[0].clone();
        assert_eq!(entry.status, WikiStatus::Draft);
        assert!(!entry.is_public);

        let edit = WikiChanges {
            status: Some(WikiStatus::Published),
            is_public: Some(true),
            rating: Some(Some(4)),
            ..WikiChanges::default()
        };
        cmd_wiki_edit(ctx, entry.id, edit, true).unwrap();
        let edited = ctx.store.wiki_entries(&user(ctx)).unwrap()[0].clone();
        assert_eq!(edited.title, "Deploy notes");
        assert_eq!(edited.tags, vec!["ops", "deploy"]);
        assert_eq!(edited.status, WikiStatus::Published);
        assert!(edited.is_public);
        assert_eq!(edited.rating, Some(4));

        let filter = WikiFilter::parse("work", "published", "public", "OP").unwrap();
        cmd_wiki_list(ctx, &filter).unwrap();
        cmd_wiki_show(ctx, entry.id).unwrap();
        cmd_wiki_tags(ctx).unwrap();

        cmd_wiki_remove(ctx, entry.id, true).unwrap();
        assert!(ctx.store.wiki_entries(&user(ctx)).unwrap().is_empty());
        assert!(matches!(cmd_wiki_show(ctx, entry.id), Err(Error::NotFound { kind: "wiki entry", .. })));
    });
}

#[test]
fn test_wiki_edit_clears_tags_links_and_rating() {
    with_test_ctx(|ctx, _dir| {
        let changes = WikiChanges {
            title: Some("Reading list".into()),
            rating: Some(Some(3)),
            tags: Some(vec!["books".into(), "later".into()]),
            related_links: Some(vec!["https://example.com/list".into()]),
            ..WikiChanges::default()
        };
        cmd_wiki_add(ctx, changes, true).unwrap();
        let id = ctx.store.wiki_entries(&user(ctx)).unwrap()[0].id;

        // leaving the fields out keeps them
        let rename = WikiChanges { title: Some("Books to read".into()), ..WikiChanges::default() };
        cmd_wiki_edit(ctx, id, rename, true).unwrap();
        let kept = ctx.store.wiki_entries(&user(ctx)).unwrap()[0].clone();
        assert_eq!(kept.rating, Some(3));
        assert_eq!(kept.tags, vec!["books", "later"]);
        assert_eq!(kept.related_links.len(), 1);

        let clear = WikiChanges {
            rating: Some(None),
            tags: Some(Vec::new()),
            related_links: Some(Vec::new()),
            ..WikiChanges::default()
        };
        cmd_wiki_edit(ctx, id, clear, true).unwrap();
        let cleared = ctx.store.wiki_entries(&user(ctx)).unwrap()[0].clone();
        assert_eq!(cleared.title, "Books to read");
        assert_eq!(cleared.rating, None);
        assert!(cleared.tags.is_empty());
        assert!(cleared.related_links.is_empty());
    });
}

#[test]
fn test_wiki_add_requires_title() {
    with_test_ctx(|ctx, _dir| {
        assert!(matches!(cmd_wiki_add(ctx, WikiChanges::default(), true), Err(Error::EmptyTitle)));
    });
}

#[test]
fn test_dashboard_with_fixture_backend() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_data_dir(dir.path());
    config.backend = BackendKind::Fixture;
    let ctx = Context::new(open_backend(&config, today()).unwrap(), open_authenticator(&config), today());

    cmd_dashboard(&ctx, None).unwrap();
    cmd_dashboard(&ctx, Some(1)).unwrap();
    // nothing is written for the fixture backend
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
