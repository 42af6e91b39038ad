use chrono::NaiveDate;

use crate::auth::User;
use crate::context::Context;
use crate::display::{focus_history_table, projects_table, stars, stats_label, tasks_table, truncate, wiki_table};
use crate::error::{Error, Result};
use crate::models::{DailyFocus, Priority, Project, UserId, WikiCategory, WikiEntry, WikiStatus};
use crate::projector::{completion_stats, distinct_tags, rank_tasks, select_for_date, Selection, TaskQuery, WikiFilter};
use crate::store::{
    DateRange, FocusPatch, NewFocus, NewProject, NewTask, ProjectPatch, ProjectScope, ReflectionInput, TaskPatch,
    TaskScope, WikiDraft,
};
use crate::views::{load_dashboard, load_focus_history, DashboardView, FocusView, LoadStatus, Loaded, WikiView};

const NOTE_WIDTH: usize = 72;

/// Prints one line per collection that could not be loaded.
fn report_failures<T>(loaded: &Loaded<T>) {
    for failure in &loaded.failures {
        eprintln!("warning: could not load {}: {}", failure.collection, failure.message);
    }
    if loaded.status() == LoadStatus::Failed {
        eprintln!("warning: nothing could be loaded, showing empty data");
    }
}

/// Projects shown next to tasks. Missing projects only lose the label.
fn project_labels(ctx: &Context, user: &UserId) -> Vec<Project> {
    ctx.store.projects(user, ProjectScope::All).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load projects for labels");
        Vec::new()
    })
}

fn ensure_project(ctx: &Context, user: &UserId, id: u64) -> Result<()> {
    let projects = ctx.store.projects(user, ProjectScope::All)?;
    if projects.iter().any(|p| p.id == id) {
        Ok(())
    } else {
        Err(Error::NotFound { kind: "project", id })
    }
}

/// The focus for `date`; the first one if the day somehow has several.
fn focus_for(ctx: &Context, user: &UserId, date: NaiveDate) -> Result<DailyFocus> {
    let focuses = ctx.store.focuses(user, DateRange::day(date))?;
    let selection = select_for_date(&focuses, date);
    if let Selection::Duplicate { count, .. } = selection {
        tracing::warn!(%date, count, "more than one focus for the same day, using the first");
    }
    selection.record().cloned().ok_or(Error::NoFocus(date))
}

pub fn cmd_login(ctx: &mut Context, email: &str, name: Option<String>, silent: bool) -> Result<()> {
    let user = ctx.auth.sign_in(email, name)?;
    if !silent {
        println!("Signed in as {} <{}>.", user.display_name(), user.email);
    }
    Ok(())
}

pub fn cmd_logout(ctx: &mut Context, silent: bool) -> Result<()> {
    ctx.auth.sign_out()?;
    if !silent {
        println!("Signed out.");
    }
    Ok(())
}

pub fn cmd_whoami(ctx: &Context) -> Result<()> {
    match ctx.auth.current_user()? {
        Some(user) => println!("{} ({}) <{}>", user.display_name(), user.initials(), user.email),
        None => println!("Not signed in."),
    }
    Ok(())
}

fn print_dashboard(user: &User, view: &DashboardView<'_>, ctx: &Context, projects: &[Project], wiki_count: usize) {
    println!("Mission Control | {} | {}", user.display_name(), ctx.today.format("%A, %B %-d"));
    println!();
    println!("  Completed       {}", stats_label(&view.stats));
    println!("  High priority   {}", view.high_priority_open);
    println!("  Starred         {}", view.starred_open);
    println!("  Active projects {}", view.active_projects);
    println!("  Wiki entries    {}", wiki_count);
    println!();

    match view.today_focus.record() {
        Some(focus) => {
            let mark = if focus.completed { "[x]" } else { "[ ]" };
            println!("Today's focus: {} {}", mark, focus.title);
        }
        None => println!("Today's focus: none set (cosmic focus set <title>)"),
    }
    match view.today_reflection.record() {
        Some(reflection) => println!("Today's reflection: written, mood {}", stars(reflection.mood_rating)),
        None => println!("Today's reflection: not written yet"),
    }
    println!();

    if view.upcoming.is_empty() {
        println!("No open tasks.");
    } else {
        println!("{}", tasks_table(&view.upcoming, projects, ctx.today));
    }
}

/// Prints the dashboard. Collections that fail to load are shown empty.
pub fn cmd_dashboard(ctx: &Context, project: Option<u64>) -> Result<()> {
    let user = ctx.user()?;
    let loaded = load_dashboard(&*ctx.store, &user.id, ctx.today);
    report_failures(&loaded);

    let view = DashboardView::build(&loaded.data, ctx.today, project);
    print_dashboard(&user, &view, ctx, &loaded.data.projects, loaded.data.wiki.len());
    Ok(())
}

pub fn cmd_task_add(ctx: &mut Context, task: NewTask, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    if let Some(project) = task.project_id {
        ensure_project(ctx, &user.id, project)?;
    }
    let task = ctx.store.create_task(&user.id, task)?;
    if !silent {
        println!("Task added (id = {})", task.id);
    }
    Ok(())
}

/// Lists open tasks in dashboard order, or every task newest first with `all`.
pub fn cmd_task_list(ctx: &Context, project: Option<u64>, all: bool, limit: Option<usize>) -> Result<()> {
    let user = ctx.user()?;
    let tasks = ctx.store.tasks(&user.id, TaskScope::All)?;
    let shown = if all {
        let mut shown: Vec<_> = tasks.iter().filter(|t| project.is_none() || t.project_id == project).collect();
        if let Some(limit) = limit {
            shown.truncate(limit);
        }
        shown
    } else {
        rank_tasks(&tasks, &TaskQuery { project, limit })
    };

    if shown.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    let projects = project_labels(ctx, &user.id);
    println!("{}", tasks_table(&shown, &projects, ctx.today));
    println!("{} done", stats_label(&completion_stats(&tasks)));
    Ok(())
}

pub fn cmd_task_set_completed(ctx: &mut Context, id: u64, completed: bool, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let patch = TaskPatch { completed: Some(completed), ..TaskPatch::default() };
    ctx.store.update_task(&user.id, id, patch)?;
    if !silent {
        if completed {
            println!("Task {} marked as done.", id);
        } else {
            println!("Task {} reopened.", id);
        }
    }
    Ok(())
}

pub fn cmd_task_set_starred(ctx: &mut Context, id: u64, starred: bool, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let patch = TaskPatch { starred: Some(starred), ..TaskPatch::default() };
    ctx.store.update_task(&user.id, id, patch)?;
    if !silent {
        println!("Task {} {}.", id, if starred { "starred" } else { "unstarred" });
    }
    Ok(())
}

pub fn cmd_task_edit(ctx: &mut Context, id: u64, patch: TaskPatch, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    if let Some(Some(project)) = patch.project_id {
        ensure_project(ctx, &user.id, project)?;
    }
    ctx.store.update_task(&user.id, id, patch)?;
    if !silent {
        println!("Task {} updated.", id);
    }
    Ok(())
}

pub fn cmd_task_remove(ctx: &mut Context, id: u64, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    ctx.store.delete_task(&user.id, id)?;
    if !silent {
        println!("Task {} removed.", id);
    }
    Ok(())
}

pub fn cmd_project_add(ctx: &mut Context, project: NewProject, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let project = ctx.store.create_project(&user.id, project)?;
    if !silent {
        println!("Project added (id = {})", project.id);
    }
    Ok(())
}

pub fn cmd_project_list(ctx: &Context, all: bool) -> Result<()> {
    let user = ctx.user()?;
    let scope = if all { ProjectScope::All } else { ProjectScope::Active };
    let projects = ctx.store.projects(&user.id, scope)?;
    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }
    let tasks = ctx.store.tasks(&user.id, TaskScope::All).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load tasks for project counts");
        Vec::new()
    });
    println!("{}", projects_table(&projects, &tasks));
    Ok(())
}

pub fn cmd_project_complete(ctx: &mut Context, id: u64, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let patch = ProjectPatch { completed: Some(true), ..ProjectPatch::default() };
    ctx.store.update_project(&user.id, id, patch)?;
    if !silent {
        println!("Project {} marked as done.", id);
    }
    Ok(())
}

/// Removes a project. Its tasks are kept without a project.
pub fn cmd_project_remove(ctx: &mut Context, id: u64, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    ctx.store.delete_project(&user.id, id)?;
    if !silent {
        println!("Project {} removed.", id);
    }
    Ok(())
}

pub fn cmd_focus_set(ctx: &mut Context, focus: NewFocus, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let focus = ctx.store.create_focus(&user.id, focus)?;
    if !silent {
        println!("Focus for {} set: {}", focus.focus_date, focus.title);
    }
    Ok(())
}

pub fn cmd_focus_edit(ctx: &mut Context, date: Option<NaiveDate>, patch: FocusPatch, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let date = date.unwrap_or(ctx.today);
    let focus = focus_for(ctx, &user.id, date)?;
    ctx.store.update_focus(&user.id, focus.id, patch)?;
    if !silent {
        println!("Focus for {} updated.", date);
    }
    Ok(())
}

/// Toggles completion of the focus for `date` (default today).
pub fn cmd_focus_done(ctx: &mut Context, date: Option<NaiveDate>, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let date = date.unwrap_or(ctx.today);
    let focus = focus_for(ctx, &user.id, date)?;
    let patch = FocusPatch { completed: Some(!focus.completed), ..FocusPatch::default() };
    let focus = ctx.store.update_focus(&user.id, focus.id, patch)?;
    if !silent {
        if focus.completed {
            println!("Focus for {} completed.", date);
        } else {
            println!("Focus for {} reopened.", date);
        }
    }
    Ok(())
}

pub fn cmd_focus_show(ctx: &Context, date: Option<NaiveDate>) -> Result<()> {
    let user = ctx.user()?;
    let date = date.unwrap_or(ctx.today);
    let focus = focus_for(ctx, &user.id, date)?;
    let status = if focus.completed { "completed" } else { "in progress" };
    println!("{}  {} ({})", focus.focus_date, focus.title, status);
    if let Some(description) = &focus.description {
        println!();
        println!("{}", description);
    }
    if let Some(at) = focus.completed_at {
        println!();
        println!("Completed at {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

/// The last week of focuses with a completion rate.
pub fn cmd_focus_history(ctx: &Context) -> Result<()> {
    let user = ctx.user()?;
    let loaded = load_focus_history(&*ctx.store, &user.id, ctx.today);
    report_failures(&loaded);

    let view = FocusView::build(&loaded.data, ctx.today, ctx.today);
    if view.history.is_empty() {
        println!("No focus set in the last week.");
        return Ok(());
    }
    println!("{}", focus_history_table(view.history, ctx.today));
    println!("{} completed", stats_label(&view.stats));
    Ok(())
}

/// Fields of a reflection given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReflectionFields {
    pub accomplishments: Option<String>,
    pub learnings: Option<String>,
    pub improvements: Option<String>,
    pub mood_rating: Option<u8>,
}

impl ReflectionFields {
    pub fn is_empty(&self) -> bool {
        self.accomplishments.is_none()
            && self.learnings.is_none()
            && self.improvements.is_none()
            && self.mood_rating.is_none()
    }
}

/// Without fields, shows the reflection for `date`. With fields, saves it,
/// keeping whatever was written before for fields not given.
pub fn cmd_reflect(ctx: &mut Context, date: Option<NaiveDate>, fields: ReflectionFields, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let date = date.unwrap_or(ctx.today);
    let existing = ctx.store.reflections(&user.id, DateRange::day(date))?;
    let current = select_for_date(&existing, date).record().cloned();

    if fields.is_empty() {
        match current {
            Some(r) => {
                println!("Reflection for {}  {}", date, stars(r.mood_rating));
                for (label, text) in [
                    ("Accomplishments", &r.accomplishments),
                    ("Learnings", &r.learnings),
                    ("Improvements", &r.improvements),
                ] {
                    println!();
                    println!("{}:", label);
                    println!("  {}", text.as_deref().unwrap_or("-"));
                }
            }
            None => println!("No reflection for {}.", date),
        }
        return Ok(());
    }

    let input = match current {
        Some(r) => ReflectionInput {
            reflection_date: date,
            accomplishments: fields.accomplishments.or(r.accomplishments),
            learnings: fields.learnings.or(r.learnings),
            improvements: fields.improvements.or(r.improvements),
            mood_rating: fields.mood_rating.or(r.mood_rating),
        },
        None => ReflectionInput {
            reflection_date: date,
            accomplishments: fields.accomplishments,
            learnings: fields.learnings,
            improvements: fields.improvements,
            mood_rating: fields.mood_rating,
        },
    };
    ctx.store.save_reflection(&user.id, input)?;
    if !silent {
        println!("Reflection for {} saved.", date);
    }
    Ok(())
}

/// Wiki fields given on the command line. `None` leaves the entry's value
/// alone; `Some(None)` clears the rating and `Some(vec![])` clears a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WikiChanges {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<WikiCategory>,
    pub status: Option<WikiStatus>,
    pub priority: Option<Priority>,
    pub is_public: Option<bool>,
    pub rating: Option<Option<u8>>,
    pub tags: Option<Vec<String>>,
    pub related_links: Option<Vec<String>>,
}

impl WikiChanges {
    pub fn apply(self, draft: &mut WikiDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(summary) = self.summary {
            draft.summary = summary;
        }
        if let Some(content) = self.content {
            draft.content = content;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(is_public) = self.is_public {
            draft.is_public = is_public;
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if let Some(tags) = self.tags {
            draft.tags = tags;
        }
        if let Some(links) = self.related_links {
            draft.related_links = links;
        }
    }
}

pub fn cmd_wiki_add(ctx: &mut Context, changes: WikiChanges, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let mut draft = WikiDraft::default();
    changes.apply(&mut draft);
    let entry = ctx.store.create_wiki_entry(&user.id, draft)?;
    if !silent {
        println!("Wiki entry added (id = {})", entry.id);
    }
    Ok(())
}

fn wiki_entry(ctx: &Context, user: &UserId, id: u64) -> Result<WikiEntry> {
    ctx.store
        .wiki_entries(user)?
        .into_iter()
        .find(|e| e.id == id)
        .ok_or(Error::NotFound { kind: "wiki entry", id })
}

pub fn cmd_wiki_edit(ctx: &mut Context, id: u64, changes: WikiChanges, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    let entry = wiki_entry(ctx, &user.id, id)?;
    let mut draft = WikiDraft::from(&entry);
    changes.apply(&mut draft);
    ctx.store.update_wiki_entry(&user.id, id, draft)?;
    if !silent {
        println!("Wiki entry {} updated.", id);
    }
    Ok(())
}

pub fn cmd_wiki_list(ctx: &Context, filter: &WikiFilter) -> Result<()> {
    let user = ctx.user()?;
    let entries = ctx.store.wiki_entries(&user.id)?;
    let view = WikiView::build(&entries, filter);
    if view.entries.is_empty() {
        println!("No wiki entries found.");
        return Ok(());
    }
    println!("{}", wiki_table(&view.entries));
    println!("{} of {} entries", view.entries.len(), view.total);
    Ok(())
}

pub fn cmd_wiki_show(ctx: &Context, id: u64) -> Result<()> {
    let user = ctx.user()?;
    let e = wiki_entry(ctx, &user.id, id)?;
    println!("{}  {}", e.title, stars(e.rating));
    println!(
        "{} | {} | {} priority | {}",
        e.category,
        e.status,
        e.priority,
        if e.is_public { "public" } else { "private" }
    );
    if !e.tags.is_empty() {
        println!("tags: {}", e.tags.join(", "));
    }
    if !e.summary.is_empty() {
        println!();
        println!("{}", truncate(&e.summary, NOTE_WIDTH));
    }
    if !e.content.is_empty() {
        println!();
        println!("{}", e.content);
    }
    for link in e.related_links.iter().chain(&e.file_urls) {
        println!("  -> {}", link);
    }
    println!();
    println!("updated {}", e.updated_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

pub fn cmd_wiki_remove(ctx: &mut Context, id: u64, silent: bool) -> Result<()> {
    let user = ctx.user()?;
    ctx.store.delete_wiki_entry(&user.id, id)?;
    if !silent {
        println!("Wiki entry {} removed.", id);
    }
    Ok(())
}

pub fn cmd_wiki_tags(ctx: &Context) -> Result<()> {
    let user = ctx.user()?;
    let entries = ctx.store.wiki_entries(&user.id)?;
    let tags = distinct_tags(&entries);
    if tags.is_empty() {
        println!("No tags yet.");
    } else {
        println!("{}", tags.join(", "));
    }
    Ok(())
}

