//! Page-level views: fetch what a screen needs, then project it.
//!
//! Loading is the only fallible step and it never fails as a whole: a
//! collection that cannot be read is replaced by an empty one and recorded in
//! [`Loaded::failures`], so a screen always has something to render.

use chrono::{Days, NaiveDate};

use crate::error::Result;
use crate::models::{DailyFocus, DailyReflection, Priority, Project, Task, UserId, WikiEntry};
use crate::projector::{
    completion_stats, distinct_tags, filter_wiki_entries, rank_tasks, select_for_date, CompletionStats, DateScoped,
    Selection, TaskQuery, WikiFilter,
};
use crate::store::{DataSource, DateRange, ProjectScope, TaskScope};

/// How many days before today the focus history reaches back.
pub const FOCUS_HISTORY_DAYS: u64 = 7;

/// A collection that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub collection: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Every collection was fetched.
    Complete,
    /// Some collections failed and are shown empty.
    Partial,
    /// Nothing could be fetched; everything is shown empty.
    Failed,
}

/// Data for a screen plus what went wrong while fetching it.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub failures: Vec<FetchFailure>,
    attempted: usize,
}

impl<T> Loaded<T> {
    pub fn status(&self) -> LoadStatus {
        if self.failures.is_empty() {
            LoadStatus::Complete
        } else if self.failures.len() >= self.attempted {
            LoadStatus::Failed
        } else {
            LoadStatus::Partial
        }
    }
}

/// Runs one fetch; on error logs it, records it and yields an empty list.
struct Fetcher {
    failures: Vec<FetchFailure>,
    attempted: usize,
}

impl Fetcher {
    fn new() -> Self {
        Fetcher { failures: Vec::new(), attempted: 0 }
    }

    fn fetch<T>(&mut self, collection: &'static str, result: Result<Vec<T>>) -> Vec<T> {
        self.attempted += 1;
        match result {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(collection, error = %e, "fetch failed, showing empty collection");
                self.failures.push(FetchFailure { collection, message: e.to_string() });
                Vec::new()
            }
        }
    }

    fn finish<T>(self, data: T) -> Loaded<T> {
        Loaded { data, failures: self.failures, attempted: self.attempted }
    }
}

fn warn_if_duplicate<T: DateScoped>(records: &[T], date: NaiveDate, collection: &'static str) {
    if let Selection::Duplicate { count, .. } = select_for_date(records, date) {
        tracing::warn!(collection, %date, count, "more than one record for the same day, showing the first");
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    /// Today's focus (normally zero or one record).
    pub focus: Vec<DailyFocus>,
    /// Today's reflection (normally zero or one record).
    pub reflections: Vec<DailyReflection>,
    /// Open tasks and tasks due from today on.
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub wiki: Vec<WikiEntry>,
}

pub fn load_dashboard<S: DataSource + ?Sized>(source: &S, user: &UserId, today: NaiveDate) -> Loaded<DashboardData> {
    let mut fetcher = Fetcher::new();
    let data = DashboardData {
        focus: fetcher.fetch("focuses", source.focuses(user, DateRange::day(today))),
        reflections: fetcher.fetch("reflections", source.reflections(user, DateRange::day(today))),
        tasks: fetcher.fetch("tasks", source.tasks(user, TaskScope::Relevant { today })),
        projects: fetcher.fetch("projects", source.projects(user, ProjectScope::Active)),
        wiki: fetcher.fetch("wiki", source.wiki_entries(user)),
    };
    warn_if_duplicate(&data.focus, today, "focuses");
    warn_if_duplicate(&data.reflections, today, "reflections");
    fetcher.finish(data)
}

/// The dashboard, projected from [`DashboardData`].
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    /// Over every loaded task.
    pub stats: CompletionStats,
    pub high_priority_open: usize,
    pub starred_open: usize,
    pub active_projects: usize,
    pub today_focus: Selection<'a, DailyFocus>,
    pub today_reflection: Selection<'a, DailyReflection>,
    pub upcoming: Vec<&'a Task>,
}

impl<'a> DashboardView<'a> {
    pub fn build(data: &'a DashboardData, today: NaiveDate, project: Option<u64>) -> Self {
        let open = || data.tasks.iter().filter(|t| !t.completed);
        DashboardView {
            stats: completion_stats(&data.tasks),
            high_priority_open: open().filter(|t| t.priority == Priority::High).count(),
            starred_open: open().filter(|t| t.starred).count(),
            active_projects: data.projects.iter().filter(|p| !p.completed).count(),
            today_focus: select_for_date(&data.focus, today),
            today_reflection: select_for_date(&data.reflections, today),
            upcoming: rank_tasks(&data.tasks, &TaskQuery::dashboard(project)),
        }
    }
}

/// Focuses from [`FOCUS_HISTORY_DAYS`] days ago up to today, latest first.
/// Days after `today` are left out.
pub fn load_focus_history<S: DataSource + ?Sized>(
    source: &S,
    user: &UserId,
    today: NaiveDate,
) -> Loaded<Vec<DailyFocus>> {
    let since = today.checked_sub_days(Days::new(FOCUS_HISTORY_DAYS)).unwrap_or(NaiveDate::MIN);
    let mut fetcher = Fetcher::new();
    let focuses = fetcher.fetch("focuses", source.focuses(user, DateRange::between(since, today)));
    warn_if_duplicate(&focuses, today, "focuses");
    fetcher.finish(focuses)
}

/// The focus page: today's focus, a chosen day, and recent history.
#[derive(Debug, Clone)]
pub struct FocusView<'a> {
    pub today: Selection<'a, DailyFocus>,
    pub selected_date: NaiveDate,
    pub selected: Selection<'a, DailyFocus>,
    pub history: &'a [DailyFocus],
    /// Over `history`.
    pub stats: CompletionStats,
}

impl<'a> FocusView<'a> {
    pub fn build(history: &'a [DailyFocus], today: NaiveDate, selected_date: NaiveDate) -> Self {
        FocusView {
            today: select_for_date(history, today),
            selected_date,
            selected: select_for_date(history, selected_date),
            history,
            stats: completion_stats(history),
        }
    }
}

/// The wiki list with its filter choices.
#[derive(Debug, Clone)]
pub struct WikiView<'a> {
    pub entries: Vec<&'a WikiEntry>,
    /// Every tag across all entries, for the tag filter.
    pub tags: Vec<&'a str>,
    pub total: usize,
}

impl<'a> WikiView<'a> {
    pub fn build(entries: &'a [WikiEntry], filter: &WikiFilter) -> Self {
        WikiView {
            entries: filter_wiki_entries(entries, filter),
            tags: distinct_tags(entries),
            total: entries.len(),
        }
    }
}
