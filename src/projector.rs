//! Pure projections from fetched records to what the screens display.
//!
//! Nothing in here performs I/O or mutates its input. Every function is a
//! total function over well-formed records: unknown enum values are already
//! normalised when records are decoded (see [`crate::models`]).

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{DailyFocus, DailyReflection, Project, Task, WikiCategory, WikiEntry, WikiStatus};

/// Number of tasks the dashboard shows under "Upcoming Tasks".
pub const DASHBOARD_TASK_LIMIT: usize = 5;

/// Which tasks [`rank_tasks`] keeps and how many it returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub project: Option<u64>,
    pub limit: Option<usize>,
}

impl TaskQuery {
    pub fn dashboard(project: Option<u64>) -> Self {
        TaskQuery { project, limit: Some(DASHBOARD_TASK_LIMIT) }
    }
}

/// Open tasks in the order they should be worked on.
///
/// Completed tasks and tasks outside `query.project` are dropped. The rest is
/// ordered by priority (high first), then starred first, then due date
/// (earliest first, undated last). Exact ties keep their input order.
pub fn rank_tasks<'a>(tasks: &'a [Task], query: &TaskQuery) -> Vec<&'a Task> {
    let mut ranked: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.completed)
        .filter(|t| query.project.is_none() || t.project_id == query.project)
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.starred.cmp(&a.starred))
            .then_with(|| due_order(a.due_date, b.due_date))
    });

    if let Some(limit) = query.limit {
        ranked.truncate(limit);
    }
    ranked
}

fn due_order(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Records that can be done or not done.
pub trait Completable {
    fn is_completed(&self) -> bool;
}

impl Completable for Task {
    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Completable for Project {
    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Completable for DailyFocus {
    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl<T: Completable + ?Sized> Completable for &T {
    fn is_completed(&self) -> bool {
        (**self).is_completed()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent, 0 for an empty set.
    pub percentage: u8,
}

pub fn completion_stats<T: Completable>(items: &[T]) -> CompletionStats {
    let total = items.len();
    let completed = items.iter().filter(|i| i.is_completed()).count();
    let percentage = if total == 0 {
        0
    } else {
        (completed as f64 * 100.0 / total as f64).round() as u8
    };
    CompletionStats { completed, total, percentage }
}

/// Records that exist at most once per user and calendar day.
pub trait DateScoped {
    fn scope_date(&self) -> NaiveDate;
}

impl DateScoped for DailyFocus {
    fn scope_date(&self) -> NaiveDate {
        self.focus_date
    }
}

impl DateScoped for DailyReflection {
    fn scope_date(&self) -> NaiveDate {
        self.reflection_date
    }
}

/// Result of looking up the record for one day.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a, T> {
    None,
    Unique(&'a T),
    /// More than one record for the day. `first` is the one to show; the
    /// caller should report the anomaly.
    Duplicate { first: &'a T, count: usize },
}

impl<'a, T> Selection<'a, T> {
    pub fn record(&self) -> Option<&'a T> {
        match *self {
            Selection::None => None,
            Selection::Unique(r) => Some(r),
            Selection::Duplicate { first, .. } => Some(first),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Selection::Duplicate { .. })
    }
}

pub fn select_for_date<T: DateScoped>(records: &[T], date: NaiveDate) -> Selection<'_, T> {
    let mut matches = records.iter().filter(|r| r.scope_date() == date);
    let Some(first) = matches.next() else {
        return Selection::None;
    };
    match matches.count() {
        0 => Selection::Unique(first),
        extra => Selection::Duplicate { first, count: extra + 1 },
    }
}

/// Public/private constraint of a [`WikiFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    All,
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::All => "all",
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    fn admits(&self, is_public: bool) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Public => is_public,
            Visibility::Private => !is_public,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Visibility::All),
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            _ => Err(Error::InvalidVisibility(s.to_string())),
        }
    }
}

/// Conjunctive filter over wiki entries. Every unset field admits everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiFilter {
    pub category: Option<WikiCategory>,
    pub status: Option<WikiStatus>,
    pub visibility: Visibility,
    /// Case-insensitive substring of any tag. Empty means no constraint.
    pub tag: String,
}

impl WikiFilter {
    /// Builds a filter from loose strings where `"all"` or an empty value
    /// means unconstrained.
    pub fn parse(category: &str, status: &str, visibility: &str, tag: &str) -> Result<Self> {
        Ok(WikiFilter {
            category: parse_or_all(category)?,
            status: parse_or_all(status)?,
            visibility: visibility.parse()?,
            tag: tag.trim().to_string(),
        })
    }

    pub fn matches(&self, entry: &WikiEntry) -> bool {
        if self.category.is_some_and(|c| c != entry.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != entry.status) {
            return false;
        }
        if !self.visibility.admits(entry.is_public) {
            return false;
        }
        if !self.tag.is_empty() {
            let needle = self.tag.to_lowercase();
            return entry.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        }
        true
    }
}

fn parse_or_all<T: FromStr<Err = Error>>(raw: &str) -> Result<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

pub fn filter_wiki_entries<'a>(entries: &'a [WikiEntry], filter: &WikiFilter) -> Vec<&'a WikiEntry> {
    entries.iter().filter(|e| filter.matches(e)).collect()
}

/// Every tag used by `entries`, in first-seen order.
pub fn distinct_tags(entries: &[WikiEntry]) -> Vec<&str> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .flat_map(|e| e.tags.iter())
        .map(String::as_str)
        .filter(|t| seen.insert(*t))
        .collect()
}
