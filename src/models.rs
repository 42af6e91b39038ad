use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Opaque identifier of the user owning a record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Importance of a task or wiki entry. Ordered `Low < Medium < High`.
///
/// Stored values that are not one of the three names decode as `Low`, so a
/// malformed record ranks last instead of failing the whole collection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "unknown priority in stored record, ranking as low");
            Priority::Low
        })
    }
}

/// Publication state of a wiki entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WikiStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl WikiStatus {
    pub const ALL: [WikiStatus; 3] = [WikiStatus::Draft, WikiStatus::Published, WikiStatus::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            WikiStatus::Draft => "draft",
            WikiStatus::Published => "published",
            WikiStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for WikiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WikiStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(WikiStatus::Draft),
            "published" => Ok(WikiStatus::Published),
            "archived" => Ok(WikiStatus::Archived),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl From<String> for WikiStatus {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "unknown wiki status in stored record, treating as draft");
            WikiStatus::Draft
        })
    }
}

/// Fixed set of wiki categories.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WikiCategory {
    #[default]
    General,
    Work,
    Personal,
    Learning,
    Reference,
    Ideas,
    Projects,
}

impl WikiCategory {
    pub const ALL: [WikiCategory; 7] = [
        WikiCategory::General,
        WikiCategory::Work,
        WikiCategory::Personal,
        WikiCategory::Learning,
        WikiCategory::Reference,
        WikiCategory::Ideas,
        WikiCategory::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WikiCategory::General => "general",
            WikiCategory::Work => "work",
            WikiCategory::Personal => "personal",
            WikiCategory::Learning => "learning",
            WikiCategory::Reference => "reference",
            WikiCategory::Ideas => "ideas",
            WikiCategory::Projects => "projects",
        }
    }
}

impl fmt::Display for WikiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WikiCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        WikiCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

impl From<String> for WikiCategory {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "unknown wiki category in stored record, treating as general");
            WikiCategory::General
        })
    }
}

/// A single to-do item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub starred: bool,
    pub due_date: Option<NaiveDate>,
    /// Project this task belongs to. Not checked against the project list.
    pub project_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A group of tasks with a display colour.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: u64,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_PROJECT_COLOR: &str = "#6366f1";

fn default_color() -> String {
    DEFAULT_PROJECT_COLOR.to_string()
}

/// The one objective a user picked for a calendar day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyFocus {
    pub id: u64,
    pub user_id: UserId,
    pub focus_date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// End-of-day notes. One per user and day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyReflection {
    pub id: u64,
    pub user_id: UserId,
    pub reflection_date: NaiveDate,
    pub accomplishments: Option<String>,
    pub learnings: Option<String>,
    pub improvements: Option<String>,
    /// 1 to 5.
    pub mood_rating: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A note in the personal wiki.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WikiEntry {
    pub id: u64,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    /// Distinct, in the order they were added.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: WikiCategory,
    #[serde(default)]
    pub status: WikiStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_public: bool,
    /// 1 to 5 stars.
    pub rating: Option<u8>,
    #[serde(default)]
    pub related_links: Vec<String>,
    #[serde(default)]
    pub file_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parses a `YYYY-MM-DD` date given on the command line.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(raw.to_string()))
}
