use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{DailyFocus, Priority, Project, Task, WikiEntry, WikiStatus};
use crate::projector::CompletionStats;

const TITLE_WIDTH: usize = 48;
const SUMMARY_WIDTH: usize = 40;

/// Cuts `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max).collect();
    format!("{kept}...")
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub fn status_color(status: WikiStatus) -> Color {
    match status {
        WikiStatus::Draft => Color::Grey,
        WikiStatus::Published => Color::Green,
        WikiStatus::Archived => Color::DarkGrey,
    }
}

/// "Today", "3d", "2d overdue" or "-" for undated.
pub fn due_label(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due else {
        return "-".to_string();
    };
    let days_left = (due - today).num_days();
    if days_left < 0 {
        format!("{}d overdue", days_left.abs())
    } else if days_left == 0 {
        "Today".to_string()
    } else {
        format!("{}d", days_left)
    }
}

/// `"3/4 (75%)"`.
pub fn stats_label(stats: &CompletionStats) -> String {
    format!("{}/{} ({}%)", stats.completed, stats.total, stats.percentage)
}

/// 1 to 5 stars, empty when unrated.
pub fn stars(rating: Option<u8>) -> String {
    match rating {
        Some(r) => (1..=5).map(|i| if i <= r { '★' } else { '☆' }).collect(),
        None => String::new(),
    }
}

fn with_emoji(emoji: &Option<String>, title: &str) -> String {
    match emoji {
        Some(e) => format!("{e} {title}"),
        None => title.to_string(),
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|n| Cell::new(n).add_attribute(Attribute::Bold)).collect()
}

fn new_table(names: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(names));
    table
}

pub fn tasks_table(tasks: &[&Task], projects: &[Project], today: NaiveDate) -> Table {
    let mut table = new_table(&["ID", "", "Title", "Priority", "Project", "Due", "Status"]);
    for t in tasks {
        let project = t
            .project_id
            .and_then(|id| projects.iter().find(|p| p.id == id))
            .map(|p| with_emoji(&p.emoji, &p.title))
            .unwrap_or_default();
        let overdue = !t.completed && t.due_date.is_some_and(|d| d < today);
        let (status, status_color) = if t.completed { ("Done", Color::Green) } else { ("Open", Color::Yellow) };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(if t.starred { "★" } else { "" }).fg(Color::Yellow),
            Cell::new(truncate(&with_emoji(&t.emoji, &t.title), TITLE_WIDTH)),
            Cell::new(t.priority).fg(priority_color(t.priority)),
            Cell::new(project),
            Cell::new(due_label(t.due_date, today)).fg(if overdue { Color::Red } else { Color::Reset }),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}

pub fn projects_table(projects: &[Project], tasks: &[Task]) -> Table {
    let mut table = new_table(&["ID", "Title", "Color", "Open Tasks", "Status"]);
    for p in projects {
        let open = tasks.iter().filter(|t| t.project_id == Some(p.id) && !t.completed).count();
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(truncate(&with_emoji(&p.emoji, &p.title), TITLE_WIDTH)),
            Cell::new(&p.color),
            Cell::new(open),
            Cell::new(if p.completed { "Done" } else { "Active" }),
        ]);
    }
    table
}

pub fn focus_history_table(focuses: &[DailyFocus], today: NaiveDate) -> Table {
    let mut table = new_table(&["Date", "Focus", "Status"]);
    for f in focuses {
        let date = if f.focus_date == today { format!("{} (today)", f.focus_date) } else { f.focus_date.to_string() };
        let (status, color) = if f.completed { ("Completed", Color::Green) } else { ("In Progress", Color::Yellow) };
        table.add_row(vec![
            Cell::new(date),
            Cell::new(truncate(&f.title, TITLE_WIDTH)),
            Cell::new(status).fg(color),
        ]);
    }
    table
}

pub fn wiki_table(entries: &[&WikiEntry]) -> Table {
    let mut table = new_table(&["ID", "Title", "Category", "Status", "Priority", "Public", "Rating", "Tags"]);
    for e in entries {
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(truncate(&e.title, SUMMARY_WIDTH)),
            Cell::new(e.category),
            Cell::new(e.status).fg(status_color(e.status)),
            Cell::new(e.priority).fg(priority_color(e.priority)),
            Cell::new(if e.is_public { "yes" } else { "no" }),
            Cell::new(stars(e.rating)).fg(Color::Yellow),
            Cell::new(e.tags.join(", ")),
        ]);
    }
    table
}
