use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{DashboardApp, InputMode};
use crate::display::{due_label, stars, stats_label, truncate};
use crate::models::{Priority, WikiStatus};
use crate::views::LoadStatus;

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn header_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn ui(f: &mut Frame, app: &mut DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Summary
            Constraint::Min(7),         // Tasks
            Constraint::Percentage(35), // Wiki
            Constraint::Length(3),      // Status
        ])
        .split(f.area());

    render_summary(f, app, chunks[0]);
    render_tasks(f, app, chunks[1]);
    render_wiki(f, app, chunks[2]);
    render_status(f, app, chunks[3]);

    if app.input_mode == InputMode::EditingTag {
        let area = centered_rect(50, 3, f.area());
        f.render_widget(Clear, area);
        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title("Filter wiki by tag"));
        f.render_widget(input, area);
    }
}

fn render_summary(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let view = app.view();
    let focus = match view.today_focus.record() {
        Some(focus) if focus.completed => Span::styled(format!("[x] {}", focus.title), Style::default().fg(Color::Green)),
        Some(focus) => Span::styled(format!("[ ] {}", focus.title), Style::default().fg(Color::Yellow)),
        None => Span::styled("none set", Style::default().fg(Color::DarkGray)),
    };
    let reflection = match view.today_reflection.record() {
        Some(r) => format!("written {}", stars(r.mood_rating)),
        None => "not written".to_string(),
    };

    let lines = vec![
        Line::from(format!(
            "Completed {} | High priority {} | Starred {} | Active projects {}",
            stats_label(&view.stats),
            view.high_priority_open,
            view.starred_open,
            view.active_projects,
        )),
        Line::from(vec![Span::raw("Today's focus: "), focus]),
        Line::from(format!("Reflection: {}", reflection)),
    ];
    let title = format!(
        "Mission Control | {} | {}",
        app.user.display_name(),
        app.today.format("%A, %B %-d")
    );
    let summary = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(summary, area);
}

fn render_tasks(f: &mut Frame, app: &mut DashboardApp, area: Rect) {
    let rows: Vec<Row> = app
        .upcoming()
        .into_iter()
        .map(|t| {
            let overdue = t.due_date.is_some_and(|d| d < app.today);
            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(if t.starred { "★" } else { "" }),
                Cell::from(truncate(&t.title, 48)),
                Cell::from(t.priority.as_str()).style(Style::default().fg(priority_color(t.priority))),
                Cell::from(due_label(t.due_date, app.today))
                    .style(if overdue { Style::default().fg(Color::Red) } else { Style::default() }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(2),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(12),
    ];

    let title = match app.filtered_project() {
        Some(p) => format!("Upcoming Tasks | project: {}", p.title),
        None => "Upcoming Tasks | all projects".to_string(),
    };
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "", "Title", "Priority", "Due"]).style(header_style()).bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_wiki(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let view = app.wiki_view();
    let rows: Vec<Row> = view
        .entries
        .iter()
        .map(|e| {
            let status_color = match e.status {
                WikiStatus::Published => Color::Green,
                WikiStatus::Draft => Color::Gray,
                WikiStatus::Archived => Color::DarkGray,
            };
            Row::new(vec![
                Cell::from(truncate(&e.title, 40)),
                Cell::from(e.category.as_str()),
                Cell::from(e.status.as_str()).style(Style::default().fg(status_color)),
                Cell::from(if e.is_public { "public" } else { "private" }),
                Cell::from(stars(e.rating)).style(Style::default().fg(Color::Yellow)),
                Cell::from(e.tags.join(", ")),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Min(10),
    ];

    let title = format!("Wiki {}/{} | {}", view.entries.len(), view.total, app.wiki_filter_label());
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Title", "Category", "Status", "Access", "Rating", "Tags"]).style(header_style()))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);
}

fn render_status(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let help = match app.input_mode {
        InputMode::Normal => {
            "q: Quit | j/k: Move | Space: Done | s: Star | p: Project | w: Category | e: Status | v: Access | /: Tag | f: Focus | r: Reload"
        }
        InputMode::EditingTag => "Enter: Apply | Esc: Cancel",
    };

    let (text, style) = match (&app.message, app.load_status) {
        (_, LoadStatus::Failed) => ("Could not load any data".to_string(), Style::default().fg(Color::Red)),
        (_, LoadStatus::Partial) => {
            let missing: Vec<&str> = app.failures.iter().map(|f| f.collection).collect();
            (format!("Partial data, failed to load: {}", missing.join(", ")), Style::default().fg(Color::Yellow))
        }
        (Some(message), LoadStatus::Complete) => (message.clone(), Style::default().fg(Color::White)),
        (None, LoadStatus::Complete) => ("Ready".to_string(), Style::default().fg(Color::Gray)),
    };

    let status = Paragraph::new(text).style(style).block(Block::default().borders(Borders::ALL).title(help));
    f.render_widget(status, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(margin), Constraint::Length(height), Constraint::Length(margin)])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
