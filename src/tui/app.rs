use chrono::NaiveDate;
use ratatui::widgets::TableState;

use crate::auth::User;
use crate::commands::{cmd_focus_done, cmd_task_set_completed, cmd_task_set_starred};
use crate::context::Context;
use crate::error::Result;
use crate::models::{Project, Task, WikiCategory, WikiEntry, WikiStatus};
use crate::projector::{rank_tasks, TaskQuery, Visibility, WikiFilter};
use crate::store::DataSource;
use crate::views::{load_dashboard, DashboardData, DashboardView, FetchFailure, LoadStatus, WikiView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing the wiki tag filter.
    EditingTag,
}

/// Next value in `None, options[0], .., options[n-1], None`.
fn cycle<T: Copy + PartialEq>(current: Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(value) => {
            let idx = options.iter().position(|o| *o == value)?;
            options.get(idx + 1).copied()
        }
    }
}

pub struct DashboardApp {
    pub user: User,
    pub today: NaiveDate,
    pub data: DashboardData,
    pub failures: Vec<FetchFailure>,
    pub load_status: LoadStatus,
    /// Restricts the task table to one project.
    pub project_filter: Option<u64>,
    pub wiki_filter: WikiFilter,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    /// Last action result, shown in the status line.
    pub message: Option<String>,
}

impl DashboardApp {
    pub fn new(user: User, today: NaiveDate) -> DashboardApp {
        DashboardApp {
            user,
            today,
            data: DashboardData::default(),
            failures: Vec::new(),
            load_status: LoadStatus::Complete,
            project_filter: None,
            wiki_filter: WikiFilter::default(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            message: None,
        }
    }

    /// Replaces the shown data with a fresh load from `source`.
    pub fn load<S: DataSource + ?Sized>(&mut self, source: &S) {
        let loaded = load_dashboard(source, &self.user.id, self.today);
        self.load_status = loaded.status();
        self.failures = loaded.failures;
        self.data = loaded.data;

        if let Some(id) = self.project_filter {
            if !self.data.projects.iter().any(|p| p.id == id) {
                self.project_filter = None;
            }
        }
        self.clamp_selection();
    }

    pub fn reload(&mut self, ctx: &Context) {
        self.load(&*ctx.store);
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView::build(&self.data, self.today, self.project_filter)
    }

    pub fn wiki_view(&self) -> WikiView<'_> {
        WikiView::build(&self.data.wiki, &self.wiki_filter)
    }

    pub fn upcoming(&self) -> Vec<&Task> {
        rank_tasks(&self.data.tasks, &TaskQuery::dashboard(self.project_filter))
    }

    pub fn filtered_project(&self) -> Option<&Project> {
        let id = self.project_filter?;
        self.data.projects.iter().find(|p| p.id == id)
    }

    pub fn wiki_entries(&self) -> Vec<&WikiEntry> {
        self.wiki_view().entries
    }

    fn clamp_selection(&mut self) {
        let len = self.upcoming().len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.upcoming().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.upcoming().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let i = self.state.selected()?;
        self.upcoming().get(i).copied()
    }

    fn report(&mut self, ctx: &Context, outcome: Result<String>) {
        self.message = Some(match outcome {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "dashboard action failed");
                format!("error: {e}")
            }
        });
        self.reload(ctx);
    }

    /// Marks the selected task as done.
    pub fn complete_selected(&mut self, ctx: &mut Context) {
        let Some(task) = self.selected_task() else { return };
        let (id, title) = (task.id, task.title.clone());
        let outcome = cmd_task_set_completed(ctx, id, true, true).map(|_| format!("Completed '{title}'"));
        self.report(ctx, outcome);
    }

    pub fn toggle_star_selected(&mut self, ctx: &mut Context) {
        let Some(task) = self.selected_task() else { return };
        let (id, starred) = (task.id, !task.starred);
        let outcome = cmd_task_set_starred(ctx, id, starred, true)
            .map(|_| if starred { "Starred".to_string() } else { "Unstarred".to_string() });
        self.report(ctx, outcome);
    }

    /// Toggles completion of today's focus, if one is set.
    pub fn toggle_focus(&mut self, ctx: &mut Context) {
        let completed = self.view().today_focus.record().map(|f| f.completed);
        let Some(completed) = completed else {
            self.message = Some("No focus set for today".to_string());
            return;
        };
        let done = !completed;
        let outcome = cmd_focus_done(ctx, Some(self.today), true)
            .map(|_| if done { "Focus completed".to_string() } else { "Focus reopened".to_string() });
        self.report(ctx, outcome);
    }

    /// All tasks, then each active project in turn.
    pub fn cycle_project(&mut self) {
        let ids: Vec<u64> = self.data.projects.iter().filter(|p| !p.completed).map(|p| p.id).collect();
        self.project_filter = cycle(self.project_filter, &ids);
        self.state.select(None);
        self.clamp_selection();
    }

    pub fn cycle_category(&mut self) {
        self.wiki_filter.category = cycle(self.wiki_filter.category, &WikiCategory::ALL);
    }

    pub fn cycle_status(&mut self) {
        self.wiki_filter.status = cycle(self.wiki_filter.status, &WikiStatus::ALL);
    }

    pub fn cycle_visibility(&mut self) {
        self.wiki_filter.visibility = match self.wiki_filter.visibility {
            Visibility::All => Visibility::Public,
            Visibility::Public => Visibility::Private,
            Visibility::Private => Visibility::All,
        };
    }

    pub fn start_tag_edit(&mut self) {
        self.input_mode = InputMode::EditingTag;
        self.input_buffer = self.wiki_filter.tag.clone();
    }

    pub fn finish_tag_edit(&mut self) {
        self.wiki_filter.tag = self.input_buffer.trim().to_string();
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// One-line description of the wiki filter.
    pub fn wiki_filter_label(&self) -> String {
        let f = &self.wiki_filter;
        format!(
            "category: {} | status: {} | {} | tag: {}",
            f.category.map_or("all", |c| c.as_str()),
            f.status.map_or("all", |s| s.as_str()),
            f.visibility,
            if f.tag.is_empty() { "-" } else { &f.tag },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{demo_user, FixtureAuth};
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn fixture_context() -> Context {
        let store = MemoryStore::with_fixture(&demo_user().id, today(), Utc::now());
        Context::new(Box::new(store), Box::new(FixtureAuth), today())
    }

    fn loaded_app(ctx: &Context) -> DashboardApp {
        let mut app = DashboardApp::new(demo_user(), today());
        app.reload(ctx);
        app
    }

    #[test]
    fn cycle_walks_options_then_back_to_none() {
        let options = [1, 2, 3];
        assert_eq!(cycle(None, &options), Some(1));
        assert_eq!(cycle(Some(1), &options), Some(2));
        assert_eq!(cycle(Some(3), &options), None);
        assert_eq!(cycle(None, &[] as &[u8]), None);
    }

    #[test]
    fn project_filter_cycles_through_active_projects() {
        let ctx = fixture_context();
        let mut app = loaded_app(&ctx);
        let active: Vec<u64> = app.data.projects.iter().map(|p| p.id).collect();
        assert!(!active.is_empty());

        for id in &active {
            app.cycle_project();
            assert_eq!(app.project_filter, Some(*id));
            assert!(app.upcoming().iter().all(|t| t.project_id == Some(*id)));
        }
        app.cycle_project();
        assert_eq!(app.project_filter, None);
    }

    #[test]
    fn wiki_filters_cycle_and_narrow_entries() {
        let ctx = fixture_context();
        let mut app = loaded_app(&ctx);
        let total = app.wiki_entries().len();

        app.cycle_category();
        assert_eq!(app.wiki_filter.category, Some(WikiCategory::General));
        app.cycle_status();
        assert_eq!(app.wiki_filter.status, Some(WikiStatus::Draft));

        app.wiki_filter = WikiFilter::default();
        app.cycle_visibility();
        assert_eq!(app.wiki_filter.visibility, Visibility::Public);
        assert!(app.wiki_entries().iter().all(|e| e.is_public));
        assert!(app.wiki_entries().len() < total);
        app.cycle_visibility();
        app.cycle_visibility();
        assert_eq!(app.wiki_filter.visibility, Visibility::All);
        assert_eq!(app.wiki_entries().len(), total);
    }

    #[test]
    fn tag_edit_sets_the_filter() {
        let ctx = fixture_context();
        let mut app = loaded_app(&ctx);
        app.start_tag_edit();
        assert_eq!(app.input_mode, InputMode::EditingTag);
        app.input_buffer.push_str(" ROUTINE ");
        app.finish_tag_edit();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.wiki_filter.tag, "ROUTINE");
        let titles: Vec<&str> = app.wiki_entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Launch checklist"]);
    }

    #[test]
    fn completing_the_selected_task_removes_it_from_the_table() {
        let mut ctx = fixture_context();
        let mut app = loaded_app(&ctx);
        let before = app.upcoming().len();
        let first = app.selected_task().map(|t| t.id);
        assert!(first.is_some());

        app.complete_selected(&mut ctx);

        assert_eq!(app.upcoming().len(), before - 1);
        assert_ne!(app.selected_task().map(|t| t.id), first);
        assert_eq!(app.view().stats.completed, 2);
    }

    #[test]
    fn toggle_focus_flips_todays_focus() {
        let mut ctx = fixture_context();
        let mut app = loaded_app(&ctx);
        assert_eq!(app.view().today_focus.record().map(|f| f.completed), Some(false));

        app.toggle_focus(&mut ctx);
        assert_eq!(app.view().today_focus.record().map(|f| f.completed), Some(true));
        app.toggle_focus(&mut ctx);
        assert_eq!(app.view().today_focus.record().map(|f| f.completed), Some(false));
    }
}
