pub mod app;
pub mod ui;

use std::io;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::context::Context;
use crate::error::Result;
use app::{DashboardApp, InputMode};
use ui::ui;

/// Runs the interactive dashboard until the user quits.
pub fn run_tui(ctx: &mut Context) -> Result<()> {
    // Fails before touching the terminal when nobody is signed in
    let user = ctx.user()?;
    let mut app = DashboardApp::new(user, ctx.today);
    app.reload(ctx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, ctx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut DashboardApp, ctx: &mut Context) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') => app.complete_selected(ctx),
                KeyCode::Char('s') => app.toggle_star_selected(ctx),
                KeyCode::Char('p') => app.cycle_project(),
                KeyCode::Char('w') => app.cycle_category(),
                KeyCode::Char('e') => app.cycle_status(),
                KeyCode::Char('v') => app.cycle_visibility(),
                KeyCode::Char('/') => app.start_tag_edit(),
                KeyCode::Char('f') => app.toggle_focus(ctx),
                KeyCode::Char('r') => {
                    app.reload(ctx);
                    app.message = Some("Reloaded".to_string());
                }
                _ => {}
            },
            InputMode::EditingTag => match key.code {
                KeyCode::Enter => app.finish_tag_edit(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Char(c) => app.input_buffer.push(c),
                KeyCode::Backspace => {
                    app.input_buffer.pop();
                }
                _ => {}
            },
        }
    }
}
