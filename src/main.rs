//! # cosmic
//!
//! A personal mission control for the terminal: tasks and projects, one
//! daily focus, an end-of-day reflection and a small personal wiki.
//!
//! ## Usage
//!
//! ```bash
//! # Sign in (the identity every record is scoped to)
//! cosmic login ada@example.com --name "Ada Lovelace"
//!
//! # Interactive dashboard (also the default with no subcommand)
//! cosmic ui
//!
//! # Dashboard summary on stdout
//! cosmic dashboard
//!
//! # Tasks
//! cosmic task add "Write report" -p high --due 2025-12-01 --star
//! cosmic task list --all
//! cosmic task done 3
//!
//! # Daily focus and reflection
//! cosmic focus set "Ship the release"
//! cosmic focus done
//! cosmic reflect --accomplishments "Shipped" --mood 4
//!
//! # Wiki
//! cosmic wiki add "Deploy notes" --category work --tag ops --public
//! cosmic wiki list --visibility public --tag ops
//! ```
//!
//! ## Configuration
//!
//! *   `COSMIC_DATA_DIR`: where the JSON files live (default: the platform
//!     data directory, e.g. `~/.local/share/cosmictasks`).
//! *   `COSMIC_BACKEND`: `json` (default) or `fixture` for demo data that is
//!     never written anywhere.
//! *   `COSMIC_LOG`: log filter for diagnostics on stderr, e.g. `debug`.

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;
use std::str::FromStr;

use chrono::NaiveDate;
use cosmictasks::commands::*;
use cosmictasks::config::Config;
use cosmictasks::context::Context;
use cosmictasks::logging::init_logging;
use cosmictasks::models::{parse_date, Priority, WikiCategory, WikiStatus};
use cosmictasks::projector::WikiFilter;
use cosmictasks::store::{FocusPatch, NewFocus, NewProject, NewTask, TaskPatch};
use cosmictasks::tui::run_tui;
use cosmictasks::{Error, Result};

#[derive(Parser)]
#[command(name = "cosmic")]
#[command(about = "Tasks, daily focus, reflections and a personal wiki", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an e-mail address
    Login {
        email: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Print the dashboard summary
    Dashboard {
        /// Only show tasks of this project
        #[arg(short, long)]
        project: Option<u64>,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage the daily focus
    Focus {
        #[command(subcommand)]
        command: FocusCommands,
    },
    /// Show or write the daily reflection
    Reflect {
        /// Day of the reflection, YYYY-MM-DD (default today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// What went well
        #[arg(short, long)]
        accomplishments: Option<String>,
        /// What was learned
        #[arg(short, long)]
        learnings: Option<String>,
        /// What to do better
        #[arg(short, long)]
        improvements: Option<String>,
        /// Mood from 1 to 5
        #[arg(short, long)]
        mood: Option<u8>,
    },
    /// Manage wiki entries
    Wiki {
        #[command(subcommand)]
        command: WikiCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open the interactive dashboard
    Ui,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// low, medium or high
        #[arg(short, long, value_parser = Priority::from_str, default_value = "medium")]
        priority: Priority,
        /// Due date in YYYY-MM-DD
        #[arg(short, long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        /// Project id
        #[arg(long)]
        project: Option<u64>,
        /// Star the task
        #[arg(short, long)]
        star: bool,
        #[arg(short, long)]
        emoji: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List open tasks by priority
    List {
        /// Only tasks of this project
        #[arg(short, long)]
        project: Option<u64>,
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
        /// Show at most this many tasks
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Mark a task as done
    Done { id: u64 },
    /// Reopen a completed task
    Undo { id: u64 },
    /// Star a task
    Star { id: u64 },
    /// Remove the star from a task
    Unstar { id: u64 },
    /// Remove a task
    Remove { id: u64 },
    /// Edit a task
    Edit {
        id: u64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, value_parser = Priority::from_str)]
        priority: Option<Priority>,
        #[arg(short, long, value_parser = parse_date, conflicts_with = "no_due")]
        due: Option<NaiveDate>,
        /// Clear the due date
        #[arg(long)]
        no_due: bool,
        #[arg(long, conflicts_with = "no_project")]
        project: Option<u64>,
        /// Detach the task from its project
        #[arg(long)]
        no_project: bool,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Add a new project
    Add {
        title: String,
        /// Hex colour, e.g. #6366f1
        #[arg(short, long)]
        color: Option<String>,
        #[arg(short, long)]
        emoji: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List active projects
    List {
        /// Include completed projects
        #[arg(short, long)]
        all: bool,
    },
    /// Mark a project as done
    Done { id: u64 },
    /// Remove a project (its tasks are kept)
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum FocusCommands {
    /// Set the focus for a day
    Set {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Day, YYYY-MM-DD (default today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Edit the focus for a day
    Edit {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Toggle completion of the focus for a day
    Done {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show the focus for a day
    Show {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show the focus of the last seven days
    History,
}

/// Wiki fields shared by `add` and `edit`.
#[derive(Args)]
struct WikiFields {
    #[arg(short, long)]
    summary: Option<String>,
    #[arg(long)]
    content: Option<String>,
    /// general, work, personal, learning, reference, ideas, projects
    #[arg(short, long, value_parser = WikiCategory::from_str)]
    category: Option<WikiCategory>,
    /// draft, published, archived
    #[arg(long, value_parser = WikiStatus::from_str)]
    status: Option<WikiStatus>,
    #[arg(short, long, value_parser = Priority::from_str)]
    priority: Option<Priority>,
    /// Make the entry public
    #[arg(long, conflicts_with = "private")]
    public: bool,
    /// Make the entry private
    #[arg(long)]
    private: bool,
    /// 1 to 5 stars
    #[arg(short, long, conflicts_with = "no_rating")]
    rating: Option<u8>,
    /// Remove the rating
    #[arg(long)]
    no_rating: bool,
    /// Tag (repeatable); replaces the existing tags
    #[arg(short, long = "tag", conflicts_with = "clear_tags")]
    tags: Vec<String>,
    /// Remove every tag
    #[arg(long)]
    clear_tags: bool,
    /// Related link (repeatable); replaces the existing links
    #[arg(short, long = "link", conflicts_with = "clear_links")]
    links: Vec<String>,
    /// Remove every related link
    #[arg(long)]
    clear_links: bool,
}

/// `Some(vec![])` when cleared, `None` when nothing was given.
fn list_change(values: Vec<String>, clear: bool) -> Option<Vec<String>> {
    if clear {
        Some(Vec::new())
    } else if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

impl WikiFields {
    fn into_changes(self, title: Option<String>) -> WikiChanges {
        let is_public = match (self.public, self.private) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        WikiChanges {
            title,
            summary: self.summary,
            content: self.content,
            category: self.category,
            status: self.status,
            priority: self.priority,
            is_public,
            rating: if self.no_rating { Some(None) } else { self.rating.map(Some) },
            tags: list_change(self.tags, self.clear_tags),
            related_links: list_change(self.links, self.clear_links),
        }
    }
}

#[derive(Subcommand)]
enum WikiCommands {
    /// Add a wiki entry
    Add {
        title: String,
        #[command(flatten)]
        fields: WikiFields,
    },
    /// Edit a wiki entry
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: WikiFields,
    },
    /// List wiki entries
    List {
        /// Category or "all"
        #[arg(short, long, default_value = "all")]
        category: String,
        /// Status or "all"
        #[arg(short, long, default_value = "all")]
        status: String,
        /// all, public or private
        #[arg(short, long, default_value = "all")]
        visibility: String,
        /// Part of a tag
        #[arg(short, long, default_value = "")]
        tag: String,
    },
    /// Show a wiki entry
    Show { id: u64 },
    /// Remove a wiki entry
    Remove { id: u64 },
    /// List every tag in use
    Tags,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config);

    if let Some(Commands::Completions { shell }) = &cli.command {
        let shell = Shell::from_str(shell).map_err(|_| Error::UnsupportedShell(shell.clone()))?;
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "cosmic", &mut io::stdout());
        return Ok(());
    }

    let mut ctx = Context::open(&config)?;
    let today = ctx.today;
    match cli.command {
        Some(Commands::Login { email, name }) => cmd_login(&mut ctx, &email, name, false),
        Some(Commands::Logout) => cmd_logout(&mut ctx, false),
        Some(Commands::Whoami) => cmd_whoami(&ctx),
        Some(Commands::Dashboard { project }) => cmd_dashboard(&ctx, project),
        Some(Commands::Task { command }) => match command {
            TaskCommands::Add { title, priority, due, project, star, emoji, description } => {
                let task = NewTask {
                    title,
                    description,
                    emoji,
                    priority,
                    starred: star,
                    due_date: due,
                    project_id: project,
                };
                cmd_task_add(&mut ctx, task, false)
            }
            TaskCommands::List { project, all, limit } => cmd_task_list(&ctx, project, all, limit),
            TaskCommands::Done { id } => cmd_task_set_completed(&mut ctx, id, true, false),
            TaskCommands::Undo { id } => cmd_task_set_completed(&mut ctx, id, false, false),
            TaskCommands::Star { id } => cmd_task_set_starred(&mut ctx, id, true, false),
            TaskCommands::Unstar { id } => cmd_task_set_starred(&mut ctx, id, false, false),
            TaskCommands::Remove { id } => cmd_task_remove(&mut ctx, id, false),
            TaskCommands::Edit { id, title, priority, due, no_due, project, no_project, description } => {
                let patch = TaskPatch {
                    title,
                    description: description.map(Some),
                    priority,
                    due_date: if no_due { Some(None) } else { due.map(Some) },
                    project_id: if no_project { Some(None) } else { project.map(Some) },
                    ..TaskPatch::default()
                };
                cmd_task_edit(&mut ctx, id, patch, false)
            }
        },
        Some(Commands::Project { command }) => match command {
            ProjectCommands::Add { title, color, emoji, description } => {
                cmd_project_add(&mut ctx, NewProject { title, description, emoji, color }, false)
            }
            ProjectCommands::List { all } => cmd_project_list(&ctx, all),
            ProjectCommands::Done { id } => cmd_project_complete(&mut ctx, id, false),
            ProjectCommands::Remove { id } => cmd_project_remove(&mut ctx, id, false),
        },
        Some(Commands::Focus { command }) => match command {
            FocusCommands::Set { title, description, date } => {
                let focus = NewFocus { focus_date: date.unwrap_or(today), title, description };
                cmd_focus_set(&mut ctx, focus, false)
            }
            FocusCommands::Edit { title, description, date } => {
                let patch = FocusPatch { title, description: description.map(Some), completed: None };
                cmd_focus_edit(&mut ctx, date, patch, false)
            }
            FocusCommands::Done { date } => cmd_focus_done(&mut ctx, date, false),
            FocusCommands::Show { date } => cmd_focus_show(&ctx, date),
            FocusCommands::History => cmd_focus_history(&ctx),
        },
        Some(Commands::Reflect { date, accomplishments, learnings, improvements, mood }) => {
            let fields = ReflectionFields { accomplishments, learnings, improvements, mood_rating: mood };
            cmd_reflect(&mut ctx, date, fields, false)
        }
        Some(Commands::Wiki { command }) => match command {
            WikiCommands::Add { title, fields } => cmd_wiki_add(&mut ctx, fields.into_changes(Some(title)), false),
            WikiCommands::Edit { id, title, fields } => cmd_wiki_edit(&mut ctx, id, fields.into_changes(title), false),
            WikiCommands::List { category, status, visibility, tag } => {
                let filter = WikiFilter::parse(&category, &status, &visibility, &tag)?;
                cmd_wiki_list(&ctx, &filter)
            }
            WikiCommands::Show { id } => cmd_wiki_show(&ctx, id),
            WikiCommands::Remove { id } => cmd_wiki_remove(&mut ctx, id, false),
            WikiCommands::Tags => cmd_wiki_tags(&ctx),
        },
        Some(Commands::Completions { .. }) => Ok(()),
        Some(Commands::Ui) | None => run_tui(&mut ctx),
    }
}
