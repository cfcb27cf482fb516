mod app;
mod domain;
mod error;
mod input;
mod logging;
mod notifications;
mod persistence;
mod store;
mod ticker;
mod ui;

use anyhow::Result;
use app::{AppState, Intent};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{format_deadline, parse_deadline_input, time_left_badge, Filter, TaskId};
use notifications::{Notice, Severity};
use persistence::{
    ensure_dir, get_data_dir, init_local_data_dir, load_metadata, log_dir, meta_file,
    AppMetadata, FileBlobStore,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use store::TaskStore;

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "A small terminal task list with deadlines, urgency filters and relative times", long_about = None)]
struct Cli {
    /// Data directory to use instead of the discovered .taskpad
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .taskpad directory in the current directory
    Init,
    /// Add a task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Deadline: "YYYY-MM-DD HH:MM", "YYYY-MM-DDTHH:MM" or "HH:MM" for today
        #[arg(long)]
        at: Option<String>,
    },
    /// List tasks. Defaults to the filter last used in the TUI
    List {
        /// all, completed, pending, urgent or overdue
        #[arg(short, long)]
        filter: Option<Filter>,
    },
    /// Mark a task done, or reopen it if already done
    Done { id: TaskId },
    /// Change a task's text and/or deadline
    Edit {
        id: TaskId,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        at: Option<String>,
    },
    /// Delete a task (asks for confirmation)
    Rm {
        id: TaskId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        println!("Initialized taskpad directory: {}", data_dir.display());
        println!();
        println!("Taskpad will now use this local directory for task storage.");
        return Ok(());
    }

    let data_dir = match cli.dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    ensure_dir(&data_dir)?;

    let _log_guard = logging::init_logging(&log_dir(&data_dir))?;

    let meta_path = meta_file(&data_dir);
    let metadata = load_metadata(&meta_path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable metadata: {:#}", e);
        AppMetadata::default()
    });

    let store = TaskStore::open(Box::new(FileBlobStore::new(&data_dir)))?;
    let mut app = AppState::new(store, metadata, Some(meta_path));

    match cli.command {
        None => run_tui(&mut app),
        Some(Commands::Init) => Ok(()),
        Some(Commands::Add { text, at }) => {
            let time = match parse_cli_deadline(at.as_deref()) {
                Ok(time) => time,
                Err(notice) => return report(Some(notice)),
            };
            let notice = app.apply(Intent::Add {
                text: text.join(" "),
                time,
            })?;
            if let Some(task) = app.store.tasks().first() {
                if notice.as_ref().is_some_and(|n| n.severity != Severity::Error) {
                    println!("{}  {}", task.id, task.text);
                }
            }
            report(notice)
        }
        Some(Commands::List { filter }) => {
            print_list(&app, filter.unwrap_or(app.filter));
            Ok(())
        }
        Some(Commands::Done { id }) => {
            let notice = app.apply(Intent::ToggleComplete(id))?;
            report(notice)
        }
        Some(Commands::Edit { id, text, at }) => {
            if text.is_none() && at.is_none() {
                anyhow::bail!("Nothing to edit: pass --text and/or --at");
            }
            let time = match parse_cli_deadline(at.as_deref()) {
                Ok(time) => time,
                Err(notice) => return report(Some(notice)),
            };
            let notice = app.apply(Intent::Edit { id, text, time })?;
            report(notice)
        }
        Some(Commands::Rm { id, yes }) => {
            let Some(task) = app.store.get(id) else {
                return Ok(());
            };
            let confirmed = yes || confirm(&format!("Delete \"{}\"?", task.text))?;
            let notice = app.apply(Intent::Delete { id, confirmed })?;
            report(notice)
        }
    }
}

/// Parse a --at value, turning bad input into an error notice
fn parse_cli_deadline(at: Option<&str>) -> std::result::Result<Option<chrono::NaiveDateTime>, Notice> {
    let Some(at) = at else {
        return Ok(None);
    };
    let today = chrono::Local::now().date_naive();
    parse_deadline_input(at, today).map_err(|e| Notice::error(e.to_string()))
}

/// Print a notice; error notices end the command with a failure
fn report(notice: Option<Notice>) -> Result<()> {
    match notice {
        Some(notice) if notice.severity == Severity::Error => anyhow::bail!("{}", notice.message),
        Some(notice) => {
            println!("{}", notice);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Ask a yes/no question on stdin, defaulting to no
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_list(app: &AppState, filter: Filter) {
    let now = app.now();
    let tasks = domain::filter_tasks(app.store.tasks(), filter, now);
    let stats = domain::compute_stats(app.store.tasks());

    println!(
        "{} ({})  ·  Total {} · Completed {} · Pending {}",
        filter.label(),
        tasks.len(),
        stats.total,
        stats.completed,
        stats.pending
    );

    if tasks.is_empty() {
        println!("  {}", filter.empty_message());
        return;
    }

    for task in tasks {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        let mut line = format!("  {}  {} {}", task.id, checkbox, task.text);
        if let Some(deadline) = task.deadline() {
            line.push_str(&format!("  @ {}", format_deadline(deadline, now)));
        }
        if let Some(badge) = time_left_badge(task, now) {
            line.push_str(&format!(" ({})", badge));
        }
        println!("{}", line);
    }
}

fn run_tui(app: &mut AppState) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("TUI exited with error: {:#}", err);
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.tick();
    }
}
