//! costing TUI - Terminal form for the costing calculator

mod app;
mod popups;
mod ui;

use anyhow::Result;
use clap::Parser;
use costing_core::Presence;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "costing", author, version, about, long_about = None)]
struct Args {
    /// Treat a typed zero as a real figure instead of "not provided"
    #[arg(long, env = "COSTING_EXPLICIT_ZERO")]
    explicit_zero: bool,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let presence = if args.explicit_zero {
        Presence::Explicit
    } else {
        Presence::ZeroIsAbsent
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(presence);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.clear_status_if_expired();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !handle_key(app, key) {
                return Ok(());
            }
        }
    }
}

/// Apply a key press. Returns false when the user quits.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return false;
    }

    // Help popup swallows everything except its own toggles
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
            app.toggle_help();
        }
        return true;
    }

    match key.code {
        KeyCode::Esc => return false,
        KeyCode::Char('r') if ctrl => app.reset(),
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Enter => app.calculate(),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.clear_field(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
    true
}
