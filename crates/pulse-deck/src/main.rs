mod state;
mod theme;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use pulse_core::{DATA_DIR, PLAN_FILE, POLL_INTERVAL_MS};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    ffi::OsString,
    io,
    path::Path,
    sync::mpsc::{self, Receiver},
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_logging();

    let root = state::resolve_root()?;
    let mut app = state::App::new(root);
    app.bootstrap(Instant::now());

    let (watcher, watch_rx) = setup_watcher(&app.root);
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app, watch_rx);
    restore_terminal(&mut terminal)?;
    drop(watcher);

    if let Err(err) = result {
        eprintln!("pulse-deck: {err}");
    }

    Ok(())
}

// The deck runs on an alternate screen, so log output is swallowed unless
// explicitly requested.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_enabled = matches!(
        std::env::var("PULSE_LOG_STDOUT").ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE") | Some("yes") | Some("YES")
    );
    if stdout_enabled {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init();
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut state::App,
    watch_rx: Option<Receiver<()>>,
) -> Result<()> {
    let poll_interval = Duration::from_millis(POLL_INTERVAL_MS);
    let input_poll = Duration::from_millis(100);
    let mut last_poll = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(input_poll)? {
            match event::read()? {
                Event::Key(key) => {
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        app.handle_key(key, Instant::now());
                    }
                }
                Event::Resize(_, _) => {
                    app.mark_dirty();
                }
                _ => {}
            }
        }

        // Each drained burst re-derives the highlight set from scratch.
        if let Some(rx) = &watch_rx {
            let mut mutated = false;
            while rx.try_recv().is_ok() {
                mutated = true;
            }
            if mutated {
                app.on_plan_mutation();
            }
        }

        let now = Instant::now();
        if now.duration_since(last_poll) >= poll_interval {
            app.on_poll(now);
            last_poll = now;
        }
        app.on_frame(now);

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Watches the data directory for writes to the plan overview file. When
/// the watcher cannot be created the deck degrades to poll-only operation.
fn setup_watcher(root: &Path) -> (Option<RecommendedWatcher>, Option<Receiver<()>>) {
    let (tx, rx) = mpsc::sync_channel(16);
    let plan_name: OsString = OsString::from(PLAN_FILE);
    let mut watcher = match RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                let plan_touched = event
                    .paths
                    .iter()
                    .any(|path| path.file_name() == Some(plan_name.as_os_str()));
                if plan_touched {
                    let _ = tx.try_send(());
                }
            }
        },
        Config::default(),
    ) {
        Ok(watcher) => watcher,
        Err(_) => return (None, None),
    };

    let data_dir = root.join(DATA_DIR);
    if data_dir.exists() {
        let _ = watcher.watch(&data_dir, RecursiveMode::NonRecursive);
    } else if watcher.watch(root, RecursiveMode::NonRecursive).is_err() {
        return (None, None);
    }

    (Some(watcher), Some(rx))
}
