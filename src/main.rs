//! podview - terminal podcast preview
//!
//! # Usage
//!
//! ```bash
//! # Interactive preview
//! podview 10716
//!
//! # CLI mode (for automation)
//! podview show 10716 --json
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use podview::api::CatalogClient;
use podview::app::{Action, App, InputMode, ViewPhase};
use podview::cli::{Cli, Command, ExitCode, Output};
use podview::commands;
use podview::config::Config;
use podview::handlers::Handlers;
use podview::models::Podcast;
use podview::stream::{LocalPlayer, PlaybackEvent, PlaybackSession, PlayerError};
use podview::ui::{PodcastView, Theme};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let catalog_url = config.catalog_url(cli.catalog_url.as_deref());
    let log_path = init_logging()?;
    info!(%catalog_url, "podview starting");

    if cli.is_cli_mode() {
        let exit_code = run_cli(cli, &catalog_url).await;
        std::process::exit(exit_code.into());
    }

    let Some(podcast_id) = cli.podcast_id else {
        let output = Output::new(&cli);
        let code = output.error("A podcast id is required (try `podview 10716`)", ExitCode::InvalidArgs);
        std::process::exit(code.into());
    };

    let result = run_tui(podcast_id, &catalog_url, &config).await;
    if let Err(e) = &result {
        error!(error = %e, "podview exited with error");
        eprintln!("podview log: {}", log_path.display());
    }
    result
}

/// Log to a file so the TUI owns the terminal
fn init_logging() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("podview");
    std::fs::create_dir_all(&dir)?;

    let log_path = dir.join("podview.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    Ok(log_path)
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, catalog_url: &str) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Show(cmd)) => commands::show_cmd(cmd, catalog_url, &output).await,
        None => ExitCode::Success,
    }
}

// =============================================================================
// Caller-side State
// =============================================================================

/// What the host keeps on behalf of the view. Lives only for this session.
#[derive(Debug, Default)]
struct Library {
    favorites: Vec<(u64, String)>,
    /// Last reported position per podcast id
    progress: HashMap<u64, f64>,
    completed: usize,
}

fn library_handlers(library: &Rc<RefCell<Library>>) -> Handlers {
    let (fav, prog, done) = (library.clone(), library.clone(), library.clone());
    Handlers::new(
        move |podcast: &Podcast| {
            let mut lib = fav.borrow_mut();
            if !lib.favorites.iter().any(|(id, _)| *id == podcast.id) {
                info!(podcast_id = podcast.id, "added to favorites");
                lib.favorites.push((podcast.id, podcast.title.clone()));
            }
        },
        move |podcast: &Podcast, seconds: f64| {
            prog.borrow_mut().progress.insert(podcast.id, seconds);
        },
        move |podcast: &Podcast| {
            info!(podcast_id = podcast.id, "episode completed");
            let mut lib = done.borrow_mut();
            lib.completed += 1;
            lib.progress.remove(&podcast.id);
        },
    )
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(podcast_id: u64, catalog_url: &str, config: &Config) -> Result<()> {
    let library = Rc::new(RefCell::new(Library::default()));
    let client = CatalogClient::with_base_url(catalog_url);
    info!(catalog = client.base_url(), podcast_id, "opening preview");
    let mut app = App::new(podcast_id, library_handlers(&library), Arc::new(client));
    let mut player = PlayerSlot::new(LocalPlayer::new(config.player()));

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &mut player, &library).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - applies async results, renders, handles input
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    player: &mut PlayerSlot,
    library: &Rc<RefCell<Library>>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        app.poll();
        player.poll(app).await;

        terminal.draw(|frame| render_ui(frame, app, &library.borrow()))?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only handle key press events (ignore releases on Windows)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Some(Action::Play { url }) => player.start(url).await,
            Some(Action::Stop) => player.stop().await,
            None => {}
        }
    }

    player.stop().await;
    Ok(())
}

// =============================================================================
// Player Slot
// =============================================================================

type StartResult = (u64, Result<PlaybackSession, PlayerError>);

/// At most one player session, started off the UI loop.
///
/// Each start gets a generation and a fresh event channel. Stopping or
/// starting again drops the old receiver, so a replaced session can no longer
/// report into the view, and a start that settles late is stopped on arrival.
struct PlayerSlot {
    player: LocalPlayer,
    generation: u64,
    session: Option<PlaybackSession>,
    events: Option<mpsc::UnboundedReceiver<PlaybackEvent>>,
    started_tx: mpsc::UnboundedSender<StartResult>,
    started_rx: mpsc::UnboundedReceiver<StartResult>,
}

impl PlayerSlot {
    fn new(player: LocalPlayer) -> Self {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        Self {
            player,
            generation: 0,
            session: None,
            events: None,
            started_tx,
            started_rx,
        }
    }

    /// Replace whatever is playing with `url`
    async fn start(&mut self, url: String) {
        self.stop().await;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.events = Some(events_rx);

        let generation = self.generation;
        let player = self.player.clone();
        let started_tx = self.started_tx.clone();
        tokio::spawn(async move {
            let result = player.play(&url, events_tx).await;
            let _ = started_tx.send((generation, result));
        });
    }

    /// Stop the current session and forget any start still in flight
    async fn stop(&mut self) {
        self.generation += 1;
        self.events = None;
        if let Some(session) = self.session.take() {
            session.stop().await;
        }
    }

    /// Apply settled starts and forward player events to the view
    async fn poll(&mut self, app: &mut App) {
        while let Ok((generation, result)) = self.started_rx.try_recv() {
            match result {
                Ok(session) if generation == self.generation => self.session = Some(session),
                Ok(stale) => stale.stop().await,
                Err(e) if generation == self.generation => {
                    error!(error = %e, "could not start player");
                    self.events = None;
                    app.playback_failed(e.to_string());
                }
                Err(e) => debug!(error = %e, "superseded player start failed"),
            }
        }

        let Some(events) = self.events.as_mut() else {
            return;
        };
        let mut finished = false;
        while let Ok(event) = events.try_recv() {
            finished = matches!(event, PlaybackEvent::Ended | PlaybackEvent::Failed(_));
            app.playback_event(event);
            if finished {
                break;
            }
        }
        if finished {
            self.stop().await;
        }
    }
}

// =============================================================================
// UI Rendering
// =============================================================================

fn render_ui(frame: &mut Frame, app: &App, library: &Library) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());

    PodcastView::render(frame, chunks[0], app);
    render_status_bar(frame, chunks[1], app, library);
}

/// Key hints, now playing and favorites count
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, library: &Library) {
    let mut spans = Vec::new();

    if app.input_mode == InputMode::EditingId {
        spans.push(Span::styled(" Enter ", Theme::keybind()));
        spans.push(Span::styled("open  ", Theme::dimmed()));
        spans.push(Span::styled("Esc ", Theme::keybind()));
        spans.push(Span::styled("cancel ", Theme::dimmed()));
    } else {
        // List keys only do something once seasons are on screen
        let list_keys: &[(&str, &str)] = match app.state().phase() {
            ViewPhase::Loaded => &[
                ("↑↓ ", "move "),
                ("Enter ", "toggle/play "),
                ("f ", "favorite "),
                ("s ", "stop "),
            ],
            ViewPhase::Loading | ViewPhase::Empty => &[],
        };
        spans.push(Span::raw(" "));
        for (key, desc) in list_keys.iter().chain(&[("g ", "go to id "), ("q ", "quit ")]) {
            spans.push(Span::styled(*key, Theme::keybind()));
            spans.push(Span::styled(*desc, Theme::dimmed()));
        }
    }

    spans.push(Span::styled(
        format!("│ ♥ {} ", library.favorites.len()),
        Theme::accent(),
    ));
    spans.push(Span::styled(
        format!("✓ {} ", library.completed),
        Theme::success(),
    ));

    if let Some(playing) = &app.now_playing {
        spans.push(Span::styled(
            format!("│ ▶ {} {}", playing.title, format_position(playing.position)),
            Theme::secondary(),
        ));
    }

    let bar = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(bar, area);
}

/// Format seconds as HH:MM:SS or MM:SS
fn format_position(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
