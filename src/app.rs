//! View state and interaction logic
//!
//! `App` is one mounted podcast view: it owns the `ViewState` for the current
//! identifier, drives the loader, routes keyboard input and forwards
//! favorite / progress / completion actions to the caller's handlers.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::api::PodcastSource;
use crate::handlers::Handlers;
use crate::loader::{LoadOutcome, Loader};
use crate::models::{Episode, Podcast, Season};
use crate::stream::PlaybackEvent;

/// Longest identifier accepted at the prompt (u64::MAX has 20 digits)
const MAX_ID_DIGITS: usize = 19;

// =============================================================================
// View State
// =============================================================================

/// Coarse phase of the view, derived from `ViewState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// Fetch for the current identifier has not settled
    Loading,
    /// Fetch settled without a usable podcast
    Empty,
    /// Podcast available
    Loaded,
}

/// Transient UI state for one identifier
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub loading: bool,
    pub podcast: Option<Podcast>,
    /// Index into `podcast.seasons`; a single slot, so at most one is expanded
    pub expanded_season: Option<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            loading: true,
            podcast: None,
            expanded_season: None,
        }
    }
}

impl ViewState {
    pub fn phase(&self) -> ViewPhase {
        match (self.loading, &self.podcast) {
            (true, _) => ViewPhase::Loading,
            (false, None) => ViewPhase::Empty,
            (false, Some(_)) => ViewPhase::Loaded,
        }
    }

    /// Start a new fetch cycle
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Expand `index`, or collapse it if it is already expanded.
    ///
    /// Returns false when there is no such season.
    pub fn toggle_season(&mut self, index: usize) -> bool {
        let exists = self
            .podcast
            .as_ref()
            .map(|p| index < p.seasons.len())
            .unwrap_or(false);
        if !exists {
            return false;
        }

        self.expanded_season = if self.expanded_season == Some(index) {
            None
        } else {
            Some(index)
        };
        true
    }

    /// The currently expanded season
    pub fn expanded(&self) -> Option<&Season> {
        let index = self.expanded_season?;
        self.podcast.as_ref()?.seasons.get(index)
    }
}

// =============================================================================
// List Cursor
// =============================================================================

/// Cursor over the focusable rows
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Select `index`, clamped to the list
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.len.saturating_sub(1));
    }

    /// Update length, clamping the selection to the valid range
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Rows, Input, Actions
// =============================================================================

/// A focusable row of the season list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRow {
    Season(usize),
    Episode { season: usize, episode: usize },
}

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a new podcast identifier
    EditingId,
}

/// Side effects the host loop must carry out
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start playing an audio URL (stopping whatever plays now)
    Play { url: String },
    /// Stop the current playback
    Stop,
}

/// The episode currently handed to the player
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub season: usize,
    pub episode: usize,
    pub title: String,
    /// Last reported position in seconds
    pub position: f64,
}

// =============================================================================
// App
// =============================================================================

/// One podcast view instance
pub struct App {
    podcast_id: u64,
    state: ViewState,
    loader: Loader,
    handlers: Handlers,

    pub list: ListState,
    pub input_mode: InputMode,
    /// Identifier being typed at the prompt
    pub id_input: String,
    pub now_playing: Option<NowPlaying>,
    pub error: Option<String>,
    pub running: bool,
}

impl App {
    /// Create a view for `podcast_id` and start loading it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(podcast_id: u64, handlers: Handlers, source: Arc<dyn PodcastSource>) -> Self {
        let mut app = Self {
            podcast_id,
            state: ViewState::default(),
            loader: Loader::new(source),
            handlers,
            list: ListState::default(),
            input_mode: InputMode::Normal,
            id_input: String::new(),
            now_playing: None,
            error: None,
            running: true,
        };
        app.begin_load();
        app
    }

    pub fn podcast_id(&self) -> u64 {
        self.podcast_id
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn podcast(&self) -> Option<&Podcast> {
        self.state.podcast.as_ref()
    }

    /// Switch to another identifier. Returns false if it is unchanged.
    pub fn set_podcast_id(&mut self, podcast_id: u64) -> bool {
        if podcast_id == self.podcast_id {
            return false;
        }
        info!(from = self.podcast_id, to = podcast_id, "podcast id changed");
        self.podcast_id = podcast_id;
        self.begin_load();
        true
    }

    fn begin_load(&mut self) {
        self.state.reset();
        self.list = ListState::default();
        self.now_playing = None;

        // Zero means no identifier: stay in the loading state and fetch nothing
        if self.podcast_id == 0 {
            self.loader.cancel();
            return;
        }
        self.loader.request(self.podcast_id);
    }

    // -------------------------------------------------------------------------
    // Loader Outcomes
    // -------------------------------------------------------------------------

    /// Apply every outcome that has already settled. Returns true if state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.loader.try_next() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Wait for the next outcome and apply it. Returns true if state changed.
    pub async fn next_outcome(&mut self) -> bool {
        match self.loader.next().await {
            Some(outcome) => self.apply(outcome),
            None => false,
        }
    }

    /// Apply a settled fetch, unless it belongs to a superseded request
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if !self.loader.is_current(&outcome.token) {
            debug!(
                podcast_id = outcome.token.podcast_id,
                generation = outcome.token.generation,
                "discarding stale podcast response"
            );
            return false;
        }

        match outcome.result {
            Ok(podcast) => {
                info!(podcast_id = self.podcast_id, title = %podcast.title, "podcast loaded");
                self.state.podcast = Some(podcast);
            }
            Err(e) => {
                warn!(podcast_id = self.podcast_id, error = %e, "error fetching podcast data");
                self.state.podcast = None;
            }
        }
        self.state.loading = false;
        self.state.expanded_season = None;
        self.list = ListState::new(self.rows().len());
        true
    }

    // -------------------------------------------------------------------------
    // Seasons and Rows
    // -------------------------------------------------------------------------

    /// Expand or collapse a season, keeping focus on its toggle
    pub fn toggle_season(&mut self, index: usize) -> bool {
        if !self.state.toggle_season(index) {
            return false;
        }
        let rows = self.rows();
        self.list.set_len(rows.len());
        if let Some(pos) = rows.iter().position(|r| *r == FocusRow::Season(index)) {
            self.list.select(pos);
        }
        true
    }

    pub fn expanded_season(&self) -> Option<usize> {
        self.state.expanded_season
    }

    /// Season toggles in order, with the expanded season's episodes after its toggle
    pub fn rows(&self) -> Vec<FocusRow> {
        let Some(podcast) = &self.state.podcast else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for (i, season) in podcast.seasons.iter().enumerate() {
            rows.push(FocusRow::Season(i));
            if self.state.expanded_season == Some(i) {
                rows.extend((0..season.episodes.len()).map(|j| FocusRow::Episode {
                    season: i,
                    episode: j,
                }));
            }
        }
        rows
    }

    pub fn focused_row(&self) -> Option<FocusRow> {
        self.rows().get(self.list.selected).copied()
    }

    fn episode(&self, season: usize, episode: usize) -> Option<&Episode> {
        self.podcast()?.episode(season, episode)
    }

    // -------------------------------------------------------------------------
    // Dispatch to Caller
    // -------------------------------------------------------------------------

    /// Favorite action on an episode. The handler receives the whole podcast.
    pub fn favorite_episode(&mut self, season: usize, episode: usize) -> bool {
        if self.episode(season, episode).is_none() {
            return false;
        }
        match &self.state.podcast {
            Some(podcast) => {
                self.handlers.on_favorite(podcast);
                true
            }
            None => false,
        }
    }

    /// Hand an episode to the player
    pub fn play_episode(&mut self, season: usize, episode: usize) -> Option<Action> {
        let ep = self.episode(season, episode)?;
        let (url, title) = (ep.file.clone(), ep.title.clone());
        info!(season, episode, %url, "playing episode");
        self.now_playing = Some(NowPlaying {
            season,
            episode,
            title,
            position: 0.0,
        });
        Some(Action::Play { url })
    }

    /// Player could not start; drop the now-playing marker
    pub fn playback_failed(&mut self, msg: impl Into<String>) {
        self.now_playing = None;
        self.set_error(msg);
    }

    /// Route a player event to the progress or completion handler.
    ///
    /// Events arriving while nothing is playing are ignored.
    pub fn playback_event(&mut self, event: PlaybackEvent) -> bool {
        let (Some(podcast), Some(playing)) = (&self.state.podcast, &mut self.now_playing) else {
            return false;
        };

        match event {
            PlaybackEvent::TimeUpdate(seconds) => {
                playing.position = seconds;
                self.handlers.on_progress(podcast, seconds);
            }
            PlaybackEvent::Ended => {
                self.handlers.on_complete(podcast);
                self.now_playing = None;
            }
            PlaybackEvent::Failed(msg) => {
                warn!(title = %playing.title, error = %msg, "episode playback failed");
                self.playback_failed(msg);
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Misc
    // -------------------------------------------------------------------------

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle a key press, returning any side effect for the host
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        match self.input_mode {
            InputMode::EditingId => self.handle_editing_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.id_input.clear();
                None
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let input = std::mem::take(&mut self.id_input);
                match input.parse::<u64>() {
                    Ok(id) if id > 0 => {
                        let was_playing = self.now_playing.is_some();
                        if self.set_podcast_id(id) && was_playing {
                            return Some(Action::Stop);
                        }
                        None
                    }
                    _ => {
                        self.set_error(format!("Invalid podcast id: {:?}", input));
                        None
                    }
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.id_input.len() < MAX_ID_DIGITS {
                    self.id_input.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                self.id_input.pop();
                None
            }
            _ => None,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit();
                None
            }
            KeyCode::Char('g') | KeyCode::Char(':') => {
                self.input_mode = InputMode::EditingId;
                self.id_input.clear();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.down();
                None
            }
            KeyCode::Home => {
                self.list.first();
                None
            }
            KeyCode::End => {
                self.list.last();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.focused_row()? {
                FocusRow::Season(i) => {
                    self.toggle_season(i);
                    None
                }
                FocusRow::Episode { season, episode } => self.play_episode(season, episode),
            },
            KeyCode::Char('f') => {
                if let Some(FocusRow::Episode { season, episode }) = self.focused_row() {
                    self.favorite_episode(season, episode);
                }
                None
            }
            KeyCode::Char('s') => self.now_playing.take().map(|_| Action::Stop),
            _ => None,
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("podcast_id", &self.podcast_id)
            .field("state", &self.state)
            .field("loader", &self.loader)
            .field("input_mode", &self.input_mode)
            .field("now_playing", &self.now_playing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogError;
    use crate::models::Episode;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct StaticSource(Podcast);

    #[async_trait]
    impl PodcastSource for StaticSource {
        async fn fetch(&self, _podcast_id: u64) -> Result<Podcast, CatalogError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct Calls {
        favorites: Vec<u64>,
        progress: Vec<(u64, f64)>,
        completions: Vec<u64>,
    }

    fn sample_podcast() -> Podcast {
        let episode = |n: u32| Episode {
            title: format!("Episode {}", n),
            description: format!("About {}", n),
            file: format!("https://example.com/{}.mp3", n),
            episode: Some(n),
        };
        Podcast {
            id: 10,
            title: "Sample".into(),
            description: "A sample podcast".into(),
            seasons: vec![
                Season {
                    season: 1,
                    title: "One".into(),
                    image: "https://example.com/1.jpg".into(),
                    episodes: vec![episode(1), episode(2)],
                },
                Season {
                    season: 2,
                    title: "Two".into(),
                    image: "https://example.com/2.jpg".into(),
                    episodes: vec![episode(3)],
                },
            ],
            image: None,
            genres: Vec::new(),
            updated: None,
        }
    }

    fn recording_handlers() -> (Handlers, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let (a, b, c) = (calls.clone(), calls.clone(), calls.clone());
        let handlers = Handlers::new(
            move |p: &Podcast| a.borrow_mut().favorites.push(p.id),
            move |p: &Podcast, s: f64| b.borrow_mut().progress.push((p.id, s)),
            move |p: &Podcast| c.borrow_mut().completions.push(p.id),
        );
        (handlers, calls)
    }

    async fn loaded_app() -> (App, Rc<RefCell<Calls>>) {
        let (handlers, calls) = recording_handlers();
        let mut app = App::new(10, handlers, Arc::new(StaticSource(sample_podcast())));
        assert!(app.next_outcome().await);
        (app, calls)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // =========================================================================
    // ViewState
    // =========================================================================

    #[test]
    fn test_view_state_default_is_loading() {
        let state = ViewState::default();
        assert!(state.loading);
        assert_eq!(state.phase(), ViewPhase::Loading);
        assert!(state.expanded().is_none());
    }

    #[test]
    fn test_view_state_phases() {
        let mut state = ViewState {
            loading: false,
            podcast: None,
            expanded_season: None,
        };
        assert_eq!(state.phase(), ViewPhase::Empty);
        state.podcast = Some(sample_podcast());
        assert_eq!(state.phase(), ViewPhase::Loaded);
    }

    #[test]
    fn test_toggle_twice_collapses() {
        let mut state = ViewState {
            loading: false,
            podcast: Some(sample_podcast()),
            expanded_season: None,
        };
        assert!(state.toggle_season(0));
        assert_eq!(state.expanded_season, Some(0));
        assert!(state.toggle_season(0));
        assert_eq!(state.expanded_season, None);
    }

    #[test]
    fn test_toggle_other_season_replaces() {
        let mut state = ViewState {
            loading: false,
            podcast: Some(sample_podcast()),
            expanded_season: None,
        };
        state.toggle_season(0);
        state.toggle_season(1);
        assert_eq!(state.expanded_season, Some(1));
        assert_eq!(state.expanded().unwrap().title, "Two");
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut state = ViewState {
            loading: false,
            podcast: Some(sample_podcast()),
            expanded_season: None,
        };
        assert!(!state.toggle_season(9));
        assert_eq!(state.expanded_season, None);

        let mut empty = ViewState::default();
        assert!(!empty.toggle_season(0));
    }

    // =========================================================================
    // ListState
    // =========================================================================

    #[test]
    fn test_list_state_bounds() {
        let mut list = ListState::new(2);
        list.up();
        assert_eq!(list.selected, 0);
        list.down();
        list.down();
        assert_eq!(list.selected, 1);
        list.set_len(0);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_select_clamps() {
        let mut list = ListState::new(3);
        list.select(12);
        assert_eq!(list.selected, 2);
        list.first();
        assert_eq!(list.selected, 0);
        list.last();
        assert_eq!(list.selected, 2);
    }

    // =========================================================================
    // App
    // =========================================================================

    #[tokio::test]
    async fn test_load_populates_state() {
        let (app, _) = loaded_app().await;
        assert_eq!(app.state().phase(), ViewPhase::Loaded);
        assert_eq!(app.podcast().unwrap().title, "Sample");
        assert_eq!(app.rows(), vec![FocusRow::Season(0), FocusRow::Season(1)]);
    }

    #[tokio::test]
    async fn test_same_id_is_noop() {
        let (mut app, _) = loaded_app().await;
        assert!(!app.set_podcast_id(10));
        assert_eq!(app.state().phase(), ViewPhase::Loaded);
    }

    #[tokio::test]
    async fn test_id_change_resets_state() {
        let (mut app, _) = loaded_app().await;
        app.toggle_season(1);
        assert!(app.set_podcast_id(11));
        assert!(app.state().loading);
        assert!(app.podcast().is_none());
        assert_eq!(app.expanded_season(), None);
    }

    #[tokio::test]
    async fn test_zero_id_issues_no_request() {
        let (handlers, _) = recording_handlers();
        let mut app = App::new(0, handlers, Arc::new(StaticSource(sample_podcast())));
        tokio::task::yield_now().await;
        assert!(!app.poll());
        assert_eq!(app.state().phase(), ViewPhase::Loading);
    }

    #[tokio::test]
    async fn test_rows_include_expanded_episodes() {
        let (mut app, _) = loaded_app().await;
        app.toggle_season(0);
        assert_eq!(
            app.rows(),
            vec![
                FocusRow::Season(0),
                FocusRow::Episode { season: 0, episode: 0 },
                FocusRow::Episode { season: 0, episode: 1 },
                FocusRow::Season(1),
            ]
        );
    }

    #[tokio::test]
    async fn test_toggle_keeps_focus_on_season() {
        let (mut app, _) = loaded_app().await;
        app.list.down();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.expanded_season(), Some(1));
        assert_eq!(app.focused_row(), Some(FocusRow::Season(1)));
    }

    #[tokio::test]
    async fn test_favorite_passes_whole_podcast_once() {
        let (mut app, calls) = loaded_app().await;
        assert!(app.favorite_episode(1, 0));
        assert_eq!(calls.borrow().favorites, vec![10]);
    }

    #[tokio::test]
    async fn test_favorite_unknown_episode_ignored() {
        let (mut app, calls) = loaded_app().await;
        assert!(!app.favorite_episode(0, 7));
        assert!(calls.borrow().favorites.is_empty());
    }

    #[tokio::test]
    async fn test_favorite_key_on_episode_row() {
        let (mut app, calls) = loaded_app().await;
        app.handle_key(key(KeyCode::Enter)); // expand season 0
        app.handle_key(key(KeyCode::Char('f'))); // on a season row: nothing
        assert!(calls.borrow().favorites.is_empty());

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(calls.borrow().favorites, vec![10]);
    }

    #[tokio::test]
    async fn test_play_then_progress_and_complete() {
        let (mut app, calls) = loaded_app().await;
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Down));
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Some(Action::Play {
                url: "https://example.com/1.mp3".into()
            })
        );

        assert!(app.playback_event(PlaybackEvent::TimeUpdate(3.5)));
        assert_eq!(app.now_playing.as_ref().unwrap().position, 3.5);
        assert!(app.playback_event(PlaybackEvent::Ended));
        assert!(app.now_playing.is_none());

        let calls = calls.borrow();
        assert_eq!(calls.progress, vec![(10, 3.5)]);
        assert_eq!(calls.completions, vec![10]);
    }

    #[tokio::test]
    async fn test_playback_failure_shows_error_without_completion() {
        let (mut app, calls) = loaded_app().await;
        app.play_episode(0, 0);
        app.playback_event(PlaybackEvent::TimeUpdate(1.0));

        assert!(app.playback_event(PlaybackEvent::Failed("Playback failed: loading failed".into())));
        assert!(app.now_playing.is_none());
        assert_eq!(app.error.as_deref(), Some("Playback failed: loading failed"));
        assert!(calls.borrow().completions.is_empty());

        // Any key dismisses the popup
        app.handle_key(key(KeyCode::Down));
        assert!(app.error.is_none());
    }

    #[tokio::test]
    async fn test_playback_event_ignored_when_idle() {
        let (mut app, calls) = loaded_app().await;
        assert!(!app.playback_event(PlaybackEvent::TimeUpdate(1.0)));
        assert!(!app.playback_event(PlaybackEvent::Ended));
        assert!(!app.playback_event(PlaybackEvent::Failed("late".into())));
        assert!(app.error.is_none());
        assert!(calls.borrow().progress.is_empty());
        assert!(calls.borrow().completions.is_empty());
    }

    #[tokio::test]
    async fn test_stop_key() {
        let (mut app, _) = loaded_app().await;
        assert_eq!(app.handle_key(key(KeyCode::Char('s'))), None);
        app.play_episode(0, 0);
        assert_eq!(app.handle_key(key(KeyCode::Char('s'))), Some(Action::Stop));
        assert!(app.now_playing.is_none());
    }

    #[tokio::test]
    async fn test_id_prompt() {
        let (mut app, _) = loaded_app().await;
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.input_mode, InputMode::EditingId);

        for c in ['4', 'x', '2'] {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.id_input, "42");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.podcast_id(), 42);
        assert!(app.state().loading);
    }

    #[tokio::test]
    async fn test_id_prompt_rejects_empty() {
        let (mut app, _) = loaded_app().await;
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.error.is_some());
        assert_eq!(app.podcast_id(), 10);
    }

    #[tokio::test]
    async fn test_id_change_while_playing_stops() {
        let (mut app, _) = loaded_app().await;
        app.play_episode(0, 0);
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('7')));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Some(Action::Stop));
        assert!(app.now_playing.is_none());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _) = loaded_app().await;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);

        let (mut app, _) = loaded_app().await;
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.running);
    }
}
