//! podview - terminal podcast preview
//!
//! Fetches a podcast from the catalog, shows its seasons and episodes, and
//! hands favorite / progress / completion actions to caller-supplied handlers.
//!
//! # Modules
//!
//! - `models` - Podcast, season and episode data
//! - `api` - Catalog client
//! - `loader` - Fetch-per-identifier with stale response guard
//! - `handlers` - Caller capability set
//! - `app` - View state and interaction logic
//! - `ui` - ratatui rendering
//! - `stream` - Local episode playback

pub mod models;
pub mod api;
pub mod loader;
pub mod handlers;
pub mod app;
pub mod ui;
pub mod stream;
pub mod config;
pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use models::{Episode, Podcast, Season};

pub use api::{CatalogClient, CatalogError, PodcastSource};
pub use app::{Action, App, ViewPhase, ViewState};
pub use handlers::Handlers;
pub use stream::PlaybackEvent;
