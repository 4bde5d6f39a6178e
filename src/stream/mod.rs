//! Playback infrastructure
//!
//! - Player: mpv process with IPC position reporting

pub mod player;

pub use player::{parse_mpv_event, LocalPlayer, PlaybackEvent, PlaybackSession, PlayerError};
