//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout.

pub mod podcast;
pub mod theme;

pub use podcast::{build_tree, DisplayTree, PodcastView};
pub use theme::Theme;
