//! Caller-supplied interaction handlers
//!
//! The view never persists favorites or progress itself. It forwards those
//! actions to the three sinks it was built with. Closures implement the sink
//! traits, so a caller can write:
//!
//! ```
//! use podview::handlers::Handlers;
//! use podview::models::Podcast;
//!
//! let handlers = Handlers::new(
//!     |p: &Podcast| println!("favorite {}", p.title),
//!     |p: &Podcast, secs: f64| println!("{} at {:.0}s", p.title, secs),
//!     |p: &Podcast| println!("finished {}", p.title),
//! );
//! # drop(handlers);
//! ```

use crate::models::Podcast;

/// Receives favorite actions
pub trait FavoriteSink {
    fn favorite(&mut self, podcast: &Podcast);
}

/// Receives playback position ticks (seconds)
pub trait ProgressSink {
    fn progress(&mut self, podcast: &Podcast, seconds: f64);
}

/// Receives end-of-stream notifications
pub trait CompletionSink {
    fn complete(&mut self, podcast: &Podcast);
}

impl<F: FnMut(&Podcast)> FavoriteSink for F {
    fn favorite(&mut self, podcast: &Podcast) {
        self(podcast)
    }
}

impl<F: FnMut(&Podcast, f64)> ProgressSink for F {
    fn progress(&mut self, podcast: &Podcast, seconds: f64) {
        self(podcast, seconds)
    }
}

impl<F: FnMut(&Podcast)> CompletionSink for F {
    fn complete(&mut self, podcast: &Podcast) {
        self(podcast)
    }
}

/// The full capability set a view needs. All three are required.
pub struct Handlers {
    favorite: Box<dyn FavoriteSink>,
    progress: Box<dyn ProgressSink>,
    completion: Box<dyn CompletionSink>,
}

impl Handlers {
    pub fn new(
        favorite: impl FavoriteSink + 'static,
        progress: impl ProgressSink + 'static,
        completion: impl CompletionSink + 'static,
    ) -> Self {
        Self {
            favorite: Box::new(favorite),
            progress: Box::new(progress),
            completion: Box::new(completion),
        }
    }

    pub fn on_favorite(&mut self, podcast: &Podcast) {
        self.favorite.favorite(podcast);
    }

    pub fn on_progress(&mut self, podcast: &Podcast, seconds: f64) {
        self.progress.progress(podcast, seconds);
    }

    pub fn on_complete(&mut self, podcast: &Podcast) {
        self.completion.complete(podcast);
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers").finish_non_exhaustive()
    }
}
