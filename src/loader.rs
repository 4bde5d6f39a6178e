//! Podcast loader
//!
//! Issues one fetch per identifier change and reports the outcome over a
//! channel. Every request carries a generation token; only the outcome of the
//! most recent request is current, so a slow response for a superseded
//! identifier can be recognised and dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{CatalogError, PodcastSource};
use crate::models::Podcast;

/// Identifies one outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub generation: u64,
    pub podcast_id: u64,
}

/// Settled result of a request
#[derive(Debug)]
pub struct LoadOutcome {
    pub token: RequestToken,
    pub result: Result<Podcast, CatalogError>,
}

/// Spawns fetches and collects their outcomes
pub struct Loader {
    source: Arc<dyn PodcastSource>,
    generation: u64,
    tx: mpsc::UnboundedSender<LoadOutcome>,
    rx: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl Loader {
    pub fn new(source: Arc<dyn PodcastSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Start fetching `podcast_id`, superseding any request still in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, podcast_id: u64) -> RequestToken {
        self.generation += 1;
        let token = RequestToken {
            generation: self.generation,
            podcast_id,
        };
        debug!(podcast_id, generation = token.generation, "podcast request issued");

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.fetch(podcast_id).await;
            // Receiver is gone once the view is dropped
            let _ = tx.send(LoadOutcome { token, result });
        });

        token
    }

    /// Invalidate any in-flight request without issuing a new one
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    /// True only for the most recently issued request
    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.generation == self.generation
    }

    /// Next settled outcome, if one is ready
    pub fn try_next(&mut self) -> Option<LoadOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next settled outcome
    pub async fn next(&mut self) -> Option<LoadOutcome> {
        self.rx.recv().await
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSource;

    #[async_trait]
    impl PodcastSource for FixedSource {
        async fn fetch(&self, podcast_id: u64) -> Result<Podcast, CatalogError> {
            if podcast_id == 404 {
                return Err(CatalogError::NotFound);
            }
            Ok(Podcast {
                id: podcast_id,
                title: format!("Podcast {}", podcast_id),
                description: String::new(),
                seasons: Vec::new(),
                image: None,
                genres: Vec::new(),
                updated: None,
            })
        }
    }

    #[tokio::test]
    async fn test_request_delivers_outcome() {
        let mut loader = Loader::new(Arc::new(FixedSource));
        let token = loader.request(5);

        let outcome = loader.next().await.unwrap();
        assert_eq!(outcome.token, token);
        assert_eq!(outcome.result.unwrap().id, 5);
        assert!(loader.is_current(&token));
    }

    #[tokio::test]
    async fn test_failure_delivered_as_outcome() {
        let mut loader = Loader::new(Arc::new(FixedSource));
        loader.request(404);

        let outcome = loader.next().await.unwrap();
        assert!(matches!(outcome.result, Err(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn test_newer_request_supersedes() {
        let mut loader = Loader::new(Arc::new(FixedSource));
        let first = loader.request(1);
        let second = loader.request(2);

        assert_eq!(first.generation + 1, second.generation);
        assert!(!loader.is_current(&first));
        assert!(loader.is_current(&second));
    }

    #[tokio::test]
    async fn test_cancel_invalidates() {
        let mut loader = Loader::new(Arc::new(FixedSource));
        let token = loader.request(1);
        loader.cancel();
        assert!(!loader.is_current(&token));
    }

    #[test]
    fn test_try_next_empty() {
        let mut loader = Loader::new(Arc::new(FixedSource));
        assert!(loader.try_next().is_none());
    }
}
