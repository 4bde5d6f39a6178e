//! Data structures for podcasts served by the catalog
//!
//! The catalog returns one podcast per identifier with its seasons and
//! episodes inline. Field names match the catalog's JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Catalog Models
// =============================================================================

/// A podcast with its ordered seasons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "seasons_or_empty")]
    pub seasons: Vec<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl Podcast {
    /// Total number of episodes across all seasons
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }

    /// Look up an episode by season index and episode index
    pub fn episode(&self, season: usize, episode: usize) -> Option<&Episode> {
        self.seasons.get(season)?.episodes.get(episode)
    }
}

impl fmt::Display for Podcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} seasons, {} episodes)",
            self.title,
            self.seasons.len(),
            self.episode_count()
        )
    }
}

/// A numbered group of episodes within a podcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    /// Ordinal, unique within one podcast
    pub season: u32,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Season {}: {} ({} episodes)",
            self.season,
            self.title,
            self.episodes.len()
        )
    }
}

/// A single playable audio item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// URL of the audio file
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.episode {
            Some(n) => write!(f, "E{:02} - {}", n, self.title),
            None => write!(f, "{}", self.title),
        }
    }
}

// =============================================================================
// Lenient Decoding
// =============================================================================

/// The live catalog sends `"id": "10716"`; fixtures and older payloads use numbers.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid podcast id: {:?}", s))),
    }
}

/// Anything other than a JSON array means "no seasons".
fn seasons_or_empty<'de, D>(deserializer: D) -> Result<Vec<Season>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVE_SHAPE: &str = r#"{
        "id": "10716",
        "title": "Something Was Wrong",
        "description": "An award-winning docuseries.",
        "seasons": [
            {
                "season": 1,
                "title": "Season 1",
                "image": "https://example.com/s1.jpg",
                "episodes": [
                    {
                        "title": "Ep 1: Maria",
                        "description": "Maria tells her story.",
                        "episode": 1,
                        "file": "https://example.com/e1.mp3"
                    },
                    {
                        "title": "Ep 2: The Call",
                        "description": "",
                        "episode": 2,
                        "file": "https://example.com/e2.mp3"
                    }
                ]
            }
        ],
        "genres": ["Personal Growth", "True Crime and Investigative Journalism"],
        "image": "https://example.com/cover.jpg",
        "updated": "2022-11-03T07:00:00.000Z"
    }"#;

    #[test]
    fn test_parse_live_catalog_shape() {
        let podcast: Podcast = serde_json::from_str(LIVE_SHAPE).unwrap();
        assert_eq!(podcast.id, 10716);
        assert_eq!(podcast.seasons.len(), 1);
        assert_eq!(podcast.seasons[0].episodes.len(), 2);
        assert_eq!(podcast.seasons[0].episodes[1].episode, Some(2));
        assert_eq!(podcast.genres.len(), 2);
        assert_eq!(podcast.episode_count(), 2);
    }

    #[test]
    fn test_numeric_id() {
        let podcast: Podcast =
            serde_json::from_str(r#"{"id":42,"title":"T","description":"D","seasons":[]}"#)
                .unwrap();
        assert_eq!(podcast.id, 42);
        assert!(podcast.seasons.is_empty());
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        let result: Result<Podcast, _> =
            serde_json::from_str(r#"{"id":"abc","title":"T","seasons":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_seasons_not_an_array_is_empty() {
        for seasons in [r#""none""#, "null", "{}", "3"] {
            let json = format!(r#"{{"id":1,"title":"T","seasons":{}}}"#, seasons);
            let podcast: Podcast = serde_json::from_str(&json).unwrap();
            assert!(podcast.seasons.is_empty(), "seasons = {}", seasons);
        }
    }

    #[test]
    fn test_seasons_missing_is_empty() {
        let podcast: Podcast = serde_json::from_str(r#"{"id":1,"title":"T"}"#).unwrap();
        assert!(podcast.seasons.is_empty());
        assert_eq!(podcast.description, "");
    }

    #[test]
    fn test_malformed_season_is_error() {
        let result: Result<Podcast, _> =
            serde_json::from_str(r#"{"id":1,"title":"T","seasons":[{"title":"no ordinal"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_episode_lookup() {
        let podcast: Podcast = serde_json::from_str(LIVE_SHAPE).unwrap();
        assert_eq!(podcast.episode(0, 0).unwrap().title, "Ep 1: Maria");
        assert!(podcast.episode(0, 5).is_none());
        assert!(podcast.episode(3, 0).is_none());
    }

    #[test]
    fn test_display() {
        let podcast: Podcast = serde_json::from_str(LIVE_SHAPE).unwrap();
        assert_eq!(
            podcast.to_string(),
            "Something Was Wrong (1 seasons, 2 episodes)"
        );
        assert_eq!(
            podcast.seasons[0].to_string(),
            "Season 1: Season 1 (2 episodes)"
        );
        assert_eq!(podcast.seasons[0].episodes[0].to_string(), "E01 - Ep 1: Maria");
    }
}
