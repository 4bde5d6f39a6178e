//! CLI Command Handlers
//!
//! Each handler takes CLI args and Output, returns ExitCode.

use crate::api::{CatalogClient, CatalogError};
use crate::cli::{ExitCode, Output, ShowCmd};
use crate::models::Podcast;
use crate::ui::podcast::NO_SEASONS_TEXT;

// =============================================================================
// Show Command
// =============================================================================

pub async fn show_cmd(cmd: ShowCmd, catalog_url: &str, output: &Output) -> ExitCode {
    let client = CatalogClient::with_base_url(catalog_url);

    output.info(format!("Fetching podcast {}...", cmd.podcast_id));

    match client.podcast(cmd.podcast_id).await {
        Ok(podcast) => {
            if output.json {
                if let Err(e) = output.print(&podcast) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                for line in describe(&podcast, cmd.episodes) {
                    output.line(line);
                }
            }
            ExitCode::Success
        }
        Err(CatalogError::NotFound) => output.error(
            format!("No data found for podcast {}", cmd.podcast_id),
            ExitCode::NotFound,
        ),
        Err(e) => output.error(format!("Fetch failed: {}", e), ExitCode::NetworkError),
    }
}

/// Human-readable summary of a podcast
pub fn describe(podcast: &Podcast, with_episodes: bool) -> Vec<String> {
    let mut lines = vec![podcast.title.clone()];
    if !podcast.description.is_empty() {
        lines.push(podcast.description.clone());
    }
    lines.push(String::new());

    if podcast.seasons.is_empty() {
        lines.push(NO_SEASONS_TEXT.to_string());
        return lines;
    }

    for season in &podcast.seasons {
        lines.push(season.to_string());
        if with_episodes {
            lines.extend(season.episodes.iter().map(|e| format!("  {}", e)));
        }
    }
    lines
}
