//! Local Player - mpv playback with position reporting
//!
//! Plays an episode URL in a headless mpv and listens on its JSON IPC socket
//! for `time-pos` changes and end of file. Those become `PlaybackEvent`s, the
//! terminal equivalent of an audio element's `timeupdate` / `ended`.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Observation id used for `time-pos`
pub const OBS_TIME_POS: u64 = 1;

/// Minimum spacing between forwarded position ticks
const TICK_INTERVAL: Duration = Duration::from_millis(250);

static NEXT_SOCKET_ID: AtomicU64 = AtomicU64::new(1);

/// Something the player reports while an episode plays
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Current position in seconds
    TimeUpdate(f64),
    /// Playback reached the end of the stream
    Ended,
    /// The episode could not be played, or the player went away mid-stream
    Failed(String),
}

/// Errors from local player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Player did not open its control socket")]
    NoControlSocket,
    #[error("Local playback is not supported on this platform")]
    Unsupported,
}

/// Translate one line of mpv IPC output
pub fn parse_mpv_event(line: &str) -> Option<PlaybackEvent> {
    let value: Value = serde_json::from_str(line).ok()?;
    match value.get("event")?.as_str()? {
        "property-change" if value.get("id").and_then(Value::as_u64) == Some(OBS_TIME_POS) => {
            value
                .get("data")
                .and_then(Value::as_f64)
                .map(PlaybackEvent::TimeUpdate)
        }
        "end-file" => match value.get("reason").and_then(Value::as_str)? {
            "eof" => Some(PlaybackEvent::Ended),
            "error" => {
                let reason = value
                    .get("file_error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                Some(PlaybackEvent::Failed(format!("Playback failed: {}", reason)))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Launches mpv for episode playback
#[derive(Debug, Clone)]
pub struct LocalPlayer {
    binary: String,
}

impl Default for LocalPlayer {
    fn default() -> Self {
        Self::new("mpv")
    }
}

impl LocalPlayer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Start playing `url`, forwarding events to `events`
    #[cfg(unix)]
    pub async fn play(
        &self,
        url: &str,
        events: mpsc::UnboundedSender<PlaybackEvent>,
    ) -> Result<PlaybackSession, PlayerError> {
        let socket_path = std::env::temp_dir().join(format!(
            "podview-mpv-{}-{}.sock",
            std::process::id(),
            NEXT_SOCKET_ID.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = tokio::fs::remove_file(&socket_path).await;

        let mut child = Command::new(&self.binary)
            .arg("--no-video")
            .arg("--no-terminal")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PlayerError::NotFound(self.binary.clone())
                } else {
                    PlayerError::StartFailed(e)
                }
            })?;
        info!(binary = %self.binary, %url, "player started");

        let stream = match connect_socket(&socket_path).await {
            Some(stream) => stream,
            None => {
                let _ = child.kill().await;
                return Err(PlayerError::NoControlSocket);
            }
        };

        let reader = tokio::spawn(async move {
            let lost = match forward_events(stream, &events).await {
                Ok(true) => return,
                Ok(false) => "Player exited before the episode finished".to_string(),
                Err(e) => {
                    warn!(error = %e, "player socket closed with error");
                    format!("Lost connection to player: {}", e)
                }
            };
            let _ = events.send(PlaybackEvent::Failed(lost));
        });

        Ok(PlaybackSession {
            child,
            reader,
            socket_path,
        })
    }

    #[cfg(not(unix))]
    pub async fn play(
        &self,
        _url: &str,
        _events: mpsc::UnboundedSender<PlaybackEvent>,
    ) -> Result<PlaybackSession, PlayerError> {
        Err(PlayerError::Unsupported)
    }
}

/// A running player process
#[derive(Debug)]
pub struct PlaybackSession {
    child: Child,
    reader: JoinHandle<()>,
    socket_path: PathBuf,
}

impl PlaybackSession {
    /// Kill the player and stop forwarding events
    pub async fn stop(mut self) {
        self.reader.abort();
        let _ = self.child.kill().await;
        let _ = tokio::fs::remove_file(&self.socket_path).await;
        debug!("player stopped");
    }
}

#[cfg(unix)]
async fn connect_socket(path: &std::path::Path) -> Option<tokio::net::UnixStream> {
    for _ in 0..50 {
        if let Ok(stream) = tokio::net::UnixStream::connect(path).await {
            return Some(stream);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    None
}

/// Forward player events until the socket closes.
///
/// Returns true once `Ended` or `Failed` was delivered, or the receiver is gone.
#[cfg(unix)]
async fn forward_events(
    stream: tokio::net::UnixStream,
    events: &mpsc::UnboundedSender<PlaybackEvent>,
) -> std::io::Result<bool> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let (read, mut write) = stream.into_split();
    let observe = serde_json::json!({ "command": ["observe_property", OBS_TIME_POS, "time-pos"] });
    write.write_all(format!("{}\n", observe).as_bytes()).await?;

    let mut lines = BufReader::new(read).lines();
    let mut last_tick: Option<tokio::time::Instant> = None;

    while let Some(line) = lines.next_line().await? {
        let Some(event) = parse_mpv_event(&line) else {
            continue;
        };
        if let PlaybackEvent::TimeUpdate(_) = event {
            let now = tokio::time::Instant::now();
            if last_tick.is_some_and(|t| now.duration_since(t) < TICK_INTERVAL) {
                continue;
            }
            last_tick = Some(now);
        }
        let terminal = matches!(event, PlaybackEvent::Ended | PlaybackEvent::Failed(_));
        if events.send(event).is_err() || terminal {
            return Ok(true);
        }
    }
    Ok(false)
}
