//! Local playback model.
//!
//! The CLI has no real video; it keeps an anchored clock instead. While
//! playing, the position advances with wall time from the last anchor.
//! All methods take `now` so the model stays deterministic under test.

use std::time::Instant;

use watchroom_server::domain::PlaybackAction;

/// Drift above which a remote `play` seeks before resuming (seconds)
pub const DRIFT_THRESHOLD_SECS: f64 = 0.5;

/// How a remote sync event was applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reconciliation {
    /// Within tolerance; playback resumed from the local position
    Resumed,
    /// Local position was off by `drift` seconds; jumped to the remote position
    SeekedAndResumed { drift: f64 },
    Paused,
    /// Jumped to the remote position and stopped
    SeekedAndPaused,
}

#[derive(Debug, Clone)]
pub struct LocalPlayer {
    is_playing: bool,
    anchor_position: f64,
    anchor_at: Instant,
    video_url: Option<String>,
}

impl LocalPlayer {
    pub fn new(now: Instant) -> Self {
        Self {
            is_playing: false,
            anchor_position: 0.0,
            anchor_at: now,
            video_url: None,
        }
    }

    /// Current position in seconds
    pub fn position(&self, now: Instant) -> f64 {
        if self.is_playing {
            let elapsed = now.saturating_duration_since(self.anchor_at).as_secs_f64();
            self.anchor_position + elapsed
        } else {
            self.anchor_position
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    pub fn set_video_url(&mut self, video_url: String) {
        self.video_url = Some(video_url);
    }

    /// Resume playback, optionally from `from` seconds
    pub fn play(&mut self, from: Option<f64>, now: Instant) {
        let position = from.unwrap_or_else(|| self.position(now));
        self.anchor(position, now);
        self.is_playing = true;
    }

    pub fn pause(&mut self, now: Instant) {
        let position = self.position(now);
        self.anchor(position, now);
        self.is_playing = false;
    }

    /// Jump to `position` and stop
    pub fn seek(&mut self, position: f64, now: Instant) {
        self.anchor(position, now);
        self.is_playing = false;
    }

    /// Apply a `sync-event` received from the host.
    pub fn apply_sync(
        &mut self,
        action: PlaybackAction,
        position: f64,
        now: Instant,
    ) -> Reconciliation {
        match action {
            PlaybackAction::Play => {
                let drift = (self.position(now) - position).abs();
                if drift > DRIFT_THRESHOLD_SECS {
                    self.play(Some(position), now);
                    Reconciliation::SeekedAndResumed { drift }
                } else {
                    self.play(None, now);
                    Reconciliation::Resumed
                }
            }
            PlaybackAction::Pause => {
                self.pause(now);
                Reconciliation::Paused
            }
            PlaybackAction::Seek => {
                self.seek(position, now);
                Reconciliation::SeekedAndPaused
            }
        }
    }

    /// Apply an `initial-sync`: position and play state are taken verbatim.
    pub fn apply_initial_sync(
        &mut self,
        is_playing: bool,
        position: f64,
        video_url: Option<String>,
        now: Instant,
    ) {
        self.anchor(position, now);
        self.is_playing = is_playing;
        if let Some(video_url) = video_url {
            self.video_url = Some(video_url);
        }
    }

    fn anchor(&mut self, position: f64, now: Instant) {
        self.anchor_position = position.max(0.0);
        self.anchor_at = now;
    }
}
