//! IntroGate: shows the one-time intro sequence on a first visit.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::IntroConfig;
use crate::error::StoreError;
use crate::store::{Flags, keys};

use super::state::{IntroEvent, IntroState};

/// Gates a page's content behind the intro sequence until it has been
/// completed once on this device.
pub struct IntroGate {
    state: IntroState,
    flags: Flags,
    config: IntroConfig,
    completion_recorded: bool,
}

impl IntroGate {
    /// Evaluate the persisted flag and resolve `NotYetShown` to `Shown` or
    /// `Playing`.
    ///
    /// A flag that is missing, unreadable, or not a boolean counts as "not
    /// seen", so the intro plays again.
    pub async fn load(flags: Flags, config: IntroConfig) -> Self {
        let seen = flags
            .get_bool(keys::INTRO_VIDEO_SEEN)
            .await
            .unwrap_or(false);

        let state = IntroState::default().on_flag(seen);
        debug!(state = %state, "Intro gate loaded");

        Self {
            state,
            flags,
            config,
            completion_recorded: seen,
        }
    }

    pub fn state(&self) -> IntroState {
        self.state
    }

    /// How long the overlay exit animation runs after a natural end.
    pub fn exit_animation(&self) -> Duration {
        self.config.exit_animation
    }

    /// Apply a media or user event.
    ///
    /// Ending, skipping, and failing all record completion. Only a natural
    /// end passes through `Transitioning`; the host calls `finish_exit` once
    /// the exit animation is done. Events that don't apply are ignored.
    pub async fn handle(&mut self, event: IntroEvent) -> IntroState {
        let Some(target) = self.state.on_event(event) else {
            debug!(state = %self.state, event = ?event, "Ignoring intro event");
            return self.state;
        };

        if event == IntroEvent::LoadFailed {
            warn!("Intro media failed to load, revealing content");
        }

        self.record_completion().await;
        info!(from = %self.state, to = %target, event = ?event, "Intro gate transition");
        self.state = target;
        self.state
    }

    /// End the exit animation. Only meaningful while `Transitioning`.
    pub fn finish_exit(&mut self) -> IntroState {
        if self.state == IntroState::Transitioning {
            info!("Intro exit animation finished");
            self.state = IntroState::Shown;
        }
        self.state
    }

    /// Forget that the intro was ever completed, so the next load plays it.
    pub async fn forget(flags: &Flags) -> Result<bool, StoreError> {
        flags.clear(keys::INTRO_VIDEO_SEEN).await
    }

    /// Write the completion flag the first time the gate opens.
    ///
    /// A failed write still opens the gate; the intro will simply play
    /// again on the next load.
    async fn record_completion(&mut self) {
        if self.completion_recorded {
            return;
        }
        self.completion_recorded = true;
        if let Err(e) = self.flags.set_bool(keys::INTRO_VIDEO_SEEN, true).await {
            warn!(error = %e, "Failed to persist intro completion");
        }
    }
}
