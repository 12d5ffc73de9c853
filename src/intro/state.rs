//! Intro gate state machine.

use serde::{Deserialize, Serialize};

/// Where the one-time intro sequence stands.
///
/// Progresses: NotYetShown → Playing → (Transitioning →) Shown. A gate sits
/// in `NotYetShown` only until the persisted flag is read. `Shown` is
/// terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroState {
    NotYetShown,
    Playing,
    Transitioning,
    Shown,
}

/// Media lifecycle and user events that end the intro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroEvent {
    /// The media played to the end.
    Ended,
    /// The user tapped the overlay.
    Skip,
    /// The media could not be loaded or played.
    LoadFailed,
}

impl IntroState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: IntroState) -> bool {
        use IntroState::*;
        matches!(
            (self, target),
            (NotYetShown, Playing)
                | (NotYetShown, Shown)
                | (Playing, Transitioning)
                | (Playing, Shown)
                | (Transitioning, Shown)
        )
    }

    /// Resolve the pre-load state once the persisted flag has been read.
    /// Any other state is left alone.
    pub fn on_flag(&self, seen: bool) -> IntroState {
        match self {
            Self::NotYetShown if seen => Self::Shown,
            Self::NotYetShown => Self::Playing,
            other => *other,
        }
    }

    /// The state an event moves to, or `None` if the event does not apply.
    ///
    /// Media events cannot arrive before the flag is read, so `NotYetShown`
    /// ignores them.
    pub fn on_event(&self, event: IntroEvent) -> Option<IntroState> {
        use IntroState::*;
        match (self, event) {
            (Playing, IntroEvent::Ended) => Some(Transitioning),
            (Playing, IntroEvent::Skip | IntroEvent::LoadFailed) => Some(Shown),
            // Skipping during the exit animation jumps straight to the content.
            (Transitioning, IntroEvent::Skip) => Some(Shown),
            _ => None,
        }
    }

    /// Whether the full-screen overlay covers the page.
    pub fn overlay_visible(&self) -> bool {
        matches!(self, Self::Playing | Self::Transitioning)
    }

    /// Whether the page content is visible. Content stays mounted in every
    /// state; it is only visually suppressed while gated.
    pub fn content_visible(&self) -> bool {
        matches!(self, Self::Shown)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Shown)
    }
}

impl Default for IntroState {
    fn default() -> Self {
        Self::NotYetShown
    }
}

impl std::fmt::Display for IntroState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotYetShown => "not_yet_shown",
            Self::Playing => "playing",
            Self::Transitioning => "transitioning",
            Self::Shown => "shown",
        };
        write!(f, "{s}")
    }
}
