//! Declarative hover/press state for interactive controls.

use serde::Serialize;

/// Pointer input for a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Down,
    Up,
    /// Touch interrupted (scroll started, OS gesture).
    Cancel,
}

/// Visual feedback state for one control. Rendering reads it; nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PressState {
    pub hovered: bool,
    pub pressed: bool,
}

impl PressState {
    /// Apply a pointer event. Returns true when the event completes a press
    /// (an activation).
    pub fn apply(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Enter => {
                self.hovered = true;
                false
            }
            PointerEvent::Leave => {
                self.hovered = false;
                self.pressed = false;
                false
            }
            PointerEvent::Down => {
                self.pressed = true;
                false
            }
            PointerEvent::Up => std::mem::take(&mut self.pressed),
            PointerEvent::Cancel => {
                *self = Self::default();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_activates_once() {
        let mut state = PressState::default();
        state.apply(PointerEvent::Enter);
        state.apply(PointerEvent::Down);
        assert!(state.pressed);
        assert!(state.apply(PointerEvent::Up));
        assert!(!state.apply(PointerEvent::Up));
        assert!(state.hovered);
    }

    #[test]
    fn leaving_mid_press_cancels_activation() {
        let mut state = PressState::default();
        state.apply(PointerEvent::Down);
        state.apply(PointerEvent::Leave);
        assert!(!state.apply(PointerEvent::Up));
    }

    #[test]
    fn touch_cancel_clears_everything() {
        let mut state = PressState {
            hovered: true,
            pressed: true,
        };
        assert!(!state.apply(PointerEvent::Cancel));
        assert_eq!(state, PressState::default());
    }
}
