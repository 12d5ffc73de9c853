//! Intro gate: one-time full-screen sequence shown on the first visit.

pub mod gate;
pub mod state;

pub use gate::IntroGate;
pub use state::{IntroEvent, IntroState};
