//! Fault boundary around routed pages.
//!
//! A page render that panics or returns an error is replaced by a generic
//! fallback instead of taking the whole app down. The fallback offers two
//! ways out: retry the page in place, or go back to the start.

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::error;

/// Recovery options offered by the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackAction {
    Retry,
    ReturnToStart,
}

/// What the host shows instead of a faulted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fallback {
    pub page: String,
    pub message: String,
    pub actions: Vec<FallbackAction>,
}

#[derive(Debug)]
pub enum PageOutcome<T> {
    Rendered(T),
    Fallback(Fallback),
}

impl<T> PageOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Wraps renders of one page. Counts faults so the host can tell a retry
/// loop from a one-off.
#[derive(Debug)]
pub struct FaultBoundary {
    page: String,
    faults: u32,
}

impl FaultBoundary {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            faults: 0,
        }
    }

    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Run `render`, catching panics and errors.
    pub fn render<T, E, F>(&mut self, render: F) -> PageOutcome<T>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let reason = match panic::catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(value)) => return PageOutcome::Rendered(value),
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        self.faults += 1;
        error!(page = %self.page, faults = self.faults, reason = %reason, "Page render failed");
        PageOutcome::Fallback(Fallback {
            page: self.page.clone(),
            message: "Something went wrong on this page.".to_string(),
            actions: vec![FallbackAction::Retry, FallbackAction::ReturnToStart],
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_render_passes_through() {
        let mut boundary = FaultBoundary::new("diet");
        let outcome = boundary.render(|| Ok::<_, String>(42));
        assert!(matches!(outcome, PageOutcome::Rendered(42)));
        assert_eq!(boundary.faults(), 0);
    }

    #[test]
    fn error_becomes_fallback() {
        let mut boundary = FaultBoundary::new("diet");
        let outcome = boundary.render(|| Err::<(), _>("template missing"));
        match outcome {
            PageOutcome::Fallback(fallback) => {
                assert_eq!(fallback.page, "diet");
                assert_eq!(
                    fallback.actions,
                    vec![FallbackAction::Retry, FallbackAction::ReturnToStart]
                );
            }
            PageOutcome::Rendered(_) => panic!("expected fallback"),
        }
    }

    #[test]
    fn panic_is_contained_and_retry_can_succeed() {
        let mut boundary = FaultBoundary::new("goals");
        let outcome = boundary.render(|| -> Result<(), String> { panic!("index out of bounds") });
        assert!(outcome.is_fallback());
        assert_eq!(boundary.faults(), 1);

        let retried = boundary.render(|| Ok::<_, String>("ok"));
        assert!(matches!(retried, PageOutcome::Rendered("ok")));
    }

    #[test]
    fn panic_message_extracts_strings() {
        let owned: Box<dyn std::any::Any + Send> = Box::new("boom".to_string());
        assert_eq!(panic_message(owned.as_ref()), "boom");
        let other: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
