//! Viewport visibility: the observer seam and the "entered" policy.

use crate::config::RevealConfig;

/// Options handed to the observer when a section starts being watched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Intersection ratio at which the observer should report.
    pub threshold: f64,
    /// Fraction of the viewport height removed from the bottom edge.
    pub bottom_margin: f64,
}

impl From<&RevealConfig> for ObserveOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            bottom_margin: config.bottom_margin,
        }
    }
}

impl ObserveOptions {
    /// Whether an observed ratio counts as the section having entered view.
    pub fn is_entered(&self, ratio: f64) -> bool {
        ratio >= self.threshold
    }
}

/// External visibility primitive (an intersection observer in a browser,
/// a scroll tracker in a terminal).
///
/// The host reports intersections back through
/// `RevealRegistry::on_intersection`.
pub trait VisibilityObserver: Send + Sync {
    fn observe(&self, key: &str, options: &ObserveOptions);
    fn unobserve(&self, key: &str);
    /// Stop watching everything.
    fn disconnect(&self);
}

/// Observer for hosts that have no viewport; only hero sections reveal.
pub struct NoopObserver;

impl VisibilityObserver for NoopObserver {
    fn observe(&self, _key: &str, _options: &ObserveOptions) {}
    fn unobserve(&self, _key: &str) {}
    fn disconnect(&self) {}
}

/// One visibility report for a section.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub key: String,
    /// Fraction of the section's area inside the (margin-adjusted) viewport.
    pub ratio: f64,
}

/// Vertical extent of a section, in the same units and origin as the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

/// Ratio of `section` inside a viewport of `viewport_height`, after pulling
/// the viewport's bottom edge up by `bottom_margin` of its height.
///
/// Zero-height sections count as fully visible while inside the viewport.
pub fn intersection_ratio(section: Span, viewport_height: f64, bottom_margin: f64) -> f64 {
    let bottom_edge = viewport_height * (1.0 - bottom_margin);
    let top = section.top.max(0.0);
    let bottom = (section.top + section.height).min(bottom_edge);

    if section.height <= 0.0 {
        return if section.top >= 0.0 && section.top <= bottom_edge {
            1.0
        } else {
            0.0
        };
    }

    ((bottom - top).max(0.0) / section.height).clamp(0.0, 1.0)
}
