//! Progressive disclosure: sections animate into view once, as the user
//! scrolls to them.

pub mod registry;
pub mod visibility;

pub use registry::{RevealEvent, RevealRegistry, RevealState, SectionKind};
pub use visibility::{
    IntersectionEntry, NoopObserver, ObserveOptions, Span, VisibilityObserver, intersection_ratio,
};
