//! Wizard: the linear pet-food questionnaire.
//!
//! The user walks six screens (landing plus five question steps). Answers
//! accumulate in a `WizardDraft` owned by a `WizardDraftStore`; the
//! `StepController` decides when the user may move on and hands the final
//! draft to a results collaborator.

pub mod controller;
pub mod draft;
pub mod model;
pub mod selection;
pub mod step;

pub use controller::{AdvanceOutcome, Navigator, ResultsHandler, StepController, WizardStatus};
pub use draft::WizardDraftStore;
pub use model::{StepPatch, WizardDraft};
pub use selection::Toggle;
pub use step::WizardStep;
