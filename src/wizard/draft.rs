//! WizardDraftStore: owns the in-progress answer set.

use tracing::debug;

use super::model::{StepPatch, WizardDraft};

/// Holds the answers for one wizard session.
///
/// Performs no validation and no persistence; `StepController` does both.
#[derive(Debug, Default)]
pub struct WizardDraftStore {
    draft: WizardDraft,
}

impl WizardDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved answers.
    pub fn with_draft(draft: WizardDraft) -> Self {
        Self { draft }
    }

    /// Snapshot of the current answers.
    pub fn draft(&self) -> WizardDraft {
        self.draft.clone()
    }

    /// Borrow the current answers without cloning.
    pub fn as_draft(&self) -> &WizardDraft {
        &self.draft
    }

    /// Shallow-merge `patch` into the draft. Fields the patch leaves as
    /// `None` keep their current value.
    pub fn merge_step(&mut self, patch: StepPatch) {
        debug!(step = %patch.step(), "Merging step answers");
        self.draft.merge(patch);
    }

    /// Discard every answer.
    pub fn reset(&mut self) {
        self.draft = WizardDraft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::model::{PetAnswers, Species};

    #[test]
    fn starts_empty_and_resets_to_empty() {
        let mut store = WizardDraftStore::new();
        assert_eq!(store.draft(), WizardDraft::default());

        store.merge_step(StepPatch::Pet(PetAnswers {
            species: Some(Species::Cat),
            ..Default::default()
        }));
        assert_eq!(store.as_draft().species, Some(Species::Cat));

        store.reset();
        assert_eq!(store.draft(), WizardDraft::default());
    }

    #[test]
    fn snapshot_is_detached() {
        let mut store = WizardDraftStore::new();
        let before = store.draft();
        store.merge_step(StepPatch::Pet(PetAnswers {
            species: Some(Species::Dog),
            ..Default::default()
        }));
        assert!(before.species.is_none());
    }
}
