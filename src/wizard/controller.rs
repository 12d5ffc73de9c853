//! StepController: per-step validation, transitions, and results handoff.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{DraftPersistence, ReentryPolicy, WizardConfig};
use crate::error::{AnswerError, HandoffError};
use crate::store::{Flags, keys};

use super::draft::WizardDraftStore;
use super::model::{DietAnswers, GoalAnswers, NO_INGREDIENTS, StepPatch, WizardDraft};
use super::selection::{Toggle, dedup_tags, normalize_exclusive, toggle_capped, toggle_exclusive};
use super::step::WizardStep;

/// Moves the host between screens. The controller never sees URLs.
pub trait Navigator: Send + Sync {
    fn go_to_step(&self, step: WizardStep);
    fn go_to_results(&self);
}

/// Downstream consumer of a completed draft.
#[async_trait]
pub trait ResultsHandler: Send + Sync {
    async fn receive(&self, draft: WizardDraft) -> Result<(), HandoffError>;
}

/// Result of asking the controller to move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Now on `step`.
    Moved { step: WizardStep },
    /// Required answers are missing; nothing changed.
    Blocked,
    /// The draft went to the results collaborator.
    HandedOff,
}

/// Snapshot of the wizard for display.
#[derive(Debug, Clone, Serialize)]
pub struct WizardStatus {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub ordinal: u8,
    pub can_advance: bool,
    pub handed_off: bool,
    pub draft: WizardDraft,
}

/// Drives the linear step flow over a single draft.
pub struct StepController {
    config: WizardConfig,
    session_id: Uuid,
    step: WizardStep,
    drafts: WizardDraftStore,
    flags: Flags,
    navigator: Arc<dyn Navigator>,
    results: Arc<dyn ResultsHandler>,
    handed_off: bool,
}

impl StepController {
    /// Start a wizard session on the landing step.
    ///
    /// With `DraftPersistence::Persisted`, answers saved by an earlier
    /// process are restored.
    pub async fn start(
        config: WizardConfig,
        flags: Flags,
        navigator: Arc<dyn Navigator>,
        results: Arc<dyn ResultsHandler>,
    ) -> Self {
        let drafts = match config.draft_persistence {
            DraftPersistence::Persisted => match flags.get_json::<WizardDraft>(keys::WIZARD_DRAFT).await {
                Some(draft) => {
                    info!("Restored saved wizard draft");
                    WizardDraftStore::with_draft(draft)
                }
                None => WizardDraftStore::new(),
            },
            DraftPersistence::Session => WizardDraftStore::new(),
        };

        let session_id = Uuid::new_v4();
        info!(session_id = %session_id, "Wizard session started");

        Self {
            config,
            session_id,
            step: WizardStep::Landing,
            drafts,
            flags,
            navigator,
            results,
            handed_off: false,
        }
    }

    /// Per-step required-field check.
    ///
    /// Only the pet step blocks: species, life stage, and weight must all
    /// be answered.
    pub fn can_advance(step: WizardStep, draft: &WizardDraft) -> bool {
        match step {
            WizardStep::Pet => draft.pet_complete(),
            _ => true,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> WizardDraft {
        self.drafts.draft()
    }

    pub fn status(&self) -> WizardStatus {
        WizardStatus {
            session_id: self.session_id,
            step: self.step,
            ordinal: self.step.ordinal(),
            can_advance: Self::can_advance(self.step, self.drafts.as_draft()),
            handed_off: self.handed_off,
            draft: self.drafts.draft(),
        }
    }

    /// Move forward one step, or hand off from the final step.
    ///
    /// Missing required answers make this a silent no-op. A failed handoff
    /// leaves the controller on the final step with the draft intact.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, HandoffError> {
        if self.reenter().await {
            return Ok(AdvanceOutcome::Moved { step: self.step });
        }

        if !Self::can_advance(self.step, self.drafts.as_draft()) {
            debug!(step = %self.step, "Advance blocked, required answers missing");
            return Ok(AdvanceOutcome::Blocked);
        }

        match self.step.next() {
            Some(next) => {
                info!(from = %self.step, to = %next, "Wizard advanced");
                self.step = next;
                self.navigator.go_to_step(next);
                Ok(AdvanceOutcome::Moved { step: next })
            }
            None => {
                self.results.receive(self.drafts.draft()).await?;
                self.handed_off = true;
                info!(session_id = %self.session_id, "Wizard draft handed off to results");
                self.navigator.go_to_results();
                Ok(AdvanceOutcome::HandedOff)
            }
        }
    }

    /// Move back one step. Never clears answers; a no-op on the landing step.
    pub async fn retreat(&mut self) -> WizardStep {
        if self.reenter().await {
            return self.step;
        }

        if let Some(prev) = self.step.prev() {
            info!(from = %self.step, to = %prev, "Wizard went back");
            self.step = prev;
            self.navigator.go_to_step(prev);
        }
        self.step
    }

    /// Merge answers from the step currently on screen.
    ///
    /// Patches for any other step are refused: only the mounted step writes
    /// to the draft. Tag sets get the same rules as the toggles: repeats
    /// collapse, `"None"` is dropped next to other ingredients, and more
    /// priorities than the cap refuses the whole patch.
    pub async fn update(&mut self, patch: StepPatch) -> Result<(), AnswerError> {
        self.reenter().await;

        if patch.step() != self.step {
            warn!(
                current = %self.step,
                patch = %patch.step(),
                "Ignoring answers for a step that is not on screen"
            );
            return Err(AnswerError::NotOnScreen {
                current: self.step,
                patch: patch.step(),
            });
        }

        let patch = self.normalize(patch)?;
        self.drafts.merge_step(patch);
        self.save_draft().await;
        Ok(())
    }

    fn normalize(&self, mut patch: StepPatch) -> Result<StepPatch, AnswerError> {
        match &mut patch {
            StepPatch::Diet(DietAnswers {
                avoid_ingredients: Some(tags),
                ..
            }) => normalize_exclusive(tags, NO_INGREDIENTS),
            StepPatch::Goals(GoalAnswers {
                priorities: Some(tags),
                ..
            }) => {
                dedup_tags(tags);
                let max = self.config.max_priorities;
                if tags.len() > max {
                    warn!(count = tags.len(), max = max, "Rejecting answers with too many priorities");
                    return Err(AnswerError::TooManyPriorities {
                        count: tags.len(),
                        max,
                    });
                }
            }
            _ => {}
        }
        Ok(patch)
    }

    /// Whether `owner` is on screen after applying the re-entry policy.
    async fn owns_selection(&mut self, owner: WizardStep, tag: &str) -> bool {
        self.reenter().await;
        if self.step != owner {
            debug!(current = %self.step, owner = %owner, tag = tag, "Ignoring toggle off its step");
            return false;
        }
        true
    }

    /// Toggle an ingredient to avoid. `"None"` excludes every other tag.
    /// Only the diet step may toggle.
    pub async fn toggle_ingredient(&mut self, tag: &str) -> Toggle {
        if !self.owns_selection(WizardStep::Diet, tag).await {
            return Toggle::NotOnScreen;
        }

        let mut tags = self.drafts.as_draft().avoid_ingredients.clone();
        let result = toggle_exclusive(&mut tags, tag, NO_INGREDIENTS);

        self.drafts.merge_step(StepPatch::Diet(DietAnswers {
            avoid_ingredients: Some(tags),
            feeding_style: None,
        }));
        self.save_draft().await;
        result
    }

    /// Toggle a top priority. Selections beyond the configured cap are
    /// rejected. Only the goals step may toggle.
    pub async fn toggle_priority(&mut self, tag: &str) -> Toggle {
        if !self.owns_selection(WizardStep::Goals, tag).await {
            return Toggle::NotOnScreen;
        }

        let mut tags = self.drafts.as_draft().priorities.clone();
        let result = toggle_capped(&mut tags, tag, self.config.max_priorities);

        if result == Toggle::Rejected {
            debug!(tag = tag, max = self.config.max_priorities, "Priority selection rejected");
            return result;
        }

        self.drafts.merge_step(StepPatch::Goals(GoalAnswers {
            priorities: Some(tags),
            main_goal: None,
        }));
        self.save_draft().await;
        result
    }

    /// Abandon the session: clear every answer and return to the landing step.
    pub async fn reset(&mut self) {
        self.drafts.reset();
        self.step = WizardStep::Landing;
        self.handed_off = false;
        self.session_id = Uuid::new_v4();

        if self.config.draft_persistence == DraftPersistence::Persisted {
            if let Err(e) = self.flags.clear(keys::WIZARD_DRAFT).await {
                warn!(error = %e, "Failed to clear saved wizard draft");
            }
        }

        info!(session_id = %self.session_id, "Wizard reset");
        self.navigator.go_to_step(WizardStep::Landing);
    }

    /// Apply the re-entry policy if the draft was already handed off.
    ///
    /// Returns true when the call restarted the session, in which case the
    /// triggering navigation is not applied.
    async fn reenter(&mut self) -> bool {
        if !self.handed_off {
            return false;
        }

        match self.config.reentry {
            ReentryPolicy::ReuseDraft => {
                debug!("Re-entering wizard with the handed-off draft");
                self.handed_off = false;
                false
            }
            ReentryPolicy::StartFresh => {
                debug!("Re-entering wizard with a fresh draft");
                self.reset().await;
                true
            }
        }
    }

    async fn save_draft(&self) {
        if self.config.draft_persistence != DraftPersistence::Persisted {
            return;
        }
        if let Err(e) = self
            .flags
            .set_json(keys::WIZARD_DRAFT, self.drafts.as_draft())
            .await
        {
            warn!(error = %e, "Failed to persist wizard draft");
        }
    }
}
