//! Wizard step state machine: which screen the user is on.

use serde::{Deserialize, Serialize};

/// The screens of the questionnaire, by ordinal.
///
/// Progresses linearly: Landing (0) → Pet (1) → Diet (2) → Goals (3) →
/// Shopping (4) → Openness (5). Moving forward from Openness hands the
/// draft to the results collaborator instead of entering another step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Landing,
    Pet,
    Diet,
    Goals,
    Shopping,
    Openness,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        Self::Landing,
        Self::Pet,
        Self::Diet,
        Self::Goals,
        Self::Shopping,
        Self::Openness,
    ];

    /// Position in the flow, 0 through 5.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Landing => 0,
            Self::Pet => 1,
            Self::Diet => 2,
            Self::Goals => 3,
            Self::Shopping => 4,
            Self::Openness => 5,
        }
    }

    pub fn from_ordinal(n: u8) -> Option<WizardStep> {
        Self::ALL.get(usize::from(n)).copied()
    }

    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Only single-ordinal moves are allowed, forward or back.
    pub fn can_transition_to(&self, target: WizardStep) -> bool {
        self.ordinal().abs_diff(target.ordinal()) == 1
    }

    /// The following step, or `None` on the final step.
    pub fn next(&self) -> Option<WizardStep> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// The preceding step, or `None` on the landing step.
    pub fn prev(&self) -> Option<WizardStep> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }

    /// Whether this is the last step before results.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Openness)
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Landing
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Landing => "landing",
            Self::Pet => "pet",
            Self::Diet => "diet",
            Self::Goals => "goals",
            Self::Shopping => "shopping",
            Self::Openness => "openness",
        };
        write!(f, "{s}")
    }
}
