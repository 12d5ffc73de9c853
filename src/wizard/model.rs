//! Wizard answer types and the accumulating draft.

use serde::{Deserialize, Serialize};

use super::step::WizardStep;

/// Sentinel ingredient tag meaning "nothing to avoid".
pub const NO_INGREDIENTS: &str = "None";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Species {
    Dog,
    Cat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LifeStage {
    #[serde(rename = "Puppy/Kitten")]
    Young,
    Adult,
    Senior,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WeightBand {
    #[serde(rename = "0-10 lb")]
    UpTo10,
    #[serde(rename = "11-25 lb")]
    From11To25,
    #[serde(rename = "26-50 lb")]
    From26To50,
    #[serde(rename = "51-100 lb")]
    From51To100,
    #[serde(rename = "100+ lb")]
    Over100,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeedingStyle {
    Dry,
    Wet,
    Raw,
    #[serde(rename = "Freeze-dried")]
    FreezeDried,
    Mixed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MainGoal {
    Digestion,
    #[serde(rename = "Skin & coat")]
    SkinAndCoat,
    #[serde(rename = "Weight management")]
    WeightManagement,
    Energy,
    Longevity,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetBand {
    #[serde(rename = "Under $50")]
    Under50,
    #[serde(rename = "$50-100")]
    From50To100,
    #[serde(rename = "$100-150")]
    From100To150,
    #[serde(rename = "$150+")]
    Over150,
}

/// How much extra the user will pay for organic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrganicPremium {
    #[serde(rename = "No premium")]
    NoPremium,
    #[serde(rename = "Up to 10%")]
    Small,
    #[serde(rename = "Up to 25%")]
    Moderate,
    #[serde(rename = "Whatever it takes")]
    Any,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BuyingChannel {
    Online,
    #[serde(rename = "Pet store")]
    PetStore,
    Grocery,
    Subscription,
    Vet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AltProteinOpenness {
    Open,
    Curious,
    #[serde(rename = "Not interested")]
    NotInterested,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrganicExperience {
    #[serde(rename = "New to organic")]
    New,
    #[serde(rename = "Buy it sometimes")]
    Occasional,
    #[serde(rename = "Organic household")]
    Committed,
}

/// Every answer collected so far. Unanswered fields are `None` or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WizardDraft {
    // Step 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_stage: Option<LifeStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<WeightBand>,

    // Step 2
    #[serde(default)]
    pub avoid_ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeding_style: Option<FeedingStyle>,

    // Step 3
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_goal: Option<MainGoal>,

    // Step 4
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_premium: Option<OrganicPremium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buying_channel: Option<BuyingChannel>,

    // Step 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_protein: Option<AltProteinOpenness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_experience: Option<OrganicExperience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

/// Step 1: who the food is for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PetAnswers {
    pub species: Option<Species>,
    pub life_stage: Option<LifeStage>,
    pub weight: Option<WeightBand>,
}

/// Step 2: diet constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DietAnswers {
    pub avoid_ingredients: Option<Vec<String>>,
    pub feeding_style: Option<FeedingStyle>,
}

/// Step 3: what matters most.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalAnswers {
    pub priorities: Option<Vec<String>>,
    pub main_goal: Option<MainGoal>,
}

/// Step 4: spending and shopping habits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ShoppingAnswers {
    pub budget: Option<BudgetBand>,
    pub organic_premium: Option<OrganicPremium>,
    pub buying_channel: Option<BuyingChannel>,
}

/// Step 5: openness and location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct OpennessAnswers {
    pub alt_protein: Option<AltProteinOpenness>,
    pub organic_experience: Option<OrganicExperience>,
    pub zip_code: Option<String>,
}

/// Partial answers for one step. Fields left as `None` are not touched
/// when the patch is merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepPatch {
    Pet(PetAnswers),
    Diet(DietAnswers),
    Goals(GoalAnswers),
    Shopping(ShoppingAnswers),
    Openness(OpennessAnswers),
}

impl StepPatch {
    /// The step whose fields this patch carries.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::Pet(_) => WizardStep::Pet,
            Self::Diet(_) => WizardStep::Diet,
            Self::Goals(_) => WizardStep::Goals,
            Self::Shopping(_) => WizardStep::Shopping,
            Self::Openness(_) => WizardStep::Openness,
        }
    }
}

fn set_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl WizardDraft {
    /// Shallow-merge a step patch into the draft.
    pub fn merge(&mut self, patch: StepPatch) {
        match patch {
            StepPatch::Pet(a) => {
                set_if_some(&mut self.species, a.species);
                set_if_some(&mut self.life_stage, a.life_stage);
                set_if_some(&mut self.weight, a.weight);
            }
            StepPatch::Diet(a) => {
                if let Some(tags) = a.avoid_ingredients {
                    self.avoid_ingredients = tags;
                }
                set_if_some(&mut self.feeding_style, a.feeding_style);
            }
            StepPatch::Goals(a) => {
                if let Some(tags) = a.priorities {
                    self.priorities = tags;
                }
                set_if_some(&mut self.main_goal, a.main_goal);
            }
            StepPatch::Shopping(a) => {
                set_if_some(&mut self.budget, a.budget);
                set_if_some(&mut self.organic_premium, a.organic_premium);
                set_if_some(&mut self.buying_channel, a.buying_channel);
            }
            StepPatch::Openness(a) => {
                set_if_some(&mut self.alt_protein, a.alt_protein);
                set_if_some(&mut self.organic_experience, a.organic_experience);
                set_if_some(&mut self.zip_code, a.zip_code);
            }
        }
    }

    /// Whether every step-1 field is answered.
    pub fn pet_complete(&self) -> bool {
        self.species.is_some() && self.life_stage.is_some() && self.weight.is_some()
    }
}
