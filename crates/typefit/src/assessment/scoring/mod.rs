mod attitude;
mod clarity;
mod estimator;
mod holistic;
mod policy;

pub use attitude::{likert_weight, AttitudeStrengths};
pub use clarity::{clarity_category, preference_clarity_index, MAX_PCI};
pub use estimator::THETA_BOUND;
pub use policy::{ClarityCurve, ClarityWeighting, PolicyError, PositionWeights, ScoringPolicy};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bank::ItemBank;
use super::domain::{
    AssessmentAnswers, ClarityCategory, CognitiveFunction, Dichotomy, FunctionStack, TypeLabel,
};

/// Stateless scorer turning a completed answer set into a best-fit type.
///
/// Holds only the scoring policy; every call allocates its own working state,
/// so one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
    curve: Arc<dyn ClarityCurve>,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            curve: Arc::new(policy.clarity),
            policy,
        })
    }

    /// Replace the clarity curve built from the policy with a custom one.
    pub fn with_clarity_curve(mut self, curve: Arc<dyn ClarityCurve>) -> Self {
        self.curve = curve;
        self
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Estimate a single axis from the forced-choice answers.
    pub fn estimate(
        &self,
        dichotomy: Dichotomy,
        answers: &AssessmentAnswers,
        bank: &ItemBank,
    ) -> Result<DichotomyEstimate, ScoringError> {
        let responses = estimator::collect_responses(dichotomy, &answers.forced_choice, bank)?;
        let estimate = estimator::estimate_theta(&responses);

        let pci = preference_clarity_index(estimate.theta);
        let clarity = clarity_category(pci);
        let clarity_weight = self.curve.weight(pci, clarity);
        if !clarity_weight.is_finite() {
            return Err(ScoringError::NonFiniteClarityWeight { dichotomy, pci });
        }

        Ok(DichotomyEstimate {
            dichotomy,
            theta: estimate.theta,
            pci,
            clarity,
            clarity_weight,
            preferred_pole: dichotomy.preferred_pole(estimate.theta),
            answered: responses.len(),
            iterations: estimate.iterations,
            standard_error: estimate.standard_error(),
        })
    }

    pub fn attitude_strengths(
        &self,
        answers: &AssessmentAnswers,
        bank: &ItemBank,
    ) -> Result<AttitudeStrengths, ScoringError> {
        attitude::aggregate(&answers.likert, bank)
    }

    pub fn score(
        &self,
        answers: &AssessmentAnswers,
        bank: &ItemBank,
    ) -> Result<AssessmentResult, ScoringError> {
        estimator::check_forced_choice_answers(&answers.forced_choice, bank)?;

        let dichotomies = Dichotomy::ordered()
            .into_iter()
            .map(|dichotomy| self.estimate(dichotomy, answers, bank))
            .collect::<Result<Vec<_>, _>>()?;
        let attitude_strengths = self.attitude_strengths(answers, bank)?;

        let type_scores = holistic::score_types(&dichotomies, &attitude_strengths, &self.policy);
        let best = holistic::best_fit(&type_scores)
            .cloned()
            .ok_or(ScoringError::NoCandidates)?;
        let rationale = holistic::rationale(&dichotomies, &best);
        let stack = best.type_label.stack();

        debug!(
            final_type = %best.type_label,
            score = best.total,
            forced_choice = answers.forced_choice.len(),
            likert = answers.likert.len(),
            "assessment scored"
        );

        Ok(AssessmentResult {
            final_type: best.type_label,
            dominant: stack.dominant,
            auxiliary: stack.auxiliary,
            tertiary: stack.tertiary,
            inferior: stack.inferior,
            score: best.total,
            rationale,
            dichotomies,
            attitude_strengths,
            type_scores,
        })
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        let policy = ScoringPolicy::default();
        Self {
            curve: Arc::new(policy.clarity),
            policy,
        }
    }
}

/// Trait estimate and clarity for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DichotomyEstimate {
    pub dichotomy: Dichotomy,
    pub theta: f64,
    pub pci: u8,
    pub clarity: ClarityCategory,
    pub clarity_weight: f64,
    pub preferred_pole: char,
    pub answered: usize,
    pub iterations: usize,
    pub standard_error: Option<f64>,
}

impl DichotomyEstimate {
    /// Estimate for an axis with no usable evidence.
    pub fn neutral(dichotomy: Dichotomy, clarity_weight: f64) -> Self {
        Self {
            dichotomy,
            theta: 0.0,
            pci: 1,
            clarity: ClarityCategory::Slight,
            clarity_weight,
            preferred_pole: dichotomy.tie_break_pole(),
            answered: 0,
            iterations: 0,
            standard_error: None,
        }
    }
}

/// Holistic score for one candidate type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeScore {
    pub type_label: TypeLabel,
    pub dichotomy_term: f64,
    pub function_term: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub final_type: TypeLabel,
    pub dominant: CognitiveFunction,
    pub auxiliary: CognitiveFunction,
    pub tertiary: CognitiveFunction,
    pub inferior: CognitiveFunction,
    pub score: f64,
    pub rationale: String,
    pub dichotomies: Vec<DichotomyEstimate>,
    pub attitude_strengths: AttitudeStrengths,
    /// Every candidate in canonical order.
    pub type_scores: Vec<TypeScore>,
}

impl AssessmentResult {
    pub fn stack(&self) -> FunctionStack {
        FunctionStack {
            dominant: self.dominant,
            auxiliary: self.auxiliary,
            tertiary: self.tertiary,
            inferior: self.inferior,
        }
    }

    pub fn dichotomy(&self, dichotomy: Dichotomy) -> Option<&DichotomyEstimate> {
        self.dichotomies
            .iter()
            .find(|estimate| estimate.dichotomy == dichotomy)
    }

    /// Letters read axis by axis, e.g. `"ENT"`.
    pub fn preferred_letters(&self) -> String {
        self.dichotomies
            .iter()
            .map(|estimate| estimate.preferred_pole)
            .collect()
    }
}

/// Malformed answer data detected while scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("answer '{answer}' given for question {question}, which has no question metadata")]
    UnknownForcedChoiceQuestion { question: u32, answer: String },
    #[error("question {question}: answer '{answer}' is not one of the options ({available})")]
    UnknownOption {
        question: u32,
        answer: String,
        available: String,
    },
    #[error("answer given for unknown likert question '{id}'")]
    UnknownLikertQuestion { id: String },
    #[error("likert question '{id}': response {value} is outside 1..=5")]
    LikertOutOfRange { id: String, value: u8 },
    #[error("{dichotomy}: clarity curve returned a non-finite weight for PCI {pci}")]
    NonFiniteClarityWeight { dichotomy: Dichotomy, pci: u8 },
    #[error("no candidate types to score")]
    NoCandidates,
}
