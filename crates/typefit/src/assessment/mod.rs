//! Personality-type assessment: item bank, trait estimation and holistic scoring.
//!
//! Forced-choice answers feed a 2PL maximum-likelihood estimate per dichotomy,
//! Likert answers accumulate cognitive-function strengths, and every one of the
//! sixteen function stacks is scored against both before the best fit is picked.

pub mod bank;
pub mod domain;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use bank::{BankError, ItemBank, ItemParameter, ItemParameterTable, QuestionSet};
pub use domain::{
    AssessmentAnswers, ChoiceOption, ClarityCategory, CognitiveFunction, Dichotomy,
    ForcedChoiceQuestion, FunctionStack, LikertQuestion, TypeLabel,
};
pub use router::assessment_router;
pub use scoring::{
    AssessmentResult, AttitudeStrengths, ClarityCurve, ClarityWeighting, DichotomyEstimate,
    PolicyError, PositionWeights, ScoringEngine, ScoringError, ScoringPolicy, TypeScore,
};
pub use service::AssessmentService;
