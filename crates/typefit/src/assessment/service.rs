use std::sync::Arc;

use tracing::info;

use super::bank::{ItemBank, QuestionSet};
use super::domain::AssessmentAnswers;
use super::scoring::{AssessmentResult, ScoringEngine, ScoringError};
use crate::config::AssessmentConfig;
use crate::error::AppError;

/// Pairs a loaded item bank with the scoring engine that reads it.
#[derive(Debug, Clone)]
pub struct AssessmentService {
    bank: Arc<ItemBank>,
    engine: Arc<ScoringEngine>,
}

impl AssessmentService {
    pub fn new(bank: Arc<ItemBank>, engine: Arc<ScoringEngine>) -> Self {
        Self { bank, engine }
    }

    /// Load the configured bank and build an engine for its policy.
    pub fn from_config(config: &AssessmentConfig) -> Result<Self, AppError> {
        let bank = config.load_bank()?;
        let engine = config.engine()?;
        info!(
            items = bank.parameters().len(),
            likert = bank.likert_questions().len(),
            custom_bank = config.bank.is_some(),
            "item bank loaded"
        );
        Ok(Self::new(Arc::new(bank), Arc::new(engine)))
    }

    /// Score a completed submission.
    pub fn score(&self, answers: &AssessmentAnswers) -> Result<AssessmentResult, ScoringError> {
        let result = self.engine.score(answers, &self.bank)?;
        info!(
            final_type = %result.final_type,
            score = result.score,
            letters = %result.preferred_letters(),
            "assessment completed"
        );
        Ok(result)
    }

    pub fn questions(&self) -> &QuestionSet {
        self.bank.questions()
    }

    pub fn bank(&self) -> &ItemBank {
        &self.bank
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }
}
