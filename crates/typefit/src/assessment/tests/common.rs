use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::assessment::bank::ItemBank;
use crate::assessment::domain::{AssessmentAnswers, CognitiveFunction, Dichotomy};
use crate::assessment::scoring::ScoringEngine;
use crate::assessment::service::AssessmentService;

pub(super) fn bank() -> ItemBank {
    ItemBank::standard().expect("standard bank loads")
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::default()
}

pub(super) fn service() -> Arc<AssessmentService> {
    Arc::new(AssessmentService::new(
        Arc::new(bank()),
        Arc::new(engine()),
    ))
}

/// Choose the option labelled `pole` wherever a question offers it.
pub(super) fn answer_every(bank: &ItemBank, pole: &str) -> BTreeMap<u32, String> {
    bank.questions()
        .forced_choice
        .iter()
        .filter(|question| question.option(pole).is_some())
        .map(|question| (question.number, pole.to_string()))
        .collect()
}

/// Answer `1` on every Likert item whose first construct is in `functions`.
pub(super) fn lean_toward(
    bank: &ItemBank,
    functions: &[CognitiveFunction],
) -> BTreeMap<String, u8> {
    bank.likert_questions()
        .iter()
        .filter(|question| functions.contains(&question.construct1))
        .map(|question| (question.id.clone(), 1))
        .collect()
}

pub(super) fn answers(
    forced_choice: BTreeMap<u32, String>,
    likert: BTreeMap<String, u8>,
) -> AssessmentAnswers {
    AssessmentAnswers {
        forced_choice,
        likert,
    }
}

/// Question numbers of the standard bank measuring `dichotomy`.
pub(super) fn questions_for(bank: &ItemBank, dichotomy: Dichotomy) -> Vec<u32> {
    bank.parameters()
        .questions_for(dichotomy)
        .map(|(number, _)| number)
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
