//! Newton-Raphson maximum-likelihood theta estimation under the 2PL model.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::super::bank::ItemBank;
use super::super::domain::{Dichotomy, ForcedChoiceQuestion};
use super::ScoringError;

pub const THETA_BOUND: f64 = 3.0;
pub(crate) const MAX_ITERATIONS: usize = 20;
const CONVERGENCE_TOLERANCE: f64 = 1e-4;
const FLAT_LIKELIHOOD: f64 = 1e-9;

/// One answered item, ready for the likelihood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ItemResponse {
    pub a: f64,
    pub b: f64,
    pub u: f64,
}

impl ItemResponse {
    fn probability(&self, theta: f64) -> f64 {
        1.0 / (1.0 + (-self.a * (theta - self.b)).exp())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ThetaEstimate {
    pub theta: f64,
    pub iterations: usize,
    pub information: f64,
}

impl ThetaEstimate {
    pub fn standard_error(&self) -> Option<f64> {
        (self.information > FLAT_LIKELIHOOD).then(|| 1.0 / self.information.sqrt())
    }
}

/// Resolve the recorded answers for every item measuring `dichotomy`.
pub(crate) fn collect_responses(
    dichotomy: Dichotomy,
    answers: &BTreeMap<u32, String>,
    bank: &ItemBank,
) -> Result<Vec<ItemResponse>, ScoringError> {
    let mut responses = Vec::new();

    for (number, item) in bank.parameters().questions_for(dichotomy) {
        let Some(choice) = answers.get(&number) else {
            continue;
        };

        let question = bank.forced_choice(number).ok_or_else(|| {
            ScoringError::UnknownForcedChoiceQuestion {
                question: number,
                answer: choice.clone(),
            }
        })?;

        let option = question
            .option(choice)
            .ok_or_else(|| unknown_option(question, choice))?;

        responses.push(ItemResponse {
            a: item.a,
            b: item.b,
            u: f64::from(option.score_key),
        });
    }

    Ok(responses)
}

fn unknown_option(question: &ForcedChoiceQuestion, choice: &str) -> ScoringError {
    ScoringError::UnknownOption {
        question: question.number,
        answer: choice.to_string(),
        available: question
            .options
            .iter()
            .map(|option| option.key.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Reject option keys the question does not offer, then log answers that no
/// dichotomy will consume.
pub(crate) fn check_forced_choice_answers(
    answers: &BTreeMap<u32, String>,
    bank: &ItemBank,
) -> Result<(), ScoringError> {
    for (number, choice) in answers {
        if let Some(question) = bank.forced_choice(*number) {
            if question.option(choice).is_none() {
                return Err(unknown_option(question, choice));
            }
        }
        if bank.parameters().get(*number).is_none() {
            warn!(
                question = *number,
                answer = %choice,
                "forced-choice answer has no item parameters; ignoring"
            );
        }
    }
    Ok(())
}

pub(crate) fn estimate_theta(responses: &[ItemResponse]) -> ThetaEstimate {
    let mut theta = 0.0_f64;
    let mut iterations = 0;

    if responses.is_empty() {
        return ThetaEstimate {
            theta,
            iterations,
            information: 0.0,
        };
    }

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let (first, second) = responses
            .iter()
            .fold((0.0_f64, 0.0_f64), |(first, second), item| {
                let p = item.probability(theta);
                (
                    first + item.a * (item.u - p),
                    second - item.a * item.a * (1.0 - p) * p,
                )
            });

        if second.abs() < FLAT_LIKELIHOOD {
            break;
        }

        let next = (theta - first / second).clamp(-THETA_BOUND, THETA_BOUND);
        let delta = (next - theta).abs();
        theta = next;
        if delta < CONVERGENCE_TOLERANCE {
            break;
        }
    }

    let information = responses
        .iter()
        .map(|item| {
            let p = item.probability(theta);
            item.a * item.a * p * (1.0 - p)
        })
        .sum();

    debug!(
        items = responses.len(),
        iterations, theta, information, "theta estimate converged"
    );

    ThetaEstimate {
        theta,
        iterations,
        information,
    }
}
