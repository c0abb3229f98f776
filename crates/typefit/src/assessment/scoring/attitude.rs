use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::bank::ItemBank;
use super::super::domain::CognitiveFunction;
use super::ScoringError;

/// Accumulated, non-negative strength per cognitive function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttitudeStrengths(BTreeMap<CognitiveFunction, f64>);

impl AttitudeStrengths {
    pub fn zeroed() -> Self {
        Self(
            CognitiveFunction::ordered()
                .into_iter()
                .map(|function| (function, 0.0))
                .collect(),
        )
    }

    pub fn get(&self, function: CognitiveFunction) -> f64 {
        self.0.get(&function).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CognitiveFunction, f64)> + '_ {
        self.0.iter().map(|(function, strength)| (*function, *strength))
    }

    /// Function with the highest strength; earlier functions win ties.
    pub fn strongest(&self) -> Option<(CognitiveFunction, f64)> {
        self.iter().fold(None, |best, (function, strength)| match best {
            Some((_, top)) if top >= strength => best,
            _ => Some((function, strength)),
        })
    }

    fn add(&mut self, function: CognitiveFunction, amount: f64) {
        *self.0.entry(function).or_insert(0.0) += amount;
    }
}

impl Default for AttitudeStrengths {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Signed weight of a Likert response; positive leans to the first construct.
pub fn likert_weight(response: u8) -> Option<i8> {
    match response {
        1 => Some(2),
        2 => Some(1),
        3 => Some(0),
        4 => Some(-1),
        5 => Some(-2),
        _ => None,
    }
}

pub(crate) fn aggregate(
    answers: &BTreeMap<String, u8>,
    bank: &ItemBank,
) -> Result<AttitudeStrengths, ScoringError> {
    let mut strengths = AttitudeStrengths::zeroed();

    for (id, response) in answers {
        let question = bank
            .likert(id)
            .ok_or_else(|| ScoringError::UnknownLikertQuestion { id: id.clone() })?;
        let weight = likert_weight(*response).ok_or_else(|| ScoringError::LikertOutOfRange {
            id: id.clone(),
            value: *response,
        })?;

        match weight {
            w if w > 0 => strengths.add(question.construct1, f64::from(w)),
            w if w < 0 => strengths.add(question.construct2, f64::from(-w)),
            _ => {}
        }
    }

    Ok(strengths)
}
