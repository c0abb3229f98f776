use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::domain::ClarityCategory;

/// Maps a preference clarity index to the multiplier applied to that axis.
///
/// Implementations must be non-decreasing in `pci`.
pub trait ClarityCurve: fmt::Debug + Send + Sync {
    fn weight(&self, pci: u8, category: ClarityCategory) -> f64;
}

/// Built-in clarity curves selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum ClarityWeighting {
    /// `scale * ln(pci) + offset`.
    Logarithmic { scale: f64, offset: f64 },
    /// Fixed multiplier per clarity category.
    Stepwise {
        slight: f64,
        moderate: f64,
        clear: f64,
        very_clear: f64,
    },
}

impl ClarityWeighting {
    pub const fn logarithmic() -> Self {
        Self::Logarithmic {
            scale: 2.15,
            offset: 1.0,
        }
    }

    pub const fn stepwise() -> Self {
        Self::Stepwise {
            slight: 1.0,
            moderate: 1.5,
            clear: 2.0,
            very_clear: 3.0,
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        match *self {
            Self::Logarithmic { scale, offset } => {
                if !scale.is_finite() || !offset.is_finite() || scale < 0.0 {
                    return Err(PolicyError::ClarityCurve(
                        "logarithmic scale must be finite and non-negative".to_string(),
                    ));
                }
            }
            Self::Stepwise {
                slight,
                moderate,
                clear,
                very_clear,
            } => {
                let steps = [slight, moderate, clear, very_clear];
                if steps.iter().any(|step| !step.is_finite())
                    || steps.windows(2).any(|pair| pair[0] > pair[1])
                {
                    return Err(PolicyError::ClarityCurve(
                        "stepwise weights must be finite and non-decreasing".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for ClarityWeighting {
    fn default() -> Self {
        Self::logarithmic()
    }
}

impl ClarityCurve for ClarityWeighting {
    fn weight(&self, pci: u8, category: ClarityCategory) -> f64 {
        match *self {
            Self::Logarithmic { scale, offset } => {
                if pci == 0 {
                    return 1.0;
                }
                scale * f64::from(pci).ln() + offset
            }
            Self::Stepwise {
                slight,
                moderate,
                clear,
                very_clear,
            } => match category {
                ClarityCategory::Slight => slight,
                ClarityCategory::Moderate => moderate,
                ClarityCategory::Clear => clear,
                ClarityCategory::VeryClear => very_clear,
            },
        }
    }
}

/// Multipliers for the four stack positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionWeights {
    pub dominant: f64,
    pub auxiliary: f64,
    pub tertiary: f64,
    pub inferior: f64,
}

impl PositionWeights {
    pub const fn as_array(&self) -> [f64; 4] {
        [self.dominant, self.auxiliary, self.tertiary, self.inferior]
    }
}

impl Default for PositionWeights {
    fn default() -> Self {
        Self {
            dominant: 4.0,
            auxiliary: 3.0,
            tertiary: 1.5,
            inferior: 1.0,
        }
    }
}

/// Tunable constants of the holistic scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    #[serde(default)]
    pub clarity: ClarityWeighting,
    #[serde(default)]
    pub positions: PositionWeights,
    #[serde(default = "default_attitude_weight")]
    pub attitude_weight: f64,
}

fn default_attitude_weight() -> f64 {
    1.0
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            clarity: ClarityWeighting::default(),
            positions: PositionWeights::default(),
            attitude_weight: default_attitude_weight(),
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let positions = self.positions.as_array();
        if positions
            .iter()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(PolicyError::PositionWeights(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        if positions.windows(2).any(|pair| pair[0] < pair[1]) {
            return Err(PolicyError::PositionWeights(format!(
                "weights must not increase from dominant to inferior (got {:?})",
                positions
            )));
        }
        if !self.attitude_weight.is_finite() || self.attitude_weight < 0.0 {
            return Err(PolicyError::AttitudeWeight(self.attitude_weight));
        }
        self.clarity.validate()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid clarity curve: {0}")]
    ClarityCurve(String),
    #[error("invalid position weights: {0}")]
    PositionWeights(String),
    #[error("attitude weight must be finite and non-negative, got {0}")]
    AttitudeWeight(f64),
}
