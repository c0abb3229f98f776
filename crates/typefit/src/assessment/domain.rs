use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three binary trait axes estimated from forced-choice items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dichotomy {
    #[serde(rename = "E-I")]
    ExtraversionIntroversion,
    #[serde(rename = "S-N")]
    SensingIntuition,
    #[serde(rename = "T-F")]
    ThinkingFeeling,
}

impl Dichotomy {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::ExtraversionIntroversion,
            Self::SensingIntuition,
            Self::ThinkingFeeling,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtraversionIntroversion => "E-I",
            Self::SensingIntuition => "S-N",
            Self::ThinkingFeeling => "T-F",
        }
    }

    /// Pole encoded as response code 1; positive theta leans toward it.
    pub const fn positive_pole(self) -> char {
        match self {
            Self::ExtraversionIntroversion => 'E',
            Self::SensingIntuition => 'S',
            Self::ThinkingFeeling => 'T',
        }
    }

    pub const fn negative_pole(self) -> char {
        match self {
            Self::ExtraversionIntroversion => 'I',
            Self::SensingIntuition => 'N',
            Self::ThinkingFeeling => 'F',
        }
    }

    /// Pole reported when theta is exactly zero.
    pub const fn tie_break_pole(self) -> char {
        self.negative_pole()
    }

    pub fn preferred_pole(self, theta: f64) -> char {
        if theta > 0.0 {
            self.positive_pole()
        } else if theta < 0.0 {
            self.negative_pole()
        } else {
            self.tie_break_pole()
        }
    }

    /// Letter position of this axis inside a four-letter type label.
    pub(crate) const fn letter_index(self) -> usize {
        match self {
            Self::ExtraversionIntroversion => 0,
            Self::SensingIntuition => 1,
            Self::ThinkingFeeling => 2,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|ch| ch.is_ascii_alphabetic())
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "EI" | "IE" => Some(Self::ExtraversionIntroversion),
            "SN" | "NS" => Some(Self::SensingIntuition),
            "TF" | "FT" => Some(Self::ThinkingFeeling),
            _ => None,
        }
    }
}

impl fmt::Display for Dichotomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The eight cognitive-function attitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CognitiveFunction {
    Ti,
    Te,
    Fi,
    Fe,
    Si,
    Se,
    Ni,
    Ne,
}

impl CognitiveFunction {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Ti,
            Self::Te,
            Self::Fi,
            Self::Fe,
            Self::Si,
            Self::Se,
            Self::Ni,
            Self::Ne,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ti => "Ti",
            Self::Te => "Te",
            Self::Fi => "Fi",
            Self::Fe => "Fe",
            Self::Si => "Si",
            Self::Se => "Se",
            Self::Ni => "Ni",
            Self::Ne => "Ne",
        }
    }

    pub const fn is_extraverted(self) -> bool {
        matches!(self, Self::Te | Self::Fe | Self::Se | Self::Ne)
    }
}

impl fmt::Display for CognitiveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered dominant / auxiliary / tertiary / inferior assignment for one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionStack {
    pub dominant: CognitiveFunction,
    pub auxiliary: CognitiveFunction,
    pub tertiary: CognitiveFunction,
    pub inferior: CognitiveFunction,
}

impl FunctionStack {
    pub const fn positions(&self) -> [CognitiveFunction; 4] {
        [self.dominant, self.auxiliary, self.tertiary, self.inferior]
    }
}

/// The closed set of sixteen type labels.
///
/// Variants are declared in the canonical scoring order (lexicographic by
/// label), which is also the tie-break order of the holistic scorer.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeLabel {
    ENFJ,
    ENFP,
    ENTJ,
    ENTP,
    ESFJ,
    ESFP,
    ESTJ,
    ESTP,
    INFJ,
    INFP,
    INTJ,
    INTP,
    ISFJ,
    ISFP,
    ISTJ,
    ISTP,
}

impl TypeLabel {
    pub const fn canonical_order() -> [Self; 16] {
        [
            Self::ENFJ,
            Self::ENFP,
            Self::ENTJ,
            Self::ENTP,
            Self::ESFJ,
            Self::ESFP,
            Self::ESTJ,
            Self::ESTP,
            Self::INFJ,
            Self::INFP,
            Self::INTJ,
            Self::INTP,
            Self::ISFJ,
            Self::ISFP,
            Self::ISTJ,
            Self::ISTP,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ENFJ => "ENFJ",
            Self::ENFP => "ENFP",
            Self::ENTJ => "ENTJ",
            Self::ENTP => "ENTP",
            Self::ESFJ => "ESFJ",
            Self::ESFP => "ESFP",
            Self::ESTJ => "ESTJ",
            Self::ESTP => "ESTP",
            Self::INFJ => "INFJ",
            Self::INFP => "INFP",
            Self::INTJ => "INTJ",
            Self::INTP => "INTP",
            Self::ISFJ => "ISFJ",
            Self::ISFP => "ISFP",
            Self::ISTJ => "ISTJ",
            Self::ISTP => "ISTP",
        }
    }

    pub fn letter(self, dichotomy: Dichotomy) -> char {
        self.label()
            .as_bytes()
            .get(dichotomy.letter_index())
            .map(|byte| *byte as char)
            .unwrap_or(dichotomy.tie_break_pole())
    }

    /// Whether this type sits on the positive pole of the given axis.
    pub fn leans_positive(self, dichotomy: Dichotomy) -> bool {
        self.letter(dichotomy) == dichotomy.positive_pole()
    }

    pub fn stack(self) -> FunctionStack {
        use CognitiveFunction::*;

        let (dominant, auxiliary, tertiary, inferior) = match self {
            Self::ISTJ => (Si, Te, Fi, Ne),
            Self::ISFJ => (Si, Fe, Ti, Ne),
            Self::INFJ => (Ni, Fe, Ti, Se),
            Self::INTJ => (Ni, Te, Fi, Se),
            Self::ISTP => (Ti, Se, Ni, Fe),
            Self::ISFP => (Fi, Se, Ni, Te),
            Self::INFP => (Fi, Ne, Si, Te),
            Self::INTP => (Ti, Ne, Si, Fe),
            Self::ESTP => (Se, Ti, Fe, Ni),
            Self::ESFP => (Se, Fi, Te, Ni),
            Self::ENFP => (Ne, Fi, Te, Si),
            Self::ENTP => (Ne, Ti, Fe, Si),
            Self::ESTJ => (Te, Si, Ne, Fi),
            Self::ESFJ => (Fe, Si, Ne, Ti),
            Self::ENFJ => (Fe, Ni, Se, Ti),
            Self::ENTJ => (Te, Ni, Se, Fi),
        };

        FunctionStack {
            dominant,
            auxiliary,
            tertiary,
            inferior,
        }
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorical bucket of the preference clarity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarityCategory {
    Slight,
    Moderate,
    Clear,
    VeryClear,
}

impl ClarityCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slight => "Slight",
            Self::Moderate => "Moderate",
            Self::Clear => "Clear",
            Self::VeryClear => "Very Clear",
        }
    }
}

impl fmt::Display for ClarityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable answer of a forced-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Pole label submitted by the client, e.g. `"E"` or `"I"`.
    pub key: String,
    pub text: String,
    /// Binary response code fed into the item-response model.
    pub score_key: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedChoiceQuestion {
    pub number: u32,
    pub options: Vec<ChoiceOption>,
}

impl ForcedChoiceQuestion {
    pub fn option(&self, key: &str) -> Option<&ChoiceOption> {
        self.options
            .iter()
            .find(|option| option.key.eq_ignore_ascii_case(key.trim()))
    }
}

/// Likert item contrasting two cognitive functions; 1 leans to `construct1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertQuestion {
    pub id: String,
    pub construct1: CognitiveFunction,
    pub construct2: CognitiveFunction,
    pub text: String,
}

/// Raw answers collected by the quiz front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentAnswers {
    /// Question number (1-based) to chosen option key.
    #[serde(default)]
    pub forced_choice: BTreeMap<u32, String>,
    /// Question id to selected scale point (1..=5).
    #[serde(default)]
    pub likert: BTreeMap<String, u8>,
}

impl AssessmentAnswers {
    pub fn is_empty(&self) -> bool {
        self.forced_choice.is_empty() && self.likert.is_empty()
    }
}
