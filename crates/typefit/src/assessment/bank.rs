use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{Dichotomy, ForcedChoiceQuestion, LikertQuestion};

const STANDARD_ITEM_PARAMETERS: &str = include_str!("../../data/item_parameters.csv");
const STANDARD_QUESTIONS: &str = include_str!("../../data/questions.json");

/// Fixed 2PL calibration for one forced-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemParameter {
    /// Discrimination.
    pub a: f64,
    /// Location.
    pub b: f64,
    pub dichotomy: Dichotomy,
}

/// Read-only question index to item parameter lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemParameterTable {
    items: BTreeMap<u32, ItemParameter>,
}

impl ItemParameterTable {
    pub fn new(items: BTreeMap<u32, ItemParameter>) -> Result<Self, BankError> {
        for (question, item) in &items {
            if !item.a.is_finite() || !item.b.is_finite() {
                return Err(BankError::NonFiniteParameter {
                    question: *question,
                });
            }
            if item.a == 0.0 {
                return Err(BankError::ZeroDiscrimination {
                    question: *question,
                });
            }
        }
        Ok(Self { items })
    }

    pub fn from_csv<R: Read>(reader: R) -> Result<Self, BankError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut items = BTreeMap::new();

        for record in csv_reader.deserialize::<ItemParameterRow>() {
            let row = record?;
            let dichotomy = Dichotomy::parse(&row.dichotomy).ok_or_else(|| {
                BankError::UnknownDichotomy {
                    question: row.question,
                    value: row.dichotomy.clone(),
                }
            })?;
            let item = ItemParameter {
                a: row.a,
                b: row.b,
                dichotomy,
            };
            if items.insert(row.question, item).is_some() {
                return Err(BankError::DuplicateItem {
                    question: row.question,
                });
            }
        }

        Self::new(items)
    }

    pub fn get(&self, question: u32) -> Option<&ItemParameter> {
        self.items.get(&question)
    }

    /// Question numbers measuring the given axis, ascending.
    pub fn questions_for(
        &self,
        dichotomy: Dichotomy,
    ) -> impl Iterator<Item = (u32, &ItemParameter)> {
        self.items
            .iter()
            .filter(move |(_, item)| item.dichotomy == dichotomy)
            .map(|(question, item)| (*question, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct ItemParameterRow {
    question: u32,
    a: f64,
    b: f64,
    dichotomy: String,
}

/// Question metadata as served to the quiz front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default)]
    pub forced_choice: Vec<ForcedChoiceQuestion>,
    #[serde(default)]
    pub likert: Vec<LikertQuestion>,
}

/// Item parameters plus the question metadata they calibrate.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBank {
    parameters: ItemParameterTable,
    questions: QuestionSet,
    forced_choice_index: BTreeMap<u32, usize>,
    likert_index: BTreeMap<String, usize>,
}

impl ItemBank {
    pub fn new(parameters: ItemParameterTable, questions: QuestionSet) -> Result<Self, BankError> {
        let mut forced_choice_index = BTreeMap::new();
        for (position, question) in questions.forced_choice.iter().enumerate() {
            validate_forced_choice(question)?;
            if forced_choice_index
                .insert(question.number, position)
                .is_some()
            {
                return Err(BankError::DuplicateQuestion {
                    id: question.number.to_string(),
                });
            }
        }

        let mut likert_index = BTreeMap::new();
        for (position, question) in questions.likert.iter().enumerate() {
            if question.construct1 == question.construct2 {
                return Err(BankError::DegenerateLikert {
                    id: question.id.clone(),
                });
            }
            if likert_index.insert(question.id.clone(), position).is_some() {
                return Err(BankError::DuplicateQuestion {
                    id: question.id.clone(),
                });
            }
        }

        Ok(Self {
            parameters,
            questions,
            forced_choice_index,
            likert_index,
        })
    }

    /// The calibrated bank bundled with the library.
    pub fn standard() -> Result<Self, BankError> {
        Self::from_readers(
            STANDARD_ITEM_PARAMETERS.as_bytes(),
            STANDARD_QUESTIONS.as_bytes(),
        )
    }

    pub fn from_readers<P: Read, Q: Read>(parameters: P, questions: Q) -> Result<Self, BankError> {
        let parameters = ItemParameterTable::from_csv(parameters)?;
        let questions: QuestionSet = serde_json::from_reader(questions)?;
        Self::new(parameters, questions)
    }

    pub fn from_paths(
        parameters: impl AsRef<Path>,
        questions: impl AsRef<Path>,
    ) -> Result<Self, BankError> {
        let parameters = File::open(parameters)?;
        let questions = File::open(questions)?;
        Self::from_readers(parameters, questions)
    }

    pub fn parameters(&self) -> &ItemParameterTable {
        &self.parameters
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn forced_choice(&self, number: u32) -> Option<&ForcedChoiceQuestion> {
        self.forced_choice_index
            .get(&number)
            .and_then(|position| self.questions.forced_choice.get(*position))
    }

    pub fn likert(&self, id: &str) -> Option<&LikertQuestion> {
        self.likert_index
            .get(id)
            .and_then(|position| self.questions.likert.get(*position))
    }

    pub fn likert_questions(&self) -> &[LikertQuestion] {
        &self.questions.likert
    }
}

fn validate_forced_choice(question: &ForcedChoiceQuestion) -> Result<(), BankError> {
    let codes: BTreeSet<u8> = question
        .options
        .iter()
        .map(|option| option.score_key)
        .collect();
    let keys: BTreeSet<String> = question
        .options
        .iter()
        .map(|option| option.key.trim().to_ascii_uppercase())
        .collect();

    if question.options.len() != 2 || keys.len() != 2 || codes != BTreeSet::from([0, 1]) {
        return Err(BankError::MalformedOptions {
            question: question.number,
        });
    }
    Ok(())
}

/// Failure raised while loading or validating an item bank.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("failed to read item bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid item parameter CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid question bank JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question {question}: unknown dichotomy '{value}'")]
    UnknownDichotomy { question: u32, value: String },
    #[error("question {question}: discrimination parameter must be non-zero")]
    ZeroDiscrimination { question: u32 },
    #[error("question {question}: item parameters must be finite")]
    NonFiniteParameter { question: u32 },
    #[error("question {question} listed more than once in the item parameter table")]
    DuplicateItem { question: u32 },
    #[error("question '{id}' defined more than once")]
    DuplicateQuestion { id: String },
    #[error("question {question} must offer two distinct options scored 0 and 1")]
    MalformedOptions { question: u32 },
    #[error("likert question '{id}' contrasts a function with itself")]
    DegenerateLikert { id: String },
}
