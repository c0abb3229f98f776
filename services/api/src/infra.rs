use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use typefit::assessment::{AssessmentAnswers, AssessmentResult};
use typefit::config::{AssessmentConfig, BankPaths};
use typefit::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Swap in an item bank given on the command line, keeping the configured policy.
pub(crate) fn with_bank_override(
    mut config: AssessmentConfig,
    items: Option<PathBuf>,
    questions: Option<PathBuf>,
) -> AssessmentConfig {
    if let (Some(item_parameters), Some(questions)) = (items, questions) {
        config.bank = Some(BankPaths {
            item_parameters,
            questions,
        });
    }
    config
}

/// Parse an answer document shaped like the HTTP scoring payload.
pub(crate) fn parse_answers<R: Read>(reader: R) -> Result<AssessmentAnswers, AppError> {
    serde_json::from_reader(reader).map_err(AppError::from)
}

pub(crate) fn read_answers(path: &Path) -> Result<AssessmentAnswers, AppError> {
    let file = File::open(path)?;
    parse_answers(BufReader::new(file))
}

/// Result envelope printed by `score --json`.
#[derive(Debug, Serialize)]
pub(crate) struct ScoreReport {
    pub(crate) scored_at: DateTime<Utc>,
    pub(crate) source: String,
    #[serde(flatten)]
    pub(crate) result: AssessmentResult,
}

impl ScoreReport {
    pub(crate) fn new(source: impl Into<String>, result: AssessmentResult) -> Self {
        Self {
            scored_at: Utc::now(),
            source: source.into(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use typefit::assessment::{AssessmentService, TypeLabel};

    #[test]
    fn parses_answer_document_with_string_question_numbers() {
        let document = r#"{
            "forced_choice": { "1": "E", "5": "N" },
            "likert": { "L1": 2 }
        }"#;
        let answers = parse_answers(Cursor::new(document)).expect("parses");
        assert_eq!(answers.forced_choice.get(&1).map(String::as_str), Some("E"));
        assert_eq!(answers.forced_choice.get(&5).map(String::as_str), Some("N"));
        assert_eq!(answers.likert.get("L1"), Some(&2));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let answers = parse_answers(Cursor::new("{}")).expect("parses");
        assert!(answers.is_empty());
    }

    #[test]
    fn malformed_document_is_reported_as_invalid_json() {
        let error = parse_answers(Cursor::new("{\"likert\": {\"L1\": \"often\"}}"))
            .expect_err("rejects text response");
        assert!(matches!(error, AppError::Json(_)));
        assert!(error.to_string().starts_with("invalid answer document"));
    }

    #[test]
    fn bank_override_requires_both_paths() {
        let config = with_bank_override(
            AssessmentConfig::default(),
            Some(PathBuf::from("items.csv")),
            None,
        );
        assert!(config.bank.is_none());

        let config = with_bank_override(
            AssessmentConfig::default(),
            Some(PathBuf::from("items.csv")),
            Some(PathBuf::from("questions.json")),
        );
        assert_eq!(
            config.bank.map(|paths| paths.questions),
            Some(PathBuf::from("questions.json"))
        );
    }

    #[test]
    fn score_report_flattens_result() {
        let service =
            AssessmentService::from_config(&AssessmentConfig::default()).expect("service loads");
        let result = service
            .score(&AssessmentAnswers::default())
            .expect("scores");
        let report = ScoreReport::new("answers.json", result);

        let value = serde_json::to_value(&report).expect("serializes");
        assert_eq!(value["source"], "answers.json");
        assert_eq!(value["final_type"], TypeLabel::ENFJ.label());
        assert!(value["scored_at"].is_string());
    }
}
