use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use super::common::*;
use crate::assessment::bank::ItemBank;
use crate::assessment::domain::{ClarityCategory, CognitiveFunction, Dichotomy, TypeLabel};
use crate::assessment::scoring::{
    ClarityCurve, ClarityWeighting, ScoringEngine, ScoringError, ScoringPolicy, THETA_BOUND,
};

#[derive(Debug)]
struct FlatCurve;

impl ClarityCurve for FlatCurve {
    fn weight(&self, _pci: u8, _category: ClarityCategory) -> f64 {
        1.0
    }
}

#[derive(Debug)]
struct UndefinedCurve;

impl ClarityCurve for UndefinedCurve {
    fn weight(&self, _pci: u8, _category: ClarityCategory) -> f64 {
        f64::NAN
    }
}

/// Question 1 is calibrated; question 2 only has display metadata.
fn partially_calibrated_bank() -> ItemBank {
    let items = "question,a,b,dichotomy\n1,1.2,0.0,E-I\n";
    let questions = r#"{
        "forced_choice": [
            { "number": 1, "options": [
                { "key": "E", "text": "Join the crowd", "score_key": 1 },
                { "key": "I", "text": "Stay in", "score_key": 0 }
            ] },
            { "number": 2, "options": [
                { "key": "E", "text": "Speak up", "score_key": 1 },
                { "key": "I", "text": "Listen", "score_key": 0 }
            ] }
        ],
        "likert": []
    }"#;
    ItemBank::from_readers(Cursor::new(items), Cursor::new(questions)).expect("bank parses")
}

#[test]
fn unanswered_dichotomies_are_neutral_and_slight() {
    let bank = bank();
    let forced_choice = answer_every(&bank, "T");
    let result = engine()
        .score(&answers(forced_choice, BTreeMap::new()), &bank)
        .expect("scores");

    for dichotomy in [Dichotomy::ExtraversionIntroversion, Dichotomy::SensingIntuition] {
        let estimate = result.dichotomy(dichotomy).expect("axis reported");
        assert_eq!(estimate.theta, 0.0);
        assert_eq!(estimate.pci, 1);
        assert_eq!(estimate.clarity, ClarityCategory::Slight);
        assert_eq!(estimate.answered, 0);
        assert_eq!(estimate.preferred_pole, dichotomy.tie_break_pole());
    }

    let thinking = result
        .dichotomy(Dichotomy::ThinkingFeeling)
        .expect("axis reported");
    assert_eq!(thinking.answered, 4);
    assert_eq!(thinking.preferred_pole, 'T');
}

#[test]
fn extreme_answers_clamp_theta() {
    let bank = bank();
    let engine = engine();

    let mut forced_choice = answer_every(&bank, "E");
    forced_choice.extend(answer_every(&bank, "N"));
    let result = engine
        .score(&answers(forced_choice, BTreeMap::new()), &bank)
        .expect("scores");

    let extraversion = result
        .dichotomy(Dichotomy::ExtraversionIntroversion)
        .expect("axis reported");
    assert_eq!(extraversion.theta, THETA_BOUND);
    assert_eq!(extraversion.pci, 30);
    assert_eq!(extraversion.clarity, ClarityCategory::VeryClear);

    let intuition = result
        .dichotomy(Dichotomy::SensingIntuition)
        .expect("axis reported");
    assert_eq!(intuition.theta, -THETA_BOUND);
    assert_eq!(intuition.preferred_pole, 'N');
    assert!(intuition.standard_error.is_some());
}

#[test]
fn mixed_answers_land_inside_bounds() {
    let bank = bank();
    let questions = questions_for(&bank, Dichotomy::ThinkingFeeling);
    let forced_choice: BTreeMap<u32, String> = questions
        .iter()
        .enumerate()
        .map(|(index, number)| {
            let pole = if index == 0 { "F" } else { "T" };
            (*number, pole.to_string())
        })
        .collect();

    let estimate = engine()
        .estimate(
            Dichotomy::ThinkingFeeling,
            &answers(forced_choice, BTreeMap::new()),
            &bank,
        )
        .expect("estimates");

    assert!(estimate.theta > 0.0 && estimate.theta < THETA_BOUND);
    assert_eq!(estimate.answered, 4);
    assert!(estimate.iterations >= 1);
}

#[test]
fn unknown_option_fails_fast_with_question_number() {
    let bank = bank();
    let forced_choice = BTreeMap::from([(1, "X".to_string())]);

    match engine().score(&answers(forced_choice, BTreeMap::new()), &bank) {
        Err(ScoringError::UnknownOption {
            question, answer, ..
        }) => {
            assert_eq!(question, 1);
            assert_eq!(answer, "X");
        }
        other => panic!("expected unknown option error, got {other:?}"),
    }
}

#[test]
fn answers_without_item_parameters_are_ignored() {
    let bank = bank();
    let forced_choice = BTreeMap::from([(99, "E".to_string())]);

    let result = engine()
        .score(&answers(forced_choice, BTreeMap::new()), &bank)
        .expect("scores");

    assert!(result.dichotomies.iter().all(|estimate| estimate.answered == 0));
}

#[test]
fn out_of_range_likert_answer_is_rejected() {
    let bank = bank();
    let likert = BTreeMap::from([("L3".to_string(), 0)]);

    assert!(matches!(
        engine().score(&answers(BTreeMap::new(), likert), &bank),
        Err(ScoringError::LikertOutOfRange { value: 0, .. })
    ));
}

#[test]
fn winning_score_is_the_table_maximum() {
    let bank = bank();
    let mut forced_choice = answer_every(&bank, "I");
    forced_choice.extend(answer_every(&bank, "S"));
    let likert = BTreeMap::from([
        ("L2".to_string(), 1),
        ("L4".to_string(), 2),
        ("L7".to_string(), 5),
        ("L11".to_string(), 4),
    ]);

    let result = engine()
        .score(&answers(forced_choice, likert), &bank)
        .expect("scores");

    let maximum = result
        .type_scores
        .iter()
        .map(|score| score.total)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(result.score, maximum);
    assert_eq!(result.type_scores.len(), 16);

    let winner = result
        .type_scores
        .iter()
        .find(|score| score.total == maximum)
        .expect("winner present");
    assert_eq!(winner.type_label, result.final_type);
    assert_eq!(result.stack(), result.final_type.stack());
}

#[test]
fn extraverted_judging_profile_resolves_to_matching_dominant() {
    let bank = bank();
    let forced_choice = answer_every(&bank, "E");
    let likert = lean_toward(&bank, &[CognitiveFunction::Te, CognitiveFunction::Fe]);
    assert!(!likert.is_empty());

    let result = engine()
        .score(&answers(forced_choice, likert), &bank)
        .expect("scores");

    assert!(result.final_type.label().starts_with('E'));
    let (_, strongest) = result
        .attitude_strengths
        .strongest()
        .expect("strengths present");
    assert!(strongest > 0.0);
    assert_eq!(result.attitude_strengths.get(result.dominant), strongest);
    assert!(result.dominant.is_extraverted());
}

#[test]
fn single_strengthened_function_decides_the_dominant() {
    let bank = bank();
    let forced_choice = answer_every(&bank, "E");
    let likert = lean_toward(&bank, &[CognitiveFunction::Te]);

    let result = engine()
        .score(&answers(forced_choice, likert), &bank)
        .expect("scores");

    assert_eq!(result.dominant, CognitiveFunction::Te);
    // ENTJ and ESTJ tie on every term; canonical order picks ENTJ.
    assert_eq!(result.final_type, TypeLabel::ENTJ);
    let estj = result
        .type_scores
        .iter()
        .find(|score| score.type_label == TypeLabel::ESTJ)
        .expect("ESTJ scored");
    assert_eq!(estj.total, result.score);
}

#[test]
fn empty_submission_ties_and_breaks_on_canonical_order() {
    let bank = bank();
    let result = engine()
        .score(&answers(BTreeMap::new(), BTreeMap::new()), &bank)
        .expect("scores");

    for estimate in &result.dichotomies {
        assert_eq!(estimate.theta, 0.0);
        assert_eq!(estimate.clarity, ClarityCategory::Slight);
    }
    assert!(result
        .attitude_strengths
        .iter()
        .all(|(_, strength)| strength == 0.0));
    assert!(result.type_scores.iter().all(|score| score.total == 0.0));

    assert_eq!(result.final_type, TypeLabel::ENFJ);
    assert_eq!(result.final_type, TypeLabel::canonical_order()[0]);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.preferred_letters(), "INF");
    let expected = concat!(
        "E-I theta 0.00 (Slight), S-N theta 0.00 (Slight), T-F theta 0.00 (Slight). ",
        "Best fit ENFJ with score 0.00."
    );
    assert_eq!(result.rationale, expected);
}

#[test]
fn repeated_scoring_is_bit_identical() {
    let bank = bank();
    let engine = engine();
    let questions = questions_for(&bank, Dichotomy::SensingIntuition);
    let mut forced_choice = BTreeMap::from([(questions[0], "N".to_string())]);
    forced_choice.extend(
        questions[1..]
            .iter()
            .map(|number| (*number, "S".to_string())),
    );
    forced_choice.insert(1, "I".to_string());
    forced_choice.insert(2, "E".to_string());
    let likert = BTreeMap::from([("L6".to_string(), 2), ("L8".to_string(), 5)]);
    let submission = answers(forced_choice, likert);

    let first = engine.score(&submission, &bank).expect("scores");
    let second = engine.score(&submission, &bank).expect("scores");

    for (left, right) in first.dichotomies.iter().zip(&second.dichotomies) {
        assert_eq!(left.theta.to_bits(), right.theta.to_bits());
    }
    assert_eq!(first, second);
    assert_eq!(first.rationale, second.rationale);
}

#[test]
fn custom_clarity_curve_replaces_policy_curve() {
    let bank = bank();
    let engine = ScoringEngine::default().with_clarity_curve(Arc::new(FlatCurve));
    let forced_choice = answer_every(&bank, "E");

    let result = engine
        .score(&answers(forced_choice, BTreeMap::new()), &bank)
        .expect("scores");

    assert!(result
        .dichotomies
        .iter()
        .all(|estimate| estimate.clarity_weight == 1.0));
    let entj = result
        .type_scores
        .iter()
        .find(|score| score.type_label == TypeLabel::ENTJ)
        .expect("ENTJ scored");
    assert_eq!(entj.dichotomy_term, THETA_BOUND);
}

#[test]
fn stepwise_policy_weights_by_category() {
    let bank = bank();
    let policy = ScoringPolicy {
        clarity: ClarityWeighting::stepwise(),
        ..ScoringPolicy::default()
    };
    let engine = ScoringEngine::new(policy).expect("valid policy");
    let forced_choice = answer_every(&bank, "I");

    let result = engine
        .score(&answers(forced_choice, BTreeMap::new()), &bank)
        .expect("scores");

    let introversion = result
        .dichotomy(Dichotomy::ExtraversionIntroversion)
        .expect("axis reported");
    assert_eq!(introversion.clarity, ClarityCategory::VeryClear);
    assert_eq!(introversion.clarity_weight, 3.0);
    assert!(result.final_type.label().starts_with('I'));
}

#[test]
fn every_stack_alternates_attitude_and_uses_distinct_functions() {
    for type_label in TypeLabel::canonical_order() {
        let stack = type_label.stack();
        let positions = stack.positions();
        for pair in positions.windows(2) {
            assert_ne!(pair[0].is_extraverted(), pair[1].is_extraverted(), "{type_label}");
        }
        let mut unique = positions.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4, "{type_label}");
        let extraverted = type_label.label().starts_with('E');
        assert_eq!(stack.dominant.is_extraverted(), extraverted, "{type_label}");
    }
}

#[test]
fn unknown_option_on_uncalibrated_question_fails_fast() {
    let bank = partially_calibrated_bank();
    let forced_choice = BTreeMap::from([(1, "E".to_string()), (2, "Q".to_string())]);

    match engine().score(&answers(forced_choice, BTreeMap::new()), &bank) {
        Err(ScoringError::UnknownOption {
            question,
            answer,
            available,
        }) => {
            assert_eq!(question, 2);
            assert_eq!(answer, "Q");
            assert_eq!(available, "E, I");
        }
        other => panic!("expected unknown option error, got {other:?}"),
    }
}

#[test]
fn valid_answer_on_uncalibrated_question_is_ignored() {
    let bank = partially_calibrated_bank();
    let forced_choice = BTreeMap::from([(1, "E".to_string()), (2, "i".to_string())]);

    let result = engine()
        .score(&answers(forced_choice, BTreeMap::new()), &bank)
        .expect("scores");

    let extraversion = result
        .dichotomy(Dichotomy::ExtraversionIntroversion)
        .expect("axis reported");
    assert_eq!(extraversion.answered, 1);
    assert_eq!(extraversion.preferred_pole, 'E');
}

#[test]
fn non_finite_clarity_weight_is_rejected() {
    let bank = bank();
    let engine = ScoringEngine::default().with_clarity_curve(Arc::new(UndefinedCurve));

    assert_eq!(
        engine.score(&answers(BTreeMap::new(), BTreeMap::new()), &bank),
        Err(ScoringError::NonFiniteClarityWeight {
            dichotomy: Dichotomy::ExtraversionIntroversion,
            pci: 1,
        })
    );
}
