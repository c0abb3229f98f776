use crate::infra::{read_answers, with_bank_override, ScoreReport};
use clap::Args;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;
use typefit::assessment::{
    AssessmentAnswers, AssessmentResult, AssessmentService, CognitiveFunction, ItemBank,
    TypeScore,
};
use typefit::config::AppConfig;
use typefit::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON answer file: { "forced_choice": {..}, "likert": {..} }
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Item parameter CSV overriding the configured bank
    #[arg(long, requires = "questions")]
    pub(crate) items: Option<PathBuf>,
    /// Question metadata JSON overriding the configured bank
    #[arg(long, requires = "items")]
    pub(crate) questions: Option<PathBuf>,
    /// Print the full result as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only score the sample respondent with this name
    #[arg(long)]
    pub(crate) respondent: Option<String>,
    /// Number of closest type matches to list per respondent
    #[arg(long, default_value_t = 3)]
    pub(crate) top: usize,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        items,
        questions,
        json,
    } = args;

    let config = AppConfig::load()?;
    let assessment = with_bank_override(config.assessment, items, questions);
    let service = AssessmentService::from_config(&assessment)?;
    let submission = read_answers(&answers)?;
    let result = service.score(&submission)?;

    if json {
        let report = ScoreReport::new(answers.display().to_string(), result);
        let rendered = serde_json::to_string_pretty(&report)?;
        println!("{rendered}");
    } else {
        println!("Assessment result for {}", answers.display());
        render_result(&result, 3);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { respondent, top } = args;

    let config = AppConfig::load()?;
    let service = AssessmentService::from_config(&config.assessment)?;

    println!("Personality assessment demo");
    let mut scored = 0;
    for sample in SAMPLE_RESPONDENTS {
        if let Some(name) = respondent.as_deref() {
            if !sample.name.eq_ignore_ascii_case(name) {
                continue;
            }
        }

        let answers = sample.answers(service.bank());
        let result = service.score(&answers)?;
        println!(
            "\n{} ({} forced-choice answers, {} Likert answers)",
            sample.name,
            answers.forced_choice.len(),
            answers.likert.len()
        );
        println!("  {}", sample.summary);
        render_result(&result, top);
        scored += 1;
    }

    if scored == 0 {
        let names: Vec<&str> = SAMPLE_RESPONDENTS.iter().map(|sample| sample.name).collect();
        println!("No sample respondent matched; choose one of: {}", names.join(", "));
    }

    Ok(())
}

pub(crate) struct SampleRespondent {
    pub(crate) name: &'static str,
    pub(crate) summary: &'static str,
    pub(crate) poles: &'static [&'static str],
    pub(crate) leanings: &'static [CognitiveFunction],
}

pub(crate) const SAMPLE_RESPONDENTS: &[SampleRespondent] = &[
    SampleRespondent {
        name: "analyst",
        summary: "Reflective and abstract, trusts internal logic and open-ended ideas",
        poles: &["I", "N", "T"],
        leanings: &[CognitiveFunction::Ti, CognitiveFunction::Ne],
    },
    SampleRespondent {
        name: "organizer",
        summary: "Outgoing and concrete, plans from precedent and measurable results",
        poles: &["E", "S", "T"],
        leanings: &[CognitiveFunction::Te, CognitiveFunction::Si],
    },
    SampleRespondent {
        name: "undecided",
        summary: "Skipped every question",
        poles: &[],
        leanings: &[],
    },
];

impl SampleRespondent {
    /// Pick each listed pole wherever offered and agree with every Likert
    /// statement that favours one of the leaning functions.
    pub(crate) fn answers(&self, bank: &ItemBank) -> AssessmentAnswers {
        let mut forced_choice = BTreeMap::new();
        for question in &bank.questions().forced_choice {
            if let Some(pole) = self
                .poles
                .iter()
                .find(|pole| question.option(pole).is_some())
            {
                forced_choice.insert(question.number, pole.to_string());
            }
        }

        let mut likert = BTreeMap::new();
        for question in bank.likert_questions() {
            if self.leanings.contains(&question.construct1) {
                likert.insert(question.id.clone(), 1);
            } else if self.leanings.contains(&question.construct2) {
                likert.insert(question.id.clone(), 5);
            }
        }

        AssessmentAnswers {
            forced_choice,
            likert,
        }
    }
}

pub(crate) fn render_result(result: &AssessmentResult, top: usize) {
    println!(
        "- Best fit {} (score {:.2}) | preferred letters {}",
        result.final_type,
        result.score,
        result.preferred_letters()
    );
    println!(
        "- Function stack: {} / {} / {} / {}",
        result.dominant, result.auxiliary, result.tertiary, result.inferior
    );

    println!("- Dichotomies:");
    for estimate in &result.dichotomies {
        let standard_error = estimate
            .standard_error
            .map(|value| format!("{value:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "    - {}: theta {:.2} -> {} | {} (PCI {}, weight {:.2}) | {} answered, SE {}",
            estimate.dichotomy,
            estimate.theta,
            estimate.preferred_pole,
            estimate.clarity,
            estimate.pci,
            estimate.clarity_weight,
            estimate.answered,
            standard_error
        );
    }

    let strengths: Vec<String> = result
        .attitude_strengths
        .iter()
        .filter(|(_, strength)| *strength > 0.0)
        .map(|(function, strength)| format!("{function} {strength:.1}"))
        .collect();
    if strengths.is_empty() {
        println!("- Attitude strengths: none recorded");
    } else {
        println!("- Attitude strengths: {}", strengths.join(", "));
    }

    if top > 0 {
        println!("- Closest matches:");
        for score in closest_matches(result, top) {
            println!(
                "    - {}: {:.2} (dichotomies {:.2}, functions {:.2})",
                score.type_label, score.total, score.dichotomy_term, score.function_term
            );
        }
    }

    println!("- Rationale: {}", result.rationale);
}

/// Highest totals first; equal totals keep canonical order.
pub(crate) fn closest_matches(result: &AssessmentResult, top: usize) -> Vec<&TypeScore> {
    let mut ranked: Vec<_> = result.type_scores.iter().collect();
    ranked.sort_by(|left, right| {
        right
            .total
            .partial_cmp(&left.total)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top);
    ranked
}
