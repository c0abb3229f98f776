use super::super::domain::TypeLabel;
use super::attitude::AttitudeStrengths;
use super::policy::ScoringPolicy;
use super::{DichotomyEstimate, TypeScore};

pub(crate) fn score_types(
    estimates: &[DichotomyEstimate],
    strengths: &AttitudeStrengths,
    policy: &ScoringPolicy,
) -> Vec<TypeScore> {
    let positions = policy.positions.as_array();

    TypeLabel::canonical_order()
        .into_iter()
        .map(|type_label| {
            let dichotomy_term: f64 = estimates
                .iter()
                .map(|estimate| {
                    let oriented = if type_label.leans_positive(estimate.dichotomy) {
                        estimate.theta
                    } else {
                        -estimate.theta
                    };
                    oriented * estimate.clarity_weight
                })
                .sum();

            let stack = type_label.stack();
            let function_term = policy.attitude_weight
                * stack
                    .positions()
                    .iter()
                    .zip(positions)
                    .map(|(function, weight)| weight * strengths.get(*function))
                    .sum::<f64>();

            TypeScore {
                type_label,
                dichotomy_term,
                function_term,
                total: dichotomy_term + function_term,
            }
        })
        .collect()
}

/// Highest total; the earliest entry wins exact ties. NaN totals never win.
pub(crate) fn best_fit(scores: &[TypeScore]) -> Option<&TypeScore> {
    let mut best: Option<&TypeScore> = None;
    for candidate in scores.iter().filter(|score| !score.total.is_nan()) {
        match best {
            Some(current) if candidate.total <= current.total => {}
            _ => best = Some(candidate),
        }
    }
    best
}

pub(crate) fn rationale(estimates: &[DichotomyEstimate], best: &TypeScore) -> String {
    let axes = estimates
        .iter()
        .map(|estimate| {
            format!(
                "{} theta {:.2} ({})",
                estimate.dichotomy.label(),
                unsigned_zero(estimate.theta),
                estimate.clarity.label()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let sentence = format!(
        "{axes}. Best fit {} with score {:.2}.",
        best.type_label.label(),
        unsigned_zero(best.total)
    );
    sentence.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Keeps `-0.0` from rendering as "-0.00".
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
