use super::super::domain::ClarityCategory;
use super::estimator::THETA_BOUND;

pub const MAX_PCI: u8 = 30;

/// Preference clarity index in `1..=30` for a theta estimate.
pub fn preference_clarity_index(theta: f64) -> u8 {
    if theta == 0.0 || !theta.is_finite() {
        return 1;
    }
    let scaled = (theta.abs() / THETA_BOUND * f64::from(MAX_PCI)).round();
    scaled.clamp(1.0, f64::from(MAX_PCI)) as u8
}

pub fn clarity_category(pci: u8) -> ClarityCategory {
    match pci {
        26.. => ClarityCategory::VeryClear,
        16..=25 => ClarityCategory::Clear,
        6..=15 => ClarityCategory::Moderate,
        _ => ClarityCategory::Slight,
    }
}
