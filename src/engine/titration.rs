use super::registry::DoseLadder;
use super::types::NextDoseOutcome;
use crate::models::enums::DrugClass;

/// Compute the next rung on the ladder for the current dose.
///
/// The current dose must sit exactly on a rung; anything else (a patient
/// started off-protocol) has no defined next step. ACE/ARB/aldosterone
/// antagonists use a right-biased search and treat the second-highest rung as
/// the usable ceiling. Beta-blockers use a left-biased position against a
/// weight-capped ladder and may climb to the capped top rung.
pub fn next_dose(ladder: &DoseLadder, current_mg: f64, weight_kg: Option<f64>) -> NextDoseOutcome {
    if ladder.rung_index(current_mg).is_none() {
        return NextDoseOutcome::OffLadder;
    }

    match ladder.class {
        DrugClass::BetaBlocker => next_dose_beta(ladder, current_mg, weight_kg),
        _ => next_dose_plain(ladder, current_mg),
    }
}

fn next_dose_plain(ladder: &DoseLadder, current_mg: f64) -> NextDoseOutcome {
    let doses = &ladder.doses_mg;
    let next_index = doses.partition_point(|d| *d <= current_mg);
    if next_index >= doses.len() - 1 {
        return NextDoseOutcome::AtMaximum;
    }
    NextDoseOutcome::Increase {
        dose_mg: doses[next_index],
    }
}

fn next_dose_beta(ladder: &DoseLadder, current_mg: f64, weight_kg: Option<f64>) -> NextDoseOutcome {
    let doses = &ladder.doses_mg;
    let max_index = effective_max_index(ladder, weight_kg);

    let current_index = doses.partition_point(|d| *d < current_mg);
    if current_index >= max_index {
        return NextDoseOutcome::AtMaximum;
    }

    let next_index = (current_index + 1).min(max_index);
    let next = doses[next_index];
    // Guards against ladder/position mismatches.
    if next <= current_mg {
        return NextDoseOutcome::AtTarget;
    }
    NextDoseOutcome::Increase { dose_mg: next }
}

/// Highest usable rung index. With a weight ceiling, patients over the
/// threshold may use the high-ceiling rung; everyone else (including unknown
/// weight, conservatively) is capped at the second-highest rung.
fn effective_max_index(ladder: &DoseLadder, weight_kg: Option<f64>) -> usize {
    let doses = &ladder.doses_mg;
    let top = doses.len() - 1;

    let Some(ceiling) = &ladder.weight_ceiling else {
        return top;
    };

    let over_threshold = weight_kg.is_some_and(|w| w > ceiling.threshold_kg);
    if over_threshold {
        ladder.rung_index(ceiling.high_ceiling_mg).unwrap_or(top)
    } else {
        top.saturating_sub(1)
    }
}
