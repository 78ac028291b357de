use super::messages::MessageTemplates;
use super::registry::DoseLadder;
use super::types::{ContraindicationReport, Reason, ReasonCode, Severity, SymptomFlags};
use crate::models::enums::{DrugClass, RequiredField};
use crate::models::facts::PatientFacts;

/// Evaluate every safety threshold for the medication's class.
///
/// The universal vital-sign gate runs first and short-circuits the
/// class-specific checks when it fires, matching the protocol's "hold now,
/// reassess later" behavior. Within a class, check order is fixed because
/// rationale text accumulates in evaluation order.
pub fn evaluate(
    facts: &PatientFacts,
    flags: &SymptomFlags,
    ladder: &DoseLadder,
) -> ContraindicationReport {
    let mut report = ContraindicationReport::default();

    check_universal_gate(facts, ladder.class, &mut report);
    if report.triggered() {
        return report;
    }

    match ladder.class {
        DrugClass::AceInhibitor | DrugClass::Arb => check_ace_arb(facts, flags, &mut report),
        DrugClass::AldosteroneAntagonist => check_aldosterone(facts, flags, &mut report),
        DrugClass::BetaBlocker => check_beta(facts, flags, &mut report),
    }

    report
}

/// Blanket vital-sign gate, evaluated before any class-specific logic.
/// Beta-blockers carry their own finer-grained heart-rate tiers, so the
/// generic <50 check applies to the other classes only.
fn check_universal_gate(facts: &PatientFacts, class: DrugClass, report: &mut ContraindicationReport) {
    let systolic_bad = facts
        .systolic_bp
        .is_some_and(|s| !(80.0..=200.0).contains(&s));
    let diastolic_bad = facts
        .diastolic_bp
        .is_some_and(|d| !(40.0..=110.0).contains(&d));
    if systolic_bad || diastolic_bad {
        report.reasons.push(Reason::new(
            ReasonCode::BloodPressureOutOfRange,
            Severity::Stop,
            MessageTemplates::blood_pressure_out_of_range(),
        ));
    }

    if class != DrugClass::BetaBlocker {
        if let Some(hr) = facts.heart_rate {
            if hr < 50.0 {
                report.reasons.push(Reason::new(
                    ReasonCode::LowHeartRate,
                    Severity::Stop,
                    MessageTemplates::low_heart_rate(),
                ));
            }
        }
    }
}

fn check_ace_arb(facts: &PatientFacts, flags: &SymptomFlags, report: &mut ContraindicationReport) {
    if flags.altered_mental_status {
        push_stop(report, ReasonCode::AlteredMentalStatus, MessageTemplates::altered_mental_status());
    }
    if flags.bronchospasm {
        push_stop(report, ReasonCode::Bronchospasm, MessageTemplates::bronchospasm());
    }

    check_renal_labs(facts, report, false);

    if flags.angioedema {
        push_stop(report, ReasonCode::Angioedema, MessageTemplates::angioedema());
    }
}

fn check_aldosterone(
    facts: &PatientFacts,
    flags: &SymptomFlags,
    report: &mut ContraindicationReport,
) {
    if flags.angioedema {
        push_stop(report, ReasonCode::Angioedema, MessageTemplates::angioedema());
    }
    if flags.altered_mental_status {
        push_stop(report, ReasonCode::AlteredMentalStatus, MessageTemplates::altered_mental_status());
    }
    if flags.bronchospasm {
        push_stop(report, ReasonCode::Bronchospasm, MessageTemplates::bronchospasm());
    }

    check_renal_labs(facts, report, true);

    if flags.gynecomastia {
        push_stop(report, ReasonCode::Gynecomastia, MessageTemplates::gynecomastia());
    }
}

fn check_beta(facts: &PatientFacts, flags: &SymptomFlags, report: &mut ContraindicationReport) {
    if flags.angioedema {
        push_stop(report, ReasonCode::Angioedema, MessageTemplates::angioedema());
    }
    if flags.bronchospasm {
        push_stop(report, ReasonCode::Bronchospasm, MessageTemplates::bronchospasm_beta());
    }
    if flags.altered_mental_status {
        push_stop(
            report,
            ReasonCode::AlteredMentalStatus,
            MessageTemplates::altered_mental_status_beta(),
        );
    }

    if let Some(hr) = facts.heart_rate {
        if hr < 45.0 {
            push_stop(
                report,
                ReasonCode::CriticallyLowHeartRate,
                MessageTemplates::critically_low_heart_rate(hr),
            );
        } else if hr < 50.0 {
            push_stop(report, ReasonCode::LowHeartRate, MessageTemplates::low_heart_rate_beta(hr));
        }
    }

    // Tighter than the universal 80 mmHg floor.
    if let Some(sbp) = facts.systolic_bp {
        if sbp < 85.0 {
            push_stop(report, ReasonCode::LowSystolic, MessageTemplates::low_systolic_beta(sbp));
        }
    }
}

/// Potassium / eGFR / creatinine thresholds shared by the renal-lab classes.
/// Absent labs are recorded instead of evaluated. Aldosterone antagonists
/// carry a stronger discontinuation tier at potassium > 6.0.
fn check_renal_labs(
    facts: &PatientFacts,
    report: &mut ContraindicationReport,
    discontinue_tier: bool,
) {
    match facts.potassium {
        Some(k) if discontinue_tier && k > 6.0 => {
            report.reasons.push(Reason::new(
                ReasonCode::VeryHighPotassium,
                Severity::Discontinue,
                MessageTemplates::very_high_potassium(k),
            ));
        }
        Some(k) if k > 5.5 => {
            push_stop(report, ReasonCode::HighPotassium, MessageTemplates::high_potassium(k));
        }
        Some(_) => {}
        None => report.missing_labs.push(RequiredField::Potassium),
    }

    match facts.egfr {
        Some(egfr) if egfr < 30.0 => {
            push_stop(report, ReasonCode::LowEgfr, MessageTemplates::low_egfr(egfr));
        }
        Some(_) => {}
        None => report.missing_labs.push(RequiredField::Egfr),
    }

    match facts.creatinine_increase_pct {
        Some(pct) if pct > 30.0 => {
            push_stop(report, ReasonCode::CreatinineRise, MessageTemplates::creatinine_rise(pct));
        }
        Some(_) => {}
        None => report.missing_labs.push(RequiredField::CreatinineChange),
    }
}

fn push_stop(report: &mut ContraindicationReport, code: ReasonCode, message: String) {
    report.reasons.push(Reason::new(code, Severity::Stop, message));
}
