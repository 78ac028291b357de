use crate::models::enums::{DoseFrequency, RequiredField};
use crate::models::facts::format_mg;

/// Patient-facing message builder. All rationale wording lives here so the
/// evaluator and composer stay renderer-agnostic.
pub struct MessageTemplates;

impl MessageTemplates {
    // ---- universal vital-sign gates ----

    pub fn blood_pressure_out_of_range() -> String {
        "Your blood pressure is not in the normal range. Please contact your \
         physician and hold the medication for now."
            .to_string()
    }

    pub fn low_heart_rate() -> String {
        "Your heart rate is low (<50 bpm). Please contact your physician and \
         hold the medication for now."
            .to_string()
    }

    // ---- labs ----

    pub fn high_potassium(potassium: f64) -> String {
        format!(
            "Your potassium is {potassium} mEq/L, which is above the safe limit. \
             Hold the medication and recheck labs before resuming."
        )
    }

    /// Stronger tier for aldosterone antagonists.
    pub fn very_high_potassium(potassium: f64) -> String {
        format!(
            "Your potassium is {potassium} mEq/L, which is dangerously high. \
             Discontinue the medication and contact your physician immediately."
        )
    }

    pub fn low_egfr(egfr: f64) -> String {
        format!(
            "eGFR is {egfr} mL/min. You may need to discontinue the medication. \
             Contact your physician before continuing."
        )
    }

    pub fn creatinine_rise(pct: f64) -> String {
        format!(
            "Your percentage creatinine increase is {pct}%. This is above 30%, \
             which suggests you should hold the medication."
        )
    }

    // ---- symptom flags ----

    pub fn angioedema() -> String {
        "Angioedema is a contraindication. Stop the medication immediately and \
         seek medical attention."
            .to_string()
    }

    pub fn altered_mental_status() -> String {
        "You appear to have altered mental status. Stop the medication \
         immediately and seek emergency medical attention."
            .to_string()
    }

    /// Beta-blocker variant with the escalation note.
    pub fn altered_mental_status_beta() -> String {
        "You are experiencing symptoms of acute decompensated heart failure \
         (altered mental status or confusion). Stop the medication immediately \
         and seek emergency medical attention. You may require IV diuretics or \
         inotropes."
            .to_string()
    }

    pub fn bronchospasm() -> String {
        "You are having trouble breathing. Hold the medication and contact \
         your physician immediately."
            .to_string()
    }

    /// Bronchospasm is a hard contraindication for beta-blockers.
    pub fn bronchospasm_beta() -> String {
        "You are experiencing bronchospasm or severe breathing difficulty. \
         This is a contraindication for beta-blockers. Stop the medication \
         immediately and seek emergency medical attention."
            .to_string()
    }

    pub fn gynecomastia() -> String {
        "You have symptoms of gynecomastia, which is a contraindication. Stop \
         the medication immediately and seek medical attention."
            .to_string()
    }

    // ---- beta-blocker vital tiers ----

    pub fn critically_low_heart_rate(heart_rate: f64) -> String {
        format!(
            "Your heart rate is {heart_rate} bpm, which is critically low \
             (below 45 bpm). Hold the medication and contact your physician \
             immediately. You may need to discontinue or reduce your dose."
        )
    }

    pub fn low_heart_rate_beta(heart_rate: f64) -> String {
        format!(
            "Your heart rate is {heart_rate} bpm, which is too low (below 50 bpm). \
             Hold the medication and contact your physician before taking your \
             next dose."
        )
    }

    pub fn low_systolic_beta(systolic: f64) -> String {
        format!(
            "Your systolic blood pressure is {systolic} mmHg, which is too low. \
             Hold the medication and contact your physician."
        )
    }

    // ---- missing data ----

    pub fn insufficient_data(fields: &[RequiredField]) -> String {
        format!(
            "I still need the following information before making a \
             recommendation: {}.",
            Self::field_list(fields)
        )
    }

    pub fn assumed_benign(fields: &[RequiredField]) -> String {
        format!(
            "{} are missing, but the titration guideline assumes these values \
             do not indicate anything problematic.",
            Self::field_list(fields)
        )
    }

    // ---- titration outcomes ----

    pub fn titrate(dose_mg: f64, frequency: DoseFrequency) -> String {
        format!(
            "Let's increase your dose. Please start taking {}mg {} and let us \
             know immediately if you see any unexpected symptoms.",
            format_mg(dose_mg),
            frequency.phrase()
        )
    }

    pub fn hold_at_maximum() -> String {
        "You are already taking the maximum recommended dose. Please continue \
         the current dose and let us know immediately if you see any \
         unexpected symptoms."
            .to_string()
    }

    pub fn at_target(dose_mg: f64, frequency: DoseFrequency) -> String {
        format!(
            "You are already at the target dose ({}mg {}). Continue the \
             current dose and monitor your heart rate and blood pressure.",
            format_mg(dose_mg),
            frequency.phrase()
        )
    }

    pub fn off_ladder(dose_mg: f64) -> String {
        format!(
            "Your current dose of {}mg is not a standard titration step, so \
             there is no defined next step. Please refer to the protocol with \
             your physician.",
            format_mg(dose_mg)
        )
    }

    fn field_list(fields: &[RequiredField]) -> String {
        fields
            .iter()
            .map(|f| f.display())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
