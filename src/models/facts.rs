use serde::{Deserialize, Serialize};

use super::enums::Sex;

/// Per-decision snapshot of everything collected about the patient so far.
///
/// Every numeric field is optional: `None` means "not yet collected or not
/// parseable", which is distinct from an explicit zero. Snapshots are never
/// mutated; the caller builds a fresh one as more information arrives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientFacts {
    pub name: Option<String>,
    pub sex: Option<Sex>,
    /// Medication name as reported; lookup is trimmed + lowercased.
    pub medication: String,
    pub current_dose_mg: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub heart_rate: Option<f64>,
    /// mEq/L
    pub potassium: Option<f64>,
    /// mL/min
    pub egfr: Option<f64>,
    /// Percent increase since baseline.
    pub creatinine_increase_pct: Option<f64>,
    /// Free-text symptom narrative, exactly as the patient reported it.
    pub symptoms: Option<String>,
    pub weight_kg: Option<f64>,
}

impl PatientFacts {
    pub fn is_male(&self) -> bool {
        self.sex == Some(Sex::Male)
    }

    /// Both components present; blood pressure cannot be judged from one alone.
    pub fn has_blood_pressure(&self) -> bool {
        self.systolic_bp.is_some() && self.diastolic_bp.is_some()
    }
}

/// Patients tend to report weight in pounds; the protocol thresholds are in kg.
pub fn pounds_to_kg(pounds: f64) -> f64 {
    pounds * 0.453_592
}

/// Format a milligram value for display: "12.5", "25", "3.125".
pub fn format_mg(mg: f64) -> String {
    format!("{mg}")
}
