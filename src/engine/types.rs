use serde::{Deserialize, Serialize};

use crate::models::enums::{DecisionAction, DoseFrequency, RequiredField};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity determines which terminal action a triggered reason forces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational: explains a non-blocking part of the decision.
    Info,
    /// Stop: hold the medication and contact a physician.
    Stop,
    /// Discontinue: the medication itself must be abandoned, not just held.
    Discontinue,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Stop => "stop",
            Self::Discontinue => "discontinue",
        }
    }
}

// ---------------------------------------------------------------------------
// Reason
// ---------------------------------------------------------------------------

/// Why a particular check fired, as a stable code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReasonCode {
    BloodPressureOutOfRange,
    LowHeartRate,
    CriticallyLowHeartRate,
    LowSystolic,
    HighPotassium,
    VeryHighPotassium,
    LowEgfr,
    CreatinineRise,
    Angioedema,
    Bronchospasm,
    AlteredMentalStatus,
    Gynecomastia,
    LabsAssumedBenign,
    MissingFields,
    DoseIncrease,
    MaximumDoseReached,
    TargetDoseReached,
    OffLadderDose,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BloodPressureOutOfRange => "blood_pressure_out_of_range",
            Self::LowHeartRate => "low_heart_rate",
            Self::CriticallyLowHeartRate => "critically_low_heart_rate",
            Self::LowSystolic => "low_systolic",
            Self::HighPotassium => "high_potassium",
            Self::VeryHighPotassium => "very_high_potassium",
            Self::LowEgfr => "low_egfr",
            Self::CreatinineRise => "creatinine_rise",
            Self::Angioedema => "angioedema",
            Self::Bronchospasm => "bronchospasm",
            Self::AlteredMentalStatus => "altered_mental_status",
            Self::Gynecomastia => "gynecomastia",
            Self::LabsAssumedBenign => "labs_assumed_benign",
            Self::MissingFields => "missing_fields",
            Self::DoseIncrease => "dose_increase",
            Self::MaximumDoseReached => "maximum_dose_reached",
            Self::TargetDoseReached => "target_dose_reached",
            Self::OffLadderDose => "off_ladder_dose",
        }
    }
}

/// One structured entry of a decision's rationale. Text rendering happens only
/// at the presentation boundary (`Decision::rationale`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reason {
    pub code: ReasonCode,
    pub severity: Severity,
    /// Patient-facing sentence, built from `MessageTemplates`.
    pub message: String,
}

impl Reason {
    pub fn new(code: ReasonCode, severity: Severity, message: String) -> Self {
        Self {
            code,
            severity,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// SymptomFlags
// ---------------------------------------------------------------------------

/// Boolean symptom set derived from the free-text narrative each decision.
/// Never cached across calls; the classifier may be nondeterministic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomFlags {
    pub angioedema: bool,
    pub bronchospasm: bool,
    pub altered_mental_status: bool,
    pub gynecomastia: bool,
}

// ---------------------------------------------------------------------------
// ContraindicationReport
// ---------------------------------------------------------------------------

/// Output of the contraindication evaluator: every triggered reason in
/// evaluation order, plus the labs that could not be evaluated.
#[derive(Debug, Clone, Default)]
pub struct ContraindicationReport {
    pub reasons: Vec<Reason>,
    pub missing_labs: Vec<RequiredField>,
}

impl ContraindicationReport {
    pub fn triggered(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Strongest severity among triggered reasons.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.reasons.iter().map(|r| r.severity).max()
    }
}

// ---------------------------------------------------------------------------
// NextDoseOutcome
// ---------------------------------------------------------------------------

/// Result of the ladder arithmetic, before composition into a Decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextDoseOutcome {
    /// Advance one rung to this dose.
    Increase { dose_mg: f64 },
    /// Already at the usable top of the ladder; continue and monitor.
    AtMaximum,
    /// The computed next rung would not exceed the current dose.
    AtTarget,
    /// Current dose sits on no rung; no defined next step.
    OffLadder,
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// How missing class labs and weight affect the recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingDataMode {
    /// Any missing required field blocks the recommendation.
    #[default]
    Strict,
    /// Missing labs and weight degrade to an "assumed benign" note;
    /// other required fields still block.
    AssumeBenign,
}

/// Which way a failed classifier call resolves each flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifierFailurePolicy {
    /// Every flag defaults to absent on failure.
    #[default]
    AssumeAbsent,
    /// Angioedema alone defaults to present on failure; the other flags
    /// still default to absent.
    CautiousAngioedema,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Terminal output of one evaluation. A pure value: identical facts and a
/// deterministic classifier yield an identical Decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub action: DecisionAction,
    /// Every triggering reason, order-preserving.
    pub reasons: Vec<Reason>,
    /// Required fields that blocked the recommendation (InsufficientData only).
    pub missing_fields: Vec<RequiredField>,
    /// Fields degraded to an assumed-benign reading (AssumeBenign mode only).
    pub assumed_benign: Vec<RequiredField>,
    /// Populated only for Titrate.
    pub new_dose_mg: Option<f64>,
    pub frequency: Option<DoseFrequency>,
}

impl Decision {
    /// Render the ordered reasons into one patient-facing paragraph.
    pub fn rationale(&self) -> String {
        self.reasons
            .iter()
            .map(|r| r.message.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
