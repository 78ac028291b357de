use tracing::{info, warn};

use super::contraindication;
use super::messages::MessageTemplates;
use super::policy::MissingDataPolicy;
use super::registry::DoseLadderRegistry;
use super::titration;
use super::types::{
    ClassifierFailurePolicy, Decision, MissingDataMode, NextDoseOutcome, Reason, ReasonCode,
    Severity, SymptomFlags,
};
use super::TitrationError;
use crate::classifier::{ClassifierError, SymptomClassifier};
use crate::models::enums::{DecisionAction, RequiredField};
use crate::models::facts::PatientFacts;

/// Composes contraindication evaluation, missing-data policy, and ladder
/// arithmetic into one authoritative Decision per snapshot.
///
/// Priority order is strict: a triggered stop reason wins over everything,
/// missing mandatory data wins over titration, and a numeric dose is computed
/// only when neither applies. Holds only immutable state, so independent
/// decisions may run concurrently behind `&self`.
pub struct DecisionComposer<S: SymptomClassifier> {
    registry: DoseLadderRegistry,
    classifier: S,
    missing_data_mode: MissingDataMode,
    failure_policy: ClassifierFailurePolicy,
}

impl<S: SymptomClassifier> DecisionComposer<S> {
    pub fn new(registry: DoseLadderRegistry, classifier: S) -> Self {
        Self {
            registry,
            classifier,
            missing_data_mode: MissingDataMode::default(),
            failure_policy: ClassifierFailurePolicy::default(),
        }
    }

    pub fn with_missing_data_mode(mut self, mode: MissingDataMode) -> Self {
        self.missing_data_mode = mode;
        self
    }

    pub fn with_failure_policy(mut self, policy: ClassifierFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Evaluate one snapshot. Only an unknown medication is an `Err`; every
    /// safety outcome, including "ask for more information", is a Decision.
    pub fn decide(&self, facts: &PatientFacts) -> Result<Decision, TitrationError> {
        let ladder = self.registry.ladder_for(&facts.medication)?;
        let flags = self.classify(facts);
        let report = contraindication::evaluate(facts, &flags, ladder);

        // Priority 1: any triggered safety reason. No dose is ever computed
        // in this branch.
        if report.triggered() {
            let action = if report.worst_severity() == Some(Severity::Discontinue) {
                DecisionAction::Discontinue
            } else {
                DecisionAction::Stop
            };
            return Ok(self.log(facts, Decision {
                action,
                reasons: report.reasons,
                missing_fields: vec![],
                assumed_benign: vec![],
                new_dose_mg: None,
                frequency: None,
            }));
        }

        // Priority 2: missing mandatory fields.
        let missing = MissingDataPolicy::missing_from(facts, ladder.class);
        let (degradable, blocking): (Vec<RequiredField>, Vec<RequiredField>) =
            match self.missing_data_mode {
                MissingDataMode::Strict => (vec![], missing),
                MissingDataMode::AssumeBenign => missing
                    .into_iter()
                    .partition(|f| MissingDataPolicy::is_degradable(*f)),
            };
        if !blocking.is_empty() {
            return Ok(self.log(facts, Decision {
                action: DecisionAction::InsufficientData,
                reasons: vec![Reason::new(
                    ReasonCode::MissingFields,
                    Severity::Info,
                    MessageTemplates::insufficient_data(&blocking),
                )],
                missing_fields: blocking,
                assumed_benign: vec![],
                new_dose_mg: None,
                frequency: None,
            }));
        }

        let mut reasons = Vec::new();
        if !degradable.is_empty() {
            reasons.push(Reason::new(
                ReasonCode::LabsAssumedBenign,
                Severity::Info,
                MessageTemplates::assumed_benign(&degradable),
            ));
        }

        // The current dose is a universal requirement and never degradable,
        // so it is present past the check above.
        let Some(current_mg) = facts.current_dose_mg else {
            return Ok(self.log(facts, Decision {
                action: DecisionAction::InsufficientData,
                reasons: vec![Reason::new(
                    ReasonCode::MissingFields,
                    Severity::Info,
                    MessageTemplates::insufficient_data(&[RequiredField::Dose]),
                )],
                missing_fields: vec![RequiredField::Dose],
                assumed_benign: vec![],
                new_dose_mg: None,
                frequency: None,
            }));
        };

        // Priority 3: ladder arithmetic.
        let outcome = titration::next_dose(ladder, current_mg, facts.weight_kg);
        let decision = match outcome {
            NextDoseOutcome::Increase { dose_mg } => {
                reasons.push(Reason::new(
                    ReasonCode::DoseIncrease,
                    Severity::Info,
                    MessageTemplates::titrate(dose_mg, ladder.frequency),
                ));
                Decision {
                    action: DecisionAction::Titrate,
                    reasons,
                    missing_fields: vec![],
                    assumed_benign: degradable,
                    new_dose_mg: Some(dose_mg),
                    frequency: Some(ladder.frequency),
                }
            }
            NextDoseOutcome::AtMaximum => {
                reasons.push(Reason::new(
                    ReasonCode::MaximumDoseReached,
                    Severity::Info,
                    MessageTemplates::hold_at_maximum(),
                ));
                Decision {
                    action: DecisionAction::HoldAtMaximum,
                    reasons,
                    missing_fields: vec![],
                    assumed_benign: degradable,
                    new_dose_mg: None,
                    frequency: None,
                }
            }
            NextDoseOutcome::AtTarget => {
                reasons.push(Reason::new(
                    ReasonCode::TargetDoseReached,
                    Severity::Info,
                    MessageTemplates::at_target(current_mg, ladder.frequency),
                ));
                Decision {
                    action: DecisionAction::Hold,
                    reasons,
                    missing_fields: vec![],
                    assumed_benign: degradable,
                    new_dose_mg: None,
                    frequency: None,
                }
            }
            NextDoseOutcome::OffLadder => {
                reasons.push(Reason::new(
                    ReasonCode::OffLadderDose,
                    Severity::Info,
                    MessageTemplates::off_ladder(current_mg),
                ));
                Decision {
                    action: DecisionAction::Hold,
                    reasons,
                    missing_fields: vec![],
                    assumed_benign: degradable,
                    new_dose_mg: None,
                    frequency: None,
                }
            }
        };

        Ok(self.log(facts, decision))
    }

    /// Recompute the four symptom flags from the narrative. Flags are never
    /// cached across decisions.
    fn classify(&self, facts: &PatientFacts) -> SymptomFlags {
        let narrative = facts.symptoms.as_deref().unwrap_or("");
        SymptomFlags {
            angioedema: self.resolve(self.classifier.is_angioedema(narrative), true),
            bronchospasm: self.resolve(self.classifier.is_bronchospasm(narrative), false),
            altered_mental_status: self.resolve(self.classifier.is_adhf(narrative), false),
            gynecomastia: self.resolve(
                self.classifier.is_gynecomastia(narrative, facts.is_male()),
                false,
            ),
        }
    }

    /// Apply the failure policy to a classifier result. The error is logged,
    /// never silently swallowed.
    fn resolve(&self, result: Result<bool, ClassifierError>, angioedema: bool) -> bool {
        match result {
            Ok(flag) => flag,
            Err(e) => {
                let fallback =
                    angioedema && self.failure_policy == ClassifierFailurePolicy::CautiousAngioedema;
                warn!(error = %e, fallback, "symptom classifier failed; applying failure policy");
                fallback
            }
        }
    }

    fn log(&self, facts: &PatientFacts, decision: Decision) -> Decision {
        info!(
            medication = %facts.medication,
            action = decision.action.as_str(),
            reasons = decision.reasons.len(),
            new_dose_mg = decision.new_dose_mg,
            "titration decision composed"
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierError, SymptomClassifier};
    use crate::models::enums::{DoseFrequency, Sex};

    /// Deterministic classifier with configurable flags and failure mode.
    struct StubClassifier {
        flags: SymptomFlags,
        fail: bool,
    }

    impl StubClassifier {
        fn quiet() -> Self {
            Self {
                flags: SymptomFlags::default(),
                fail: false,
            }
        }

        fn with_flags(flags: SymptomFlags) -> Self {
            Self { flags, fail: false }
        }

        fn failing() -> Self {
            Self {
                flags: SymptomFlags::default(),
                fail: true,
            }
        }

        fn answer(&self, value: bool) -> Result<bool, ClassifierError> {
            if self.fail {
                Err(ClassifierError::Connection("stub".into()))
            } else {
                Ok(value)
            }
        }
    }

    impl SymptomClassifier for StubClassifier {
        fn is_angioedema(&self, _symptoms: &str) -> Result<bool, ClassifierError> {
            self.answer(self.flags.angioedema)
        }

        fn is_bronchospasm(&self, _symptoms: &str) -> Result<bool, ClassifierError> {
            self.answer(self.flags.bronchospasm)
        }

        fn is_adhf(&self, _symptoms: &str) -> Result<bool, ClassifierError> {
            self.answer(self.flags.altered_mental_status)
        }

        fn is_gynecomastia(&self, _symptoms: &str, is_male: bool) -> Result<bool, ClassifierError> {
            if !is_male {
                return Ok(false);
            }
            self.answer(self.flags.gynecomastia)
        }
    }

    fn composer(classifier: StubClassifier) -> DecisionComposer<StubClassifier> {
        DecisionComposer::new(DoseLadderRegistry::standard(), classifier)
    }

    fn complete_facts(medication: &str, dose_mg: f64) -> PatientFacts {
        PatientFacts {
            name: Some("Alex".into()),
            sex: Some(Sex::Male),
            medication: medication.into(),
            current_dose_mg: Some(dose_mg),
            systolic_bp: Some(120.0),
            diastolic_bp: Some(80.0),
            heart_rate: Some(70.0),
            potassium: Some(4.0),
            egfr: Some(60.0),
            creatinine_increase_pct: Some(5.0),
            symptoms: Some("none".into()),
            weight_kg: Some(80.0),
        }
    }

    #[test]
    fn angioedema_stops_lisinopril_without_labs() {
        let mut facts = complete_facts("lisinopril", 5.0);
        facts.potassium = None;
        facts.egfr = None;
        facts.creatinine_increase_pct = None;
        facts.symptoms = Some("swollen lips, tongue, and eyelids".into());

        let flags = SymptomFlags {
            angioedema: true,
            ..Default::default()
        };
        let decision = composer(StubClassifier::with_flags(flags)).decide(&facts).unwrap();

        assert_eq!(decision.action, DecisionAction::Stop);
        assert!(decision.rationale().contains("Angioedema"));
        assert_eq!(decision.new_dose_mg, None);
    }

    #[test]
    fn high_potassium_stops_enalapril() {
        let mut facts = complete_facts("enalapril", 5.0);
        facts.potassium = Some(6.0);

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Stop);
        assert!(decision.rationale().contains("6 mEq/L"));
    }

    #[test]
    fn candesartan_titrates_to_16_once_daily() {
        let mut facts = complete_facts("candesartan", 8.0);
        facts.potassium = Some(3.0);

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Titrate);
        assert_eq!(decision.new_dose_mg, Some(16.0));
        assert_eq!(decision.frequency, Some(DoseFrequency::OnceDaily));
        assert!(decision.rationale().contains("16mg once daily"));
    }

    #[test]
    fn carvedilol_under_weight_threshold_titrates_to_25() {
        let mut facts = complete_facts("carvedilol", 12.5);
        facts.heart_rate = Some(60.0);
        facts.weight_kg = Some(crate::models::facts::pounds_to_kg(170.0));

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Titrate);
        assert_eq!(decision.new_dose_mg, Some(25.0));
        assert!(decision.rationale().contains("25mg twice daily"));
    }

    #[test]
    fn carvedilol_over_threshold_reaches_50() {
        let mut facts = complete_facts("carvedilol", 25.0);
        facts.weight_kg = Some(90.0);

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Titrate);
        assert_eq!(decision.new_dose_mg, Some(50.0));
    }

    #[test]
    fn carvedilol_at_25_under_threshold_holds_at_maximum() {
        let mut facts = complete_facts("carvedilol", 25.0);
        facts.weight_kg = Some(77.0);

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::HoldAtMaximum);
        assert_eq!(decision.new_dose_mg, None);
    }

    #[test]
    fn low_heart_rate_gate_ignores_potassium() {
        let mut facts = complete_facts("spironolactone", 12.5);
        facts.heart_rate = Some(40.0);
        facts.potassium = Some(3.0);

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Stop);
        assert!(decision.rationale().contains("heart rate is low"));
    }

    #[test]
    fn unknown_medication_is_an_error() {
        let facts = complete_facts("aspirin", 100.0);
        let err = composer(StubClassifier::quiet()).decide(&facts).unwrap_err();
        assert!(matches!(err, TitrationError::UnknownMedication(name) if name == "aspirin"));
    }

    #[test]
    fn very_high_potassium_discontinues_spironolactone() {
        let mut facts = complete_facts("spironolactone", 12.5);
        facts.potassium = Some(6.5);

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Discontinue);
        assert!(decision.rationale().contains("6.5 mEq/L"));
    }

    #[test]
    fn off_ladder_dose_holds_and_refers_to_protocol() {
        let facts = complete_facts("metoprolol succinate", 5.0);
        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Hold);
        assert!(decision.rationale().contains("refer to the protocol"));
    }

    #[test]
    fn strict_mode_blocks_on_missing_potassium() {
        let mut facts = complete_facts("candesartan", 8.0);
        facts.potassium = None;

        let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::InsufficientData);
        assert_eq!(decision.missing_fields, vec![RequiredField::Potassium]);
        assert!(decision.rationale().contains("Potassium"));
        assert_eq!(decision.new_dose_mg, None);
    }

    #[test]
    fn assume_benign_mode_degrades_missing_labs() {
        let mut facts = complete_facts("candesartan", 8.0);
        facts.potassium = None;

        let decision = composer(StubClassifier::quiet())
            .with_missing_data_mode(MissingDataMode::AssumeBenign)
            .decide(&facts)
            .unwrap();
        assert_eq!(decision.action, DecisionAction::Titrate);
        assert_eq!(decision.new_dose_mg, Some(16.0));
        assert_eq!(decision.assumed_benign, vec![RequiredField::Potassium]);
        assert!(decision.rationale().contains("Potassium are missing"));
    }

    #[test]
    fn assume_benign_mode_still_blocks_on_missing_vitals() {
        let mut facts = complete_facts("candesartan", 8.0);
        facts.heart_rate = None;

        let decision = composer(StubClassifier::quiet())
            .with_missing_data_mode(MissingDataMode::AssumeBenign)
            .decide(&facts)
            .unwrap();
        assert_eq!(decision.action, DecisionAction::InsufficientData);
        assert_eq!(decision.missing_fields, vec![RequiredField::HeartRate]);
    }

    #[test]
    fn classifier_failure_defaults_to_absent() {
        let mut facts = complete_facts("lisinopril", 5.0);
        facts.symptoms = Some("swollen lips".into());

        let decision = composer(StubClassifier::failing()).decide(&facts).unwrap();
        // All flags degrade to absent; the decision proceeds to titration.
        assert_eq!(decision.action, DecisionAction::Titrate);
        assert_eq!(decision.new_dose_mg, Some(10.0));
    }

    #[test]
    fn cautious_policy_biases_angioedema_to_present() {
        let mut facts = complete_facts("lisinopril", 5.0);
        facts.symptoms = Some("swollen lips".into());

        let decision = composer(StubClassifier::failing())
            .with_failure_policy(ClassifierFailurePolicy::CautiousAngioedema)
            .decide(&facts)
            .unwrap();
        assert_eq!(decision.action, DecisionAction::Stop);
        assert!(decision.rationale().contains("Angioedema"));
    }

    #[test]
    fn decide_is_idempotent_with_deterministic_classifier() {
        let facts = complete_facts("ramipril", 2.5);
        let c = composer(StubClassifier::quiet());

        let first = c.decide(&facts).unwrap();
        let second = c.decide(&facts).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn potassium_above_threshold_never_titrates() {
        for medication in ["lisinopril", "candesartan", "spironolactone"] {
            let mut facts = complete_facts(medication, match medication {
                "spironolactone" => 12.5,
                _ => 5.0,
            });
            facts.potassium = Some(5.6);

            let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
            assert_ne!(decision.action, DecisionAction::Titrate, "{medication}");
            assert_eq!(decision.new_dose_mg, None, "{medication}");
        }
    }

    #[test]
    fn low_heart_rate_on_beta_blocker_never_titrates() {
        for hr in [30.0, 44.9, 45.0, 49.9] {
            let mut facts = complete_facts("bisoprolol", 2.5);
            facts.heart_rate = Some(hr);

            let decision = composer(StubClassifier::quiet()).decide(&facts).unwrap();
            assert_eq!(decision.action, DecisionAction::Stop, "hr {hr}");
            assert_eq!(decision.new_dose_mg, None, "hr {hr}");
        }
    }

    #[test]
    fn monotonic_ladder_advance() {
        let registry = DoseLadderRegistry::standard();
        let names: Vec<String> = registry.medication_names().map(String::from).collect();
        let c = composer(StubClassifier::quiet());

        for name in names {
            let ladder = registry.ladder_for(&name).unwrap().clone();
            for (i, dose) in ladder.doses_mg.iter().enumerate() {
                let mut facts = complete_facts(&name, *dose);
                facts.weight_kg = Some(90.0);
                let decision = c.decide(&facts).unwrap();
                if let Some(next) = decision.new_dose_mg {
                    assert_eq!(next, ladder.doses_mg[i + 1], "{name} at {dose}");
                }
            }
        }
    }

    #[test]
    fn gynecomastia_checked_only_for_males() {
        let flags = SymptomFlags {
            gynecomastia: true,
            ..Default::default()
        };

        let mut facts = complete_facts("spironolactone", 12.5);
        facts.symptoms = Some("breast tenderness".into());
        let decision = composer(StubClassifier::with_flags(flags)).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Stop);

        facts.sex = Some(Sex::Female);
        let decision = composer(StubClassifier::with_flags(flags)).decide(&facts).unwrap();
        assert_eq!(decision.action, DecisionAction::Titrate);
    }
}
