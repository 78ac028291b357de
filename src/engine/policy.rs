use crate::models::enums::{DrugClass, RequiredField};
use crate::models::facts::PatientFacts;

/// Which fields must be collected before a recommendation, per drug class.
pub struct MissingDataPolicy;

impl MissingDataPolicy {
    pub fn required_fields(class: DrugClass) -> Vec<RequiredField> {
        let mut fields = vec![
            RequiredField::Name,
            RequiredField::Gender,
            RequiredField::Medication,
            RequiredField::Dose,
            RequiredField::BloodPressure,
            RequiredField::HeartRate,
            RequiredField::Symptoms,
        ];
        if class.requires_renal_labs() {
            fields.push(RequiredField::Potassium);
            fields.push(RequiredField::Egfr);
            fields.push(RequiredField::CreatinineChange);
        }
        if class == DrugClass::BetaBlocker {
            fields.push(RequiredField::Weight);
        }
        fields
    }

    /// Required fields whose PatientFacts value is absent, in requirement
    /// order. Blood pressure needs both components present.
    pub fn missing_from(facts: &PatientFacts, class: DrugClass) -> Vec<RequiredField> {
        Self::required_fields(class)
            .into_iter()
            .filter(|field| Self::is_absent(facts, *field))
            .collect()
    }

    fn is_absent(facts: &PatientFacts, field: RequiredField) -> bool {
        match field {
            RequiredField::Name => facts.name.is_none(),
            RequiredField::Gender => facts.sex.is_none(),
            RequiredField::Medication => facts.medication.trim().is_empty(),
            RequiredField::Dose => facts.current_dose_mg.is_none(),
            RequiredField::BloodPressure => !facts.has_blood_pressure(),
            RequiredField::HeartRate => facts.heart_rate.is_none(),
            RequiredField::Symptoms => facts.symptoms.is_none(),
            RequiredField::Potassium => facts.potassium.is_none(),
            RequiredField::Egfr => facts.egfr.is_none(),
            RequiredField::CreatinineChange => facts.creatinine_increase_pct.is_none(),
            RequiredField::Weight => facts.weight_kg.is_none(),
        }
    }

    /// Fields that may degrade to an assumed-benign reading instead of
    /// blocking (MissingDataMode::AssumeBenign): the class labs and weight.
    pub fn is_degradable(field: RequiredField) -> bool {
        field.is_lab() || field == RequiredField::Weight
    }
}
