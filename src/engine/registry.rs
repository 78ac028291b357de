use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TitrationError;
use crate::models::enums::{DoseFrequency, DrugClass};

/// Doses within this distance of a rung count as sitting on it.
pub const DOSE_TOLERANCE_MG: f64 = 1e-6;

/// Weight-conditioned usable ceiling for a ladder (carvedilol).
/// Above the threshold the high-ceiling rung is usable; at or below it the
/// usable ceiling is the second-highest rung.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightCeiling {
    pub threshold_kg: f64,
    pub high_ceiling_mg: f64,
}

/// Approved titration steps for one medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseLadder {
    /// Canonical lowercase name.
    pub name: String,
    pub class: DrugClass,
    /// Strictly ascending, non-empty, in milligrams.
    pub doses_mg: Vec<f64>,
    pub frequency: DoseFrequency,
    pub weight_ceiling: Option<WeightCeiling>,
}

impl DoseLadder {
    /// Index of the rung the given dose sits on, if any.
    pub fn rung_index(&self, dose_mg: f64) -> Option<usize> {
        self.doses_mg
            .iter()
            .position(|d| (d - dose_mg).abs() < DOSE_TOLERANCE_MG)
    }

    pub fn max_dose_mg(&self) -> f64 {
        // Non-empty is a construction invariant.
        self.doses_mg[self.doses_mg.len() - 1]
    }
}

/// Static per-medication dose table, injected into the composer at
/// construction time so tests can substitute a reduced table.
#[derive(Debug)]
pub struct DoseLadderRegistry {
    ladders: HashMap<String, DoseLadder>,
}

impl DoseLadderRegistry {
    /// Build a registry from explicit ladders, validating the strictly
    /// ascending, non-empty invariant.
    pub fn new(ladders: Vec<DoseLadder>) -> Result<Self, TitrationError> {
        let mut map = HashMap::new();
        for ladder in ladders {
            if ladder.doses_mg.is_empty() {
                return Err(TitrationError::InvalidLadder {
                    medication: ladder.name,
                    reason: "empty dose list".into(),
                });
            }
            if ladder.doses_mg.windows(2).any(|w| w[0] >= w[1]) {
                return Err(TitrationError::InvalidLadder {
                    medication: ladder.name,
                    reason: "doses not strictly ascending".into(),
                });
            }
            map.insert(ladder.name.clone(), ladder);
        }
        Ok(Self { ladders: map })
    }

    /// The builtin titration protocol table.
    pub fn standard() -> Self {
        Self::new(standard_ladders()).expect("builtin dose table is valid")
    }

    /// Case-insensitive lookup; never guesses a class for unknown names.
    pub fn ladder_for(&self, medication: &str) -> Result<&DoseLadder, TitrationError> {
        let key = medication.trim().to_lowercase();
        self.ladders
            .get(&key)
            .ok_or_else(|| TitrationError::UnknownMedication(medication.trim().to_string()))
    }

    pub fn medication_names(&self) -> impl Iterator<Item = &str> {
        self.ladders.keys().map(String::as_str)
    }
}

fn ladder(
    name: &str,
    class: DrugClass,
    doses_mg: &[f64],
    frequency: DoseFrequency,
) -> DoseLadder {
    DoseLadder {
        name: name.into(),
        class,
        doses_mg: doses_mg.to_vec(),
        frequency,
        weight_ceiling: None,
    }
}

fn standard_ladders() -> Vec<DoseLadder> {
    use DoseFrequency::{OnceDaily, ThreeTimesDaily, TwiceDaily};
    use DrugClass::{AceInhibitor, AldosteroneAntagonist, Arb, BetaBlocker};

    vec![
        ladder("enalapril", AceInhibitor, &[2.5, 5.0, 10.0, 20.0], TwiceDaily),
        ladder("lisinopril", AceInhibitor, &[2.5, 5.0, 10.0, 20.0, 40.0], OnceDaily),
        ladder("ramipril", AceInhibitor, &[1.25, 2.5, 5.0, 10.0], OnceDaily),
        ladder("captopril", AceInhibitor, &[6.25, 12.5, 25.0, 50.0], ThreeTimesDaily),
        ladder("losartan", Arb, &[25.0, 50.0, 100.0], OnceDaily),
        ladder("valsartan", Arb, &[40.0, 80.0, 160.0], TwiceDaily),
        ladder("candesartan", Arb, &[4.0, 8.0, 16.0, 32.0], OnceDaily),
        ladder("spironolactone", AldosteroneAntagonist, &[12.5, 25.0, 50.0], OnceDaily),
        ladder("eplerenone", AldosteroneAntagonist, &[25.0, 50.0], OnceDaily),
        DoseLadder {
            name: "carvedilol".into(),
            class: BetaBlocker,
            doses_mg: vec![3.125, 6.25, 12.5, 25.0, 50.0],
            frequency: TwiceDaily,
            // 50 mg twice daily is reserved for patients over 85 kg.
            weight_ceiling: Some(WeightCeiling {
                threshold_kg: 85.0,
                high_ceiling_mg: 50.0,
            }),
        },
        ladder(
            "metoprolol succinate",
            BetaBlocker,
            &[12.5, 25.0, 50.0, 100.0, 200.0],
            OnceDaily,
        ),
        ladder("bisoprolol", BetaBlocker, &[1.25, 2.5, 5.0, 10.0], OnceDaily),
    ]
}
