use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DrugClass {
    AceInhibitor => "ace_inhibitor",
    Arb => "arb",
    AldosteroneAntagonist => "aldosterone_antagonist",
    BetaBlocker => "beta_blocker",
});

impl DrugClass {
    /// Classes whose titration protocol hinges on potassium and kidney labs.
    pub fn requires_renal_labs(&self) -> bool {
        matches!(
            self,
            Self::AceInhibitor | Self::Arb | Self::AldosteroneAntagonist
        )
    }
}

str_enum!(DoseFrequency {
    OnceDaily => "once_daily",
    TwiceDaily => "twice_daily",
    ThreeTimesDaily => "three_times_daily",
});

impl DoseFrequency {
    /// Patient-facing phrase used in recommendations ("start taking 25mg twice daily").
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::OnceDaily => "once daily",
            Self::TwiceDaily => "twice daily",
            Self::ThreeTimesDaily => "three times daily",
        }
    }
}

str_enum!(Sex {
    Male => "male",
    Female => "female",
});

str_enum!(DecisionAction {
    Stop => "stop",
    Discontinue => "discontinue",
    Hold => "hold",
    Titrate => "titrate",
    HoldAtMaximum => "hold_at_maximum",
    InsufficientData => "insufficient_data",
});

str_enum!(RequiredField {
    Name => "name",
    Gender => "gender",
    Medication => "medication",
    Dose => "dose",
    BloodPressure => "blood_pressure",
    HeartRate => "heart_rate",
    Symptoms => "symptoms",
    Potassium => "potassium",
    Egfr => "egfr",
    CreatinineChange => "creatinine_change",
    Weight => "weight",
});

impl RequiredField {
    /// Patient-facing display name, as it appears in rationale text.
    pub fn display(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Gender => "gender",
            Self::Medication => "medication",
            Self::Dose => "current dose",
            Self::BloodPressure => "blood pressure",
            Self::HeartRate => "heart rate",
            Self::Symptoms => "symptoms",
            Self::Potassium => "Potassium",
            Self::Egfr => "eGFR",
            Self::CreatinineChange => "% Creatinine",
            Self::Weight => "weight",
        }
    }

    /// Lab fields that may be assumed benign instead of blocking a
    /// recommendation (MissingDataMode::AssumeBenign).
    pub fn is_lab(&self) -> bool {
        matches!(self, Self::Potassium | Self::Egfr | Self::CreatinineChange)
    }
}
