pub mod classifier;
pub mod config;
pub mod engine;
pub mod models;

pub use classifier::{
    ChatClient, ClassifierError, HttpChatClient, LlmSymptomClassifier, MockChatClient,
    SymptomClassifier,
};
pub use config::ClassifierConfig;
pub use engine::{
    ClassifierFailurePolicy, Decision, DecisionComposer, DoseLadder, DoseLadderRegistry,
    MissingDataMode, NextDoseOutcome, Reason, ReasonCode, Severity, SymptomFlags, TitrationError,
    WeightCeiling,
};
pub use models::enums::{DecisionAction, DoseFrequency, DrugClass, RequiredField, Sex};
pub use models::facts::{pounds_to_kg, PatientFacts};
