pub mod client;
pub mod llm;
pub mod parser;
pub mod prompt;

pub use client::*;
pub use llm::*;
pub use parser::*;
pub use prompt::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Chat API is not reachable at {0}")]
    Connection(String),

    #[error("Chat API returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),
}

/// Answers the four yes/no symptom questions the titration protocol asks.
///
/// The free-text symptom narrative comes straight from the patient, so the
/// implementation has to tolerate arbitrary phrasing. Errors are surfaced to
/// the caller, which decides how a failed classification degrades.
pub trait SymptomClassifier {
    /// Swelling of lips, tongue, face, throat, or eyelids.
    fn is_angioedema(&self, symptoms: &str) -> Result<bool, ClassifierError>;

    /// Wheezing, chest tightness, or breathlessness.
    fn is_bronchospasm(&self, symptoms: &str) -> Result<bool, ClassifierError>;

    /// Altered mental status suggesting acute decompensated heart failure.
    /// Mild conversational confusion must not trip this.
    fn is_adhf(&self, symptoms: &str) -> Result<bool, ClassifierError>;

    /// Breast enlargement or tenderness. Only meaningful for male patients;
    /// implementations return false outright when `is_male` is false.
    fn is_gynecomastia(&self, symptoms: &str, is_male: bool) -> Result<bool, ClassifierError>;
}
