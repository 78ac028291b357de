use tracing::debug;

use super::client::ChatClient;
use super::parser::parse_yes_no;
use super::prompt::{
    build_symptom_message, reports_no_symptoms, ADHF_KEY, ADHF_SYSTEM_PROMPT, ANGIOEDEMA_KEY,
    ANGIOEDEMA_SYSTEM_PROMPT, BRONCHOSPASM_KEY, BRONCHOSPASM_SYSTEM_PROMPT, GYNECOMASTIA_KEY,
    GYNECOMASTIA_SYSTEM_PROMPT,
};
use super::{ClassifierError, SymptomClassifier};

/// Symptom classifier backed by a chat completion model.
///
/// Narratives that plainly report no symptoms never reach the model, so the
/// common "none" answer costs nothing and cannot fail.
pub struct LlmSymptomClassifier<C: ChatClient> {
    client: C,
}

impl<C: ChatClient> LlmSymptomClassifier<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    fn ask(&self, system: &str, symptoms: &str, key: &str) -> Result<bool, ClassifierError> {
        let response = self.client.complete(system, &build_symptom_message(symptoms))?;
        let answer = parse_yes_no(&response, key)?;
        debug!(key, answer, "symptom classification");
        Ok(answer)
    }
}

impl<C: ChatClient> SymptomClassifier for LlmSymptomClassifier<C> {
    fn is_angioedema(&self, symptoms: &str) -> Result<bool, ClassifierError> {
        if reports_no_symptoms(symptoms) {
            return Ok(false);
        }
        self.ask(ANGIOEDEMA_SYSTEM_PROMPT, symptoms, ANGIOEDEMA_KEY)
    }

    fn is_bronchospasm(&self, symptoms: &str) -> Result<bool, ClassifierError> {
        if reports_no_symptoms(symptoms) {
            return Ok(false);
        }
        self.ask(BRONCHOSPASM_SYSTEM_PROMPT, symptoms, BRONCHOSPASM_KEY)
    }

    fn is_adhf(&self, symptoms: &str) -> Result<bool, ClassifierError> {
        if reports_no_symptoms(symptoms) {
            return Ok(false);
        }
        self.ask(ADHF_SYSTEM_PROMPT, symptoms, ADHF_KEY)
    }

    fn is_gynecomastia(&self, symptoms: &str, is_male: bool) -> Result<bool, ClassifierError> {
        if !is_male || reports_no_symptoms(symptoms) {
            return Ok(false);
        }
        // The prompt is written for male patients; make that explicit in the
        // narrative as well.
        let narrative = format!("{symptoms} I am a male.");
        self.ask(GYNECOMASTIA_SYSTEM_PROMPT, &narrative, GYNECOMASTIA_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::super::client::MockChatClient;
    use super::*;

    #[test]
    fn positive_angioedema() {
        let classifier = LlmSymptomClassifier::new(MockChatClient::no_flags().with_angioedema());
        assert!(classifier.is_angioedema("swollen lips and tongue").unwrap());
    }

    #[test]
    fn negative_bronchospasm() {
        let classifier = LlmSymptomClassifier::new(MockChatClient::no_flags());
        assert!(!classifier.is_bronchospasm("feeling tired").unwrap());
    }

    #[test]
    fn no_symptom_narratives_skip_the_model() {
        let mock = MockChatClient::no_flags().with_angioedema().with_adhf();
        let classifier = LlmSymptomClassifier::new(mock);

        assert!(!classifier.is_angioedema("none").unwrap());
        assert!(!classifier.is_bronchospasm("").unwrap());
        assert!(!classifier.is_adhf("N/A").unwrap());
        assert!(!classifier.is_gynecomastia("no", true).unwrap());

        assert_eq!(classifier.client.calls(), 0);
    }

    #[test]
    fn gynecomastia_skipped_for_female_patients() {
        let mock = MockChatClient::no_flags().with_gynecomastia();
        let classifier = LlmSymptomClassifier::new(mock);

        assert!(!classifier.is_gynecomastia("breast tenderness", false).unwrap());
        assert_eq!(classifier.client.calls(), 0);

        assert!(classifier.is_gynecomastia("breast tenderness", true).unwrap());
        assert_eq!(classifier.client.calls(), 1);
    }

    #[test]
    fn malformed_response_surfaces_as_error() {
        let classifier =
            LlmSymptomClassifier::new(MockChatClient::with_raw_response("no json here"));
        assert!(classifier.is_angioedema("swollen lips").is_err());
    }
}
