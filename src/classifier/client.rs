use std::cell::Cell;

use serde::{Deserialize, Serialize};

use super::prompt::{ADHF_KEY, ANGIOEDEMA_KEY, BRONCHOSPASM_KEY, GYNECOMASTIA_KEY};
use super::ClassifierError;

/// One system + user exchange with a chat completion endpoint.
pub trait ChatClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, ClassifierError>;
}

/// HTTP client for an OpenAI-compatible chat completions API.
pub struct HttpChatClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpChatClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, ClassifierError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClassifierError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }
}

/// Request body for /chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl ChatClient for HttpChatClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, ClassifierError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            // Deterministic classification.
            temperature: 0.0,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                ClassifierError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ClassifierError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                ClassifierError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ClassifierError::MalformedResponse("Empty choices array".into()))
    }
}

/// Mock chat client for testing. Answers each classifier question from a
/// configured set of flags, or replays a fixed raw response.
pub struct MockChatClient {
    angioedema: bool,
    bronchospasm: bool,
    adhf: bool,
    gynecomastia: bool,
    raw_response: Option<String>,
    calls: Cell<usize>,
}

impl MockChatClient {
    /// All four questions answer "No".
    pub fn no_flags() -> Self {
        Self {
            angioedema: false,
            bronchospasm: false,
            adhf: false,
            gynecomastia: false,
            raw_response: None,
            calls: Cell::new(0),
        }
    }

    pub fn with_angioedema(mut self) -> Self {
        self.angioedema = true;
        self
    }

    pub fn with_bronchospasm(mut self) -> Self {
        self.bronchospasm = true;
        self
    }

    pub fn with_adhf(mut self) -> Self {
        self.adhf = true;
        self
    }

    pub fn with_gynecomastia(mut self) -> Self {
        self.gynecomastia = true;
        self
    }

    /// Replay a raw response verbatim regardless of the question asked.
    pub fn with_raw_response(response: &str) -> Self {
        let mut mock = Self::no_flags();
        mock.raw_response = Some(response.to_string());
        mock
    }

    /// How many times the model was actually consulted.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn answer(&self, key: &str, yes: bool) -> String {
        let value = if yes { "Yes" } else { "No" };
        format!("{{\"{key}\": \"{value}\"}}")
    }
}

impl ChatClient for MockChatClient {
    fn complete(&self, system: &str, _user: &str) -> Result<String, ClassifierError> {
        self.calls.set(self.calls.get() + 1);

        if let Some(raw) = &self.raw_response {
            return Ok(raw.clone());
        }

        // Route by the response key the system prompt demands.
        if system.contains(&format!("\"{BRONCHOSPASM_KEY}\"")) {
            Ok(self.answer(BRONCHOSPASM_KEY, self.bronchospasm))
        } else if system.contains(&format!("\"{ADHF_KEY}\"")) {
            Ok(self.answer(ADHF_KEY, self.adhf))
        } else if system.contains(&format!("\"{GYNECOMASTIA_KEY}\"")) {
            Ok(self.answer(GYNECOMASTIA_KEY, self.gynecomastia))
        } else if system.contains(&format!("\"{ANGIOEDEMA_KEY}\"")) {
            Ok(self.answer(ANGIOEDEMA_KEY, self.angioedema))
        } else {
            Err(ClassifierError::MalformedResponse(
                "Unrecognized system prompt".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::prompt::{ANGIOEDEMA_SYSTEM_PROMPT, BRONCHOSPASM_SYSTEM_PROMPT};
    use super::*;

    #[test]
    fn http_client_trims_trailing_slash() {
        let client = HttpChatClient::new("https://api.example.com/v1/", None, "gpt-4.1", 30)
            .unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.timeout_secs, 30);
    }

    #[test]
    fn mock_routes_by_prompt() {
        let mock = MockChatClient::no_flags().with_angioedema();
        let answer = mock.complete(ANGIOEDEMA_SYSTEM_PROMPT, "Patient symptoms: x").unwrap();
        assert_eq!(answer, r#"{"angioedema": "Yes"}"#);

        let answer = mock.complete(BRONCHOSPASM_SYSTEM_PROMPT, "Patient symptoms: x").unwrap();
        assert_eq!(answer, r#"{"BS": "No"}"#);
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn mock_raw_response_overrides_routing() {
        let mock = MockChatClient::with_raw_response("not json at all");
        let answer = mock.complete(ANGIOEDEMA_SYSTEM_PROMPT, "Patient symptoms: x").unwrap();
        assert_eq!(answer, "not json at all");
    }
}
