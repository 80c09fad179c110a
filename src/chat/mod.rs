//! Chat session against the Gemini `generateContent` API
//!
//! The session holds the full turn history client-side and resends it with
//! every request; it is the single source of truth for what the remote
//! model has seen.

use async_trait::async_trait;

use crate::{Error, Result};

const GENERATE_URL_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reply used when the model returns nothing usable (blocked or empty)
pub const FALLBACK_REPLY: &str =
    "I'm having trouble answering that right now. Could you rephrase your question?";

/// One entry in the Gemini contents history
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct Content {
    /// "user" or "model"
    role: String,
    parts: Vec<Part>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct Part {
    text: String,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// Sampling parameters sent with every request in a session
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 300,
        }
    }
}

/// Per-category harm threshold
#[derive(Clone, Debug, serde::Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

/// Permissive thresholds: no category blocks content at any severity
fn permissive_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: "BLOCK_NONE",
    })
    .collect()
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: &'a GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(serde::Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<BorrowedPart<'a>>,
}

#[derive(serde::Serialize)]
struct BorrowedPart<'a> {
    text: &'a str,
}

#[derive(serde::Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Produces a bot reply for each user message, conditioned on prior turns
#[async_trait]
pub trait Respond {
    /// Send user text and return the model's reply
    ///
    /// Returns [`FALLBACK_REPLY`] when the model produced nothing usable;
    /// returns [`Error::Chat`] when the remote call itself failed, in which
    /// case the session remains usable for subsequent turns.
    async fn send(&mut self, user_text: &str) -> Result<String>;

    /// Discard the conversational context, starting over with zero turns
    fn clear(&mut self);
}

/// A conversation with the Gemini chat backend
pub struct ChatSession {
    client: reqwest::Client,
    api_key: String,
    model: String,
    system_prompt: String,
    generation: GenerationConfig,
    history: Vec<Content>,
}

impl ChatSession {
    /// Create a fresh session with zero prior turns
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(
        api_key: String,
        model: String,
        system_prompt: String,
        generation: GenerationConfig,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("API key required for chat".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            system_prompt,
            generation,
            history: Vec::new(),
        })
    }

    async fn generate(&self) -> Result<GenerateContentResponse> {
        let system_instruction = (!self.system_prompt.is_empty()).then(|| SystemInstruction {
            parts: vec![BorrowedPart {
                text: &self.system_prompt,
            }],
        });

        let request = GenerateContentRequest {
            contents: &self.history,
            system_instruction,
            generation_config: &self.generation,
            safety_settings: permissive_safety_settings(),
        };

        let url = format!(
            "{GENERATE_URL_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat request failed");
                Error::Chat(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat API error");
            return Err(Error::Chat(format!("chat API error {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Chat(e.to_string()))
    }
}

#[async_trait]
impl Respond for ChatSession {
    async fn send(&mut self, user_text: &str) -> Result<String> {
        self.history.push(Content::user(user_text));

        let response = match self.generate().await {
            Ok(response) => response,
            Err(e) => {
                // The model never saw this turn; keep history consistent
                self.history.pop();
                return Err(e);
            }
        };

        let reply = extract_text(&response).unwrap_or_else(|| {
            tracing::warn!("model returned no usable content");
            FALLBACK_REPLY.to_string()
        });

        self.history.push(Content::model(&reply));
        tracing::debug!(turns = self.history.len(), "chat turn complete");
        Ok(reply)
    }

    fn clear(&mut self) {
        self.history.clear();
    }
}

/// Concatenated text of the first candidate, or `None` if empty or blocked
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let parts = &response.candidates.first()?.content.as_ref()?.parts;
    let text: String = parts.iter().map(|p| p.text.as_str()).collect();
    (!text.is_empty()).then_some(text)
}
