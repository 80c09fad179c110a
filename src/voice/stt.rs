//! Speech-to-text (STT) processing

use async_trait::async_trait;
use base64::Engine as _;

use crate::{Error, Result};

const RECOGNIZE_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Request body for the Google Speech recognize API
#[derive(serde::Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    language_code: &'a str,
}

#[derive(serde::Serialize)]
struct RecognitionAudio {
    /// Base64-encoded audio bytes in a lossless container (WAV/FLAC)
    content: String,
}

/// Response from the Google Speech recognize API
///
/// `results` is absent entirely when no speech could be decoded.
#[derive(serde::Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(serde::Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(serde::Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

/// Converts recorded audio to text
#[async_trait]
pub trait Transcribe {
    /// Transcribe audio bytes to text
    ///
    /// The transcript may be empty if the recording was silence. Returns
    /// [`Error::NotUnderstood`] when the backend decoded no speech at all,
    /// and [`Error::Stt`] when the remote call itself failed.
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Transcribes speech to text via the Google Speech API
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    language: String,
}

impl SpeechToText {
    /// Create a new STT instance
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, language: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "API key required for speech recognition".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            language,
        })
    }
}

#[async_trait]
impl Transcribe for SpeechToText {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let request = RecognizeRequest {
            config: RecognitionConfig {
                language_code: &self.language,
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        };

        let response = self
            .client
            .post(format!("{RECOGNIZE_URL}?key={}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "recognize request failed");
                Error::Stt(e.to_string())
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Speech API error");
            return Err(Error::Stt(format!("Speech API error {status}: {body}")));
        }

        let result: RecognizeResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse recognize response");
            Error::Stt(e.to_string())
        })?;

        let transcript = best_transcript(&result).ok_or(Error::NotUnderstood)?;

        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}

/// Best alternative of the first result, or `None` if no speech was decoded
fn best_transcript(response: &RecognizeResponse) -> Option<String> {
    response
        .results
        .first()
        .and_then(|r| r.alternatives.first())
        .map(|a| a.transcript.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transcript_from_first_alternative() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{"results":[{"alternatives":[
                {"transcript":"what's your name","confidence":0.92},
                {"transcript":"what is your name"}
            ]}]}"#,
        )
        .unwrap();

        assert_eq!(
            best_transcript(&response).as_deref(),
            Some("what's your name")
        );
    }

    #[test]
    fn missing_results_means_no_speech() {
        let response: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert!(best_transcript(&response).is_none());
    }

    #[test]
    fn empty_alternatives_means_no_speech() {
        let response: RecognizeResponse =
            serde_json::from_str(r#"{"results":[{"alternatives":[]}]}"#).unwrap();
        assert!(best_transcript(&response).is_none());
    }

    #[test]
    fn request_body_carries_language_and_content() {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                language_code: "en-US",
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(b"audio"),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["config"]["languageCode"], "en-US");
        assert_eq!(json["audio"]["content"], "YXVkaW8=");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(SpeechToText::new(String::new(), "en-US".to_string()).is_err());
    }
}
