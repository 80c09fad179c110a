//! Text-to-speech (TTS) processing

use async_trait::async_trait;
use base64::Engine as _;

use crate::{Error, Result};

const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Normal speaking rate; the voice and rate are fixed for the session
const SPEAKING_RATE: f64 = 1.0;

/// Synthesizes a spoken rendition of bot text
#[async_trait]
pub trait Synthesize {
    /// Synthesize text to audio bytes (MP3)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tts`] if the remote call fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Synthesizes speech from text via the Google Text-to-Speech API
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    language: String,
    voice: String,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, language: String, voice: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "API key required for speech synthesis".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            language,
            voice,
        })
    }
}

#[async_trait]
impl Synthesize for TextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SynthesizeRequest<'a> {
            input: SynthesisInput<'a>,
            voice: VoiceSelection<'a>,
            #[serde(rename = "audioConfig")]
            audio_config: AudioConfig<'a>,
        }

        #[derive(serde::Serialize)]
        struct SynthesisInput<'a> {
            text: &'a str,
        }

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct VoiceSelection<'a> {
            language_code: &'a str,
            name: &'a str,
        }

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct AudioConfig<'a> {
            audio_encoding: &'a str,
            speaking_rate: f64,
        }

        #[derive(serde::Deserialize)]
        struct SynthesizeResponse {
            #[serde(rename = "audioContent")]
            audio_content: String,
        }

        tracing::debug!(chars = text.len(), "starting synthesis");

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.language,
                name: &self.voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: SPEAKING_RATE,
            },
        };

        let response = self
            .client
            .post(format!("{SYNTHESIZE_URL}?key={}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("TTS API error {status}: {body}")));
        }

        let result: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| Error::Tts(e.to_string()))?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(result.audio_content)
            .map_err(|e| Error::Tts(format!("invalid audio content: {e}")))?;

        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio)
    }
}
