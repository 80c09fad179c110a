//! Configuration management for parley

pub mod file;

use crate::chat::GenerationConfig;

/// Default chat model, matching the hosted Gemini flash tier
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default recognition/synthesis language
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default TTS voice name
pub const DEFAULT_TTS_VOICE: &str = "en-US-Standard-C";

/// Default system prompt for the chat session
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are having a friendly, casual conversation. Answer questions in a warm, \
authentic way as if you're chatting with a friend.

When answering personal questions:
- Be conversational and natural, using contractions and everyday language
- Share thoughtful, specific responses rather than generic ones
- Show personality through your word choices and examples
- Keep responses brief (2-4 sentences) unless asked for more detail
- Be honest and relatable

For questions about life, growth, strengths, or experiences, give genuine, \
thoughtful answers that feel personal and real.";

/// parley configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API key shared by the speech recognition, chat, and synthesis backends
    pub api_key: String,

    /// Chat session configuration
    pub chat: ChatConfig,

    /// Voice configuration
    pub voice: VoiceConfig,
}

/// Chat session configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Model identifier
    pub model: String,

    /// System prompt sent with every request
    pub system_prompt: String,

    /// Sampling parameters
    pub generation: GenerationConfig,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable voice output
    pub enabled: bool,

    /// Recognition/synthesis language code
    pub language: String,

    /// TTS voice name
    pub tts_voice: String,
}

impl Config {
    /// Assemble configuration from defaults, the TOML config file, and
    /// environment variable overrides (env > toml > default)
    #[must_use]
    pub fn load() -> Self {
        let fc = file::load_config_file();
        Self::from_overlay(fc)
    }

    fn from_overlay(fc: file::ParleyConfigFile) -> Self {
        let defaults = GenerationConfig::default();

        let api_key = std::env::var("PARLEY_API_KEY")
            .ok()
            .or(fc.api_key)
            .unwrap_or_default();

        let chat = ChatConfig {
            model: std::env::var("PARLEY_MODEL")
                .ok()
                .or(fc.chat.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: fc
                .chat
                .system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            generation: GenerationConfig {
                temperature: fc.chat.temperature.unwrap_or(defaults.temperature),
                top_p: fc.chat.top_p.unwrap_or(defaults.top_p),
                top_k: fc.chat.top_k.unwrap_or(defaults.top_k),
                max_output_tokens: fc
                    .chat
                    .max_output_tokens
                    .unwrap_or(defaults.max_output_tokens),
            },
        };

        let voice = VoiceConfig {
            enabled: fc.voice.enabled.unwrap_or(true),
            language: std::env::var("PARLEY_LANGUAGE")
                .ok()
                .or(fc.voice.language)
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            tts_voice: fc
                .voice
                .tts_voice
                .unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
        };

        Self {
            api_key,
            chat,
            voice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_defaults_fill_gaps() {
        let config = Config::from_overlay(file::ParleyConfigFile::default());

        assert_eq!(config.chat.model, DEFAULT_MODEL);
        assert_eq!(config.chat.generation.temperature, 0.9);
        assert_eq!(config.chat.generation.max_output_tokens, 300);
        assert!(config.voice.enabled);
        assert_eq!(config.voice.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn overlay_values_take_precedence_over_defaults() {
        let fc: file::ParleyConfigFile = toml::from_str(
            r#"
            [chat]
            max_output_tokens = 512

            [voice]
            enabled = false
            tts_voice = "en-GB-Standard-A"
            "#,
        )
        .unwrap();

        let config = Config::from_overlay(fc);
        assert_eq!(config.chat.generation.max_output_tokens, 512);
        assert!(!config.voice.enabled);
        assert_eq!(config.voice.tts_voice, "en-GB-Standard-A");
        // Untouched fields keep their defaults
        assert_eq!(config.chat.generation.top_k, 40);
    }
}
