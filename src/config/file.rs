//! TOML configuration file loading
//!
//! Supports `~/.config/omni/parley/config.toml` as a persistent config
//! source. All fields are optional — the file is a partial overlay on top
//! of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ParleyConfigFile {
    /// API key for the Google speech and chat backends
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat configuration
    #[serde(default)]
    pub chat: ChatFileConfig,

    /// Voice configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,
}

/// Chat-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct ChatFileConfig {
    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: Option<String>,

    /// System prompt sent with every request
    pub system_prompt: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f64>,

    /// Nucleus sampling threshold
    pub top_p: Option<f64>,

    /// Top-k sampling cutoff
    pub top_k: Option<u32>,

    /// Maximum output tokens per reply
    pub max_output_tokens: Option<u32>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice output
    pub enabled: Option<bool>,

    /// Recognition/synthesis language code (e.g. "en-US")
    pub language: Option<String>,

    /// TTS voice name (e.g. "en-US-Standard-C")
    pub tts_voice: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ParleyConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ParleyConfigFile {
    let Some(path) = config_file_path() else {
        return ParleyConfigFile::default();
    };

    if !path.exists() {
        return ParleyConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ParleyConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ParleyConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/omni/parley/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| {
        d.config_dir()
            .join("omni")
            .join("parley")
            .join("config.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses_to_defaults() {
        let config: ParleyConfigFile = toml::from_str("").unwrap();
        assert!(config.api_key.is_none());
        assert!(config.chat.model.is_none());
        assert!(config.voice.enabled.is_none());
    }

    #[test]
    fn partial_overlay_parses() {
        let config: ParleyConfigFile = toml::from_str(
            r#"
            [chat]
            model = "gemini-2.5-flash"
            temperature = 0.7

            [voice]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.chat.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(config.chat.temperature, Some(0.7));
        assert_eq!(config.voice.enabled, Some(false));
        assert!(config.voice.language.is_none());
    }
}
