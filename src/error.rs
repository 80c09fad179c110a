//! Error types for parley

use thiserror::Error;

/// Result type alias for parley operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in parley
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Recognition produced no confident transcript (recoverable, user should retry)
    #[error("could not understand the audio")]
    NotUnderstood,

    /// Speech-to-text backend error
    #[error("STT error: {0}")]
    Stt(String),

    /// Chat backend error
    #[error("chat error: {0}")]
    Chat(String),

    /// Text-to-speech backend error
    #[error("TTS error: {0}")]
    Tts(String),
}
