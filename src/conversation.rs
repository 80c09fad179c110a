//! Conversation state: turn log, audio dedup fingerprint, response audio

use sha2::{Digest, Sha256};

/// Who produced a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One message in the conversation log
///
/// Immutable once appended; the log is append-only and never reordered.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

/// Content fingerprint of a captured recording
///
/// A re-rendering presentation layer may hand the controller the same
/// recording more than once; comparing fingerprints suppresses the
/// duplicate without holding onto the audio itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioFingerprint([u8; 32]);

impl AudioFingerprint {
    #[must_use]
    pub fn of(audio: &[u8]) -> Self {
        Self(Sha256::digest(audio).into())
    }
}

/// All mutable state owned by the active conversation
///
/// Touched only by the controller; cleared as a whole on a clear event.
#[derive(Debug, Default)]
pub struct ConversationState {
    /// Ordered, append-only chat log
    pub log: Vec<Turn>,

    /// Fingerprint of the most recently processed recording
    pub pending_audio: Option<AudioFingerprint>,

    /// Synthesized audio for the latest bot turn, if any
    pub last_response_audio: Option<Vec<u8>>,

    /// Whether bot turns should be synthesized to speech
    pub voice_enabled: bool,
}

impl ConversationState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            voice_enabled: true,
            ..Self::default()
        }
    }

    /// Reset to a fresh conversation, discarding log and audio state
    pub fn clear(&mut self) {
        self.log.clear();
        self.pending_audio = None;
        self.last_response_audio = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_matches_identical_content() {
        let a = AudioFingerprint::of(b"RIFF....WAVE");
        let b = AudioFingerprint::of(b"RIFF....WAVE");
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_differs_for_different_content() {
        let a = AudioFingerprint::of(b"first recording");
        let b = AudioFingerprint::of(b"second recording");
        assert_ne!(a, b);
    }

    #[test]
    fn clear_resets_everything_but_voice_toggle() {
        let mut state = ConversationState::new();
        state.log.push(Turn::user("hi"));
        state.log.push(Turn::bot("hello"));
        state.pending_audio = Some(AudioFingerprint::of(b"audio"));
        state.last_response_audio = Some(vec![1, 2, 3]);
        state.voice_enabled = false;

        state.clear();

        assert!(state.log.is_empty());
        assert!(state.pending_audio.is_none());
        assert!(state.last_response_audio.is_none());
        assert!(!state.voice_enabled);
    }
}
