//! Conversation controller
//!
//! Drives one turn at a time: an input event is processed fully
//! (transcribe, respond, synthesize) before the next is accepted, and every
//! dispatch ends with a render-ready snapshot for the presentation layer.

use crate::Error;
use crate::chat::Respond;
use crate::conversation::{AudioFingerprint, ConversationState, Turn};
use crate::voice::{Synthesize, Transcribe};

/// Shown when recognition produced no usable transcript
const NOT_UNDERSTOOD_NOTICE: &str =
    "Could not understand the audio. Please try again or use text input.";

/// Where the controller is within the current turn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    AwaitingTranscription,
    AwaitingModelResponse,
    AwaitingSynthesis,
}

/// External triggers, one per dispatch
#[derive(Clone, Debug)]
pub enum Event {
    /// A recording submitted from the capture widget
    Voice(Vec<u8>),
    /// Typed text, explicitly submitted
    Text(String),
    /// Reset the conversation
    Clear,
}

/// Render-ready view of the conversation after an event
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    /// Full chat log in chronological order
    pub turns: Vec<Turn>,
    /// Synthesized audio for the latest bot turn, if any
    pub response_audio: Option<Vec<u8>>,
    /// Status line to surface alongside the log
    pub notice: Option<String>,
}

/// Orchestrates the transcriber, chat session, and speaker for one
/// conversation
pub struct ConversationController<R, C, S> {
    recognizer: R,
    chat: C,
    speaker: S,
    conversation: ConversationState,
    state: ControllerState,
}

impl<R, C, S> ConversationController<R, C, S>
where
    R: Transcribe,
    C: Respond,
    S: Synthesize,
{
    pub fn new(recognizer: R, chat: C, speaker: S) -> Self {
        Self {
            recognizer,
            chat,
            speaker,
            conversation: ConversationState::new(),
            state: ControllerState::default(),
        }
    }

    /// Current position in the turn pipeline; `Idle` between events
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn voice_enabled(&self) -> bool {
        self.conversation.voice_enabled
    }

    /// Toggle synthesis of bot turns; takes effect from the next turn phase
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.conversation.voice_enabled = enabled;
    }

    /// Process one event to completion and return the new snapshot
    ///
    /// Never fails: backend errors become user-visible notices or
    /// placeholder turns, and the controller returns to `Idle`.
    pub async fn dispatch(&mut self, event: Event) -> Snapshot {
        match event {
            Event::Voice(audio) => self.on_voice(&audio).await,
            Event::Text(text) => self.on_text(&text).await,
            Event::Clear => self.on_clear(),
        }
    }

    async fn on_voice(&mut self, audio: &[u8]) -> Snapshot {
        let fingerprint = AudioFingerprint::of(audio);
        if self.conversation.pending_audio == Some(fingerprint) {
            tracing::debug!("duplicate recording ignored");
            return self.render(None);
        }
        self.conversation.pending_audio = Some(fingerprint);

        self.state = ControllerState::AwaitingTranscription;
        let transcript = match self.recognizer.transcribe(audio).await {
            // A transcript of silence is treated the same as no transcript
            Ok(text) if text.trim().is_empty() => {
                return self.abort_turn(NOT_UNDERSTOOD_NOTICE.to_string());
            }
            Ok(text) => text,
            Err(Error::NotUnderstood) => {
                return self.abort_turn(NOT_UNDERSTOOD_NOTICE.to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "transcription failed");
                return self.abort_turn(format!("Speech recognition error: {e}"));
            }
        };

        let echo = format!("You said: {transcript}");
        self.conversation.log.push(Turn::user(&transcript));

        let synth_notice = self.complete_turn(&transcript).await;
        let notice = match synth_notice {
            Some(n) => format!("{echo}\n{n}"),
            None => echo,
        };
        self.render(Some(notice))
    }

    async fn on_text(&mut self, text: &str) -> Snapshot {
        let text = text.trim();
        if text.is_empty() {
            return self.render(None);
        }

        self.conversation.log.push(Turn::user(text));
        let notice = self.complete_turn(text).await;
        self.render(notice)
    }

    /// Model-response and synthesis phases for a just-appended user turn
    ///
    /// A bot turn is always appended, as a placeholder embedding the
    /// failure reason when the chat call errors. Returns a notice when
    /// synthesis failed.
    async fn complete_turn(&mut self, user_text: &str) -> Option<String> {
        self.state = ControllerState::AwaitingModelResponse;
        let reply = match self.chat.send(user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "chat backend failed");
                format!("Sorry, I had trouble processing that. Error: {e}")
            }
        };
        self.conversation.log.push(Turn::bot(&reply));

        let mut notice = None;
        if self.conversation.voice_enabled {
            self.state = ControllerState::AwaitingSynthesis;
            match self.speaker.synthesize(&reply).await {
                Ok(audio) => self.conversation.last_response_audio = Some(audio),
                Err(e) => {
                    tracing::warn!(error = %e, "speech synthesis failed");
                    self.conversation.last_response_audio = None;
                    notice = Some(format!("Voice output unavailable: {e}"));
                }
            }
        } else {
            self.conversation.last_response_audio = None;
        }

        self.state = ControllerState::Idle;
        notice
    }

    fn abort_turn(&mut self, notice: String) -> Snapshot {
        self.state = ControllerState::Idle;
        self.render(Some(notice))
    }

    fn on_clear(&mut self) -> Snapshot {
        self.conversation.clear();
        self.chat.clear();
        self.state = ControllerState::Idle;
        tracing::info!("conversation cleared");
        self.render(None)
    }

    fn render(&self, notice: Option<String>) -> Snapshot {
        Snapshot {
            turns: self.conversation.log.clone(),
            response_audio: self.conversation.last_response_audio.clone(),
            notice,
        }
    }
}
