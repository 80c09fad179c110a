//! Voice processing module
//!
//! STT and TTS wrappers over remote speech backends. Microphone capture and
//! audio playback live in the presentation layer, not here.

mod stt;
mod tts;

pub use stt::{SpeechToText, Transcribe};
pub use tts::{Synthesize, TextToSpeech};
