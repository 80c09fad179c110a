//! parley - Voice chat client for AI assistants
//!
//! This library provides the core functionality for the parley client:
//! - Voice processing (speech recognition, speech synthesis)
//! - Chat sessions against the Gemini generative API
//! - The per-turn conversation controller
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Presentation                        │
//! │    recorded audio  │  typed text  │  clear          │
//! └────────────────────┬────────────────────────────────┘
//!                      │ events            ▲ snapshots
//! ┌────────────────────▼────────────────────────────────┐
//! │            ConversationController                    │
//! │   Transcriber  →  ChatSession  →  Speaker           │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              Remote backends                         │
//! │   speech:recognize │ generateContent │ text:synthesize
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod chat;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod voice;

pub use chat::{ChatSession, GenerationConfig, Respond, FALLBACK_REPLY};
pub use config::Config;
pub use controller::{ControllerState, ConversationController, Event, Snapshot};
pub use conversation::{AudioFingerprint, ConversationState, Role, Turn};
pub use error::{Error, Result};
pub use voice::{SpeechToText, Synthesize, TextToSpeech, Transcribe};
