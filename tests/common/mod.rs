//! Shared test utilities
//!
//! Scripted fake backends so controller tests run without network access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use parley::chat::Respond;
use parley::voice::{Synthesize, Transcribe};
use parley::{ConversationController, Error, Result};

/// Scripted transcription outcome
pub enum SttScript {
    Text(&'static str),
    NotUnderstood,
    Backend(&'static str),
}

/// Fake transcriber that replays a script, then echoes a default transcript
pub struct FakeTranscriber {
    script: Mutex<VecDeque<SttScript>>,
    calls: Arc<AtomicUsize>,
}

impl FakeTranscriber {
    pub fn with_script(outcomes: Vec<SttScript>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                script: Mutex::new(outcomes.into()),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl Transcribe for FakeTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(SttScript::Text(t)) => Ok(t.to_string()),
            Some(SttScript::NotUnderstood) => Err(Error::NotUnderstood),
            Some(SttScript::Backend(msg)) => Err(Error::Stt(msg.to_string())),
            None => Ok("scripted transcript".to_string()),
        }
    }
}

/// Scripted chat outcome
pub enum ChatScript {
    Reply(&'static str),
    Fail(&'static str),
}

/// Fake chat backend; unscripted sends echo the user text
pub struct FakeChat {
    script: Mutex<VecDeque<ChatScript>>,
    sent: Arc<Mutex<Vec<String>>>,
    clears: Arc<AtomicUsize>,
}

/// Handles for inspecting a [`FakeChat`] after it moves into the controller
pub struct ChatProbe {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub clears: Arc<AtomicUsize>,
}

impl FakeChat {
    pub fn with_script(outcomes: Vec<ChatScript>) -> (Self, ChatProbe) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let clears = Arc::new(AtomicUsize::new(0));
        (
            Self {
                script: Mutex::new(outcomes.into()),
                sent: Arc::clone(&sent),
                clears: Arc::clone(&clears),
            },
            ChatProbe { sent, clears },
        )
    }
}

#[async_trait]
impl Respond for FakeChat {
    async fn send(&mut self, user_text: &str) -> Result<String> {
        self.sent.lock().unwrap().push(user_text.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some(ChatScript::Reply(r)) => Ok(r.to_string()),
            Some(ChatScript::Fail(msg)) => Err(Error::Chat(msg.to_string())),
            None => Ok(format!("you asked: {user_text}")),
        }
    }

    fn clear(&mut self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fake speaker returning the text bytes as "audio", or failing every call
pub struct FakeSpeaker {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeSpeaker {
    pub fn working() -> (Self, Arc<AtomicUsize>) {
        Self::build(false)
    }

    pub fn failing() -> (Self, Arc<AtomicUsize>) {
        Self::build(true)
    }

    fn build(fail: bool) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                fail,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl Synthesize for FakeSpeaker {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Tts("synthesis unavailable".to_string()));
        }
        Ok(text.as_bytes().to_vec())
    }
}

pub type FakeController = ConversationController<FakeTranscriber, FakeChat, FakeSpeaker>;

/// Controller wired to default fakes (echoing chat, working speaker)
pub fn controller() -> FakeController {
    let (stt, _) = FakeTranscriber::with_script(Vec::new());
    let (chat, _) = FakeChat::with_script(Vec::new());
    let (tts, _) = FakeSpeaker::working();
    ConversationController::new(stt, chat, tts)
}
