use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dialoguer::Input;
use tracing_subscriber::EnvFilter;

use parley::chat::{ChatSession, Respond as _};
use parley::voice::{SpeechToText, Synthesize as _, TextToSpeech, Transcribe as _};
use parley::{Config, ConversationController, Event, Role, Snapshot};

/// parley - Voice chat client for AI assistants
#[derive(Parser)]
#[command(name = "parley", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start with voice output disabled
    #[arg(long, env = "PARLEY_NO_VOICE")]
    no_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question and print the reply
    Ask {
        /// Question text
        text: String,
    },
    /// Transcribe an audio file (WAV/FLAC) and print the transcript
    Transcribe {
        /// Path to the audio file
        path: PathBuf,
    },
    /// Synthesize text to an MP3 file
    Speak {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
        /// Output path
        #[arg(short, long, default_value = "reply.mp3")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,parley=info",
        1 => "info,parley=debug",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load();

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Ask { text } => ask(&config, &text).await,
            Command::Transcribe { path } => transcribe_file(&config, &path).await,
            Command::Speak { text, out } => speak_to_file(&config, &text, &out).await,
        };
    }

    chat_loop(config, !cli.no_voice).await
}

/// One-shot chat turn without a session history
async fn ask(config: &Config, text: &str) -> anyhow::Result<()> {
    let mut session = ChatSession::new(
        config.api_key.clone(),
        config.chat.model.clone(),
        config.chat.system_prompt.clone(),
        config.chat.generation.clone(),
    )?;

    let reply = session.send(text).await?;
    println!("{reply}");
    Ok(())
}

/// Transcribe a recorded file through the speech backend
async fn transcribe_file(config: &Config, path: &Path) -> anyhow::Result<()> {
    let stt = SpeechToText::new(config.api_key.clone(), config.voice.language.clone())?;
    let audio = std::fs::read(path)?;

    let transcript = stt.transcribe(&audio).await?;
    println!("{transcript}");
    Ok(())
}

/// Synthesize text and write the MP3 to disk
async fn speak_to_file(config: &Config, text: &str, out: &Path) -> anyhow::Result<()> {
    let tts = TextToSpeech::new(
        config.api_key.clone(),
        config.voice.language.clone(),
        config.voice.tts_voice.clone(),
    )?;

    let audio = tts.synthesize(text).await?;
    std::fs::write(out, &audio)?;
    println!("wrote {} bytes to {}", audio.len(), out.display());
    Ok(())
}

const BANNER: &str = "\
parley - chat with an AI assistant

Example questions to try:
  - What should I know about your life story in a few sentences?
  - What's your #1 superpower?
  - What are the top 3 areas you'd like to grow in?
  - What's your name?

Commands: /audio <path>  submit a recording
          /voice on|off  toggle spoken replies
          /clear         start over
          /quit          exit";

/// Interactive conversation loop
async fn chat_loop(config: Config, voice: bool) -> anyhow::Result<()> {
    let recognizer = SpeechToText::new(config.api_key.clone(), config.voice.language.clone())?;
    let session = ChatSession::new(
        config.api_key.clone(),
        config.chat.model.clone(),
        config.chat.system_prompt.clone(),
        config.chat.generation.clone(),
    )?;
    let speaker = TextToSpeech::new(
        config.api_key.clone(),
        config.voice.language.clone(),
        config.voice.tts_voice.clone(),
    )?;

    let mut controller = ConversationController::new(recognizer, session, speaker);
    controller.set_voice_enabled(voice && config.voice.enabled);

    println!("{BANNER}\n");

    loop {
        let line: String = Input::new().with_prompt("you").interact_text()?;
        let line = line.trim().to_string();

        let event = match line.as_str() {
            "/quit" => break,
            "/clear" => Event::Clear,
            "/voice on" => {
                controller.set_voice_enabled(true);
                println!("voice output enabled");
                continue;
            }
            "/voice off" => {
                controller.set_voice_enabled(false);
                println!("voice output disabled");
                continue;
            }
            _ => {
                if let Some(path) = line.strip_prefix("/audio ") {
                    match std::fs::read(path.trim()) {
                        Ok(bytes) => Event::Voice(bytes),
                        Err(e) => {
                            println!("could not read {path}: {e}");
                            continue;
                        }
                    }
                } else {
                    Event::Text(line)
                }
            }
        };

        let snapshot = controller.dispatch(event).await;
        render(&snapshot)?;
    }

    Ok(())
}

/// Print the full log, the latest notice, and where the reply audio landed
fn render(snapshot: &Snapshot) -> anyhow::Result<()> {
    println!();
    for turn in &snapshot.turns {
        match turn.role {
            Role::User => println!("you: {}", turn.content),
            Role::Bot => println!("bot: {}", turn.content),
        }
    }

    if let Some(notice) = &snapshot.notice {
        println!("-- {notice}");
    }

    if let Some(audio) = &snapshot.response_audio {
        let path = std::env::temp_dir().join("parley-reply.mp3");
        std::fs::write(&path, audio)?;
        println!("-- reply audio: {}", path.display());
    }
    println!();

    Ok(())
}
