//! PawnTalk runner - drives the talk flow against JSON character snapshots.
//!
//! ```text
//! pawntalk talk <character.json> [play_log.json]
//! pawntalk ask <prompt...>
//! pawntalk chat <roster.json> [play_log.json]   (reads "user: message" lines from stdin)
//! pawntalk log <subject_id>
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use pawntalk_domain::{CharacterSnapshot, GameTick, PlayLog, PlayLogSnapshot, SubjectId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pawntalk_engine::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    console::{LogNotifier, LogSpeechSink, ManualGameClock, SnapshotRoster},
    history::SqliteHistoryRepo,
    openai::OpenAiClient,
    ports::{ClockPort, IncomingChatMessage},
    settings::SqliteSettingsRepo,
    speech_file::SpeechFileWriter,
};
use pawntalk_engine::use_cases::{talk::TalkOutcome, ChannelRelay};
use pawntalk_engine::{App, HostPorts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawntalk_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        bail!("usage: pawntalk <talk|ask|chat|log> ...");
    };

    let config = EngineConfig::from_env();
    tracing::info!(endpoint = %config.endpoint, db = %config.db_path, "Starting PawnTalk");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let settings_repo = Arc::new(SqliteSettingsRepo::new(&config.db_path, clock.clone()).await?);
    let history_repo = Arc::new(SqliteHistoryRepo::new(&config.db_path, clock).await?);

    let start_tick = std::env::var("PAWNTALK_GAME_TICK")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let game_clock = Arc::new(ManualGameClock::new(GameTick::new(start_tick)));

    let app = App::new(
        Arc::new(OpenAiClient::new(&config.endpoint)),
        settings_repo,
        history_repo,
        HostPorts {
            speech: Arc::new(LogSpeechSink),
            notifier: Arc::new(LogNotifier),
            game_clock,
        },
        config.seed_settings.clone(),
        Some(SpeechFileWriter::new(&config.save_data_dir)),
    );

    app.use_cases.talk_log.load(&config.save_slot).await?;

    match (command, &args[1..]) {
        ("talk", [character, rest @ ..]) => {
            let subject: CharacterSnapshot = read_json(character)?;
            let log = rest.first().map(|p| read_json::<PlayLogSnapshot>(p)).transpose()?;

            let outcome = app
                .use_cases
                .talk
                .make_talk(&subject, log.as_ref().map(|l| l as &dyn PlayLog))
                .await?;
            print_outcome(&outcome);
        }
        ("ask", prompt) if !prompt.is_empty() => {
            let outcome = app.use_cases.talk.ask(&prompt.join(" ")).await?;
            print_outcome(&outcome);
        }
        ("chat", [roster, rest @ ..]) => {
            let snapshots: Vec<CharacterSnapshot> = read_json(roster)?;
            let log = rest
                .first()
                .map(|p| read_json::<PlayLogSnapshot>(p))
                .transpose()?
                .map(|l| Arc::new(l) as Arc<dyn PlayLog>);

            let (tx, relay) = ChannelRelay::channel(32);
            let listener = app.chat_listener(Arc::new(SnapshotRoster::new(snapshots)), log);
            let handle = listener.spawn(Some(relay));

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let (user, message) = line.split_once(':').unwrap_or(("stdin", line.as_str()));
                if tx
                    .send(IncomingChatMessage::new(user.trim(), message.trim()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            drop(tx);
            if let Some(handle) = handle {
                handle.await?;
            }
        }
        ("log", [subject_id]) => {
            let transcript = app
                .use_cases
                .talk_log
                .transcript(&SubjectId::new(subject_id.as_str()), 50)
                .await;
            println!("{transcript}");
            return Ok(());
        }
        _ => bail!("usage: pawntalk <talk|ask|chat|log> ..."),
    }

    app.use_cases.talk_log.save(&config.save_slot).await?;
    Ok(())
}

fn print_outcome(outcome: &TalkOutcome) {
    match outcome {
        TalkOutcome::Spoke { text, .. } | TalkOutcome::Answered { text, .. } => println!("{text}"),
        TalkOutcome::Skipped => println!("(busy)"),
        TalkOutcome::MissingToken => println!("(no API token)"),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
