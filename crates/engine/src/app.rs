//! Application state and composition.

use std::sync::Arc;

use pawntalk_domain::{DialogueHistory, PlayLog, TalkSettings};
use tokio::sync::RwLock;

use crate::infrastructure::{
    clock::SystemRandom,
    ports::{
        ColonistRoster, CompletionPort, GameClock, HistoryRepo, Notifier, RandomPort,
        SettingsRepo, SpeechSink,
    },
    speech_file::SpeechFileWriter,
};
use crate::use_cases;
use crate::use_cases::settings::SettingsError;

/// Host-side ports the talk feature displays through.
pub struct HostPorts {
    pub speech: Arc<dyn SpeechSink>,
    pub notifier: Arc<dyn Notifier>,
    pub game_clock: Arc<dyn GameClock>,
}

/// Main application state.
pub struct App {
    pub use_cases: UseCases,
    pub history: Arc<RwLock<DialogueHistory>>,
    notifier: Arc<dyn Notifier>,
    random: Arc<dyn RandomPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub talk: Arc<use_cases::TalkService>,
    pub talk_log: Arc<use_cases::TalkLog>,
    pub settings: Arc<use_cases::SettingsOps>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        completion: Arc<dyn CompletionPort>,
        settings_repo: Arc<dyn SettingsRepo>,
        history_repo: Arc<dyn HistoryRepo>,
        host: HostPorts,
        seed_settings: TalkSettings,
        speech_files: Option<SpeechFileWriter>,
    ) -> Self {
        let history = Arc::new(RwLock::new(DialogueHistory::new()));

        let mut talk = use_cases::TalkService::new(
            completion,
            settings_repo.clone(),
            host.speech,
            host.notifier.clone(),
            host.game_clock,
            history.clone(),
            seed_settings.clone(),
        );
        if let Some(writer) = speech_files {
            talk = talk.with_speech_files(writer);
        }

        let use_cases = UseCases {
            talk: Arc::new(talk),
            talk_log: Arc::new(use_cases::TalkLog::new(history.clone(), history_repo)),
            settings: Arc::new(use_cases::SettingsOps::new(settings_repo, seed_settings)),
        };

        Self {
            use_cases,
            history,
            notifier: host.notifier,
            random: Arc::new(SystemRandom::new()),
        }
    }

    /// Listener for `!talk` chat commands, sharing the talk busy guard.
    pub fn chat_listener(
        &self,
        roster: Arc<dyn ColonistRoster>,
        play_log: Option<Arc<dyn PlayLog>>,
    ) -> use_cases::ChatCommandListener {
        use_cases::ChatCommandListener::new(
            self.use_cases.talk.clone(),
            roster,
            play_log,
            self.notifier.clone(),
            self.random.clone(),
        )
    }

    pub async fn token_editor(&self) -> Result<use_cases::TokenEditor, SettingsError> {
        use_cases::TokenEditor::open(self.use_cases.settings.clone(), self.notifier.clone()).await
    }
}
