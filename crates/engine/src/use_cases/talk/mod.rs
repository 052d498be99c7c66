//! Talk use cases: make a character speak, or ask a free-form question.
//!
//! All trigger paths go through [`TalkService`] and share one [`BusyFlag`],
//! so at most one completion is in flight at a time.

mod busy;
mod speech;

pub use busy::{BusyFlag, BusyGuard};
pub use speech::{bubble_text, normalize_reply, play_log_line, BUBBLE_MAX_CHARS, EMPTY_REPLY};

use std::sync::Arc;
use std::time::Duration;

use pawntalk_domain::{
    DialogueEntry, DialogueHistory, PlayLog, SubjectId, SubjectView, TalkRequestId, TalkSettings,
};
use tokio::sync::RwLock;

use crate::infrastructure::openai::CompletionRequest;
use crate::infrastructure::ports::{
    CompletionPort, CompletionReply, GameClock, LlmError, NoticeKind, Notifier, SettingsRepo,
    SpeechSink,
};
use crate::infrastructure::speech_file::SpeechFileWriter;
use crate::use_cases::prompt::PromptAssembler;

/// Notice shown when no API token is configured.
pub const MISSING_TOKEN_NOTICE: &str = "API token is empty. Set it in the mod settings.";

/// Notice shown when the completion worker dies.
pub const WORKER_FAILED_NOTICE: &str = "Completion call failed. Check logs.";

/// Result of one talk trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum TalkOutcome {
    /// A line was shown for the subject
    Spoke {
        request_id: TalkRequestId,
        subject_id: SubjectId,
        /// Text as displayed, including failure sentinels
        text: String,
        reply: CompletionReply,
        /// Whether the line was added to the dialogue history
        recorded: bool,
    },
    /// Free-form question answered
    Answered { text: String, reply: CompletionReply },
    /// Another call was in flight; nothing happened
    Skipped,
    /// No API token configured; the user was notified
    MissingToken,
}

#[derive(Debug, thiserror::Error)]
pub enum TalkError {
    #[error("Completion worker failed: {0}")]
    Worker(String),
}

pub struct TalkService {
    completion: Arc<dyn CompletionPort>,
    settings: Arc<dyn SettingsRepo>,
    speech: Arc<dyn SpeechSink>,
    notifier: Arc<dyn Notifier>,
    game_clock: Arc<dyn GameClock>,
    history: Arc<RwLock<DialogueHistory>>,
    seed_settings: TalkSettings,
    speech_files: Option<SpeechFileWriter>,
    busy: BusyFlag,
}

impl TalkService {
    pub fn new(
        completion: Arc<dyn CompletionPort>,
        settings: Arc<dyn SettingsRepo>,
        speech: Arc<dyn SpeechSink>,
        notifier: Arc<dyn Notifier>,
        game_clock: Arc<dyn GameClock>,
        history: Arc<RwLock<DialogueHistory>>,
        seed_settings: TalkSettings,
    ) -> Self {
        Self {
            completion,
            settings,
            speech,
            notifier,
            game_clock,
            history,
            seed_settings,
            speech_files: None,
            busy: BusyFlag::new(),
        }
    }

    pub fn with_speech_files(mut self, writer: SpeechFileWriter) -> Self {
        self.speech_files = Some(writer);
        self
    }

    pub fn busy_flag(&self) -> &BusyFlag {
        &self.busy
    }

    /// Have `subject` say one generated line.
    pub async fn make_talk(
        &self,
        subject: &dyn SubjectView,
        log: Option<&dyn PlayLog>,
    ) -> Result<TalkOutcome, TalkError> {
        let Some(guard) = self.busy.try_acquire() else {
            tracing::debug!(subject = %subject.id(), "Talk already in flight, trigger dropped");
            return Ok(TalkOutcome::Skipped);
        };

        let request_id = TalkRequestId::new();
        let subject_id = subject.id();
        let name = subject.label();

        let settings = self.current_settings().await;
        if settings.api_token.is_empty() {
            self.notifier.notify(MISSING_TOKEN_NOTICE, NoticeKind::Reject);
            return Ok(TalkOutcome::MissingToken);
        }

        let prompt =
            PromptAssembler::with_max_chars(settings.max_prompt_chars).assemble(Some(subject), log);

        tracing::info!(
            request_id = %request_id,
            subject = %subject_id,
            prompt_chars = prompt.chars().count(),
            "Requesting speech"
        );

        let (reply, _guard) = match self.complete(&settings, prompt, guard).await? {
            Some(done) => done,
            None => return Ok(TalkOutcome::MissingToken),
        };

        let text = match &reply {
            CompletionReply::Text { text, .. } => normalize_reply(text),
            other => other.display_text(),
        };

        if let Err(e) = self.speech.show_speech(&subject_id, &bubble_text(&text)) {
            tracing::warn!(error = %e, subject = %subject_id, "Failed to show speech bubble");
        }
        if let Err(e) = self
            .speech
            .add_play_log(&subject_id, &play_log_line(&name, &text))
        {
            tracing::warn!(error = %e, subject = %subject_id, "Failed to add play log entry");
        }

        let recorded = match reply.text().map(str::trim) {
            Some(line) if !line.is_empty() => {
                let tick = self.game_clock.current_tick();
                self.history
                    .write()
                    .await
                    .push(DialogueEntry::new(subject_id.clone(), line, tick))
            }
            _ => false,
        };

        if settings.write_speech_files {
            if let Some(writer) = &self.speech_files {
                writer.write(&name, &text).await;
            }
        }

        tracing::info!(
            request_id = %request_id,
            subject = %subject_id,
            recorded,
            failed = reply.is_failure(),
            "Speech delivered"
        );

        Ok(TalkOutcome::Spoke {
            request_id,
            subject_id,
            text,
            reply,
            recorded,
        })
    }

    /// Send `prompt` as-is and return the reply text.
    pub async fn ask(&self, prompt: &str) -> Result<TalkOutcome, TalkError> {
        let Some(guard) = self.busy.try_acquire() else {
            return Ok(TalkOutcome::Skipped);
        };

        let settings = self.current_settings().await;
        if settings.api_token.is_empty() {
            self.notifier.notify(MISSING_TOKEN_NOTICE, NoticeKind::Reject);
            return Ok(TalkOutcome::MissingToken);
        }

        let (reply, _guard) = match self.complete(&settings, prompt.to_string(), guard).await? {
            Some(done) => done,
            None => return Ok(TalkOutcome::MissingToken),
        };

        Ok(TalkOutcome::Answered {
            text: reply.display_text(),
            reply,
        })
    }

    /// Stored settings over the process defaults. Store failures fall back
    /// to the defaults.
    async fn current_settings(&self) -> TalkSettings {
        match self.settings.get().await {
            Ok(Some(stored)) => stored.merged_over(&self.seed_settings),
            Ok(None) => self.seed_settings.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load talk settings, using defaults");
                self.seed_settings.clone()
            }
        }
    }

    /// Run one completion on a worker task. `None` when the client rejected
    /// the token.
    ///
    /// The worker holds `guard` until the call returns and hands it back with
    /// the reply, so the flag stays set even if the caller stops waiting.
    async fn complete(
        &self,
        settings: &TalkSettings,
        prompt: String,
        guard: BusyGuard,
    ) -> Result<Option<(CompletionReply, BusyGuard)>, TalkError> {
        let body = CompletionRequest::new(settings.model.clone(), prompt)
            .with_temperature(settings.temperature)
            .to_body();
        let token = settings.api_token.reveal().to_string();
        let timeout = Duration::from_millis(settings.timeout_ms);
        let completion = Arc::clone(&self.completion);

        let joined = tokio::spawn(async move {
            let result = completion.post_completion(&token, body, timeout).await;
            (result, guard)
        })
        .await;

        match joined {
            Ok((Ok(reply), guard)) => Ok(Some((reply, guard))),
            Ok((Err(LlmError::MissingToken), _)) => {
                self.notifier.notify(MISSING_TOKEN_NOTICE, NoticeKind::Reject);
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, "Completion worker failed");
                self.notifier.notify(WORKER_FAILED_NOTICE, NoticeKind::Reject);
                Err(TalkError::Worker(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pawntalk_domain::{CharacterSnapshot, GameTick, SecretToken};
    use tempfile::TempDir;
    use tokio::sync::Notify;

    use crate::infrastructure::ports::{
        ExtractionSource, MockCompletionPort, MockGameClock, MockNotifier, MockSettingsRepo,
        MockSpeechSink,
    };

    fn settings_with_token(token: &str) -> TalkSettings {
        TalkSettings {
            api_token: SecretToken::new(token),
            ..TalkSettings::default()
        }
    }

    fn stored_settings(settings: TalkSettings) -> MockSettingsRepo {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get()
            .returning(move || Ok(Some(settings.clone())));
        repo
    }

    fn quiet_speech() -> MockSpeechSink {
        let mut speech = MockSpeechSink::new();
        speech.expect_show_speech().returning(|_, _| Ok(()));
        speech.expect_add_play_log().returning(|_, _| Ok(()));
        speech
    }

    fn clock_at(tick: u64) -> MockGameClock {
        let mut clock = MockGameClock::new();
        clock.expect_current_tick().return_const(GameTick::new(tick));
        clock
    }

    fn text_reply(text: &str) -> CompletionReply {
        CompletionReply::Text {
            text: text.into(),
            source: ExtractionSource::Structured,
        }
    }

    fn service(
        completion: impl CompletionPort + 'static,
        settings: MockSettingsRepo,
        speech: MockSpeechSink,
        notifier: MockNotifier,
        history: Arc<RwLock<DialogueHistory>>,
    ) -> TalkService {
        TalkService::new(
            Arc::new(completion),
            Arc::new(settings),
            Arc::new(speech),
            Arc::new(notifier),
            Arc::new(clock_at(120_000)),
            history,
            TalkSettings::default(),
        )
    }

    #[tokio::test]
    async fn speaks_records_and_displays_reply() {
        let mut completion = MockCompletionPort::new();
        completion
            .expect_post_completion()
            .withf(|token, body, timeout| {
                token == "sk-test"
                    && body.contains("Make \\\"Tynan\\\" say something appropriate.")
                    && *timeout == Duration::from_millis(30_000)
            })
            .times(1)
            .returning(|_, _, _| Ok(text_reply("  I need a nap.  ")));

        let mut speech = MockSpeechSink::new();
        speech
            .expect_show_speech()
            .withf(|id, text| id.as_str() == "1" && text == "I need a nap.")
            .times(1)
            .returning(|_, _| Ok(()));
        speech
            .expect_add_play_log()
            .withf(|_, line| line == "Tynan: I need a nap.")
            .times(1)
            .returning(|_, _| Ok(()));

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            speech,
            MockNotifier::new(),
            history.clone(),
        );

        let subject = CharacterSnapshot::named("1", "Tynan");
        let outcome = service.make_talk(&subject, None).await.unwrap();

        match outcome {
            TalkOutcome::Spoke { text, recorded, .. } => {
                assert_eq!(text, "I need a nap.");
                assert!(recorded);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let history = history.read().await;
        let entries = history.for_subject(&SubjectId::new("1"), 50);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "I need a nap.");
        assert_eq!(entries[0].tick, GameTick::new(120_000));
        assert!(!service.busy_flag().is_busy());
    }

    #[tokio::test]
    async fn missing_token_notifies_without_calling_endpoint() {
        let mut completion = MockCompletionPort::new();
        completion.expect_post_completion().times(0);

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|message, kind| message == MISSING_TOKEN_NOTICE && *kind == NoticeKind::Reject)
            .times(1)
            .return_const(());

        let mut settings = MockSettingsRepo::new();
        settings.expect_get().returning(|| Ok(None));

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = service(
            completion,
            settings,
            MockSpeechSink::new(),
            notifier,
            history.clone(),
        );

        let subject = CharacterSnapshot::named("1", "Tynan");
        let outcome = service.make_talk(&subject, None).await.unwrap();

        assert_eq!(outcome, TalkOutcome::MissingToken);
        assert!(history.read().await.is_empty());
        assert!(!service.busy_flag().is_busy());
    }

    #[tokio::test]
    async fn failed_reply_is_shown_but_not_recorded() {
        let mut completion = MockCompletionPort::new();
        completion.expect_post_completion().returning(|_, _, _| {
            Ok(CompletionReply::Failed {
                status: Some(500),
                body: "upstream down".into(),
            })
        });

        let mut speech = MockSpeechSink::new();
        speech
            .expect_show_speech()
            .withf(|_, text| text == "Error: 500 upstream down")
            .times(1)
            .returning(|_, _| Ok(()));
        speech.expect_add_play_log().returning(|_, _| Ok(()));

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            speech,
            MockNotifier::new(),
            history.clone(),
        );

        let subject = CharacterSnapshot::named("1", "Tynan");
        let outcome = service.make_talk(&subject, None).await.unwrap();

        assert!(matches!(
            outcome,
            TalkOutcome::Spoke { recorded: false, ref text, .. } if text == "Error: 500\nupstream down"
        ));
        assert!(history.read().await.is_empty());
    }

    #[tokio::test]
    async fn blank_reply_shows_placeholder() {
        let mut completion = MockCompletionPort::new();
        completion
            .expect_post_completion()
            .returning(|_, _, _| Ok(text_reply("   ")));

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            quiet_speech(),
            MockNotifier::new(),
            history.clone(),
        );

        let subject = CharacterSnapshot::named("1", "Tynan");
        let outcome = service.make_talk(&subject, None).await.unwrap();

        assert!(matches!(
            outcome,
            TalkOutcome::Spoke { recorded: false, ref text, .. } if text == EMPTY_REPLY
        ));
    }

    #[tokio::test]
    async fn host_display_failures_are_swallowed() {
        let mut completion = MockCompletionPort::new();
        completion
            .expect_post_completion()
            .returning(|_, _, _| Ok(text_reply("Still here.")));

        let mut speech = MockSpeechSink::new();
        speech
            .expect_show_speech()
            .returning(|_, _| Err(crate::infrastructure::ports::HostError::new("no map")));
        speech
            .expect_add_play_log()
            .returning(|_, _| Err(crate::infrastructure::ports::HostError::new("no log")));

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            speech,
            MockNotifier::new(),
            history.clone(),
        );

        let subject = CharacterSnapshot::named("1", "Tynan");
        let outcome = service.make_talk(&subject, None).await.unwrap();

        assert!(matches!(outcome, TalkOutcome::Spoke { recorded: true, .. }));
    }

    #[tokio::test]
    async fn writes_speech_file_when_enabled() {
        let dir = TempDir::new().unwrap();
        let mut completion = MockCompletionPort::new();
        completion
            .expect_post_completion()
            .returning(|_, _, _| Ok(text_reply("Line one\nline two")));

        let service = service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            quiet_speech(),
            MockNotifier::new(),
            Arc::new(RwLock::new(DialogueHistory::new())),
        )
        .with_speech_files(SpeechFileWriter::new(dir.path()));

        let subject = CharacterSnapshot::named("1", "Tynan");
        service.make_talk(&subject, None).await.unwrap();

        let written = tokio::fs::read_to_string(
            dir.path().join("ColonistPrompts").join("Tynan_say.txt"),
        )
        .await
        .unwrap();
        assert_eq!(written, "Line one\nline two");
    }

    #[tokio::test]
    async fn speech_file_skipped_when_disabled() {
        let dir = TempDir::new().unwrap();
        let mut completion = MockCompletionPort::new();
        completion
            .expect_post_completion()
            .returning(|_, _, _| Ok(text_reply("Quiet.")));

        let settings = TalkSettings {
            write_speech_files: false,
            ..settings_with_token("sk-test")
        };
        let service = service(
            completion,
            stored_settings(settings),
            quiet_speech(),
            MockNotifier::new(),
            Arc::new(RwLock::new(DialogueHistory::new())),
        )
        .with_speech_files(SpeechFileWriter::new(dir.path()));

        let subject = CharacterSnapshot::named("1", "Tynan");
        service.make_talk(&subject, None).await.unwrap();

        assert!(!dir.path().join("ColonistPrompts").exists());
    }

    #[tokio::test]
    async fn ask_sends_prompt_verbatim_without_touching_history() {
        let mut completion = MockCompletionPort::new();
        completion
            .expect_post_completion()
            .withf(|_, body, _| body.contains("\"content\":\"Write a backstory.\""))
            .times(1)
            .returning(|_, _, _| Ok(CompletionReply::Empty));

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            MockSpeechSink::new(),
            MockNotifier::new(),
            history.clone(),
        );

        let outcome = service.ask("Write a backstory.").await.unwrap();

        assert_eq!(
            outcome,
            TalkOutcome::Answered {
                text: "(no content)".into(),
                reply: CompletionReply::Empty,
            }
        );
        assert!(history.read().await.is_empty());
    }

    #[tokio::test]
    async fn settings_store_failure_falls_back_to_seed() {
        let mut completion = MockCompletionPort::new();
        completion
            .expect_post_completion()
            .withf(|token, _, _| token == "sk-seed")
            .times(1)
            .returning(|_, _, _| Ok(text_reply("Fine.")));

        let mut settings = MockSettingsRepo::new();
        settings.expect_get().returning(|| {
            Err(crate::infrastructure::ports::RepoError::database(
                "settings",
                "locked",
            ))
        });

        let service = TalkService::new(
            Arc::new(completion),
            Arc::new(settings),
            Arc::new(quiet_speech()),
            Arc::new(MockNotifier::new()),
            Arc::new(clock_at(0)),
            Arc::new(RwLock::new(DialogueHistory::new())),
            settings_with_token("sk-seed"),
        );

        let outcome = service.ask("Hello?").await.unwrap();
        assert!(matches!(outcome, TalkOutcome::Answered { ref text, .. } if text == "Fine."));
    }

    /// Completion that parks until the test opens the gate.
    struct GatedCompletion {
        calls: Arc<AtomicUsize>,
        entered: Arc<Notify>,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl CompletionPort for GatedCompletion {
        async fn post_completion(
            &self,
            _token: &str,
            _body: String,
            _timeout: Duration,
        ) -> Result<CompletionReply, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.gate.notified().await;
            Ok(text_reply("Only once."))
        }
    }

    #[tokio::test]
    async fn trigger_during_flight_is_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entered = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let completion = GatedCompletion {
            calls: calls.clone(),
            entered: entered.clone(),
            gate: gate.clone(),
        };

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = Arc::new(service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            quiet_speech(),
            MockNotifier::new(),
            history.clone(),
        ));

        let first = {
            let service = service.clone();
            tokio::spawn(async move {
                let subject = CharacterSnapshot::named("1", "Tynan");
                service.make_talk(&subject, None).await
            })
        };

        entered.notified().await;

        let subject = CharacterSnapshot::named("1", "Tynan");
        assert_eq!(
            service.make_talk(&subject, None).await.unwrap(),
            TalkOutcome::Skipped
        );
        assert_eq!(service.ask("Anyone?").await.unwrap(), TalkOutcome::Skipped);

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();

        assert!(matches!(outcome, TalkOutcome::Spoke { recorded: true, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(history.read().await.len(), 1);
        assert!(!service.busy_flag().is_busy());
    }

    #[tokio::test]
    async fn abandoned_talk_keeps_flag_until_call_returns() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entered = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let completion = GatedCompletion {
            calls: calls.clone(),
            entered: entered.clone(),
            gate: gate.clone(),
        };

        let history = Arc::new(RwLock::new(DialogueHistory::new()));
        let service = service(
            completion,
            stored_settings(settings_with_token("sk-test")),
            quiet_speech(),
            MockNotifier::new(),
            history.clone(),
        );

        let subject = CharacterSnapshot::named("1", "Tynan");
        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), service.make_talk(&subject, None))
                .await;
        assert!(abandoned.is_err());
        entered.notified().await;

        assert!(service.busy_flag().is_busy());
        assert_eq!(
            service.make_talk(&subject, None).await.unwrap(),
            TalkOutcome::Skipped
        );

        gate.notify_one();
        tokio::time::timeout(Duration::from_secs(5), async {
            while service.busy_flag().is_busy() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("worker releases the flag");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(history.read().await.is_empty());
    }
}
