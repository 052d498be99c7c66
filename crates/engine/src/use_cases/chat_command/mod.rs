//! `!talk [name]` chat command.
//!
//! A chat integration implements [`ChatRelay`] and hands it to
//! [`ChatCommandListener::spawn`]. Each `!talk` message picks a colonist and
//! runs the regular talk flow, sharing its busy guard.

use std::sync::Arc;

use async_trait::async_trait;
use pawntalk_domain::{PlayLog, SubjectView};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::infrastructure::ports::{
    ChatRelay, ColonistRoster, IncomingChatMessage, NoticeKind, Notifier, RandomPort,
};
use crate::use_cases::talk::{TalkOutcome, TalkService};

const COMMAND: &str = "!talk";

/// Notice shown when the roster has nobody to talk.
pub const NO_COLONIST_NOTICE: &str = "No matching colonist found.";

/// A parsed `!talk` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkCommand {
    /// Name fragment to match, if one was given
    pub target: Option<String>,
}

/// Parse a chat message. `None` unless it starts with `!talk`
/// (ASCII case-insensitive, after trimming).
pub fn parse_talk_command(message: &str) -> Option<TalkCommand> {
    let trimmed = message.trim();
    let prefix = trimmed.get(..COMMAND.len())?;
    if !prefix.eq_ignore_ascii_case(COMMAND) {
        return None;
    }

    let rest = trimmed[COMMAND.len()..].trim();
    Some(TalkCommand {
        target: (!rest.is_empty()).then(|| rest.to_string()),
    })
}

/// Pick the colonist a command targets.
///
/// First colonist whose short label or full name contains `fragment`
/// (case-insensitive); otherwise a random one. `None` for an empty roster.
pub fn resolve_target(
    colonists: &[Arc<dyn SubjectView>],
    fragment: Option<&str>,
    random: &dyn RandomPort,
) -> Option<Arc<dyn SubjectView>> {
    if colonists.is_empty() {
        return None;
    }

    if let Some(fragment) = fragment.map(str::trim).filter(|f| !f.is_empty()) {
        let needle = fragment.to_lowercase();
        let found = colonists.iter().find(|c| {
            c.label().to_lowercase().contains(&needle)
                || c
                    .full_name()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
        });
        if let Some(colonist) = found {
            return Some(Arc::clone(colonist));
        }
    }

    let index = random.choose_index(colonists.len()).min(colonists.len() - 1);
    Some(Arc::clone(&colonists[index]))
}

/// [`ChatRelay`] over a tokio channel, for integrations that push messages.
pub struct ChannelRelay {
    rx: mpsc::Receiver<IncomingChatMessage>,
}

impl ChannelRelay {
    pub fn new(rx: mpsc::Receiver<IncomingChatMessage>) -> Self {
        Self { rx }
    }

    /// Relay plus the sender an integration pushes messages into.
    pub fn channel(capacity: usize) -> (mpsc::Sender<IncomingChatMessage>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl ChatRelay for ChannelRelay {
    async fn recv(&mut self) -> Option<IncomingChatMessage> {
        self.rx.recv().await
    }
}

/// Dispatches chat commands into the talk flow.
pub struct ChatCommandListener {
    talk: Arc<TalkService>,
    roster: Arc<dyn ColonistRoster>,
    play_log: Option<Arc<dyn PlayLog>>,
    notifier: Arc<dyn Notifier>,
    random: Arc<dyn RandomPort>,
}

impl ChatCommandListener {
    pub fn new(
        talk: Arc<TalkService>,
        roster: Arc<dyn ColonistRoster>,
        play_log: Option<Arc<dyn PlayLog>>,
        notifier: Arc<dyn Notifier>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            talk,
            roster,
            play_log,
            notifier,
            random,
        }
    }

    /// Start listening on `relay`. Without a relay the command is disabled
    /// and `None` is returned.
    ///
    /// Each command runs on its own task, so a `!talk` arriving while a talk
    /// is in flight hits the busy guard and is dropped instead of waiting in
    /// the relay. The returned task ends once the relay closes and every
    /// dispatched talk has finished.
    pub fn spawn<R>(self, relay: Option<R>) -> Option<JoinHandle<()>>
    where
        R: ChatRelay + 'static,
    {
        let Some(mut relay) = relay else {
            tracing::warn!("No chat relay available, chat talk command disabled");
            return None;
        };

        let listener = Arc::new(self);
        Some(tokio::spawn(async move {
            tracing::info!("Chat talk command listening");
            let mut in_flight = JoinSet::new();
            while let Some(message) = relay.recv().await {
                while in_flight.try_join_next().is_some() {}

                let listener = Arc::clone(&listener);
                in_flight.spawn(async move {
                    listener.handle(&message).await;
                });
            }
            while in_flight.join_next().await.is_some() {}
            tracing::info!("Chat relay closed");
        }))
    }

    /// Handle one chat message. Returns the talk outcome when it was a command.
    pub async fn handle(&self, message: &IncomingChatMessage) -> Option<TalkOutcome> {
        let command = parse_talk_command(&message.message)?;

        let colonists = match self.roster.free_colonists() {
            Ok(colonists) => colonists,
            Err(e) => {
                tracing::warn!(error = %e, user = %message.user, "Failed to list colonists");
                Vec::new()
            }
        };

        let Some(target) =
            resolve_target(&colonists, command.target.as_deref(), self.random.as_ref())
        else {
            self.notifier.notify(NO_COLONIST_NOTICE, NoticeKind::Reject);
            return None;
        };

        tracing::info!(
            user = %message.user,
            target = %target.id(),
            "Chat talk command"
        );

        match self
            .talk
            .make_talk(target.as_ref(), self.play_log.as_deref())
            .await
        {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(error = %e, user = %message.user, "Chat talk command failed");
                None
            }
        }
    }
}
