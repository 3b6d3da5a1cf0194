use log::info;
use tokio::sync::mpsc;

use crate::config::ReminderMessage;
use crate::detector::SessionEvent;

use super::chime::Chime;
use super::engine::build_reminder_payload;

const SESSION_NAME: &str = "Gaming Session";

/// Receives lifecycle events from the monitoring loop. Fire-and-forget: the
/// loop does not await completion and never retries on a sink's behalf, so
/// implementations must swallow their own failures.
pub trait ReminderSink: Send + Sync {
    fn notify(&self, event: &SessionEvent);
}

/// Writes events to the log. Useful headless default and test double.
pub struct LogSink;

impl ReminderSink for LogSink {
    fn notify(&self, event: &SessionEvent) {
        match event {
            SessionEvent::GameStarted { reason, .. } => info!("session started ({reason})"),
            SessionEvent::GameEnded { reason, .. } => info!("session ended ({reason})"),
        }
    }
}

/// Forwards events over a channel, for embedding the monitor in a host that
/// wants to consume events itself.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ReminderSink for ChannelSink {
    fn notify(&self, event: &SessionEvent) {
        // A closed receiver just means nobody is listening anymore.
        let _ = self.tx.send(event.clone());
    }
}

/// The end-user sink: builds the reminder notification when a session ends
/// and optionally plays a chime.
pub struct ReminderNotifier {
    reminders: Vec<ReminderMessage>,
    chime: Option<Chime>,
}

impl ReminderNotifier {
    pub fn new(reminders: Vec<ReminderMessage>, sound_enabled: bool) -> Self {
        Self {
            reminders,
            chime: sound_enabled.then(Chime::new),
        }
    }
}

impl ReminderSink for ReminderNotifier {
    fn notify(&self, event: &SessionEvent) {
        match event {
            SessionEvent::GameStarted { reason, .. } => {
                info!("session started ({reason})");
            }
            SessionEvent::GameEnded { reason, .. } => {
                let payload = build_reminder_payload(&self.reminders, SESSION_NAME);
                info!("session ended ({reason})");
                info!("{}\n{}", payload.title, payload.body);
                if let Some(chime) = &self.chime {
                    chime.play();
                }
            }
        }
    }
}
