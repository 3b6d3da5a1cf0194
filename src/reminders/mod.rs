mod chime;
mod engine;
mod sink;

pub use chime::Chime;
pub use engine::{build_reminder_payload, ReminderPayload};
pub use sink::{ChannelSink, LogSink, ReminderNotifier, ReminderSink};
