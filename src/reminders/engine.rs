use crate::config::ReminderMessage;

/// Notification content handed to a sink when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
}

/// Build the end-of-session notification from the configured reminder list.
pub fn build_reminder_payload(
    reminders: &[ReminderMessage],
    session_name: &str,
) -> ReminderPayload {
    let mut body_lines = vec![format!("Session ended: {session_name}"), String::new()];
    if reminders.is_empty() {
        body_lines.push("No reminders configured.".to_string());
    } else {
        body_lines.extend(reminders.iter().map(|r| format!("\u{2022} {}", r.text)));
    }

    ReminderPayload {
        title: "Gamer Reminder".to_string(),
        body: body_lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_lists_each_reminder() {
        let reminders = vec![
            ReminderMessage::new("Drink water"),
            ReminderMessage::new("Stretch for 2 minutes"),
        ];

        let payload = build_reminder_payload(&reminders, "Gaming Session");

        assert_eq!(payload.title, "Gamer Reminder");
        assert!(payload.body.starts_with("Session ended: Gaming Session"));
        assert!(payload.body.contains("\u{2022} Drink water"));
        assert!(payload.body.contains("\u{2022} Stretch for 2 minutes"));
    }

    #[test]
    fn empty_list_gets_a_placeholder_body() {
        let payload = build_reminder_payload(&[], "Gaming Session");

        assert!(payload.body.contains("No reminders configured."));
    }
}
