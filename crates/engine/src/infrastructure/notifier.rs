//! Console notifier used by the `duelbot` binary.

use async_trait::async_trait;
use duelbot_domain::ParticipantId;

use crate::infrastructure::ports::{Notification, NotifierPort, NotifyError};

/// Prints every notification to stdout, one block per recipient.
pub struct StdoutNotifier;

impl StdoutNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn render(participant: ParticipantId, notification: &Notification) -> String {
        let mut out = format!("-> [{}] {}", participant, notification.text);
        for choice in &notification.choices {
            out.push_str(&format!("\n     [{}] {}", choice.label, choice.token));
        }
        out
    }
}

impl Default for StdoutNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierPort for StdoutNotifier {
    async fn notify(
        &self,
        participant: ParticipantId,
        notification: &Notification,
    ) -> Result<(), NotifyError> {
        println!("{}", Self::render(participant, notification));
        tracing::trace!(participant = %participant, "Notification printed");
        Ok(())
    }
}
