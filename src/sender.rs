//! Message sending.

use tracing::debug;

use crate::Result;
use crate::request::EmailRequest;
use crate::routine::Routine;

/// Sends messages through `POST /{domain}/messages`.
#[derive(Debug, Clone, Copy)]
pub struct MailSender<'a> {
    routine: Routine<'a>,
}

impl<'a> MailSender<'a> {
    pub(crate) fn new(routine: Routine<'a>) -> Self {
        Self { routine }
    }

    /// Queue a message for delivery.
    ///
    /// # Returns
    /// `true` if Mailgun accepted the message (any 2xx status).
    pub async fn send_message(&self, request: &EmailRequest) -> Result<bool> {
        let path = format!("/{}/messages", self.routine.account().domain());
        let response = self.routine.post(&path, request.parameters()).await?;
        debug!(accepted = response.success(), "message submitted");
        Ok(response.success())
    }
}
