use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::{
        message::{AppointmentForm, ContactForm, DemoRequestForm, Message, MessageInsert, ReplyRequest, SubmissionResponse},
        notification::{Notification, NotificationKind},
    },
    errors::AppError,
    repositories::message::MessageRepository,
    use_cases::notifications::NotificationSender,
    utils::{search::filter_rows, valid_uuid::valid_uuid},
};

/// Inbound contact, appointment and demo requests.
pub struct MessageHandler {
    pub message_repo: Arc<dyn MessageRepository>,
    pub notifier: NotificationSender,
}

impl MessageHandler {
    pub fn new(message_repo: Arc<dyn MessageRepository>, notifier: NotificationSender) -> Self {
        MessageHandler { message_repo, notifier }
    }

    pub async fn submit_contact(&self, form: ContactForm) -> Result<SubmissionResponse, AppError> {
        form.validate()?;
        self.record(MessageInsert::from(form), "Thanks! Your message has been sent.").await
    }

    pub async fn submit_appointment(&self, form: AppointmentForm) -> Result<SubmissionResponse, AppError> {
        form.validate()?;
        self.record(MessageInsert::from(form), "Appointment request received.").await
    }

    pub async fn submit_demo(&self, form: DemoRequestForm) -> Result<SubmissionResponse, AppError> {
        form.validate()?;
        self.record(MessageInsert::from(form), "Demo request received.").await
    }

    /// Persists first, then makes exactly one notification attempt. A failed
    /// notification is logged and does not fail the submission.
    async fn record(&self, insert: MessageInsert, ack: &str) -> Result<SubmissionResponse, AppError> {
        let id = self.message_repo.create_message(&insert).await?;
        tracing::info!(message_id = %id, kind = %insert.kind, "Message stored");

        let notification_sent = match self.notifier.send(&Notification::from(&insert)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(message_id = %id, error = %e, "Notification not sent");
                false
            }
        };

        Ok(SubmissionResponse {
            id,
            message: ack.to_string(),
            notification_sent,
        })
    }

    /// Newest first, filtered by name, email or content.
    pub async fn list_messages(&self, query: Option<&str>) -> Result<Vec<Message>, AppError> {
        let messages = self.message_repo.list_messages().await?;
        Ok(filter_rows(messages, query, |m: &Message| {
            vec![m.name.as_str(), m.email.as_str(), m.content.as_str()]
        }))
    }

    pub async fn get_message(&self, id: &str) -> Result<Message, AppError> {
        let id = valid_uuid(id)?;
        self.message_repo.get_message_by_id(&id).await
    }

    pub async fn delete_message(&self, id: &str, confirmed: bool) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        if !confirmed {
            return Err(AppError::ConfirmationRequired("message".into()));
        }
        self.message_repo.delete_message(&id).await?;
        tracing::info!(message_id = %id, "Message deleted");
        Ok(())
    }

    /// Emails a reply to the sender of a stored message. Relay failures
    /// are returned to the caller.
    pub async fn reply(&self, id: &str, request: ReplyRequest) -> Result<(), AppError> {
        request.validate()?;
        let message = self.get_message(id).await?;

        let notification = Notification {
            name: message.name,
            email: message.email,
            kind: NotificationKind::Reply,
            content: request.content,
            subject: request.subject.or(message.subject),
            preferred_date: None,
            preferred_time: None,
        };
        self.notifier.send(&notification).await?;
        tracing::info!(message_id = %message.id, "Reply sent");
        Ok(())
    }
}
