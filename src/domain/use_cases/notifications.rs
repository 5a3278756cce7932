use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::notification::{MailIdentity, Notification, OutgoingEmail},
    errors::{AppError, MailError},
    repositories::mailer::Mailer,
};

/// Escapes what a double-quoted attribute value cannot hold, leaving the
/// URL readable.
fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Clone)]
pub struct NotificationSender {
    pub mailer: Arc<dyn Mailer>,
    pub identity: MailIdentity,
}

impl NotificationSender {
    pub fn new(mailer: Arc<dyn Mailer>, identity: MailIdentity) -> Self {
        NotificationSender { mailer, identity }
    }

    pub fn is_configured(&self) -> bool {
        self.identity.account.is_some() && self.mailer.is_configured()
    }

    /// Validates, composes and relays one notification. Fails closed when
    /// the relay account is not configured.
    pub async fn send(&self, notification: &Notification) -> Result<(), AppError> {
        notification.validate()?;

        if !self.is_configured() {
            tracing::error!("Email relay credentials are not configured");
            return Err(MailError::NotConfigured.into());
        }

        let email = notification.compose(&self.identity)?;
        self.relay(&email).await
    }

    /// Emails a password-reset link to `to`.
    pub async fn send_password_reset(&self, to: &str, link: &str) -> Result<(), AppError> {
        let account = match (&self.identity.account, self.mailer.is_configured()) {
            (Some(account), true) => account.clone(),
            _ => return Err(MailError::NotConfigured.into()),
        };

        let link = escape_attr(link);
        let email = OutgoingEmail {
            from_name: Some(self.identity.display_name.clone()),
            from: account,
            to: to.to_string(),
            reply_to: None,
            subject: "Reset your password".to_string(),
            html: format!(
                "<div style=\"font-family: sans-serif; line-height: 1.6;\">\
                 <p>A password reset was requested for your admin account.</p>\
                 <p><a href=\"{link}\">Choose a new password</a></p>\
                 <p>The link expires in one hour. If you did not ask for it, ignore this email.</p>\
                 </div>"
            ),
        };
        self.relay(&email).await
    }

    async fn relay(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        self.mailer.send(email).await.map_err(|e| {
            tracing::error!(error = %e, subject = %email.subject, "Failed to send email");
            AppError::Mail(e)
        })
    }
}
