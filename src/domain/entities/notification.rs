use ammonia::clean_text;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::message::{MessageInsert, MessageKind},
    errors::MailError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[serde(alias = "message")]
    Contact,
    Appointment,
    Demo,
    Reply,
}

/// Payload of `POST /api/send-email`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Notification {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default, alias = "preferredDate")]
    pub preferred_date: Option<String>,

    #[serde(default, alias = "preferredTime")]
    pub preferred_time: Option<String>,
}

impl From<&MessageInsert> for Notification {
    fn from(message: &MessageInsert) -> Self {
        Notification {
            name: message.name.clone(),
            email: message.email.clone(),
            kind: match message.kind {
                MessageKind::Contact => NotificationKind::Contact,
                MessageKind::Appointment => NotificationKind::Appointment,
                MessageKind::Demo => NotificationKind::Demo,
            },
            content: message.content.clone(),
            subject: message.subject.clone(),
            preferred_date: message.preferred_date.clone(),
            preferred_time: message.preferred_time.clone(),
        }
    }
}

/// Relay account the service sends as.
#[derive(Debug, Clone)]
pub struct MailIdentity {
    pub account: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from_name: Option<String>,
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

impl Notification {
    /// Builds the email for this notification. Every interpolated value is
    /// HTML-escaped; the subject line is plain text.
    pub fn compose(&self, identity: &MailIdentity) -> Result<OutgoingEmail, MailError> {
        let account = identity.account.clone().ok_or(MailError::NotConfigured)?;
        let name = clean_text(&self.name);
        let content = clean_text(&self.content).replace("&#10;", "<br>");

        if self.kind == NotificationKind::Reply {
            let subject = self
                .subject
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Your Inquiry");
            let signature = clean_text(&identity.display_name);

            return Ok(OutgoingEmail {
                from_name: Some(identity.display_name.clone()),
                from: account,
                to: self.email.clone(),
                reply_to: None,
                subject: format!("Re: {}", subject),
                html: format!(
                    "<div style=\"font-family: sans-serif; line-height: 1.6;\">\
                     <p>Dear {name},</p>\
                     <p>{content}</p>\
                     <p>Best regards,<br>{signature}</p>\
                     </div>"
                ),
            });
        }

        let (subject_prefix, heading) = match self.kind {
            NotificationKind::Appointment => ("New Appointment Request from", "New Appointment Request"),
            NotificationKind::Demo => ("New Demo Request from", "New Demo Request"),
            _ => ("New Message from", "New Contact Message"),
        };

        let email = clean_text(&self.email);
        let mut details = format!(
            "<p><strong>Name:</strong> {name}</p>\
             <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>"
        );
        if self.kind == NotificationKind::Appointment {
            let date = clean_text(self.preferred_date.as_deref().unwrap_or("Not specified"));
            let time = clean_text(self.preferred_time.as_deref().unwrap_or("Not specified"));
            details.push_str(&format!(
                "<p><strong>Preferred Date:</strong> {date}</p>\
                 <p><strong>Preferred Time:</strong> {time}</p>"
            ));
        }

        Ok(OutgoingEmail {
            from_name: None,
            from: account.clone(),
            to: account,
            reply_to: Some(self.email.clone()),
            subject: format!("{} {}", subject_prefix, self.name),
            html: format!(
                "<div style=\"font-family: sans-serif; line-height: 1.6;\">\
                 <h2>{heading}</h2>\
                 {details}\
                 <hr>\
                 <p>{content}</p>\
                 </div>"
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> MailIdentity {
        MailIdentity {
            account: Some("owner@example.com".into()),
            display_name: "Portfolio Admin".into(),
        }
    }

    fn notification(kind: NotificationKind) -> Notification {
        Notification {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            kind,
            content: "<script>alert(1)</script>".into(),
            subject: None,
            preferred_date: Some("2025-03-14".into()),
            preferred_time: Some("09:30".into()),
        }
    }

    #[test]
    fn inbound_kinds_go_to_the_account_with_reply_to() {
        let email = notification(NotificationKind::Demo).compose(&identity()).unwrap();
        assert_eq!(email.from, "owner@example.com");
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(email.subject, "New Demo Request from Ada");
        assert!(email.html.contains("New Demo Request"));
        assert!(!email.html.contains("Preferred Date"));
    }

    #[test]
    fn appointment_lists_preferred_slot() {
        let email = notification(NotificationKind::Appointment).compose(&identity()).unwrap();
        assert_eq!(email.subject, "New Appointment Request from Ada");
        assert!(email.html.contains("Preferred Date"));
        assert!(email.html.contains("Preferred Time"));
    }

    #[test]
    fn reply_goes_to_the_sender() {
        let email = notification(NotificationKind::Reply).compose(&identity()).unwrap();
        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.from_name.as_deref(), Some("Portfolio Admin"));
        assert_eq!(email.subject, "Re: Your Inquiry");
        assert!(email.html.contains("Dear Ada"));
        assert!(email.reply_to.is_none());
    }

    #[test]
    fn reply_keeps_given_subject() {
        let mut reply = notification(NotificationKind::Reply);
        reply.subject = Some("Consulting".into());
        let email = reply.compose(&identity()).unwrap();
        assert_eq!(email.subject, "Re: Consulting");
    }

    #[test]
    fn user_text_is_escaped() {
        let email = notification(NotificationKind::Contact).compose(&identity()).unwrap();
        assert_eq!(email.subject, "New Message from Ada");
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn missing_account_is_not_configured() {
        let identity = MailIdentity { account: None, display_name: "x".into() };
        let result = notification(NotificationKind::Contact).compose(&identity);
        assert!(matches!(result, Err(MailError::NotConfigured)));
    }

    #[test]
    fn accepts_message_alias() {
        let parsed: Notification = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "type": "message",
            "content": "Hello"
        }))
        .unwrap();
        assert_eq!(parsed.kind, NotificationKind::Contact);
    }
}
