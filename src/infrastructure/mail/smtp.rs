use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use zeroize::Zeroizing;

use crate::{
    entities::notification::OutgoingEmail,
    errors::MailError,
    repositories::mailer::Mailer,
    settings::AppConfig,
};

const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP relay client. Port 465 uses implicit TLS, anything else STARTTLS.
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Option<(String, Zeroizing<String>)>,
}

impl SmtpMailer {
    pub fn new(config: &AppConfig) -> Self {
        SmtpMailer {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            credentials: config.mail_credentials(),
        }
    }

    fn transport(&self, user: &str, pass: &str) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = if self.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
        }
        .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(builder
            .port(self.port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build())
    }
}

/// Renders an [`OutgoingEmail`] as a MIME message.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let from = Mailbox::new(email.from_name.clone(), parse_address(&email.from)?);

    let mut builder = Message::builder()
        .from(from)
        .to(Mailbox::new(None, parse_address(&email.to)?))
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(Mailbox::new(None, parse_address(reply_to)?));
    }

    builder
        .body(email.html.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

fn parse_address(address: &str) -> Result<lettre::Address, MailError> {
    address
        .trim()
        .parse()
        .map_err(|e: lettre::address::AddressError| MailError::Address(format!("{}: {}", address, e)))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let (user, pass) = self.credentials.as_ref().ok_or(MailError::NotConfigured)?;
        let message = build_message(email)?;
        let transport = self.transport(user, pass)?;

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(subject = %email.subject, "Notification email relayed");
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from_name: Some("Portfolio Admin".into()),
            from: "owner@example.com".into(),
            to: "ada@example.com".into(),
            reply_to: Some("ada@example.com".into()),
            subject: "Re: Your Inquiry".into(),
            html: "<p>Hello</p>".into(),
        }
    }

    #[test]
    fn builds_html_message_with_reply_to() {
        let message = build_message(&email()).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Reply-To: ada@example.com"));
        assert!(rendered.contains("Content-Type: text/html"));
        assert!(rendered.contains("Subject: Re: Your Inquiry"));
    }

    #[test]
    fn invalid_recipient_is_an_address_error() {
        let mut bad = email();
        bad.to = "not an address".into();
        assert!(matches!(build_message(&bad), Err(MailError::Address(_))));
    }

    #[actix_rt::test]
    async fn missing_credentials_fail_closed() {
        let mailer = SmtpMailer::new(&AppConfig::default());
        assert!(!mailer.is_configured());
        assert!(matches!(mailer.send(&email()).await, Err(MailError::NotConfigured)));
    }
}
