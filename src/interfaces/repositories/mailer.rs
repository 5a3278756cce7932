use async_trait::async_trait;

use crate::{entities::notification::OutgoingEmail, errors::MailError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;

    /// False when relay credentials are missing; nothing is sent then.
    fn is_configured(&self) -> bool;
}
