use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    pub fn verification(to: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Confirm your email".into(),
            body: format!("Click the link below to confirm your email address:\n\n{link}\n"),
        }
    }

    pub fn password_reset(to: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Reset your password".into(),
            body: format!("Click the link below to choose a new password:\n\n{link}\n"),
        }
    }
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> anyhow::Result<()>;
}

/// Writes mail to the log instead of delivering it. Bodies carry one-shot
/// tokens, so they only appear at debug level.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        info!(to = %mail.to, subject = %mail.subject, "mail queued");
        debug!(to = %mail.to, body = %mail.body, "mail body");
        Ok(())
    }
}
