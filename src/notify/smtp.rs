use super::MailTransport;
use super::message::OwnerMail;
use crate::config::MailConfig;
use anyhow::{Context, Result};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Authenticated STARTTLS relay that mails the owner from their own address
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    owner: Mailbox,
}

impl SmtpMailer {
    /// Build from config; `None` when mail is disabled or credentials are missing.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>> {
        let Some((owner, username, password)) = config.credentials() else {
            return Ok(None);
        };

        let owner: Mailbox = owner
            .parse()
            .with_context(|| format!("Invalid owner email address: {owner}"))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("Failed to configure SMTP relay {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Some(Self { transport, owner }))
    }
}

impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OwnerMail) -> Result<()> {
        let message = Message::builder()
            .from(self.owner.clone())
            .to(self.owner.clone())
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .context("Failed to build email")?;

        self.transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}
