use std::sync::Arc;

use anyhow::{Context, Result};
use lettre::message::{Mailbox, Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use super::settings::SmtpSettings;

/// SMTP mailer with a no-op mode when no host is configured, so local
/// development does not need mail infrastructure.
#[derive(Clone)]
pub(crate) struct Mailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    verification_base_url: String,
}

impl Mailer {
    pub(crate) fn new(smtp: &SmtpSettings, verification_base_url: &str) -> Result<Self> {
        let from = smtp
            .from
            .parse::<Mailbox>()
            .context("invalid SMTP_FROM address")?;

        let transport = if smtp.host.trim().is_empty() {
            warn!("SMTP host not configured; mailer runs in no-op mode");
            None
        } else {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                .context("failed to configure SMTP transport")?
                .port(smtp.port);

            if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
                builder = builder.credentials(Credentials::new(
                    username.to_string(),
                    password.to_string(),
                ));
            }

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            verification_base_url: verification_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) async fn send_verification_email(&self, recipient: &str, token: &str) -> Result<()> {
        let link = format!("{}/{token}", self.verification_base_url);
        let body = format!(
            "Welcome to Bloggy!\n\nClick the following link to verify your email:\n{link}\n\nIf you did not register, ignore this email.",
        );

        let Some(transport) = &self.transport else {
            info!(recipient, "mailer no-op: verification email not sent");
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient
                .parse::<Mailbox>()
                .context("invalid recipient address")?)
            .subject("Verify your Bloggy account")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .context("failed to build verification email")?;

        transport
            .send(message)
            .await
            .context("failed to send verification email")?;
        Ok(())
    }
}
