//! SMTP notification sink.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error};

use deckshare_core::config::MailConfig;
use deckshare_core::error::{AppError, ErrorKind};
use deckshare_core::result::AppResult;
use deckshare_core::traits::NotificationSink;
use deckshare_core::types::mask_email;

/// Delivers plain-text mail through an SMTP relay.
#[derive(Clone)]
pub struct SmtpNotificationSink {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    timeout: Duration,
}

impl std::fmt::Debug for SmtpNotificationSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotificationSink")
            .field("from", &self.from)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SmtpNotificationSink {
    /// Build the transport. Port 465 uses implicit TLS, other ports STARTTLS,
    /// unless TLS is disabled.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let host = config.smtp_host.as_str();
        let timeout = Duration::from_secs(config.timeout_seconds);

        let mut builder = if config.use_tls {
            let tls = TlsParameters::new(host.to_string()).map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid SMTP TLS settings", e)
            })?;
            let builder = if config.smtp_port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            }
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid SMTP relay", e)
            })?;
            let wrapper = if config.smtp_port == 465 {
                Tls::Wrapper(tls)
            } else {
                Tls::Required(tls)
            };
            builder.port(config.smtp_port).tls(wrapper)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(config.smtp_port)
        };

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.timeout(Some(timeout)).build(),
            from: config.from_address.clone(),
            timeout,
        })
    }
}

#[async_trait]
impl NotificationSink for SmtpNotificationSink {
    async fn send(&self, address: &str, subject: &str, body: &str) -> AppResult<()> {
        let message = Message::builder()
            .from(self.from.parse().map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid sender address", e)
            })?)
            .to(address.parse().map_err(|e| {
                AppError::with_source(ErrorKind::Validation, "Invalid recipient address", e)
            })?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build email", e)
            })?;

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_)) => {
                debug!(to = %mask_email(address), "Email delivered to relay");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(to = %mask_email(address), error = %e, "SMTP delivery failed");
                Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    "SMTP delivery failed",
                    e,
                ))
            }
            Err(_) => Err(AppError::external_service("SMTP delivery timed out")),
        }
    }
}
