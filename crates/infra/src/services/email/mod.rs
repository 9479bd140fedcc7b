use anyhow::anyhow;
use lettre::{
    message::SinglePart, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Mutex;
use tracing::info;

/// A rendered reminder email, ready for transport.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Seam to the email provider. The channel dispatcher only sees this trait,
/// so deployments without SMTP credentials fall back to a logging sender and
/// tests substitute a recording stub.
#[async_trait::async_trait]
pub trait IEmailSender: Send + Sync {
    /// Delivers the message and returns the provider response text.
    async fn send(&self, message: EmailMessage) -> anyhow::Result<String>;
}

pub struct SmtpEmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpEmailSender {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("SMTP_HOST").map_err(|_| anyhow!("SMTP_HOST must be set"))?;
        let port: u16 = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(587);
        let username =
            std::env::var("SMTP_USERNAME").map_err(|_| anyhow!("SMTP_USERNAME must be set"))?;
        let password =
            std::env::var("SMTP_PASSWORD").map_err(|_| anyhow!("SMTP_PASSWORD must be set"))?;
        let from = std::env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

        let creds = Credentials::new(username, password);
        let mailer = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
                .map_err(|err| anyhow!("Failed to create SMTP transport: {}", err))?
                .port(port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                .map_err(|err| anyhow!("Failed to create SMTP transport: {}", err))?
                .port(port)
                .credentials(creds)
                .build()
        };

        Ok(Self { mailer, from })
    }
}

#[async_trait::async_trait]
impl IEmailSender for SmtpEmailSender {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<String> {
        let email = Message::builder()
            .from(self.from.parse()?)
            .to(message.to.parse()?)
            .subject(message.subject)
            .singlepart(SinglePart::plain(message.body))?;

        let response = self.mailer.send(email).await?;
        Ok(format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<&str>>().join(" ")
        ))
    }
}

/// Fallback sender used when no SMTP transport is configured. Messages are
/// written to the log and reported as delivered.
pub struct LoggingEmailSender {}

#[async_trait::async_trait]
impl IEmailSender for LoggingEmailSender {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<String> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "SMTP transport not configured, logging email instead of sending"
        );
        Ok("logged only, no smtp transport configured".into())
    }
}

/// Records every message it is asked to deliver. Set a failure message to
/// make subsequent sends error with it.
#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<EmailMessage>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_with(&self, error: Option<String>) {
        *self.fail_with.lock().unwrap() = error;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl IEmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<String> {
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(anyhow!(error));
        }
        self.sent.lock().unwrap().push(message);
        Ok("250 Ok".into())
    }
}
