use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{authentication::Credentials, PoolConfig},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::environment::SmtpConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Failed to send email: {0}")]
    Transport(String),
}

/// Outbound email seam. Production uses SMTP; tests record sends instead.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .pool_config(PoolConfig::new().max_size(4))
            .build();

        let from = config
            .from_address
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from_address.clone()))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

// =============================================================================
// TEMPLATES
// =============================================================================

pub fn verification_email(full_name: &str, link: &str) -> (String, String) {
    let subject = "Welcome to Torii Gate - Verify Your Email".to_string();
    let body = format!(
        "Hello {},\n\
        \n\
        Welcome to Torii Gate! Please verify your email address by visiting\n\
        the link below:\n\
        \n\
        {}\n\
        \n\
        This link will expire in 24 hours.\n\
        \n\
        Best regards,\n\
        The Torii Gate Team",
        full_name, link
    );
    (subject, body)
}

pub fn reset_password_email(link: &str) -> (String, String) {
    let subject = "Torii Gate - Password Reset Request".to_string();
    let body = format!(
        "Hello,\n\
        \n\
        A password reset was requested for your Torii Gate account. Visit the\n\
        link below to choose a new password:\n\
        \n\
        {}\n\
        \n\
        This link will expire in 1 hour.\n\
        \n\
        If you did not request this reset, please ignore this email.\n\
        \n\
        Best regards,\n\
        The Torii Gate Team",
        link
    );
    (subject, body)
}
