use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::MailConfig;

/// One contact-form submission, as relayed to the operator's inbox.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    pub fn subject_line(&self) -> String {
        format!("Portfolio Contact: {} from {}", self.subject, self.name)
    }

    pub fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}",
            self.name, self.email, self.phone, self.message
        )
    }
}

/// Opaque mail-relay collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, msg: &ContactMessage) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Operator address; mails go from and to this account.
    address: String,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .context("smtp relay config")?
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        Ok(Self {
            transport,
            address: cfg.username.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, msg: &ContactMessage) -> anyhow::Result<()> {
        let operator: Mailbox = self.address.parse().context("operator address")?;
        let reply_to: Mailbox = msg.email.parse().context("reply-to address")?;
        let email = Message::builder()
            .from(operator.clone())
            .to(operator)
            .reply_to(reply_to)
            .subject(msg.subject_line())
            .header(ContentType::TEXT_PLAIN)
            .body(msg.body())
            .context("build message")?;
        self.transport.send(email).await.context("smtp send")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContactMessage {
        ContactMessage {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "+123".into(),
            subject: "Hiring".into(),
            message: "Hello there".into(),
        }
    }

    #[test]
    fn subject_line_names_sender_and_topic() {
        assert_eq!(
            sample().subject_line(),
            "Portfolio Contact: Hiring from Ada"
        );
    }

    #[test]
    fn body_carries_all_fields() {
        let body = sample().body();
        assert!(body.contains("Name: Ada"));
        assert!(body.contains("Email: ada@example.com"));
        assert!(body.contains("Phone: +123"));
        assert!(body.ends_with("Message:\nHello there"));
    }
}
