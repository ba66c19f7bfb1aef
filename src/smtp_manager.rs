use crate::{config::SmtpConfig, error::MailError};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};
use url::Url;

pub const INVITE_SUBJECT: &str = "You're invited to ZenApt";

pub fn invite_body(link: &Url) -> String {
    format!(
        "You have been invited to set up your ZenApt account.\n\n\
        Complete your sign-up here:\n{}\n\n\
        This link expires in 7 days.",
        link
    )
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_invite(&self, to: &str, link: &Url) -> Result<(), MailError>;
}

pub struct SmtpManager {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpManager {
    pub fn new(smtp_config: &SmtpConfig) -> Result<Self, MailError> {
        let sender: Mailbox = smtp_config.sender_address.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_config.server)?
            .port(smtp_config.port)
            .credentials(Credentials::new(
                smtp_config.username.to_owned(),
                smtp_config.password.to_owned(),
            ))
            .build();
        Ok(Self { sender, transport })
    }
}

#[async_trait]
impl Mailer for SmtpManager {
    async fn send_invite(&self, to: &str, link: &Url) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.sender.to_owned())
            .to(to.parse()?)
            .subject(INVITE_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(invite_body(link))?;
        let _ = self.transport.send(message).await?;
        info!("Invite email sent to {}", to);
        Ok(())
    }
}

/// Used when no SMTP server is configured.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invite(&self, to: &str, link: &Url) -> Result<(), MailError> {
        info!("No SMTP server configured, invite for {} not emailed", to);
        debug!("Invite link for {}: {}", to, link);
        Ok(())
    }
}
