use crate::{
    account::{Account, AccountRegistry, AccountSafe},
    config::Config,
    error::{ConfigError, Error, InviteError},
    flows::{
        invitation::{build_invite_link, InviteSent},
        sign_up::{emails_match, SignUpCredentials},
    },
    smtp_manager::Mailer,
    token::{constant_time_eq, InvitationCodec, InviteClaims, VerifiedInvite},
};
use chrono::{DateTime, Utc};
use email_address::EmailAddress;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Ties the token codec to the admin invitation and sign-up workflows.
pub struct InviteManager {
    codec: InvitationCodec,
    accounts: AccountRegistry,
    mailer: Arc<dyn Mailer>,
    sign_up_url: Url,
    admin_token: String,
}

impl InviteManager {
    pub fn new(config: &Config, mailer: Arc<dyn Mailer>) -> Result<Self, ConfigError> {
        Ok(Self {
            codec: InvitationCodec::new(config.get_invite_secret())?,
            accounts: AccountRegistry::default(),
            mailer,
            sign_up_url: config.get_sign_up_url().to_owned(),
            admin_token: config.get_admin_token().to_string(),
        })
    }

    pub fn admin_token_matches(&self, provided: &str) -> bool {
        constant_time_eq(provided.as_bytes(), self.admin_token.as_bytes())
    }

    pub async fn invite(
        &self,
        email: &EmailAddress,
        name: Option<String>,
    ) -> Result<InviteSent, Error> {
        if self.accounts.email_exists(email.as_str()).await {
            return Err(InviteError::AlreadyRegistered(email.to_string()).into());
        }
        let mut claims = InviteClaims::new(email.as_str());
        if let Some(name) = name {
            claims = claims.with_name(name);
        }
        let now: DateTime<Utc> = Utc::now();
        let token: String = self.codec.create_at(&claims, now)?;
        let link: Url = build_invite_link(&self.sign_up_url, email.as_str(), &token);
        if let Err(err) = self.mailer.send_invite(email.as_str(), &link).await {
            warn!("Failed to deliver invite to {}: {}", email, err);
            return Err(err.into());
        }
        info!("Invite created for {}", email);
        Ok(InviteSent {
            email: email.to_string(),
            expiry: now + InvitationCodec::lifetime(),
        })
    }

    pub fn verify_invite(&self, token: &str) -> Result<VerifiedInvite, InviteError> {
        self.codec.verify(token).ok_or(InviteError::InvalidInvite)
    }

    /// Creates the account bound to the email carried by the invite. A second
    /// sign-up with the same invite fails because the email is already registered.
    pub async fn sign_up(&self, credentials: SignUpCredentials) -> Result<AccountSafe, Error> {
        let invite: VerifiedInvite = self.verify_invite(&credentials.token)?;
        if !emails_match(invite.claims.get_email(), &credentials.email) {
            return Err(InviteError::EmailMismatch.into());
        }
        if self.accounts.email_exists(invite.claims.get_email()).await {
            return Err(InviteError::AlreadyRegistered(invite.claims.email).into());
        }
        let account_uid = self.accounts.generate_account_uid().await;
        let account = Account::new(
            account_uid,
            credentials.name,
            invite.claims.email,
            &credentials.password,
        )?;
        let account_safe = self.accounts.insert(account).await?;
        info!("Account {} created for {}", account_safe.id, account_safe.email);
        Ok(account_safe)
    }
}
