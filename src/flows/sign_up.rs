use crate::token::VerifiedInvite;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub struct InviteToken {
    pub token: String,
}

/// What the sign-up page may show before the form is submitted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteDetails {
    pub email: String,
    pub name: Option<String>,
}

impl From<VerifiedInvite> for InviteDetails {
    fn from(invite: VerifiedInvite) -> Self {
        Self {
            email: invite.claims.email,
            name: invite.claims.name,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SignUpCredentials {
    pub token: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

impl fmt::Debug for SignUpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpCredentials")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub fn emails_match(invited: &str, submitted: &str) -> bool {
    invited.trim().eq_ignore_ascii_case(submitted.trim())
}
