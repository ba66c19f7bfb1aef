use crate::{
    error::{ConfigError, TokenError},
    r#trait::Expired,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;
use std::{collections::BTreeMap, fmt};
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

pub const INVITE_LIFETIME_DAYS: i64 = 7;
pub const CODEC_VERSION: u32 = 1;
const RESERVED_CLAIMS: [&str; 3] = ["email", "name", "exp"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    alg: String,
    typ: String,
    v: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
            v: CODEC_VERSION,
        }
    }
}

/// Claims embedded in an invitation. `extra` holds any additional keys and is
/// flattened into the payload object next to `email` and `name`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InviteClaims {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl InviteClaims {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Keys clashing with `email`, `name` or `exp` are dropped when the token is created.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.extra.insert(key.into(), value.into());
        self
    }

    pub fn get_email(&self) -> &str {
        &self.email
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Claims of a token that passed verification, plus the expiry in seconds since the epoch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VerifiedInvite {
    #[serde(flatten)]
    pub claims: InviteClaims,
    pub exp: i64,
}

impl VerifiedInvite {
    pub fn get_expiry(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Clone)]
pub struct InviteSecret(Vec<u8>);

impl InviteSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret: Vec<u8> = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingInviteSecret);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for InviteSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InviteSecret(<redacted>)")
    }
}

/// Length is checked before the constant time comparison, so only the length can leak.
pub(crate) fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Creates and verifies `header.payload.signature` invitation tokens signed with HMAC-SHA256.
#[derive(Clone)]
pub struct InvitationCodec {
    mac: HmacSha256,
}

impl fmt::Debug for InvitationCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvitationCodec").finish_non_exhaustive()
    }
}

impl InvitationCodec {
    pub fn new(secret: &InviteSecret) -> Result<Self, ConfigError> {
        let mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
            .map_err(ConfigError::InvalidInviteSecret)?;
        Ok(Self { mac })
    }

    pub fn lifetime() -> Duration {
        Duration::days(INVITE_LIFETIME_DAYS)
    }

    pub fn create(&self, claims: &InviteClaims) -> Result<String, TokenError> {
        self.create_at(claims, Utc::now())
    }

    pub fn create_at(&self, claims: &InviteClaims, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expiry: DateTime<Utc> = now + Self::lifetime();
        let header_base64 = {
            let header_str = serde_json::to_string(&Header::default())
                .map_err(TokenError::Serialisation)?;
            URL_SAFE_NO_PAD.encode(header_str)
        };
        let payload_base64 = {
            let mut payload: Map<String, Value> = claims
                .extra
                .iter()
                .filter(|(key, _)| !RESERVED_CLAIMS.contains(&key.as_str()))
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect();
            let _ = payload.insert("email".to_string(), Value::from(claims.email.as_str()));
            if let Some(name) = claims.name.as_ref() {
                let _ = payload.insert("name".to_string(), Value::from(name.as_str()));
            }
            let _ = payload.insert("exp".to_string(), Value::from(expiry.timestamp()));
            let payload_str = serde_json::to_string(&payload).map_err(TokenError::Serialisation)?;
            URL_SAFE_NO_PAD.encode(payload_str)
        };
        let signature_base64 = self.sign(&format!("{}.{}", header_base64, payload_base64));
        Ok(format!(
            "{}.{}.{}",
            header_base64, payload_base64, signature_base64
        ))
    }

    /// Returns the claims of a well formed, correctly signed and unexpired token.
    /// The reason for a rejection is only logged.
    pub fn verify(&self, token: &str) -> Option<VerifiedInvite> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<VerifiedInvite> {
        match self.check(token, now) {
            Ok(invite) => Some(invite),
            Err(err) => {
                debug!("Invitation token rejected: {}", err);
                None
            }
        }
    }

    fn check(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedInvite, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(TokenError::InvalidFormat);
        }
        let (header_base64, payload_base64, signature_base64) = (parts[0], parts[1], parts[2]);

        let expected = self.sign(&format!("{}.{}", header_base64, payload_base64));
        if !constant_time_eq(signature_base64.as_bytes(), expected.as_bytes()) {
            return Err(TokenError::SignatureMismatch);
        }

        let payload_bytes = URL_SAFE_NO_PAD.decode(payload_base64)?;
        let invite: VerifiedInvite =
            serde_json::from_slice(&payload_bytes).map_err(TokenError::PayloadDeserialisation)?;

        let expiry = match invite.get_expiry() {
            Some(expiry) => expiry,
            None => return Err(TokenError::ExpiryOutOfRange(invite.exp)),
        };
        if expiry.expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(invite)
    }

    fn sign(&self, data: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(data.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}
