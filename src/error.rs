use axum::http::header::InvalidHeaderValue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("MissingProperties({0})")]
    MissingProperties(String),
    #[error("MissingInviteSecret")]
    MissingInviteSecret,
    #[error("InvalidInviteSecret({0})")]
    InvalidInviteSecret(hmac::digest::InvalidLength),
    #[error("MissingAdminToken")]
    MissingAdminToken,
    #[error("MissingAllowedOrigins")]
    MissingAllowedOrigins,
    #[error("InvalidOrigin({0}, {1})")]
    InvalidOrigin(InvalidHeaderValue, String),
    #[error("InvalidSignUpUrl({0})")]
    InvalidSignUpUrl(#[from] url::ParseError),
    #[error("ReadConfigFile({0}, {1})")]
    ReadConfigFile(std::io::Error, String),
    #[error("ConvertTOMLToConfig({0})")]
    ConvertTOMLToConfig(#[from] toml::de::Error),
    #[error("NoConfigDirectory")]
    NoConfigDirectory,
}

/// Reasons a token was rejected. These are only ever logged, callers see a
/// single invalid outcome.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("InvalidFormat")]
    InvalidFormat,
    #[error("SignatureMismatch")]
    SignatureMismatch,
    #[error("PayloadBase64Decode({0})")]
    PayloadBase64Decode(#[from] base64::DecodeError),
    #[error("PayloadDeserialisation({0})")]
    PayloadDeserialisation(serde_json::Error),
    #[error("Serialisation({0})")]
    Serialisation(serde_json::Error),
    #[error("ExpiryOutOfRange({0})")]
    ExpiryOutOfRange(i64),
    #[error("Expired")]
    Expired,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("InvalidAddress({0})")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("BuildMessage({0})")]
    BuildMessage(#[from] lettre::error::Error),
    #[error("Transport({0})")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Error, Debug)]
pub enum InviteError {
    #[error("InvalidInvite")]
    InvalidInvite,
    #[error("EmailMismatch")]
    EmailMismatch,
    #[error("AlreadyRegistered({0})")]
    AlreadyRegistered(String),
    #[error("PasswordHash({0})")]
    PasswordHash(#[from] argon2::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config({0})")]
    Config(#[from] ConfigError),
    #[error("Token({0})")]
    Token(#[from] TokenError),
    #[error("Mail({0})")]
    Mail(#[from] MailError),
    #[error("Invite({0})")]
    Invite(#[from] InviteError),
    #[error("Io({0})")]
    Io(#[from] std::io::Error),
}
