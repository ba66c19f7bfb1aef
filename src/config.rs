use crate::{error::ConfigError, token::InviteSecret};
use axum::http::HeaderValue;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fmt, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use url::Url;

pub const INVITE_SECRET_ENV: &str = "INVITE_SECRET";
pub const ADMIN_TOKEN_ENV: &str = "ADMIN_TOKEN";
pub const SMTP_PASSWORD_ENV: &str = "SMTP_PASSWORD";
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 1], 8886))
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Deserialize, Clone)]
pub struct SmtpConfig {
    pub server: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub sender_address: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender_address", &self.sender_address)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ConfigModel {
    #[serde(default = "default_bind_address")]
    bind_address: SocketAddr,
    #[serde(default)]
    allowed_origins: Vec<String>,
    sign_up_url: String,
    smtp: Option<SmtpConfig>,
    admin_token: Option<String>,
    invite_secret: Option<String>,
    log_directory: Option<PathBuf>,
}

/// Startup configuration. Anything token dependent routes need is validated
/// here so a misconfigured process never starts serving.
pub struct Config {
    pub bind_address: SocketAddr,
    allowed_origins: Vec<HeaderValue>,
    sign_up_url: Url,
    pub smtp: Option<SmtpConfig>,
    admin_token: String,
    invite_secret: InviteSecret,
    pub log_directory: Option<PathBuf>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        match ProjectDirs::from("com", "zenapt", "invite") {
            Some(project_dirs) => Ok(project_dirs.config_dir().join("config.toml")),
            None => Err(ConfigError::NoConfigDirectory),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml_string = match fs::read_to_string(path) {
            Ok(toml_string) => toml_string,
            Err(err) => {
                return Err(ConfigError::ReadConfigFile(
                    err,
                    path.display().to_string(),
                ))
            }
        };
        Self::from_toml_str(&toml_string, |key| std::env::var(key).ok())
    }

    /// `env` is consulted for [`INVITE_SECRET_ENV`], [`ADMIN_TOKEN_ENV`],
    /// [`SMTP_PASSWORD_ENV`] and [`CORS_ORIGINS_ENV`], which take precedence over the file.
    pub fn from_toml_str<F>(toml_string: &str, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut model: ConfigModel = toml::from_str(toml_string)?;

        if let Some(invite_secret) = env(INVITE_SECRET_ENV) {
            model.invite_secret = Some(invite_secret);
        }
        if let Some(admin_token) = env(ADMIN_TOKEN_ENV) {
            model.admin_token = Some(admin_token);
        }
        if let Some(cors_origins) = env(CORS_ORIGINS_ENV) {
            model.allowed_origins = cors_origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }
        if let (Some(smtp), Some(password)) = (model.smtp.as_mut(), env(SMTP_PASSWORD_ENV)) {
            smtp.password = password;
        }

        let invite_secret = InviteSecret::new(model.invite_secret.unwrap_or_default())?;
        let admin_token = match model.admin_token {
            Some(admin_token) if !admin_token.is_empty() => admin_token,
            _ => return Err(ConfigError::MissingAdminToken),
        };
        if model.allowed_origins.is_empty() {
            return Err(ConfigError::MissingAllowedOrigins);
        }
        let mut allowed_origins: Vec<HeaderValue> = Vec::new();
        for allowed_origin in model.allowed_origins.into_iter() {
            let allowed_origin_: HeaderValue = match allowed_origin.parse() {
                Ok(allowed_origin) => allowed_origin,
                Err(err) => return Err(ConfigError::InvalidOrigin(err, allowed_origin)),
            };
            allowed_origins.push(allowed_origin_);
        }
        let sign_up_url = Url::parse(&model.sign_up_url)?;

        Ok(Self {
            bind_address: model.bind_address,
            allowed_origins,
            sign_up_url,
            smtp: model.smtp,
            admin_token,
            invite_secret,
            log_directory: model.log_directory,
        })
    }

    pub fn get_allowed_origins(&self) -> &Vec<HeaderValue> {
        &self.allowed_origins
    }

    pub fn get_sign_up_url(&self) -> &Url {
        &self.sign_up_url
    }

    pub fn get_admin_token(&self) -> &str {
        &self.admin_token
    }

    pub fn get_invite_secret(&self) -> &InviteSecret {
        &self.invite_secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const BASE: &str = r#"
        allowed_origins = ["https://app.zenapt.com", "https://admin.zenapt.com"]
        sign_up_url = "https://app.zenapt.com/sign-up"
        admin_token = "file-admin-token"
        invite_secret = "file-secret"
    "#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_file_values_and_defaults() {
        let config = Config::from_toml_str(BASE, no_env).unwrap();
        assert_eq!(config.bind_address, default_bind_address());
        assert_eq!(config.get_allowed_origins().len(), 2);
        assert_eq!(
            config.get_sign_up_url().as_str(),
            "https://app.zenapt.com/sign-up"
        );
        assert_eq!(config.get_admin_token(), "file-admin-token");
        assert_eq!(config.get_invite_secret().as_bytes(), b"file-secret");
        assert!(config.smtp.is_none());
        assert!(config.log_directory.is_none());
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (INVITE_SECRET_ENV, "env-secret"),
            (ADMIN_TOKEN_ENV, "env-admin-token"),
            (CORS_ORIGINS_ENV, " https://a.example , ,https://b.example"),
            (SMTP_PASSWORD_ENV, "env-smtp-password"),
        ]);
        let toml_string = format!(
            "{}\n[smtp]\nserver = \"smtp.example.com\"\nsender_address = \"invites@zenapt.com\"\nusername = \"mailer\"\n",
            BASE
        );
        let config =
            Config::from_toml_str(&toml_string, |key| env.get(key).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.get_invite_secret().as_bytes(), b"env-secret");
        assert_eq!(config.get_admin_token(), "env-admin-token");
        assert_eq!(
            config.get_allowed_origins(),
            &vec![
                HeaderValue::from_static("https://a.example"),
                HeaderValue::from_static("https://b.example")
            ]
        );
        let smtp = config.smtp.as_ref().unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.password, "env-smtp-password");
        assert!(!format!("{:?}", smtp).contains("env-smtp-password"));
    }

    #[test]
    fn missing_secret_fails_fast() {
        let toml_string = BASE.replace("invite_secret = \"file-secret\"", "");
        assert!(matches!(
            Config::from_toml_str(&toml_string, no_env),
            Err(ConfigError::MissingInviteSecret)
        ));
        let toml_string = BASE.replace("\"file-secret\"", "\"\"");
        assert!(matches!(
            Config::from_toml_str(&toml_string, no_env),
            Err(ConfigError::MissingInviteSecret)
        ));
    }

    #[test]
    fn missing_admin_token_and_origins_fail() {
        let toml_string = BASE.replace("admin_token = \"file-admin-token\"", "");
        assert!(matches!(
            Config::from_toml_str(&toml_string, no_env),
            Err(ConfigError::MissingAdminToken)
        ));
        assert!(matches!(
            Config::from_toml_str(BASE, |key| (key == CORS_ORIGINS_ENV).then(|| " , ".to_string())),
            Err(ConfigError::MissingAllowedOrigins)
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let toml_string = BASE.replace("https://app.zenapt.com/sign-up", "not a url");
        assert!(matches!(
            Config::from_toml_str(&toml_string, no_env),
            Err(ConfigError::InvalidSignUpUrl(_))
        ));
        assert!(matches!(
            Config::from_toml_str(BASE, |key| (key == CORS_ORIGINS_ENV)
                .then(|| "https://bad\norigin".to_string())),
            Err(ConfigError::InvalidOrigin(_, _))
        ));
        assert!(matches!(
            Config::from_toml_str("sign_up_url = 5", no_env),
            Err(ConfigError::ConvertTOMLToConfig(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/invite/config.toml")),
            Err(ConfigError::ReadConfigFile(_, _))
        ));
    }
}
