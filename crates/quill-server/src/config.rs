use quill_crypto::PasswordScheme;

/// Secrets that ship in examples and must never sign real cookies.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me", "katamari"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub secret: String,
    pub db_path: String,
    pub host: String,
    pub port: u16,
    pub password_scheme: PasswordScheme,
    pub cookie_hardened: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = get("QUILL_SECRET").unwrap_or_default();
        if secret.is_empty() {
            return Err(ConfigError::Missing("QUILL_SECRET"));
        }
        if PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
            return Err(ConfigError::Invalid("QUILL_SECRET", "still a placeholder".into()));
        }

        let db_path = get("QUILL_DB_PATH").unwrap_or_else(|| "quill.db".into());
        let host = get("QUILL_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("QUILL_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::Invalid("QUILL_PORT", e.to_string()))?;

        let password_scheme: PasswordScheme = match get("QUILL_PASSWORD_SCHEME") {
            Some(v) => v
                .parse()
                .map_err(|e: String| ConfigError::Invalid("QUILL_PASSWORD_SCHEME", e))?,
            None => PasswordScheme::default(),
        };

        let cookie_hardened = match get("QUILL_COOKIE_HARDENED").as_deref() {
            None | Some("") => false,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                return Err(ConfigError::Invalid("QUILL_COOKIE_HARDENED", other.to_string()));
            }
        };

        Ok(Self {
            secret,
            db_path,
            host,
            port,
            password_scheme,
            cookie_hardened,
        })
    }
}
