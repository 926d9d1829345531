use std::str::FromStr;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::Rng;
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use tracing::warn;

const SALT_LEN: usize = 5;
const SALT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ARGON2_PREFIX: &str = "$argon2";

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// Scheme used for newly issued tokens. Verification accepts either kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    /// `salt,hex(sha256(name ++ password ++ salt))`
    #[default]
    Legacy,
    /// Argon2id PHC string over `name ++ password`.
    Argon2,
}

impl PasswordScheme {
    pub fn hash(self, name: &str, password: &str) -> Result<String, PasswordError> {
        match self {
            Self::Legacy => Ok(hash_password(name, password, None)),
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(format!("{name}{password}").as_bytes(), &salt)
                    .map(|h| h.to_string())
                    .map_err(|e| PasswordError(e.to_string()))
            }
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "sha256" => Ok(Self::Legacy),
            "argon2" | "argon2id" => Ok(Self::Argon2),
            other => Err(format!("unknown password scheme '{other}'")),
        }
    }
}

/// Five random ASCII letters.
pub fn make_salt() -> String {
    let mut rng = rand::rng();
    (0..SALT_LEN)
        .map(|_| SALT_ALPHABET[rng.random_range(0..SALT_ALPHABET.len())] as char)
        .collect()
}

/// Build a legacy token. A missing or empty salt is replaced with a fresh one.
pub fn hash_password(name: &str, password: &str, salt: Option<&str>) -> String {
    let salt = match salt {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => make_salt(),
    };
    format!("{},{}", salt, digest(name, password, &salt))
}

/// Check a candidate password against a stored token of either scheme.
/// Malformed tokens never verify.
pub fn verify_password(name: &str, password: &str, token: &str) -> bool {
    if token.starts_with(ARGON2_PREFIX) {
        let Ok(parsed) = PasswordHash::new(token) else {
            warn!("Stored argon2 token failed to parse");
            return false;
        };
        return Argon2::default()
            .verify_password(format!("{name}{password}").as_bytes(), &parsed)
            .is_ok();
    }

    let Some((salt, _)) = token.split_once(',') else {
        return false;
    };
    if salt.is_empty() {
        return false;
    }
    token == hash_password(name, password, Some(salt))
}

fn digest(name: &str, password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
