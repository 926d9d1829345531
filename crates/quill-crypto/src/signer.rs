use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = '|';
const SIGNATURE_HEX_LEN: usize = 64;

/// Binds a value to the process secret so it can round-trip through the
/// client unmodified. Tokens look like `value|hex(hmac_sha256(secret, value))`.
#[derive(Clone)]
pub struct CookieSigner {
    mac: HmacSha256,
}

impl CookieSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        // HMAC pads or hashes the key, so every length is accepted.
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .expect("HMAC accepts keys of any length");
        Self { mac }
    }

    pub fn sign(&self, value: &str) -> String {
        let tag = self.mac.clone().chain_update(value.as_bytes()).finalize();
        format!("{}{}{}", value, SEPARATOR, hex::encode(tag.into_bytes()))
    }

    /// Returns the payload only if the signature segment is exactly the
    /// lowercase hex digest of the payload under our secret.
    pub fn unsign(&self, token: &str) -> Option<String> {
        let (value, signature) = token.split_once(SEPARATOR)?;

        if signature.len() != SIGNATURE_HEX_LEN
            || !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return None;
        }
        let supplied = hex::decode(signature).ok()?;

        self.mac
            .clone()
            .chain_update(value.as_bytes())
            .verify_slice(&supplied)
            .ok()?;

        Some(value.to_string())
    }
}

impl std::fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSigner").finish_non_exhaustive()
    }
}
