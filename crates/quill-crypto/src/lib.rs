//! Quill Crypto Library
//!
//! Credential hashing for stored passwords and HMAC signing for the
//! client-held session cookie. Nothing here touches storage or HTTP.

pub mod password;
pub mod signer;

pub use password::{PasswordError, PasswordScheme, hash_password, make_salt, verify_password};
pub use signer::CookieSigner;
