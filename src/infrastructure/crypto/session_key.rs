//! Session cookie signing key

use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;

/// Derives the cookie signing key from the configured secret. Any secret
/// length is accepted; the SHA-512 digest supplies the 64 bytes `Key` needs.
pub fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
