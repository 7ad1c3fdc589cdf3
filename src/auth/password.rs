use hmac::digest::Key;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

use crate::database::models::Credentials;

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes; the salt doubles as the HMAC key and fills one SHA-512 block.
pub const SALT_LEN: usize = 128;

/// Hash `password` under a fresh random salt.
pub fn hash_password(password: &str) -> Credentials {
    let mut salt = Key::<HmacSha512>::default();
    rand::thread_rng().fill_bytes(&mut salt);

    let mut mac = <HmacSha512 as Mac>::new(&salt);
    mac.update(password.as_bytes());
    let hash = mac.finalize().into_bytes().to_vec();

    Credentials {
        hash,
        salt: salt.to_vec(),
    }
}

/// Constant-time comparison against stored credentials.
pub fn verify_password(password: &str, credentials: &Credentials) -> bool {
    let Ok(mut mac) = HmacSha512::new_from_slice(&credentials.salt) else {
        return false;
    };
    mac.update(password.as_bytes());
    mac.verify_slice(&credentials.hash).is_ok()
}
