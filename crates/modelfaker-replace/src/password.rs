//! Credential hashing compatible with Django's `pbkdf2_sha256` hasher.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pbkdf2::pbkdf2_hmac;
use rand::distr::Alphanumeric;
use rand::{Rng, RngCore};
use sha2::Sha256;

pub const ALGORITHM: &str = "pbkdf2_sha256";
pub const DEFAULT_ITERATIONS: u32 = 600_000;
const SALT_LEN: usize = 22;
const HASH_LEN: usize = 32;

/// Hashes `raw` as `pbkdf2_sha256$<iterations>$<salt>$<base64 digest>`.
pub fn make_password(raw: &str, iterations: u32, rng: &mut dyn RngCore) -> String {
    let salt: String = (0..SALT_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();
    encode(raw, &salt, iterations)
}

/// Verifies `raw` against an encoded hash produced by `make_password`.
pub fn check_password(raw: &str, encoded: &str) -> bool {
    let mut parts = encoded.splitn(4, '$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(_)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if algorithm != ALGORITHM {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    constant_time_eq(encode(raw, salt, iterations).as_bytes(), encoded.as_bytes())
}

fn encode(raw: &str, salt: &str, iterations: u32) -> String {
    let mut digest = [0_u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(raw.as_bytes(), salt.as_bytes(), iterations, &mut digest);
    format!("{ALGORITHM}${iterations}${salt}${}", STANDARD.encode(digest))
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn encoded_hash_round_trips() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let encoded = make_password("JD", 1_000, &mut rng);
        assert!(encoded.starts_with("pbkdf2_sha256$1000$"));
        assert!(check_password("JD", &encoded));
        assert!(!check_password("JX", &encoded));
    }

    #[test]
    fn salts_differ_between_calls() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let first = make_password("JD", 1_000, &mut rng);
        let second = make_password("JD", 1_000, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn rejects_foreign_formats() {
        assert!(!check_password("JD", "md5$abc$def"));
        assert!(!check_password("JD", "pbkdf2_sha256$x$salt$hash"));
        assert!(!check_password("JD", "garbage"));
    }
}
