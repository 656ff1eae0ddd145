//! Argon2id hashing for locally registered accounts.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// PHC-formatted Argon2id hash with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn is_strong_enough(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length
}

/// Loose shape check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("open sesame").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("open sesame", &hash).unwrap());
        assert!(!verify_password("open sesame!", &hash).unwrap());
    }

    #[test]
    fn strength_counts_characters_not_bytes() {
        assert!(is_strong_enough("123456", 6));
        assert!(!is_strong_enough("12345", 6));
        assert!(is_strong_enough("ééééé", 5));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("reader@example.com"));
        assert!(!is_valid_email("reader@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("read er@example.com"));
        assert!(!is_valid_email("reader@.com"));
    }
}
