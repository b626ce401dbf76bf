use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

const MAX_PASSWORD_LENGTH: usize = 64;

fn check_length(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::ValidationError("Empty Password".to_string()));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::ValidationError("Password is too long".to_string()));
    }

    Ok(())
}

pub fn hash(password: impl AsRef<str>) -> Result<String, AppError> {
    let password = password.as_ref();
    check_length(password)?;

    let salt: SaltString = SaltString::generate(&mut OsRng);
    let hashed_password: String = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(hashed_password)
}

/// Checks `password` against a stored argon2 hash. A stored value that is not a
/// valid hash is reported as an error rather than as a mismatch.
pub fn compare(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    check_length(password)?;

    let password_hash: PasswordHash<'_> = PasswordHash::new(hashed_password)
        .map_err(|e| AppError::InternalError(format!("Invalid password hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &password_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_compare() {
        let hashed = hash("hunter22").unwrap();
        assert_ne!(hashed, "hunter22");
        assert!(compare("hunter22", &hashed).unwrap());
        assert!(!compare("hunter23", &hashed).unwrap());
    }

    #[test]
    fn test_length_limits() {
        assert!(matches!(hash(""), Err(AppError::ValidationError(_))));
        assert!(matches!(
            hash("x".repeat(MAX_PASSWORD_LENGTH + 1)),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_plaintext_stored_value_is_an_error() {
        assert!(compare("secret", "secret").is_err());
    }
}
