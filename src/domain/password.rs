use validator::ValidationError;
use zxcvbn::zxcvbn;

const MIN_LENGTH: usize = 6;
const MIN_STRENGTH_SCORE: u8 = 2;

/// Length floor plus a zxcvbn strength score, with zxcvbn's feedback in the message.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Password must be at least {} characters", MIN_LENGTH).into());
        return Err(error);
    }

    let estimate = zxcvbn(password, &[]);
    let score = estimate.score() as u8;

    if score < MIN_STRENGTH_SCORE {
        let feedback = estimate.feedback()
            .and_then(|f| f.warning().map(|w| w.to_string()))
            .unwrap_or_else(|| "Add another word or two".to_string());

        let mut error = ValidationError::new("password_strength");
        error.message = Some(format!("Password is too weak: {}", feedback).into());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_passwords() {
        let err = validate_password_strength("abc").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn rejects_common_passwords() {
        let err = validate_password_strength("password").unwrap_err();
        assert_eq!(err.code, "password_strength");
    }

    #[test]
    fn accepts_passphrases() {
        assert!(validate_password_strength("violet-harbor-lantern-42").is_ok());
    }
}
