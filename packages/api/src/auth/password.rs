//! # Password policy for new accounts
//!
//! Sign-up refuses weak passwords locally, before anything is sent to the auth
//! service. A password is accepted when it has
//!
//! - at least [`MIN_PASSWORD_LENGTH`] characters,
//! - an ASCII uppercase letter and an ASCII lowercase letter,
//! - an ASCII digit,
//! - one of the symbols in [`PASSWORD_SYMBOLS`].
//!
//! All five conditions are reported together through [`PASSWORD_POLICY_MESSAGE`];
//! the user never sees a partial list.

/// Minimum number of characters (not bytes).
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols that satisfy the special-character rule.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const PASSWORD_POLICY_MESSAGE: &str =
    "Password must have 8+ chars, uppercase, lowercase, number, and special char.";

/// Check a password against the sign-up policy.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_strong_password() {
        assert!(validate_password("Abcdef1!"));
        assert!(validate_password("zZ9{longer-and-fine}"));
    }

    #[test]
    fn test_each_rule_is_required() {
        // Too short
        assert!(!validate_password("Abc1!"));
        // No uppercase
        assert!(!validate_password("abcdef1!"));
        // No lowercase
        assert!(!validate_password("ABCDEF1!"));
        // No digit
        assert!(!validate_password("Abcdefg!"));
        // No symbol
        assert!(!validate_password("Abc12345"));
        assert!(!validate_password("abcdefgh"));
        assert!(!validate_password(""));
    }

    #[test]
    fn test_symbols_outside_the_set_do_not_count() {
        assert!(!validate_password("Abcdef1-"));
        assert!(!validate_password("Abcdef1_"));
        assert!(validate_password("Abcdef1\""));
        assert!(validate_password("Abcdef1|"));
    }

    #[test]
    fn test_non_ascii_letters_do_not_count() {
        // Length is in characters, but only ASCII letters satisfy the case rules.
        assert!(!validate_password("ÄÖÜäöü1!"));
        assert!(validate_password("ÄBcdéf1!"));
    }
}
