//! Registration policy
//!
//! The simulator ships in two variants: the open one, where accounts have no
//! credential, and the PIN-protected one, which also enforces longer usernames.

use crate::types::BankError;

/// Minimum username length of the PIN-protected variant
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum PIN length of the PIN-protected variant
pub const MIN_PIN_LEN: usize = 4;

/// Rules applied when registering a new account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Minimum number of characters of the normalized username
    pub min_username_len: usize,

    /// Minimum PIN length, `None` when accounts carry no credential
    pub min_pin_len: Option<usize>,
}

impl RegistrationPolicy {
    /// First variant: any non-empty username, no credential
    pub const fn open() -> Self {
        RegistrationPolicy {
            min_username_len: 1,
            min_pin_len: None,
        }
    }

    /// Second variant: usernames of 3+ characters and a PIN of 4+ characters
    pub const fn pin_protected() -> Self {
        RegistrationPolicy {
            min_username_len: MIN_USERNAME_LEN,
            min_pin_len: Some(MIN_PIN_LEN),
        }
    }

    /// Whether new accounts must carry a PIN
    pub fn requires_pin(&self) -> bool {
        self.min_pin_len.is_some()
    }

    /// Validate a normalized username and the supplied PIN
    ///
    /// Returns the credential to store: the PIN under the protected variant,
    /// `None` under the open one (a supplied PIN is ignored there).
    ///
    /// # Errors
    ///
    /// - `InvalidUsername` if the username is empty or too short
    /// - `InvalidCredential` if a required PIN is missing or too short
    pub fn validate(&self, username: &str, pin: Option<&str>) -> Result<Option<String>, BankError> {
        let min_len = self.min_username_len.max(1);
        if username.chars().count() < min_len {
            return Err(BankError::invalid_username(username, min_len));
        }

        match self.min_pin_len {
            None => Ok(None),
            Some(min_pin) => {
                let pin = pin.unwrap_or_default();
                if pin.chars().count() < min_pin {
                    return Err(BankError::invalid_credential(username));
                }
                Ok(Some(pin.to_string()))
            }
        }
    }
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self::pin_protected()
    }
}
