//! Password strength rules and the known-weak denylist.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use atrium_shared::config::PasswordPolicyConfig;

/// Known-weak passwords rejected regardless of character classes.
const BUILTIN_DENYLIST: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "letmein",
    "iloveyou",
    "admin123",
    "welcome1",
];

/// Strength classification for a password that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    /// Meets the policy but little more.
    Weak,
    /// Reasonable length and class diversity.
    Medium,
    /// Long with all four character classes.
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Medium => write!(f, "medium"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

/// Configurable password policy.
///
/// `validate` is the hard gate; `strength` is the separate UX hint and is
/// only meaningful for passwords that pass the gate.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
    require_special: bool,
    denylist: HashSet<String>,
}

impl PasswordPolicy {
    /// Builds a policy from configuration, merging the builtin denylist with
    /// any configured additions.
    #[must_use]
    pub fn from_config(config: &PasswordPolicyConfig) -> Self {
        let denylist = BUILTIN_DENYLIST
            .iter()
            .map(|s| (*s).to_string())
            .chain(config.extra_denylist.iter().map(|s| s.to_lowercase()))
            .collect();

        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            require_special: config.require_special,
            denylist,
        }
    }

    /// Validates a password, returning the complete ordered violation list.
    ///
    /// An empty list means the password is acceptable.
    #[must_use]
    pub fn validate(&self, password: &str) -> Vec<String> {
        let mut violations = Vec::new();

        if password.chars().count() < self.min_length {
            violations.push(format!(
                "password must be at least {} characters long",
                self.min_length
            ));
        }
        if password.chars().count() > self.max_length {
            violations.push(format!(
                "password must be at most {} characters long",
                self.max_length
            ));
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push("password must contain an upper-case letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            violations.push("password must contain a lower-case letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("password must contain a digit".to_string());
        }
        if self.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            violations.push("password must contain a special character".to_string());
        }
        if self.denylist.contains(&password.to_lowercase()) {
            violations.push("password is on the list of known weak passwords".to_string());
        }

        violations
    }

    /// Returns true if the password passes the policy.
    #[must_use]
    pub fn is_valid(&self, password: &str) -> bool {
        self.validate(password).is_empty()
    }

    /// Classifies the strength of a valid password.
    ///
    /// Returns `None` for a password that fails `validate`; strength is only
    /// meaningful for valid passwords.
    #[must_use]
    pub fn strength(&self, password: &str) -> Option<PasswordStrength> {
        if !self.is_valid(password) {
            return None;
        }

        let length = password.chars().count();
        let classes = usize::from(password.chars().any(|c| c.is_ascii_uppercase()))
            + usize::from(password.chars().any(|c| c.is_ascii_lowercase()))
            + usize::from(password.chars().any(|c| c.is_ascii_digit()))
            + usize::from(password.chars().any(|c| !c.is_alphanumeric()));

        if length >= 12 && classes == 4 {
            Some(PasswordStrength::Strong)
        } else if length >= 10 && classes >= 3 {
            Some(PasswordStrength::Medium)
        } else {
            Some(PasswordStrength::Weak)
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::from_config(&PasswordPolicyConfig::default())
    }
}
