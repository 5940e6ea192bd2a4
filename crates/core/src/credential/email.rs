//! Email format rules and disposable-domain rejection.
//!
//! This is the fast validation path: pure string checks, no network access.
//! The DNS-backed existence check lives in [`crate::credential::dns`] and is
//! never implied by `validate`.

use std::collections::HashSet;

use atrium_shared::config::EmailPolicyConfig;

/// Maximum total length of an address.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of the local part.
const MAX_LOCAL_LENGTH: usize = 64;

/// Well-known disposable-email domains.
const BUILTIN_DISPOSABLE: &[&str] = &[
    "mailinator.com",
    "guerrillamail.com",
    "10minutemail.com",
    "tempmail.com",
    "temp-mail.org",
    "yopmail.com",
    "trashmail.com",
    "sharklasers.com",
];

/// Configurable email format policy.
#[derive(Debug, Clone)]
pub struct EmailPolicy {
    reject_disposable: bool,
    disposable_domains: HashSet<String>,
}

impl EmailPolicy {
    /// Builds a policy from configuration, merging the builtin disposable
    /// list with any configured additions.
    #[must_use]
    pub fn from_config(config: &EmailPolicyConfig) -> Self {
        let disposable_domains = BUILTIN_DISPOSABLE
            .iter()
            .map(|s| (*s).to_string())
            .chain(
                config
                    .extra_disposable_domains
                    .iter()
                    .map(|s| s.to_lowercase()),
            )
            .collect();

        Self {
            reject_disposable: config.reject_disposable,
            disposable_domains,
        }
    }

    /// Normalizes an address for storage and lookup: trims surrounding
    /// whitespace and lowercases.
    #[must_use]
    pub fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Validates an address, returning the complete ordered violation list.
    ///
    /// An empty list means the address is acceptable.
    #[must_use]
    pub fn validate(&self, email: &str) -> Vec<String> {
        let email = email.trim();
        let mut violations = Vec::new();

        if email.is_empty() {
            violations.push("email is required".to_string());
            return violations;
        }
        if email.len() > MAX_EMAIL_LENGTH {
            violations.push(format!(
                "email must be at most {MAX_EMAIL_LENGTH} characters long"
            ));
        }

        let mut parts = email.split('@');
        let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => (local, domain),
            _ => {
                violations.push("email must contain exactly one '@'".to_string());
                return violations;
            }
        };

        self.validate_local(local, &mut violations);
        self.validate_domain(domain, &mut violations);

        violations
    }

    /// Returns true if the address passes the format policy.
    #[must_use]
    pub fn is_valid(&self, email: &str) -> bool {
        self.validate(email).is_empty()
    }

    fn validate_local(&self, local: &str, violations: &mut Vec<String>) {
        if local.is_empty() {
            violations.push("email local part must not be empty".to_string());
            return;
        }
        if local.len() > MAX_LOCAL_LENGTH {
            violations.push(format!(
                "email local part must be at most {MAX_LOCAL_LENGTH} characters long"
            ));
        }
        if local.starts_with('.') || local.ends_with('.') {
            violations.push("email local part must not start or end with a dot".to_string());
        }
        if local.contains("..") {
            violations.push("email local part must not contain consecutive dots".to_string());
        }
    }

    fn validate_domain(&self, domain: &str, violations: &mut Vec<String>) {
        if domain.is_empty() {
            violations.push("email domain must not be empty".to_string());
            return;
        }
        if domain.starts_with('.') || domain.ends_with('.') {
            violations.push("email domain must not start or end with a dot".to_string());
        }
        if domain.starts_with('-') || domain.ends_with('-') {
            violations.push("email domain must not start or end with a hyphen".to_string());
        }
        if domain.contains("..") {
            violations.push("email domain must not contain consecutive dots".to_string());
        }
        if !domain.contains('.') {
            violations.push("email domain must contain a dot".to_string());
            return;
        }

        for label in domain.split('.').filter(|label| !label.is_empty()) {
            if label.starts_with('-') || label.ends_with('-') {
                violations
                    .push("email domain labels must not start or end with a hyphen".to_string());
                break;
            }
        }

        if let Some(tld) = domain.rsplit('.').next() {
            if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
                violations.push(
                    "email top-level domain must be at least two alphabetic characters"
                        .to_string(),
                );
            }
        }

        if self.reject_disposable && self.disposable_domains.contains(&domain.to_lowercase()) {
            violations.push("disposable email domains are not accepted".to_string());
        }
    }
}

impl Default for EmailPolicy {
    fn default() -> Self {
        Self::from_config(&EmailPolicyConfig::default())
    }
}
