//! DNS-backed email domain existence check.
//!
//! This performs network I/O and is a distinct, explicitly-invoked operation;
//! it is never folded into [`crate::credential::EmailPolicy::validate`], which
//! must stay a fast, pure path.

use tokio::net::lookup_host;

/// SMTP port used when resolving the mail domain.
const SMTP_PORT: u16 = 25;

/// Returns true if the address' domain resolves in DNS.
///
/// Resolution failures (including malformed addresses) report `false`; this
/// is a best-effort signal, not a deliverability guarantee.
pub async fn domain_resolves(email: &str) -> bool {
    let Some((_, domain)) = email.trim().rsplit_once('@') else {
        return false;
    };
    if domain.is_empty() {
        return false;
    }

    match lookup_host((domain, SMTP_PORT)).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_address_does_not_resolve() {
        assert!(!domain_resolves("not-an-email").await);
        assert!(!domain_resolves("user@").await);
    }

    #[tokio::test]
    async fn test_unresolvable_domain() {
        assert!(!domain_resolves("user@no-such-domain.invalid").await);
    }
}
