//! Credentials supplied by the external auth provider.

use crate::domain::types::UserRole;

/// Snapshot of the caller's session as reported by the auth provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
    pub role: Option<UserRole>,
}

impl Credentials {
    pub fn new(token: impl Into<String>, role: Option<UserRole>) -> Self {
        Self {
            token: Some(token.into()),
            role,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Bearer token, if a non-blank one is present.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Source of the current credentials, injected into list controllers.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Credentials;
}

/// Fixed credentials, e.g. read once from configuration.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Credentials {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_not_authenticated() {
        assert!(!Credentials::new("   ", None).is_authenticated());
        assert!(!Credentials::anonymous().is_authenticated());
        assert_eq!(Credentials::new(" abc ", None).token(), Some("abc"));
    }
}
