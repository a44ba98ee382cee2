use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::{decode_claims, Claims, Role, TokenError};

/// Token plus the claims decoded from it at sign-in
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
    pub claims: Claims,
}

impl Credential {
    pub fn role(&self) -> Option<Role> {
        self.claims.parsed_role()
    }
}

/// Holder of the current credential, shared by the API client and every
/// screen. Cloning yields another handle on the same credential.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Credential>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the token and make it the current credential. On failure the
    /// previous credential, if any, is left untouched.
    pub fn sign_in(&self, token: impl Into<String>) -> Result<Option<Role>, TokenError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        let role = claims.parsed_role();

        tracing::debug!(
            "session signed in (role: {})",
            role.as_ref().map(Role::as_str).unwrap_or("none")
        );

        *self.write() = Some(Credential { token, claims });
        Ok(role)
    }

    pub fn sign_out(&self) {
        if self.write().take().is_some() {
            tracing::debug!("session signed out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|c| c.token.clone())
    }

    pub fn claims(&self) -> Option<Claims> {
        self.read().as_ref().map(|c| c.claims.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.read().as_ref().and_then(Credential::role)
    }

    pub fn credential(&self) -> Option<Credential> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Credential>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Credential>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    fn token(payload: &str) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = Session::new();
        assert!(!session.is_authenticated());

        let role = session.sign_in(token(r#"{"role":"ADMIN"}"#)).unwrap();
        assert_eq!(role, Some(Role::Admin));
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Admin));

        session.sign_out();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_clones_share_credential() {
        let session = Session::new();
        let handle = session.clone();
        session.sign_in(token(r#"{"role":"CONSULTANT"}"#)).unwrap();
        assert_eq!(handle.role(), Some(Role::Consultant));
        handle.sign_out();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_failed_sign_in_keeps_previous_credential() {
        let session = Session::new();
        let good = token(r#"{"role":"CONSULTANT"}"#);
        session.sign_in(good.clone()).unwrap();

        assert!(session.sign_in("garbage").is_err());
        assert_eq!(session.token(), Some(good));
    }
}
