use std::sync::Arc;

use crate::api::BackendApi;
use crate::auth::landing_route;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::session::Session;

use super::nav::Route;

pub const MISSING_FIELDS: &str = "Please fill in all fields";
pub const AUTH_FAILED: &str = "Authentication failed. Check your credentials.";
pub const NO_TOKEN: &str = "The server did not return a token";
pub const MALFORMED_TOKEN: &str = "Could not read your access rights from the returned token";

pub struct LoginScreen {
    api: Arc<dyn BackendApi>,
    session: Session,
    pub username: String,
    pub password: String,
    error: Option<String>,
    loading: bool,
}

impl LoginScreen {
    pub fn new(api: Arc<dyn BackendApi>, session: Session) -> Self {
        Self {
            api,
            session,
            username: String::new(),
            password: String::new(),
            error: None,
            loading: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Exchange the credentials for a token and pick the landing screen.
    /// Returns `None` when the user stays on the login screen; `error()` then
    /// says why.
    pub async fn submit(&mut self) -> Option<Route> {
        self.error = None;
        match self.authenticate().await {
            Ok(route) => {
                tracing::info!("'{}' signed in, landing on {}", self.username, route.name());
                self.password.clear();
                Some(route)
            }
            Err(e) => {
                tracing::warn!("login failed for '{}': {}", self.username, e);
                self.error = Some(login_message(&e));
                None
            }
        }
    }

    async fn authenticate(&mut self) -> ClientResult<Route> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ClientError::validation(MISSING_FIELDS));
        }

        // Whatever happens next, the previous credential is gone
        self.session.sign_out();

        self.loading = true;
        let result = self.api.login(&self.username, &self.password).await;
        self.loading = false;

        let token = result?
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::InvalidResponse(NO_TOKEN.to_string()))?;

        // Never fall back to a default role when the payload is unreadable
        self.session.sign_in(token)?;
        let claims = self.session.claims().ok_or(ClientError::NotAuthenticated)?;
        Ok(landing_route(&claims))
    }
}

fn login_message(err: &ClientError) -> String {
    match err.kind() {
        ErrorKind::Validation => err.message(),
        ErrorKind::MalformedToken => MALFORMED_TOKEN.to_string(),
        ErrorKind::Network if matches!(err, ClientError::InvalidResponse(_)) => NO_TOKEN.to_string(),
        ErrorKind::Network => AUTH_FAILED.to_string(),
    }
}
