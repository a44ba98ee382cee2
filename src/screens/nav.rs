use serde::Serialize;

use crate::session::Session;

/// Top-level destinations of the navigation stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    Login,
    Dashboard,
    AdminTabs,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::AdminTabs => "AdminTabs",
        }
    }
}

/// Navigation stack. Logging out resets it to the login screen and clears
/// the session.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
    session: Session,
}

impl Navigator {
    pub fn new(session: Session) -> Self {
        Self {
            stack: vec![Route::Login],
            session,
        }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Login)
    }

    pub fn navigate(&mut self, route: Route) {
        if self.current() != route {
            tracing::debug!("navigate {} -> {}", self.current().name(), route.name());
            self.stack.push(route);
        }
    }

    pub fn back(&mut self) -> Route {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }

    pub fn reset_to_login(&mut self) {
        self.session.sign_out();
        self.stack.clear();
        self.stack.push(Route::Login);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
