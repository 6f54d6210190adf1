//! Logged-in user for the lifetime of the page.
//!
//! Nothing is persisted: a reload signs the user out. The session token lives
//! in a global signal so [`crate::app::api`] can attach it to every request.

use dioxus::prelude::*;
use schedule_types::{AuthSession, User};

static AUTH_TOKEN: GlobalSignal<Option<String>> = Signal::global(|| None);

/// Token from the last sign-in, if any.
pub fn auth_token() -> Option<String> {
    AUTH_TOKEN.peek().clone()
}

#[derive(Clone, Copy)]
pub struct Session(Signal<Option<User>>);

impl Session {
    pub fn user(&self) -> Option<User> {
        self.0.read().clone()
    }

    pub fn is_admin(&self) -> bool {
        self.0.read().as_ref().is_some_and(User::has_admin_role)
    }

    pub fn sign_in(mut self, session: AuthSession) {
        *AUTH_TOKEN.write() = Some(session.token);
        self.0.set(Some(session.user));
    }

    pub fn sign_out(mut self) {
        *AUTH_TOKEN.write() = None;
        self.0.set(None);
    }
}

/// Install the session context at the app root.
pub fn use_session_provider() -> Session {
    use_context_provider(|| Session(Signal::new(None)))
}

pub fn use_session() -> Session {
    use_context::<Session>()
}
