//! Dioxus application entry point.
//!
//! This module provides the main App component that serves as the root
//! of the Dioxus application.

use dioxus::prelude::*;

pub mod api;
pub mod components;
pub mod pages;
pub mod session;

use components::use_notifier_provider;
use pages::{Login, Register, Schedule, UserCreate, UserEdit, UserList};
use session::use_session_provider;

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Contexts shared by every page
    use_session_provider();
    use_notifier_provider();

    rsx! {
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Schedule {},
    #[route("/users")]
    UserList {},
    #[route("/users/new")]
    UserCreate {},
    #[route("/users/:id")]
    UserEdit { id: i64 },
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
}
