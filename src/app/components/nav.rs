//! Navigation bar.

use dioxus::prelude::*;

use crate::app::session::use_session;
use crate::app::Route;

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "schedule", "users")
    pub active: String,
}

#[component]
pub fn Nav(props: NavProps) -> Element {
    let session = use_session();
    let nav = use_navigator();

    let link_class = |page: &str| if props.active == page { "contrast" } else { "secondary" };
    let user = session.user();

    rsx! {
        nav {
            ul {
                li {
                    Link { to: Route::Schedule {}, strong { "Dive Schedule" } }
                }
            }
            ul {
                li {
                    Link { to: Route::Schedule {}, class: link_class("schedule"), "Schedule" }
                }
                li {
                    Link { to: Route::UserList {}, class: link_class("users"), "Users" }
                }
                if let Some(user) = user {
                    li { small { {user.full_name().to_string()} } }
                    li {
                        a {
                            href: "#",
                            onclick: move |evt: MouseEvent| {
                                evt.prevent_default();
                                session.sign_out();
                                nav.push(Route::Login {});
                            },
                            "Log out"
                        }
                    }
                } else {
                    li {
                        Link { to: Route::Login {}, class: link_class("login"), "Login" }
                    }
                    li {
                        Link { to: Route::Register {}, class: link_class("register"), "Register" }
                    }
                }
            }
        }
    }
}
