//! Name search with an autocomplete list.
//!
//! When nothing matches, the only option is "Create User", which opens the
//! user-create page.

use dioxus::prelude::*;
use schedule_types::User;

use crate::app::api;
use crate::app::Route;
use crate::users::{resolve_pick, search_options, SearchPick};

#[derive(Props, Clone, PartialEq)]
pub struct UserSearchInputProps {
    /// Input label
    pub label: String,
    /// Called with the picked user
    pub on_select: EventHandler<User>,
    #[props(default = false)]
    pub autofocus: bool,
}

#[component]
pub fn UserSearchInput(props: UserSearchInputProps) -> Element {
    let nav = use_navigator();
    let mut query = use_signal(String::new);

    let results = use_resource(move || {
        let name = query();
        async move {
            if name.trim().is_empty() {
                return None;
            }
            match api::fetch_json::<Vec<User>>(&api::search_users_url(name.trim())).await {
                Ok(users) => Some(users),
                Err(e) => {
                    tracing::warn!(error = %e, "User search failed");
                    None
                }
            }
        }
    });

    let found = results.read().clone().flatten();
    let options = found.as_deref().map(search_options).unwrap_or_default();

    let mut pick = move |value: String| {
        let users = results.read().clone().flatten().unwrap_or_default();
        match resolve_pick(&value, &users) {
            SearchPick::User(user) => {
                query.set(String::new());
                props.on_select.call(user);
            }
            SearchPick::CreateUser => {
                nav.push(Route::UserCreate {});
            }
            SearchPick::Nothing => {}
        }
    };

    rsx! {
        label {
            "{props.label}"
            input {
                r#type: "search",
                autofocus: props.autofocus,
                value: "{query}",
                oninput: move |evt| query.set(evt.value()),
            }
        }
        if !options.is_empty() {
            ul { class: "search-options",
                for option in options {
                    li {
                        key: "{option}",
                        onclick: {
                            let option = option.clone();
                            move |_| pick(option.clone())
                        },
                        "{option}"
                    }
                }
            }
        }
    }
}
