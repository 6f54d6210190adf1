//! Login page component.

use dioxus::prelude::*;
use schedule_types::AuthSession;

use crate::app::api;
use crate::app::components::{use_notifier, Layout};
use crate::app::session::use_session;
use crate::app::Route;
use crate::forms::FieldErrors;
use crate::users::LoginForm;

#[component]
pub fn Login() -> Element {
    let session = use_session();
    let notifier = use_notifier();
    let nav = use_navigator();
    let mut form = use_signal(LoginForm::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut submitting = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let validated = form.read().validate();
        match validated {
            Err(e) => errors.set(e),
            Ok(input) => {
                errors.set(FieldErrors::new());
                submitting.set(true);
                spawn(async move {
                    let result = api::post_json::<_, AuthSession>("/api/auth/login", &input).await;
                    submitting.set(false);
                    match result {
                        Ok(auth) => {
                            notifier.success(format!("Welcome back, {}", auth.user.full_name()));
                            session.sign_in(auth);
                            nav.push(Route::Schedule {});
                        }
                        Err(e) => notifier.error(e.to_string()),
                    }
                });
            }
        }
    };

    let current = form.read().clone();
    let errs = errors();

    rsx! {
        Layout {
            title: "Login".to_string(),
            nav_active: "login".to_string(),

            article {
                header { h2 { "Log in" } }
                form { onsubmit: submit,
                    label {
                        "Email"
                        input {
                            r#type: "email",
                            autofocus: true,
                            value: "{current.email}",
                            oninput: move |evt| form.write().email = evt.value(),
                        }
                        if let Some(message) = errs.get("email") {
                            small { class: "field-error", "{message}" }
                        }
                    }
                    label {
                        "Password"
                        input {
                            r#type: "password",
                            value: "{current.password}",
                            oninput: move |evt| form.write().password = evt.value(),
                        }
                        if let Some(message) = errs.get("password") {
                            small { class: "field-error", "{message}" }
                        }
                    }
                    button {
                        r#type: "submit",
                        "aria-busy": if submitting() { "true" } else { "false" },
                        disabled: submitting(),
                        "Log in"
                    }
                }
                footer {
                    small {
                        "No account yet? "
                        Link { to: Route::Register {}, "Register" }
                    }
                }
            }
        }
    }
}
