//! Register page component.
//!
//! A new account is signed in straight away.

use dioxus::prelude::*;
use schedule_types::{AuthSession, LoginInput, User};

use crate::app::api;
use crate::app::components::{use_notifier, Layout};
use crate::app::session::use_session;
use crate::app::Route;
use crate::forms::FieldErrors;
use crate::users::RegisterForm;

#[component]
pub fn Register() -> Element {
    let session = use_session();
    let notifier = use_notifier();
    let nav = use_navigator();
    let mut form = use_signal(RegisterForm::default);
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
                    let login = LoginInput {
                        email: input.email.clone(),
                        password: input.password.clone(),
                    };
                    let registered = api::post_json::<_, User>("/api/auth/register", &input).await;
                    let result = match registered {
                        Ok(_) => api::post_json::<_, AuthSession>("/api/auth/login", &login).await,
                        Err(e) => Err(e),
                    };
                    submitting.set(false);
                    match result {
                        Ok(auth) => {
                            notifier.success(format!("Welcome, {}", auth.user.full_name()));
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
            title: "Register".to_string(),
            nav_active: "register".to_string(),

            article {
                header { h2 { "Create an account" } }
                form { onsubmit: submit,
                    div { class: "grid",
                        label {
                            "First name"
                            input {
                                autofocus: true,
                                value: "{current.first_name}",
                                oninput: move |evt| form.write().first_name = evt.value(),
                            }
                            if let Some(message) = errs.get("firstName") {
                                small { class: "field-error", "{message}" }
                            }
                        }
                        label {
                            "Last name"
                            input {
                                value: "{current.last_name}",
                                oninput: move |evt| form.write().last_name = evt.value(),
                            }
                            if let Some(message) = errs.get("lastName") {
                                small { class: "field-error", "{message}" }
                            }
                        }
                    }
                    label {
                        "Email"
                        input {
                            r#type: "email",
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
                        "Register"
                    }
                }
                footer {
                    small {
                        "Already registered? "
                        Link { to: Route::Login {}, "Log in" }
                    }
                }
            }
        }
    }
}
