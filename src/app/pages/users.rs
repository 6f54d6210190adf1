//! User management pages: the sortable list plus create and edit forms.

use dioxus::prelude::*;
use schedule_types::{DeleteIds, Deleted, User, UserId};

use crate::app::api;
use crate::app::components::{use_notifier, Layout};
use crate::app::Route;
use crate::forms::FieldErrors;
use crate::users::{SortKey, SortOrder, UserForm, UserListState, CERT_LEVELS, ROWS_PER_PAGE_OPTIONS};

/// User list page component.
#[component]
pub fn UserList() -> Element {
    let notifier = use_notifier();
    let nav = use_navigator();
    let mut state = use_signal(UserListState::default);

    let mut users = use_resource(|| async { api::fetch_json::<Vec<User>>("/api/users").await });

    use_effect(move || {
        if let Some(Err(e)) = &*users.read() {
            notifier.error(e.to_string());
        }
    });

    let on_delete = move |_: MouseEvent| {
        let Some(ids) = state.peek().delete_request() else {
            return;
        };
        spawn(async move {
            match api::post_json::<_, Deleted>("/api/users/delete", &DeleteIds { ids }).await {
                Ok(result) => {
                    state.write().deletion_succeeded();
                    notifier.success(format!("Deleted {} user(s)", result.deleted));
                    users.restart();
                }
                Err(e) => notifier.error(e.to_string()),
            }
        });
    };

    let all: Vec<User> = match &*users.read() {
        Some(Ok(list)) => list.clone(),
        _ => Vec::new(),
    };
    let loading = users.read().is_none();
    let current = state.read().clone();
    let filtered = current.filtered(&all);
    let rows = current.page_rows(&all);
    let page_count = current.page_count(&all);
    let empty_rows = current.empty_rows(filtered.len());
    let selected_count = current.selected().len();
    let page = current.page;
    let heading = if selected_count > 0 {
        format!("{} selected", selected_count)
    } else {
        "Users".to_string()
    };

    rsx! {
        Layout {
            title: "Users".to_string(),
            nav_active: "users".to_string(),

            div { class: if selected_count > 0 { "toolbar highlighted" } else { "toolbar" },
                strong { "{heading}" }
                div { class: "actions",
                    if selected_count > 0 {
                        button { class: "contrast", onclick: on_delete, "Delete" }
                    } else {
                        input {
                            r#type: "search",
                            placeholder: "Filter by name",
                            value: "{current.filter_name}",
                            oninput: move |evt| state.write().set_filter(evt.value()),
                        }
                        button { onclick: move |_| { nav.push(Route::UserCreate {}); }, "New user" }
                    }
                }
            }

            table { class: "booking-table", "aria-busy": if loading { "true" } else { "false" },
                thead {
                    tr {
                        th {
                            input {
                                r#type: "checkbox",
                                checked: selected_count > 0 && selected_count == filtered.len(),
                                onchange: {
                                    let filtered = filtered.clone();
                                    move |evt: FormEvent| state.write().select_all(evt.checked(), &filtered)
                                },
                            }
                        }
                        for (key, label) in SortKey::COLUMNS {
                            th {
                                key: "{label}",
                                onclick: move |_| state.write().request_sort(key),
                                "{label}"
                                if current.order_by == key {
                                    {sort_marker(current.order)}
                                }
                            }
                        }
                        th {}
                    }
                }
                tbody {
                    for user in rows {
                        UserRow {
                            key: "{user.id}",
                            selected: current.is_selected(user.id),
                            user: user.clone(),
                            on_toggle: move |id: UserId| state.write().toggle(id),
                        }
                    }
                    for index in 0..empty_rows {
                        tr { key: "empty-{index}", class: "blank",
                            td { colspan: "6" }
                        }
                    }
                }
            }

            div { class: "grid",
                label {
                    "Rows per page"
                    select {
                        onchange: move |evt| {
                            if let Ok(rows) = evt.value().parse::<usize>() {
                                state.write().set_rows_per_page(rows);
                            }
                        },
                        for option in ROWS_PER_PAGE_OPTIONS {
                            option {
                                value: "{option}",
                                selected: current.rows_per_page == option,
                                "{option}"
                            }
                        }
                    }
                }
                div { class: "actions",
                    button {
                        class: "secondary",
                        disabled: page == 0,
                        onclick: move |_| state.write().set_page(page.saturating_sub(1)),
                        "Previous"
                    }
                    span { " Page {page + 1} of {page_count} " }
                    button {
                        class: "secondary",
                        disabled: page + 1 >= page_count,
                        onclick: move |_| state.write().set_page(page + 1),
                        "Next"
                    }
                }
            }
        }
    }
}

fn sort_marker(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => " ▲",
        SortOrder::Desc => " ▼",
    }
}

#[derive(Props, Clone, PartialEq)]
struct UserRowProps {
    user: User,
    selected: bool,
    on_toggle: EventHandler<UserId>,
}

#[component]
fn UserRow(props: UserRowProps) -> Element {
    let on_toggle = props.on_toggle;
    let user = &props.user;
    let id = user.id;

    rsx! {
        tr { class: if props.selected { "selected" } else { "" },
            td {
                input {
                    r#type: "checkbox",
                    checked: props.selected,
                    onchange: move |_| on_toggle.call(id),
                }
            }
            td { {user.full_name().to_string()} }
            td { "{user.email}" }
            td { "{user.profile.cert_level}" }
            td { "{user.profile.equipment}" }
            td {
                Link { to: Route::UserEdit { id: id.get() }, "Edit" }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct UserFieldsProps {
    form: Signal<UserForm>,
    errors: FieldErrors,
}

#[component]
fn UserFields(props: UserFieldsProps) -> Element {
    let mut form = props.form;
    let current = form.read().clone();
    let errors = props.errors;

    rsx! {
        label {
            "Full name"
            input {
                value: "{current.full_name}",
                oninput: move |evt| form.write().full_name = evt.value(),
            }
            if let Some(message) = errors.get("fullName") {
                small { class: "field-error", "{message}" }
            }
        }
        label {
            "Email"
            input {
                r#type: "email",
                value: "{current.email}",
                oninput: move |evt| form.write().email = evt.value(),
            }
            if let Some(message) = errors.get("email") {
                small { class: "field-error", "{message}" }
            }
        }
        label {
            "Phone number"
            input {
                r#type: "tel",
                value: "{current.phone_number}",
                oninput: move |evt| form.write().phone_number = evt.value(),
            }
        }
        div { class: "grid",
            label {
                "Certification level"
                select {
                    onchange: move |evt| form.write().cert_level = evt.value(),
                    option { value: "", selected: current.cert_level.is_empty(), "Not set" }
                    for level in CERT_LEVELS {
                        option { value: "{level}", selected: current.cert_level == level, "{level}" }
                    }
                }
            }
            label {
                "Equipment"
                input {
                    value: "{current.equipment}",
                    oninput: move |evt| form.write().equipment = evt.value(),
                }
            }
        }
    }
}

/// New user page component.
#[component]
pub fn UserCreate() -> Element {
    let notifier = use_notifier();
    let nav = use_navigator();
    let form = use_signal(UserForm::default);
    let mut errors = use_signal(FieldErrors::new);

    let save = move |evt: FormEvent| {
        evt.prevent_default();
        let validated = form.read().validate();
        match validated {
            Err(e) => errors.set(e),
            Ok(input) => {
                errors.set(FieldErrors::new());
                spawn(async move {
                    match api::post_json::<_, User>("/api/users", &input).await {
                        Ok(user) => {
                            notifier.success(format!("Created {}", user.full_name()));
                            nav.push(Route::UserList {});
                        }
                        Err(e) => notifier.error(e.to_string()),
                    }
                });
            }
        }
    };

    rsx! {
        Layout {
            title: "New user".to_string(),
            nav_active: "users".to_string(),

            h1 { "New user" }
            form { onsubmit: save,
                UserFields { form, errors: errors() }
                div { class: "grid",
                    button {
                        r#type: "button",
                        class: "secondary",
                        onclick: move |_| { nav.push(Route::UserList {}); },
                        "Cancel"
                    }
                    button { r#type: "submit", "Create user" }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct UserEditProps {
    pub id: i64,
}

/// Edit user page component.
#[component]
pub fn UserEdit(props: UserEditProps) -> Element {
    let notifier = use_notifier();
    let nav = use_navigator();
    let mut form = use_signal(UserForm::default);
    let mut errors = use_signal(FieldErrors::new);
    let id = UserId(props.id);

    let user = use_resource(use_reactive((&props.id,), |(id,)| async move {
        api::fetch_json::<User>(&format!("/api/users/{}", id)).await
    }));

    // Fill the form once the user arrives
    use_effect(move || match &*user.read() {
        Some(Ok(loaded)) => form.set(UserForm::from_user(loaded)),
        Some(Err(e)) => notifier.error(e.to_string()),
        None => {}
    });

    let save = move |evt: FormEvent| {
        evt.prevent_default();
        let validated = form.read().validate_edit(id);
        match validated {
            Err(e) => errors.set(e),
            Ok(input) => {
                errors.set(FieldErrors::new());
                spawn(async move {
                    match api::put_json::<_, User>(&format!("/api/users/{}", id), &input).await {
                        Ok(user) => {
                            notifier.success(format!("Saved {}", user.full_name()));
                            nav.push(Route::UserList {});
                        }
                        Err(e) => notifier.error(e.to_string()),
                    }
                });
            }
        }
    };

    let loading = user.read().is_none();

    rsx! {
        Layout {
            title: "Edit user".to_string(),
            nav_active: "users".to_string(),

            h1 { "Edit user" }
            if loading {
                p { "aria-busy": "true", "Loading..." }
            } else {
                form { onsubmit: save,
                    UserFields { form, errors: errors() }
                    div { class: "grid",
                        button {
                        r#type: "button",
                        class: "secondary",
                        onclick: move |_| { nav.push(Route::UserList {}); },
                        "Cancel"
                    }
                        button { r#type: "submit", "Save" }
                    }
                }
            }
        }
    }
}
