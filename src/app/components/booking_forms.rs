//! Booking table editors: the inline new-booking row, the edit-diver dialog
//! and the trip details dialog.

use chrono::NaiveDate;
use dioxus::prelude::*;
use schedule_types::{ActivityDetail, ActivityType, Booking, User};

use super::notifications::use_notifier;
use super::user_search::UserSearchInput;
use crate::app::api;
use crate::forms::FieldErrors;
use crate::schedule::{ActivityDetailForm, BookingForm, DIVER_ROLES, DIVE_SITES};

#[derive(Props, Clone, PartialEq)]
struct FieldErrorProps {
    errors: FieldErrors,
    field: &'static str,
}

#[component]
fn FieldError(props: FieldErrorProps) -> Element {
    match props.errors.get(props.field) {
        Some(message) => rsx! { small { class: "field-error", "{message}" } },
        None => rsx! {},
    }
}

#[derive(Props, Clone, PartialEq)]
struct BookingFieldsProps {
    form: Signal<BookingForm>,
    errors: FieldErrors,
    /// Diver can only be picked on new bookings
    choose_diver: bool,
}

/// Inputs shared by the new-booking row and the edit-diver dialog.
#[component]
fn BookingFields(props: BookingFieldsProps) -> Element {
    let mut form = props.form;
    let current = form.read().clone();
    let diver_name = current.diver.as_ref().map(|d| d.full_name().to_string());
    let instructor_name = current.instructor.as_ref().map(|i| i.full_name().to_string());

    rsx! {
        div { class: "grid",
            div {
                {match (diver_name, props.choose_diver) {
                    (Some(name), true) => rsx! {
                        label { "Diver" }
                        span { class: "guide-chip",
                            "{name}"
                            button {
                                class: "outline secondary",
                                onclick: move |_| form.write().diver = None,
                                "×"
                            }
                        }
                    },
                    (Some(name), false) => rsx! {
                        label { "Diver" }
                        strong { "{name}" }
                    },
                    (None, _) => rsx! {
                        UserSearchInput {
                            label: "Diver".to_string(),
                            autofocus: true,
                            on_select: move |user: User| form.write().select_diver(user),
                        }
                    },
                }}
                FieldError { errors: props.errors.clone(), field: "diver" }
            }
            label {
                "Role"
                select {
                    onchange: move |evt| form.write().diver_role = evt.value(),
                    for role in DIVER_ROLES {
                        option {
                            value: "{role}",
                            selected: current.diver_role == role,
                            "{role}"
                        }
                    }
                }
                FieldError { errors: props.errors.clone(), field: "diverRole" }
            }
            label {
                "Equipment"
                input {
                    value: "{current.equipment}",
                    oninput: move |evt| form.write().equipment = evt.value(),
                }
            }
            label {
                "Time"
                input {
                    value: "{current.time}",
                    oninput: move |evt| form.write().time = evt.value(),
                }
                FieldError { errors: props.errors.clone(), field: "time" }
            }
            div {
                if let Some(name) = instructor_name {
                    label { "Instructor" }
                    span { class: "guide-chip",
                        "{name}"
                        button {
                            class: "outline secondary",
                            onclick: move |_| form.write().instructor = None,
                            "×"
                        }
                    }
                } else {
                    UserSearchInput {
                        label: "Instructor (optional)".to_string(),
                        on_select: move |user: User| form.write().instructor = Some(user),
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct NewBookingRowProps {
    pub seat: usize,
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    /// Number of data columns the row spans
    pub columns: usize,
    pub on_saved: EventHandler<()>,
    pub on_cancel: EventHandler<()>,
}

/// Inline entry row taking the first blank seat.
#[component]
pub fn NewBookingRow(props: NewBookingRowProps) -> Element {
    let notifier = use_notifier();
    let form = use_signal(|| BookingForm::for_activity(props.activity_type));
    let mut errors = use_signal(FieldErrors::new);
    let mut saving = use_signal(|| false);

    let activity_type = props.activity_type;
    let date = props.date;
    let on_saved = props.on_saved;

    let save = move |_: MouseEvent| {
        let validated = form.read().validate_create(activity_type, date);
        match validated {
            Err(e) => errors.set(e),
            Ok(input) => {
                errors.set(FieldErrors::new());
                saving.set(true);
                spawn(async move {
                    let result = api::post_json::<_, Booking>("/api/bookings", &input).await;
                    saving.set(false);
                    match result {
                        Ok(booking) => {
                            notifier.success(format!("Booked {}", booking.diver.full_name()));
                            on_saved.call(());
                        }
                        Err(e) => notifier.error(e.to_string()),
                    }
                });
            }
        }
    };

    rsx! {
        tr {
            td { class: "seat", "{props.seat}" }
            td { colspan: "{props.columns}",
                BookingFields { form, errors: errors(), choose_diver: true }
                div { class: "grid",
                    button {
                        "aria-busy": if saving() { "true" } else { "false" },
                        disabled: saving(),
                        onclick: save,
                        "Save booking"
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| props.on_cancel.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct EditDiverDialogProps {
    pub booking: Booking,
    pub on_saved: EventHandler<()>,
    pub on_close: EventHandler<()>,
}

/// Edit role, equipment, time and instructor of one booking.
#[component]
pub fn EditDiverDialog(props: EditDiverDialogProps) -> Element {
    let notifier = use_notifier();
    let booking = props.booking.clone();
    let form = use_signal(|| BookingForm::from_booking(&booking));
    let mut errors = use_signal(FieldErrors::new);

    let id = props.booking.id;
    let on_saved = props.on_saved;

    let save = move |_: MouseEvent| {
        let validated = form.read().validate_edit(id);
        match validated {
            Err(e) => errors.set(e),
            Ok(input) => {
                errors.set(FieldErrors::new());
                spawn(async move {
                    match api::put_json::<_, Booking>(&format!("/api/bookings/{}", id), &input).await {
                        Ok(booking) => {
                            notifier.success(format!("Updated {}", booking.diver.full_name()));
                            on_saved.call(());
                        }
                        Err(e) => notifier.error(e.to_string()),
                    }
                });
            }
        }
    };

    rsx! {
        dialog { open: true,
            article {
                header { strong { "Edit diver" } }
                BookingFields { form, errors: errors(), choose_diver: false }
                footer {
                    button {
                        class: "secondary",
                        onclick: move |_| props.on_close.call(()),
                        "Cancel"
                    }
                    button { onclick: save, "Save" }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct TripDetailsDialogProps {
    /// Existing activity, `None` when the slot has no activity yet
    pub activity: Option<ActivityDetail>,
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    pub on_saved: EventHandler<()>,
    pub on_close: EventHandler<()>,
}

/// Dive sites and guides for a boat trip.
#[component]
pub fn TripDetailsDialog(props: TripDetailsDialogProps) -> Element {
    let notifier = use_notifier();
    let initial = match &props.activity {
        Some(activity) => ActivityDetailForm::from_activity(activity),
        None => ActivityDetailForm::blank(props.activity_type, props.date),
    };
    let mut form = use_signal(move || initial);
    let mut errors = use_signal(FieldErrors::new);

    let on_saved = props.on_saved;

    let save = move |_: MouseEvent| {
        let validated = form.read().validate();
        match validated {
            Err(e) => errors.set(e),
            Ok(input) => {
                errors.set(FieldErrors::new());
                spawn(async move {
                    let result = match input.id {
                        Some(id) => {
                            api::put_json::<_, ActivityDetail>(&format!("/api/activities/{}", id), &input)
                                .await
                        }
                        None => api::post_json::<_, ActivityDetail>("/api/activities", &input).await,
                    };
                    match result {
                        Ok(activity) => {
                            notifier.success(format!("Saved {}", activity.heading()));
                            on_saved.call(());
                        }
                        Err(e) => notifier.error(e.to_string()),
                    }
                });
            }
        }
    };

    let current = form.read().clone();
    let errs = errors();
    let title = if current.is_edit() { "Edit trip details" } else { "New trip" };

    rsx! {
        dialog { open: true,
            article {
                header { strong { "{title}" } }
                div { class: "grid",
                    label {
                        "Dive site 1"
                        select {
                            onchange: move |evt| form.write().dive_site1 = evt.value(),
                            option { value: "", selected: current.dive_site1.is_empty(), "Choose a site" }
                            for site in DIVE_SITES {
                                option { value: "{site}", selected: current.dive_site1 == site, "{site}" }
                            }
                        }
                        FieldError { errors: errs.clone(), field: "diveSite1" }
                    }
                    label {
                        "Dive site 2"
                        select {
                            onchange: move |evt| form.write().dive_site2 = evt.value(),
                            option { value: "", selected: current.dive_site2.is_empty(), "Choose a site" }
                            for site in DIVE_SITES {
                                option { value: "{site}", selected: current.dive_site2 == site, "{site}" }
                            }
                        }
                        FieldError { errors: errs.clone(), field: "diveSite2" }
                    }
                }
                label { "Dive guides" }
                div {
                    for guide in current.dive_guides.iter().cloned() {
                        span { key: "{guide.id}", class: "guide-chip",
                            {guide.full_name().to_string()}
                            button {
                                class: "outline secondary",
                                onclick: move |_| form.write().remove_guide(guide.id),
                                "×"
                            }
                        }
                    }
                }
                UserSearchInput {
                    label: "Add guide".to_string(),
                    on_select: move |user: User| {
                        let name = user.full_name().to_string();
                        if !form.write().add_guide(user) {
                            notifier.error(format!("{} is already a guide on this trip", name));
                        }
                    },
                }
                FieldError { errors: errs.clone(), field: "activityType" }
                footer {
                    button {
                        class: "secondary",
                        onclick: move |_| props.on_close.call(()),
                        "Cancel"
                    }
                    button { onclick: save, "Save" }
                }
            }
        }
    }
}
