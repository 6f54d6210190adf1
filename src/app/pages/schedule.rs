//! Daily schedule page.
//!
//! One booking table per activity of the chosen day. Each table owns its
//! [`BookingTable`] state in a signal and refetches its activity after every
//! mutation.

use chrono::NaiveDate;
use dioxus::prelude::*;
use schedule_types::{
    ActivityDetail, ActivityId, ActivityMeta, ActivityType, DeleteIds, Deleted,
};

use crate::app::api;
use crate::app::components::{
    use_notifier, EditDiverDialog, Layout, NewBookingRow, TripDetailsDialog,
};
use crate::app::session::use_session;
use crate::schedule::{booking_cells, daily_slots, BookingTable, TableRow, ToolbarActions};

/// Schedule page component.
#[component]
pub fn Schedule() -> Element {
    let notifier = use_notifier();
    let mut date = use_signal(|| chrono::Local::now().date_naive());

    let mut daily = use_resource(move || {
        let day = date();
        async move { api::fetch_json::<Vec<ActivityMeta>>(&api::activities_url(day)).await }
    });

    use_effect(move || {
        if let Some(Err(e)) = &*daily.read() {
            notifier.error(e.to_string());
        }
    });

    let day = date();
    let content = match &*daily.read() {
        None => rsx! { p { "aria-busy": "true", "Loading..." } },
        Some(Err(_)) => rsx! { p { "Could not load the schedule for {day}." } },
        Some(Ok(metas)) => {
            let slots = daily_slots(metas);
            rsx! {
                for slot in slots {
                    ScheduleTable {
                        key: "{slot.activity_type}",
                        activity_type: slot.activity_type,
                        activity_id: slot.activity_id,
                        date: day,
                        on_changed: move |_| daily.restart(),
                    }
                }
            }
        }
    };

    rsx! {
        Layout {
            title: "Schedule".to_string(),
            nav_active: "schedule".to_string(),

            div { class: "grid",
                h1 { "Schedule" }
                label {
                    "Date"
                    input {
                        r#type: "date",
                        value: "{day}",
                        onchange: move |evt| {
                            match NaiveDate::parse_from_str(&evt.value(), "%Y-%m-%d") {
                                Ok(picked) => date.set(picked),
                                Err(e) => tracing::debug!(error = %e, "Ignoring date input"),
                            }
                        },
                    }
                }
            }
            {content}
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct ScheduleTableProps {
    activity_type: ActivityType,
    /// `None` until the activity exists remotely
    activity_id: Option<ActivityId>,
    date: NaiveDate,
    /// Called after a successful mutation so the day listing refetches
    on_changed: EventHandler<()>,
}

#[component]
fn ScheduleTable(props: ScheduleTableProps) -> Element {
    let session = use_session();
    let notifier = use_notifier();
    let mut table = use_signal(|| BookingTable::new(props.activity_type, props.date));
    let mut edit_trip_open = use_signal(|| false);
    let mut edit_diver_open = use_signal(|| false);

    // Another day (or slot) resets selection and creating state
    use_effect(use_reactive(
        (&props.activity_type, &props.date),
        move |(activity_type, date)| {
            let stale = {
                let current = table.peek();
                current.activity_type() != activity_type || current.date() != date
            };
            if stale {
                table.write().switch_activity(activity_type, date);
                edit_trip_open.set(false);
                edit_diver_open.set(false);
            }
        },
    ));

    let mut activity = use_resource(use_reactive((&props.activity_id,), |(activity_id,)| async move {
        match activity_id {
            Some(id) => {
                api::fetch_json::<ActivityDetail>(&format!("/api/activities/{}", id))
                    .await
                    .map(Some)
            }
            None => Ok(None),
        }
    }));

    use_effect(move || match &*activity.read() {
        Some(Ok(Some(detail))) => {
            let belongs = {
                let current = table.peek();
                current.activity_type() == detail.activity_type && current.date() == detail.date()
            };
            if belongs {
                table.write().load(detail.clone());
            }
        }
        Some(Err(e)) => notifier.error(e.to_string()),
        _ => {}
    });

    let on_changed = props.on_changed;
    let mut refresh = move || {
        activity.restart();
        on_changed.call(());
    };

    let on_delete = move |_: MouseEvent| {
        let Some(ids) = table.peek().delete_request() else {
            return;
        };
        spawn(async move {
            let body = DeleteIds { ids };
            match api::post_json::<_, Deleted>("/api/bookings/delete", &body).await {
                Ok(result) => {
                    table.write().deletion_succeeded();
                    notifier.success(format!("Deleted {} booking(s)", result.deleted));
                    refresh();
                }
                Err(e) => {
                    table.write().deletion_failed();
                    notifier.error(e.to_string());
                }
            }
        });
    };

    let on_add = move |_: MouseEvent| {
        let started = table.write().begin_create();
        if let Err(e) = started {
            notifier.error(e.to_string());
        }
    };

    let snapshot = table.read().clone();
    let actions = ToolbarActions::for_table(&snapshot, session.is_admin());
    let activity_type = snapshot.activity_type();
    let date = snapshot.date();
    let columns = snapshot.columns();
    let show_checkboxes = snapshot.show_checkboxes();
    let show_select_all = snapshot.show_select_all();
    let all_selected = snapshot.all_selected();
    let diver_total = snapshot.diver_total();
    let guides = snapshot
        .dive_guides()
        .iter()
        .map(|guide| guide.full_name())
        .collect::<Vec<_>>()
        .join(", ");
    let footer_span = columns.len().saturating_sub(1);
    let is_loading = activity.read().is_none();

    let body: Vec<Element> = snapshot
        .rows()
        .into_iter()
        .map(|row| match row {
            TableRow::Booking {
                seat,
                booking,
                selected,
            } => {
                let id = booking.id;
                let cells = booking_cells(activity_type, &booking);
                rsx! {
                    tr {
                        key: "{id}",
                        class: if selected { "selected" } else { "" },
                        onclick: move |_| {
                            table.write().toggle(id);
                        },
                        td { class: "seat",
                            if show_checkboxes {
                                input { r#type: "checkbox", checked: selected, readonly: true }
                            } else {
                                "{seat}"
                            }
                        }
                        for (index, cell) in cells.into_iter().enumerate() {
                            td { key: "{index}", "{cell}" }
                        }
                    }
                }
            }
            TableRow::Edit { seat } => rsx! {
                NewBookingRow {
                    key: "new-booking-{seat}",
                    seat,
                    activity_type,
                    date,
                    columns: columns.len(),
                    on_saved: move |_| {
                        table.write().creation_succeeded();
                        refresh();
                    },
                    on_cancel: move |_| table.write().cancel_create(),
                }
            },
            TableRow::Blank { seat } => rsx! {
                tr {
                    key: "blank-{seat}",
                    class: "blank",
                    onclick: move |_| {
                        let started = table.write().blank_seat_clicked();
                        if let Err(e) = started {
                            notifier.error(e.to_string());
                        }
                    },
                    td { class: "seat", "{seat}" }
                    td { colspan: "{columns.len()}" }
                }
            },
        })
        .collect();
    let is_empty = body.is_empty();

    rsx! {
        article {
            div { class: if actions.highlighted { "toolbar highlighted" } else { "toolbar" },
                strong { "{actions.heading}" }
                div { class: "actions",
                    if actions.edit_diver {
                        button { class: "secondary", onclick: move |_| edit_diver_open.set(true), "Edit diver" }
                    }
                    if actions.delete {
                        button { class: "contrast", onclick: on_delete, "Delete" }
                    }
                    if actions.edit_trip {
                        button { class: "secondary", onclick: move |_| edit_trip_open.set(true), "Edit trip" }
                    }
                    if actions.add_booking {
                        button { onclick: on_add, "Add booking" }
                    }
                    if actions.cancel_booking {
                        button {
                            class: "secondary",
                            onclick: move |_| table.write().cancel_create(),
                            "Cancel"
                        }
                    }
                }
            }

            table { class: "booking-table", "aria-busy": if is_loading { "true" } else { "false" },
                thead {
                    tr {
                        th {
                            if show_select_all {
                                input {
                                    r#type: "checkbox",
                                    checked: all_selected,
                                    onchange: move |evt| table.write().select_all(evt.checked()),
                                }
                            }
                        }
                        for column in columns.iter() {
                            th { key: "{column}", "{column}" }
                        }
                    }
                }
                tbody {
                    {body.into_iter()}
                    if is_empty {
                        tr {
                            td { colspan: "{columns.len() + 1}", small { "No bookings yet" } }
                        }
                    }
                }
                if let Some((booked, capacity)) = diver_total {
                    tfoot {
                        tr {
                            th { colspan: "2", "Dive Guides" }
                            td { colspan: "{footer_span}",
                                if guides.is_empty() {
                                    small { "None assigned" }
                                } else {
                                    "{guides}"
                                }
                            }
                        }
                        tr {
                            th { colspan: "2", "Total Divers" }
                            td { colspan: "{footer_span}", "{booked} / {capacity}" }
                        }
                    }
                }
            }

            if edit_diver_open() {
                if let Some(booking) = snapshot.single_selected().cloned() {
                    EditDiverDialog {
                        booking,
                        on_saved: move |_| {
                            edit_diver_open.set(false);
                            table.write().deselect_all();
                            refresh();
                        },
                        on_close: move |_| edit_diver_open.set(false),
                    }
                }
            }

            if edit_trip_open() {
                TripDetailsDialog {
                    activity: snapshot.activity().cloned(),
                    activity_type,
                    date,
                    on_saved: move |_| {
                        edit_trip_open.set(false);
                        refresh();
                    },
                    on_close: move |_| edit_trip_open.set(false),
                }
            }
        }
    }
}
