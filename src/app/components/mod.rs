//! Shared UI components for the Dioxus web UI.

pub mod booking_forms;
pub mod layout;
pub mod nav;
pub mod notifications;
pub mod user_search;

pub use booking_forms::{EditDiverDialog, NewBookingRow, TripDetailsDialog};
pub use layout::Layout;
pub use nav::Nav;
pub use notifications::{use_notifier, use_notifier_provider, NotificationBanner, Notifier};
pub use user_search::UserSearchInput;
