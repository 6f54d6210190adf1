//! Dioxus page components, one per route.

mod login;
mod register;
mod schedule;
mod users;

pub use login::Login;
pub use register::Register;
pub use schedule::Schedule;
pub use users::{UserCreate, UserEdit, UserList};
