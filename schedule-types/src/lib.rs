//! Shared wire types for the dive schedule dashboard.
//!
//! These types cross two boundaries:
//! - the remote query/mutation API (GraphQL, camelCase JSON)
//! - the dashboard's own JSON API between the axum server and the browser
//!
//! # Modules
//! - [`ids`] - Typed record ids that accept string or numeric JSON
//! - [`user`] - Users and diver profiles
//! - [`activity`] - Scheduled dive slots (boat trips, shore dives)
//! - [`booking`] - One diver's reservation within an activity
//! - [`inputs`] - Mutation payloads

pub mod activity;
pub mod booking;
pub mod ids;
pub mod inputs;
pub mod user;

pub use activity::{
    ActivityDetail, ActivityMeta, ActivitySummary, ActivityType, Day, BOAT_CAPACITY,
};
pub use booking::Booking;
pub use ids::{ActivityId, BookingId, UserId};
pub use inputs::{
    ActivityDetailInput, CreateBookingInput, CreateUserInput, DeleteIds, Deleted, EditBookingInput,
    EditUserInput, LoginInput, RegisterInput,
};
pub use user::{AuthSession, Profile, User};
