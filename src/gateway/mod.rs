//! Schedule data sources.
//!
//! Every read and mutation the dashboard performs goes through
//! [`ScheduleBackend`]. The server holds one behind an `Arc` in its state:
//! either the remote GraphQL API or the seeded in-memory store.
//!
//! Reads are anonymous. Mutations carry the caller's [`AuthToken`] so the
//! data source can decide whether that user may make the change.

pub mod graphql;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use schedule_types::{
    ActivityDetail, ActivityDetailInput, ActivityId, ActivityMeta, Booking, BookingId,
    AuthSession, CreateBookingInput, CreateUserInput, EditBookingInput, EditUserInput,
    LoginInput, RegisterInput, User, UserId,
};

use crate::config::{BackendConfig, BackendMode};
use crate::error::BackendError;

pub use graphql::GraphqlBackend;
pub use memory::MemoryBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Bearer token of the signed-in user making a request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// `None` for an empty or blank token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        (!token.is_empty()).then(|| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Short name for logs and `/api/status`
    fn name(&self) -> &'static str;

    async fn daily_activities(&self, date: NaiveDate) -> BackendResult<Vec<ActivityMeta>>;

    async fn activity(&self, id: ActivityId) -> BackendResult<ActivityDetail>;

    async fn create_activity_detail(
        &self,
        auth: &AuthToken,
        input: ActivityDetailInput,
    ) -> BackendResult<ActivityDetail>;

    async fn edit_activity_detail(
        &self,
        auth: &AuthToken,
        input: ActivityDetailInput,
    ) -> BackendResult<ActivityDetail>;

    async fn create_booking(
        &self,
        auth: &AuthToken,
        input: CreateBookingInput,
    ) -> BackendResult<Booking>;

    async fn edit_booking(&self, auth: &AuthToken, input: EditBookingInput) -> BackendResult<Booking>;

    /// Delete in one call; the whole batch fails if any id is unknown.
    async fn delete_bookings(&self, auth: &AuthToken, ids: &[BookingId]) -> BackendResult<usize>;

    async fn search_users(&self, name: &str) -> BackendResult<Vec<User>>;

    async fn users(&self) -> BackendResult<Vec<User>>;

    async fn user(&self, id: UserId) -> BackendResult<User>;

    async fn create_user(&self, auth: &AuthToken, input: CreateUserInput) -> BackendResult<User>;

    async fn edit_user(&self, auth: &AuthToken, input: EditUserInput) -> BackendResult<User>;

    async fn delete_users(&self, auth: &AuthToken, ids: &[UserId]) -> BackendResult<usize>;

    /// Check credentials and hand out a token for later mutations.
    async fn login(&self, input: LoginInput) -> BackendResult<AuthSession>;

    async fn register(&self, input: RegisterInput) -> BackendResult<User>;
}

pub type SharedBackend = Arc<dyn ScheduleBackend>;

/// Build the configured backend.
pub fn from_config(config: &BackendConfig) -> anyhow::Result<SharedBackend> {
    let backend: SharedBackend = match config.mode {
        BackendMode::Graphql => Arc::new(GraphqlBackend::from_config(config)?),
        BackendMode::Memory => Arc::new(MemoryBackend::with_demo_data(
            chrono::Local::now().date_naive(),
        )),
    };
    tracing::info!(backend = backend.name(), "Schedule backend ready");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_token_rejects_blank() {
        assert!(AuthToken::new("   ").is_none());
        assert_eq!(AuthToken::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_auth_token_debug_hides_value() {
        let token = AuthToken::new("secret-value").unwrap();
        assert_eq!(format!("{:?}", token), "AuthToken(..)");
    }
}
