//! In-memory schedule store.
//!
//! Used for local development and tests. Records are kept normalized (ids
//! only) and assembled into API shapes on read, so an edited user shows up
//! everywhere they are referenced.
//!
//! Login hands out a random token kept in the store. Schedule mutations and
//! deleting users need an admin token; other user changes need any valid one.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use schedule_types::{
    ActivityDetail, ActivityDetailInput, ActivityId, ActivityMeta, ActivitySummary, ActivityType,
    AuthSession, Booking, BookingId, CreateBookingInput, CreateUserInput, Day, EditBookingInput,
    EditUserInput, LoginInput, Profile, RegisterInput, User, UserId,
};
use rand::distributions::{Alphanumeric, DistString};
use tokio::sync::RwLock;
use tracing::debug;

use super::{AuthToken, BackendResult, ScheduleBackend};
use crate::error::BackendError;

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: Option<String>,
}

#[derive(Debug, Clone)]
struct ActivityRecord {
    id: ActivityId,
    date: NaiveDate,
    activity_type: ActivityType,
    time: Option<String>,
    dive_site1: Option<String>,
    dive_site2: Option<String>,
    dive_guides: Vec<UserId>,
}

#[derive(Debug, Clone)]
struct BookingRecord {
    id: BookingId,
    activity: ActivityId,
    diver: UserId,
    diver_role: String,
    equipment: String,
    time: String,
    instructor: Option<UserId>,
}

#[derive(Debug, Default)]
struct Store {
    accounts: BTreeMap<UserId, Account>,
    activities: BTreeMap<ActivityId, ActivityRecord>,
    bookings: BTreeMap<BookingId, BookingRecord>,
    /// Login token to account
    sessions: HashMap<String, UserId>,
    last_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    SignedIn,
    Admin,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn user(&self, id: UserId) -> BackendResult<User> {
        self.accounts
            .get(&id)
            .map(|a| a.user.clone())
            .ok_or_else(|| BackendError::NotFound(format!("user {}", id)))
    }

    /// The account behind `auth`, refused when it lacks `access`.
    fn authorize(&self, auth: &AuthToken, access: Access) -> BackendResult<UserId> {
        let user = self
            .sessions
            .get(auth.as_str())
            .and_then(|id| self.accounts.get(id))
            .map(|a| &a.user)
            .ok_or(BackendError::Unauthenticated)?;
        if access == Access::Admin && !user.has_admin_role() {
            debug!(id = %user.id, "Refused non-admin change");
            return Err(BackendError::Forbidden(
                "only admins can change the schedule".to_string(),
            ));
        }
        Ok(user.id)
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.accounts.values().any(|a| {
            Some(a.user.id) != except && a.user.email.eq_ignore_ascii_case(email.trim())
        })
    }

    fn find_activity(&self, activity_type: ActivityType, date: NaiveDate) -> Option<ActivityId> {
        self.activities
            .values()
            .find(|a| a.activity_type == activity_type && a.date == date)
            .map(|a| a.id)
    }

    fn insert_account(&mut self, input: CreateUserInput, password: Option<String>) -> User {
        let id = UserId(self.next_id());
        let user = User {
            id,
            email: input.email.trim().to_string(),
            is_admin: false,
            profile: Profile {
                full_name: input.full_name.trim().to_string(),
                cert_level: input.cert_level.unwrap_or_default(),
                equipment: input.equipment.unwrap_or_default(),
                phone_number: input.phone_number,
                role: None,
            },
        };
        self.accounts.insert(
            id,
            Account {
                user: user.clone(),
                password,
            },
        );
        user
    }

    fn insert_activity(
        &mut self,
        activity_type: ActivityType,
        date: NaiveDate,
        time: Option<String>,
    ) -> ActivityId {
        let id = ActivityId(self.next_id());
        self.activities.insert(
            id,
            ActivityRecord {
                id,
                date,
                activity_type,
                time: time.or_else(|| activity_type.trip_time().map(str::to_string)),
                dive_site1: None,
                dive_site2: None,
                dive_guides: Vec::new(),
            },
        );
        id
    }

    fn booking(&self, record: &BookingRecord) -> BackendResult<Booking> {
        let activity = self
            .activities
            .get(&record.activity)
            .ok_or_else(|| BackendError::NotFound(format!("activity {}", record.activity)))?;
        Ok(Booking {
            id: record.id,
            diver: self.user(record.diver)?,
            diver_role: record.diver_role.clone(),
            equipment: record.equipment.clone(),
            time: record.time.clone(),
            instructor: record.instructor.map(|id| self.user(id)).transpose()?,
            activity_detail: ActivitySummary {
                id: Some(activity.id),
                activity_type: activity.activity_type,
            },
        })
    }

    fn activity(&self, id: ActivityId) -> BackendResult<ActivityDetail> {
        let record = self
            .activities
            .get(&id)
            .ok_or_else(|| BackendError::NotFound(format!("activity {}", id)))?;
        let dive_guides = record
            .dive_guides
            .iter()
            .map(|g| self.user(*g))
            .collect::<BackendResult<Vec<_>>>()?;
        let booking_set = self
            .bookings
            .values()
            .filter(|b| b.activity == id)
            .map(|b| self.booking(b))
            .collect::<BackendResult<Vec<_>>>()?;

        Ok(ActivityDetail {
            id,
            day: Day { date: record.date },
            activity_type: record.activity_type,
            time: record.time.clone(),
            dive_site1: record.dive_site1.clone(),
            dive_site2: record.dive_site2.clone(),
            dive_guides,
            booking_set,
        })
    }

    fn check_users(&self, ids: &[UserId]) -> BackendResult<()> {
        ids.iter().try_for_each(|id| self.user(*id).map(|_| ()))
    }
}

/// Schedule backend holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: RwLock<Store>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded store: an admin account (`admin@diveschedule.test` / `admin`),
    /// a few divers, an AM boat trip and an AM shore dive on `today`.
    pub fn with_demo_data(today: NaiveDate) -> Self {
        let mut store = Store::default();

        let mut seed = |name: &str, email: &str, cert: &str, equipment: &str| {
            store.insert_account(
                CreateUserInput {
                    full_name: name.to_string(),
                    email: email.to_string(),
                    phone_number: None,
                    cert_level: Some(cert.to_string()),
                    equipment: Some(equipment.to_string()),
                },
                None,
            )
        };
        let admin = seed("Dana Admin", "admin@diveschedule.test", "Instructor", "Own kit");
        let ana = seed("Ana Coral", "ana@diveschedule.test", "Open Water", "Full kit");
        let kai = seed("Kai Blue", "kai@diveschedule.test", "Advanced Open Water", "Own BCD");
        let sam = seed("Sam Reef", "sam@diveschedule.test", "Instructor", "Own kit");
        let lee = seed("Lee Wave", "lee@diveschedule.test", "Not certified", "Full kit");

        if let Some(account) = store.accounts.get_mut(&admin.id) {
            account.user.is_admin = true;
            account.user.profile.role = Some("admin".to_string());
            account.password = Some("admin".to_string());
        }
        if let Some(account) = store.accounts.get_mut(&sam.id) {
            account.user.profile.role = Some("instructor".to_string());
        }

        let boat = store.insert_activity(ActivityType::AmBoat, today, None);
        if let Some(trip) = store.activities.get_mut(&boat) {
            trip.dive_site1 = Some("Dibba Rock".to_string());
            trip.dive_site2 = Some("Inchcape 1".to_string());
            trip.dive_guides = vec![sam.id];
        }
        let shore = store.insert_activity(ActivityType::AmShore, today, None);

        let mut book = |activity, diver: UserId, role: &str, time: &str, instructor| {
            let id = BookingId(store.next_id());
            store.bookings.insert(
                id,
                BookingRecord {
                    id,
                    activity,
                    diver,
                    diver_role: role.to_string(),
                    equipment: String::new(),
                    time: time.to_string(),
                    instructor,
                },
            );
        };
        book(boat, ana.id, "diver", "9am", None);
        book(boat, kai.id, "diver", "9am", None);
        book(shore, lee.id, "course", "10am", Some(sam.id));

        Self {
            store: RwLock::new(store),
        }
    }
}

#[async_trait]
impl ScheduleBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn daily_activities(&self, date: NaiveDate) -> BackendResult<Vec<ActivityMeta>> {
        let store = self.store.read().await;
        Ok(store
            .activities
            .values()
            .filter(|a| a.date == date)
            .map(|a| ActivityMeta {
                id: a.id,
                activity_type: a.activity_type,
            })
            .collect())
    }

    async fn activity(&self, id: ActivityId) -> BackendResult<ActivityDetail> {
        self.store.read().await.activity(id)
    }

    async fn create_activity_detail(
        &self,
        auth: &AuthToken,
        input: ActivityDetailInput,
    ) -> BackendResult<ActivityDetail> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::Admin)?;
        if input.activity_type == ActivityType::Unknown {
            return Err(BackendError::Invalid("activity type is required".to_string()));
        }
        if store
            .find_activity(input.activity_type, input.date)
            .is_some()
        {
            return Err(BackendError::Invalid(format!(
                "{} on {} already exists",
                input.activity_type.label(),
                input.date
            )));
        }
        store.check_users(&input.dive_guides)?;

        let id = store.insert_activity(input.activity_type, input.date, input.time);
        if let Some(record) = store.activities.get_mut(&id) {
            record.dive_site1 = input.dive_site1;
            record.dive_site2 = input.dive_site2;
            record.dive_guides = input.dive_guides;
        }
        debug!(%id, "Created activity detail");
        store.activity(id)
    }

    async fn edit_activity_detail(
        &self,
        auth: &AuthToken,
        input: ActivityDetailInput,
    ) -> BackendResult<ActivityDetail> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::Admin)?;
        let id = input
            .id
            .ok_or_else(|| BackendError::Invalid("activity id is required to edit".to_string()))?;
        store.check_users(&input.dive_guides)?;

        let record = store
            .activities
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("activity {}", id)))?;
        record.dive_site1 = input.dive_site1;
        record.dive_site2 = input.dive_site2;
        record.dive_guides = input.dive_guides;
        if input.time.is_some() {
            record.time = input.time;
        }
        store.activity(id)
    }

    async fn create_booking(
        &self,
        auth: &AuthToken,
        input: CreateBookingInput,
    ) -> BackendResult<Booking> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::Admin)?;
        store.user(input.user_id)?;
        if let Some(instructor) = input.instructor_id {
            store.user(instructor)?;
        }

        let activity = match store.find_activity(input.activity_type, input.date) {
            Some(id) => id,
            None => store.insert_activity(input.activity_type, input.date, None),
        };
        if let Some(capacity) = input.activity_type.capacity() {
            let taken = store
                .bookings
                .values()
                .filter(|b| b.activity == activity)
                .count();
            if taken >= capacity {
                return Err(BackendError::Invalid("The boat is full".to_string()));
            }
        }

        let id = BookingId(store.next_id());
        let record = BookingRecord {
            id,
            activity,
            diver: input.user_id,
            diver_role: input.diver_role,
            equipment: input.equipment.unwrap_or_default(),
            time: input.time,
            instructor: input.instructor_id,
        };
        let booking = store.booking(&record)?;
        store.bookings.insert(id, record);
        debug!(%id, %activity, "Created booking");
        Ok(booking)
    }

    async fn edit_booking(&self, auth: &AuthToken, input: EditBookingInput) -> BackendResult<Booking> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::Admin)?;
        if let Some(instructor) = input.instructor_id {
            store.user(instructor)?;
        }
        let record = store
            .bookings
            .get_mut(&input.id)
            .ok_or_else(|| BackendError::NotFound(format!("booking {}", input.id)))?;

        if let Some(role) = input.diver_role {
            record.diver_role = role;
        }
        if let Some(equipment) = input.equipment {
            record.equipment = equipment;
        }
        if let Some(time) = input.time {
            record.time = time;
        }
        record.instructor = input.instructor_id;

        let record = record.clone();
        store.booking(&record)
    }

    async fn delete_bookings(&self, auth: &AuthToken, ids: &[BookingId]) -> BackendResult<usize> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::Admin)?;
        if let Some(missing) = ids.iter().find(|id| !store.bookings.contains_key(*id)) {
            return Err(BackendError::NotFound(format!("booking {}", missing)));
        }
        let before = store.bookings.len();
        store.bookings.retain(|id, _| !ids.contains(id));
        Ok(before - store.bookings.len())
    }

    async fn search_users(&self, name: &str) -> BackendResult<Vec<User>> {
        let needle = name.trim().to_lowercase();
        let store = self.store.read().await;
        Ok(store
            .accounts
            .values()
            .filter(|a| a.user.full_name().to_lowercase().contains(&needle))
            .map(|a| a.user.clone())
            .collect())
    }

    async fn users(&self) -> BackendResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.accounts.values().map(|a| a.user.clone()).collect())
    }

    async fn user(&self, id: UserId) -> BackendResult<User> {
        self.store.read().await.user(id)
    }

    async fn create_user(&self, auth: &AuthToken, input: CreateUserInput) -> BackendResult<User> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::SignedIn)?;
        if store.email_taken(&input.email, None) {
            return Err(BackendError::Invalid("User email already exists".to_string()));
        }
        Ok(store.insert_account(input, None))
    }

    async fn edit_user(&self, auth: &AuthToken, input: EditUserInput) -> BackendResult<User> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::SignedIn)?;
        if store.email_taken(&input.fields.email, Some(input.id)) {
            return Err(BackendError::Invalid("User email already exists".to_string()));
        }
        let account = store
            .accounts
            .get_mut(&input.id)
            .ok_or_else(|| BackendError::NotFound(format!("user {}", input.id)))?;

        let fields = input.fields;
        let user = &mut account.user;
        user.email = fields.email.trim().to_string();
        user.profile.full_name = fields.full_name.trim().to_string();
        user.profile.phone_number = fields.phone_number;
        user.profile.cert_level = fields.cert_level.unwrap_or_default();
        user.profile.equipment = fields.equipment.unwrap_or_default();
        Ok(user.clone())
    }

    async fn delete_users(&self, auth: &AuthToken, ids: &[UserId]) -> BackendResult<usize> {
        let mut store = self.store.write().await;
        store.authorize(auth, Access::Admin)?;
        store.check_users(ids)?;
        let referenced = store.bookings.values().find(|b| {
            ids.contains(&b.diver) || b.instructor.is_some_and(|i| ids.contains(&i))
        });
        if let Some(booking) = referenced {
            return Err(BackendError::Invalid(format!(
                "user is still on booking {}",
                booking.id
            )));
        }

        for activity in store.activities.values_mut() {
            activity.dive_guides.retain(|g| !ids.contains(g));
        }
        store.sessions.retain(|_, user| !ids.contains(user));
        let before = store.accounts.len();
        store.accounts.retain(|id, _| !ids.contains(id));
        Ok(before - store.accounts.len())
    }

    async fn login(&self, input: LoginInput) -> BackendResult<AuthSession> {
        let mut store = self.store.write().await;
        let user = store
            .accounts
            .values()
            .find(|a| a.user.email.eq_ignore_ascii_case(input.email.trim()))
            .filter(|a| a.password.as_deref() == Some(input.password.as_str()))
            .map(|a| a.user.clone())
            .ok_or(BackendError::Unauthorized)?;

        let token = Alphanumeric.sample_string(&mut rand::thread_rng(), 32);
        store.sessions.insert(token.clone(), user.id);
        debug!(id = %user.id, "Issued session token");
        Ok(AuthSession { token, user })
    }

    async fn register(&self, input: RegisterInput) -> BackendResult<User> {
        let mut store = self.store.write().await;
        if store.email_taken(&input.email, None) {
            return Err(BackendError::Invalid("User email already exists".to_string()));
        }
        let user = store.insert_account(
            CreateUserInput {
                full_name: input.full_name,
                email: input.email,
                ..Default::default()
            },
            Some(input.password),
        );
        debug!(id = %user.id, "Registered user");
        Ok(user)
    }
}
