//! Client for the remote schedule GraphQL API.
//!
//! Each operation posts one document with its variables and pulls a single
//! field out of `data`. A non-empty `errors` array fails the whole call with
//! its first message.
//!
//! Mutations are sent with the signed-in user's token so the remote API
//! applies its own permissions. The configured service token only covers
//! anonymous reads.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use schedule_types::{
    ActivityDetail, ActivityDetailInput, ActivityId, ActivityMeta, AuthSession, Booking,
    BookingId, CreateBookingInput, CreateUserInput, EditBookingInput, EditUserInput, LoginInput,
    RegisterInput, User, UserId,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::{AuthToken, BackendResult, ScheduleBackend};
use crate::config::BackendConfig;
use crate::error::BackendError;

macro_rules! user_fields {
    () => {
        "id email isAdmin profile { fullName certLevel equipment phoneNumber role }"
    };
}

macro_rules! booking_fields {
    () => {
        concat!(
            "id diverRole equipment time activityDetail { id activityType } ",
            "instructor { ",
            user_fields!(),
            " } diver { ",
            user_fields!(),
            " }"
        )
    };
}

const ACTIVITY_DATA: &str = concat!(
    "query ActivityData($activityId: ID!) { activityData(activityId: $activityId) { ",
    "id day { date } activityType time diveSite1 diveSite2 ",
    "diveGuides { ",
    user_fields!(),
    " } bookingSet { ",
    booking_fields!(),
    " } } }"
);

const DAILY_ACTIVITY_META: &str = "query DailyActivityMeta($date: Date!) { \
    dailyActivityMeta(date: $date) { id activityType } }";

const CREATE_ACTIVITY_DETAIL: &str = "mutation CreateActivityDetail($diveSite1: String, \
    $diveSite2: String, $diveGuides: [ID], $date: Date, $time: String, $activityType: String) { \
    createActivityDetail(diveSite1: $diveSite1, diveSite2: $diveSite2, diveGuides: $diveGuides, \
    date: $date, time: $time, activityType: $activityType) { activityDetail { id } } }";

const EDIT_ACTIVITY_DETAIL: &str = "mutation EditActivityDetail($id: ID!, $diveSite1: String, \
    $diveSite2: String, $diveGuides: [ID]) { editActivityDetail(id: $id, diveSite1: $diveSite1, \
    diveSite2: $diveSite2, diveGuides: $diveGuides) { activityDetail { id } } }";

const CREATE_BOOKING: &str = concat!(
    "mutation CreateBooking($diverRole: String!, $userId: ID!, $activityType: String!, ",
    "$date: Date!, $equipment: String, $time: String!, $instructorId: ID) { ",
    "createBooking(diverRole: $diverRole, userId: $userId, activityType: $activityType, ",
    "date: $date, equipment: $equipment, time: $time, instructorId: $instructorId) { booking { ",
    booking_fields!(),
    " } } }"
);

const EDIT_BOOKING: &str = concat!(
    "mutation EditBooking($id: ID!, $diverRole: String, $equipment: String, $time: String, ",
    "$instructorId: ID) { editBooking(id: $id, diverRole: $diverRole, equipment: $equipment, ",
    "time: $time, instructorId: $instructorId) { booking { ",
    booking_fields!(),
    " } } }"
);

const DELETE_BOOKINGS: &str =
    "mutation DeleteBookings($ids: [ID]!) { deleteBookings(ids: $ids) { bookings { id } } }";

const SEARCH_USERS: &str = concat!(
    "query SearchUsers($fullName: String!) { searchUsers(fullName: $fullName) { ",
    "edges { node { ",
    user_fields!(),
    " } } } }"
);

const ALL_USERS: &str = concat!(
    "query AllUsers { allUsers { edges { node { ",
    user_fields!(),
    " } } } }"
);

const USER: &str = concat!("query User($id: ID!) { user(id: $id) { ", user_fields!(), " } }");

const CREATE_USER: &str = concat!(
    "mutation CreateUser($fullName: String!, $email: String!, $phoneNumber: String, ",
    "$certLevel: String, $equipment: String) { createUser(fullName: $fullName, email: $email, ",
    "phoneNumber: $phoneNumber, certLevel: $certLevel, equipment: $equipment) { user { ",
    user_fields!(),
    " } } }"
);

const EDIT_USER: &str = concat!(
    "mutation EditUser($id: ID!, $fullName: String, $email: String, $phoneNumber: String, ",
    "$certLevel: String, $equipment: String) { editUser(id: $id, fullName: $fullName, ",
    "email: $email, phoneNumber: $phoneNumber, certLevel: $certLevel, equipment: $equipment) { ",
    "user { ",
    user_fields!(),
    " } } }"
);

const DELETE_USERS: &str =
    "mutation DeleteUsers($ids: [ID]!) { deleteUsers(ids: $ids) { users { id } } }";

const TOKEN_AUTH: &str = concat!(
    "mutation TokenAuth($email: String!, $password: String!) { ",
    "tokenAuth(email: $email, password: $password) { token user { ",
    user_fields!(),
    " } } }"
);

const REGISTER_USER: &str = concat!(
    "mutation RegisterUser($fullName: String!, $email: String!, $password: String!) { ",
    "registerUser(fullName: $fullName, email: $email, password: $password) { user { ",
    user_fields!(),
    " } } }"
);

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Relay-style list (`edges { node }`).
#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }
}

#[derive(Debug, Deserialize)]
struct IdOnly<T> {
    id: T,
}

/// Extract `data.<path>` from a GraphQL response body.
fn decode_field<T: DeserializeOwned>(body: Value, path: &[&str]) -> BackendResult<T> {
    let response: GraphqlResponse = serde_json::from_value(body)?;

    if let Some(first) = response.errors.into_iter().next() {
        return Err(BackendError::Remote(first.message));
    }

    let mut value = response
        .data
        .ok_or_else(|| BackendError::Decode("response has no data".to_string()))?;
    for key in path {
        value = match value {
            Value::Object(mut map) => map.remove(*key).unwrap_or(Value::Null),
            _ => Value::Null,
        };
    }

    if value.is_null() {
        return Err(BackendError::NotFound(path.join(".")));
    }
    Ok(serde_json::from_value(value)?)
}

pub struct GraphqlBackend {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl GraphqlBackend {
    pub fn new(endpoint: Url, token: Option<String>, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub fn from_config(config: &BackendConfig) -> anyhow::Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("backend.endpoint is required in graphql mode"))?;
        let endpoint = Url::parse(endpoint)
            .map_err(|e| anyhow::anyhow!("invalid backend.endpoint '{}': {}", endpoint, e))?;
        let token = config.token.clone().filter(|t| !t.is_empty());

        Ok(Self::new(
            endpoint,
            token,
            Duration::from_secs(config.timeout_secs),
        )?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post one document. `auth` is the caller's token for mutations; reads
    /// pass `None` and fall back to the service token.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Value,
        path: &[&str],
        auth: Option<&AuthToken>,
    ) -> BackendResult<T> {
        debug!(
            operation,
            variables = %variables,
            as_user = auth.is_some(),
            "GraphQL request"
        );

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "query": query, "variables": variables }));
        let token = match auth {
            Some(auth) => Some(auth.as_str()),
            None => self.token.as_deref(),
        };
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("JWT {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        // GraphQL servers may report errors with a 400 and a normal body
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            return Err(BackendError::Remote(format!(
                "schedule API returned {}",
                status
            )));
        }

        let body: Value = response.json().await?;
        debug!(
            operation,
            %status,
            errors = ?body.get("errors"),
            "GraphQL response"
        );

        decode_field(body, path)
    }

    fn variables<S: serde::Serialize>(input: &S) -> BackendResult<Value> {
        Ok(serde_json::to_value(input)?)
    }
}

#[async_trait]
impl ScheduleBackend for GraphqlBackend {
    fn name(&self) -> &'static str {
        "graphql"
    }

    async fn daily_activities(&self, date: NaiveDate) -> BackendResult<Vec<ActivityMeta>> {
        self.execute(
            "DailyActivityMeta",
            DAILY_ACTIVITY_META,
            json!({ "date": date }),
            &["dailyActivityMeta"],
            None,
        )
        .await
    }

    async fn activity(&self, id: ActivityId) -> BackendResult<ActivityDetail> {
        self.execute(
            "ActivityData",
            ACTIVITY_DATA,
            json!({ "activityId": id }),
            &["activityData"],
            None,
        )
        .await
    }

    async fn create_activity_detail(
        &self,
        auth: &AuthToken,
        input: ActivityDetailInput,
    ) -> BackendResult<ActivityDetail> {
        let created: IdOnly<ActivityId> = self
            .execute(
                "CreateActivityDetail",
                CREATE_ACTIVITY_DETAIL,
                Self::variables(&input)?,
                &["createActivityDetail", "activityDetail"],
                Some(auth),
            )
            .await?;
        self.activity(created.id).await
    }

    async fn edit_activity_detail(
        &self,
        auth: &AuthToken,
        input: ActivityDetailInput,
    ) -> BackendResult<ActivityDetail> {
        if input.id.is_none() {
            return Err(BackendError::Invalid(
                "activity id is required to edit".to_string(),
            ));
        }
        let edited: IdOnly<ActivityId> = self
            .execute(
                "EditActivityDetail",
                EDIT_ACTIVITY_DETAIL,
                Self::variables(&input)?,
                &["editActivityDetail", "activityDetail"],
                Some(auth),
            )
            .await?;
        self.activity(edited.id).await
    }

    async fn create_booking(
        &self,
        auth: &AuthToken,
        input: CreateBookingInput,
    ) -> BackendResult<Booking> {
        self.execute(
            "CreateBooking",
            CREATE_BOOKING,
            Self::variables(&input)?,
            &["createBooking", "booking"],
            Some(auth),
        )
        .await
    }

    async fn edit_booking(&self, auth: &AuthToken, input: EditBookingInput) -> BackendResult<Booking> {
        self.execute(
            "EditBooking",
            EDIT_BOOKING,
            Self::variables(&input)?,
            &["editBooking", "booking"],
            Some(auth),
        )
        .await
    }

    async fn delete_bookings(&self, auth: &AuthToken, ids: &[BookingId]) -> BackendResult<usize> {
        let deleted: Vec<IdOnly<BookingId>> = self
            .execute(
                "DeleteBookings",
                DELETE_BOOKINGS,
                json!({ "ids": ids }),
                &["deleteBookings", "bookings"],
                Some(auth),
            )
            .await?;
        Ok(deleted.len())
    }

    async fn search_users(&self, name: &str) -> BackendResult<Vec<User>> {
        let found: Connection<User> = self
            .execute(
                "SearchUsers",
                SEARCH_USERS,
                json!({ "fullName": name }),
                &["searchUsers"],
                None,
            )
            .await?;
        Ok(found.into_nodes())
    }

    async fn users(&self) -> BackendResult<Vec<User>> {
        let all: Connection<User> = self
            .execute("AllUsers", ALL_USERS, json!({}), &["allUsers"], None)
            .await?;
        Ok(all.into_nodes())
    }

    async fn user(&self, id: UserId) -> BackendResult<User> {
        self.execute("User", USER, json!({ "id": id }), &["user"], None)
            .await
    }

    async fn create_user(&self, auth: &AuthToken, input: CreateUserInput) -> BackendResult<User> {
        self.execute(
            "CreateUser",
            CREATE_USER,
            Self::variables(&input)?,
            &["createUser", "user"],
            Some(auth),
        )
        .await
    }

    async fn edit_user(&self, auth: &AuthToken, input: EditUserInput) -> BackendResult<User> {
        self.execute(
            "EditUser",
            EDIT_USER,
            Self::variables(&input)?,
            &["editUser", "user"],
            Some(auth),
        )
        .await
    }

    async fn delete_users(&self, auth: &AuthToken, ids: &[UserId]) -> BackendResult<usize> {
        let deleted: Vec<IdOnly<UserId>> = self
            .execute(
                "DeleteUsers",
                DELETE_USERS,
                json!({ "ids": ids }),
                &["deleteUsers", "users"],
                Some(auth),
            )
            .await?;
        Ok(deleted.len())
    }

    async fn login(&self, input: LoginInput) -> BackendResult<AuthSession> {
        self.execute(
            "TokenAuth",
            TOKEN_AUTH,
            Self::variables(&input)?,
            &["tokenAuth"],
            None,
        )
        .await
        .map_err(|e| match e {
            BackendError::Remote(message) => {
                debug!(%message, "Login rejected");
                BackendError::Unauthorized
            }
            other => other,
        })
    }

    async fn register(&self, input: RegisterInput) -> BackendResult<User> {
        self.execute(
            "RegisterUser",
            REGISTER_USER,
            Self::variables(&input)?,
            &["registerUser", "user"],
            None,
        )
        .await
        .map_err(|e| match e {
            BackendError::Remote(message) if message.contains("UNIQUE constraint") => {
                BackendError::Invalid("User email already exists".to_string())
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendMode;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};

    #[test]
    fn test_documents_include_fragments() {
        assert!(ACTIVITY_DATA.contains("bookingSet { id diverRole"));
        assert!(ACTIVITY_DATA.contains("profile { fullName certLevel"));
        assert!(SEARCH_USERS.contains("edges { node { id email"));
        assert!(CREATE_BOOKING.contains("booking { id diverRole"));
    }

    #[test]
    fn test_decode_field_nested() {
        let body = json!({
            "data": { "createBooking": { "booking": {
                "id": "7",
                "diverRole": "diver",
                "equipment": "",
                "time": "9am",
                "activityDetail": { "id": "2", "activityType": "AM_BOAT" },
                "instructor": null,
                "diver": { "id": "4", "profile": { "fullName": "Ana Coral" } }
            } } }
        });
        let booking: Booking = decode_field(body, &["createBooking", "booking"]).unwrap();
        assert_eq!(booking.id, BookingId(7));
        assert_eq!(booking.diver.full_name(), "Ana Coral");
    }

    #[test]
    fn test_decode_field_first_error_wins() {
        let body = json!({
            "data": null,
            "errors": [
                { "message": "Booking matching query does not exist." },
                { "message": "second" }
            ]
        });
        let err = decode_field::<Booking>(body, &["editBooking", "booking"]).unwrap_err();
        assert!(matches!(err, BackendError::Remote(ref m) if m == "Booking matching query does not exist."));
    }

    #[test]
    fn test_decode_field_null_is_not_found() {
        let body = json!({ "data": { "activityData": null } });
        let err = decode_field::<ActivityDetail>(body, &["activityData"]).unwrap_err();
        assert!(matches!(err, BackendError::NotFound(ref p) if p == "activityData"));
    }

    #[test]
    fn test_decode_connection() {
        let body = json!({
            "data": { "searchUsers": { "edges": [
                { "node": { "id": "1", "profile": { "fullName": "Ana Coral" } } },
                { "node": { "id": "2", "profile": { "fullName": "Ana Reef" } } }
            ] } }
        });
        let found: Connection<User> = decode_field(body, &["searchUsers"]).unwrap();
        let names: Vec<_> = found
            .into_nodes()
            .into_iter()
            .map(|u| u.profile.full_name)
            .collect();
        assert_eq!(names, vec!["Ana Coral", "Ana Reef"]);
    }

    #[test]
    fn test_from_config_requires_valid_endpoint() {
        let mut config = BackendConfig {
            mode: BackendMode::Graphql,
            endpoint: None,
            token: None,
            timeout_secs: 5,
        };
        assert!(GraphqlBackend::from_config(&config).is_err());

        config.endpoint = Some("not a url".to_string());
        assert!(GraphqlBackend::from_config(&config).is_err());

        config.endpoint = Some("http://localhost:8000/graphql".to_string());
        let backend = GraphqlBackend::from_config(&config).unwrap();
        assert_eq!(backend.endpoint().path(), "/graphql");
    }

    async fn serve(reply: Value) -> Url {
        let app = Router::new().route(
            "/graphql",
            post(move |Json(_body): Json<Value>| {
                let reply = reply.clone();
                async move { Json(reply) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}/graphql", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_daily_activities_against_stub_server() {
        let endpoint = serve(json!({
            "data": { "dailyActivityMeta": [
                { "id": "3", "activityType": "AM_BOAT" },
                { "id": 4, "activityType": "NIGHT_SHORE" }
            ] }
        }))
        .await;
        let backend = GraphqlBackend::new(endpoint, None, Duration::from_secs(5)).unwrap();

        let metas = backend
            .daily_activities(NaiveDate::from_ymd_opt(2021, 3, 25).unwrap())
            .await
            .unwrap();
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[1].id, ActivityId(4));
    }

    #[tokio::test]
    async fn test_login_error_is_unauthorized() {
        let endpoint = serve(json!({
            "data": { "tokenAuth": null },
            "errors": [{ "message": "Please enter valid credentials" }]
        }))
        .await;
        let backend = GraphqlBackend::new(endpoint, None, Duration::from_secs(5)).unwrap();

        let err = backend
            .login(LoginInput {
                email: "a@b.c".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Unauthorized));
    }

    /// Stub that only answers when the expected `Authorization` header is sent.
    async fn serve_for(expected: &'static str, reply: Value) -> Url {
        let app = Router::new().route(
            "/graphql",
            post(move |headers: HeaderMap, Json(_body): Json<Value>| {
                let reply = reply.clone();
                async move {
                    let sent = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    if sent == expected {
                        Json(reply)
                    } else {
                        Json(json!({
                            "data": null,
                            "errors": [{ "message": format!("rejected credentials '{}'", sent) }]
                        }))
                    }
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}/graphql", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_remote_token() {
        let endpoint = serve(json!({
            "data": { "tokenAuth": {
                "token": "user-jwt",
                "user": { "id": "5", "email": "ana@example.com", "isAdmin": false }
            } }
        }))
        .await;
        let backend = GraphqlBackend::new(endpoint, None, Duration::from_secs(5)).unwrap();

        let session = backend
            .login(LoginInput {
                email: "ana@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.token, "user-jwt");
        assert_eq!(session.user.id, UserId(5));
    }

    #[tokio::test]
    async fn test_mutation_sends_caller_token_not_service_token() {
        let endpoint = serve_for(
            "JWT user-jwt",
            json!({ "data": { "deleteBookings": { "bookings": [{ "id": "1" }, { "id": "2" }] } } }),
        )
        .await;
        let backend = GraphqlBackend::new(
            endpoint,
            Some("service-jwt".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let auth = AuthToken::new("user-jwt").unwrap();
        let deleted = backend
            .delete_bookings(&auth, &[BookingId(1), BookingId(2)])
            .await
            .unwrap();
        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_reads_use_service_token() {
        let endpoint = serve_for(
            "JWT service-jwt",
            json!({ "data": { "allUsers": { "edges": [] } } }),
        )
        .await;
        let backend = GraphqlBackend::new(
            endpoint,
            Some("service-jwt".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(backend.users().await.unwrap().is_empty());

        // a different caller token is refused by the remote side
        let auth = AuthToken::new("someone-else").unwrap();
        let err = backend.delete_users(&auth, &[UserId(1)]).await.unwrap_err();
        assert!(matches!(err, BackendError::Remote(ref m) if m.contains("someone-else")));
    }
}
