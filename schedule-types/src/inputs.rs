//! Mutation payloads.
//!
//! Field names follow the remote mutation arguments so the same structs can
//! be passed through as GraphQL variables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::activity::ActivityType;
use crate::ids::{ActivityId, BookingId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub diver_role: String,
    pub user_id: UserId,
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    #[serde(default)]
    pub equipment: Option<String>,
    pub time: String,
    #[serde(default)]
    pub instructor_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditBookingInput {
    pub id: BookingId,
    #[serde(default)]
    pub diver_role: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<UserId>,
}

/// Create (no id) or edit (with id) an activity detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetailInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ActivityId>,
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub dive_site1: Option<String>,
    #[serde(default)]
    pub dive_site2: Option<String>,
    #[serde(default)]
    pub dive_guides: Vec<UserId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub cert_level: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditUserInput {
    pub id: UserId,
    #[serde(flatten)]
    pub fields: CreateUserInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Self-service account creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Body of the bulk delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteIds<T> {
    pub ids: Vec<T>,
}

/// Reply of the bulk delete endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_booking_variables_shape() {
        let input = CreateBookingInput {
            diver_role: "diver".to_string(),
            user_id: UserId(5),
            activity_type: ActivityType::PmBoat,
            date: NaiveDate::from_ymd_opt(2021, 3, 25).unwrap(),
            equipment: None,
            time: "1:30pm".to_string(),
            instructor_id: None,
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["userId"], 5);
        assert_eq!(value["activityType"], "PM_BOAT");
        assert_eq!(value["date"], "2021-03-25");
        assert!(value["instructorId"].is_null());
    }

    #[test]
    fn test_edit_user_flattens_fields() {
        let input = EditUserInput {
            id: UserId(9),
            fields: CreateUserInput {
                full_name: "Kai Blue".to_string(),
                email: "kai@example.com".to_string(),
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["id"], 9);
        assert_eq!(value["fullName"], "Kai Blue");
    }
}
