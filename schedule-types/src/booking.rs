//! One diver's reservation within an activity.

use serde::{Deserialize, Serialize};

use crate::activity::ActivitySummary;
use crate::ids::BookingId;
use crate::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,

    pub diver: User,

    /// Remote enum-like string (e.g., "diver", "course", "snorkel")
    #[serde(default)]
    pub diver_role: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub equipment: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,

    #[serde(default)]
    pub instructor: Option<User>,

    pub activity_detail: ActivitySummary,
}

impl Booking {
    pub fn instructor_name(&self) -> &str {
        self.instructor
            .as_ref()
            .map(|i| i.full_name())
            .unwrap_or_default()
    }

    /// Equipment on the booking, falling back to the diver's preference.
    pub fn equipment_display(&self) -> &str {
        if self.equipment.is_empty() {
            &self.diver.profile.equipment
        } else {
            &self.equipment
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityType;

    #[test]
    fn test_booking_from_remote_json() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": "101",
            "diverRole": "diver",
            "equipment": null,
            "time": "9am",
            "activityDetail": { "activityType": "AM_BOAT" },
            "instructor": null,
            "diver": {
                "id": "5",
                "profile": { "fullName": "Ana Coral", "equipment": "Own BCD" }
            }
        }))
        .unwrap();

        assert_eq!(booking.id, BookingId(101));
        assert_eq!(booking.activity_detail.activity_type, ActivityType::AmBoat);
        assert_eq!(booking.instructor_name(), "");
        assert_eq!(booking.equipment, "");
        assert_eq!(booking.equipment_display(), "Own BCD");
    }
}
