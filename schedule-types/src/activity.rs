//! Scheduled dive slots.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::booking::Booking;
use crate::ids::ActivityId;
use crate::user::User;

/// Seats on the boat for every boat trip.
pub const BOAT_CAPACITY: usize = 13;

/// Kind of scheduled slot. Boat trips have fixed departure times and a seat
/// limit; shore dives are booked per diver time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActivityType {
    AmBoat,
    PmBoat,
    AmShore,
    PmShore,
    NightShore,
    /// Unrecognized remote value
    #[default]
    Unknown,
}

impl ActivityType {
    /// Types the schedule page always offers a table for, in display order.
    pub const DAILY: [ActivityType; 5] = [
        Self::AmBoat,
        Self::PmBoat,
        Self::AmShore,
        Self::PmShore,
        Self::NightShore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AmBoat => "AM_BOAT",
            Self::PmBoat => "PM_BOAT",
            Self::AmShore => "AM_SHORE",
            Self::PmShore => "PM_SHORE",
            Self::NightShore => "NIGHT_SHORE",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AmBoat => "AM Boat",
            Self::PmBoat => "PM Boat",
            Self::AmShore => "AM Shore",
            Self::PmShore => "PM Shore",
            Self::NightShore => "Night Shore",
            Self::Unknown => "Activity",
        }
    }

    pub fn is_boat_trip(self) -> bool {
        matches!(self, Self::AmBoat | Self::PmBoat)
    }

    /// Fixed departure time for boat trips.
    pub fn trip_time(self) -> Option<&'static str> {
        match self {
            Self::AmBoat => Some("9am"),
            Self::PmBoat => Some("1:30pm"),
            _ => None,
        }
    }

    /// Seat limit, `None` for activities without one.
    pub fn capacity(self) -> Option<usize> {
        self.is_boat_trip().then_some(BOAT_CAPACITY)
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ActivityType {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "AM_BOAT" => Self::AmBoat,
            "PM_BOAT" => Self::PmBoat,
            "AM_SHORE" => Self::AmShore,
            "PM_SHORE" => Self::PmShore,
            "NIGHT_SHORE" => Self::NightShore,
            _ => Self::Unknown,
        }
    }
}

impl Serialize for ActivityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Schedule day wrapper as the remote API nests it (`day { date }`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
}

/// Full activity as returned by fetch-activity-by-id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetail {
    pub id: ActivityId,

    pub day: Day,

    pub activity_type: ActivityType,

    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub dive_site1: Option<String>,

    #[serde(default)]
    pub dive_site2: Option<String>,

    #[serde(default)]
    pub dive_guides: Vec<User>,

    #[serde(default)]
    pub booking_set: Vec<Booking>,
}

impl ActivityDetail {
    pub fn date(&self) -> NaiveDate {
        self.day.date
    }

    /// Dive sites that are set, in order.
    pub fn dive_sites(&self) -> Vec<&str> {
        [self.dive_site1.as_deref(), self.dive_site2.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Toolbar heading: type label, time, then dive sites.
    pub fn heading(&self) -> String {
        let mut heading = self.activity_type.label().to_string();
        if let Some(time) = self.time.as_deref().filter(|t| !t.is_empty()) {
            heading.push_str(" - ");
            heading.push_str(time);
        }
        let sites = self.dive_sites();
        if !sites.is_empty() {
            heading.push_str(" - ");
            heading.push_str(&sites.join(" / "));
        }
        heading
    }
}

/// Daily listing entry (`dailyActivityMeta`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMeta {
    pub id: ActivityId,
    pub activity_type: ActivityType,
}

/// The activity a booking belongs to, as embedded in booking payloads.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ActivityId>,
    pub activity_type: ActivityType,
}
