//! Booking and trip-detail forms.

use chrono::NaiveDate;
use schedule_types::{
    ActivityDetail, ActivityDetailInput, ActivityId, ActivityType, Booking, BookingId,
    CreateBookingInput, EditBookingInput, User, UserId,
};

use crate::forms::{non_blank, FieldErrors};

/// Roles a diver can hold on a booking.
pub const DIVER_ROLES: [&str; 5] = ["diver", "course", "snorkel", "instructor", "guide"];

/// Dive sites offered in the trip detail form.
pub const DIVE_SITES: [&str; 18] = [
    "Artificial Reef",
    "Dibba Rock",
    "Cauliflower Reef",
    "The Nursery",
    "Inchcape 1",
    "Inchcape Deep",
    "Snoopy Island",
    "Snoopy Deep",
    "Deep Sand",
    "Snoopy 50",
    "3 Rocks",
    "Car Cemetary",
    "Shark Island",
    "Coral Gardens",
    "Hole in the Wall",
    "Inchcape 2",
    "Martini Rock",
    "Other",
];

/// New booking row and edit-diver form.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub diver: Option<User>,
    pub diver_role: String,
    pub equipment: String,
    pub time: String,
    pub instructor: Option<User>,
}

impl BookingForm {
    /// Empty form; boat trips start with their departure time.
    pub fn for_activity(activity_type: ActivityType) -> Self {
        Self {
            diver: None,
            diver_role: DIVER_ROLES[0].to_string(),
            equipment: String::new(),
            time: activity_type.trip_time().unwrap_or_default().to_string(),
            instructor: None,
        }
    }

    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            diver: Some(booking.diver.clone()),
            diver_role: booking.diver_role.clone(),
            equipment: booking.equipment.clone(),
            time: booking.time.clone(),
            instructor: booking.instructor.clone(),
        }
    }

    /// Pick the diver; equipment defaults to their preference.
    pub fn select_diver(&mut self, diver: User) {
        if self.equipment.trim().is_empty() {
            self.equipment = diver.profile.equipment.clone();
        }
        self.diver = Some(diver);
    }

    fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.diver.is_none() {
            errors.add("diver", "Choose a diver");
        }
        errors.require("diverRole", "Role", &self.diver_role);
        errors.require("time", "Time", &self.time);
        errors
    }

    pub fn validate_create(
        &self,
        activity_type: ActivityType,
        date: NaiveDate,
    ) -> Result<CreateBookingInput, FieldErrors> {
        let errors = self.check();
        let user_id = self.diver.as_ref().map(|d| d.id).unwrap_or(UserId(0));
        errors.into_result(|| CreateBookingInput {
            diver_role: self.diver_role.trim().to_string(),
            user_id,
            activity_type,
            date,
            equipment: non_blank(&self.equipment),
            time: self.time.trim().to_string(),
            instructor_id: self.instructor.as_ref().map(|i| i.id),
        })
    }

    pub fn validate_edit(&self, id: BookingId) -> Result<EditBookingInput, FieldErrors> {
        self.check().into_result(|| EditBookingInput {
            id,
            diver_role: non_blank(&self.diver_role),
            // always sent so a cleared field clears the booking's equipment
            equipment: Some(self.equipment.trim().to_string()),
            time: non_blank(&self.time),
            instructor_id: self.instructor.as_ref().map(|i| i.id),
        })
    }
}

/// Trip detail form (edit-trip popover).
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDetailForm {
    pub id: Option<ActivityId>,
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub dive_site1: String,
    pub dive_site2: String,
    pub dive_guides: Vec<User>,
}

impl ActivityDetailForm {
    /// Form for a slot with no activity yet.
    pub fn blank(activity_type: ActivityType, date: NaiveDate) -> Self {
        Self {
            id: None,
            activity_type,
            date,
            time: activity_type.trip_time().map(str::to_string),
            dive_site1: String::new(),
            dive_site2: String::new(),
            dive_guides: Vec::new(),
        }
    }

    pub fn from_activity(activity: &ActivityDetail) -> Self {
        Self {
            id: Some(activity.id),
            activity_type: activity.activity_type,
            date: activity.date(),
            time: activity.time.clone(),
            dive_site1: activity.dive_site1.clone().unwrap_or_default(),
            dive_site2: activity.dive_site2.clone().unwrap_or_default(),
            dive_guides: activity.dive_guides.clone(),
        }
    }

    /// Editing an existing activity rather than creating one.
    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Returns false when the guide is already assigned.
    pub fn add_guide(&mut self, guide: User) -> bool {
        if self.dive_guides.iter().any(|g| g.id == guide.id) {
            return false;
        }
        self.dive_guides.push(guide);
        true
    }

    pub fn remove_guide(&mut self, id: UserId) {
        self.dive_guides.retain(|g| g.id != id);
    }

    pub fn validate(&self) -> Result<ActivityDetailInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.activity_type == ActivityType::Unknown {
            errors.add("activityType", "Activity type is required");
        }
        errors.require("diveSite1", "Dive site 1", &self.dive_site1);
        errors.require("diveSite2", "Dive site 2", &self.dive_site2);

        errors.into_result(|| ActivityDetailInput {
            id: self.id,
            activity_type: self.activity_type,
            date: self.date,
            time: self.time.as_deref().and_then(non_blank),
            dive_site1: non_blank(&self.dive_site1),
            dive_site2: non_blank(&self.dive_site2),
            dive_guides: self.dive_guides.iter().map(|g| g.id).collect(),
        })
    }
}
