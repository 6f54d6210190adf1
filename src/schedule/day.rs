//! Which booking tables the schedule page shows for a day.

use schedule_types::{ActivityId, ActivityMeta, ActivityType};

/// One table on the daily schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySlot {
    pub activity_type: ActivityType,
    /// `None` until the first booking or trip details create the activity
    pub activity_id: Option<ActivityId>,
}

/// Boat trips are always listed so bookings can be added to an empty day.
/// Shore dives only appear once they exist. Unknown types are skipped.
pub fn daily_slots(metas: &[ActivityMeta]) -> Vec<DailySlot> {
    ActivityType::DAILY
        .into_iter()
        .filter_map(|activity_type| {
            let activity_id = metas
                .iter()
                .find(|m| m.activity_type == activity_type)
                .map(|m| m.id);
            (activity_id.is_some() || activity_type.is_boat_trip()).then_some(DailySlot {
                activity_type,
                activity_id,
            })
        })
        .collect()
}
