//! Booking table state for one activity slot.
//!
//! The table is in one of three modes:
//! - viewing: rows rendered, nothing selected
//! - selecting: one or more rows checked (delete / edit diver available)
//! - creating: an inline edit row takes the first blank seat
//!
//! Data is never patched locally after a mutation. Callers refetch the
//! activity and hand it back through [`BookingTable::load`].

use chrono::NaiveDate;
use schedule_types::{ActivityDetail, ActivityId, ActivityType, Booking, BookingId, User};

use super::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Viewing,
    Selecting,
    Creating,
}

/// Why "add booking" was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("clear the selection before adding a booking")]
    SelectionActive,
    #[error("the boat is full ({0} seats)")]
    BoatFull(usize),
}

/// One rendered line of the table body.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Booking {
        seat: usize,
        booking: Booking,
        selected: bool,
    },
    /// Inline new-booking entry
    Edit { seat: usize },
    /// Empty boat seat
    Blank { seat: usize },
}

impl TableRow {
    pub fn seat(&self) -> usize {
        match self {
            Self::Booking { seat, .. } | Self::Edit { seat } | Self::Blank { seat } => *seat,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingTable {
    activity_type: ActivityType,
    date: NaiveDate,
    activity: Option<ActivityDetail>,
    selected: Selection<BookingId>,
    creating: bool,
}

impl BookingTable {
    /// Blank table for a slot that has no activity yet.
    pub fn new(activity_type: ActivityType, date: NaiveDate) -> Self {
        Self {
            activity_type,
            date,
            activity: None,
            selected: Selection::new(),
            creating: false,
        }
    }

    pub fn mode(&self) -> TableMode {
        if self.creating {
            TableMode::Creating
        } else if self.selected.is_empty() {
            TableMode::Viewing
        } else {
            TableMode::Selecting
        }
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn activity(&self) -> Option<&ActivityDetail> {
        self.activity.as_ref()
    }

    pub fn activity_id(&self) -> Option<ActivityId> {
        self.activity.as_ref().map(|a| a.id)
    }

    pub fn bookings(&self) -> &[Booking] {
        self.activity
            .as_ref()
            .map(|a| a.booking_set.as_slice())
            .unwrap_or_default()
    }

    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings().iter().find(|b| b.id == id)
    }

    pub fn selected(&self) -> &[BookingId] {
        self.selected.as_slice()
    }

    pub fn is_selected(&self, id: BookingId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn is_boat_trip(&self) -> bool {
        self.activity_type.is_boat_trip()
    }

    /// The single selected booking, when exactly one row is checked.
    pub fn single_selected(&self) -> Option<&Booking> {
        match self.selected.as_slice() {
            [id] => self.booking(*id),
            _ => None,
        }
    }

    /// Replace the loaded activity after a fetch or refetch.
    ///
    /// The selection keeps only ids that are still loaded.
    pub fn load(&mut self, activity: ActivityDetail) {
        self.activity_type = activity.activity_type;
        self.date = activity.date();
        self.activity = Some(activity);
        let loaded: Vec<BookingId> = self.bookings().iter().map(|b| b.id).collect();
        self.selected.retain(|id| loaded.contains(id));
    }

    /// Reset everything for another date or activity.
    pub fn switch_activity(&mut self, activity_type: ActivityType, date: NaiveDate) {
        *self = Self::new(activity_type, date);
    }

    /// Row click. Returns false when the click was ignored.
    pub fn toggle(&mut self, id: BookingId) -> bool {
        if self.creating || self.booking(id).is_none() {
            return false;
        }
        self.selected.toggle(id);
        true
    }

    /// Header checkbox.
    pub fn select_all(&mut self, checked: bool) {
        if checked && !self.creating {
            let ids: Vec<BookingId> = self.bookings().iter().map(|b| b.id).collect();
            self.selected.set_all(ids);
        } else {
            self.selected.clear();
        }
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn all_selected(&self) -> bool {
        !self.bookings().is_empty() && self.selected.len() == self.bookings().len()
    }

    /// Show the inline new-booking row.
    pub fn begin_create(&mut self) -> Result<(), TableError> {
        if !self.selected.is_empty() {
            return Err(TableError::SelectionActive);
        }
        if let Some(capacity) = self.activity_type.capacity() {
            if self.bookings().len() >= capacity {
                return Err(TableError::BoatFull(capacity));
            }
        }
        self.creating = true;
        Ok(())
    }

    pub fn cancel_create(&mut self) {
        self.creating = false;
    }

    /// The new booking was stored remotely; the caller refetches.
    pub fn creation_succeeded(&mut self) {
        self.creating = false;
    }

    /// Ids to send in a single delete call, `None` when nothing is selected.
    pub fn delete_request(&self) -> Option<Vec<BookingId>> {
        (!self.selected.is_empty()).then(|| self.selected.to_vec())
    }

    /// The delete call succeeded; the caller refetches.
    pub fn deletion_succeeded(&mut self) {
        self.selected.clear();
    }

    /// The delete call failed. Nothing changes until the next refetch.
    pub fn deletion_failed(&mut self) {}

    /// Empty seats left on a boat trip; zero for other activities.
    pub fn placeholder_count(&self) -> usize {
        self.activity_type
            .capacity()
            .map(|capacity| capacity.saturating_sub(self.bookings().len()))
            .unwrap_or(0)
    }

    /// Body rows in display order: bookings, the edit row, then blank seats.
    pub fn rows(&self) -> Vec<TableRow> {
        let mut rows: Vec<TableRow> = self
            .bookings()
            .iter()
            .enumerate()
            .map(|(index, booking)| TableRow::Booking {
                seat: index + 1,
                booking: booking.clone(),
                selected: self.selected.contains(&booking.id),
            })
            .collect();

        let mut next_seat = rows.len() + 1;
        let mut blanks = self.placeholder_count();

        if self.creating {
            rows.push(TableRow::Edit { seat: next_seat });
            next_seat += 1;
            blanks = blanks.saturating_sub(1);
        }

        rows.extend((next_seat..next_seat + blanks).map(|seat| TableRow::Blank { seat }));
        rows
    }

    /// Checkboxes replace seat numbers while anything is selected.
    pub fn show_checkboxes(&self) -> bool {
        !self.selected.is_empty()
    }

    /// The header select-all box is offered whenever there is something to select.
    pub fn show_select_all(&self) -> bool {
        !self.creating && !self.bookings().is_empty()
    }

    /// Click on an empty seat. Same rules as the toolbar's add button, but
    /// ignored while the edit row is already open.
    pub fn blank_seat_clicked(&mut self) -> Result<(), TableError> {
        if self.creating {
            return Ok(());
        }
        self.begin_create()
    }

    /// Divers booked against the boat's capacity; `None` for shore dives.
    pub fn diver_total(&self) -> Option<(usize, usize)> {
        self.activity_type
            .capacity()
            .map(|capacity| (self.bookings().len(), capacity))
    }

    /// Guides assigned to the loaded trip.
    pub fn dive_guides(&self) -> &[User] {
        self.activity
            .as_ref()
            .map(|activity| activity.dive_guides.as_slice())
            .unwrap_or(&[])
    }

    /// Header labels for this activity type.
    pub fn columns(&self) -> &'static [&'static str] {
        columns_for(self.activity_type)
    }

    /// Heading used before an activity is loaded.
    pub fn heading(&self) -> String {
        match &self.activity {
            Some(activity) => activity.heading(),
            None => match self.activity_type.trip_time() {
                Some(time) => format!("{} - {}", self.activity_type.label(), time),
                None => self.activity_type.label().to_string(),
            },
        }
    }
}

pub fn columns_for(activity_type: ActivityType) -> &'static [&'static str] {
    if activity_type.is_boat_trip() {
        &["Name", "Role", "Cert", "Equipment"]
    } else {
        &["Name", "Role", "Instructor", "Equipment", "Time"]
    }
}

/// Cell text for one booking, matching [`columns_for`].
pub fn booking_cells(activity_type: ActivityType, booking: &Booking) -> Vec<String> {
    let mut cells = vec![
        booking.diver.full_name().to_string(),
        booking.diver_role.to_uppercase(),
    ];
    if activity_type.is_boat_trip() {
        cells.push(booking.diver.profile.cert_level.clone());
        cells.push(booking.equipment_display().to_string());
    } else {
        cells.push(booking.instructor_name().to_string());
        cells.push(booking.equipment_display().to_string());
        cells.push(booking.time.clone());
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_types::{ActivitySummary, Day, Profile, UserId};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 25).unwrap()
    }

    fn booking(id: i64, activity_type: ActivityType) -> Booking {
        Booking {
            id: BookingId(id),
            diver: User {
                id: UserId(100 + id),
                email: format!("diver{}@example.com", id),
                is_admin: false,
                profile: Profile {
                    full_name: format!("Diver {}", id),
                    cert_level: "Advanced".to_string(),
                    equipment: "Full kit".to_string(),
                    ..Default::default()
                },
            },
            diver_role: "diver".to_string(),
            equipment: String::new(),
            time: "10am".to_string(),
            instructor: None,
            activity_detail: ActivitySummary {
                id: Some(ActivityId(1)),
                activity_type,
            },
        }
    }

    fn activity(activity_type: ActivityType, count: i64) -> ActivityDetail {
        ActivityDetail {
            id: ActivityId(1),
            day: Day { date: date() },
            activity_type,
            time: activity_type.trip_time().map(str::to_string),
            dive_site1: None,
            dive_site2: None,
            dive_guides: vec![],
            booking_set: (1..=count).map(|id| booking(id, activity_type)).collect(),
        }
    }

    fn loaded(activity_type: ActivityType, count: i64) -> BookingTable {
        let mut table = BookingTable::new(activity_type, date());
        table.load(activity(activity_type, count));
        table
    }

    #[test]
    fn test_row_click_moves_between_viewing_and_selecting() {
        let mut table = loaded(ActivityType::AmBoat, 3);
        assert_eq!(table.mode(), TableMode::Viewing);

        assert!(table.toggle(BookingId(2)));
        assert_eq!(table.mode(), TableMode::Selecting);
        assert!(table.show_checkboxes());

        assert!(table.toggle(BookingId(2)));
        assert_eq!(table.mode(), TableMode::Viewing);
        assert!(table.selected().is_empty());
    }

    #[test]
    fn test_toggle_ignores_unknown_ids() {
        let mut table = loaded(ActivityType::AmBoat, 2);
        assert!(!table.toggle(BookingId(99)));
        assert_eq!(table.mode(), TableMode::Viewing);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut table = loaded(ActivityType::PmBoat, 4);
        table.toggle(BookingId(3));
        table.toggle(BookingId(1));

        assert_eq!(
            table.delete_request(),
            Some(vec![BookingId(3), BookingId(1)])
        );
        table.deletion_succeeded();

        assert!(table.selected().is_empty());
        assert_eq!(table.mode(), TableMode::Viewing);
        assert_eq!(table.delete_request(), None);
    }

    #[test]
    fn test_failed_delete_leaves_state_unchanged() {
        let mut table = loaded(ActivityType::PmBoat, 4);
        table.toggle(BookingId(2));
        let before = table.clone();

        table.deletion_failed();
        assert_eq!(table, before);
    }

    #[test]
    fn test_boat_trip_pads_to_capacity() {
        for count in 0..13 {
            let table = loaded(ActivityType::AmBoat, count);
            let blanks = table
                .rows()
                .iter()
                .filter(|r| matches!(r, TableRow::Blank { .. }))
                .count();
            assert_eq!(table.placeholder_count(), 13 - count as usize);
            assert_eq!(blanks, 13 - count as usize);
            assert_eq!(table.rows().len(), 13);
        }
    }

    #[test]
    fn test_shore_dive_has_no_placeholders() {
        let table = loaded(ActivityType::AmShore, 2);
        assert_eq!(table.placeholder_count(), 0);
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn test_seats_are_numbered_consecutively() {
        let mut table = loaded(ActivityType::AmBoat, 2);
        table.begin_create().unwrap();

        let seats: Vec<usize> = table.rows().iter().map(TableRow::seat).collect();
        assert_eq!(seats, (1..=13).collect::<Vec<_>>());
        assert!(matches!(table.rows()[2], TableRow::Edit { seat: 3 }));
    }

    #[test]
    fn test_add_booking_refused_while_selecting() {
        let mut table = loaded(ActivityType::AmBoat, 2);
        table.toggle(BookingId(1));

        assert_eq!(table.begin_create(), Err(TableError::SelectionActive));
        assert_eq!(table.mode(), TableMode::Selecting);
    }

    #[test]
    fn test_add_booking_refused_when_boat_full() {
        let mut table = loaded(ActivityType::PmBoat, 13);
        assert_eq!(table.begin_create(), Err(TableError::BoatFull(13)));
    }

    #[test]
    fn test_creating_ignores_row_clicks_and_returns_to_viewing() {
        let mut table = loaded(ActivityType::AmShore, 2);
        table.begin_create().unwrap();
        assert_eq!(table.mode(), TableMode::Creating);

        assert!(!table.toggle(BookingId(1)));
        table.cancel_create();
        assert_eq!(table.mode(), TableMode::Viewing);

        table.begin_create().unwrap();
        table.creation_succeeded();
        assert_eq!(table.mode(), TableMode::Viewing);
    }

    #[test]
    fn test_switch_activity_resets_state() {
        let mut table = loaded(ActivityType::AmBoat, 3);
        table.toggle(BookingId(1));
        table.switch_activity(ActivityType::AmBoat, date().succ_opt().unwrap());

        assert_eq!(table.mode(), TableMode::Viewing);
        assert!(table.selected().is_empty());
        assert!(table.activity().is_none());

        let mut table = loaded(ActivityType::AmBoat, 3);
        table.begin_create().unwrap();
        table.switch_activity(ActivityType::PmBoat, date());
        assert!(!table.is_creating());
        assert_eq!(table.activity_type(), ActivityType::PmBoat);
    }

    #[test]
    fn test_refetch_prunes_selection() {
        let mut table = loaded(ActivityType::AmBoat, 3);
        table.toggle(BookingId(3));
        table.toggle(BookingId(1));

        table.load(activity(ActivityType::AmBoat, 2));
        assert_eq!(table.selected(), &[BookingId(1)]);
    }

    #[test]
    fn test_select_all() {
        let mut table = loaded(ActivityType::AmShore, 3);
        table.select_all(true);
        assert!(table.all_selected());
        assert_eq!(table.selected().len(), 3);

        table.select_all(false);
        assert!(table.selected().is_empty());
    }

    #[test]
    fn test_single_selected() {
        let mut table = loaded(ActivityType::AmBoat, 3);
        table.toggle(BookingId(2));
        assert_eq!(table.single_selected().map(|b| b.id), Some(BookingId(2)));

        table.toggle(BookingId(3));
        assert!(table.single_selected().is_none());
    }

    #[test]
    fn test_cells_follow_columns() {
        let boat = booking(1, ActivityType::AmBoat);
        let cells = booking_cells(ActivityType::AmBoat, &boat);
        assert_eq!(cells, vec!["Diver 1", "DIVER", "Advanced", "Full kit"]);
        assert_eq!(cells.len(), columns_for(ActivityType::AmBoat).len());

        let shore = booking(2, ActivityType::PmShore);
        let cells = booking_cells(ActivityType::PmShore, &shore);
        assert_eq!(cells.len(), columns_for(ActivityType::PmShore).len());
        assert_eq!(cells[4], "10am");
    }

    #[test]
    fn test_heading_before_load() {
        let table = BookingTable::new(ActivityType::PmBoat, date());
        assert_eq!(table.heading(), "PM Boat - 1:30pm");
        let table = BookingTable::new(ActivityType::NightShore, date());
        assert_eq!(table.heading(), "Night Shore");
    }

    #[test]
    fn test_blank_seat_click_opens_edit_row() {
        let mut table = loaded(ActivityType::AmBoat, 4);
        assert!(table.blank_seat_clicked().is_ok());
        assert_eq!(table.mode(), TableMode::Creating);

        // a second click on another blank seat keeps the single edit row
        assert!(table.blank_seat_clicked().is_ok());
        let edits = table
            .rows()
            .iter()
            .filter(|row| matches!(row, TableRow::Edit { .. }))
            .count();
        assert_eq!(edits, 1);
    }

    #[test]
    fn test_blank_seat_click_refused_while_selecting() {
        let mut table = loaded(ActivityType::PmBoat, 4);
        table.toggle(BookingId(3));
        assert_eq!(table.blank_seat_clicked(), Err(TableError::SelectionActive));
        assert_eq!(table.mode(), TableMode::Selecting);
    }

    #[test]
    fn test_select_all_offered_whenever_bookings_exist() {
        let mut table = loaded(ActivityType::AmBoat, 3);
        assert!(table.show_select_all());
        assert!(!table.show_checkboxes());

        table.select_all(true);
        assert!(table.all_selected());
        assert!(table.show_select_all());

        table.select_all(false);
        table.begin_create().unwrap();
        assert!(!table.show_select_all());

        let empty = loaded(ActivityType::AmShore, 0);
        assert!(!empty.show_select_all());
    }

    #[test]
    fn test_boat_footer_totals_and_guides() {
        let mut detail = activity(ActivityType::AmBoat, 5);
        detail.dive_guides = vec![booking(9, ActivityType::AmBoat).diver];
        let mut table = BookingTable::new(ActivityType::AmBoat, date());
        assert_eq!(table.diver_total(), Some((0, 13)));
        assert!(table.dive_guides().is_empty());

        table.load(detail);
        assert_eq!(table.diver_total(), Some((5, 13)));
        assert_eq!(table.dive_guides().len(), 1);
        assert_eq!(table.dive_guides()[0].full_name(), "Diver 9");

        assert_eq!(loaded(ActivityType::PmShore, 2).diver_total(), None);
    }
}
