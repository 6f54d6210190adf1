//! Which toolbar actions a booking table offers.

use super::table::BookingTable;

/// Toolbar render model. Pure function of selection count, role and mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarActions {
    pub heading: String,
    /// Selection highlight on the toolbar background
    pub highlighted: bool,
    pub delete: bool,
    pub add_booking: bool,
    pub cancel_booking: bool,
    pub edit_trip: bool,
    pub edit_diver: bool,
}

impl ToolbarActions {
    pub fn for_table(table: &BookingTable, is_admin: bool) -> Self {
        Self::compute(
            table.selected().len(),
            is_admin,
            table.is_creating(),
            table.is_boat_trip(),
            table.heading(),
        )
    }

    pub fn compute(
        num_selected: usize,
        is_admin: bool,
        creating: bool,
        is_boat_trip: bool,
        heading: String,
    ) -> Self {
        let selecting = num_selected > 0;
        Self {
            heading: if selecting {
                format!("{} selected", num_selected)
            } else {
                heading
            },
            highlighted: selecting,
            delete: selecting,
            add_booking: !selecting && !creating && is_admin,
            cancel_booking: !selecting && creating,
            edit_trip: !selecting && !creating && is_boat_trip && is_admin,
            edit_diver: num_selected == 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(selected: usize, admin: bool, creating: bool, boat: bool) -> ToolbarActions {
        ToolbarActions::compute(selected, admin, creating, boat, "AM Boat - 9am".to_string())
    }

    #[test]
    fn test_nothing_selected_admin() {
        let a = actions(0, true, false, true);
        assert_eq!(a.heading, "AM Boat - 9am");
        assert!(!a.highlighted);
        assert!(!a.delete);
        assert!(a.add_booking);
        assert!(!a.cancel_booking);
        assert!(a.edit_trip);
        assert!(!a.edit_diver);
    }

    #[test]
    fn test_nothing_selected_non_admin() {
        let a = actions(0, false, false, true);
        assert!(!a.add_booking);
        assert!(!a.edit_trip);
    }

    #[test]
    fn test_edit_trip_only_for_boats() {
        assert!(!actions(0, true, false, false).edit_trip);
    }

    #[test]
    fn test_creating_offers_cancel_only() {
        let a = actions(0, true, true, true);
        assert!(a.cancel_booking);
        assert!(!a.add_booking);
        assert!(!a.edit_trip);
    }

    #[test]
    fn test_one_selected() {
        let a = actions(1, false, false, true);
        assert_eq!(a.heading, "1 selected");
        assert!(a.highlighted);
        assert!(a.delete);
        assert!(a.edit_diver);
        assert!(!a.add_booking);
    }

    #[test]
    fn test_many_selected() {
        let a = actions(3, true, false, true);
        assert_eq!(a.heading, "3 selected");
        assert!(a.delete);
        assert!(!a.edit_diver);
        assert!(!a.edit_trip);
    }
}
