//! Daily schedule logic: booking table state, toolbar rules and forms.
//!
//! Everything here is plain data manipulation so it runs the same in the
//! browser and in unit tests.

pub mod day;
pub mod forms;
pub mod selection;
pub mod table;
pub mod toolbar;

pub use day::{daily_slots, DailySlot};
pub use forms::{ActivityDetailForm, BookingForm, DIVER_ROLES, DIVE_SITES};
pub use selection::Selection;
pub use table::{booking_cells, columns_for, BookingTable, TableError, TableMode, TableRow};
pub use toolbar::ToolbarActions;
