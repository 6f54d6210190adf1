//! User management logic: list state, search options and account forms.

pub mod forms;
pub mod list;
pub mod search;

pub use forms::{LoginForm, RegisterForm, UserForm, CERT_LEVELS};
pub use list::{SortKey, SortOrder, UserListState, ROWS_PER_PAGE_OPTIONS};
pub use search::{resolve_pick, search_options, SearchPick, CREATE_USER_OPTION};
