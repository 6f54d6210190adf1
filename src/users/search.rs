//! Autocomplete options for the user search input.

use schedule_types::User;

/// Offered when a name search has no matches.
pub const CREATE_USER_OPTION: &str = "Create User";

/// What picking an autocomplete option means.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPick {
    User(User),
    /// Go to the user-create page
    CreateUser,
    /// Free text that matches nobody yet
    Nothing,
}

/// Option labels for the latest results.
pub fn search_options(results: &[User]) -> Vec<String> {
    if results.is_empty() {
        return vec![CREATE_USER_OPTION.to_string()];
    }
    results.iter().map(|u| u.full_name().to_string()).collect()
}

/// Resolve the typed or picked value against the latest results.
pub fn resolve_pick(value: &str, results: &[User]) -> SearchPick {
    if value == CREATE_USER_OPTION {
        return SearchPick::CreateUser;
    }
    results
        .iter()
        .find(|u| u.full_name() == value)
        .cloned()
        .map(SearchPick::User)
        .unwrap_or(SearchPick::Nothing)
}
