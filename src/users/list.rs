//! User list page state: sort, name filter, pagination and selection.

use schedule_types::{User, UserId};

use crate::schedule::Selection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    FullName,
    Email,
    CertLevel,
    Equipment,
}

impl SortKey {
    pub const COLUMNS: [(SortKey, &'static str); 4] = [
        (SortKey::FullName, "Name"),
        (SortKey::Email, "Email"),
        (SortKey::CertLevel, "Certification Level"),
        (SortKey::Equipment, "Equipment"),
    ];

    fn value(self, user: &User) -> String {
        match self {
            Self::FullName => user.profile.full_name.to_lowercase(),
            Self::Email => user.email.to_lowercase(),
            Self::CertLevel => user.profile.cert_level.to_lowercase(),
            Self::Equipment => user.profile.equipment.to_lowercase(),
        }
    }
}

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

#[derive(Debug, Clone, PartialEq)]
pub struct UserListState {
    pub order: SortOrder,
    pub order_by: SortKey,
    pub filter_name: String,
    pub page: usize,
    pub rows_per_page: usize,
    selected: Selection<UserId>,
}

impl Default for UserListState {
    fn default() -> Self {
        Self {
            order: SortOrder::Asc,
            order_by: SortKey::FullName,
            filter_name: String::new(),
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            selected: Selection::new(),
        }
    }
}

impl UserListState {
    /// Clicking the active column flips the order; another column sorts ascending.
    pub fn request_sort(&mut self, key: SortKey) {
        let is_asc = self.order_by == key && self.order == SortOrder::Asc;
        self.order = if is_asc { SortOrder::Desc } else { SortOrder::Asc };
        self.order_by = key;
    }

    pub fn set_filter(&mut self, name: impl Into<String>) {
        self.filter_name = name.into();
        self.page = 0;
    }

    pub fn set_rows_per_page(&mut self, rows: usize) {
        self.rows_per_page = rows.max(1);
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Stable sort, then case-insensitive name filter.
    pub fn filtered(&self, users: &[User]) -> Vec<User> {
        let mut sorted: Vec<User> = users.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = self.order_by.value(a).cmp(&self.order_by.value(b));
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let query = self.filter_name.trim().to_lowercase();
        if query.is_empty() {
            return sorted;
        }
        sorted
            .into_iter()
            .filter(|u| u.profile.full_name.to_lowercase().contains(&query))
            .collect()
    }

    /// Rows of the current page.
    pub fn page_rows(&self, users: &[User]) -> Vec<User> {
        self.filtered(users)
            .into_iter()
            .skip(self.page * self.rows_per_page)
            .take(self.rows_per_page)
            .collect()
    }

    pub fn page_count(&self, users: &[User]) -> usize {
        self.filtered(users).len().div_ceil(self.rows_per_page).max(1)
    }

    /// Filler rows keeping the last page the same height as the others.
    pub fn empty_rows(&self, total: usize) -> usize {
        if self.page == 0 {
            return 0;
        }
        ((self.page + 1) * self.rows_per_page).saturating_sub(total)
    }

    pub fn selected(&self) -> &[UserId] {
        self.selected.as_slice()
    }

    pub fn is_selected(&self, id: UserId) -> bool {
        self.selected.contains(&id)
    }

    pub fn toggle(&mut self, id: UserId) {
        self.selected.toggle(id);
    }

    /// Header checkbox: checking with rows already selected clears them.
    pub fn select_all(&mut self, checked: bool, users: &[User]) {
        if checked && self.selected.is_empty() {
            self.selected.set_all(users.iter().map(|u| u.id));
        } else {
            self.selected.clear();
        }
    }

    /// Selected users in the order they were picked.
    pub fn selected_users(&self, users: &[User]) -> Vec<User> {
        self.selected
            .as_slice()
            .iter()
            .filter_map(|id| users.iter().find(|u| u.id == *id).cloned())
            .collect()
    }

    pub fn delete_request(&self) -> Option<Vec<UserId>> {
        (!self.selected.is_empty()).then(|| self.selected.to_vec())
    }

    pub fn deletion_succeeded(&mut self) {
        self.selected.clear();
    }
}
