//! In-memory filtering and pagination of the user list.
//!
//! Filtering narrows the mirrored list step by step (department, role,
//! status, then the username search term) and never reorders it. Pagination
//! works on the filtered list with an explicit page index and page size.

use crate::app::AppState;
use crate::model::{Department, Status, UserRecord, UserRole};

/// Page sizes offered by the "Show N entries" selector.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Active filter selections. `None` / empty means "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub department: Option<Department>,
    pub role: Option<UserRole>,
    pub status: Option<Status>,
    pub search_term: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.department.is_none()
            && self.role.is_none()
            && self.status.is_none()
            && self.search_term.trim().is_empty()
    }

    /// Whether a single record passes every active criterion.
    pub fn matches(&self, user: &UserRecord) -> bool {
        if self.department.is_some_and(|d| user.department != d) {
            return false;
        }
        if self.role.is_some_and(|r| user.user_role != r) {
            return false;
        }
        if self.status.is_some_and(|s| user.status != s) {
            return false;
        }
        // blank terms disable the search; others match as typed, spaces included
        self.search_term.trim().is_empty()
            || user
                .username
                .to_lowercase()
                .contains(&self.search_term.to_lowercase())
    }
}

/// Filter `all` by `criteria`, preserving source order.
pub fn apply(all: &[UserRecord], criteria: &FilterCriteria) -> Vec<UserRecord> {
    if criteria.is_empty() {
        return all.to_vec();
    }
    all.iter().filter(|u| criteria.matches(u)).cloned().collect()
}

/// Re-run the filters of an [`AppState`] over its mirrored list.
pub fn apply_filters_and_search(app: &mut AppState) {
    app.users = apply(&app.users_all, &app.criteria);
    let visible = app.visible_users().len();
    app.selected_row = app.selected_row.min(visible.saturating_sub(1));
}

/// Summary counts over a (filtered) list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl Counts {
    pub fn of(users: &[UserRecord]) -> Self {
        users.iter().fold(
            Counts {
                total: users.len(),
                ..Counts::default()
            },
            |mut c, u| {
                match u.status {
                    Status::Active => c.active += 1,
                    Status::Inactive => c.inactive += 1,
                }
                c
            },
        )
    }
}

/// The contiguous slice `[index*size, index*size + size)` clipped to bounds.
pub fn page<T>(list: &[T], index: usize, size: usize) -> &[T] {
    let start = index.saturating_mul(size);
    if start >= list.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(list.len());
    &list[start..end]
}

/// Page index and size with first/previous/next/last guards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pager {
    pub index: usize,
    pub size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            index: 0,
            size: PAGE_SIZES[0],
        }
    }
}

impl Pager {
    pub fn new(size: usize) -> Self {
        Self {
            index: 0,
            size: size.max(1),
        }
    }

    /// "first" / "previous" are enabled.
    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    /// "next" / "last" are enabled.
    pub fn can_go_forward(&self, len: usize) -> bool {
        (self.index + 1).saturating_mul(self.size) < len
    }

    /// Number of pages needed for `len` items (at least one).
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.size.max(1)).max(1)
    }

    pub fn first(&mut self) {
        if self.can_go_back() {
            self.index = 0;
        }
    }

    pub fn prev(&mut self) {
        if self.can_go_back() {
            self.index -= 1;
        }
    }

    pub fn next(&mut self, len: usize) {
        if self.can_go_forward(len) {
            self.index += 1;
        }
    }

    pub fn last(&mut self, len: usize) {
        if self.can_go_forward(len) {
            self.index = self.page_count(len) - 1;
        }
    }

    /// Switch to the next page size. The page index is left as is.
    pub fn cycle_size(&mut self) {
        let pos = PAGE_SIZES.iter().position(|s| *s == self.size);
        self.size = match pos {
            Some(i) => PAGE_SIZES[(i + 1) % PAGE_SIZES.len()],
            None => PAGE_SIZES[0],
        };
    }

    pub fn slice<'a, T>(&self, list: &'a [T]) -> &'a [T] {
        page(list, self.index, self.size)
    }

    /// Footer text: "Showing A to B of N entries".
    pub fn range_label(&self, len: usize) -> String {
        let start = self.index * self.size;
        let end = ((self.index + 1) * self.size).min(len);
        if start >= len {
            format!("Showing 0 to 0 of {len} entries")
        } else {
            format!("Showing {} to {} of {} entries", start + 1, end, len)
        }
    }
}
