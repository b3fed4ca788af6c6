//! Saved default filters: parse/write `filter.conf` and apply to AppState.
//!
//! Only the three dropdown selections are persisted; the search term is
//! always typed fresh.

use std::str::FromStr;

use super::AppState;
use crate::model::{Department, Status, UserRole};

/// Filter selections that can be loaded from or saved to `filter.conf`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FiltersConfig {
    pub department: Option<Department>,
    pub role: Option<UserRole>,
    pub status: Option<Status>,
}

impl FiltersConfig {
    /// Extract the current selections from an [`AppState`].
    pub fn from_app(app: &AppState) -> Self {
        Self {
            department: app.criteria.department,
            role: app.criteria.role,
            status: app.criteria.status,
        }
    }

    pub fn save_from_app(app: &AppState, path: &str) -> std::io::Result<()> {
        Self::from_app(app).write_file(path)
    }

    /// Load filters from `path`, or write an all-off file there.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            tracing::debug!(%e, path, "could not write default filter.conf");
        }
        cfg
    }

    /// Parse `key = value` lines. `All`/`none` and unknown values mean no filter.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let rhs = rhs.trim();
            match lhs.trim() {
                "department" => cfg.department = parse_choice(rhs),
                "role" => cfg.role = parse_choice(rhs),
                "status" => cfg.status = parse_choice(rhs),
                _ => {}
            }
        }
        Some(cfg)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        fn show<T: ToString>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "All".to_string())
        }
        let buf = format!(
            "# usermgmt-portal default filters\n\
             # Use All for no filter.\n\
             # department: All|Computer Science|Electronics|Mathematics|Commerce\n\
             department = {}\n\
             # role: All|Admin|Student|Teaching Staff|Non-Teaching Staff\n\
             role = {}\n\
             # status: All|Active|Inactive\n\
             status = {}\n",
            show(self.department),
            show(self.role),
            show(self.status),
        );
        std::fs::write(path, buf)
    }

    /// Copy the selections into an [`AppState`] and re-filter.
    pub fn apply_to(&self, app: &mut AppState) {
        app.criteria.department = self.department;
        app.criteria.role = self.role;
        app.criteria.status = self.status;
        app.refilter();
    }
}

fn parse_choice<T: FromStr>(s: &str) -> Option<T> {
    match s.to_ascii_lowercase().as_str() {
        "" | "all" | "none" => None,
        _ => s.parse().ok(),
    }
}
