//! Application state types and entry glue.
//!
//! One [`AppState`] owns everything the screens show: the user mirror and its
//! filtered view, the current route, the forms, the modal, notifications and
//! the loaded configuration. The event loop lives in [`update`] and is
//! re-exported as `run`.

pub mod config;
pub mod filterconf;
pub mod keymap;
pub mod theme;
pub mod update;
pub mod worker;

use std::time::Instant;

use crate::form::{CreateForm, EditForm, LoginForm, RegisterForm};
use crate::model::UserRecord;
use crate::notify::{Notification, Notifications};
use crate::search::{self, Counts, FilterCriteria, Pager};
use crate::session::{Session, SessionStore};
use crate::validate::{AuthField, CreateField, EditField};

pub use config::{ConfigDir, PortalConfig};
pub use keymap::Keymap;
pub use theme::Theme;

/// Current screen; each maps to one route of the portal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Dashboard,
    EditUser { id: String },
}

impl Screen {
    pub fn route(&self) -> String {
        match self {
            Screen::Login => "/".to_string(),
            Screen::Register => "/register".to_string(),
            Screen::Dashboard => "/dashboard".to_string(),
            Screen::EditUser { id } => format!("/edituser/{id}"),
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Dialogs drawn over the dashboard.
#[derive(Clone, Debug)]
pub enum ModalState {
    /// The "Add User" form; `focus` indexes [`CREATE_ROWS`].
    CreateUser { focus: usize },
    /// Delete confirmation; `selected` 0 = Delete, 1 = Cancel.
    DeleteConfirm { user: UserRecord, selected: usize },
    Help { scroll: u16 },
}

/// Edit screen lifecycle: the record is fetched before the form exists.
#[derive(Clone, Debug)]
pub enum EditState {
    Loading,
    Loaded(EditForm),
    Failed(String),
}

/// A focusable row of the create modal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CreateRow {
    Field(CreateField),
    ImagePath,
    Save,
    Cancel,
}

pub const CREATE_ROWS: [CreateRow; 11] = [
    CreateRow::Field(CreateField::Department),
    CreateRow::Field(CreateField::UserRole),
    CreateRow::Field(CreateField::FirstName),
    CreateRow::Field(CreateField::LastName),
    CreateRow::Field(CreateField::Username),
    CreateRow::Field(CreateField::Password),
    CreateRow::Field(CreateField::ConfirmPassword),
    CreateRow::Field(CreateField::Dob),
    CreateRow::ImagePath,
    CreateRow::Save,
    CreateRow::Cancel,
];

/// A focusable row of the edit screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditRow {
    Field(EditField),
    ImagePath,
    Update,
    Back,
}

pub const EDIT_ROWS: [EditRow; 10] = [
    EditRow::Field(EditField::FirstName),
    EditRow::Field(EditField::LastName),
    EditRow::Field(EditField::Username),
    EditRow::Field(EditField::Department),
    EditRow::Field(EditField::UserRole),
    EditRow::Field(EditField::Status),
    EditRow::Field(EditField::Dob),
    EditRow::ImagePath,
    EditRow::Update,
    EditRow::Back,
];

/// A focusable row of the login and register screens.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthRow {
    Field(AuthField),
    Submit,
    /// Link to the other auth screen.
    Switch,
}

pub const LOGIN_ROWS: [AuthRow; 4] = [
    AuthRow::Field(AuthField::Email),
    AuthRow::Field(AuthField::Password),
    AuthRow::Submit,
    AuthRow::Switch,
];

pub const REGISTER_ROWS: [AuthRow; 5] = [
    AuthRow::Field(AuthField::Email),
    AuthRow::Field(AuthField::Password),
    AuthRow::Field(AuthField::ConfirmPassword),
    AuthRow::Submit,
    AuthRow::Switch,
];

pub struct AppState {
    pub started_at: Instant,
    pub screen: Screen,
    /// Mirror of the server's user list, in server order.
    pub users_all: Vec<UserRecord>,
    /// `users_all` narrowed by `criteria`.
    pub users: Vec<UserRecord>,
    pub criteria: FilterCriteria,
    pub pager: Pager,
    /// Cursor within the visible page.
    pub selected_row: usize,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    /// Row cursor on the login, register and edit screens.
    pub focus: usize,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub create: CreateForm,
    /// Path typed into the create modal's image row.
    pub image_path: String,
    pub edit: EditState,
    pub edit_image_path: String,
    pub session: Option<Session>,
    pub session_store: SessionStore,
    pub notifications: Notifications,
    pub theme: Theme,
    pub keymap: Keymap,
    pub show_keybinds: bool,
    pub loading_users: bool,
    pub delete_in_flight: bool,
    /// Where `SaveFilters` writes; `None` keeps filters in memory only.
    pub filter_path: Option<String>,
    pub should_quit: bool,
}

impl Default for AppState {
    /// A state touching no files: default theme and keymap, in-memory session.
    fn default() -> Self {
        Self {
            started_at: Instant::now(),
            screen: Screen::Login,
            users_all: Vec::new(),
            users: Vec::new(),
            criteria: FilterCriteria::default(),
            pager: Pager::default(),
            selected_row: 0,
            input_mode: InputMode::Normal,
            modal: None,
            focus: 0,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            create: CreateForm::default(),
            image_path: String::new(),
            edit: EditState::Loading,
            edit_image_path: String::new(),
            session: None,
            session_store: SessionStore::in_memory(),
            notifications: Notifications::default(),
            theme: Theme::default(),
            keymap: Keymap::default(),
            show_keybinds: false,
            loading_users: false,
            delete_in_flight: false,
            filter_path: None,
            should_quit: false,
        }
    }
}

impl AppState {
    /// Build the state from the config directory: theme, keybindings, saved
    /// filters and any stored session. A stored session opens the dashboard.
    pub fn new(dir: &ConfigDir, cfg: &PortalConfig, theme: Option<Theme>) -> Self {
        let filter_path = dir.file("filter.conf");
        let filters = filterconf::FiltersConfig::load_or_init(&filter_path);
        let session_store = SessionStore::at(dir.path().join("session.conf"));
        let session = session_store.load();
        let mut app = Self {
            theme: theme.unwrap_or_else(|| Theme::load_or_init(&dir.file("theme.conf"))),
            keymap: Keymap::load_or_init(&dir.file("keybinds.conf")),
            pager: Pager::new(cfg.page_size),
            screen: if session.is_some() {
                Screen::Dashboard
            } else {
                Screen::Login
            },
            session,
            session_store,
            filter_path: Some(filter_path),
            ..Self::default()
        };
        filters.apply_to(&mut app);
        app
    }

    /// Replace the mirror with a freshly fetched list.
    pub fn set_users(&mut self, users: Vec<UserRecord>) {
        self.users_all = users;
        self.refilter();
    }

    pub fn refilter(&mut self) {
        search::apply_filters_and_search(self);
    }

    /// Splice the record with `id` out of the mirror. Only the first match is
    /// removed; returns whether one was found.
    pub fn remove_user(&mut self, id: &str) -> bool {
        let Some(pos) = self.users_all.iter().position(|u| u.id == id) else {
            return false;
        };
        self.users_all.remove(pos);
        self.refilter();
        true
    }

    /// The rows on the current page.
    pub fn visible_users(&self) -> &[UserRecord] {
        self.pager.slice(&self.users)
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.visible_users().get(self.selected_row)
    }

    pub fn counts(&self) -> Counts {
        Counts::of(&self.users)
    }

    /// Clamp the row cursor after the page or page size moved.
    pub fn clamp_selection(&mut self) {
        let visible = self.visible_users().len();
        self.selected_row = self.selected_row.min(visible.saturating_sub(1));
    }

    /// Switch screens, dropping any modal and resetting the row cursor.
    pub fn navigate(&mut self, screen: Screen) {
        tracing::info!(route = %screen.route(), "navigate");
        self.screen = screen;
        self.focus = 0;
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn notify(&mut self, n: Notification) {
        self.notifications.push(n);
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Forget the session both in memory and on disk.
    pub fn logout(&mut self) {
        self.session = None;
        if let Err(e) = self.session_store.clear() {
            tracing::warn!(%e, "failed to clear stored session");
        }
        self.users_all.clear();
        self.users.clear();
        self.selected_row = 0;
        self.navigate(Screen::Login);
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
