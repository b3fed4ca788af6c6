// Integration tests for usermgmt-portal
//
// These drive AppState through key events and an in-process fake API, with
// the worker running requests inline so every response shows up on the next
// pump.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use usermgmt_portal::api::ApiGateway;
use usermgmt_portal::app::update::{handle_key, pump, start};
use usermgmt_portal::app::worker::Worker;
use usermgmt_portal::app::{AppState, EditState, InputMode, ModalState, Screen};
use usermgmt_portal::error::ApiError;
use usermgmt_portal::form::UserDraft;
use usermgmt_portal::model::{
    Credentials, Department, ImageFile, LoginResponse, Registration, Status, UserRecord, UserRole,
};
use usermgmt_portal::session::{Session, SessionStore};
use usermgmt_portal::validate::CreateField;

#[derive(Default)]
struct FakeApi {
    users: Mutex<Vec<UserRecord>>,
    calls: Mutex<Vec<String>>,
    token: Mutex<Option<String>>,
    uploads: Mutex<Vec<String>>,
    fail_delete: bool,
    fail_fetch: bool,
    reject_login: bool,
}

impl FakeApi {
    fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Default::default()
        }
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ApiGateway for FakeApi {
    fn register(&self, r: &Registration) -> Result<(), ApiError> {
        self.log(format!("register {}", r.email));
        Ok(())
    }

    fn login(&self, c: &Credentials) -> Result<LoginResponse, ApiError> {
        self.log(format!("login {}", c.email));
        if self.reject_login {
            return Err(ApiError::Status {
                status: 401,
                message: Some("Invalid credentials".into()),
            });
        }
        Ok(LoginResponse {
            token: "tok-123".into(),
            user_id: "u-1".into(),
        })
    }

    fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.log("list");
        Ok(self.users.lock().unwrap().clone())
    }

    fn create_user(&self, draft: &UserDraft, image: &ImageFile) -> Result<(), ApiError> {
        self.log(format!("create {}", draft.username));
        self.uploads.lock().unwrap().push(image.file_name.clone());
        let mut users = self.users.lock().unwrap();
        let id = format!("new-{}", users.len() + 1);
        users.push(UserRecord {
            id,
            username: draft.username.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            department: draft.department.unwrap(),
            user_role: draft.user_role.unwrap(),
            status: Status::Active,
            dob: draft.dob.clone(),
            created_at: None,
            profile_image: Some(image.file_name.clone()),
        });
        Ok(())
    }

    fn fetch_user(&self, id: &str) -> Result<UserRecord, ApiError> {
        self.log(format!("fetch {id}"));
        if self.fail_fetch {
            return Err(ApiError::Status {
                status: 404,
                message: Some("User not found".into()),
            });
        }
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: None,
            })
    }

    fn update_user(&self, user: &UserRecord, _image: Option<&ImageFile>) -> Result<(), ApiError> {
        self.log(format!("update {}", user.id));
        let mut users = self.users.lock().unwrap();
        if let Some(slot) = users.iter_mut().find(|u| u.id == user.id) {
            *slot = user.clone();
        }
        Ok(())
    }

    fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.log(format!("delete {id}"));
        if self.fail_delete {
            return Err(ApiError::Status {
                status: 500,
                message: None,
            });
        }
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

fn user(id: &str, username: &str, d: Department, r: UserRole, s: Status) -> UserRecord {
    UserRecord {
        id: id.into(),
        username: username.into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        department: d,
        user_role: r,
        status: s,
        dob: "2000-05-06".into(),
        created_at: None,
        profile_image: None,
    }
}

fn seed() -> Vec<UserRecord> {
    vec![
        user("1", "alice", Department::ComputerScience, UserRole::Admin, Status::Active),
        user("2", "bob", Department::Commerce, UserRole::Student, Status::Inactive),
        user("3", "carol", Department::Mathematics, UserRole::TeachingStaff, Status::Active),
    ]
}

fn setup(api: FakeApi) -> (Arc<FakeApi>, Worker, AppState) {
    let api = Arc::new(api);
    let worker = Worker::inline(api.clone());
    (api, worker, AppState::default())
}

fn dashboard(api: FakeApi) -> (Arc<FakeApi>, Worker, AppState) {
    let (api, worker, mut app) = setup(api);
    app.screen = Screen::Dashboard;
    start(&mut app, &worker);
    pump(&mut app, &worker);
    (api, worker, app)
}

fn press(app: &mut AppState, worker: &Worker, code: KeyCode) {
    handle_key(app, worker, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_str(app: &mut AppState, worker: &Worker, s: &str) {
    for c in s.chars() {
        press(app, worker, KeyCode::Char(c));
    }
}

fn latest(app: &AppState) -> Option<String> {
    app.notifications.latest().map(|n| n.message.clone())
}

fn temp_path(tag: &str, ext: &str) -> std::path::PathBuf {
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("portal_it_{tag}_{}_{nonce}.{ext}", std::process::id()))
}

// 1) Login persists the session, attaches the token and loads the dashboard
#[test]
fn login_persists_session_and_loads_users() {
    let (api, worker, mut app) = setup(FakeApi::with_users(seed()));
    let session_path = temp_path("session", "conf");
    app.session_store = SessionStore::at(&session_path);

    type_str(&mut app, &worker, "a@b.com");
    press(&mut app, &worker, KeyCode::Tab);
    type_str(&mut app, &worker, "secret");
    press(&mut app, &worker, KeyCode::Tab);
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);

    assert_eq!(app.screen, Screen::Dashboard);
    assert_eq!(latest(&app).as_deref(), Some("Login successful!"));
    assert_eq!(api.token.lock().unwrap().as_deref(), Some("tok-123"));
    let expected = Session {
        token: "tok-123".into(),
        user_id: "u-1".into(),
    };
    assert_eq!(app.session.as_ref(), Some(&expected));
    assert_eq!(SessionStore::at(&session_path).load(), Some(expected));
    assert!(app.login.email.is_empty());

    pump(&mut app, &worker);
    assert_eq!(app.users_all.len(), 3);
    assert!(!app.loading_users);
    assert_eq!(api.calls(), ["login a@b.com", "list"]);
    let _ = std::fs::remove_file(&session_path);
}

// 2) Client-side checks stop the request before it is sent
#[test]
fn login_with_empty_fields_sends_nothing() {
    let (api, worker, mut app) = setup(FakeApi::default());
    app.focus = 2;
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);
    assert_eq!(latest(&app).as_deref(), Some("Please fill in all fields"));

    app.focus = 0;
    type_str(&mut app, &worker, "not-an-email");
    press(&mut app, &worker, KeyCode::Tab);
    type_str(&mut app, &worker, "pw");
    app.focus = 2;
    press(&mut app, &worker, KeyCode::Enter);
    assert_eq!(latest(&app).as_deref(), Some("Please fix validation errors"));
    assert!(api.calls().is_empty());
    assert_eq!(app.screen, Screen::Login);
}

// 3) A rejected login shows the server's message and stays on the login screen
#[test]
fn rejected_login_shows_server_message() {
    let (_api, worker, mut app) = setup(FakeApi {
        reject_login: true,
        ..Default::default()
    });
    app.login.set_text(usermgmt_portal::validate::AuthField::Email, "a@b.com");
    app.login.set_text(usermgmt_portal::validate::AuthField::Password, "pw");
    app.focus = 2;
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);
    assert_eq!(app.screen, Screen::Login);
    assert_eq!(latest(&app).as_deref(), Some("Invalid credentials"));
    assert!(app.session.is_none());
    assert!(!app.login.in_flight);
}

// 4) Registration goes back to the login screen
#[test]
fn register_then_back_to_login() {
    let (api, worker, mut app) = setup(FakeApi::default());
    app.focus = 3;
    press(&mut app, &worker, KeyCode::Enter);
    assert_eq!(app.screen, Screen::Register);

    type_str(&mut app, &worker, "new@portal.io");
    press(&mut app, &worker, KeyCode::Down);
    type_str(&mut app, &worker, "longenough1");
    press(&mut app, &worker, KeyCode::Down);
    type_str(&mut app, &worker, "longenough2");
    press(&mut app, &worker, KeyCode::Down);
    press(&mut app, &worker, KeyCode::Enter);
    assert_eq!(latest(&app).as_deref(), Some("Please correct the validation errors"));

    press(&mut app, &worker, KeyCode::Up);
    press(&mut app, &worker, KeyCode::Backspace);
    type_str(&mut app, &worker, "1");
    press(&mut app, &worker, KeyCode::Down);
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);
    assert_eq!(latest(&app).as_deref(), Some("Registered successfully!"));
    assert_eq!(app.screen, Screen::Login);
    assert_eq!(api.calls(), ["register new@portal.io"]);
}

// 5) Creating a user needs an image; with one it is sent and the list refetched
#[test]
fn create_user_requires_image_then_succeeds() {
    let (api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    press(&mut app, &worker, KeyCode::Char('n'));
    assert!(matches!(app.modal, Some(ModalState::CreateUser { focus: 0 })));

    press(&mut app, &worker, KeyCode::Right);
    press(&mut app, &worker, KeyCode::Down);
    press(&mut app, &worker, KeyCode::Right);
    press(&mut app, &worker, KeyCode::Right);
    for text in ["Dan", "Smith", "dsmith", "password1", "password1", "1999-09-09"] {
        press(&mut app, &worker, KeyCode::Down);
        type_str(&mut app, &worker, text);
    }
    assert_eq!(app.create.draft.department, Some(Department::ComputerScience));
    assert_eq!(app.create.draft.user_role, Some(UserRole::Student));
    assert!(app.create.errors.is_empty());

    app.modal = Some(ModalState::CreateUser { focus: 9 });
    press(&mut app, &worker, KeyCode::Enter);
    assert_eq!(latest(&app).as_deref(), Some("Please fix the highlighted fields"));
    assert_eq!(
        app.create.errors.get(CreateField::Image),
        Some("Profile image is required")
    );
    assert!(!api.calls().iter().any(|c| c.starts_with("create")));

    let img = temp_path("avatar", "png");
    std::fs::write(&img, [0x89, b'P', b'N', b'G']).unwrap();
    app.image_path = img.to_string_lossy().into_owned();
    app.modal = Some(ModalState::CreateUser { focus: 8 });
    press(&mut app, &worker, KeyCode::Enter);
    assert!(app.create.image.is_some());
    assert!(app.create.errors.is_empty());

    app.modal = Some(ModalState::CreateUser { focus: 9 });
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);
    assert_eq!(latest(&app).as_deref(), Some("User added successfully!"));
    assert!(app.modal.is_none());
    assert_eq!(app.create.draft, UserDraft::default());
    assert!(app.image_path.is_empty());

    pump(&mut app, &worker);
    assert_eq!(app.users_all.len(), 4);
    assert!(app.users_all.iter().any(|u| u.username == "dsmith"));
    assert_eq!(api.uploads.lock().unwrap().len(), 1);
    let _ = std::fs::remove_file(&img);
}

// 6) Non-image files are refused before upload
#[test]
fn create_rejects_non_image_file() {
    let (_api, worker, mut app) = dashboard(FakeApi::default());
    press(&mut app, &worker, KeyCode::Char('n'));
    app.modal = Some(ModalState::CreateUser { focus: 8 });
    type_str(&mut app, &worker, "/tmp/notes.txt");
    press(&mut app, &worker, KeyCode::Enter);
    assert!(app.create.image.is_none());
    assert!(
        app.create
            .errors
            .get(CreateField::Image)
            .is_some_and(|m| m.contains("not an image"))
    );
    press(&mut app, &worker, KeyCode::Esc);
    assert!(app.modal.is_none());
    assert!(app.create.errors.is_empty());
}

// 7) Deleting removes exactly the confirmed record
#[test]
fn delete_removes_exactly_one_record() {
    let (api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    press(&mut app, &worker, KeyCode::Down);
    press(&mut app, &worker, KeyCode::Char('x'));
    match &app.modal {
        Some(ModalState::DeleteConfirm { user, selected }) => {
            assert_eq!(user.id, "2");
            assert_eq!(*selected, 1);
        }
        other => panic!("unexpected modal {other:?}"),
    }
    // Enter on Cancel closes without deleting
    press(&mut app, &worker, KeyCode::Enter);
    assert!(app.modal.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);

    press(&mut app, &worker, KeyCode::Delete);
    press(&mut app, &worker, KeyCode::Left);
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);
    assert_eq!(latest(&app).as_deref(), Some("User deleted successfully!"));
    let ids: Vec<_> = app.users_all.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["1", "3"]);
    assert_eq!(app.counts().total, 2);
    assert_eq!(api.calls(), ["list", "delete 2"]);
}

// 8) A failed delete keeps the list as it was
#[test]
fn failed_delete_keeps_list() {
    let (_api, worker, mut app) = dashboard(FakeApi {
        fail_delete: true,
        ..FakeApi::with_users(seed())
    });
    press(&mut app, &worker, KeyCode::Char('x'));
    press(&mut app, &worker, KeyCode::Char('y'));
    pump(&mut app, &worker);
    assert_eq!(latest(&app).as_deref(), Some("Error deleting user!"));
    assert_eq!(app.users_all.len(), 3);
    assert!(!app.delete_in_flight);
}

// 9) Edit: load, block on a missing field, then save and return
#[test]
fn edit_user_round_trip() {
    let (api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    press(&mut app, &worker, KeyCode::Char('e'));
    assert_eq!(app.screen, Screen::EditUser { id: "1".into() });
    assert!(matches!(app.edit, EditState::Loading));
    pump(&mut app, &worker);
    assert!(matches!(&app.edit, EditState::Loaded(f) if f.user.username == "alice"));

    for _ in 0.."Jane".len() {
        press(&mut app, &worker, KeyCode::Backspace);
    }
    app.focus = 8;
    press(&mut app, &worker, KeyCode::Enter);
    assert_eq!(latest(&app).as_deref(), Some("firstName is required!"));
    assert!(!api.calls().iter().any(|c| c.starts_with("update")));

    app.focus = 0;
    type_str(&mut app, &worker, "Alicia");
    app.focus = 5;
    press(&mut app, &worker, KeyCode::Right);
    app.focus = 8;
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);
    assert_eq!(latest(&app).as_deref(), Some("User updated successfully!"));
    assert_eq!(app.screen, Screen::Dashboard);

    pump(&mut app, &worker);
    let alice = app.users_all.iter().find(|u| u.id == "1").unwrap();
    assert_eq!(alice.first_name, "Alicia");
    assert_eq!(alice.status, Status::Inactive);
}

// 10) A failed fetch shows the load error on the edit screen
#[test]
fn edit_fetch_failure_is_reported() {
    let (_api, worker, mut app) = dashboard(FakeApi {
        fail_fetch: true,
        ..FakeApi::with_users(seed())
    });
    press(&mut app, &worker, KeyCode::Enter);
    pump(&mut app, &worker);
    let msg = "Failed to load user data: User not found";
    assert_eq!(latest(&app).as_deref(), Some(msg));
    assert!(matches!(&app.edit, EditState::Failed(m) if m == msg));
    press(&mut app, &worker, KeyCode::Esc);
    assert_eq!(app.screen, Screen::Dashboard);
}

// 11) Paging keys respect the guards; page size changes keep the index
#[test]
fn paging_keys_follow_guards() {
    let many: Vec<_> = (0..30)
        .map(|i| user(&i.to_string(), &format!("user{i:02}"), Department::Commerce, UserRole::Student, Status::Active))
        .collect();
    let (_api, worker, mut app) = dashboard(FakeApi::with_users(many));
    assert_eq!(app.pager.range_label(app.users.len()), "Showing 1 to 10 of 30 entries");

    press(&mut app, &worker, KeyCode::Char('h'));
    assert_eq!(app.pager.index, 0);
    press(&mut app, &worker, KeyCode::Char('l'));
    press(&mut app, &worker, KeyCode::Char('l'));
    press(&mut app, &worker, KeyCode::Char('l'));
    assert_eq!(app.pager.index, 2);
    assert_eq!(app.visible_users()[0].username, "user20");

    press(&mut app, &worker, KeyCode::Char('p'));
    assert_eq!(app.pager.size, 25);
    assert_eq!(app.pager.index, 2);
    assert!(app.visible_users().is_empty());
    assert_eq!(app.pager.range_label(30), "Showing 0 to 0 of 30 entries");

    press(&mut app, &worker, KeyCode::Home);
    assert_eq!(app.pager.index, 0);
    press(&mut app, &worker, KeyCode::End);
    assert_eq!(app.pager.index, 1);
    assert_eq!(app.visible_users().len(), 5);
}

// 12) Filters and search narrow the list without reordering it
#[test]
fn filter_keys_and_search_narrow_list() {
    let (_api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    press(&mut app, &worker, KeyCode::Char('s'));
    assert_eq!(app.criteria.status, Some(Status::Active));
    let ids: Vec<_> = app.users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["1", "3"]);
    assert_eq!(app.counts().inactive, 0);

    press(&mut app, &worker, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Search);
    type_str(&mut app, &worker, "CAR");
    assert_eq!(app.users.len(), 1);
    assert_eq!(app.users[0].username, "carol");
    press(&mut app, &worker, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);

    press(&mut app, &worker, KeyCode::Char('c'));
    assert_eq!(app.users.len(), 3);
}

// 13) Logout forgets the session and drops the token
#[test]
fn logout_clears_session() {
    let (api, worker, mut app) = setup(FakeApi::with_users(seed()));
    let session_path = temp_path("logout", "conf");
    let store = SessionStore::at(&session_path);
    let session = Session {
        token: "t".into(),
        user_id: "u".into(),
    };
    store.save(&session).unwrap();
    app.session_store = store;
    app.session = Some(session);
    app.screen = Screen::Dashboard;
    start(&mut app, &worker);
    pump(&mut app, &worker);
    assert_eq!(api.token.lock().unwrap().as_deref(), Some("t"));
    assert_eq!(app.users_all.len(), 3);

    handle_key(
        &mut app,
        &worker,
        KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
    );
    assert_eq!(app.screen, Screen::Login);
    assert!(app.session.is_none());
    assert!(app.users_all.is_empty());
    assert!(api.token.lock().unwrap().is_none());
    assert!(SessionStore::at(&session_path).load().is_none());
}

// 14) An update that lands after leaving the edit screen touches nothing
#[test]
fn late_update_does_not_close_new_modal() {
    let (api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    press(&mut app, &worker, KeyCode::Char('e'));
    pump(&mut app, &worker);
    app.focus = 8;
    press(&mut app, &worker, KeyCode::Enter);

    press(&mut app, &worker, KeyCode::Esc);
    assert_eq!(app.screen, Screen::Dashboard);
    press(&mut app, &worker, KeyCode::Char('n'));
    pump(&mut app, &worker);

    assert!(api.calls().contains(&"update 1".to_string()));
    assert!(matches!(app.modal, Some(ModalState::CreateUser { .. })));
    assert_eq!(app.input_mode, InputMode::Modal);
    assert_ne!(latest(&app).as_deref(), Some("User updated successfully!"));
}

// 15) One user's update result does not act on another user's edit screen
#[test]
fn update_for_other_user_keeps_edit_screen() {
    let (_api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    press(&mut app, &worker, KeyCode::Char('e'));
    pump(&mut app, &worker);
    app.focus = 8;
    press(&mut app, &worker, KeyCode::Enter);

    press(&mut app, &worker, KeyCode::Esc);
    press(&mut app, &worker, KeyCode::Down);
    press(&mut app, &worker, KeyCode::Char('e'));
    pump(&mut app, &worker);

    assert_eq!(app.screen, Screen::EditUser { id: "2".into() });
    assert!(matches!(&app.edit, EditState::Loaded(f) if f.user.id == "2" && !f.in_flight));
    assert_ne!(latest(&app).as_deref(), Some("User updated successfully!"));
}

fn fill_create_form(app: &mut AppState, worker: &Worker, username: &str, img: &std::path::Path) {
    press(app, worker, KeyCode::Char('n'));
    press(app, worker, KeyCode::Right);
    press(app, worker, KeyCode::Down);
    press(app, worker, KeyCode::Right);
    for text in ["Dan", "Smith", username, "password1", "password1", "1999-09-09"] {
        press(app, worker, KeyCode::Down);
        type_str(app, worker, text);
    }
    press(app, worker, KeyCode::Down);
    type_str(app, worker, &img.to_string_lossy());
    press(app, worker, KeyCode::Enter);
}

// 16) Cancelling a pending create keeps it pending and spares the next entry
#[test]
fn cancelled_create_blocks_resubmit_and_keeps_new_values() {
    let (api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    let img = temp_path("cancel", "png");
    std::fs::write(&img, [0x89, b'P', b'N', b'G']).unwrap();
    fill_create_form(&mut app, &worker, "dsmith", &img);
    assert!(app.create.image.is_some());
    app.modal = Some(ModalState::CreateUser { focus: 9 });
    press(&mut app, &worker, KeyCode::Enter);
    assert!(app.create.in_flight);

    press(&mut app, &worker, KeyCode::Esc);
    assert!(app.modal.is_none());
    assert_eq!(app.create.draft, UserDraft::default());

    press(&mut app, &worker, KeyCode::Char('n'));
    app.modal = Some(ModalState::CreateUser { focus: 9 });
    press(&mut app, &worker, KeyCode::Enter);
    assert_eq!(
        latest(&app).as_deref(),
        Some("Still waiting for the previous request")
    );

    app.modal = Some(ModalState::CreateUser { focus: 4 });
    type_str(&mut app, &worker, "grace");
    pump(&mut app, &worker);

    assert_eq!(latest(&app).as_deref(), Some("User added successfully!"));
    assert_eq!(app.create.draft.username, "grace");
    assert!(!app.create.in_flight);
    assert!(matches!(app.modal, Some(ModalState::CreateUser { .. })));
    let creates = api.calls().iter().filter(|c| c.starts_with("create")).count();
    assert_eq!(creates, 1);

    pump(&mut app, &worker);
    assert!(app.users_all.iter().any(|u| u.username == "dsmith"));
    let _ = std::fs::remove_file(&img);
}

// 17) A list fetched before logout does not refill the mirror
#[test]
fn user_list_after_logout_is_dropped() {
    let (_api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    assert_eq!(app.users_all.len(), 3);
    press(&mut app, &worker, KeyCode::F(5));
    assert!(app.loading_users);
    handle_key(
        &mut app,
        &worker,
        KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
    );
    pump(&mut app, &worker);

    assert_eq!(app.screen, Screen::Login);
    assert!(app.users_all.is_empty());
    assert!(app.users.is_empty());
    assert!(!app.loading_users);
}

// 18) Left walks selectors backwards, Right forwards
#[test]
fn left_cycles_selectors_backwards() {
    let (_api, worker, mut app) = dashboard(FakeApi::with_users(seed()));
    press(&mut app, &worker, KeyCode::Char('n'));
    press(&mut app, &worker, KeyCode::Left);
    assert_eq!(app.create.draft.department, Some(Department::Commerce));
    press(&mut app, &worker, KeyCode::Left);
    assert_eq!(app.create.draft.department, Some(Department::Mathematics));
    press(&mut app, &worker, KeyCode::Down);
    press(&mut app, &worker, KeyCode::Left);
    assert_eq!(app.create.draft.user_role, Some(UserRole::NonTeachingStaff));
    press(&mut app, &worker, KeyCode::Esc);

    press(&mut app, &worker, KeyCode::Char('e'));
    pump(&mut app, &worker);
    app.focus = 3;
    press(&mut app, &worker, KeyCode::Left);
    assert!(matches!(&app.edit, EditState::Loaded(f) if f.user.department == Department::Commerce));
    press(&mut app, &worker, KeyCode::Right);
    assert!(
        matches!(&app.edit, EditState::Loaded(f) if f.user.department == Department::ComputerScience)
    );
}
