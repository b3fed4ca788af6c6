//! Event loop: key handling per screen and folding worker responses back
//! into [`AppState`].

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;

use super::filterconf::FiltersConfig;
use super::keymap::KeyAction;
use super::worker::{Request, Response, Worker};
use super::{
    AppState, AuthRow, CREATE_ROWS, CreateRow, EDIT_ROWS, EditRow, EditState, InputMode,
    LOGIN_ROWS, ModalState, REGISTER_ROWS, Screen,
};
use crate::form::EditForm;
use crate::model::{Choice, Department, ImageFile, Status, UserRole};
use crate::notify::Notification;
use crate::validate::{CreateField, EditField};
use crate::ui;

const TICK: Duration = Duration::from_millis(100);

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    worker: &Worker,
) -> Result<()> {
    start(app, worker);
    loop {
        pump(app, worker);
        terminal.draw(|f| ui::render(f, app))?;
        if app.should_quit {
            break;
        }
        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key(app, worker, key);
        }
    }
    tracing::info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

/// Restore a stored session: attach its token and load the dashboard.
pub fn start(app: &mut AppState, worker: &Worker) {
    if let Some(session) = &app.session {
        tracing::info!(user_id = %session.user_id, "resuming stored session");
        worker.api().set_token(Some(session.token.clone()));
    }
    if app.screen == Screen::Dashboard {
        request_users(app, worker);
    }
}

/// Apply every response that arrived and expire old notifications.
pub fn pump(app: &mut AppState, worker: &Worker) {
    for resp in worker.drain() {
        apply_response(app, worker, resp);
    }
    app.notifications.prune(Instant::now());
}

pub fn handle_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    match app.screen {
        Screen::Login | Screen::Register => handle_auth_key(app, worker, key),
        Screen::Dashboard => match app.input_mode {
            InputMode::Modal => handle_modal_key(app, worker, key),
            InputMode::Search => handle_search_key(app, key.code),
            InputMode::Normal => handle_dashboard_key(app, worker, key),
        },
        Screen::EditUser { .. } => handle_edit_key(app, worker, key),
    }
}

fn step(focus: usize, len: usize, forward: bool) -> usize {
    if forward {
        (focus + 1) % len
    } else {
        (focus + len - 1) % len
    }
}

fn handle_auth_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    let on_login = app.screen == Screen::Login;
    let rows: &[AuthRow] = if on_login { &LOGIN_ROWS } else { &REGISTER_ROWS };
    let row = rows[app.focus.min(rows.len() - 1)];
    match (key.code, row) {
        (KeyCode::Esc, _) => app.should_quit = true,
        (KeyCode::Tab | KeyCode::Down, _) => app.focus = step(app.focus, rows.len(), true),
        (KeyCode::BackTab | KeyCode::Up, _) => app.focus = step(app.focus, rows.len(), false),
        (KeyCode::Enter, AuthRow::Field(_)) => app.focus = step(app.focus, rows.len(), true),
        (KeyCode::Enter, AuthRow::Submit) => {
            if on_login {
                submit_login(app, worker);
            } else {
                submit_register(app, worker);
            }
        }
        (KeyCode::Enter, AuthRow::Switch) => {
            app.navigate(if on_login { Screen::Register } else { Screen::Login });
        }
        (KeyCode::Backspace, AuthRow::Field(f)) => {
            if on_login {
                app.login.pop_char(f);
            } else {
                app.register.pop_char(f);
            }
        }
        (KeyCode::Char(c), AuthRow::Field(f)) => {
            if on_login {
                app.login.push_char(f, c);
            } else {
                app.register.push_char(f, c);
            }
        }
        _ => {}
    }
}

pub fn submit_login(app: &mut AppState, worker: &Worker) {
    match app.login.prepare_submit() {
        Ok(creds) => worker.dispatch(Request::Login(creds)),
        Err(n) => app.notify(n),
    }
}

pub fn submit_register(app: &mut AppState, worker: &Worker) {
    match app.register.prepare_submit() {
        Ok(reg) => worker.dispatch(Request::Register(reg)),
        Err(n) => app.notify(n),
    }
}

/// Fetch the user list unless a fetch is already running.
pub fn request_users(app: &mut AppState, worker: &Worker) {
    if app.loading_users {
        return;
    }
    app.loading_users = true;
    worker.dispatch(Request::ListUsers);
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.criteria.search_term.clear();
            app.refilter();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.criteria.search_term.pop();
            app.refilter();
        }
        KeyCode::Char(c) => {
            app.criteria.search_term.push(c);
            app.refilter();
        }
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else {
        return;
    };
    let len = app.users.len();
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::CycleDepartment => {
            app.criteria.department = Department::cycle_optional(app.criteria.department);
            app.refilter();
        }
        KeyAction::CycleRole => {
            app.criteria.role = UserRole::cycle_optional(app.criteria.role);
            app.refilter();
        }
        KeyAction::CycleStatus => {
            app.criteria.status = Status::cycle_optional(app.criteria.status);
            app.refilter();
        }
        KeyAction::ClearFilters => {
            app.criteria = Default::default();
            app.refilter();
        }
        KeyAction::SaveFilters => save_filters(app),
        KeyAction::NewUser => app.open_modal(ModalState::CreateUser { focus: 0 }),
        KeyAction::EditSelection => open_edit(app, worker),
        KeyAction::DeleteSelection => {
            if let Some(user) = app.selected_user().cloned() {
                app.open_modal(ModalState::DeleteConfirm { user, selected: 1 });
            }
        }
        KeyAction::MoveUp => app.selected_row = app.selected_row.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_row + 1 < app.visible_users().len() {
                app.selected_row += 1;
            }
        }
        KeyAction::FirstPage => app.pager.first(),
        KeyAction::PrevPage => app.pager.prev(),
        KeyAction::NextPage => app.pager.next(len),
        KeyAction::LastPage => app.pager.last(len),
        KeyAction::CyclePageSize => app.pager.cycle_size(),
        KeyAction::Refresh => request_users(app, worker),
        KeyAction::Logout => {
            app.logout();
            worker.api().set_token(None);
            app.notify(Notification::info("Logged out"));
        }
        KeyAction::ToggleKeybindsPane => app.show_keybinds = !app.show_keybinds,
        KeyAction::Ignore => {}
    }
    if matches!(
        action,
        KeyAction::FirstPage
            | KeyAction::PrevPage
            | KeyAction::NextPage
            | KeyAction::LastPage
            | KeyAction::CyclePageSize
    ) {
        app.clamp_selection();
    }
}

fn save_filters(app: &mut AppState) {
    let Some(path) = app.filter_path.clone() else {
        return;
    };
    match FiltersConfig::save_from_app(app, &path) {
        Ok(()) => app.notify(Notification::success("Filters saved")),
        Err(e) => {
            tracing::warn!(%e, path, "saving filters failed");
            app.notify(Notification::error(format!("Could not save filters: {e}")));
        }
    }
}

fn open_edit(app: &mut AppState, worker: &Worker) {
    let Some(id) = app.selected_user().map(|u| u.id.clone()) else {
        return;
    };
    app.edit = EditState::Loading;
    app.edit_image_path.clear();
    app.navigate(Screen::EditUser { id: id.clone() });
    worker.dispatch(Request::FetchUser(id));
}

fn handle_modal_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    match &mut app.modal {
        Some(ModalState::CreateUser { focus }) => {
            let focus = *focus;
            handle_create_key(app, worker, focus, key.code);
        }
        Some(ModalState::DeleteConfirm { user, selected }) => match key.code {
            KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                *selected = 1 - *selected;
            }
            KeyCode::Char('y') => {
                let id = user.id.clone();
                confirm_delete(app, worker, id);
            }
            KeyCode::Enter => {
                let (id, confirmed) = (user.id.clone(), *selected == 0);
                if confirmed {
                    confirm_delete(app, worker, id);
                } else {
                    app.close_modal();
                }
            }
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.close_modal()
            }
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

fn confirm_delete(app: &mut AppState, worker: &Worker, id: String) {
    app.close_modal();
    if app.delete_in_flight {
        app.notify(Notification::info(crate::form::IN_FLIGHT));
        return;
    }
    app.delete_in_flight = true;
    worker.dispatch(Request::DeleteUser(id));
}

fn set_create_focus(app: &mut AppState, focus: usize) {
    if let Some(ModalState::CreateUser { focus: f }) = &mut app.modal {
        *f = focus;
    }
}

fn handle_create_key(app: &mut AppState, worker: &Worker, focus: usize, code: KeyCode) {
    let row = CREATE_ROWS[focus.min(CREATE_ROWS.len() - 1)];
    match (code, row) {
        (KeyCode::Esc, _) | (KeyCode::Enter, CreateRow::Cancel) => cancel_create(app),
        (KeyCode::Tab | KeyCode::Down, _) => {
            set_create_focus(app, step(focus, CREATE_ROWS.len(), true))
        }
        (KeyCode::BackTab | KeyCode::Up, _) => {
            set_create_focus(app, step(focus, CREATE_ROWS.len(), false))
        }
        (KeyCode::Left, CreateRow::Field(CreateField::Department)) => {
            let prev = Department::cycle_prev(app.create.draft.department);
            app.create.set_department(Some(prev));
        }
        (KeyCode::Left, CreateRow::Field(CreateField::UserRole)) => {
            let prev = UserRole::cycle_prev(app.create.draft.user_role);
            app.create.set_user_role(Some(prev));
        }
        (
            KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter,
            CreateRow::Field(CreateField::Department),
        ) => {
            let next = Department::cycle_next(app.create.draft.department);
            app.create.set_department(Some(next));
        }
        (
            KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter,
            CreateRow::Field(CreateField::UserRole),
        ) => {
            let next = UserRole::cycle_next(app.create.draft.user_role);
            app.create.set_user_role(Some(next));
        }
        (KeyCode::Backspace, CreateRow::Field(CreateField::Department)) => {
            app.create.set_department(None)
        }
        (KeyCode::Backspace, CreateRow::Field(CreateField::UserRole)) => {
            app.create.set_user_role(None)
        }
        (KeyCode::Enter, CreateRow::Field(_)) => {
            set_create_focus(app, step(focus, CREATE_ROWS.len(), true))
        }
        (KeyCode::Backspace, CreateRow::Field(f)) => app.create.pop_char(f),
        (KeyCode::Char(c), CreateRow::Field(f)) => app.create.push_char(f, c),
        (KeyCode::Backspace, CreateRow::ImagePath) => {
            app.image_path.pop();
        }
        (KeyCode::Char(c), CreateRow::ImagePath) => app.image_path.push(c),
        (KeyCode::Enter, CreateRow::ImagePath) => {
            match ImageFile::load(app.image_path.trim()) {
                Ok(img) => app.create.attach_image(img),
                Err(e) => app.create.reject_image(&e),
            }
        }
        (KeyCode::Enter, CreateRow::Save) => submit_create(app, worker),
        _ => {}
    }
}

pub fn submit_create(app: &mut AppState, worker: &Worker) {
    match app.create.prepare_submit() {
        Ok(new_user) => worker.dispatch(Request::CreateUser(new_user)),
        Err(n) => app.notify(n),
    }
}

fn cancel_create(app: &mut AppState) {
    app.create.discard();
    app.image_path.clear();
    app.close_modal();
}

fn handle_edit_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    let EditState::Loaded(form) = &mut app.edit else {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            app.navigate(Screen::Dashboard);
        }
        return;
    };
    let focus = app.focus.min(EDIT_ROWS.len() - 1);
    let row = EDIT_ROWS[focus];
    let back = key.code == KeyCode::Left;
    let cycle = matches!(
        key.code,
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter
    );
    match (key.code, row) {
        (KeyCode::Esc, _) | (KeyCode::Enter, EditRow::Back) => app.navigate(Screen::Dashboard),
        (KeyCode::Tab | KeyCode::Down, _) => app.focus = step(focus, EDIT_ROWS.len(), true),
        (KeyCode::BackTab | KeyCode::Up, _) => app.focus = step(focus, EDIT_ROWS.len(), false),
        (_, EditRow::Field(EditField::Department)) if cycle => {
            form.set_department(Department::cycle(Some(form.user.department), back))
        }
        (_, EditRow::Field(EditField::UserRole)) if cycle => {
            form.set_user_role(UserRole::cycle(Some(form.user.user_role), back))
        }
        (_, EditRow::Field(EditField::Status)) if cycle => {
            form.set_status(Status::cycle(Some(form.user.status), back))
        }
        (KeyCode::Enter, EditRow::Field(_)) => app.focus = step(focus, EDIT_ROWS.len(), true),
        (KeyCode::Backspace, EditRow::Field(f)) => form.pop_char(f),
        (KeyCode::Char(c), EditRow::Field(f)) => form.push_char(f, c),
        (KeyCode::Backspace, EditRow::ImagePath) => {
            app.edit_image_path.pop();
        }
        (KeyCode::Char(c), EditRow::ImagePath) => app.edit_image_path.push(c),
        (KeyCode::Enter, EditRow::ImagePath) => load_edit_image(form, &app.edit_image_path),
        (KeyCode::Enter, EditRow::Update) => submit_edit(app, worker),
        _ => {}
    }
}

fn load_edit_image(form: &mut EditForm, path: &str) {
    match ImageFile::load(path.trim()) {
        Ok(img) => form.attach_image(img),
        Err(e) => form.reject_image(&e),
    }
}

pub fn submit_edit(app: &mut AppState, worker: &Worker) {
    let EditState::Loaded(form) = &mut app.edit else {
        return;
    };
    match form.prepare_submit() {
        Ok(update) => worker.dispatch(Request::UpdateUser(update)),
        Err(n) => app.notify(n),
    }
}

/// Fold one worker response into the state.
pub fn apply_response(app: &mut AppState, worker: &Worker, resp: Response) {
    match resp {
        Response::Login(result) => {
            let (n, session) = app.login.apply_result(result);
            app.notify(n);
            if let Some(session) = session {
                if let Err(e) = app.session_store.save(&session) {
                    tracing::warn!(%e, "could not persist session");
                }
                worker.api().set_token(Some(session.token.clone()));
                app.session = Some(session);
                app.navigate(Screen::Dashboard);
                request_users(app, worker);
            }
        }
        Response::Register(result) => {
            let (n, ok) = app.register.apply_result(result);
            app.notify(n);
            if ok {
                app.navigate(Screen::Login);
            }
        }
        Response::Users(result) => {
            app.loading_users = false;
            if matches!(app.screen, Screen::Login | Screen::Register) {
                tracing::debug!("dropping user list fetched before logout");
                return;
            }
            match result {
                Ok(users) => {
                    tracing::debug!(count = users.len(), "user list loaded");
                    app.set_users(users);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "fetching users failed");
                    app.notify(Notification::error(format!(
                        "Failed to load users: {}",
                        e.reason()
                    )));
                }
            }
        }
        Response::Created(result) => {
            let owns_form = !app.create.discarded;
            let (n, ok) = app.create.apply_result(result);
            app.notify(n);
            if ok {
                if owns_form {
                    app.image_path.clear();
                    if matches!(app.modal, Some(ModalState::CreateUser { .. })) {
                        app.close_modal();
                    }
                } else {
                    tracing::debug!("create finished after its form was cancelled");
                }
                request_users(app, worker);
            }
        }
        Response::Fetched { id, result } => {
            if app.screen != (Screen::EditUser { id: id.clone() }) {
                tracing::debug!(%id, "dropping stale user fetch");
                return;
            }
            match result {
                Ok(user) => app.edit = EditState::Loaded(EditForm::new(user)),
                Err(e) => {
                    let msg = format!("Failed to load user data: {}", e.reason());
                    app.notify(Notification::error(msg.clone()));
                    app.edit = EditState::Failed(msg);
                }
            }
        }
        Response::Updated { id, result } => {
            let shown = matches!(&app.screen, Screen::EditUser { id: current } if *current == id);
            let EditState::Loaded(form) = &mut app.edit else {
                tracing::debug!(%id, "dropping update result, no edit form open");
                return;
            };
            // a reloaded form has not sent anything yet
            if !shown || !form.in_flight {
                tracing::debug!(%id, ok = result.is_ok(), "dropping update result for a form no longer shown");
                return;
            }
            let (n, ok) = form.apply_result(result);
            app.notify(n);
            if ok {
                app.navigate(Screen::Dashboard);
                request_users(app, worker);
            }
        }
        Response::Deleted { id, result } => {
            app.delete_in_flight = false;
            match result {
                Ok(()) => {
                    app.remove_user(&id);
                    app.notify(Notification::success("User deleted successfully!"));
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "delete failed");
                    app.notify(Notification::error("Error deleting user!"));
                }
            }
        }
    }
}
