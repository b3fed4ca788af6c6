pub mod auth;
pub mod components;
pub mod dashboard;
pub mod forms;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, ModalState, Screen};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, root[0], app);

    let main = if app.show_keybinds && app.screen == Screen::Dashboard {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(root[1]);
        components::render_keybinds_panel(f, cols[1], app);
        cols[0]
    } else {
        root[1]
    };

    match &app.screen {
        Screen::Login | Screen::Register => auth::render(f, main, app),
        Screen::Dashboard => dashboard::render(f, main, app),
        Screen::EditUser { .. } => forms::render_edit(f, main, app),
    }

    components::render_status_bar(f, root[2], app);

    if let Some(state) = &app.modal {
        render_modal(f, f.area(), app, state);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.screen {
        Screen::Login => "Login",
        Screen::Register => "Register",
        Screen::Dashboard => "User Dashboard",
        Screen::EditUser { .. } => "Edit User",
    };
    let line = Line::from(vec![
        Span::styled(
            " User Management Portal ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {title}")),
    ]);
    let p = Paragraph::new(line)
        .block(components::bordered("usermgmt-portal", &app.theme))
        .style(
            Style::default()
                .fg(app.theme.header_fg)
                .bg(app.theme.header_bg),
        );
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::CreateUser { focus } => forms::render_create_modal(f, area, app, *focus),
        ModalState::DeleteConfirm { user, selected } => {
            components::render_delete_modal(f, area, app, user, *selected)
        }
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
