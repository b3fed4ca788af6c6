//! Login and register screens.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Clear, Paragraph, Wrap};

use super::components::{bordered, button_line, centered_rect, field_lines, mask};
use crate::app::{AppState, AuthRow, LOGIN_ROWS, REGISTER_ROWS, Screen};
use crate::validate::AuthField;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let on_login = app.screen == Screen::Login;
    let rows: &[AuthRow] = if on_login { &LOGIN_ROWS } else { &REGISTER_ROWS };
    let theme = &app.theme;

    let mut lines: Vec<Line> = vec![Line::raw("")];
    for (idx, row) in rows.iter().enumerate() {
        let focused = idx == app.focus;
        match *row {
            AuthRow::Field(field) => {
                let (value, error) = if on_login {
                    let v = match field {
                        AuthField::Email => app.login.email.clone(),
                        _ => mask(&app.login.password),
                    };
                    (v, app.login.errors.get(field))
                } else {
                    let v = match field {
                        AuthField::Email => app.register.email.clone(),
                        AuthField::Password => mask(&app.register.password),
                        AuthField::ConfirmPassword => mask(&app.register.confirm_password),
                    };
                    (v, app.register.errors.get(field))
                };
                lines.extend(field_lines(field.label(), &value, error, focused, theme));
            }
            AuthRow::Submit => {
                lines.push(Line::raw(""));
                let label = match (on_login, app.login.in_flight, app.register.in_flight) {
                    (true, true, _) => "Logging in...",
                    (true, false, _) => "Login",
                    (false, _, true) => "Registering...",
                    (false, _, false) => "Register",
                };
                lines.push(button_line(label, focused, theme));
            }
            AuthRow::Switch => {
                let label = if on_login {
                    "Don't have an account? Register"
                } else {
                    "Already have an account? Login"
                };
                lines.push(button_line(label, focused, theme));
            }
        }
    }

    let height = (lines.len() as u16 + 3).min(area.height);
    let rect = centered_rect(56, height, area);
    let title = if on_login { "Login" } else { "Register" };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(theme.text))
        .block(bordered(title, theme).border_style(Style::default().fg(theme.focus_border)));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
