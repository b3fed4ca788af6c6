//! The "Add User" modal and the edit screen.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use super::components::{bordered, button_line, centered_rect, field_lines, mask};
use crate::app::{AppState, CREATE_ROWS, CreateRow, EDIT_ROWS, EditRow, EditState};
use crate::form::EditForm;
use crate::validate::{CreateField, EditField, FormSnapshot};

fn choice_value(value: &str, placeholder: &str, focused: bool) -> String {
    let shown = if value.is_empty() { placeholder } else { value };
    if focused {
        format!("◀ {shown} ▶")
    } else {
        shown.to_string()
    }
}

pub fn render_create_modal(f: &mut Frame, area: Rect, app: &AppState, focus: usize) {
    let theme = &app.theme;
    let form = &app.create;
    let mut lines: Vec<Line> = Vec::new();
    for (idx, row) in CREATE_ROWS.iter().enumerate() {
        let focused = idx == focus;
        match *row {
            CreateRow::Field(field) => {
                let raw = form.draft.value(field);
                let value = match field {
                    CreateField::Department => choice_value(raw, "Select Department", focused),
                    CreateField::UserRole => choice_value(raw, "Select Role", focused),
                    CreateField::Password | CreateField::ConfirmPassword => mask(raw),
                    _ => raw.to_string(),
                };
                lines.extend(field_lines(
                    field.label(),
                    &value,
                    form.errors.get(field),
                    focused,
                    theme,
                ));
            }
            CreateRow::ImagePath => {
                lines.extend(field_lines(
                    "Profile Image (path)",
                    &app.image_path,
                    form.errors.get(CreateField::Image),
                    focused,
                    theme,
                ));
                if let Some(img) = &form.image {
                    lines.push(Line::from(Span::styled(
                        format!("    Preview: {}", img.preview()),
                        Style::default().fg(theme.success),
                    )));
                }
            }
            CreateRow::Save => {
                lines.push(Line::raw(""));
                let label = if form.in_flight { "Saving..." } else { "Save" };
                lines.push(button_line(label, focused, theme));
            }
            CreateRow::Cancel => lines.push(button_line("Cancel", focused, theme)),
        }
    }

    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(bordered("Add User", theme).border_style(Style::default().fg(theme.focus_border)));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_edit(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let body: Vec<Line> = match &app.edit {
        EditState::Loading => vec![Line::raw("Loading user...")],
        EditState::Failed(msg) => vec![
            Line::from(Span::styled(msg.clone(), Style::default().fg(theme.error))),
            Line::raw(""),
            Line::raw("Press Esc to return to the dashboard."),
        ],
        EditState::Loaded(form) => edit_lines(app, form),
    };
    let width = 72u16.min(area.width.saturating_sub(2)).max(40);
    let height = (body.len() as u16 + 2).min(area.height);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(theme.text))
        .block(bordered("Edit User", theme));
    f.render_widget(p, rect);
}

fn edit_lines(app: &AppState, form: &EditForm) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let missing = form.first_missing();
    let mut lines: Vec<Line> = Vec::new();
    for (idx, row) in EDIT_ROWS.iter().enumerate() {
        let focused = idx == app.focus;
        match *row {
            EditRow::Field(field) => {
                let raw = form.user.value(field);
                let value = match field {
                    EditField::Department | EditField::UserRole | EditField::Status => {
                        choice_value(raw, "", focused)
                    }
                    _ => raw.to_string(),
                };
                let error = (missing == Some(field)).then_some("This field is required");
                lines.extend(field_lines(field.label(), &value, error, focused, theme));
            }
            EditRow::ImagePath => {
                lines.push(Line::from(Span::styled(
                    format!("  Current: {}", form.image_preview()),
                    Style::default().fg(theme.muted),
                )));
                lines.extend(field_lines(
                    "New Image (path)",
                    &app.edit_image_path,
                    form.image_error.as_deref(),
                    focused,
                    theme,
                ));
            }
            EditRow::Update => {
                lines.push(Line::raw(""));
                let label = if form.in_flight { "Updating..." } else { "Update" };
                lines.push(button_line(label, focused, theme));
            }
            EditRow::Back => lines.push(button_line("Back", focused, theme)),
        }
    }
    lines
}
