//! Shared UI components (status bar, modal helpers, form rows).
//!
//! Small building blocks reused by the auth, dashboard and form screens.
//!
use std::collections::{BTreeMap, BTreeSet};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode, Theme};
use crate::model::UserRecord;
use crate::notify::Level;

/// Render the bottom status bar: newest notification if any, else mode and route.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let base = Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg);
    let p = match app.notifications.latest() {
        Some(n) => {
            let color = match n.level {
                Level::Success => app.theme.success,
                Level::Error => app.theme.error,
                Level::Info => app.theme.status_fg,
            };
            Paragraph::new(Line::from(Span::styled(
                format!(" {} ", n.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .style(base)
        }
        None => {
            let mode = match app.input_mode {
                InputMode::Normal => "NORMAL",
                InputMode::Search => "SEARCH",
                InputMode::Modal => "MODAL",
            };
            let mut msg = format!(" mode: {mode}  route: {}", app.screen.route());
            if app.loading_users {
                msg.push_str("  loading users...");
            }
            if let Some(s) = &app.session {
                msg.push_str(&format!("  user: {}", s.user_id));
            }
            msg.push_str("  ?: help");
            Paragraph::new(msg).style(base)
        }
    };
    f.render_widget(p, area);
}

/// Render the right-side keybinds viewer with grouped sections.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let mut general: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut filters: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for ((mods, code), action) in app.keymap.all_bindings() {
        let key = Keymap::format_key(mods, code);
        let (section, label) = match action {
            KeyAction::Quit => (&mut general, "Quit"),
            KeyAction::OpenHelp => (&mut general, "Help"),
            KeyAction::NewUser => (&mut general, "Add user"),
            KeyAction::EditSelection => (&mut general, "Edit user"),
            KeyAction::DeleteSelection => (&mut general, "Delete user"),
            KeyAction::Refresh => (&mut general, "Refresh"),
            KeyAction::Logout => (&mut general, "Logout"),
            KeyAction::ToggleKeybindsPane => (&mut general, "Toggle this pane"),
            KeyAction::StartSearch => (&mut filters, "Search username"),
            KeyAction::CycleDepartment => (&mut filters, "Department"),
            KeyAction::CycleRole => (&mut filters, "Role"),
            KeyAction::CycleStatus => (&mut filters, "Status"),
            KeyAction::ClearFilters => (&mut filters, "Clear filters"),
            KeyAction::SaveFilters => (&mut filters, "Save as default"),
            KeyAction::MoveUp => (&mut navigation, "Move up"),
            KeyAction::MoveDown => (&mut navigation, "Move down"),
            KeyAction::FirstPage => (&mut navigation, "First page"),
            KeyAction::PrevPage => (&mut navigation, "Previous page"),
            KeyAction::NextPage => (&mut navigation, "Next page"),
            KeyAction::LastPage => (&mut navigation, "Last page"),
            KeyAction::CyclePageSize => (&mut navigation, "Entries per page"),
            KeyAction::Ignore => continue,
        };
        section.entry(label).or_default().insert(key);
    }

    let col1_w = [&general, &filters, &navigation]
        .into_iter()
        .flat_map(|m| m.keys())
        .map(|k| k.len())
        .max()
        .unwrap_or(0)
        .min((inner.width as usize).saturating_sub(11));

    let mut lines: Vec<Line> = Vec::new();
    for (title, section) in [
        ("General:", &general),
        ("Filters:", &filters),
        ("Navigation:", &navigation),
    ] {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (label, keys) in section {
            let lbl: String = label.chars().take(col1_w).collect();
            let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
            lines.push(Line::from(vec![
                Span::raw(format!("  {lbl:>col1_w$} │ ")),
                Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
            ]));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

pub fn bordered<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
}

/// One labelled form row plus, when present, its error underneath.
pub fn field_lines(
    label: &str,
    value: &str,
    error: Option<&str>,
    focused: bool,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let marker = if focused { "▶ " } else { "  " };
    let value_style = if focused {
        Style::default()
            .fg(theme.highlight_fg)
            .bg(theme.highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let mut lines = vec![Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{label}: "), Style::default().fg(theme.muted)),
        Span::styled(value.to_string(), value_style),
    ])];
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            format!("    {err}"),
            Style::default().fg(theme.error),
        )));
    }
    lines
}

/// A button row like `[ Save ]`, highlighted when focused.
pub fn button_line(label: &str, focused: bool, theme: &Theme) -> Line<'static> {
    if focused {
        Line::from(Span::styled(
            format!("▶ [ {label} ]"),
            Style::default()
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            format!("  [ {label} ]"),
            Style::default().fg(theme.text),
        ))
    }
}

pub fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

/// Text of the delete confirmation dialog.
pub fn delete_prompt(user: &UserRecord) -> String {
    format!(
        "Are you sure you want to delete the student {} {} from {} department as a {}?",
        user.first_name, user.last_name, user.department, user.user_role
    )
}

pub fn render_delete_modal(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    user: &UserRecord,
    selected: usize,
) {
    let width = 60u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, 9, area);
    let yes = if selected == 0 { "[Delete]" } else { " Delete " };
    let no = if selected == 1 { "[Cancel]" } else { " Cancel " };
    let lines = vec![
        Line::raw(delete_prompt(user)),
        Line::raw(""),
        Line::from(vec![
            Span::styled(yes, Style::default().fg(app.theme.error)),
            Span::raw("    "),
            Span::raw(no),
        ]),
    ];
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(bordered("Confirm Delete", &app.theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal with usage tips for every screen.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 80u16.min(area.width.saturating_sub(4)).max(60);
    let height = 22u16.min(area.height.saturating_sub(4)).max(14);
    let rect = centered_rect(width, height, area);

    let keys = |a: KeyAction| app.keymap.keys_for(a).join(" / ");
    let tip = |label: &str, value: String| {
        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let heading =
        |s: &'static str| Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)));

    let lines: Vec<Line> = vec![
        heading("Dashboard"),
        tip("Move", format!("{} / {}", keys(KeyAction::MoveUp), keys(KeyAction::MoveDown))),
        tip(
            "Pages",
            format!(
                "{} first, {} previous, {} next, {} last",
                keys(KeyAction::FirstPage),
                keys(KeyAction::PrevPage),
                keys(KeyAction::NextPage),
                keys(KeyAction::LastPage)
            ),
        ),
        tip("Entries per page (10/25/50/100)", keys(KeyAction::CyclePageSize)),
        tip("Search username", format!("{} then type; Esc clears", keys(KeyAction::StartSearch))),
        tip(
            "Filter department / role / status",
            format!(
                "{} / {} / {}",
                keys(KeyAction::CycleDepartment),
                keys(KeyAction::CycleRole),
                keys(KeyAction::CycleStatus)
            ),
        ),
        tip("Clear / save filters", format!("{} / {}", keys(KeyAction::ClearFilters), keys(KeyAction::SaveFilters))),
        tip("Add user", keys(KeyAction::NewUser)),
        tip("Edit user", keys(KeyAction::EditSelection)),
        tip("Delete user", keys(KeyAction::DeleteSelection)),
        tip("Refresh list", keys(KeyAction::Refresh)),
        tip("Logout", keys(KeyAction::Logout)),
        Line::raw(""),
        heading("Forms"),
        tip("Next / previous field", "Tab, Down / Shift+Tab, Up".to_string()),
        tip("Pick department, role, status", "Left, Right, Space".to_string()),
        tip("Attach image", "type a path on the image row, then Enter".to_string()),
        tip("Press a button", "Enter".to_string()),
        tip("Leave", "Esc".to_string()),
        Line::raw(""),
        tip("Close help", "Esc / Enter".to_string()),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(bordered("Help", &app.theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
