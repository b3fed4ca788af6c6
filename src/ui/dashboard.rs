//! Dashboard: counts, filter bar, the paged user table and its footer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use super::components::bordered;
use crate::app::{AppState, InputMode};
use crate::model::Status;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);
    render_counts(f, parts[0], app);
    render_filter_bar(f, parts[1], app);
    render_table(f, parts[2], app);
    render_footer(f, parts[3], app);
}

fn render_counts(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    let counts = app.counts();
    for (rect, (label, n, color)) in cols.iter().zip([
        ("Total Users", counts.total, app.theme.title),
        ("Active Users", counts.active, app.theme.success),
        ("Inactive Users", counts.inactive, app.theme.error),
    ]) {
        let p = Paragraph::new(Line::from(vec![
            Span::styled(n.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {label}")),
        ]))
        .block(bordered("", &app.theme));
        f.render_widget(p, *rect);
    }
}

fn render_filter_bar(f: &mut Frame, area: Rect, app: &AppState) {
    fn show<T: ToString>(v: Option<T>) -> String {
        v.map(|v| v.to_string()).unwrap_or_else(|| "All".to_string())
    }
    let c = &app.criteria;
    let searching = app.input_mode == InputMode::Search;
    let search_style = if searching {
        Style::default()
            .fg(app.theme.highlight_fg)
            .bg(app.theme.highlight_bg)
    } else {
        Style::default().fg(app.theme.text)
    };
    let cursor = if searching { "_" } else { "" };
    let muted = Style::default().fg(app.theme.muted);
    let line = Line::from(vec![
        Span::styled("Department: ", muted),
        Span::raw(show(c.department)),
        Span::styled("  Role: ", muted),
        Span::raw(show(c.role)),
        Span::styled("  Status: ", muted),
        Span::raw(show(c.status)),
        Span::styled("  Search: ", muted),
        Span::styled(format!("{}{cursor}", c.search_term), search_style),
        Span::styled(format!("  Show {} entries", app.pager.size), muted),
    ]);
    let block = if searching {
        bordered("Filters", &app.theme).border_style(Style::default().fg(app.theme.focus_border))
    } else {
        bordered("Filters", &app.theme)
    };
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState) {
    let offset = app.pager.index * app.pager.size;
    let rows = app.visible_users().iter().enumerate().map(|(i, u)| {
        let status_color = match u.status {
            Status::Active => app.theme.success,
            Status::Inactive => app.theme.error,
        };
        Row::new(vec![
            Cell::from((offset + i + 1).to_string()),
            Cell::from(u.username.clone()),
            Cell::from(u.first_name.clone()),
            Cell::from(u.last_name.clone()),
            Cell::from(u.department.as_str()),
            Cell::from(u.user_role.as_str()),
            Cell::from(u.created_date()),
            Cell::from(u.status.as_str()).style(Style::default().fg(status_color)),
        ])
        .style(Style::default().fg(app.theme.text))
    });

    let widths = [
        Constraint::Length(7),
        Constraint::Percentage(15),
        Constraint::Percentage(13),
        Constraint::Percentage(13),
        Constraint::Percentage(18),
        Constraint::Percentage(16),
        Constraint::Length(12),
        Constraint::Length(9),
    ];
    let header = Row::new(vec![
        "Sl. No.",
        "User Name",
        "First Name",
        "Last Name",
        "Department",
        "Role",
        "Created Date",
        "Status",
    ])
    .style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let title = if app.loading_users {
        "Users (loading...)"
    } else if app.users.is_empty() {
        "Users (none)"
    } else {
        "Users"
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, &app.theme))
        .row_highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    if app.input_mode != InputMode::Modal && !app.visible_users().is_empty() {
        state.select(Some(app.selected_row));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_footer(f: &mut Frame, area: Rect, app: &AppState) {
    let len = app.users.len();
    let pager = &app.pager;
    let on = Style::default().fg(app.theme.text);
    let off = Style::default().fg(app.theme.muted).add_modifier(Modifier::DIM);
    let back = if pager.can_go_back() { on } else { off };
    let fwd = if pager.can_go_forward(len) { on } else { off };
    let line = Line::from(vec![
        Span::styled(pager.range_label(len), Style::default().fg(app.theme.muted)),
        Span::raw("   "),
        Span::styled("« First", back),
        Span::raw("  "),
        Span::styled("‹ Prev", back),
        Span::styled(
            format!("  Page {} of {}  ", pager.index + 1, pager.page_count(len)),
            Style::default().fg(app.theme.title),
        ),
        Span::styled("Next ›", fwd),
        Span::raw("  "),
        Span::styled("Last »", fwd),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
