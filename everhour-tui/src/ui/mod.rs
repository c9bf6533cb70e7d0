use crate::app::{App, InputMode, Pane};
use crate::timesheet::NoticeLevel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

mod log_time_dialog;
mod panes;
mod status_bar;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Status bar
            Constraint::Min(0),    // Panes
            Constraint::Length(3), // Search / notices
            Constraint::Length(4), // Controls (2 rows)
        ])
        .split(frame.area());

    status_bar::render_status_bar(frame, root[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
        ])
        .split(root[1]);
    panes::render_projects(frame, columns[0], app);
    panes::render_tasks(frame, columns[1], app);
    panes::render_weekly(frame, columns[2], app);

    render_message_line(frame, root[2], app);
    render_controls(frame, root[3], app);

    if let InputMode::LogTime { task_name, .. } = &app.input_mode {
        log_time_dialog::render_log_time_dialog(frame, app, task_name);
    }
}

fn border_style(app: &App, pane: Pane) -> Style {
    if app.focused_pane == pane {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Search input while searching, otherwise the latest notice.
fn render_message_line(frame: &mut Frame, area: Rect, app: &App) {
    let (title, line) = if app.is_searching() {
        let (before, after) = app.search_input.split_at_cursor();
        (
            " Search ",
            Line::from(Span::styled(
                format!("{before}█{after}"),
                Style::default().fg(Color::White),
            )),
        )
    } else if let Some(notice) = &app.status {
        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        (
            " Status ",
            Line::from(Span::styled(
                notice.message.clone(),
                Style::default().fg(color),
            )),
        )
    } else if !app.search_input.value.is_empty() {
        (
            " Filter ",
            Line::from(Span::styled(
                app.search_input.value.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        )
    } else {
        (" Status ", Line::from(""))
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);
    let lines = match app.input_mode {
        InputMode::Search => vec![Line::from(vec![
            Span::styled("Type", key),
            Span::raw(": Filter  "),
            Span::styled("Enter", key),
            Span::raw(": Keep filter  "),
            Span::styled("Esc", key),
            Span::raw(": Clear"),
        ])],
        _ => vec![
            Line::from(vec![
                Span::styled("Tab", key),
                Span::raw(": Pane  "),
                Span::styled("↑↓/j/k", key),
                Span::raw(": Navigate  "),
                Span::styled("Enter", key),
                Span::raw(": Select / Start-Stop  "),
                Span::styled("s", key),
                Span::raw(": Stop  "),
                Span::styled("l", key),
                Span::raw(": Log time  "),
                Span::styled("/", key),
                Span::raw(": Search  "),
                Span::styled("f", key),
                Span::raw(": Status"),
            ]),
            Line::from(vec![
                Span::styled("a", key),
                Span::raw(": Add weekly  "),
                Span::styled("x", key),
                Span::raw(": Remove  "),
                Span::styled("X", key),
                Span::raw(": Clear weekly  "),
                Span::styled("p", key),
                Span::raw(": Pin  "),
                Span::styled("g", key),
                Span::raw(": Link dir  "),
                Span::styled("r", key),
                Span::raw(": Refresh  "),
                Span::styled("q", key),
                Span::raw(": Quit"),
            ]),
        ],
    };

    let controls = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Controls ",
                Style::default().fg(Color::DarkGray),
            )),
    );
    frame.render_widget(controls, area);
}
