use super::utils::truncate;
use super::*;
use crate::timesheet::StatusFilter;
use everhour::time_format::format_seconds;

const NAME_WIDTH: usize = 40;

fn list_block(title: String, app: &App, pane: Pane) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, pane))
        .title(title)
        .padding(Padding::horizontal(1))
}

fn highlight(app: &App, pane: Pane) -> Style {
    if app.focused_pane == pane {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

pub fn render_projects(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.handler.state();
    let selected = state.selected_project_id();
    let recent = app.handler.recent();

    let items: Vec<ListItem> = app
        .projects()
        .iter()
        .map(|project| {
            let marker = if Some(project.id.as_str()) == selected {
                "● "
            } else if recent.contains(&project.id) {
                "○ "
            } else {
                "  "
            };
            let style = if project.status == "archived" {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{marker}{}", project.name)).style(style)
        })
        .collect();

    let title = format!(" Projects ({}) ", app.projects().len());
    let list = List::new(items)
        .block(list_block(title, app, Pane::Projects))
        .highlight_style(highlight(app, Pane::Projects));
    let mut list_state = ListState::default().with_selected(Some(app.project_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_tasks(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.handler.state();
    let weekly = app.handler.weekly();
    let tasks = app.visible_tasks();

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let running = state.is_task_running(&task.id);
            let marker = if running { "⏵ " } else { "  " };
            let planned = if weekly.contains_remote_id(&task.id) {
                " ★"
            } else {
                ""
            };
            let name_style = if running {
                Style::default().fg(Color::Green)
            } else if task.status == "closed" {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(truncate(&task.name, NAME_WIDTH), name_style),
                Span::styled(planned, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!(
                        "  {} (today {})",
                        format_seconds(task.time.total),
                        format_seconds(task.time.today)
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let project = state
        .selected_project_id()
        .map(|id| state.project_name(id))
        .unwrap_or_else(|| "no project".to_string());
    let filter = match state.status_filter() {
        StatusFilter::All => String::new(),
        other => format!(" [{}]", other.label()),
    };
    let unfiltered = state.search_term().is_empty() && state.status_filter() == StatusFilter::All;
    let title = if unfiltered {
        format!(" Tasks: {} ({}) ", project, tasks.len())
    } else {
        format!(
            " Tasks: {}{} ({}/{}) ",
            project,
            filter,
            tasks.len(),
            state.tasks().len()
        )
    };

    let list = List::new(items)
        .block(list_block(title, app, Pane::Tasks))
        .highlight_style(highlight(app, Pane::Tasks));
    let mut list_state = ListState::default().with_selected(Some(app.task_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_weekly(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.handler.state();
    let entries = app.weekly_tasks();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let running = state.is_task_running(&entry.everhour_id);
            let marker = match (entry.pinned, running) {
                (_, true) => Span::styled("⏵ ", Style::default().fg(Color::Green)),
                (true, false) => Span::styled("◆ ", Style::default().fg(Color::Magenta)),
                (false, false) => Span::raw("  "),
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(
                    truncate(&entry.name, NAME_WIDTH),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("  {}", format_seconds(app.weekly_total(entry))),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(" Weekly plan ({}) ", app.handler.weekly().len());
    let list = List::new(items)
        .block(list_block(title, app, Pane::Weekly))
        .highlight_style(highlight(app, Pane::Weekly));
    let mut list_state = ListState::default().with_selected(Some(app.weekly_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}
