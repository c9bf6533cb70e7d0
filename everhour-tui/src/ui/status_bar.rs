use super::*;
use crate::time_utils::format_clock;

const LABEL: &str = " Everhour";

pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &mut App) {
    // 1 blank row, 1 content row
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let content_row = rows[1];
    let area = Rect {
        x: content_row.x + 2,
        y: content_row.y,
        width: content_row.width.saturating_sub(4),
        height: content_row.height,
    };

    let title_width = 1 + LABEL.len() as u16 + 1;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(title_width), Constraint::Min(10)])
        .split(area);

    let throbber_area = Rect {
        x: cols[0].x + 1,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(2),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(LABEL, Style::default().fg(Color::Yellow))),
        label_area,
    );

    frame.render_widget(Paragraph::new(status_line(app)), cols[1]);
}

fn status_line(app: &App) -> Line<'static> {
    let muted = Style::default().fg(Color::DarkGray);
    let white = Style::default().fg(Color::White);
    let mut spans = vec![Span::styled("  | ", muted)];

    match (app.running_task_name(), app.running_elapsed()) {
        (Some(name), Some(elapsed)) => {
            spans.push(Span::styled("⏵ ", Style::default().fg(Color::Green)));
            spans.push(Span::styled(name, white));
            spans.push(Span::styled(
                format!(" {elapsed}"),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
            if let everhour::domain::CurrentTimer::Running { started_at, .. } =
                app.handler.state().timer()
            {
                spans.push(Span::styled(
                    format!(" (since {})", format_clock(*started_at)),
                    muted,
                ));
            }
        }
        _ => spans.push(Span::styled("No timer running", muted)),
    }

    if let Some(pinned) = app.handler.weekly().pinned() {
        spans.push(Span::styled("  | ", muted));
        spans.push(Span::styled("Pinned: ", Style::default().fg(Color::Magenta)));
        spans.push(Span::styled(pinned.name.clone(), white));
    }

    Line::from(spans)
}
