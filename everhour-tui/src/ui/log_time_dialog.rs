use super::utils::{centered_rect, truncate};
use super::*;

pub fn render_log_time_dialog(frame: &mut Frame, app: &App, task_name: &str) {
    let area = centered_rect(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let key = Style::default().fg(Color::Yellow);
    let lines = vec![
        Line::from(Span::styled(
            truncate(task_name, 44),
            Style::default().fg(Color::White),
        )),
        Line::from(vec![
            Span::styled("Minutes: ", key),
            Span::styled(
                format!("{}█", app.minutes_input.value),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", key),
            Span::raw(": Log  "),
            Span::styled("Esc", key),
            Span::raw(": Cancel"),
        ]),
    ];

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(" Log Time ", key))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(dialog, area);
}
