use crate::app::{App, InputMode, Pane};
use crate::timesheet::{Command, Notice};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

fn enqueue(action_tx: &ActionTx, command: Command) {
    let _ = action_tx.send(Action::Handle(command));
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    match app.input_mode.clone() {
        InputMode::Normal => handle_normal_key(key, app, action_tx),
        InputMode::Search => handle_search_key(key, app, action_tx),
        InputMode::LogTime { task_id, .. } => handle_log_time_key(key, app, action_tx, task_id),
    }
}

fn handle_normal_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Enter => match app.focused_pane {
            Pane::Projects => {
                if let Some(project) = app.highlighted_project() {
                    enqueue(
                        action_tx,
                        Command::SelectProject {
                            project_id: project.id.clone(),
                        },
                    );
                }
            }
            Pane::Tasks | Pane::Weekly => {
                if let Some(task_id) = app.highlighted_task_id() {
                    enqueue(action_tx, Command::ToggleTimer { task_id });
                }
            }
        },
        KeyCode::Char('s') => enqueue(action_tx, Command::StopTimer),
        KeyCode::Char('/') => {
            app.focused_pane = Pane::Tasks;
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('f') => {
            let filter = app.handler.state().status_filter().next();
            enqueue(action_tx, Command::FilterStatus { filter });
        }
        KeyCode::Char('a') => {
            if let (Pane::Tasks, Some(task)) = (app.focused_pane, app.highlighted_task()) {
                let task_id = task.id.clone();
                enqueue(action_tx, Command::AddToWeekly { task_id });
            }
        }
        KeyCode::Char('x') => {
            if let Some(task_id) = app.highlighted_task_id() {
                enqueue(action_tx, Command::RemoveFromWeekly { task_id });
            }
        }
        KeyCode::Char('X') => enqueue(action_tx, Command::ClearWeekly),
        KeyCode::Char('p') => {
            if let (Pane::Weekly, Some(entry)) = (app.focused_pane, app.highlighted_weekly()) {
                let id = entry.id.clone();
                let command = if entry.pinned {
                    Command::UnpinWeekly { id }
                } else {
                    Command::PinWeekly { id }
                };
                enqueue(action_tx, command);
            }
        }
        KeyCode::Char('l') => {
            if let Some(task_id) = app.highlighted_task_id() {
                let task_name = app.handler.task_name(&task_id);
                app.minutes_input.clear();
                app.input_mode = InputMode::LogTime { task_id, task_name };
            }
        }
        KeyCode::Char('r') => enqueue(action_tx, Command::Refresh),
        KeyCode::Char('g') => {
            if let Some(project) = app.highlighted_project() {
                enqueue(
                    action_tx,
                    Command::LinkWorkspace {
                        project_id: project.id.clone(),
                    },
                );
            }
        }
        _ => {}
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            return;
        }
        KeyCode::Backspace => app.search_input.backspace(),
        KeyCode::Left => {
            app.search_input.move_left();
            return;
        }
        KeyCode::Right => {
            app.search_input.move_right();
            return;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input.insert(c)
        }
        _ => return,
    }
    enqueue(
        action_tx,
        Command::Search {
            query: app.search_input.value.clone(),
        },
    );
}

fn handle_log_time_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx, task_id: String) {
    match key.code {
        KeyCode::Esc => {
            app.minutes_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.minutes_input.backspace(),
        KeyCode::Char(c) if c.is_ascii_digit() => app.minutes_input.insert(c),
        KeyCode::Enter => match app.minutes_input.value.parse::<u32>() {
            Ok(minutes) if minutes > 0 => {
                enqueue(action_tx, Command::LogTime { task_id, minutes });
                app.minutes_input.clear();
                app.input_mode = InputMode::Normal;
            }
            _ => app.set_status(Notice::error("Enter a positive number of minutes")),
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::action_queue::{channel, ActionRx};
    use super::super::actions::run_action;
    use super::*;
    use crate::api::DevBackend;
    use crate::store::MemoryStore;
    use crate::timesheet::{Handler, HandlerSettings, StatusFilter, SystemClock};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn test_app() -> App {
        let handler = Handler::new(
            Box::new(DevBackend::new()),
            Arc::new(MemoryStore::new()),
            Box::new(SystemClock),
            HandlerSettings::default(),
        )
        .unwrap();
        let mut app = App::new(handler);
        run_action(Action::LoadInitial, &mut app).await;
        app
    }

    fn queued(rx: &mut ActionRx) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Ok(Action::Handle(command)) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[tokio::test]
    async fn enter_on_task_toggles_its_timer() {
        let mut app = test_app().await;
        let (tx, mut rx) = channel();

        handle_key(key(KeyCode::Tab), &mut app, &tx);
        handle_key(key(KeyCode::Char('j')), &mut app, &tx);
        handle_key(key(KeyCode::Enter), &mut app, &tx);

        assert_eq!(app.focused_pane, Pane::Tasks);
        assert_eq!(
            queued(&mut rx),
            [Command::ToggleTimer {
                task_id: "ev:102".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn typing_in_search_sends_each_query() {
        let mut app = test_app().await;
        let (tx, mut rx) = channel();

        handle_key(key(KeyCode::Char('/')), &mut app, &tx);
        handle_key(key(KeyCode::Char('a')), &mut app, &tx);
        handle_key(key(KeyCode::Char('u')), &mut app, &tx);
        handle_key(key(KeyCode::Enter), &mut app, &tx);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search_input.value, "au");
        assert_eq!(
            queued(&mut rx),
            [
                Command::Search {
                    query: "a".to_string()
                },
                Command::Search {
                    query: "au".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn q_types_into_search_instead_of_quitting() {
        let mut app = test_app().await;
        let (tx, _rx) = channel();

        handle_key(key(KeyCode::Char('/')), &mut app, &tx);
        handle_key(key(KeyCode::Char('q')), &mut app, &tx);

        assert!(app.running);
        assert_eq!(app.search_input.value, "q");

        handle_key(key(KeyCode::Esc), &mut app, &tx);
        handle_key(key(KeyCode::Char('q')), &mut app, &tx);
        assert!(!app.running);
    }

    #[tokio::test]
    async fn f_cycles_the_status_filter() {
        let mut app = test_app().await;
        let (tx, mut rx) = channel();

        handle_key(key(KeyCode::Char('f')), &mut app, &tx);
        let first = queued(&mut rx);
        assert_eq!(
            first,
            [Command::FilterStatus {
                filter: StatusFilter::Open
            }]
        );

        run_action(Action::Handle(first[0].clone()), &mut app).await;
        handle_key(key(KeyCode::Char('f')), &mut app, &tx);
        assert_eq!(
            queued(&mut rx),
            [Command::FilterStatus {
                filter: StatusFilter::Closed
            }]
        );
        assert_eq!(app.visible_tasks().len(), 2);
    }

    #[tokio::test]
    async fn log_time_prompt_accepts_digits_only() {
        let mut app = test_app().await;
        let (tx, mut rx) = channel();
        app.focused_pane = Pane::Tasks;

        handle_key(key(KeyCode::Char('l')), &mut app, &tx);
        for c in ['4', 'x', '5'] {
            handle_key(key(KeyCode::Char(c)), &mut app, &tx);
        }
        handle_key(key(KeyCode::Enter), &mut app, &tx);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            queued(&mut rx),
            [Command::LogTime {
                task_id: "ev:101".to_string(),
                minutes: 45
            }]
        );
    }

    #[tokio::test]
    async fn empty_minutes_keep_the_prompt_open() {
        let mut app = test_app().await;
        let (tx, mut rx) = channel();
        app.focused_pane = Pane::Tasks;

        handle_key(key(KeyCode::Char('l')), &mut app, &tx);
        handle_key(key(KeyCode::Enter), &mut app, &tx);

        assert!(matches!(app.input_mode, InputMode::LogTime { .. }));
        assert!(app.status.as_ref().is_some_and(Notice::is_error));
        assert!(queued(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn pin_key_toggles_weekly_pin() {
        let mut app = test_app().await;
        let (tx, mut rx) = channel();
        run_action(
            Action::Handle(Command::AddToWeekly {
                task_id: "ev:101".to_string(),
            }),
            &mut app,
        )
        .await;
        app.focused_pane = Pane::Weekly;
        let id = app.weekly_tasks()[0].id.clone();

        handle_key(key(KeyCode::Char('p')), &mut app, &tx);
        let pin = queued(&mut rx);
        assert_eq!(pin, [Command::PinWeekly { id: id.clone() }]);

        run_action(Action::Handle(pin[0].clone()), &mut app).await;
        handle_key(key(KeyCode::Char('p')), &mut app, &tx);
        assert_eq!(queued(&mut rx), [Command::UnpinWeekly { id }]);
    }

    #[tokio::test]
    async fn run_action_surfaces_notices_in_status() {
        let mut app = test_app().await;

        run_action(
            Action::Handle(Command::StartTimer {
                task_id: "ev:101".to_string(),
            }),
            &mut app,
        )
        .await;

        assert_eq!(
            app.status.as_ref().map(|n| n.message.as_str()),
            Some("Timer started for task Landing page layout")
        );
        assert!(app.running_elapsed().is_some());
        assert_eq!(app.running_task_name().as_deref(), Some("Landing page layout"));
    }
}
