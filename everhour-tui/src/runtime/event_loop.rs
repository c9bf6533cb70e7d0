use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use super::action_queue::{channel, Action};
use super::actions::run_action;
use super::views::handle_key;

/// Server timer state drifts if the user starts or stops timers elsewhere.
const TIMER_RECONCILE_INTERVAL: Duration = Duration::from_secs(120);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let _ = action_tx.send(Action::LoadInitial);
    let mut last_refresh = Instant::now();

    loop {
        app.is_loading = !action_rx.is_empty();
        if app.is_loading {
            app.throbber_state.calc_next();
        }
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, app, &action_tx);
                }
            }
        }

        if last_refresh.elapsed() >= TIMER_RECONCILE_INTERVAL && !app.is_searching() {
            let _ = action_tx.send(Action::Handle(crate::timesheet::Command::Refresh));
            last_refresh = Instant::now();
        }

        // One action per frame so the throbber renders between network calls.
        if let Ok(action) = action_rx.try_recv() {
            run_action(action, app).await;
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
