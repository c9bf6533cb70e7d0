use crate::app::App;
use crate::timesheet::Command;

use super::action_queue::Action;

/// Run one queued action to completion, then fold its notices into the UI.
pub(super) async fn run_action(action: Action, app: &mut App) {
    match action {
        Action::LoadInitial => {
            app.handler.load_initial().await;
            app.sync_project_cursor();
        }
        Action::Handle(command) => {
            let selects_project = matches!(
                command,
                Command::SelectProject { .. } | Command::Refresh
            );
            let filters = matches!(
                command,
                Command::Search { .. } | Command::FilterStatus { .. }
            );
            app.handler.handle(command).await;
            if selects_project {
                app.sync_project_cursor();
                app.task_index = 0;
            }
            if filters {
                app.task_index = 0;
            }
        }
    }
    app.absorb_notices();
}
