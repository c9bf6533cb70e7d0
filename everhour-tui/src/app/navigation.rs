use super::*;

impl App {
    /// Move focus to the next pane (Tab)
    pub fn focus_next(&mut self) {
        self.focused_pane = match self.focused_pane {
            Pane::Projects => Pane::Tasks,
            Pane::Tasks => Pane::Weekly,
            Pane::Weekly => Pane::Projects,
        };
    }

    /// Move focus to the previous pane (Shift+Tab)
    pub fn focus_previous(&mut self) {
        self.focused_pane = match self.focused_pane {
            Pane::Projects => Pane::Weekly,
            Pane::Tasks => Pane::Projects,
            Pane::Weekly => Pane::Tasks,
        };
    }

    pub fn move_down(&mut self) {
        let len = self.focused_len();
        let index = self.focused_index_mut();
        if *index + 1 < len {
            *index += 1;
        }
    }

    pub fn move_up(&mut self) {
        let index = self.focused_index_mut();
        *index = index.saturating_sub(1);
    }

    fn focused_len(&self) -> usize {
        match self.focused_pane {
            Pane::Projects => self.projects().len(),
            Pane::Tasks => self.visible_tasks().len(),
            Pane::Weekly => self.weekly_tasks().len(),
        }
    }

    fn focused_index_mut(&mut self) -> &mut usize {
        match self.focused_pane {
            Pane::Projects => &mut self.project_index,
            Pane::Tasks => &mut self.task_index,
            Pane::Weekly => &mut self.weekly_index,
        }
    }
}
