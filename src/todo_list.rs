use tracing::{error, info, warn};

use crate::api::TaskApi;
use crate::config::Config;
use crate::error::Result;
use crate::form::{Form, FormMode};
use crate::task::{Draft, Task, TaskId};

/// Incomplete tasks mirrored from the server, plus the form being edited.
///
/// The list is never patched locally: every successful mutation throws the
/// cache away and reloads it. Failed calls are logged and otherwise ignored.
#[derive(Debug)]
pub struct TodoList {
    api: TaskApi,
    pub tasks: Vec<Task>,
    pub selected_task: usize,
    pub form: Form,
}

impl TodoList {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            api: TaskApi::new(config)?,
            tasks: Vec::new(),
            selected_task: 0,
            form: Form::default(),
        })
    }

    pub fn api(&self) -> &TaskApi {
        &self.api
    }

    pub fn selected(&self) -> Option<&Task> {
        self.tasks.get(self.selected_task)
    }

    pub fn select_next(&mut self) {
        if self.selected_task + 1 < self.tasks.len() {
            self.selected_task += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    pub async fn load(&mut self) {
        match self.api.list().await {
            Ok(tasks) => {
                self.tasks = tasks.into_iter().filter(|t| !t.is_completed()).collect();
                self.selected_task = self.selected_task.min(self.tasks.len().saturating_sub(1));
            }
            Err(err) => error!(error = %err, "Error fetching tasks"),
        }
    }

    pub async fn create(&mut self, draft: &Draft) {
        match self.api.create(draft).await {
            Ok(()) => {
                info!(title = %draft.title, "task created");
                self.form.reset_draft();
                self.load().await;
            }
            Err(err) => error!(error = %err, "Error creating task"),
        }
    }

    pub async fn update(&mut self, task: &Task) {
        match self.api.update(task).await {
            Ok(()) => {
                info!(id = %task.id, "task updated");
                self.form.close();
                self.load().await;
            }
            Err(err) => error!(error = %err, id = %task.id, "Error updating task"),
        }
    }

    pub async fn remove(&mut self, id: TaskId) {
        match self.api.delete(id).await {
            Ok(()) => {
                info!(%id, "task deleted");
                self.load().await;
            }
            Err(err) => error!(error = %err, %id, "Error deleting task"),
        }
    }

    /// Sends the whole record back with status completed.
    pub async fn complete(&mut self, task: &Task) {
        match self.api.update(&task.marked_completed()).await {
            Ok(()) => {
                info!(id = %task.id, "task completed");
                self.load().await;
            }
            Err(err) => error!(error = %err, id = %task.id, "Error marking task as completed"),
        }
    }

    /// Creates the draft or saves the edit, whichever the form holds.
    pub async fn submit_form(&mut self) {
        if !self.form.is_valid() {
            warn!(
                due_date = %self.form.due_date_text,
                due_time = %self.form.due_time_text,
                "form not submitted: unparseable due date or time"
            );
            return;
        }
        match self.form.mode.clone() {
            FormMode::None => {}
            FormMode::Creating(draft) => self.create(&draft).await,
            FormMode::Editing(task) => self.update(&task).await,
        }
    }

    pub async fn remove_selected(&mut self) {
        if let Some(id) = self.selected().map(|t| t.id) {
            self.remove(id).await;
        }
    }

    pub async fn complete_selected(&mut self) {
        if let Some(task) = self.selected().cloned() {
            self.complete(&task).await;
        }
    }

    pub fn edit_selected(&mut self) {
        if let Some(task) = self.selected().cloned() {
            self.form.open_edit(&task);
        }
    }
}
