use crate::domain::{filter_tasks, parse_deadline_input, Filter, Task, TaskId, UiMode};
use crate::error::TaskError;
use crate::notifications::{ActiveNotice, Notice};
use crate::persistence::{save_metadata, AppMetadata};
use crate::store::TaskStore;
use crate::ticker::notice_duration;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// A user action, regardless of whether it came from the CLI or the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add {
        text: String,
        time: Option<NaiveDateTime>,
    },
    ToggleComplete(TaskId),
    Edit {
        id: TaskId,
        text: Option<String>,
        time: Option<NaiveDateTime>,
    },
    /// Deleting needs explicit confirmation; unconfirmed is a silent no-op
    Delete {
        id: TaskId,
        confirmed: bool,
    },
    SetFilter(Filter),
}

/// Input form state for adding or editing a task
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub text: String,
    pub deadline: String,
    /// Task being edited, None when adding
    pub editing_id: Option<TaskId>,
    pub editing_field: usize, // 0 = text, 1 = deadline
}

impl InputFormState {
    fn active_field_mut(&mut self) -> &mut String {
        if self.editing_field == 0 {
            &mut self.text
        } else {
            &mut self.deadline
        }
    }
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    pub filter: Filter,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub pending_delete: Option<TaskId>,
    pub notice: Option<ActiveNotice>,
    pub notice_ttl: Duration,
    meta_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: TaskStore, metadata: AppMetadata, meta_path: Option<PathBuf>) -> Self {
        Self {
            store,
            filter: metadata.filter,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            pending_delete: None,
            notice: None,
            notice_ttl: notice_duration(metadata.notice_secs),
            meta_path,
        }
    }

    /// Current local wall-clock time used for classification
    pub fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// Apply a user intent. Returns the notice to show, if any.
    ///
    /// Validation problems become error notices; only storage failures are
    /// returned as errors.
    pub fn apply(&mut self, intent: Intent) -> Result<Option<Notice>> {
        debug!(?intent, "applying intent");

        let outcome = match intent {
            Intent::Add { text, time } => self.store.add(&text, time).map(|_| {
                self.selected_index = 0;
                Some(Notice::task_added())
            }),
            Intent::ToggleComplete(id) => self
                .store
                .toggle_complete(id)
                .map(|state| state.map(Notice::task_toggled)),
            Intent::Edit { id, text, time } => {
                if text.as_deref().is_some_and(|t| t.trim().is_empty()) {
                    Err(TaskError::EmptyText)
                } else {
                    self.store
                        .edit(id, text.as_deref(), time)
                        .map(|task| task.map(|_| Notice::task_updated()))
                }
            }
            Intent::Delete { id, confirmed } => {
                if !confirmed {
                    Ok(None)
                } else {
                    self.store
                        .delete(id)
                        .map(|removed| removed.then(Notice::task_deleted))
                }
            }
            Intent::SetFilter(filter) => {
                self.filter = filter;
                self.selected_index = 0;
                self.save_metadata()?;
                Ok(None)
            }
        };

        self.clamp_selection();

        match outcome {
            Ok(notice) => Ok(notice),
            Err(e) if e.is_validation() => Ok(Some(Notice::error(e.to_string()))),
            Err(TaskError::Storage(e)) => Err(e),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply an intent and show the resulting notice
    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        if let Some(notice) = self.apply(intent)? {
            self.show_notice(notice);
        }
        Ok(())
    }

    /// Show a notice, replacing any notice already on screen
    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(ActiveNotice::new(notice, self.notice_ttl));
    }

    /// Drop the notice once its time is up (called on tick)
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    /// Tasks visible under the current filter
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visible_tasks_at(self.now())
    }

    pub fn visible_tasks_at(&self, now: NaiveDateTime) -> Vec<&Task> {
        filter_tasks(self.store.tasks(), self.filter, now)
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.visible_tasks()
            .get(self.selected_index)
            .map(|task| task.id)
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        let visible = self.visible_tasks().len();
        if self.selected_index + 1 < visible {
            self.selected_index += 1;
        }
    }

    /// Keep the selection inside the visible list
    fn clamp_selection(&mut self) {
        let visible = self.visible_tasks().len();
        if visible == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= visible {
            self.selected_index = visible - 1;
        }
    }

    pub fn cycle_filter(&mut self) -> Result<()> {
        self.dispatch(Intent::SetFilter(self.filter.next()))
    }

    pub fn toggle_selected(&mut self) -> Result<()> {
        match self.selected_task_id() {
            Some(id) => self.dispatch(Intent::ToggleComplete(id)),
            None => Ok(()),
        }
    }

    /// Ask for confirmation before deleting the selected task
    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.pending_delete = Some(id);
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    /// Answer the delete confirmation
    pub fn resolve_delete(&mut self, confirmed: bool) -> Result<()> {
        self.ui_mode = UiMode::Normal;
        match self.pending_delete.take() {
            Some(id) => self.dispatch(Intent::Delete { id, confirmed }),
            None => Ok(()),
        }
    }

    /// Open input form for adding a task
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState {
            text: String::new(),
            deadline: String::new(),
            editing_id: None,
            editing_field: 0,
        });
        self.ui_mode = UiMode::AddingTask;
    }

    /// Open input form prefilled with the selected task
    pub fn start_edit_task(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.store.get(id) else {
            return;
        };

        self.input_form = Some(InputFormState {
            text: task.text.clone(),
            deadline: task
                .deadline()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            editing_id: Some(id),
            editing_field: 0,
        });
        self.ui_mode = UiMode::EditingTask;
    }

    /// Switch between text and deadline fields
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % 2;
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.active_field_mut().push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.active_field_mut().pop();
        }
    }

    /// Submit the form as an Add or Edit intent.
    ///
    /// A deadline that doesn't parse keeps the form open with an error notice.
    pub fn submit_input_form(&mut self) -> Result<()> {
        let Some(form) = self.input_form.take() else {
            return Ok(());
        };

        let today = self.now().date();
        let time = match parse_deadline_input(&form.deadline, today) {
            Ok(time) => time,
            Err(e) => {
                self.show_notice(Notice::error(e.to_string()));
                self.input_form = Some(form);
                return Ok(());
            }
        };

        let intent = match form.editing_id {
            Some(id) => Intent::Edit {
                id,
                text: Some(form.text),
                time,
            },
            None => Intent::Add {
                text: form.text,
                time,
            },
        };

        self.ui_mode = UiMode::Normal;
        self.dispatch(intent)
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    fn save_metadata(&self) -> Result<()> {
        let Some(path) = &self.meta_path else {
            return Ok(());
        };

        let metadata = AppMetadata {
            filter: self.filter,
            notice_secs: self.notice_ttl.as_secs(),
        };
        save_metadata(path, &metadata)
    }
}
