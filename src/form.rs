use crate::task::{parse_date, parse_time, Draft, DueDate, DueTime, Task, TaskStatus};

/// What the form panel is doing. A draft and an edit never coexist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    None,
    Creating(Draft),
    Editing(Task),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    DueDate,
    DueTime,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Title,
        FormField::Description,
        FormField::DueDate,
        FormField::DueTime,
        FormField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::DueDate => "Due Date",
            FormField::DueTime => "Due Time",
            FormField::Status => "Status",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// Draft and Task share every editable field.
struct Fields<'a> {
    title: &'a mut String,
    description: &'a mut String,
    status: &'a mut TaskStatus,
    due_date: &'a mut Option<DueDate>,
    due_time: &'a mut Option<DueTime>,
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    pub mode: FormMode,
    pub focus: FormField,
    // Raw date/time input; partial text doesn't parse until it's complete.
    pub due_date_text: String,
    pub due_time_text: String,
}

impl Form {
    pub fn is_open(&self) -> bool {
        self.mode != FormMode::None
    }

    /// Opens an empty draft, keeping one that is already being typed.
    pub fn open_create(&mut self) {
        if !matches!(self.mode, FormMode::Creating(_)) {
            self.reset_draft();
        }
    }

    pub fn reset_draft(&mut self) {
        self.set_mode(FormMode::Creating(Draft::default()));
    }

    pub fn open_edit(&mut self, task: &Task) {
        self.set_mode(FormMode::Editing(task.clone()));
    }

    pub fn close(&mut self) {
        self.set_mode(FormMode::None);
    }

    fn set_mode(&mut self, mode: FormMode) {
        self.mode = mode;
        self.focus = FormField::default();
        let (date, time) = self.due_stamps();
        let date_text = date.map(|d| d.text().to_string()).unwrap_or_default();
        let time_text = time.map(|t| t.text().to_string()).unwrap_or_default();
        self.due_date_text = date_text;
        self.due_time_text = time_text;
    }

    fn due_stamps(&self) -> (Option<&DueDate>, Option<&DueTime>) {
        match &self.mode {
            FormMode::None => (None, None),
            FormMode::Creating(draft) => (draft.due_date.as_ref(), draft.due_time.as_ref()),
            FormMode::Editing(task) => (task.due_date.as_ref(), task.due_time.as_ref()),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    // Text the server sent that was never touched stays acceptable as-is.
    pub fn due_date_valid(&self) -> bool {
        let text = &self.due_date_text;
        text.trim().is_empty()
            || parse_date(text).is_some()
            || self.due_stamps().0.is_some_and(|d| d.text() == text)
    }

    pub fn due_time_valid(&self) -> bool {
        let text = &self.due_time_text;
        text.trim().is_empty()
            || parse_time(text).is_some()
            || self.due_stamps().1.is_some_and(|t| t.text() == text)
    }

    pub fn is_valid(&self) -> bool {
        self.due_date_valid() && self.due_time_valid()
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::Title => self.edit_text(|f| f.title.push(c)),
            FormField::Description => self.edit_text(|f| f.description.push(c)),
            FormField::DueDate => {
                self.due_date_text.push(c);
                self.sync_due_date();
            }
            FormField::DueTime => {
                self.due_time_text.push(c);
                self.sync_due_time();
            }
            FormField::Status if c == ' ' => self.cycle_status(true),
            FormField::Status => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Title => self.edit_text(|f| {
                f.title.pop();
            }),
            FormField::Description => self.edit_text(|f| {
                f.description.pop();
            }),
            FormField::DueDate => {
                self.due_date_text.pop();
                self.sync_due_date();
            }
            FormField::DueTime => {
                self.due_time_text.pop();
                self.sync_due_time();
            }
            FormField::Status => {}
        }
    }

    pub fn cycle_status(&mut self, forward: bool) {
        self.edit_text(|f| {
            *f.status = if forward {
                f.status.next()
            } else {
                f.status.previous()
            };
        });
    }

    fn sync_due_date(&mut self) {
        let text = self.due_date_text.trim().to_string();
        if text.is_empty() {
            self.edit_text(|f| *f.due_date = None);
        } else if let Some(date) = parse_date(&text) {
            self.edit_text(|f| *f.due_date = Some(DueDate::from(date)));
        }
    }

    fn sync_due_time(&mut self) {
        let text = self.due_time_text.trim().to_string();
        if text.is_empty() {
            self.edit_text(|f| *f.due_time = None);
        } else if let Some(time) = parse_time(&text) {
            self.edit_text(|f| *f.due_time = Some(DueTime::from(time)));
        }
    }

    fn edit_text(&mut self, edit: impl FnOnce(Fields<'_>)) {
        let fields = match &mut self.mode {
            FormMode::None => return,
            FormMode::Creating(draft) => Fields {
                title: &mut draft.title,
                description: &mut draft.description,
                status: &mut draft.status,
                due_date: &mut draft.due_date,
                due_time: &mut draft.due_time,
            },
            FormMode::Editing(task) => Fields {
                title: &mut task.title,
                description: &mut task.description,
                status: &mut task.status,
                due_date: &mut task.due_date,
                due_time: &mut task.due_time,
            },
        };
        edit(fields);
    }
}
