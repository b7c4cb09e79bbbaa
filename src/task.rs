use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

/// Server-assigned task identifier.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status as free text on the wire. Anything the form doesn't offer is
/// kept verbatim in `Other` so it survives a PUT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Other(String),
}

impl TaskStatus {
    /// Wire spelling, also what the list shows after `Status:`.
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn next(&self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed | TaskStatus::Other(_) => TaskStatus::Pending,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            TaskStatus::Pending | TaskStatus::Other(_) => TaskStatus::Completed,
            TaskStatus::InProgress => TaskStatus::Pending,
            TaskStatus::Completed => TaskStatus::InProgress,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => TaskStatus::Pending,
            "in-progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date or time formats understood in the due fields.
pub trait StampFormat: Sized + Copy {
    fn parse_text(text: &str) -> Option<Self>;
    fn to_text(&self) -> String;
}

impl StampFormat for NaiveDate {
    fn parse_text(text: &str) -> Option<Self> {
        parse_date(text)
    }

    fn to_text(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }
}

impl StampFormat for NaiveTime {
    fn parse_text(text: &str) -> Option<Self> {
        parse_time(text)
    }

    fn to_text(&self) -> String {
        if self.second() == 0 {
            self.format(TIME_FORMAT).to_string()
        } else {
            self.format(TIME_FORMAT_SECONDS).to_string()
        }
    }
}

/// A due date or time as written on the wire, with its parsed value when
/// the text is in a known format. The text is what gets sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp<T> {
    text: String,
    value: Option<T>,
}

impl<T: StampFormat> Stamp<T> {
    pub fn from_wire(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = T::parse_text(&text);
        Self { text, value }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<T> {
        self.value
    }
}

impl<T: StampFormat> From<T> for Stamp<T> {
    fn from(value: T) -> Self {
        Self {
            text: value.to_text(),
            value: Some(value),
        }
    }
}

pub type DueDate = Stamp<NaiveDate>;
pub type DueTime = Stamp<NaiveTime>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, with = "optional_stamp")]
    pub due_date: Option<DueDate>,
    #[serde(default, with = "optional_stamp")]
    pub due_time: Option<DueTime>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Full copy of the record with only the status changed.
    pub fn marked_completed(&self) -> Task {
        Task {
            status: TaskStatus::Completed,
            ..self.clone()
        }
    }
}

/// A task that has not been created yet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, with = "optional_stamp")]
    pub due_date: Option<DueDate>,
    #[serde(default, with = "optional_stamp")]
    pub due_time: Option<DueTime>,
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(text, TIME_FORMAT_SECONDS))
        .ok()
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Missing, null and "" all read as absent; absent is written as "".
// Unparseable text is kept, not rejected.
mod optional_stamp {
    use super::*;

    pub fn serialize<S, T>(value: &Option<Stamp<T>>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(value.as_ref().map_or("", |stamp| stamp.text.as_str()))
    }

    pub fn deserialize<'de, D, T>(d: D) -> Result<Option<Stamp<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: StampFormat,
    {
        Ok(Option::<String>::deserialize(d)?
            .filter(|text| !text.trim().is_empty())
            .map(|text| Stamp::from_wire(text)))
    }
}
