//! Tasks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::{FlowError, Result};
use crate::store::{Collection, Direction};

/// List name used when none is given.
pub const DEFAULT_LIST: &str = "Default";

/// Pseudo list name selecting every task.
pub const ALL_LISTS: &str = "All";

/// Task urgency. Lower numbers are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = FlowError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            other => Err(FlowError::Validation(format!(
                "Priority must be 1, 2, or 3 (got {})",
                other
            ))),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

impl FromStr for Priority {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "high" | "h" => Ok(Priority::High),
            "2" | "medium" | "med" | "m" => Ok(Priority::Medium),
            "3" | "low" | "l" => Ok(Priority::Low),
            other => Err(FlowError::InvalidInput(format!(
                "Unknown priority '{}' (use high, medium, low, or 1-3)",
                other
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    #[serde(default)]
    pub user_id: String,

    pub title: String,

    /// Optional free-form details
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub deadline: Option<DateTime<Utc>>,

    pub priority: Priority,

    #[serde(default = "default_list_name")]
    pub list_name: String,

    #[serde(default)]
    pub is_completed: bool,
}

fn default_list_name() -> String {
    DEFAULT_LIST.to_string()
}

impl Record for Task {
    const COLLECTION: Collection = Collection::Tasks;
    const ENTITY: &'static str = "task";
    const SORT_FIELD: &'static str = "priority";
    // High (1) first.
    const SORT_DIRECTION: Direction = Direction::Ascending;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        i64::from(u8::from(self.priority))
    }
}

/// Editable fields of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub list_name: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            deadline: None,
            priority: Priority::High,
            list_name: DEFAULT_LIST.to_string(),
        }
    }
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_list(mut self, list_name: impl Into<String>) -> Self {
        self.list_name = list_name.into();
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Prefill the editor from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: task.deadline,
            priority: task.priority,
            list_name: task.list_name.clone(),
        }
    }

    /// Build the full document. Completion state is carried over by the caller.
    pub fn into_task(self, id: String, user_id: String, is_completed: bool) -> Result<Task> {
        if self.title.trim().is_empty() {
            return Err(FlowError::Validation("Task title is required".to_string()));
        }
        let list_name = if self.list_name.trim().is_empty() {
            DEFAULT_LIST.to_string()
        } else {
            self.list_name
        };
        Ok(Task {
            id,
            user_id,
            title: self.title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            deadline: self.deadline,
            priority: self.priority,
            list_name,
            is_completed,
        })
    }
}

/// `"All"` followed by each list name in first-seen order.
pub fn list_names(tasks: &[Task]) -> Vec<String> {
    let mut names = vec![ALL_LISTS.to_string()];
    for task in tasks {
        if !names.iter().skip(1).any(|name| name == &task.list_name) {
            names.push(task.list_name.clone());
        }
    }
    names
}

/// Tasks in `list`, or all of them for `"All"`.
pub fn filter_by_list<'a>(tasks: &'a [Task], list: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| list == ALL_LISTS || task.list_name == list)
        .collect()
}
