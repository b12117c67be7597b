use crate::error::{require, ValidationError};
use crate::record::{CrmRecord, Record, RecordKind};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use ts_rs::TS;

/// Kind of activity a task represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    Call,
    Email,
    Meeting,
    FollowUp,
    Demo,
    #[default]
    Other,
}

string_enum!(TaskType, "task type", {
    Call => "call",
    Email => "email",
    Meeting => "meeting",
    FollowUp => "follow-up",
    Demo => "demo",
    Other => "other",
});

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

string_enum!(TaskPriority, "task priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

string_enum!(TaskStatus, "task status", {
    Pending => "pending",
    InProgress => "in-progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl TaskStatus {
    /// Completed and cancelled tasks are closed; everything else still needs doing.
    pub fn is_active(&self) -> bool {
        !matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

/// A to-do item, optionally pointing at a contact or lead. The references are not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: String,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub related_contact_id: Option<String>,
    pub related_lead_id: Option<String>,
    pub assigned_to: String,
}

impl Task {
    /// Mark the task completed as of `now`.
    pub fn complete(&mut self, now: &str) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now.to_string());
    }

    /// Move to `status`. Re-saving a completed task keeps its completion time; leaving
    /// `Completed` clears it.
    pub fn set_status(&mut self, status: TaskStatus, now: &str) {
        match status {
            TaskStatus::Completed if self.status == TaskStatus::Completed => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(now.to_string());
                }
            }
            TaskStatus::Completed => self.complete(now),
            other => {
                self.status = other;
                self.completed_at = None;
            }
        }
    }
}

impl CrmRecord for Task {
    const KIND: RecordKind = RecordKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.description.as_str()),
            Cow::Borrowed(self.assigned_to.as_str()),
        ]
    }

    fn into_record(self) -> Record {
        Record::Task(self)
    }
}

/// Request to create a new task. Title and due date are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: String,
    pub related_contact_id: Option<String>,
    pub related_lead_id: Option<String>,
    pub assigned_to: String,
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("dueDate", &self.due_date)?;
        Ok(())
    }

    pub fn into_task(self, id: String, now: &str) -> Task {
        let mut task = Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            task_type: self.task_type.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            status: TaskStatus::Pending,
            due_date: self.due_date.trim().to_string(),
            created_at: now.to_string(),
            completed_at: None,
            related_contact_id: non_blank(self.related_contact_id),
            related_lead_id: non_blank(self.related_lead_id),
            assigned_to: self.assigned_to,
        };
        if let Some(status) = self.status {
            task.set_status(status, now);
        }
        task
    }
}

/// Request to update a task
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<String>,
    pub related_contact_id: Option<String>,
    pub related_lead_id: Option<String>,
    pub assigned_to: Option<String>,
}

impl UpdateTaskRequest {
    pub fn apply_to(self, task: &mut Task, now: &str) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(due_date) = &self.due_date {
            require("dueDate", due_date)?;
        }

        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date.trim().to_string();
        }
        // An empty string clears a relation.
        if let Some(contact_id) = self.related_contact_id {
            task.related_contact_id = non_blank(Some(contact_id));
        }
        if let Some(lead_id) = self.related_lead_id {
            task.related_lead_id = non_blank(Some(lead_id));
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(status) = self.status {
            task.set_status(status, now);
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Response containing a list of tasks
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}
