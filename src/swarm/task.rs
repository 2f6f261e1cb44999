//! Swarm task state as reported by `docker inspect --type task`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Task state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TaskState {
    /// Task is new
    New,
    /// Task resources are allocated
    Allocated,
    /// Task is pending
    Pending,
    /// Task is assigned
    Assigned,
    /// Task is accepted
    Accepted,
    /// Task is preparing
    Preparing,
    /// Task is ready
    Ready,
    /// Task is starting
    Starting,
    /// Task is running
    Running,
    /// Task completed
    Complete,
    /// Task shutdown
    Shutdown,
    /// Task failed
    Failed,
    /// Task rejected
    Rejected,
    /// Task removed
    Remove,
    /// Task is orphaned
    Orphaned,
    /// State string this version does not know
    #[default]
    Unknown,
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "new" => TaskState::New,
            "allocated" => TaskState::Allocated,
            "pending" => TaskState::Pending,
            "assigned" => TaskState::Assigned,
            "accepted" => TaskState::Accepted,
            "preparing" => TaskState::Preparing,
            "ready" => TaskState::Ready,
            "starting" => TaskState::Starting,
            "running" => TaskState::Running,
            "complete" => TaskState::Complete,
            "shutdown" => TaskState::Shutdown,
            "failed" => TaskState::Failed,
            "rejected" => TaskState::Rejected,
            "remove" => TaskState::Remove,
            "orphaned" => TaskState::Orphaned,
            _ => TaskState::Unknown,
        }
    }
}

/// Task status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskStatus {
    /// When the task entered its current state
    pub timestamp: DateTime<Utc>,
    /// Observed state
    #[serde(default)]
    pub state: TaskState,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub err: Option<String>,
}

/// Swarm task, reduced to what the health checks need
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    /// Task ID
    #[serde(rename = "ID")]
    pub id: String,
    /// Service ID
    #[serde(rename = "ServiceID", default)]
    pub service_id: String,
    /// Task status
    pub status: TaskStatus,
    /// Desired state
    #[serde(default)]
    pub desired_state: TaskState,
}

impl Task {
    /// Check if task is running
    pub fn is_running(&self) -> bool {
        self.status.state == TaskState::Running
    }

    /// Running, meant to keep running, and settled for at least `window`
    pub fn is_stable(&self, window: Duration) -> bool {
        self.is_stable_at(Utc::now(), window)
    }

    pub fn is_stable_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        if !self.is_running() || self.desired_state != TaskState::Running {
            return false;
        }

        match chrono::Duration::from_std(window) {
            Ok(window) => now.signed_duration_since(self.status.timestamp) >= window,
            Err(_) => false,
        }
    }
}
