use serde::{Deserialize, Serialize};

/// Account role
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    ADMIN,
    #[default]
    EMPLOYEE,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::ADMIN => "ADMIN",
            Role::EMPLOYEE => "EMPLOYEE",
        }
    }
}

/// Task status. New-task forms start at `Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    #[default]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    pub fn next(&self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }
}

/// Account as returned by the admin endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_uuid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Task as returned by the task endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_uuid: String,
    pub title: String,
    pub description: String,
    pub task_status: TaskStatus,
}

/// Body for task create and full replacement
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        TaskDraft {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.task_status,
        }
    }
}

/// Display projection of an account and a task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTaskLink {
    pub account_uuid: String,
    pub account_name: String,
    pub task_uuid: String,
    pub task_title: String,
}

/// Body for admin-side account creation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub access_token: String,
}

/// Profile from the profile service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub user_profile_image_link: Option<String>,
}

/// A profile image saved to disk
#[derive(Clone, Debug, PartialEq)]
pub struct SavedImage {
    pub path: std::path::PathBuf,
    pub bytes: usize,
    pub content_type: Option<String>,
}

/// Outcome of a share fan-out, per account
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShareReport {
    pub linked: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl ShareReport {
    pub fn settled(&self) -> usize {
        self.linked.len() + self.failed.len()
    }

    pub fn is_linked(&self, account_uuid: &str) -> bool {
        self.linked.iter().any(|a| a == account_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_wire_format() {
        let json = r#"{"title":"t","description":"d","taskStatus":"IN_PROGRESS","taskUuid":"42"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.task_status, TaskStatus::InProgress);
        assert_eq!(task.task_uuid, "42");

        let draft = TaskDraft::from(&task);
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["status"], "IN_PROGRESS");
        assert_eq!(body["title"], "t");
    }

    #[test]
    fn test_link_ignores_storage_keys() {
        let json = r#"{"pk":"ACCOUNT#1","sk":"TASK#2","accountUuid":"1","accountName":"ann","taskUuid":"2","taskTitle":"write"}"#;
        let link: AccountTaskLink = serde_json::from_str(json).unwrap();
        assert_eq!(link.account_name, "ann");
        assert_eq!(link.task_title, "write");
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let account = NewAccount {
            name: "n".into(),
            email: "n@x.io".into(),
            password: "p".into(),
            role: Role::EMPLOYEE,
        };
        let body = serde_json::to_value(&account).unwrap();
        assert_eq!(body["role"], "EMPLOYEE");
    }

    #[test]
    fn test_status_cycle() {
        assert_eq!(TaskStatus::Todo.next(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::Done.next(), TaskStatus::Todo);
    }
}
