//! Network messages - communication between App and Network layers

use std::path::PathBuf;

use crate::action::RequestTicket;
use crate::error::ApiError;
use crate::models::{
    Account, AccountTaskLink, NewAccount, SavedImage, Task, TaskDraft, UserProfile,
};

/// A single backend call
#[derive(Debug, Clone)]
pub enum ApiCall {
    // Profile service (no auth)
    FetchProfile { id: String },
    CreateProfile { username: String },
    UploadProfileImage { id: String, path: PathBuf },
    DownloadProfileImage { id: String, dest: PathBuf },

    /// Basic credentials exchanged for a bearer token
    Authenticate { email: String, password: String },

    // Bearer-protected
    ListAdmins,
    ListEmployees,
    CreateEmployee(NewAccount),
    FetchTask { id: String },
    CreateTask(TaskDraft),
    UpdateTask { id: String, draft: TaskDraft },
    DeleteTask { id: String },
    MyTasks,
    AccountTasks { account_id: String },
    TaskAccounts { task_id: String },
    ShareTask { task_id: String, account_id: String },
    UnshareTask { task_id: String, account_id: String },
}

impl ApiCall {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::FetchProfile { .. } => "fetch_profile",
            ApiCall::CreateProfile { .. } => "create_profile",
            ApiCall::UploadProfileImage { .. } => "upload_profile_image",
            ApiCall::DownloadProfileImage { .. } => "download_profile_image",
            ApiCall::Authenticate { .. } => "authenticate",
            ApiCall::ListAdmins => "list_admins",
            ApiCall::ListEmployees => "list_employees",
            ApiCall::CreateEmployee(_) => "create_employee",
            ApiCall::FetchTask { .. } => "fetch_task",
            ApiCall::CreateTask(_) => "create_task",
            ApiCall::UpdateTask { .. } => "update_task",
            ApiCall::DeleteTask { .. } => "delete_task",
            ApiCall::MyTasks => "my_tasks",
            ApiCall::AccountTasks { .. } => "account_tasks",
            ApiCall::TaskAccounts { .. } => "task_accounts",
            ApiCall::ShareTask { .. } => "share_task",
            ApiCall::UnshareTask { .. } => "unshare_task",
        }
    }

    pub fn requires_bearer(&self) -> bool {
        !matches!(
            self,
            ApiCall::FetchProfile { .. }
                | ApiCall::CreateProfile { .. }
                | ApiCall::UploadProfileImage { .. }
                | ApiCall::DownloadProfileImage { .. }
                | ApiCall::Authenticate { .. }
        )
    }
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    Execute {
        ticket: RequestTicket,
        /// Token snapshot taken when the command was built
        bearer: Option<String>,
        call: ApiCall,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Result of one call, shaped per endpoint
#[derive(Debug, Clone)]
pub enum ApiOutcome {
    Profile(Result<UserProfile, ApiError>),
    ProfileCreated(Result<UserProfile, ApiError>),
    ImageUploaded(Result<(), ApiError>),
    ImageDownloaded(Result<SavedImage, ApiError>),
    Authenticated(Result<String, ApiError>),
    Admins(Result<Vec<Account>, ApiError>),
    Employees(Result<Vec<Account>, ApiError>),
    EmployeeCreated(Result<Account, ApiError>),
    Task(Result<Task, ApiError>),
    TaskCreated(Result<Task, ApiError>),
    TaskUpdated(Result<Task, ApiError>),
    TaskDeleted(Result<(), ApiError>),
    Links(Result<Vec<AccountTaskLink>, ApiError>),
    TaskAccounts(Result<Vec<AccountTaskLink>, ApiError>),
    Shared {
        account_id: String,
        result: Result<(), ApiError>,
    },
    Unshared {
        account_id: String,
        result: Result<(), ApiError>,
    },
}

impl ApiOutcome {
    pub fn is_ok(&self) -> bool {
        match self {
            ApiOutcome::Profile(r) | ApiOutcome::ProfileCreated(r) => r.is_ok(),
            ApiOutcome::ImageUploaded(r) | ApiOutcome::TaskDeleted(r) => r.is_ok(),
            ApiOutcome::ImageDownloaded(r) => r.is_ok(),
            ApiOutcome::Authenticated(r) => r.is_ok(),
            ApiOutcome::Admins(r) | ApiOutcome::Employees(r) => r.is_ok(),
            ApiOutcome::EmployeeCreated(r) => r.is_ok(),
            ApiOutcome::Task(r) | ApiOutcome::TaskCreated(r) | ApiOutcome::TaskUpdated(r) => {
                r.is_ok()
            }
            ApiOutcome::Links(r) | ApiOutcome::TaskAccounts(r) => r.is_ok(),
            ApiOutcome::Shared { result, .. } | ApiOutcome::Unshared { result, .. } => {
                result.is_ok()
            }
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub struct NetworkResponse {
    pub ticket: RequestTicket,
    pub outcome: ApiOutcome,
}
