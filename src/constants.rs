//! Application constants
//!
//! Centralized location for user-facing messages and configuration defaults.

/// Default backend base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Environment variable overriding the configured base URL
pub const API_URL_ENV: &str = "TASKDESK_API_URL";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory under $HOME holding config, session and logs
pub const APP_DIR: &str = ".taskdesk";

/// Log file name inside the log directory
pub const LOG_FILE: &str = "taskdesk.log";

/// Application name
pub const APP_NAME: &str = "taskdesk";

// Failure messages

pub const UNAUTHORIZED_MESSAGE: &str =
    "Your are unauthorized to access this page, please login with admin account to access it.";
pub const TIMEOUT_MESSAGE: &str = "request timed out";
pub const INVALID_DATA_MESSAGE: &str = "invalid data";
pub const LOGIN_FAILED_MESSAGE: &str = "Login Failed";
pub const PROFILE_CREATE_FAILED_MESSAGE: &str = "Failed to create profile";
pub const UPLOAD_FAILED_MESSAGE: &str = "failed to upload the image";

// Success messages

pub const LOGIN_SUCCESS_MESSAGE: &str = "Successful Login";
pub const TASK_CREATED_MESSAGE: &str = "Task created successfully...";
pub const TASK_SAVED_MESSAGE: &str = "Task saved successfully...";
pub const TASK_DELETED_MESSAGE: &str = "Task deleted.";
pub const EMPLOYEE_CREATED_MESSAGE: &str = "Employee created successfully!!";
pub const PROFILE_CREATED_MESSAGE: &str = "profile created succesfully";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "image uploaded sucessfully.";
