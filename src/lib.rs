//! # Taskdesk
//!
//! A terminal client for a small task management backend.
//!
//! ## Features
//! - Login with Basic credentials, bearer-token session kept on disk
//! - Own tasks: create, edit, delete, share with employees, unshare
//! - Admin views: employees, their tasks, new employees, admins
//! - User profile: create, upload and download the profile image
//!
//! Every network operation runs through [`AsyncActionState`], which tracks
//! loading, success and failure and drops replies for superseded requests.
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod action;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod session;
pub mod ui;
pub mod validation;

// Re-export commonly used types
pub use action::{AsyncActionState, Failure, FailureKind, RequestTicket};
pub use app::{AppActor, AppState};
pub use error::{ApiError, Field, ValidationErrors};
pub use messages::{ApiCall, ApiOutcome, NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Account, AccountTaskLink, Role, ShareReport, Task, TaskDraft, TaskStatus, UserProfile};
pub use network::{ApiClient, NetworkActor};
pub use session::SessionStore;
