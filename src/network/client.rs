//! HTTP client wrapper - one method per backend endpoint

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use base64::Engine;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::messages::{ApiCall, ApiOutcome};
use crate::models::{
    Account, AccountTaskLink, AuthenticationResponse, NewAccount, SavedImage, Task, TaskDraft,
    UserProfile,
};

/// Typed client for the task manager and profile APIs
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_bearer(builder: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Send and turn any non-2xx status into an error
    async fn send(builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = builder.send().await.map_err(ApiError::from_reqwest)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), body))
    }

    async fn send_json<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let resp = Self::send(builder).await?;
        resp.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Decode(e.to_string())
            }
        })
    }

    async fn send_empty(builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        Self::send(builder).await.map(|_| ())
    }

    // ========================
    // Auth
    // ========================

    /// Exchange Basic credentials for a bearer token
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let credentials = format!("{}:{}", email, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        let builder = self
            .http
            .post(self.url("/api/auth/authenticate"))
            .header("Authorization", format!("Basic {}", encoded))
            .json(&serde_json::json!({}));
        let resp: AuthenticationResponse = Self::send_json(builder).await?;
        Ok(resp.access_token)
    }

    // ========================
    // Profiles
    // ========================

    pub async fn fetch_profile(&self, id: &str) -> Result<UserProfile, ApiError> {
        Self::send_json(self.http.get(self.url(&format!("/api/profile/{}", id)))).await
    }

    pub async fn create_profile(&self, username: &str) -> Result<UserProfile, ApiError> {
        let builder = self
            .http
            .post(self.url("/api/profile"))
            .json(&serde_json::json!({ "username": username }));
        Self::send_json(builder).await
    }

    /// Multipart upload, the file goes in the `file` field
    pub async fn upload_profile_image(&self, id: &str, path: &Path) -> Result<(), ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);
        let builder = self
            .http
            .post(self.url(&format!("/api/profile/{}/image/upload", id)))
            .multipart(form);
        Self::send_empty(builder).await
    }

    /// Fetch the image and write it under `dest`
    pub async fn download_profile_image(&self, id: &str, dest: &Path) -> Result<SavedImage, ApiError> {
        let resp = Self::send(
            self.http
                .get(self.url(&format!("/api/profile/{}/image/download", id))),
        )
        .await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await.map_err(ApiError::from_reqwest)?;

        tokio::fs::create_dir_all(dest).await?;
        let path: PathBuf = dest.join(format!("profile-{}.img", id));
        tokio::fs::write(&path, &bytes).await?;

        Ok(SavedImage {
            path,
            bytes: bytes.len(),
            content_type,
        })
    }

    // ========================
    // Accounts
    // ========================

    pub async fn list_admins(&self, token: Option<&str>) -> Result<Vec<Account>, ApiError> {
        Self::send_json(Self::with_bearer(self.http.get(self.url("/api/admin/all")), token)).await
    }

    pub async fn list_employees(&self, token: Option<&str>) -> Result<Vec<Account>, ApiError> {
        Self::send_json(Self::with_bearer(
            self.http.get(self.url("/api/admin/employees/all")),
            token,
        ))
        .await
    }

    pub async fn create_employee(
        &self,
        token: Option<&str>,
        account: &NewAccount,
    ) -> Result<Account, ApiError> {
        let builder = self.http.post(self.url("/api/admin/employees")).json(account);
        Self::send_json(Self::with_bearer(builder, token)).await
    }

    // ========================
    // Tasks
    // ========================

    pub async fn fetch_task(&self, token: Option<&str>, id: &str) -> Result<Task, ApiError> {
        let builder = self.http.get(self.url(&format!("/api/task/{}", id)));
        Self::send_json(Self::with_bearer(builder, token)).await
    }

    pub async fn create_task(&self, token: Option<&str>, draft: &TaskDraft) -> Result<Task, ApiError> {
        let builder = self.http.post(self.url("/api/task")).json(draft);
        Self::send_json(Self::with_bearer(builder, token)).await
    }

    /// Full-field replacement
    pub async fn update_task(
        &self,
        token: Option<&str>,
        id: &str,
        draft: &TaskDraft,
    ) -> Result<Task, ApiError> {
        let builder = self.http.put(self.url(&format!("/api/task/{}", id))).json(draft);
        Self::send_json(Self::with_bearer(builder, token)).await
    }

    pub async fn delete_task(&self, token: Option<&str>, id: &str) -> Result<(), ApiError> {
        let builder = self.http.delete(self.url(&format!("/api/task/{}", id)));
        Self::send_empty(Self::with_bearer(builder, token)).await
    }

    pub async fn my_tasks(&self, token: Option<&str>) -> Result<Vec<AccountTaskLink>, ApiError> {
        Self::send_json(Self::with_bearer(self.http.get(self.url("/api/account/tasks")), token)).await
    }

    pub async fn account_tasks(
        &self,
        token: Option<&str>,
        account_id: &str,
    ) -> Result<Vec<AccountTaskLink>, ApiError> {
        let builder = self.http.get(self.url(&format!("/api/account/{}/tasks", account_id)));
        Self::send_json(Self::with_bearer(builder, token)).await
    }

    pub async fn task_accounts(
        &self,
        token: Option<&str>,
        task_id: &str,
    ) -> Result<Vec<AccountTaskLink>, ApiError> {
        let builder = self.http.get(self.url(&format!("/api/task/{}/accounts", task_id)));
        Self::send_json(Self::with_bearer(builder, token)).await
    }

    pub async fn share_task(
        &self,
        token: Option<&str>,
        task_id: &str,
        account_id: &str,
    ) -> Result<(), ApiError> {
        let builder = self
            .http
            .post(self.url(&format!("/api/task/{}/accounts/{}", task_id, account_id)))
            .json(&serde_json::json!({}));
        Self::send_empty(Self::with_bearer(builder, token)).await
    }

    pub async fn unshare_task(
        &self,
        token: Option<&str>,
        task_id: &str,
        account_id: &str,
    ) -> Result<(), ApiError> {
        let builder = self
            .http
            .delete(self.url(&format!("/api/task/{}/accounts/{}", task_id, account_id)));
        Self::send_empty(Self::with_bearer(builder, token)).await
    }

    // ========================
    // Dispatch
    // ========================

    /// Run one call and shape its result for the App layer
    pub async fn execute(&self, bearer: Option<&str>, call: ApiCall) -> ApiOutcome {
        let start = Instant::now();
        let name = call.name();
        let outcome = match call {
            ApiCall::FetchProfile { id } => ApiOutcome::Profile(self.fetch_profile(&id).await),
            ApiCall::CreateProfile { username } => {
                ApiOutcome::ProfileCreated(self.create_profile(&username).await)
            }
            ApiCall::UploadProfileImage { id, path } => {
                ApiOutcome::ImageUploaded(self.upload_profile_image(&id, &path).await)
            }
            ApiCall::DownloadProfileImage { id, dest } => {
                ApiOutcome::ImageDownloaded(self.download_profile_image(&id, &dest).await)
            }
            ApiCall::Authenticate { email, password } => {
                ApiOutcome::Authenticated(self.authenticate(&email, &password).await)
            }
            ApiCall::ListAdmins => ApiOutcome::Admins(self.list_admins(bearer).await),
            ApiCall::ListEmployees => ApiOutcome::Employees(self.list_employees(bearer).await),
            ApiCall::CreateEmployee(account) => {
                ApiOutcome::EmployeeCreated(self.create_employee(bearer, &account).await)
            }
            ApiCall::FetchTask { id } => ApiOutcome::Task(self.fetch_task(bearer, &id).await),
            ApiCall::CreateTask(draft) => {
                ApiOutcome::TaskCreated(self.create_task(bearer, &draft).await)
            }
            ApiCall::UpdateTask { id, draft } => {
                ApiOutcome::TaskUpdated(self.update_task(bearer, &id, &draft).await)
            }
            ApiCall::DeleteTask { id } => ApiOutcome::TaskDeleted(self.delete_task(bearer, &id).await),
            ApiCall::MyTasks => ApiOutcome::Links(self.my_tasks(bearer).await),
            ApiCall::AccountTasks { account_id } => {
                ApiOutcome::Links(self.account_tasks(bearer, &account_id).await)
            }
            ApiCall::TaskAccounts { task_id } => {
                ApiOutcome::TaskAccounts(self.task_accounts(bearer, &task_id).await)
            }
            ApiCall::ShareTask { task_id, account_id } => {
                let result = self.share_task(bearer, &task_id, &account_id).await;
                ApiOutcome::Shared { account_id, result }
            }
            ApiCall::UnshareTask { task_id, account_id } => {
                let result = self.unshare_task(bearer, &task_id, &account_id).await;
                ApiOutcome::Unshared { account_id, result }
            }
        };
        tracing::debug!(call = name, ok = outcome.is_ok(), elapsed_ms = start.elapsed().as_millis() as u64, "call finished");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Failure, FailureKind};
    use crate::constants::UNAUTHORIZED_MESSAGE;
    use crate::models::TaskStatus;
    use axum::extract::{Multipart, Path as UrlPath};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5))
    }

    fn bearer_ok(headers: &HeaderMap) -> bool {
        headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer tok-1")
    }

    async fn authenticate(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
        let expected = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("ann@corp.io:secret")
        );
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(h) if h == expected => Ok(Json(json!({ "accessToken": "tok-1" }))),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }

    #[tokio::test]
    async fn test_login_sends_basic_credentials() {
        let base = serve(Router::new().route("/api/auth/authenticate", post(authenticate))).await;
        let token = client(&base).authenticate("ann@corp.io", "secret").await.unwrap();
        assert_eq!(token, "tok-1");
    }

    #[tokio::test]
    async fn test_login_with_empty_password_is_sent_and_rejected() {
        let base = serve(Router::new().route("/api/auth/authenticate", post(authenticate))).await;
        let err = client(&base).authenticate("ann@corp.io", "").await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let app = Router::new().route(
            "/api/account/tasks",
            get(|headers: HeaderMap| async move {
                if !bearer_ok(&headers) {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!([
                    {"accountUuid": "a1", "accountName": "ann", "taskUuid": "t1", "taskTitle": "docs"}
                ])))
            }),
        );
        let base = serve(app).await;
        let api = client(&base);

        let links = api.my_tasks(Some("tok-1")).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].task_title, "docs");

        let err = api.my_tasks(None).await.unwrap_err();
        assert_eq!(Failure::from_api(&err).message, UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn test_server_error_message_is_verbatim() {
        let app = Router::new().route(
            "/api/task/:id",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db down") }),
        );
        let base = serve(app).await;
        let err = client(&base).fetch_task(Some("tok-1"), "t1").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                body: "db down".into()
            }
        );
        let failure = Failure::from_api(&err);
        assert_eq!(failure.kind, FailureKind::RequestFailed);
        assert_eq!(failure.message, "Request failed with status code 500");
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let app = Router::new().route(
            "/api/admin/all",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        );
        let base = serve(app).await;
        let api = ApiClient::new(&base, Duration::from_millis(200));
        let err = api.list_admins(Some("tok-1")).await.unwrap_err();
        assert_eq!(err, ApiError::Timeout);
        assert_eq!(Failure::from_api(&err).kind, FailureKind::Timeout);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_request_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr)).list_employees(Some("t")).await.unwrap_err();
        assert!(matches!(err, ApiError::Connect(_) | ApiError::Transport(_)));
        assert_eq!(Failure::from_api(&err).kind, FailureKind::RequestFailed);
    }

    #[tokio::test]
    async fn test_task_create_and_replace() {
        let app = Router::new()
            .route(
                "/api/task",
                post(|Json(body): Json<Value>| async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "taskUuid": "t9",
                            "title": body["title"],
                            "description": body["description"],
                            "taskStatus": body["status"],
                        })),
                    )
                }),
            )
            .route(
                "/api/task/:id",
                axum::routing::put(|UrlPath(id): UrlPath<String>, Json(body): Json<Value>| async move {
                    Json(json!({
                        "taskUuid": id,
                        "title": body["title"],
                        "description": body["description"],
                        "taskStatus": body["status"],
                    }))
                })
                .delete(|| async { StatusCode::OK }),
            );
        let base = serve(app).await;
        let api = client(&base);

        let draft = TaskDraft {
            title: "write".into(),
            description: "the docs".into(),
            status: TaskStatus::Todo,
        };
        let task = api.create_task(Some("tok-1"), &draft).await.unwrap();
        assert_eq!(task.task_uuid, "t9");
        assert_eq!(task.task_status, TaskStatus::Todo);

        let edited = TaskDraft {
            status: TaskStatus::Done,
            ..draft
        };
        let task = api.update_task(Some("tok-1"), "t9", &edited).await.unwrap();
        assert_eq!(task.task_status, TaskStatus::Done);

        api.delete_task(Some("tok-1"), "t9").await.unwrap();
    }

    #[tokio::test]
    async fn test_image_upload_is_multipart() {
        let app = Router::new().route(
            "/api/profile/:id/image/upload",
            post(|UrlPath(id): UrlPath<String>, mut form: Multipart| async move {
                let field = form.next_field().await.unwrap().unwrap();
                let name = field.name().unwrap_or_default().to_string();
                let data = field.bytes().await.unwrap();
                if id == "p1" && name == "file" && &data[..] == b"PNGDATA" {
                    StatusCode::OK
                } else {
                    StatusCode::BAD_REQUEST
                }
            }),
        );
        let base = serve(app).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.png");
        std::fs::write(&path, b"PNGDATA").unwrap();

        client(&base).upload_profile_image("p1", &path).await.unwrap();
    }

    #[tokio::test]
    async fn test_image_download_is_saved() {
        let app = Router::new().route(
            "/api/profile/:id/image/download",
            get(|| async { ([("content-type", "image/png")], b"IMG".to_vec()) }),
        );
        let base = serve(app).await;
        let dir = tempfile::tempdir().unwrap();

        let saved = client(&base).download_profile_image("p1", dir.path()).await.unwrap();
        assert_eq!(saved.bytes, 3);
        assert_eq!(saved.content_type.as_deref(), Some("image/png"));
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"IMG");
    }

    #[tokio::test]
    async fn test_execute_shapes_share_outcome() {
        let app = Router::new().route(
            "/api/task/:task/accounts/:account",
            post(|UrlPath((_, account)): UrlPath<(String, String)>| async move {
                if account == "bad" {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::OK
                }
            }),
        );
        let base = serve(app).await;
        let api = client(&base);

        let ok = api
            .execute(
                Some("tok-1"),
                ApiCall::ShareTask {
                    task_id: "t1".into(),
                    account_id: "a1".into(),
                },
            )
            .await;
        assert!(matches!(ok, ApiOutcome::Shared { ref account_id, result: Ok(()) } if account_id == "a1"));

        let failed = api
            .execute(
                Some("tok-1"),
                ApiCall::ShareTask {
                    task_id: "t1".into(),
                    account_id: "bad".into(),
                },
            )
            .await;
        assert!(!failed.is_ok());
    }
}
