use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted client state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

/// Sole owner of the bearer token and profile id, backed by a YAML file
pub struct SessionStore {
    session: Session,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store at `path`, starting empty if the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match Self::read(&path) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session file");
                Session::default()
            }
        };
        SessionStore {
            session,
            path: Some(path),
        }
    }

    /// A store that never touches disk
    pub fn in_memory() -> Self {
        SessionStore {
            session: Session::default(),
            path: None,
        }
    }

    fn read(path: &Path) -> Result<Session> {
        if !path.exists() {
            return Ok(Session::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;
        let session = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse session file {}", path.display()))?;
        Ok(session)
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_yaml::to_string(&self.session)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.access_token.as_deref()
    }

    pub fn user_profile_id(&self) -> Option<&str> {
        self.session.user_profile_id.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.access_token.is_some()
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) -> Result<()> {
        self.session.access_token = Some(token.into());
        self.session.logged_in_at = Some(Utc::now());
        tracing::info!("session token stored");
        self.save()
    }

    pub fn set_user_profile_id(&mut self, id: impl Into<String>) -> Result<()> {
        self.session.user_profile_id = Some(id.into());
        self.save()
    }

    /// Drop both stored values
    pub fn logout(&mut self) -> Result<()> {
        self.session = Session::default();
        tracing::info!("session cleared");
        self.save()
    }
}
