//! Error types shared by the network and app layers

use std::fmt;

use thiserror::Error;

/// Failure of a single API call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Server answered 401
    #[error("Request failed with status code 401")]
    Unauthorized,

    #[error("Request timed out")]
    Timeout,

    /// Any other non-2xx status
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Local file access (upload source, download target)
    #[error("File error: {0}")]
    Io(String),
}

impl ApiError {
    /// Classify a reqwest error the way the client reports it
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), String::new())
        } else if err.is_connect() {
            ApiError::Connect(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// Map a non-success status code
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 401 {
            ApiError::Unauthorized
        } else {
            ApiError::Status { status, body }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

/// Form field a validation message is attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Name,
    Email,
    Password,
    Username,
    ImagePath,
    ProfileId,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::Username => "username",
            Field::ImagePath => "image path",
            Field::ProfileId => "profile",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side field errors collected before a submit
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid data")]
pub struct ValidationErrors {
    errors: Vec<(Field, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_401_is_unauthorized() {
        assert_eq!(ApiError::from_status(401, "nope".into()), ApiError::Unauthorized);
        assert!(ApiError::from_status(401, String::new()).is_unauthorized());
        assert!(matches!(ApiError::from_status(500, String::new()), ApiError::Status { status: 500, .. }));
    }

    #[test]
    fn test_status_message_matches_http_wording() {
        let err = ApiError::from_status(404, "missing".into());
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }

    #[test]
    fn test_validation_errors_lookup() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add(Field::Title, "title should not be empty");
        assert_eq!(errors.get(Field::Title), Some("title should not be empty"));
        assert_eq!(errors.get(Field::Description), None);
        assert_eq!(errors.to_string(), "invalid data");
        assert!(errors.into_result().is_err());
    }
}
