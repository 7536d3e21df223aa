//! Client-side form checks, run before any request is sent

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Field, ValidationErrors};
use crate::models::{NewAccount, TaskDraft};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Login only flags a malformed email inline; the request still goes out
pub fn check_login_email(email: &str) -> Option<&'static str> {
    if is_valid_email(email) {
        None
    } else {
        Some("in valid email")
    }
}

pub fn validate_task(draft: &TaskDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if draft.title.is_empty() {
        errors.add(Field::Title, "title should not be empty");
    }
    if draft.description.is_empty() {
        errors.add(Field::Description, "description should not be empty");
    }
    errors.into_result()
}

pub fn validate_new_account(account: &NewAccount) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if account.name.is_empty() {
        errors.add(Field::Name, "should not be empty");
    }
    if !is_valid_email(&account.email) {
        errors.add(Field::Email, "invalid email");
    }
    if account.password.is_empty() {
        errors.add(Field::Password, "should not be empty");
    }
    errors.into_result()
}

pub fn validate_username(username: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if username.trim().is_empty() {
        errors.add(Field::Username, "username should not be empty");
    }
    errors.into_result()
}

/// Upload needs a profile to attach to and a readable file
pub fn validate_upload(profile_id: Option<&str>, path: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if profile_id.map_or(true, str::is_empty) {
        errors.add(Field::ProfileId, "create a profile first");
    }
    if path.trim().is_empty() {
        errors.add(Field::ImagePath, "choose an image file");
    } else if !Path::new(path.trim()).is_file() {
        errors.add(Field::ImagePath, "file not found");
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ann@corp.io"));
        assert!(!is_valid_email("ann@corp"));
        assert!(!is_valid_email("ann corp@x.io"));
        assert!(!is_valid_email(""));
        assert_eq!(check_login_email("nope"), Some("in valid email"));
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let draft = TaskDraft {
            title: String::new(),
            description: "write docs".into(),
            ..Default::default()
        };
        let errors = validate_task(&draft).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some("title should not be empty"));
        assert_eq!(errors.get(Field::Description), None);
    }

    #[test]
    fn test_new_account_fields() {
        let account = NewAccount {
            name: String::new(),
            email: "bad".into(),
            password: String::new(),
            role: Role::EMPLOYEE,
        };
        let errors = validate_new_account(&account).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(Field::Email), Some("invalid email"));
    }

    #[test]
    fn test_upload_without_profile() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();

        let errors = validate_upload(None, &path).unwrap_err();
        assert_eq!(errors.get(Field::ProfileId), Some("create a profile first"));
        assert!(validate_upload(Some("p1"), &path).is_ok());
        assert!(validate_upload(Some("p1"), "/definitely/not/here.png").is_err());
    }
}
