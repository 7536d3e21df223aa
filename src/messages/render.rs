//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, Screen};
use crate::models::TaskStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

/// One-line feedback above the screen content
#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Banner { kind: BannerKind::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Banner { kind: BannerKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Banner { kind: BannerKind::Error, text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    pub label: String,
    /// Already masked for secret fields
    pub value: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub focused: usize,
    /// Column within the focused field, in characters
    pub cursor_position: usize,
    /// Shown under the fields on task forms
    pub status: Option<TaskStatus>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListRow {
    pub text: String,
    /// Some(checked) on selectable rows
    pub checked: Option<bool>,
}

impl ListRow {
    pub fn plain(text: impl Into<String>) -> Self {
        ListRow { text: text.into(), checked: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListView {
    pub title: String,
    pub rows: Vec<ListRow>,
    pub selected: usize,
    pub empty_text: String,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub is_loading: bool,
    pub banner: Option<Banner>,

    pub details: Vec<(String, String)>,
    pub form: Option<FormView>,
    pub list: Option<ListView>,

    // Status bar
    pub logged_in: bool,
    pub base_url: String,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screen: Screen::Login,
            input_mode: InputMode::Normal,
            show_help: false,
            is_loading: false,
            banner: None,
            details: Vec::new(),
            form: None,
            list: None,
            logged_in: false,
            base_url: String::new(),
        }
    }
}
