//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Login,
    MyTasks,
    TaskDetail,
    NewTask,
    EditTask,
    ShareTask,
    Employees,
    AccountTasks,
    CreateEmployee,
    Admins,
    Profile,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::MyTasks => "My Tasks",
            Screen::TaskDetail => "Task",
            Screen::NewTask => "New Task",
            Screen::EditTask => "Edit Task",
            Screen::ShareTask => "Share Task",
            Screen::Employees => "Employees",
            Screen::AccountTasks => "Account Tasks",
            Screen::CreateEmployee => "New Employee",
            Screen::Admins => "Admins",
            Screen::Profile => "Profile",
        }
    }

    /// Screens built around a text form
    pub fn is_form(&self) -> bool {
        matches!(
            self,
            Screen::Login | Screen::NewTask | Screen::EditTask | Screen::CreateEmployee | Screen::Profile
        )
    }

    pub fn hints(&self) -> &'static str {
        match self {
            Screen::Login => " Tab:field | e:edit | Enter:login | ?:help | q:quit ",
            Screen::MyTasks => " ↑/↓:select | Enter:open | n:new | r:reload | x:logout | ?:help ",
            Screen::TaskDetail => " e:edit | d:delete | s:share | ↑/↓ u:unshare | r:reload | Esc:back ",
            Screen::NewTask | Screen::EditTask => " Tab:field | e:edit | t:status | Enter:save | Esc:back ",
            Screen::ShareTask => " ↑/↓:select | Space:toggle | Enter:share | Esc:back ",
            Screen::Employees => " ↑/↓:select | Enter:tasks | n:new employee | r:reload ",
            Screen::AccountTasks => " ↑/↓:select | Enter:open | r:reload | Esc:back ",
            Screen::CreateEmployee => " Tab:field | e:edit | Enter:create | Esc:back ",
            Screen::Admins => " ↑/↓:select | r:reload ",
            Screen::Profile => " Tab:field | e:edit | Enter:create/upload | g:download | r:reload ",
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    SwitchScreen(Screen),
    Back,

    // Form editing
    NextField,
    PrevField,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    CycleStatus,
    Submit,

    // Lists
    SelectNext,
    SelectPrev,
    Open,
    ToggleSelection,

    // Item actions
    NewItem,
    EditItem,
    DeleteItem,
    ShareItem,
    UnshareItem,
    DownloadImage,
    Reload,

    // Session
    Logout,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Editing => editing_keys(key),
        InputMode::Normal => {
            // Top-level screen switching
            match key.code {
                KeyCode::Char('0') => return Some(UiEvent::SwitchScreen(Screen::Login)),
                KeyCode::Char('1') => return Some(UiEvent::SwitchScreen(Screen::MyTasks)),
                KeyCode::Char('2') => return Some(UiEvent::SwitchScreen(Screen::Employees)),
                KeyCode::Char('3') => return Some(UiEvent::SwitchScreen(Screen::Admins)),
                KeyCode::Char('4') => return Some(UiEvent::SwitchScreen(Screen::Profile)),
                KeyCode::Char('q') => return Some(UiEvent::Quit),
                KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
                KeyCode::Char('x') => return Some(UiEvent::Logout),
                KeyCode::Char('r') => return Some(UiEvent::Reload),
                KeyCode::Esc => return Some(UiEvent::Back),
                _ => {}
            }
            if screen.is_form() {
                form_keys(key, screen)
            } else {
                list_keys(key, screen)
            }
        }
    }
}

fn editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Tab => Some(UiEvent::NextField),
        KeyCode::BackTab => Some(UiEvent::PrevField),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn form_keys(key: KeyEvent, screen: Screen) -> Option<UiEvent> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Char('e') => Some(UiEvent::StartEditing),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Char('t') if matches!(screen, Screen::NewTask | Screen::EditTask) => {
            Some(UiEvent::CycleStatus)
        }
        KeyCode::Char('g') if screen == Screen::Profile => Some(UiEvent::DownloadImage),
        _ => None,
    }
}

fn list_keys(key: KeyEvent, screen: Screen) -> Option<UiEvent> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Enter => match screen {
            Screen::ShareTask => Some(UiEvent::Submit),
            _ => Some(UiEvent::Open),
        },
        KeyCode::Char(' ') if screen == Screen::ShareTask => Some(UiEvent::ToggleSelection),
        KeyCode::Char('n') if matches!(screen, Screen::MyTasks | Screen::Employees) => {
            Some(UiEvent::NewItem)
        }
        KeyCode::Char('e') if screen == Screen::TaskDetail => Some(UiEvent::EditItem),
        KeyCode::Char('d') if screen == Screen::TaskDetail => Some(UiEvent::DeleteItem),
        KeyCode::Char('s') if screen == Screen::TaskDetail => Some(UiEvent::ShareItem),
        KeyCode::Char('u') if screen == Screen::TaskDetail => Some(UiEvent::UnshareItem),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_submits_forms_and_opens_lists() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), Screen::NewTask, InputMode::Normal, false),
            Some(UiEvent::Submit)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), Screen::MyTasks, InputMode::Normal, false),
            Some(UiEvent::Open)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), Screen::ShareTask, InputMode::Normal, false),
            Some(UiEvent::Submit)
        );
    }

    #[test]
    fn test_editing_captures_digits() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('1')), Screen::Login, InputMode::Editing, false),
            Some(UiEvent::CharInput('1'))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('1')), Screen::Login, InputMode::Normal, false),
            Some(UiEvent::SwitchScreen(Screen::MyTasks))
        );
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), Screen::MyTasks, InputMode::Normal, true),
            Some(UiEvent::CloseHelp)
        );
    }
}
