//! Command handlers - business logic for processing UI events and network replies

use std::path::PathBuf;

use crate::action::{AsyncActionState, Failure, FailureKind, RequestTicket};
use crate::app::state::ShareProgress;
use crate::app::AppState;
use crate::constants::{
    EMPLOYEE_CREATED_MESSAGE, LOGIN_FAILED_MESSAGE, LOGIN_SUCCESS_MESSAGE,
    PROFILE_CREATED_MESSAGE, PROFILE_CREATE_FAILED_MESSAGE, TASK_CREATED_MESSAGE,
    TASK_DELETED_MESSAGE, TASK_SAVED_MESSAGE, UPLOAD_FAILED_MESSAGE, UPLOAD_SUCCESS_MESSAGE,
};
use crate::error::{ApiError, Field};
use crate::messages::render::Banner;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{ApiCall, ApiOutcome, NetworkCommand, NetworkResponse};
use crate::models::{NewAccount, Role, TaskDraft, TaskStatus};
use crate::validation;

/// Start `state` and build the command for `call`.
///
/// Nothing is sent while `state` is pending. A protected call without a token
/// fails locally as unauthorized.
pub fn dispatch<T>(
    state: &mut AsyncActionState<T>,
    bearer: Option<String>,
    call: ApiCall,
) -> Option<NetworkCommand> {
    let ticket = match state.start() {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::debug!(call = call.name(), error = %e, "ignoring repeated submit");
            return None;
        }
    };
    if call.requires_bearer() && bearer.is_none() {
        tracing::warn!(call = call.name(), "no access token in session");
        state.fail(ticket, Failure::unauthorized());
        return None;
    }
    Some(NetworkCommand::Execute {
        ticket,
        bearer,
        call,
    })
}

/// Fail `state` without a request (client-side validation)
fn reject<T>(state: &mut AsyncActionState<T>, failure: Failure) {
    if let Ok(ticket) = state.start() {
        state.fail(ticket, failure);
    }
}

fn settle<T>(state: &mut AsyncActionState<T>, ticket: RequestTicket, result: Result<T, ApiError>) -> bool {
    match result {
        Ok(data) => state.succeed(ticket, data),
        Err(e) => state.fail(ticket, Failure::from_api(&e)),
    }
}

fn clamp(selected: &mut usize, len: usize) {
    if *selected >= len {
        *selected = len.saturating_sub(1);
    }
}

impl AppState {
    /// Commands to send when the app starts
    pub fn boot(&mut self) -> Vec<NetworkCommand> {
        if self.session.is_logged_in() {
            self.switch_screen(Screen::MyTasks)
        } else {
            Vec::new()
        }
    }

    // ========================
    // Navigation
    // ========================

    /// Jump to a top-level screen, dropping the back stack
    pub fn switch_screen(&mut self, screen: Screen) -> Vec<NetworkCommand> {
        self.history.clear();
        self.go_to(screen)
    }

    /// Drill down, remembering where we came from
    pub fn open_screen(&mut self, screen: Screen) -> Vec<NetworkCommand> {
        self.history.push(self.screen);
        self.go_to(screen)
    }

    pub fn back(&mut self) -> Vec<NetworkCommand> {
        match self.history.pop() {
            Some(previous) => self.go_to(previous),
            None => Vec::new(),
        }
    }

    fn go_to(&mut self, screen: Screen) -> Vec<NetworkCommand> {
        self.leave_screen(self.screen);
        self.screen = screen;
        self.input_mode = InputMode::Normal;
        self.show_help = false;
        self.flash = None;
        self.prepare_screen(screen);
        self.load_screen()
    }

    /// Unmount: drop the screen's action states so late replies are discarded
    fn leave_screen(&mut self, screen: Screen) {
        match screen {
            Screen::Login => {
                self.login.action.reset();
                self.login.form.clear();
            }
            Screen::MyTasks => self.my_tasks.links.reset(),
            Screen::AccountTasks => self.account_tasks.links.reset(),
            Screen::TaskDetail => {
                let view = &mut self.task_detail;
                view.task.reset();
                view.accounts.reset();
                view.delete.reset();
                view.unshare.reset();
            }
            Screen::NewTask | Screen::EditTask => self.task_form.save.reset(),
            Screen::ShareTask => {
                let view = &mut self.share;
                view.candidates.reset();
                view.action.reset();
                view.progress = None;
                view.last_report = None;
                view.chosen.clear();
            }
            Screen::Employees => self.employees.accounts.reset(),
            Screen::CreateEmployee => self.employee_form.action.reset(),
            Screen::Admins => self.admins.accounts.reset(),
            Screen::Profile => {
                let view = &mut self.profile;
                view.profile.reset();
                view.create.reset();
                view.upload.reset();
                view.download.reset();
            }
        }
    }

    fn prepare_screen(&mut self, screen: Screen) {
        match screen {
            Screen::NewTask => {
                self.task_form.form.clear();
                self.task_form.status = TaskStatus::default();
            }
            Screen::CreateEmployee => self.employee_form.form.clear(),
            Screen::MyTasks => self.my_tasks.selected = 0,
            Screen::AccountTasks => self.account_tasks.selected = 0,
            Screen::TaskDetail => self.task_detail.selected = 0,
            Screen::ShareTask => self.share.selected = 0,
            Screen::Employees => self.employees.selected = 0,
            Screen::Admins => self.admins.selected = 0,
            _ => {}
        }
    }

    /// Fetches backing the current screen
    pub fn load_screen(&mut self) -> Vec<NetworkCommand> {
        let bearer = self.bearer();
        let mut cmds = Vec::new();
        match self.screen {
            Screen::MyTasks => {
                cmds.extend(dispatch(&mut self.my_tasks.links, bearer, ApiCall::MyTasks));
            }
            Screen::AccountTasks => {
                if let Some(owner) = &self.account_tasks.owner {
                    let call = ApiCall::AccountTasks {
                        account_id: owner.account_uuid.clone(),
                    };
                    cmds.extend(dispatch(&mut self.account_tasks.links, bearer, call));
                }
            }
            Screen::TaskDetail => {
                if let Some(id) = self.task_detail.task_id.clone() {
                    let view = &mut self.task_detail;
                    cmds.extend(dispatch(
                        &mut view.task,
                        bearer.clone(),
                        ApiCall::FetchTask { id: id.clone() },
                    ));
                    cmds.extend(dispatch(
                        &mut view.accounts,
                        bearer,
                        ApiCall::TaskAccounts { task_id: id },
                    ));
                }
            }
            Screen::ShareTask => {
                cmds.extend(dispatch(&mut self.share.candidates, bearer, ApiCall::ListEmployees));
            }
            Screen::Employees => {
                cmds.extend(dispatch(&mut self.employees.accounts, bearer, ApiCall::ListEmployees));
            }
            Screen::Admins => {
                cmds.extend(dispatch(&mut self.admins.accounts, bearer, ApiCall::ListAdmins));
            }
            Screen::Profile => {
                if let Some(id) = self.session.user_profile_id().map(str::to_string) {
                    cmds.extend(dispatch(&mut self.profile.profile, bearer, ApiCall::FetchProfile { id }));
                }
            }
            Screen::Login | Screen::NewTask | Screen::EditTask | Screen::CreateEmployee => {}
        }
        cmds
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if let Some(form) = self.current_form_mut() {
            form.cursor_position = form.current_input().len();
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.current_form_mut() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.current_form_mut() {
            form.prev_field();
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(form) = self.current_form_mut() {
            form.enter_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(form) = self.current_form_mut() {
            form.delete_char();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(form) = self.current_form_mut() {
            form.move_cursor_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(form) = self.current_form_mut() {
            form.move_cursor_right();
        }
    }

    pub fn cycle_status(&mut self) {
        if matches!(self.screen, Screen::NewTask | Screen::EditTask) && !self.task_form.save.is_pending() {
            self.task_form.status = self.task_form.status.next();
        }
    }

    // ========================
    // Lists
    // ========================

    fn list_cursor(&mut self) -> Option<(&mut usize, usize)> {
        fn len<T>(items: Option<&Vec<T>>) -> usize {
            items.map_or(0, Vec::len)
        }
        match self.screen {
            Screen::MyTasks => Some((&mut self.my_tasks.selected, len(self.my_tasks.links.data()))),
            Screen::AccountTasks => Some((
                &mut self.account_tasks.selected,
                len(self.account_tasks.links.data()),
            )),
            Screen::TaskDetail => Some((
                &mut self.task_detail.selected,
                len(self.task_detail.accounts.data()),
            )),
            Screen::ShareTask => Some((&mut self.share.selected, len(self.share.candidates.data()))),
            Screen::Employees => Some((&mut self.employees.selected, len(self.employees.accounts.data()))),
            Screen::Admins => Some((&mut self.admins.selected, len(self.admins.accounts.data()))),
            _ => None,
        }
    }

    pub fn select_next(&mut self) {
        if let Some((selected, len)) = self.list_cursor() {
            if len > 0 {
                *selected = (*selected + 1) % len;
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some((selected, len)) = self.list_cursor() {
            if len > 0 {
                *selected = selected.checked_sub(1).unwrap_or(len - 1);
            }
        }
    }

    /// Enter on a list row
    pub fn open_selected(&mut self) -> Vec<NetworkCommand> {
        match self.screen {
            Screen::MyTasks | Screen::AccountTasks => {
                let view = if self.screen == Screen::MyTasks {
                    &self.my_tasks
                } else {
                    &self.account_tasks
                };
                let task_id = view
                    .links
                    .data()
                    .and_then(|links| links.get(view.selected))
                    .map(|link| link.task_uuid.clone());
                match task_id {
                    Some(id) => {
                        self.task_detail.task_id = Some(id);
                        self.open_screen(Screen::TaskDetail)
                    }
                    None => Vec::new(),
                }
            }
            Screen::Employees => {
                let account = self
                    .employees
                    .accounts
                    .data()
                    .and_then(|accounts| accounts.get(self.employees.selected))
                    .cloned();
                match account {
                    Some(account) => {
                        self.account_tasks.owner = Some(account);
                        self.open_screen(Screen::AccountTasks)
                    }
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    pub fn toggle_selection(&mut self) {
        if self.screen != Screen::ShareTask || self.share.action.is_pending() {
            return;
        }
        let account_id = self
            .share
            .candidates
            .data()
            .and_then(|accounts| accounts.get(self.share.selected))
            .map(|a| a.account_uuid.clone());
        if let Some(id) = account_id {
            if !self.share.chosen.remove(&id) {
                self.share.chosen.insert(id);
            }
        }
    }

    // ========================
    // Item actions
    // ========================

    pub fn new_item(&mut self) -> Vec<NetworkCommand> {
        match self.screen {
            Screen::MyTasks => self.open_screen(Screen::NewTask),
            Screen::Employees => self.open_screen(Screen::CreateEmployee),
            _ => Vec::new(),
        }
    }

    /// Open the edit form prefilled from the loaded task
    pub fn edit_item(&mut self) -> Vec<NetworkCommand> {
        if self.screen != Screen::TaskDetail {
            return Vec::new();
        }
        let Some(draft) = self.task_detail.task.data().map(TaskDraft::from) else {
            return Vec::new();
        };
        let form = &mut self.task_form.form;
        form.clear();
        form.set_value(Field::Title, draft.title);
        form.set_value(Field::Description, draft.description);
        form.focused = 0;
        form.cursor_position = form.current_input().len();
        self.task_form.status = draft.status;
        self.open_screen(Screen::EditTask)
    }

    pub fn delete_item(&mut self) -> Vec<NetworkCommand> {
        if self.screen != Screen::TaskDetail {
            return Vec::new();
        }
        let Some(id) = self.task_detail.task_id.clone() else {
            return Vec::new();
        };
        let bearer = self.bearer();
        dispatch(&mut self.task_detail.delete, bearer, ApiCall::DeleteTask { id })
            .into_iter()
            .collect()
    }

    pub fn share_item(&mut self) -> Vec<NetworkCommand> {
        if self.screen != Screen::TaskDetail {
            return Vec::new();
        }
        match self.task_detail.task_id.clone() {
            Some(id) => {
                self.share.task_id = Some(id);
                self.open_screen(Screen::ShareTask)
            }
            None => Vec::new(),
        }
    }

    /// Remove the selected account from the task's share list
    pub fn unshare_item(&mut self) -> Vec<NetworkCommand> {
        if self.screen != Screen::TaskDetail {
            return Vec::new();
        }
        let view = &mut self.task_detail;
        let (Some(task_id), Some(link)) = (
            view.task_id.clone(),
            view.accounts.data().and_then(|links| links.get(view.selected)).cloned(),
        ) else {
            return Vec::new();
        };
        let bearer = self.bearer();
        let call = ApiCall::UnshareTask {
            task_id,
            account_id: link.account_uuid,
        };
        dispatch(&mut self.task_detail.unshare, bearer, call)
            .into_iter()
            .collect()
    }

    pub fn download_image(&mut self) -> Vec<NetworkCommand> {
        if self.screen != Screen::Profile {
            return Vec::new();
        }
        let Some(id) = self.session.user_profile_id().map(str::to_string) else {
            reject(
                &mut self.profile.download,
                Failure::new(FailureKind::Validation, "create a profile first"),
            );
            return Vec::new();
        };
        let call = ApiCall::DownloadProfileImage {
            id,
            dest: self.download_dir.clone(),
        };
        dispatch(&mut self.profile.download, None, call)
            .into_iter()
            .collect()
    }

    // ========================
    // Submit
    // ========================

    pub fn submit(&mut self) -> Vec<NetworkCommand> {
        self.stop_editing();
        match self.screen {
            Screen::Login => self.submit_login(),
            Screen::NewTask | Screen::EditTask => self.submit_task(),
            Screen::CreateEmployee => self.submit_employee(),
            Screen::Profile => self.submit_profile(),
            Screen::ShareTask => self.submit_share(),
            _ => Vec::new(),
        }
    }

    fn submit_login(&mut self) -> Vec<NetworkCommand> {
        let form = &mut self.login.form;
        let email = form.value(Field::Email).to_string();
        let password = form.value(Field::Password).to_string();

        // A malformed email is flagged but does not block the request
        form.clear_errors();
        form.set_error(Field::Email, validation::check_login_email(&email));

        dispatch(
            &mut self.login.action,
            None,
            ApiCall::Authenticate { email, password },
        )
        .into_iter()
        .collect()
    }

    fn submit_task(&mut self) -> Vec<NetworkCommand> {
        if self.task_form.save.is_pending() {
            return Vec::new();
        }
        let form = &mut self.task_form.form;
        let draft = TaskDraft {
            title: form.value(Field::Title).to_string(),
            description: form.value(Field::Description).to_string(),
            status: self.task_form.status,
        };
        if let Err(errors) = validation::validate_task(&draft) {
            form.apply_errors(&errors);
            reject(&mut self.task_form.save, Failure::validation(&errors));
            return Vec::new();
        }
        form.clear_errors();

        let call = match self.screen {
            Screen::EditTask => match self.task_detail.task_id.clone() {
                Some(id) => ApiCall::UpdateTask { id, draft },
                None => return Vec::new(),
            },
            _ => ApiCall::CreateTask(draft),
        };
        let bearer = self.bearer();
        dispatch(&mut self.task_form.save, bearer, call)
            .into_iter()
            .collect()
    }

    fn submit_employee(&mut self) -> Vec<NetworkCommand> {
        if self.employee_form.action.is_pending() {
            return Vec::new();
        }
        let form = &mut self.employee_form.form;
        let account = NewAccount {
            name: form.value(Field::Name).to_string(),
            email: form.value(Field::Email).to_string(),
            password: form.value(Field::Password).to_string(),
            role: Role::EMPLOYEE,
        };
        if let Err(errors) = validation::validate_new_account(&account) {
            form.apply_errors(&errors);
            reject(&mut self.employee_form.action, Failure::validation(&errors));
            return Vec::new();
        }
        form.clear_errors();

        let bearer = self.bearer();
        dispatch(&mut self.employee_form.action, bearer, ApiCall::CreateEmployee(account))
            .into_iter()
            .collect()
    }

    /// Username field creates a profile, image field uploads
    fn submit_profile(&mut self) -> Vec<NetworkCommand> {
        match self.profile.form.focused_field() {
            Some(Field::ImagePath) => self.submit_upload(),
            _ => self.submit_create_profile(),
        }
    }

    fn submit_create_profile(&mut self) -> Vec<NetworkCommand> {
        if self.profile.create.is_pending() {
            return Vec::new();
        }
        let username = self.profile.form.value(Field::Username).trim().to_string();
        if let Err(errors) = validation::validate_username(&username) {
            self.profile.form.apply_errors(&errors);
            reject(&mut self.profile.create, Failure::validation(&errors));
            return Vec::new();
        }
        self.profile.form.clear_errors();
        dispatch(&mut self.profile.create, None, ApiCall::CreateProfile { username })
            .into_iter()
            .collect()
    }

    fn submit_upload(&mut self) -> Vec<NetworkCommand> {
        if self.profile.upload.is_pending() {
            return Vec::new();
        }
        let path = self.profile.form.value(Field::ImagePath).trim().to_string();
        let profile_id = self.session.user_profile_id().map(str::to_string);

        if let Err(errors) = validation::validate_upload(profile_id.as_deref(), &path) {
            self.profile.form.apply_errors(&errors);
            let failure = match errors.get(Field::ProfileId) {
                Some(message) => Failure::validation(&errors).with_message(message),
                None => Failure::validation(&errors),
            };
            reject(&mut self.profile.upload, failure);
            return Vec::new();
        }
        self.profile.form.clear_errors();

        let Some(id) = profile_id else {
            return Vec::new();
        };
        let call = ApiCall::UploadProfileImage {
            id,
            path: PathBuf::from(path),
        };
        dispatch(&mut self.profile.upload, None, call)
            .into_iter()
            .collect()
    }

    /// One request per selected account, all under the same ticket
    fn submit_share(&mut self) -> Vec<NetworkCommand> {
        let Some(task_id) = self.share.task_id.clone() else {
            return Vec::new();
        };
        if self.share.action.is_pending() {
            return Vec::new();
        }
        if self.share.chosen.is_empty() {
            reject(
                &mut self.share.action,
                Failure::new(FailureKind::Validation, "select at least one employee"),
            );
            return Vec::new();
        }

        let bearer = self.bearer();
        let Ok(ticket) = self.share.action.start() else {
            return Vec::new();
        };
        if bearer.is_none() {
            self.share.action.fail(ticket, Failure::unauthorized());
            return Vec::new();
        }

        self.share.last_report = None;
        self.share.progress = Some(ShareProgress {
            ticket,
            expected: self.share.chosen.len(),
            report: Default::default(),
            last_failure: None,
        });
        tracing::info!(%ticket, accounts = self.share.chosen.len(), "sharing task");

        self.share
            .chosen
            .iter()
            .map(|account_id| NetworkCommand::Execute {
                ticket,
                bearer: bearer.clone(),
                call: ApiCall::ShareTask {
                    task_id: task_id.clone(),
                    account_id: account_id.clone(),
                },
            })
            .collect()
    }

    // ========================
    // Session
    // ========================

    pub fn logout(&mut self) -> Vec<NetworkCommand> {
        if let Err(e) = self.session.logout() {
            tracing::warn!(error = %e, "failed to persist logout");
        }
        let cmds = self.switch_screen(Screen::Login);
        self.flash = Some(Banner::info("Logged out."));
        cmds
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Network responses
    // ========================

    /// Apply one reply; replies for stale tickets leave the state untouched
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        let NetworkResponse { ticket, outcome } = response;
        let bearer = self.bearer();

        match outcome {
            ApiOutcome::Authenticated(result) => {
                if !self.login.action.is_awaiting(ticket) {
                    return Vec::new();
                }
                match result {
                    Ok(token) => {
                        if let Err(e) = self.session.set_access_token(token) {
                            tracing::warn!(error = %e, "failed to persist session");
                        }
                        self.login.action.succeed(ticket, ());
                        let cmds = self.switch_screen(Screen::MyTasks);
                        self.flash = Some(Banner::success(LOGIN_SUCCESS_MESSAGE));
                        return cmds;
                    }
                    Err(e) => {
                        tracing::info!(error = %e, "login rejected");
                        let failure = Failure::from_api(&e).with_message(LOGIN_FAILED_MESSAGE);
                        self.login.action.fail(ticket, failure);
                    }
                }
            }

            ApiOutcome::Profile(result) => {
                settle(&mut self.profile.profile, ticket, result);
            }
            ApiOutcome::ProfileCreated(result) => {
                if !self.profile.create.is_awaiting(ticket) {
                    return Vec::new();
                }
                match result {
                    Ok(profile) => {
                        if let Err(e) = self.session.set_user_profile_id(profile.id.clone()) {
                            tracing::warn!(error = %e, "failed to persist profile id");
                        }
                        let id = profile.id.clone();
                        self.profile.create.succeed_with(ticket, profile, PROFILE_CREATED_MESSAGE);
                        self.profile.form.set_value(Field::Username, "");
                        // Supersede any fetch still in flight for the previous profile
                        self.profile.profile.reset();
                        return dispatch(&mut self.profile.profile, bearer, ApiCall::FetchProfile { id })
                            .into_iter()
                            .collect();
                    }
                    Err(e) => {
                        let failure = Failure::from_api(&e).with_message(PROFILE_CREATE_FAILED_MESSAGE);
                        self.profile.create.fail(ticket, failure);
                    }
                }
            }
            ApiOutcome::ImageUploaded(result) => {
                if !self.profile.upload.is_awaiting(ticket) {
                    return Vec::new();
                }
                match result {
                    Ok(()) => {
                        self.profile.upload.succeed_with(ticket, (), UPLOAD_SUCCESS_MESSAGE);
                        // The image link changes with the upload
                        if let Some(id) = self.session.user_profile_id().map(str::to_string) {
                            self.profile.profile.reset();
                            return dispatch(&mut self.profile.profile, bearer, ApiCall::FetchProfile { id })
                                .into_iter()
                                .collect();
                        }
                    }
                    Err(e) => {
                        let failure = Failure::from_api(&e).with_message(UPLOAD_FAILED_MESSAGE);
                        self.profile.upload.fail(ticket, failure);
                    }
                }
            }
            ApiOutcome::ImageDownloaded(result) => match result {
                Ok(saved) => {
                    let message = format!("image saved to {}", saved.path.display());
                    self.profile.download.succeed_with(ticket, saved, message);
                }
                Err(e) => {
                    self.profile.download.fail(ticket, Failure::from_api(&e));
                }
            },

            ApiOutcome::Admins(result) => {
                if settle(&mut self.admins.accounts, ticket, result) {
                    let len = self.admins.accounts.data().map_or(0, Vec::len);
                    clamp(&mut self.admins.selected, len);
                }
            }
            ApiOutcome::Employees(result) => {
                if self.employees.accounts.is_awaiting(ticket) {
                    settle(&mut self.employees.accounts, ticket, result);
                    let len = self.employees.accounts.data().map_or(0, Vec::len);
                    clamp(&mut self.employees.selected, len);
                } else if settle(&mut self.share.candidates, ticket, result) {
                    let len = self.share.candidates.data().map_or(0, Vec::len);
                    clamp(&mut self.share.selected, len);
                }
            }
            ApiOutcome::EmployeeCreated(result) => match result {
                Ok(account) => {
                    if self.employee_form.action.succeed_with(ticket, account, EMPLOYEE_CREATED_MESSAGE) {
                        self.employee_form.form.clear();
                    }
                }
                Err(e) => {
                    self.employee_form.action.fail(ticket, Failure::from_api(&e));
                }
            },

            ApiOutcome::Task(result) => {
                settle(&mut self.task_detail.task, ticket, result);
            }
            ApiOutcome::TaskCreated(result) => match result {
                Ok(task) => {
                    if self.task_form.save.succeed_with(ticket, task, TASK_CREATED_MESSAGE) {
                        self.task_form.form.clear();
                        self.task_form.status = TaskStatus::default();
                    }
                }
                Err(e) => {
                    self.task_form.save.fail(ticket, Failure::from_api(&e));
                }
            },
            ApiOutcome::TaskUpdated(result) => match result {
                Ok(task) => {
                    self.task_form.save.succeed_with(ticket, task, TASK_SAVED_MESSAGE);
                }
                Err(e) => {
                    self.task_form.save.fail(ticket, Failure::from_api(&e));
                }
            },
            ApiOutcome::TaskDeleted(result) => {
                if !self.task_detail.delete.is_awaiting(ticket) {
                    return Vec::new();
                }
                match result {
                    Ok(()) => {
                        self.task_detail.delete.succeed(ticket, ());
                        self.task_detail.task_id = None;
                        let cmds = self.switch_screen(Screen::MyTasks);
                        self.flash = Some(Banner::success(TASK_DELETED_MESSAGE));
                        return cmds;
                    }
                    Err(e) => {
                        self.task_detail.delete.fail(ticket, Failure::from_api(&e));
                    }
                }
            }

            ApiOutcome::Links(result) => {
                let view = if self.my_tasks.links.is_awaiting(ticket) {
                    &mut self.my_tasks
                } else {
                    &mut self.account_tasks
                };
                if settle(&mut view.links, ticket, result) {
                    let len = view.links.data().map_or(0, Vec::len);
                    clamp(&mut view.selected, len);
                }
            }
            ApiOutcome::TaskAccounts(result) => {
                let view = &mut self.task_detail;
                if settle(&mut view.accounts, ticket, result) {
                    let len = view.accounts.data().map_or(0, Vec::len);
                    clamp(&mut view.selected, len);
                }
            }
            ApiOutcome::Shared { account_id, result } => {
                self.record_share(ticket, account_id, result);
            }
            ApiOutcome::Unshared { account_id, result } => {
                let view = &mut self.task_detail;
                if !view.unshare.is_awaiting(ticket) {
                    return Vec::new();
                }
                match result {
                    Ok(()) => {
                        let mut name = account_id.clone();
                        if let Some(links) = view.accounts.data_mut() {
                            if let Some(pos) = links.iter().position(|l| l.account_uuid == account_id) {
                                name = links.remove(pos).account_name;
                            }
                            clamp(&mut view.selected, links.len());
                        }
                        view.unshare
                            .succeed_with(ticket, account_id, format!("Task unshared from {}.", name));
                    }
                    Err(e) => {
                        view.unshare.fail(ticket, Failure::from_api(&e));
                    }
                }
            }
        }
        Vec::new()
    }

    /// Fold one share outcome into the running report, settling once all arrived
    fn record_share(&mut self, ticket: RequestTicket, account_id: String, result: Result<(), ApiError>) {
        if !self.share.action.is_awaiting(ticket) {
            tracing::debug!(%ticket, "discarding stale share reply");
            return;
        }
        let Some(progress) = self.share.progress.as_mut().filter(|p| p.ticket == ticket) else {
            return;
        };
        match result {
            Ok(()) => progress.report.linked.push(account_id),
            Err(e) => {
                let failure = Failure::from_api(&e);
                tracing::warn!(account = %account_id, error = %e, "share request failed");
                progress.report.failed.push((account_id, failure.message.clone()));
                progress.last_failure = Some(failure);
            }
        }
        if progress.report.settled() < progress.expected {
            return;
        }

        let Some(ShareProgress {
            report, last_failure, ..
        }) = self.share.progress.take()
        else {
            return;
        };
        // Failed accounts stay selected for a retry
        self.share.chosen.retain(|id| !report.is_linked(id));
        self.share.last_report = Some(report.clone());
        match last_failure {
            Some(failure) => {
                self.share.action.fail(ticket, failure);
            }
            None => {
                let message = format!("Task shared with {} account(s).", report.linked.len());
                self.share.action.succeed_with(ticket, report, message);
            }
        }
    }
}
