//! App state - pure data structure with no I/O logic

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::action::{AsyncActionState, Failure, RequestTicket};
use crate::app::form::Form;
use crate::messages::render::{Banner, BannerKind, FieldView, FormView, ListRow, ListView};
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;
use crate::models::{Account, AccountTaskLink, SavedImage, ShareReport, Task, TaskStatus, UserProfile};
use crate::session::SessionStore;

pub struct LoginView {
    pub form: Form,
    pub action: AsyncActionState<()>,
}

/// A list of account/task links ("my tasks" or one account's tasks)
#[derive(Default)]
pub struct TaskListView {
    pub owner: Option<Account>,
    pub links: AsyncActionState<Vec<AccountTaskLink>>,
    pub selected: usize,
}

#[derive(Default)]
pub struct TaskDetailView {
    pub task_id: Option<String>,
    pub task: AsyncActionState<Task>,
    pub accounts: AsyncActionState<Vec<AccountTaskLink>>,
    pub selected: usize,
    pub delete: AsyncActionState<()>,
    pub unshare: AsyncActionState<String>,
}

/// Shared by the new-task and edit-task screens
pub struct TaskFormView {
    pub form: Form,
    pub status: TaskStatus,
    pub save: AsyncActionState<Task>,
}

/// Outcomes gathered from one share fan-out
#[derive(Debug, Clone)]
pub struct ShareProgress {
    pub ticket: RequestTicket,
    pub expected: usize,
    pub report: ShareReport,
    pub last_failure: Option<Failure>,
}

#[derive(Default)]
pub struct ShareView {
    pub task_id: Option<String>,
    pub candidates: AsyncActionState<Vec<Account>>,
    pub selected: usize,
    pub chosen: BTreeSet<String>,
    pub action: AsyncActionState<ShareReport>,
    pub progress: Option<ShareProgress>,
    pub last_report: Option<ShareReport>,
}

#[derive(Default)]
pub struct AccountListView {
    pub accounts: AsyncActionState<Vec<Account>>,
    pub selected: usize,
}

pub struct EmployeeFormView {
    pub form: Form,
    pub action: AsyncActionState<Account>,
}

pub struct ProfileView {
    pub form: Form,
    pub profile: AsyncActionState<UserProfile>,
    pub create: AsyncActionState<UserProfile>,
    pub upload: AsyncActionState<()>,
    pub download: AsyncActionState<SavedImage>,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub screen: Screen,
    pub history: Vec<Screen>,
    pub input_mode: InputMode,
    pub show_help: bool,
    /// Feedback that outlives a screen change (login, delete, logout)
    pub flash: Option<Banner>,

    pub session: SessionStore,
    pub download_dir: PathBuf,
    pub base_url: String,

    pub login: LoginView,
    pub my_tasks: TaskListView,
    pub task_detail: TaskDetailView,
    pub task_form: TaskFormView,
    pub share: ShareView,
    pub employees: AccountListView,
    pub account_tasks: TaskListView,
    pub employee_form: EmployeeFormView,
    pub admins: AccountListView,
    pub profile: ProfileView,
}

impl AppState {
    pub fn new(session: SessionStore, download_dir: PathBuf, base_url: impl Into<String>) -> Self {
        AppState {
            screen: Screen::Login,
            history: Vec::new(),
            input_mode: InputMode::Normal,
            show_help: false,
            flash: None,
            session,
            download_dir,
            base_url: base_url.into(),
            login: LoginView {
                form: Form::login(),
                action: AsyncActionState::new(),
            },
            my_tasks: TaskListView::default(),
            task_detail: TaskDetailView::default(),
            task_form: TaskFormView {
                form: Form::task(),
                status: TaskStatus::default(),
                save: AsyncActionState::new(),
            },
            share: ShareView::default(),
            employees: AccountListView::default(),
            account_tasks: TaskListView::default(),
            employee_form: EmployeeFormView {
                form: Form::employee(),
                action: AsyncActionState::new(),
            },
            admins: AccountListView::default(),
            profile: ProfileView {
                form: Form::profile(),
                profile: AsyncActionState::new(),
                create: AsyncActionState::new(),
                upload: AsyncActionState::new(),
                download: AsyncActionState::new(),
            },
        }
    }

    /// Token snapshot for an outgoing command
    pub fn bearer(&self) -> Option<String> {
        self.session.access_token().map(str::to_string)
    }

    /// Form of the current screen, if it has one
    pub fn current_form_mut(&mut self) -> Option<&mut Form> {
        match self.screen {
            Screen::Login => Some(&mut self.login.form),
            Screen::NewTask | Screen::EditTask => Some(&mut self.task_form.form),
            Screen::CreateEmployee => Some(&mut self.employee_form.form),
            Screen::Profile => Some(&mut self.profile.form),
            _ => None,
        }
    }

    fn current_form(&self) -> Option<&Form> {
        match self.screen {
            Screen::Login => Some(&self.login.form),
            Screen::NewTask | Screen::EditTask => Some(&self.task_form.form),
            Screen::CreateEmployee => Some(&self.employee_form.form),
            Screen::Profile => Some(&self.profile.form),
            _ => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let mut feedback: Vec<Option<Banner>> = Vec::new();
        let mut details = Vec::new();
        let mut list = None;

        match self.screen {
            Screen::Login => feedback.push(banner_of(&self.login.action)),
            Screen::MyTasks => {
                feedback.push(banner_of(&self.my_tasks.links));
                list = Some(link_list("Tasks", &self.my_tasks));
            }
            Screen::AccountTasks => {
                feedback.push(banner_of(&self.account_tasks.links));
                if let Some(owner) = &self.account_tasks.owner {
                    details.push(("Account".to_string(), format!("{} <{}>", owner.name, owner.email)));
                }
                list = Some(link_list("Tasks", &self.account_tasks));
            }
            Screen::TaskDetail => {
                let view = &self.task_detail;
                feedback.extend([
                    banner_of(&view.task),
                    banner_of(&view.accounts),
                    banner_of(&view.delete),
                    banner_of(&view.unshare),
                ]);
                if let Some(task) = view.task.data() {
                    details.push(("Title".to_string(), task.title.clone()));
                    details.push(("Description".to_string(), task.description.clone()));
                    details.push(("Status".to_string(), task.task_status.as_str().to_string()));
                }
                if let Some(id) = &view.task_id {
                    details.push(("Id".to_string(), id.clone()));
                }
                let rows = view
                    .accounts
                    .data()
                    .map(|links| links.iter().map(|l| ListRow::plain(l.account_name.clone())).collect())
                    .unwrap_or_default();
                list = Some(ListView {
                    title: "Shared with".to_string(),
                    rows,
                    selected: view.selected,
                    empty_text: "Not shared with anyone.".to_string(),
                });
            }
            Screen::NewTask | Screen::EditTask => feedback.push(banner_of(&self.task_form.save)),
            Screen::ShareTask => {
                let view = &self.share;
                feedback.extend([banner_of(&view.candidates), banner_of(&view.action)]);
                if let Some(id) = &view.task_id {
                    details.push(("Task".to_string(), id.clone()));
                }
                if let Some(report) = &view.last_report {
                    let name_of = |id: &str| {
                        view.candidates
                            .data()
                            .and_then(|accounts| accounts.iter().find(|a| a.account_uuid == id))
                            .map_or_else(|| id.to_string(), |a| a.name.clone())
                    };
                    if !report.linked.is_empty() {
                        let names: Vec<String> = report.linked.iter().map(|id| name_of(id)).collect();
                        details.push(("Linked".to_string(), names.join(", ")));
                    }
                    for (account, error) in &report.failed {
                        details.push((format!("Failed {}", name_of(account)), error.clone()));
                    }
                }
                let rows = view
                    .candidates
                    .data()
                    .map(|accounts| {
                        accounts
                            .iter()
                            .map(|a| ListRow {
                                text: format!("{} <{}>", a.name, a.email),
                                checked: Some(view.chosen.contains(&a.account_uuid)),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                list = Some(ListView {
                    title: "Select employees".to_string(),
                    rows,
                    selected: view.selected,
                    empty_text: "No employees.".to_string(),
                });
            }
            Screen::Employees => {
                feedback.push(banner_of(&self.employees.accounts));
                list = Some(account_list("Employees", &self.employees));
            }
            Screen::Admins => {
                feedback.push(banner_of(&self.admins.accounts));
                list = Some(account_list("Admins", &self.admins));
            }
            Screen::CreateEmployee => feedback.push(banner_of(&self.employee_form.action)),
            Screen::Profile => {
                let view = &self.profile;
                feedback.extend([
                    banner_of(&view.profile),
                    banner_of(&view.create),
                    banner_of(&view.upload),
                    banner_of(&view.download),
                ]);
                if let Some(profile) = view.profile.data() {
                    details.push(("Profile".to_string(), profile.id.clone()));
                    details.push(("Username".to_string(), profile.username.clone()));
                    if let Some(link) = &profile.user_profile_image_link {
                        details.push(("Image".to_string(), link.clone()));
                    }
                } else if let Some(id) = self.session.user_profile_id() {
                    details.push(("Profile".to_string(), id.to_string()));
                }
                if let Some(saved) = view.download.data() {
                    details.push((
                        "Downloaded".to_string(),
                        format!("{} ({} bytes)", saved.path.display(), saved.bytes),
                    ));
                }
            }
        }

        let is_loading = feedback
            .iter()
            .flatten()
            .any(|b| b.kind == BannerKind::Info);

        RenderState {
            screen: self.screen,
            input_mode: self.input_mode,
            show_help: self.show_help,
            is_loading,
            banner: pick_banner(feedback).or_else(|| self.flash.clone()),
            details,
            form: self.current_form().map(|f| self.form_view(f)),
            list,
            logged_in: self.session.is_logged_in(),
            base_url: self.base_url.clone(),
        }
    }

    fn form_view(&self, form: &Form) -> FormView {
        let status = matches!(self.screen, Screen::NewTask | Screen::EditTask).then_some(self.task_form.status);
        FormView {
            fields: form
                .fields
                .iter()
                .map(|f| FieldView {
                    label: f.label.to_string(),
                    value: if f.secret {
                        "*".repeat(f.value.chars().count())
                    } else {
                        f.value.clone()
                    },
                    error: f.error.clone(),
                })
                .collect(),
            focused: form.focused,
            cursor_position: form
                .current_input()
                .get(..form.cursor_position)
                .map_or(0, |before| before.chars().count()),
            status,
        }
    }
}

/// Banner for one action: loading, error, or success message
pub fn banner_of<T>(state: &AsyncActionState<T>) -> Option<Banner> {
    match state {
        AsyncActionState::Idle => None,
        AsyncActionState::Pending { .. } => Some(Banner::info("Loading...")),
        AsyncActionState::Succeeded { message, .. } => message.as_ref().map(Banner::success),
        AsyncActionState::Failed { failure } => Some(Banner::error(failure.message.clone())),
    }
}

/// Errors win over loading, loading over success
fn pick_banner(candidates: Vec<Option<Banner>>) -> Option<Banner> {
    let banners: Vec<Banner> = candidates.into_iter().flatten().collect();
    [BannerKind::Error, BannerKind::Info, BannerKind::Success]
        .iter()
        .find_map(|kind| banners.iter().find(|b| b.kind == *kind).cloned())
}

fn link_list(title: &str, view: &TaskListView) -> ListView {
    let rows = view
        .links
        .data()
        .map(|links| links.iter().map(|l| ListRow::plain(l.task_title.clone())).collect())
        .unwrap_or_default();
    ListView {
        title: title.to_string(),
        rows,
        selected: view.selected,
        empty_text: "No tasks.".to_string(),
    }
}

fn account_list(title: &str, view: &AccountListView) -> ListView {
    let rows = view
        .accounts
        .data()
        .map(|accounts| {
            accounts
                .iter()
                .map(|a| ListRow::plain(format!("{} <{}> {}", a.name, a.email, a.role.as_str())))
                .collect()
        })
        .unwrap_or_default();
    ListView {
        title: title.to_string(),
        rows,
        selected: view.selected,
        empty_text: "No accounts.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(SessionStore::in_memory(), PathBuf::from("/tmp"), "http://test")
    }

    #[test]
    fn test_error_banner_wins_over_loading() {
        let mut state = state();
        state.screen = Screen::Profile;
        state.profile.profile.start().unwrap();
        let ticket = state.profile.upload.start().unwrap();
        state.profile.upload.fail(ticket, Failure::unauthorized());

        let render = state.to_render_state();
        assert!(render.is_loading);
        assert_eq!(render.banner.map(|b| b.kind), Some(BannerKind::Error));
    }

    #[test]
    fn test_flash_shows_when_screen_is_quiet() {
        let mut state = state();
        state.flash = Some(Banner::info("Logged out."));
        let render = state.to_render_state();
        assert!(!render.is_loading);
        assert_eq!(render.banner, Some(Banner::info("Logged out.")));
    }

    #[test]
    fn test_password_is_masked() {
        let mut state = state();
        for c in "hunter2".chars() {
            state.login.form.fields[1].value.push(c);
        }
        let form = state.to_render_state().form.unwrap();
        assert_eq!(form.fields[1].value, "*******");
        assert_eq!(form.fields[0].value, "");
    }

    #[test]
    fn test_share_rows_show_selection() {
        let mut state = state();
        state.screen = Screen::ShareTask;
        let ticket = state.share.candidates.start().unwrap();
        let accounts = vec![Account {
            account_uuid: "a1".into(),
            name: "ann".into(),
            email: "ann@corp.io".into(),
            role: Default::default(),
        }];
        state.share.candidates.succeed(ticket, accounts);
        state.share.chosen.insert("a1".into());

        let list = state.to_render_state().list.unwrap();
        assert_eq!(list.rows[0].checked, Some(true));
    }
}
