//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let initial = self.state.boot();
        self.send_all(initial);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    tracing::debug!(ticket = %response.ticket, ok = response.outcome.is_ok(), "reply received");
                    let follow_up = self.state.handle_response(response);
                    self.send_all(follow_up);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send_all(&self, cmds: Vec<NetworkCommand>) {
        for cmd in cmds {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmds = match event {
            // Navigation
            UiEvent::SwitchScreen(screen) => self.state.switch_screen(screen),
            UiEvent::Back => self.state.back(),
            UiEvent::Reload => self.state.load_screen(),

            // Form editing
            UiEvent::StartEditing => {
                self.state.start_editing();
                Vec::new()
            }
            UiEvent::StopEditing => {
                self.state.stop_editing();
                Vec::new()
            }
            UiEvent::NextField => {
                self.state.next_field();
                Vec::new()
            }
            UiEvent::PrevField => {
                self.state.prev_field();
                Vec::new()
            }
            UiEvent::CharInput(c) => {
                self.state.enter_char(c);
                Vec::new()
            }
            UiEvent::Backspace => {
                self.state.delete_char();
                Vec::new()
            }
            UiEvent::CursorLeft => {
                self.state.move_cursor_left();
                Vec::new()
            }
            UiEvent::CursorRight => {
                self.state.move_cursor_right();
                Vec::new()
            }
            UiEvent::CycleStatus => {
                self.state.cycle_status();
                Vec::new()
            }
            UiEvent::Submit => {
                if self.state.input_mode == InputMode::Editing {
                    self.state.stop_editing();
                }
                self.state.submit()
            }

            // Lists
            UiEvent::SelectNext => {
                self.state.select_next();
                Vec::new()
            }
            UiEvent::SelectPrev => {
                self.state.select_prev();
                Vec::new()
            }
            UiEvent::Open => self.state.open_selected(),
            UiEvent::ToggleSelection => {
                self.state.toggle_selection();
                Vec::new()
            }

            // Item actions
            UiEvent::NewItem => self.state.new_item(),
            UiEvent::EditItem => self.state.edit_item(),
            UiEvent::DeleteItem => self.state.delete_item(),
            UiEvent::ShareItem => self.state.share_item(),
            UiEvent::UnshareItem => self.state.unshare_item(),
            UiEvent::DownloadImage => self.state.download_image(),

            // Session
            UiEvent::Logout => self.state.logout(),

            // Popups
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                Vec::new()
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                Vec::new()
            }

            // System
            UiEvent::Quit => return true,
        };

        self.send_all(cmds);
        false
    }
}
