//! Taskdesk - terminal client for the task management backend
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use taskdesk::app::{AppActor, AppState};
use taskdesk::config::AppConfig;
use taskdesk::constants::{APP_NAME, LOG_FILE};
use taskdesk::messages::render::{FormView, ListView};
use taskdesk::messages::ui_events::{key_to_ui_event, InputMode, Screen};
use taskdesk::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use taskdesk::network::{ApiClient, NetworkActor};
use taskdesk::session::SessionStore;
use taskdesk::ui::{banner_style, render_input, render_list, render_tabs, status_color};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging to file
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory {}", config.log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(base_url = config.api_base(), "{} starting", APP_NAME);

    let session = SessionStore::open(&config.session_file);
    let state = AppState::new(session, config.download_dir.clone(), config.api_base());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let client = ApiClient::new(config.api_base(), config.timeout());
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("{} exiting", APP_NAME);
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Banner
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);
    draw_banner(f, state, main_chunks[1]);
    draw_content(f, state, main_chunks[2]);
    draw_status_bar(f, state, main_chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

/// Top-level tab owning the current screen
fn tab_index(screen: Screen) -> Option<usize> {
    match screen {
        Screen::Login => Some(0),
        Screen::MyTasks | Screen::TaskDetail | Screen::NewTask | Screen::EditTask | Screen::ShareTask => {
            Some(1)
        }
        Screen::Employees | Screen::AccountTasks | Screen::CreateEmployee => Some(2),
        Screen::Admins => Some(3),
        Screen::Profile => Some(4),
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let titles = [" 0:Login ", " 1:My Tasks ", " 2:Employees ", " 3:Admins ", " 4:Profile "];
    f.render_widget(render_tabs(&titles, tab_index(state.screen)), area);
}

fn draw_banner(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(banner) = &state.banner {
        let line = Paragraph::new(format!(" {}", banner.text)).style(banner_style(banner.kind));
        f.render_widget(line, area);
    }
}

fn draw_content(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", state.screen.title()))
        .title_style(Style::default().fg(Color::Cyan).bold());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let details_height = if state.details.is_empty() {
        0
    } else {
        state.details.len() as u16 + 1
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(details_height), Constraint::Min(0)])
        .split(inner);

    draw_details(f, state, chunks[0]);

    if let Some(form) = &state.form {
        draw_form(f, form, state.input_mode, chunks[1]);
    } else if let Some(list) = &state.list {
        draw_list(f, list, chunks[1]);
    }
}

fn draw_details(f: &mut Frame, state: &RenderState, area: Rect) {
    if state.details.is_empty() {
        return;
    }
    let lines: Vec<Line> = state
        .details
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", key), Style::default().fg(Color::DarkGray)),
                Span::raw(value.as_str()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn draw_form(f: &mut Frame, form: &FormView, input_mode: InputMode, area: Rect) {
    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    if form.status.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let editing = input_mode == InputMode::Editing;
    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.focused;
        f.render_widget(render_input(field, is_focused, editing), rows[i]);

        // Cursor
        if is_focused && editing {
            let field_area = rows[i];
            let max_x = field_area.x + field_area.width.saturating_sub(2);
            let cursor_x = (field_area.x + form.cursor_position as u16 + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
        }
    }

    if let Some(status) = form.status {
        let line = Line::from(vec![
            Span::styled(" Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(status.as_str(), Style::default().fg(status_color(status)).bold()),
            Span::styled("  (t to change)", Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(line), rows[form.fields.len()]);
    }
}

fn draw_list(f: &mut Frame, list: &ListView, area: Rect) {
    if list.rows.is_empty() {
        let empty = Paragraph::new(list.empty_text.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", list.title)));
        f.render_widget(empty, area);
        return;
    }
    let mut selection = ListState::default().with_selected(Some(list.selected));
    f.render_stateful_widget(render_list(list), area, &mut selection);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    let status = if state.is_loading {
        " Loading... ".to_string()
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field | Enter:submit ".to_string()
    } else {
        state.screen.hints().to_string()
    };
    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, chunks[0]);

    let session = if state.logged_in {
        Span::styled("● logged in ", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ logged out ", Style::default().fg(Color::DarkGray))
    };
    let right = Line::from(vec![session, Span::styled(state.base_url.as_str(), Style::default().fg(Color::DarkGray))])
        .right_aligned();
    f.render_widget(Paragraph::new(right), chunks[1]);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 TASKDESK - Keyboard Shortcuts

 SCREENS
   0 / 1 / 2 / 3 / 4  Login / My Tasks / Employees / Admins / Profile
   Esc                Back (or stop editing)
   r                  Reload current screen

 FORMS
   Tab / Shift+Tab    Next / previous field
   e                  Edit focused field
   Enter              Submit
   t                  Cycle task status
   g                  Download profile image

 LISTS
   ↑ / ↓              Select
   Enter              Open
   n                  New task / new employee
   Space              Toggle selection (share)

 TASK
   e / d / s / u      Edit / delete / share / unshare selected

 GENERAL
   x                  Logout
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
