use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::io::config_io;
use crate::io::paths;
use crate::io::store::{DurableStore, FileStore};
use crate::logging::{self, LogTarget};
use crate::model::config::UiConfig;
use crate::model::task::{Collection, TaskId};
use crate::model::theme::{Preset, ThemePreference};
use crate::ops::dispatch::{Action, Controller, DispatchError, Outcome};
use crate::ops::repository::TaskError;
use crate::ops::theme_ops;
use crate::util::text::LineBuffer;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving around the lists
    Navigate,
    /// Typing a new task into the input line
    Add,
    /// Editing a task title in place
    Edit,
}

/// Which list the cursor is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Active,
    Archive,
}

impl Pane {
    pub fn collection(self) -> Collection {
        match self {
            Pane::Active => Collection::Active,
            Pane::Archive => Collection::Archived,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A transient line in the status row
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    pub shown_at: Instant,
}

/// Main application state
pub struct App<S: DurableStore> {
    pub controller: Controller<S>,
    pub mode: Mode,
    pub pane: Pane,
    pub active_cursor: usize,
    pub archive_cursor: usize,
    pub archive_open: bool,
    /// Text typed for the next new task
    pub add_input: LineBuffer,
    pub theme_pref: ThemePreference,
    pub theme: Theme,
    pub status: Option<StatusMessage>,
    pub message_timeout: Duration,
    pub show_key_hints: bool,
    pub should_quit: bool,
}

impl<S: DurableStore> App<S> {
    pub fn new(controller: Controller<S>, ui: &UiConfig) -> Self {
        let theme_pref = theme_ops::load_theme(controller.store());
        let theme = Theme::from_preference(&theme_pref);
        let mode = if controller.snapshot().active.is_empty() {
            Mode::Add
        } else {
            Mode::Navigate
        };
        App {
            controller,
            mode,
            pane: Pane::Active,
            active_cursor: 0,
            archive_cursor: 0,
            archive_open: ui.archive_open,
            add_input: LineBuffer::new(),
            theme_pref,
            theme,
            status: None,
            message_timeout: Duration::from_millis(ui.message_timeout_ms),
            show_key_hints: ui.show_key_hints,
            should_quit: false,
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Run an action through the controller and reflect the result: cursor
    /// clamping, mode changes and the status line.
    pub fn apply(&mut self, action: Action) -> Option<Outcome> {
        let result = self.controller.dispatch(action);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_error(&e);
                self.sync_mode();
                return None;
            }
        };

        match &outcome {
            Outcome::Added(_) => self.active_cursor = 0,
            Outcome::Restored(_) => {
                self.pane = Pane::Active;
                self.active_cursor = 0;
            }
            _ => {}
        }
        self.clamp_cursors();
        self.sync_mode();

        if let Some(err) = self.controller.take_save_failure() {
            warn!(error = %err, "save failed in tui");
            self.notify_error(format!("Not saved: {}", err));
        } else if !matches!(
            outcome,
            Outcome::EditStarted { previous: None, .. } | Outcome::Added(_)
        ) {
            self.notify(outcome.message());
        }
        Some(outcome)
    }

    /// Submit the add line. A blank line shows the validation message and
    /// leaves the input as it was.
    pub fn submit_add(&mut self) {
        let title = self.add_input.as_str().to_string();
        if self.apply(Action::Add(title)).is_some() {
            self.add_input.clear();
        }
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        let snapshot = self.controller.snapshot();
        let (tasks, cursor) = match self.pane {
            Pane::Active => (snapshot.active, self.active_cursor),
            Pane::Archive => (snapshot.archived, self.archive_cursor),
        };
        tasks.get(cursor).map(|t| t.id.clone())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.pane_len(self.pane);
        let cursor = match self.pane {
            Pane::Active => &mut self.active_cursor,
            Pane::Archive => &mut self.archive_cursor,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn toggle_archive(&mut self) {
        self.archive_open = !self.archive_open;
        if !self.archive_open {
            self.pane = Pane::Active;
        }
    }

    /// Switch between the two lists, opening the archive if needed
    pub fn switch_pane(&mut self) {
        self.pane = match self.pane {
            Pane::Active => {
                self.archive_open = true;
                Pane::Archive
            }
            Pane::Archive => Pane::Active,
        };
    }

    pub fn cycle_theme(&mut self) {
        let next = match &self.theme_pref {
            ThemePreference::Preset(p) => p.next(),
            ThemePreference::Custom(_) => Preset::Moss,
        };
        match theme_ops::apply_preset(self.controller.store_mut(), next) {
            Ok(pref) => {
                self.theme = Theme::from_preference(&pref);
                self.theme_pref = pref;
                self.notify(format!("Theme: {}", next));
            }
            Err(e) => {
                // Still switch for this session
                self.theme_pref = ThemePreference::Preset(next);
                self.theme = Theme::from_preference(&self.theme_pref);
                self.notify_error(format!("Theme not saved: {}", e));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Status messages
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, text: impl Into<String>) {
        self.set_status(text.into(), MessageKind::Info);
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.set_status(text.into(), MessageKind::Error);
    }

    fn set_status(&mut self, text: String, kind: MessageKind) {
        self.status = Some(StatusMessage {
            text,
            kind,
            shown_at: Instant::now(),
        });
    }

    fn report_error(&mut self, err: &DispatchError) {
        let text = match err {
            DispatchError::Task(TaskError::EmptyTitle) => "Please enter a task".to_string(),
            other => other.to_string(),
        };
        self.notify_error(text);
    }

    /// Drop the status message once it has been up for the timeout
    pub fn expire_status(&mut self, now: Instant) {
        if let Some(msg) = &self.status
            && now.duration_since(msg.shown_at) >= self.message_timeout
        {
            self.status = None;
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    pub fn pane_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Active => self.controller.repo().active_len(),
            Pane::Archive => self.controller.repo().archived_len(),
        }
    }

    fn clamp_cursors(&mut self) {
        let active = self.pane_len(Pane::Active);
        let archived = self.pane_len(Pane::Archive);
        self.active_cursor = self.active_cursor.min(active.saturating_sub(1));
        self.archive_cursor = self.archive_cursor.min(archived.saturating_sub(1));
    }

    /// Keep `mode` in line with the edit session, which may have ended
    /// because its task was completed or deleted.
    fn sync_mode(&mut self) {
        let editing = self.controller.edit().is_editing();
        if editing {
            self.mode = Mode::Edit;
        } else if self.mode == Mode::Edit {
            self.mode = Mode::Navigate;
        }
    }
}

/// Run the TUI application
pub fn run(
    data_dir: Option<&Path>,
    verbose: u8,
    quiet: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = paths::resolve_data_dir(data_dir);
    let config = config_io::read_config(&data_dir)?;
    logging::init(
        LogTarget::File(paths::log_file_path(&data_dir)),
        &logging::level_for(verbose, quiet, &config.log.level),
    )?;
    info!(data_dir = %data_dir.display(), "starting tui");

    let controller = Controller::open(FileStore::open(&data_dir));
    let mut app = App::new(controller, &config.ui);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!("tui closed");
    result
}

fn run_event_loop<S: DurableStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }
        app.expire_status(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
