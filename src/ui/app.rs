use crossterm::event::{KeyCode, KeyEvent};
use std::process::ExitStatus;

use crate::buffer::{DisplayBuffer, InputLine};
use crate::config::{Config, LineSource};
use crate::reactor::{Reactor, Readiness, WatchControl, WatchToken};
use crate::shell::{CommandDispatcher, PumpStatus, Session, SessionError};
use crate::ui::explorer::ExplorerState;
use crate::workspace::{Workspace, WorkspaceError};

/// Whether a key handler used the key or left it for default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Propagate,
}

/// What the frontend shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Terminal,
    Document,
    Explorer,
}

/// Editor state reachable from every callback: the shell session, the
/// terminal buffer it feeds, and the open document.
pub struct EditorApp {
    session: Session,
    terminal: DisplayBuffer,
    input_line: InputLine,
    /// Terminal byte offset of each character in `input_line`.
    typed_offsets: Vec<usize>,
    line_source: LineSource,
    dispatcher: CommandDispatcher,
    workspace: Workspace,
    explorer: ExplorerState,
    run_interpreter: String,
    terminal_visible: bool,
    exit_reported: bool,
    last_warning: Option<String>,
    quit: bool,
}

impl EditorApp {
    pub fn new(session: Session, workspace: Workspace, config: &Config) -> Self {
        Self {
            session,
            terminal: DisplayBuffer::new(),
            input_line: InputLine::new(),
            typed_offsets: Vec::new(),
            line_source: config.session.line_source,
            dispatcher: CommandDispatcher::new(),
            workspace,
            explorer: ExplorerState::default(),
            run_interpreter: config.run.interpreter.clone(),
            terminal_visible: true,
            exit_reported: false,
            last_warning: None,
            quit: false,
        }
    }

    /// Start pumping shell output into the terminal buffer on `reactor`.
    pub fn attach(&mut self, reactor: &mut Reactor<EditorApp>) -> Result<WatchToken, SessionError> {
        self.session
            .attach(reactor, |app: &mut EditorApp, readiness| app.on_shell_ready(readiness))
    }

    /// Readiness callback for the shell's output.
    ///
    /// Keeps the watch while the shell can still produce output. After
    /// end-of-stream the descriptor would report hang-up on every turn, so
    /// the watch is dropped and the exit is picked up by [`Self::poll_child`].
    pub fn on_shell_ready(&mut self, _readiness: Readiness) -> WatchControl {
        match self.session.pump(&mut self.terminal) {
            PumpStatus::Appended(_) | PumpStatus::Idle => WatchControl::Keep,
            PumpStatus::EndOfStream | PumpStatus::Finished => {
                self.report_exit();
                WatchControl::Remove
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn terminal(&self) -> &DisplayBuffer {
        &self.terminal
    }

    pub fn input_line(&self) -> &str {
        self.input_line.as_str()
    }

    /// Append text at the end of the terminal buffer.
    pub fn append_terminal(&mut self, text: &str) {
        self.terminal.append(text);
    }

    /// Key hook of the terminal view: Enter submits the current line,
    /// anything else is left to normal text insertion.
    pub fn on_terminal_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if key.code != KeyCode::Enter {
            return KeyOutcome::Propagate;
        }
        // Failures are already recorded as a warning.
        let _ = self.submit_command();
        KeyOutcome::Consumed
    }

    /// Insert a typed character into the terminal.
    pub fn type_char(&mut self, ch: char) {
        self.typed_offsets.push(self.terminal.len());
        self.terminal.append(ch.encode_utf8(&mut [0u8; 4]));
        self.input_line.push(ch);
    }

    /// Remove the last typed character, never shell output.
    ///
    /// Output that arrived after the character stays where it is.
    pub fn erase_char(&mut self) {
        if self.input_line.pop().is_none() {
            return;
        }
        if let Some(at) = self.typed_offsets.pop() {
            self.terminal.remove_char_at(at);
        }
    }

    /// Send the current command line to the shell.
    ///
    /// Returns the exact bytes written. A failed write is recorded as a
    /// warning and returned; the session stays in place.
    pub fn submit_command(&mut self) -> Result<String, SessionError> {
        let typed = self.input_line.take();
        self.typed_offsets.clear();
        let result = match self.line_source {
            LineSource::InputLine => self.dispatcher.dispatch(&mut self.session, &typed),
            LineSource::LastLine => self
                .dispatcher
                .dispatch_last_line(&mut self.session, &self.terminal),
        };
        self.terminal.append("\n");
        if let Err(err) = &result {
            self.warn(err.to_string());
        }
        result
    }

    /// Run the open document through the run interpreter in the shell.
    ///
    /// Returns `Ok(None)` without touching the shell when the document
    /// has never been saved.
    pub fn run_current_file(&mut self) -> Result<Option<String>, SessionError> {
        let Some(path) = self.workspace.document().path().map(|p| p.to_path_buf()) else {
            self.warn("Save the file before running it".to_string());
            return Ok(None);
        };
        self.terminal_visible = true;
        match self
            .dispatcher
            .dispatch_run_file(&mut self.session, &self.run_interpreter, &path)
        {
            Ok(line) => Ok(Some(line)),
            Err(err) => {
                self.warn(err.to_string());
                Err(err)
            }
        }
    }

    /// Show or hide the terminal. The session is unaffected.
    pub fn toggle_terminal(&mut self) -> bool {
        self.terminal_visible = !self.terminal_visible;
        self.terminal_visible
    }

    pub fn is_terminal_visible(&self) -> bool {
        self.terminal_visible
    }

    pub fn view(&self) -> View {
        if self.explorer.is_visible() {
            View::Explorer
        } else if self.terminal_visible {
            View::Terminal
        } else {
            View::Document
        }
    }

    pub fn explorer(&self) -> &ExplorerState {
        &self.explorer
    }

    /// List the workspace directory for picking a file to open.
    pub fn open_explorer(&mut self) {
        match self.workspace.list_files() {
            Ok(entries) if entries.is_empty() => {
                let message = format!("No files in {}", self.workspace.root().display());
                self.warn(message);
            }
            Ok(entries) => {
                self.explorer = ExplorerState::Visible {
                    entries,
                    selected: 0,
                };
            }
            Err(err) => self.warn(err.to_string()),
        }
    }

    pub fn close_explorer(&mut self) {
        self.explorer = ExplorerState::Hidden;
    }

    pub fn move_explorer_selection(&mut self, delta: isize) {
        self.explorer.move_selection(delta);
    }

    /// Load the highlighted file and show it in the editor.
    ///
    /// The explorer closes either way; a failed load keeps the current
    /// document and is recorded as a warning.
    pub fn open_selected(&mut self) -> Result<(), WorkspaceError> {
        let Some(path) = self.explorer.selected().map(|entry| entry.path.clone()) else {
            return Ok(());
        };
        self.close_explorer();
        match self.workspace.open(&path) {
            Ok(()) => {
                self.terminal_visible = false;
                Ok(())
            }
            Err(err) => {
                self.warn(err.to_string());
                Err(err)
            }
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn save_document(&mut self) -> Result<(), WorkspaceError> {
        let result = self.workspace.save();
        if let Err(err) = &result {
            self.warn(err.to_string());
        }
        result
    }

    pub fn new_document(&mut self) {
        self.workspace.new_document();
    }

    /// Check for shell exit without blocking and report it once.
    pub fn poll_child(&mut self) -> Option<ExitStatus> {
        let status = self.session.poll_exit();
        self.report_exit();
        status
    }

    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Tear the session down; see [`Session::teardown`].
    pub fn teardown(&mut self, reactor: &mut Reactor<EditorApp>) -> Result<Option<ExitStatus>, SessionError> {
        self.session.teardown(reactor)
    }

    fn report_exit(&mut self) {
        if self.exit_reported {
            return;
        }
        if let Some(status) = self.session.exit_status() {
            self.exit_reported = true;
            self.notice(&format!("shell exited ({status})"));
        }
    }

    fn warn(&mut self, message: String) {
        tracing::warn!(session = self.session.id(), "{}", message);
        self.notice(&message);
        self.last_warning = Some(message);
    }

    fn notice(&mut self, message: &str) {
        if !self.terminal.is_empty() && !self.terminal.text().ends_with('\n') {
            self.terminal.append("\n");
        }
        self.terminal.append(&format!("[{message}]\n"));
    }
}
