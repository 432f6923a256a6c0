use crate::{
    Result, VirtdeckError,
    dashboard::{Key, View},
    ui,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

/// A message shown to the operator, usually at the end of a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub title: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn new(tone: Tone, title: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// The operator-facing surface: the dashboard draws through it, workflows
/// prompt and report through it.
pub trait Console {
    fn render(&mut self, view: &View) -> Result<()>;

    /// Blocks for the next key press.
    fn next_key(&mut self) -> Result<Key>;

    /// Asks for one line of text, at most `max_len` characters. `None` when
    /// the operator cancels.
    fn prompt(&mut self, label: &str, max_len: usize) -> Result<Option<String>>;

    /// Shows a message while a long command runs. Does not wait.
    fn progress(&mut self, notice: &Notice) -> Result<()>;

    /// Shows `notice` and waits for any key.
    fn acknowledge(&mut self, notice: &Notice) -> Result<()>;
}

/// Full-screen console on the controlling terminal. Raw mode and the
/// alternate screen are held for the lifetime of the value.
pub struct TerminalConsole {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl TerminalConsole {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn read_press(&mut self) -> Result<Option<event::KeyEvent>> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

/// Restores the terminal without a console value, for use from a panic hook.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Console for TerminalConsole {
    fn render(&mut self, view: &View) -> Result<()> {
        self.terminal
            .draw(|frame| ui::draw_dashboard(frame, view))
            .map_err(|e| VirtdeckError::TerminalError(e.to_string()))?;
        Ok(())
    }

    fn next_key(&mut self) -> Result<Key> {
        // Resizes and releases come back as `Key::Other` so the caller redraws.
        Ok(self.read_press()?.map(Key::from_event).unwrap_or(Key::Other))
    }

    fn prompt(&mut self, label: &str, max_len: usize) -> Result<Option<String>> {
        let mut input = String::new();
        loop {
            self.terminal
                .draw(|frame| ui::draw_prompt(frame, label, &input))
                .map_err(|e| VirtdeckError::TerminalError(e.to_string()))?;

            let Some(key) = self.read_press()? else {
                continue;
            };
            match key.code {
                KeyCode::Enter => return Ok(Some(input)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && input.chars().count() < max_len =>
                {
                    input.push(c);
                }
                _ => {}
            }
        }
    }

    fn progress(&mut self, notice: &Notice) -> Result<()> {
        self.terminal
            .draw(|frame| ui::draw_notice(frame, notice, false))
            .map_err(|e| VirtdeckError::TerminalError(e.to_string()))?;
        Ok(())
    }

    fn acknowledge(&mut self, notice: &Notice) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| ui::draw_notice(frame, notice, true))
                .map_err(|e| VirtdeckError::TerminalError(e.to_string()))?;
            if self.read_press()?.is_some() {
                return Ok(());
            }
        }
    }
}
