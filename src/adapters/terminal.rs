//! # Terminal emulation of the device.
//!
//! Draws the menu as text rows on the alternate screen and reads the keyboard
//! as the two buttons.
//!
//! ## Keys
//! ```text
//! Up | Enter | Space | k   → button 0 (select)
//! Down | Tab | j           → button 1 (next)
//! q | Esc | Ctrl-C         → shutdown
//! ```

use std::io::{self, Stdout, Write};

use async_trait::async_trait;
use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ButtonSource, Display};
use crate::error::AdapterError;
use crate::events::{Button, Event, MailboxSender};
use crate::ui::{DrawCommand, Frame, Rgb, Styles};

/// One text row of the emulated panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    pub icon: char,
    pub text: String,
    pub color: Rgb,
    pub background: Option<Rgb>,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            icon: ' ',
            text: String::new(),
            color: Rgb::WHITE,
            background: None,
        }
    }
}

/// Maps pixel commands onto text rows, one row per menu line.
pub(crate) fn layout(frame: &Frame, styles: &Styles) -> Vec<Row> {
    let line_height = styles.line_height().max(1);
    let row_of = |y: u32| (y.saturating_sub(styles.screen_padding) / line_height) as usize;

    let mut rows = vec![Row::default(); styles.num_lines()];
    for cmd in frame.commands() {
        match cmd {
            DrawCommand::Fill { .. } => {}
            DrawCommand::Rect { y0, fill, .. } => {
                if let Some(row) = rows.get_mut(row_of(*y0)) {
                    row.background = Some(*fill);
                }
            }
            DrawCommand::Ellipse { y0, filled, .. } => {
                if let Some(row) = rows.get_mut(row_of(*y0)) {
                    if *filled {
                        row.icon = '●';
                    } else if row.icon != '●' {
                        row.icon = '○';
                    }
                }
            }
            DrawCommand::Text { y, text, color, .. } => {
                if let Some(row) = rows.get_mut(row_of(*y)) {
                    row.text.clone_from(text);
                    row.color = *color;
                }
            }
        }
    }
    rows
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Alternate-screen renderer.
pub struct TerminalDisplay {
    out: Stdout,
    styles: Styles,
}

impl TerminalDisplay {
    pub fn new(styles: Styles) -> Self {
        Self {
            out: io::stdout(),
            styles,
        }
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let width = (self.styles.screen_width / self.styles.font_size.max(1) * 2).max(8) as usize;
        let background = frame
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Fill { color } => Some(*color),
                _ => None,
            })
            .unwrap_or(Rgb::BLACK);

        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        for (i, row) in layout(frame, &self.styles).iter().enumerate() {
            queue!(
                self.out,
                cursor::MoveTo(0, i as u16),
                SetBackgroundColor(color(row.background.unwrap_or(background))),
                SetForegroundColor(color(row.color)),
                Print(format!(" {} {:<width$}", row.icon, row.text)),
                ResetColor,
            )?;
        }
        self.out.flush()
    }
}

impl Display for TerminalDisplay {
    fn power_on(&mut self) -> Result<(), AdapterError> {
        terminal::enable_raw_mode().map_err(AdapterError::PowerOn)?;
        execute!(self.out, EnterAlternateScreen, cursor::Hide).map_err(AdapterError::PowerOn)?;
        debug!("terminal screen on");
        Ok(())
    }

    fn render(&mut self, frame: &Frame) -> Result<(), AdapterError> {
        self.draw(frame).map_err(AdapterError::Render)
    }

    fn power_off(&mut self) {
        if let Err(e) = execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen) {
            warn!(error = %e, "cannot leave alternate screen");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "cannot restore terminal mode");
        }
        debug!("terminal screen off");
    }
}

/// What a key press means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Button),
    Quit,
}

/// Translates a key event; `None` for unmapped keys and releases.
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        KeyCode::Up | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('k') => {
            Some(KeyAction::Press(Button::Select))
        }
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => Some(KeyAction::Press(Button::Next)),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        _ => None,
    }
}

/// Keyboard input.
#[derive(Default)]
pub struct TerminalButtons;

impl TerminalButtons {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ButtonSource for TerminalButtons {
    async fn run(self: Box<Self>, mailbox: MailboxSender, token: CancellationToken) -> Result<(), AdapterError> {
        let mut events = EventStream::new();
        loop {
            let next = tokio::select! {
                _ = token.cancelled() => return Ok(()),
                next = events.next() => next,
            };
            match next {
                Some(Ok(TermEvent::Key(key))) => match map_key(&key) {
                    Some(KeyAction::Press(button)) => {
                        debug!(%button, "key press");
                        if !mailbox.put(Event::ButtonPressed(button)) {
                            return Ok(());
                        }
                    }
                    Some(KeyAction::Quit) => {
                        info!("quit requested from keyboard");
                        token.cancel();
                        return Ok(());
                    }
                    None => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(AdapterError::Input(e)),
                None => return Ok(()),
            }
        }
    }

    fn name(&self) -> &'static str {
        "terminal"
    }
}
