//! Crossterm terminal driver for pathviz.
//!
//! Provides a [`TerminalDriver`] that implements [`pathviz_core::Driver`],
//! mapping the display grid onto a terminal in raw mode with mouse
//! capture enabled.

use std::io::{self, Stdout, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::{
    Point,
    app::{Context, Driver},
    grid::Frame,
    messages::{Key, MouseAction, Msg},
    style::{AttrMask, Color},
};

/// Default time to wait for input before the loop ticks (about 60 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Maps a [`pathviz_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        let (r, g, b) = (c.r(), c.g(), c.b());
        CtColor::Rgb { r, g, b }
    }
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Translate one terminal event into a message, if it means anything to
/// the application.
fn to_msg(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) => {
            if kind == KeyEventKind::Release {
                return None;
            }
            // Raw mode swallows SIGINT.
            if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                return Some(Msg::Quit);
            }
            to_key(code).map(Msg::key)
        }
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => {
            let pos = Point::new(column as i32, row as i32);
            let action = match kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
                MouseEventKind::Drag(_) => MouseAction::Drag,
                MouseEventKind::Up(_) => MouseAction::Release,
                MouseEventKind::Moved => MouseAction::Move,
                _ => return None,
            };
            Some(Msg::mouse(action, pos))
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct TerminalDriver {
    mouse_enabled: bool,
    frame_interval: Duration,
    out: Stdout,
}

impl TerminalDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            out: io::stdout(),
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// How long [`Driver::poll_msgs`] waits for input before returning, which
    /// bounds the time between two ticks.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }
}

impl Default for TerminalDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for TerminalDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(self.out, event::EnableMouseCapture)?;
        }
        let (w, h) = terminal::size()?;
        log::debug!(
            "terminal initialised ({w}x{h}, frame interval {:?})",
            self.frame_interval
        );
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(self.frame_interval)? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(m) = to_msg(event::read()?) {
                tx.send(m).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        for fc in &frame.cells {
            let p = fc.pos;
            let cell = &fc.cell;

            queue!(
                self.out,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;

            let attrs = cell.style.attrs;
            if attrs.contains(AttrMask::BOLD) {
                queue!(self.out, style::SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::REVERSE) {
                queue!(self.out, style::SetAttribute(Attribute::Reverse))?;
            }

            write!(self.out, "{}", cell.ch)?;

            if !attrs.is_empty() {
                queue!(self.out, style::SetAttribute(Attribute::Reset))?;
            }
        }

        self.out.flush()?;
        log::trace!("flushed {} cells", frame.cells.len());
        Ok(())
    }

    fn close(&mut self) {
        if self.mouse_enabled {
            let _ = execute!(self.out, event::DisableMouseCapture);
        }
        let _ = execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        log::debug!("terminal restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn maps_keys() {
        assert_eq!(
            to_msg(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Msg::key(Key::Space))
        );
        assert_eq!(
            to_msg(key(KeyCode::Char('r'), KeyModifiers::NONE)),
            Some(Msg::key(Key::Char('r')))
        );
        assert_eq!(
            to_msg(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Msg::key(Key::Escape))
        );
        assert_eq!(to_msg(key(KeyCode::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            to_msg(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Msg::Quit)
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let ev = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(to_msg(ev), None);
    }

    #[test]
    fn maps_mouse_actions() {
        assert_eq!(
            to_msg(mouse(MouseEventKind::Down(MouseButton::Left), 4, 2)),
            Some(Msg::mouse(MouseAction::Main, Point::new(4, 2)))
        );
        assert_eq!(
            to_msg(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 2)),
            Some(Msg::mouse(MouseAction::Drag, Point::new(5, 2)))
        );
        assert_eq!(
            to_msg(mouse(MouseEventKind::Up(MouseButton::Left), 5, 2)),
            Some(Msg::mouse(MouseAction::Release, Point::new(5, 2)))
        );
        assert_eq!(to_msg(mouse(MouseEventKind::ScrollUp, 0, 0)), None);
    }

    #[test]
    fn default_color_maps_to_reset() {
        assert_eq!(to_ct_color(Color::DEFAULT), CtColor::Reset);
        assert_eq!(
            to_ct_color(Color::from_rgb(200, 200, 200)),
            CtColor::Rgb {
                r: 200,
                g: 200,
                b: 200
            }
        );
    }
}
