//! Terminal host: crossterm event translation, raw-mode guard and the
//! presenting sink used by the binary.
use std::io;

use crossterm::{
    cursor::{Hide, Show},
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};

use crate::error::BackdropError;
use crate::palette::{C_BLACK, C_LABEL, C_STEEL};
use crate::runtime::{FrameSink, InputEvent};
use crate::surface::CellMetrics;

/// What the host loop should do with a terminal event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCommand {
    Forward(InputEvent),
    ToggleFx,
    Quit,
}

/// Map a crossterm event onto backdrop input. Pointer positions land on the
/// pixel centre of the hovered cell.
pub fn translate(event: &Event, metrics: &CellMetrics) -> Option<HostCommand> {
    match event {
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let (x, y) = metrics.cell_center(mouse.column, mouse.row);
                Some(HostCommand::Forward(InputEvent::PointerMove { x, y }))
            }
            MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => Some(HostCommand::Forward(InputEvent::Wheel)),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(HostCommand::Forward(InputEvent::Resize {
            cols: *cols,
            rows: *rows,
        })),
        Event::FocusLost => Some(HostCommand::Forward(InputEvent::PointerLeave)),
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(HostCommand::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(HostCommand::Quit)
            }
            KeyCode::Char('f') | KeyCode::Char('F') => Some(HostCommand::ToggleFx),
            _ => None,
        },
        _ => None,
    }
}

/// Raw mode, alternate screen, mouse capture and focus reporting for as long
/// as the guard lives
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            Hide
        )?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        Show,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
}

/// Leave the alternate screen before the default hook prints the panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        original_hook(info);
    }));
}

const FOOTER: &str = " q quit · f fx ";

/// Presents backdrop frames with a key hint on the bottom row
pub struct HostSink<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> HostSink<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> FrameSink for HostSink<B> {
    fn present(&mut self, frame: &Buffer) -> Result<(), BackdropError> {
        self.terminal.draw(|f| {
            let area = f.area();
            let out = f.buffer_mut();
            let shared = area.intersection(frame.area);
            for y in shared.top()..shared.bottom() {
                for x in shared.left()..shared.right() {
                    if let (Some(src), Some(dst)) = (frame.cell((x, y)), out.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }

            if area.height == 0 || (area.width as usize) < FOOTER.chars().count() {
                return;
            }
            let width = FOOTER.chars().count() as u16;
            let footer = Rect::new(area.right() - width, area.bottom() - 1, width, 1);
            let hint = Line::from(vec![
                Span::styled(" q", Style::default().fg(C_STEEL).add_modifier(Modifier::BOLD)),
                Span::styled(" quit · ", Style::default().fg(C_LABEL)),
                Span::styled("f", Style::default().fg(C_STEEL).add_modifier(Modifier::BOLD)),
                Span::styled(" fx ", Style::default().fg(C_LABEL)),
            ]);
            f.render_widget(Paragraph::new(hint).bg(C_BLACK), footer);
        })?;
        Ok(())
    }
}
