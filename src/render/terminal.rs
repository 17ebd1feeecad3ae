use super::{Frame, SurfaceSize};
use crate::metrics::CellSize;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use tracing::debug;

/// Owns the terminal while the sign is on screen.
///
/// Acquiring it switches to the alternate screen, hides the cursor and enables raw mode. All of it
/// is undone when the guard is dropped, on every exit path.
pub struct TerminalGuard<W: Write> {
    writer: W,
}

impl<W: Write> TerminalGuard<W> {
    pub fn acquire(mut writer: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // from here on the guard exists, so a failure below still restores the terminal
        let mut guard = Self { writer };
        execute!(guard.writer, EnterAlternateScreen, Hide, EnableMouseCapture, Clear(ClearType::All))?;
        debug!("terminal acquired");
        Ok(guard)
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.writer, ResetColor, DisableMouseCapture, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        debug!("terminal released");
    }
}

/// Query the size of the terminal, in cells and in pixels.
///
/// Terminals that don't report their pixel size get a typical cell size instead.
pub fn query_surface() -> io::Result<SurfaceSize> {
    let (columns, rows) = terminal::size()?;
    let cell = match terminal::window_size() {
        Ok(size) if size.width > 0 && size.height > 0 && size.columns > 0 && size.rows > 0 => CellSize {
            width_px: size.width as f32 / size.columns as f32,
            height_px: size.height as f32 / size.rows as f32,
        },
        _ => CellSize::FALLBACK,
    };
    Ok(SurfaceSize { columns, rows, cell })
}

/// Paint a frame, replacing whatever is on screen.
pub fn paint<W: Write>(writer: &mut W, frame: &Frame) -> io::Result<()> {
    queue!(writer, BeginSynchronizedUpdate)?;
    for (row, line) in frame.lines.iter().enumerate() {
        queue!(writer, MoveTo(0, row as u16))?;
        for span in &line.spans {
            let intensity = if span.style.bold { Attribute::Bold } else { Attribute::NormalIntensity };
            queue!(
                writer,
                SetForegroundColor(span.style.foreground.into()),
                SetBackgroundColor(span.style.background.into()),
                SetAttribute(intensity),
                Print(&span.text)
            )?;
        }
    }
    queue!(writer, ResetColor, EndSynchronizedUpdate)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::render::{CellStyle, FrameLine, Span};

    #[test]
    fn paint_frame() {
        let lit = CellStyle { foreground: Color::new(1, 2, 3), background: Color::BLACK, bold: true };
        let frame = Frame {
            lines: vec![
                FrameLine { spans: vec![Span { text: " ".into(), style: CellStyle::default() }] },
                FrameLine { spans: vec![Span { text: "██".into(), style: lit }] },
            ],
        };
        let mut output = Vec::new();
        paint(&mut output, &frame).expect("paint failed");

        let output = String::from_utf8(output).expect("not utf8");
        assert!(output.contains("██"));
        // row 2, column 1 in 1-based coordinates
        assert!(output.contains("\x1b[2;1H"));
        assert!(output.contains("38;2;1;2;3"));
    }
}
