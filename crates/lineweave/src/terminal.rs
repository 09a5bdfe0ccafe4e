//! Terminal driver.
//!
//! A thin wrapper over crossterm covering the handful of terminal
//! operations the runtime needs: clear, move, hide/show cursor, window
//! size, alternate screen, raw mode. Output is queued on an arbitrary
//! writer and flushed once per render pass.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tracing::debug;

use crate::error::{Error, Result};

/// Driver for the terminal an application draws on.
///
/// The default driver writes to stdout and talks to the real terminal for
/// raw mode, window size, and the alternate screen. A driver built with
/// [`Terminal::with_writer`] runs in custom-I/O mode: it queues the same
/// escape sequences onto the given writer but skips every operation that
/// requires a real TTY (raw mode, alternate screen, size queries), which
/// makes it suitable for tests and embedding.
pub struct Terminal {
    writer: Box<dyn Write + Send>,
    custom: bool,
    fixed_size: (u16, u16),
}

impl Terminal {
    /// Driver over stdout, attached to the real terminal.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            writer: Box::new(io::stdout()),
            custom: false,
            fixed_size: (0, 0),
        }
    }

    /// Custom-I/O driver over an arbitrary writer.
    ///
    /// Reports a fixed window size of 24×80 until changed with
    /// [`set_fixed_size`](Self::set_fixed_size).
    #[must_use]
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer,
            custom: true,
            fixed_size: (24, 80),
        }
    }

    /// Set the window size reported in custom-I/O mode.
    pub fn set_fixed_size(&mut self, rows: u16, cols: u16) {
        self.fixed_size = (rows, cols);
    }

    /// Current window size as `(rows, cols)`.
    pub fn size(&self) -> Result<(u16, u16)> {
        if self.custom {
            return Ok(self.fixed_size);
        }
        let (cols, rows) = terminal::size()?;
        Ok((rows, cols))
    }

    /// Clear the entire screen.
    pub fn clear_screen(&mut self) -> Result<()> {
        queue!(self.writer, Clear(ClearType::All))?;
        Ok(())
    }

    /// Erase the line under the cursor regardless of column.
    pub fn clear_line(&mut self) -> Result<()> {
        queue!(self.writer, Clear(ClearType::CurrentLine))?;
        Ok(())
    }

    /// Move the cursor to a 0-indexed row and column.
    pub fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        queue!(self.writer, MoveTo(col, row))?;
        Ok(())
    }

    /// Stop displaying the cursor.
    pub fn hide_cursor(&mut self) -> Result<()> {
        queue!(self.writer, Hide)?;
        Ok(())
    }

    /// Start displaying the cursor.
    pub fn show_cursor(&mut self) -> Result<()> {
        queue!(self.writer, Show)?;
        Ok(())
    }

    /// Switch to the alternate screen, preserving the shell's contents.
    pub fn save_screen(&mut self) -> Result<()> {
        if self.custom {
            return Ok(());
        }
        queue!(self.writer, EnterAlternateScreen)?;
        Ok(())
    }

    /// Leave the alternate screen, bringing the shell's contents back.
    pub fn restore_screen(&mut self) -> Result<()> {
        if self.custom {
            return Ok(());
        }
        queue!(self.writer, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Put the terminal into raw mode.
    pub fn enter_raw_mode(&mut self) -> Result<()> {
        if self.custom {
            return Ok(());
        }
        enable_raw_mode().map_err(|source| Error::RawMode {
            action: "enable",
            source,
        })
    }

    /// Undo raw mode.
    pub fn leave_raw_mode(&mut self) -> Result<()> {
        if self.custom {
            return Ok(());
        }
        disable_raw_mode().map_err(|source| Error::RawMode {
            action: "disable",
            source,
        })
    }

    /// Queue raw text at the current cursor position.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Flush everything queued so far.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Session setup: save screen, hide cursor, raw mode.
    pub(crate) fn setup(&mut self) -> Result<()> {
        self.save_screen()?;
        self.hide_cursor()?;
        self.flush()?;
        self.enter_raw_mode()?;
        debug!("terminal session started");
        Ok(())
    }

    /// Session teardown: the inverse of [`setup`](Self::setup), in reverse
    /// order. Failures are ignored; there is nothing left to do with them.
    pub(crate) fn teardown(&mut self) {
        let _ = self.show_cursor();
        let _ = self.restore_screen();
        let _ = self.flush();
        let _ = self.leave_raw_mode();
        debug!("terminal session ended");
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("custom", &self.custom)
            .field("fixed_size", &self.fixed_size)
            .finish_non_exhaustive()
    }
}
