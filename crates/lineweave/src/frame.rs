//! Frames: one screen's worth of text lines.

use crate::error::Result;
use crate::terminal::Terminal;

/// One fully computed screen's worth of lines for a render cycle.
///
/// The line index is the screen row; two frames are compared positionally,
/// line by line. A frame is produced fresh on every render and is not
/// mutated afterwards; the previous frame is retained only to diff the
/// next one against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// An empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame of `height` empty lines, to be filled in by row.
    #[must_use]
    pub fn blank(height: usize) -> Self {
        Self {
            lines: vec![String::new(); height],
        }
    }

    /// Set the line at `row`, growing the frame with empty lines as needed.
    pub fn set_line(&mut self, row: usize, line: impl Into<String>) {
        if row >= self.lines.len() {
            self.lines.resize(row + 1, String::new());
        }
        self.lines[row] = line.into();
    }

    /// Append a line at the bottom.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The line at `row`, if the frame reaches that far.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Number of lines in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the frame has no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the lines, top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Paint every line unconditionally, top to bottom.
    ///
    /// This is the only safe repaint after the terminal has been resized;
    /// content at the old positions is stale.
    pub fn render(&self, term: &mut Terminal) -> Result<()> {
        for (row, line) in self.lines.iter().enumerate() {
            draw_line(term, row, line)?;
        }
        term.flush()
    }

    /// Repaint only the lines that differ from `previous`.
    ///
    /// Cost scales with the number of changed lines rather than the height
    /// of the screen, which is what makes per-keystroke redraws cheap.
    pub fn render_from(&self, previous: &Self, term: &mut Terminal) -> Result<()> {
        for row in self.diff_indices(previous) {
            draw_line(term, row, self.line(row).unwrap_or(""))?;
        }
        term.flush()
    }

    /// Row indices whose content differs between the two frames.
    ///
    /// A row present in only one frame counts as differing, so lines past
    /// the end of the shorter frame are repainted (or cleared, when the new
    /// frame is the shorter one).
    #[must_use]
    pub fn diff_indices(&self, previous: &Self) -> Vec<usize> {
        let rows = self.lines.len().max(previous.lines.len());
        (0..rows)
            .filter(|&row| self.line(row) != previous.line(row))
            .collect()
    }
}

impl From<Vec<String>> for Frame {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl FromIterator<String> for Frame {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

fn draw_line(term: &mut Terminal, row: usize, line: &str) -> Result<()> {
    term.move_cursor(row as u16, 0)?;
    term.clear_line()?;
    term.write_str(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{self, Write};
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Sink {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn frame(lines: &[&str]) -> Frame {
        lines.iter().map(|l| (*l).to_string()).collect()
    }

    #[test]
    fn test_blank_and_set_line() {
        let mut f = Frame::blank(3);
        assert_eq!(f.len(), 3);
        assert_eq!(f.line(2), Some(""));

        f.set_line(1, "middle");
        assert_eq!(f.line(1), Some("middle"));

        // Setting past the end grows the frame.
        f.set_line(5, "far");
        assert_eq!(f.len(), 6);
        assert_eq!(f.line(4), Some(""));
        assert_eq!(f.line(5), Some("far"));
    }

    #[test]
    fn test_diff_identical_frames_is_empty() {
        let a = frame(&["one", "two", "three"]);
        assert!(a.diff_indices(&a.clone()).is_empty());
    }

    #[test]
    fn test_diff_reports_changed_lines_only() {
        let old = frame(&["one", "two", "three"]);
        let new = frame(&["one", "TWO", "three"]);
        assert_eq!(new.diff_indices(&old), vec![1]);
    }

    #[test]
    fn test_diff_counts_missing_lines_as_changed() {
        let old = frame(&["one", "two"]);
        let grown = frame(&["one", "two", "three"]);
        assert_eq!(grown.diff_indices(&old), vec![2]);

        // A line that vanished must be repainted (cleared) too.
        let shrunk = frame(&["one"]);
        assert_eq!(shrunk.diff_indices(&old), vec![1]);
    }

    #[test]
    fn test_render_paints_every_line() {
        let sink = Sink::default();
        let mut term = Terminal::with_writer(Box::new(sink.clone()));
        frame(&["alpha", "beta"]).render(&mut term).unwrap();

        let out = sink.contents();
        assert!(out.contains("alpha"));
        assert!(out.contains("beta"));
    }

    #[test]
    fn test_render_from_skips_identical_lines() {
        let sink = Sink::default();
        let mut term = Terminal::with_writer(Box::new(sink.clone()));

        let old = frame(&["alpha", "beta"]);
        let new = frame(&["alpha", "gamma"]);
        new.render_from(&old, &mut term).unwrap();

        let out = sink.contents();
        assert!(out.contains("gamma"));
        assert!(!out.contains("alpha"));
    }

    #[test]
    fn test_render_from_equal_frames_writes_no_text() {
        let sink = Sink::default();
        let mut term = Terminal::with_writer(Box::new(sink.clone()));

        let f = frame(&["alpha", "beta"]);
        f.render_from(&f.clone(), &mut term).unwrap();
        assert!(!sink.contents().contains("alpha"));
    }
}
