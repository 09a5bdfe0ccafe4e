//! Raw input tokens.
//!
//! The input loop hands each read to the active mode verbatim, as a
//! decoded string. These constants are the tokens worth comparing against;
//! there is no abstraction beyond string equality.

use crate::cursor::Cursor;

/// Escape.
pub const ESC: &str = "\x1b";
/// Up arrow.
pub const UP: &str = "\x1b[A";
/// Down arrow.
pub const DOWN: &str = "\x1b[B";
/// Right arrow.
pub const RIGHT: &str = "\x1b[C";
/// Left arrow.
pub const LEFT: &str = "\x1b[D";
/// Forward delete.
pub const DELETE: &str = "\x1b[3~";
/// Backspace.
pub const BACKSPACE: &str = "\u{7f}";
/// Ctrl-A.
pub const CTRL_A: &str = "\x01";
/// Ctrl-B.
pub const CTRL_B: &str = "\x02";
/// Ctrl-C.
pub const CTRL_C: &str = "\x03";
/// Enter (a carriage return in raw mode).
pub const ENTER: &str = "\r";

/// Key schemes for driving a [`Cursor`] from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// w/a/s/d.
    Wasd,
    /// The arrow keys.
    Arrows,
    /// h/j/k/l.
    Vi,
}

/// Route an input token to the matching bounded cursor step.
///
/// Returns true iff the token belongs to the scheme, whether or not the
/// cursor had room to move.
pub fn move_cursor(scheme: Scheme, input: &str, cursor: &mut Cursor) -> bool {
    match scheme {
        Scheme::Wasd => match input {
            "w" => {
                cursor.up();
            }
            "a" => {
                cursor.left();
            }
            "s" => {
                cursor.down();
            }
            "d" => {
                cursor.right();
            }
            _ => return false,
        },
        Scheme::Arrows => match input {
            UP => {
                cursor.up();
            }
            LEFT => {
                cursor.left();
            }
            DOWN => {
                cursor.down();
            }
            RIGHT => {
                cursor.right();
            }
            _ => return false,
        },
        Scheme::Vi => match input {
            "k" => {
                cursor.up();
            }
            "h" => {
                cursor.left();
            }
            "j" => {
                cursor.down();
            }
            "l" => {
                cursor.right();
            }
            _ => return false,
        },
    }
    true
}
