#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # lineweave
//!
//! A minimal line-diffing terminal UI runtime.
//!
//! lineweave owns the raw terminal session and runs a small concurrent
//! engine around a line-oriented view abstraction:
//!
//! - **[`Frame`]** - one screen's worth of lines, repainted either in full
//!   or differentially against the previous frame, so redraw cost scales
//!   with what changed rather than with the screen height
//! - **[`Cursor`]** - a bounded 2D position tracker, used for the screen
//!   cursor and for list selection alike
//! - **[`App`]** - the application loop: a render thread and an input loop
//!   synchronized through a mutex + condition variable, plus an optional
//!   resize poller; input is dispatched to the active [`Mode`]
//! - **[`key`]** - the raw input tokens handlers compare against
//! - **[`Terminal`]** - the thin crossterm-backed driver everything draws
//!   through
//!
//! ## Example
//!
//! ```rust,ignore
//! use lineweave::{App, Context, Frame, Mode, key};
//!
//! struct Hello;
//!
//! impl Mode for Hello {
//!     fn render(&mut self, rows: u16, _cols: u16) -> Frame {
//!         let mut frame = Frame::blank(rows as usize);
//!         frame.set_line(0, "Hello! Press q to quit.");
//!         frame
//!     }
//!
//!     fn on_input(&mut self, input: &str, ctx: &mut Context<'_>) {
//!         if input == "q" || input == key::CTRL_C {
//!             ctx.quit();
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), lineweave::Error> {
//!     let mut app = App::new();
//!     app.add_mode(0, Hello);
//!     app.run()
//! }
//! ```

pub mod app;
pub mod cursor;
pub mod error;
pub mod frame;
pub mod key;
pub mod terminal;

pub use app::{App, AppHandle, AppOptions, Context, FnMode, Mode, ModeId};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use frame::Frame;
pub use terminal::Terminal;
