#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # lineweave-widgets
//!
//! Widgets that render into [`lineweave`] frames.
//!
//! Currently one widget lives here:
//! - **[`table`]** - a searchable, column-aligned view over a collection
//!   of records, with a bounded selection cursor

pub mod table;

pub use table::{Record, Table};
