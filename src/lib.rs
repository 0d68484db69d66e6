//! gapbuf :: a gap buffer for clustered edits around a single cursor
//!
//! [GapBuffer] stores a sequence of single byte units in one contiguous allocation with a
//! movable region of free space (the gap) sitting at the cursor. Inserting or deleting at the
//! cursor is O(1) amortized, moving the cursor costs a copy proportional to the distance moved.
//!
//! ```
//! use gapbuf::GapBuffer;
//!
//! let mut gb = GapBuffer::new()?;
//! gb.insert_str("hello")?;
//! gb.move_cursor_left(2);
//! gb.insert_char(b'X')?;
//! assert_eq!(gb.to_string(), "helXlo");
//!
//! gb.delete_before_cursor(1);
//! assert_eq!(gb.render_text(), b"hello");
//! # Ok::<(), gapbuf::Error>(())
//! ```
#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::style,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rustdoc::all
)]

use std::fmt;

pub mod buffer;
pub mod config;
pub mod log;

pub use buffer::{GapBuffer, Iter};
pub use config::Config;
pub use log::LogBuffer;

/// The environment variable that can be set to point at a config file for [Config::try_load].
pub const CONFIG_PATH_ENV_VAR: &str = "GAPBUF_CONFIG";

/// Errors that can be returned from operations on a [GapBuffer].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backing storage of the requested number of units could not be allocated.
    AllocationFailed {
        /// The total number of units (including the trailing sentinel) that was requested.
        requested: usize,
    },
    /// A NUL terminated view was requested but the text contains a NUL at this position.
    InteriorNul(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AllocationFailed { requested } => {
                write!(f, "unable to allocate storage for {requested} units")
            }
            Error::InteriorNul(pos) => write!(f, "text contains a NUL byte at position {pos}"),
        }
    }
}

impl std::error::Error for Error {}
