//! Keyboard matrix scanning and debouncing.
//!
//! A [`Matrix`] owns the row and column pins of a switch matrix. Each call to
//! [`Matrix::scan`] selects the rows one by one, reads the columns, and feeds
//! the result through a debouncer. The per-row bitmaps it settles on are what
//! a keymap layer reads back through [`Matrix::row`], [`Matrix::is_on`] and
//! friends.
//!
//! ```ignore
//! let bank = PinBank::new(rows, cols, Level::Low);
//! let layout = bank.layout(Level::Low);
//! let mut matrix: Matrix<_, _, 5, 16> = Matrix::new(bank, delay, layout, ScanConfig::default());
//!
//! loop {
//!     matrix.scan();
//!     if matrix.is_modified() {
//!         keymap.process(matrix.settled());
//!     }
//! }
//! ```
#![no_std]

#[macro_use]
mod fmt;

pub mod config;
pub mod debounce;
pub mod gpio;
pub mod layout;
pub mod matrix;

pub use config::{ColumnPin, Direction, Layout, Level, Pull, ScanConfig};
pub use debounce::{Pass, RowBits, WindowDebouncer};
pub use gpio::{Gpio, Line, PinBank};
pub use matrix::{Dump, Matrix};
