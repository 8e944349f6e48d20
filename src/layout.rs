//! Pin table of the stock 5x16 board on a Teensy 2.0 (ATmega32U4)
//!
//! ```text
//! col: 0   1   2   3   4   5   6   7   8   9   10  11  12  13  14  15
//! pin: F0  B3  B2  B1  B0  B7  D0  D1  D2  D3  D5  D6  D7  B4  B5  B6
//!
//! row: 0   1   2   3   4
//! pin: F7  F6  F5  F4  F1
//! ```
//!
//! Rows are driven low to select them and columns are pulled up. Both are
//! inverted to "1 = pressed" by the scanner.

use crate::config::Layout;

pub const ROWS: usize = 5;
pub const COLS: usize = 16;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    B,
    D,
    F,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AtmegaPin {
    B0, B1, B2, B3, B4, B5, B6, B7,
    D0, D1, D2, D3, D4, D5, D6, D7,
    F0, F1, F2, F3, F4, F5, F6, F7,
}

impl AtmegaPin {
    pub const fn port(self) -> Port {
        match self as u8 / 8 {
            0 => Port::B,
            1 => Port::D,
            _ => Port::F,
        }
    }

    pub const fn bit(self) -> u8 {
        self as u8 % 8
    }

    /// Mask of this pin in its port's DDR/PORT/PIN registers
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }
}

pub fn teensy() -> Layout<AtmegaPin, ROWS, COLS> {
    use AtmegaPin::*;

    #[rustfmt::skip]
    let layout = Layout::active_low(
        [F7, F6, F5, F4, F1],
        [
            F0, B3, B2, B1, B0, B7, D0, D1,
            D2, D3, D5, D6, D7, B4, B5, B6,
        ],
    );
    layout
}
