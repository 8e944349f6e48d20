//! The pin operations the scanner needs from the platform, and an adapter for
//! embedded-hal pins

use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin, PinState};
use heapless::Vec;

use crate::config::{ColumnPin, Direction, Layout, Level};

/// Digital pin access keyed by a platform pin identifier.
///
/// Reads are taken at face value: there is no failure path for a pin that
/// cannot be read.
pub trait Gpio {
    type Pin: Copy;

    fn set_direction(&mut self, pin: Self::Pin, direction: Direction);
    fn write(&mut self, pin: Self::Pin, level: Level);
    fn read(&mut self, pin: Self::Pin) -> Level;
}

impl<T: Gpio + ?Sized> Gpio for &mut T {
    type Pin = T::Pin;

    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) {
        (**self).set_direction(pin, direction)
    }

    fn write(&mut self, pin: Self::Pin, level: Level) {
        (**self).write(pin, level)
    }

    fn read(&mut self, pin: Self::Pin) -> Level {
        (**self).read(pin)
    }
}

/// Pin identifier of a [`PinBank`]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    Row(usize),
    Col(usize),
}

/// Already-configured embedded-hal pins, rows as outputs and columns as biased
/// inputs.
///
/// embedded-hal 0.2 pins cannot change direction in place, so a row is
/// released by driving its inactive level. Rows that share a line with
/// anything else should be open-drain pins, where the inactive level is high
/// impedance.
pub struct PinBank<R, C, const ROWS: usize, const COLS: usize> {
    rows: Vec<R, ROWS>,
    cols: Vec<C, COLS>,
    row_active: Level,
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl<R, C, const ROWS: usize, const COLS: usize> PinBank<R, C, ROWS, COLS>
where
    R: OutputPin<Error = Infallible>,
    C: InputPin<Error = Infallible>,
{
    pub fn new(rows: Vec<R, ROWS>, cols: Vec<C, COLS>, row_active: Level) -> Self {
        PinBank {
            rows,
            cols,
            row_active,
        }
    }

    /// The pin table addressing this bank, for columns reading `col_active`
    /// when closed
    pub fn layout(&self, col_active: Level) -> Layout<Line, ROWS, COLS> {
        Layout::new(
            core::array::from_fn(Line::Row),
            core::array::from_fn(|col| ColumnPin {
                pin: Line::Col(col),
                active: col_active,
            }),
            self.row_active,
        )
    }

    pub fn free(self) -> (Vec<R, ROWS>, Vec<C, COLS>) {
        (self.rows, self.cols)
    }

    fn drive(&mut self, row: usize, level: Level) {
        if let Some(pin) = self.rows.get_mut(row) {
            infallible(pin.set_state(PinState::from(level == Level::High)));
        }
    }
}

impl<R, C, const ROWS: usize, const COLS: usize> Gpio for PinBank<R, C, ROWS, COLS>
where
    R: OutputPin<Error = Infallible>,
    C: InputPin<Error = Infallible>,
{
    type Pin = Line;

    fn set_direction(&mut self, pin: Line, direction: Direction) {
        // Column bias is fixed when the HAL pin is configured
        if let (Line::Row(row), Direction::Input(_)) = (pin, direction) {
            self.drive(row, !self.row_active);
        }
    }

    fn write(&mut self, pin: Line, level: Level) {
        if let Line::Row(row) = pin {
            self.drive(row, level);
        }
    }

    /// Rows, and columns outside the bank, read high
    fn read(&mut self, pin: Line) -> Level {
        match pin {
            Line::Col(col) => match self.cols.get(col) {
                Some(input) => Level::from(infallible(input.is_high())),
                None => Level::High,
            },
            Line::Row(_) => Level::High,
        }
    }
}
