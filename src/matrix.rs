//! Scans a keyboard matrix
//!
//! One row is selected at a time and every column is read against it. The raw
//! rows go through a [`WindowDebouncer`], and the settled result is what the
//! queries report.
//!
//! # Ghosting
//!
//! Nothing here detects or masks ghost keys. On a matrix without a diode per
//! switch, three closed switches on the corners of a rectangle make the fourth
//! corner read as closed too, and that phantom press is reported like any
//! other. Use diode-isolated switches if that matters.
//!
//! # Sharing
//!
//! [`Matrix::scan`] takes `&mut self` and the queries take `&self`, so a
//! reader can never see the settled matrix halfway through a commit. To scan
//! from one context and query from an interrupt handler, put the matrix behind
//! a critical-section mutex.

use core::fmt::{self, Write};

use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::config::{Direction, Layout, Pull, ScanConfig};
use crate::debounce::{Pass, RowBits, WindowDebouncer};
use crate::gpio::Gpio;

pub struct Matrix<G: Gpio, D, const ROWS: usize, const COLS: usize> {
    gpio: G,
    delay: D,
    layout: Layout<G::Pin, ROWS, COLS>,
    config: ScanConfig,
    debouncer: WindowDebouncer<ROWS>,
}

impl<G, D, const ROWS: usize, const COLS: usize> Matrix<G, D, ROWS, COLS>
where
    G: Gpio,
    D: DelayUs<u32> + DelayMs<u32>,
{
    const ROW_FITS: () = assert!(
        COLS <= RowBits::BITS as usize,
        "too many columns for a row bitmap"
    );

    /// Takes the pins and configures them, see [`Matrix::init`]
    pub fn new(gpio: G, delay: D, layout: Layout<G::Pin, ROWS, COLS>, config: ScanConfig) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ROW_FITS;

        let mut matrix = Matrix {
            gpio,
            delay,
            layout,
            config,
            debouncer: WindowDebouncer::new(config.debounce),
        };
        matrix.init();
        matrix
    }

    /// Put every row in its released state, bias every column towards its
    /// inactive level, and forget all key state. Safe to call again at any
    /// time.
    pub fn init(&mut self) {
        for row in self.layout.rows {
            self.unselect(row);
        }
        for col in self.layout.cols {
            self.gpio.set_direction(col.pin, Direction::Input(col.pull()));
        }
        self.debouncer.reset();
        info!(
            "matrix init: {=usize}x{=usize}, debounce {=u8}",
            ROWS,
            COLS,
            self.debouncer.threshold()
        );
    }

    /// Read every row once and feed the debouncer.
    ///
    /// While a change is still bouncing this waits for the configured pause
    /// before returning, so a tight caller loop doesn't spin on reads that
    /// can't commit yet. With nothing pending it returns straight away.
    pub fn scan(&mut self) -> Pass {
        for (row, pin) in self.layout.rows.into_iter().enumerate() {
            self.select(pin);
            self.delay.delay_us(self.config.settle_us);
            let bits = self.read_cols();
            self.debouncer.update_row(row, bits);
            self.unselect(pin);
        }

        let pass = self.debouncer.finish_pass();
        match pass {
            Pass::Idle => {}
            Pass::Bouncing { .. } => self.delay.delay_ms(self.config.bounce_pause_ms),
            Pass::Committed => debug!("matrix settled, {=usize} keys down", self.key_count()),
        }
        trace!("scan: {}", pass);
        pass
    }

    pub fn free(self) -> (G, D) {
        (self.gpio, self.delay)
    }

    fn select(&mut self, pin: G::Pin) {
        // Level first, so the line never drives the inactive level
        self.gpio.write(pin, self.layout.row_active);
        self.gpio.set_direction(pin, Direction::Output);
    }

    /// Left floating: a line shared with a column must not fight it
    fn unselect(&mut self, pin: G::Pin) {
        self.gpio.set_direction(pin, Direction::Input(Pull::None));
    }

    fn read_cols(&mut self) -> RowBits {
        let mut bits = 0;
        for (col, column) in self.layout.cols.iter().enumerate() {
            if self.gpio.read(column.pin) == column.active {
                bits |= 1 << col;
            }
        }
        bits
    }
}

impl<G: Gpio, D, const ROWS: usize, const COLS: usize> Matrix<G, D, ROWS, COLS> {
    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cols(&self) -> usize {
        COLS
    }

    /// True when no change is waiting to be committed
    pub fn is_modified(&self) -> bool {
        self.debouncer.is_settled()
    }

    pub fn is_on(&self, row: usize, col: usize) -> bool {
        col < COLS && self.row(row) & (1 << col) != 0
    }

    /// Settled bitmap of one row, 0 past the last row
    pub fn row(&self, row: usize) -> RowBits {
        self.debouncer.settled().get(row).copied().unwrap_or(0)
    }

    pub fn settled(&self) -> &[RowBits; ROWS] {
        self.debouncer.settled()
    }

    /// Number of keys down in the settled matrix
    pub fn key_count(&self) -> usize {
        self.debouncer
            .settled()
            .iter()
            .map(|row| row.count_ones() as usize)
            .sum()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout<G::Pin, ROWS, COLS> {
        &self.layout
    }

    pub fn dump(&self) -> Dump<'_, ROWS, COLS> {
        Dump(self.debouncer.settled())
    }
}

/// Printable picture of the settled matrix, one line per row with column 0
/// on the left
///
/// ```text
/// r/c 0123456789ABCDEF
/// 00: 0000000000000000
/// 01: 0010000000000000
/// ```
pub struct Dump<'a, const ROWS: usize, const COLS: usize>(&'a [RowBits; ROWS]);

impl<const ROWS: usize, const COLS: usize> fmt::Display for Dump<'_, ROWS, COLS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("r/c ")?;
        for col in 0..COLS {
            write!(f, "{:X}", col % 16)?;
        }
        f.write_char('\n')?;

        for (row, bits) in self.0.iter().enumerate() {
            write!(f, "{:02X}: ", row)?;
            for col in 0..COLS {
                f.write_char(if bits & (1 << col) != 0 { '1' } else { '0' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
