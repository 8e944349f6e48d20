//! Pin assignment tables and scan timings

/// Electrical level of a pin
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Input bias resistor
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input(Pull),
    Output,
}

/// A column line and the level it reads at when a switch on the selected row
/// is closed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnPin<P> {
    pub pin: P,
    pub active: Level,
}

impl<P> ColumnPin<P> {
    /// Column pulled up, pulled low through a closed switch
    pub const fn active_low(pin: P) -> Self {
        ColumnPin {
            pin,
            active: Level::Low,
        }
    }

    pub const fn active_high(pin: P) -> Self {
        ColumnPin {
            pin,
            active: Level::High,
        }
    }

    /// The bias that holds the column at its inactive level while no switch
    /// is closed.
    pub fn pull(&self) -> Pull {
        match self.active {
            Level::Low => Pull::Up,
            Level::High => Pull::Down,
        }
    }
}

/// Which platform pin every row and column of the matrix is wired to
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Layout<P, const ROWS: usize, const COLS: usize> {
    pub rows: [P; ROWS],
    pub cols: [ColumnPin<P>; COLS],
    /// Level a row is driven to while selected. Unselected rows are left
    /// floating.
    pub row_active: Level,
}

impl<P: Copy, const ROWS: usize, const COLS: usize> Layout<P, ROWS, COLS> {
    pub fn new(rows: [P; ROWS], cols: [ColumnPin<P>; COLS], row_active: Level) -> Self {
        Layout {
            rows,
            cols,
            row_active,
        }
    }

    /// Rows driven low, columns pulled up: the usual diode matrix wiring
    pub fn active_low(rows: [P; ROWS], cols: [P; COLS]) -> Self {
        Layout {
            rows,
            cols: cols.map(ColumnPin::active_low),
            row_active: Level::Low,
        }
    }
}

/// Number of clean passes before a change is accepted
pub const DEFAULT_DEBOUNCE: u8 = 5;
/// Wait between selecting a row and reading the columns
pub const DEFAULT_SETTLE_US: u32 = 30;
/// Wait at the end of a pass while a change is still bouncing
pub const DEFAULT_BOUNCE_PAUSE_MS: u32 = 1;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    pub debounce: u8,
    pub settle_us: u32,
    pub bounce_pause_ms: u32,
}

impl ScanConfig {
    pub fn new(debounce: u8, settle_us: u32, bounce_pause_ms: u32) -> Self {
        ScanConfig {
            debounce,
            settle_us,
            bounce_pause_ms,
        }
        .with_debounce(debounce)
    }

    /// A threshold of 0 would never commit, so it is raised to 1.
    pub fn with_debounce(self, debounce: u8) -> Self {
        ScanConfig {
            debounce: debounce.max(1),
            ..self
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            debounce: DEFAULT_DEBOUNCE,
            settle_us: DEFAULT_SETTLE_US,
            bounce_pause_ms: DEFAULT_BOUNCE_PAUSE_MS,
        }
    }
}
