//! Whole-matrix debouncing.
//!
//! Rows are read into a candidate matrix. Any change anywhere in the candidate
//! restarts one shared countdown, and only when the countdown runs out is the
//! whole candidate copied into the settled matrix. A bounce on one row
//! therefore delays every row, but the settled matrix never mixes rows from
//! two different noise events.

/// One row of the matrix, bit `c` set when the switch in column `c` is closed
pub type RowBits = u32;

/// Outcome of one scan pass
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pass {
    /// Nothing pending, the settled matrix matches what was read
    Idle,
    /// A change is waiting out the debounce window
    Bouncing { remaining: u8 },
    /// The candidate was copied into the settled matrix
    Committed,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WindowDebouncer<const ROWS: usize> {
    settled: [RowBits; ROWS],
    candidate: [RowBits; ROWS],
    threshold: u8,
    remaining: u8,
}

impl<const ROWS: usize> WindowDebouncer<ROWS> {
    /// `threshold` is the number of passes a change must hold, counting the
    /// pass that saw it. 0 is treated as 1.
    pub fn new(threshold: u8) -> Self {
        WindowDebouncer {
            settled: [0; ROWS],
            candidate: [0; ROWS],
            threshold: threshold.max(1),
            remaining: 0,
        }
    }

    /// Everything released, nothing pending
    pub fn reset(&mut self) {
        self.settled = [0; ROWS];
        self.candidate = [0; ROWS];
        self.remaining = 0;
    }

    /// Record the raw read of one row. Returns if the candidate for that row
    /// changed, which restarts the window.
    pub fn update_row(&mut self, row: usize, bits: RowBits) -> bool {
        let Some(candidate) = self.candidate.get_mut(row) else {
            return false;
        };
        if *candidate == bits {
            return false;
        }
        *candidate = bits;
        if self.remaining != 0 {
            debug!("bounce!: {=u8}", self.remaining);
        }
        self.remaining = self.threshold;
        true
    }

    /// Close a pass over all rows: count the window down and commit the
    /// candidate once it runs out.
    pub fn finish_pass(&mut self) -> Pass {
        if self.remaining == 0 {
            return Pass::Idle;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.settled = self.candidate;
            Pass::Committed
        } else {
            Pass::Bouncing {
                remaining: self.remaining,
            }
        }
    }

    pub fn settled(&self) -> &[RowBits; ROWS] {
        &self.settled
    }

    /// True when no commit is pending
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }

    /// Passes left before the candidate is committed
    pub fn pending(&self) -> u8 {
        self.remaining
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}
