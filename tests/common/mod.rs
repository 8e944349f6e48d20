//! A simulated board for driving `Matrix` from tests.
//!
//! The board models every switch of the stock 5x16 layout. A row is selected
//! while its pin is an output at the row's active level, and a column reads
//! its active level while a selected row has that switch closed. Pin
//! operations and delays are recorded in one shared trace.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use keymatrix::layout::{self, AtmegaPin, COLS, ROWS};
use keymatrix::{Direction, Gpio, Layout, Level, Matrix, Pull, RowBits, ScanConfig};

pub type Frame = [RowBits; ROWS];
pub type TestMatrix = Matrix<Board, Delay, ROWS, COLS>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Event {
    Select(usize),
    Unselect(usize),
    Read(usize),
    DelayUs(u32),
    DelayMs(u32),
}

struct Inner {
    layout: Layout<AtmegaPin, ROWS, COLS>,
    script: VecDeque<Frame>,
    pressed: Frame,
    direction: [Direction; 24],
    level: [Level; 24],
    events: Vec<Event>,
    most_selected: usize,
}

impl Inner {
    fn row_of(&self, pin: AtmegaPin) -> Option<usize> {
        self.layout.rows.iter().position(|row| *row == pin)
    }

    fn col_of(&self, pin: AtmegaPin) -> Option<usize> {
        self.layout.cols.iter().position(|col| col.pin == pin)
    }

    fn is_selected(&self, pin: AtmegaPin) -> bool {
        self.direction[pin as usize] == Direction::Output
            && self.level[pin as usize] == self.layout.row_active
    }

    fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.layout
            .rows
            .iter()
            .enumerate()
            .filter(|(_, pin)| self.is_selected(**pin))
            .map(|(row, _)| row)
    }
}

/// Handle on the simulated board, shared with the `Board` and `Delay` a
/// matrix owns
#[derive(Clone)]
pub struct Sim(Rc<RefCell<Inner>>);

impl Sim {
    pub fn new() -> Self {
        Sim::with_layout(layout::teensy())
    }

    pub fn with_layout(layout: Layout<AtmegaPin, ROWS, COLS>) -> Self {
        Sim(Rc::new(RefCell::new(Inner {
            layout,
            script: VecDeque::new(),
            pressed: [0; ROWS],
            direction: [Direction::Input(Pull::None); 24],
            level: [Level::Low; 24],
            events: Vec::new(),
            most_selected: 0,
        })))
    }

    pub fn matrix(&self, debounce: u8) -> TestMatrix {
        let layout = self.0.borrow().layout;
        Matrix::new(
            Board(self.clone()),
            Delay(self.clone()),
            layout,
            ScanConfig::default().with_debounce(debounce),
        )
    }

    /// Hold these switches closed from now on
    pub fn press(&self, frame: Frame) {
        let mut inner = self.0.borrow_mut();
        inner.script.clear();
        inner.pressed = frame;
    }

    /// Switch to the next frame each time a pass selects row 0. The last
    /// frame stays closed once the script runs out.
    pub fn script(&self, frames: impl IntoIterator<Item = Frame>) {
        self.0.borrow_mut().script = frames.into_iter().collect();
    }

    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut self.0.borrow_mut().events)
    }

    /// Largest number of rows ever selected at the same time
    pub fn most_selected(&self) -> usize {
        self.0.borrow().most_selected
    }

    pub fn direction(&self, pin: AtmegaPin) -> Direction {
        self.0.borrow().direction[pin as usize]
    }
}

pub struct Board(Sim);

impl Gpio for Board {
    type Pin = AtmegaPin;

    fn set_direction(&mut self, pin: AtmegaPin, direction: Direction) {
        let mut inner = self.0 .0.borrow_mut();
        let was_selected = inner.is_selected(pin);
        inner.direction[pin as usize] = direction;
        let now_selected = inner.is_selected(pin);

        if let Some(row) = inner.row_of(pin) {
            if now_selected && !was_selected {
                if row == 0 {
                    if let Some(frame) = inner.script.pop_front() {
                        inner.pressed = frame;
                    }
                }
                inner.events.push(Event::Select(row));
            } else if was_selected && !now_selected {
                inner.events.push(Event::Unselect(row));
            }
        }

        let selected = inner.selected_rows().count();
        inner.most_selected = inner.most_selected.max(selected);
    }

    fn write(&mut self, pin: AtmegaPin, level: Level) {
        self.0 .0.borrow_mut().level[pin as usize] = level;
    }

    fn read(&mut self, pin: AtmegaPin) -> Level {
        let mut inner = self.0 .0.borrow_mut();
        let Some(col) = inner.col_of(pin) else {
            return inner.level[pin as usize];
        };
        inner.events.push(Event::Read(col));

        let active = inner.layout.cols[col].active;
        let closed = inner
            .selected_rows()
            .any(|row| inner.pressed[row] & (1 << col) != 0);
        if closed {
            active
        } else {
            !active
        }
    }
}

pub struct Delay(Sim);

impl DelayUs<u32> for Delay {
    fn delay_us(&mut self, us: u32) {
        self.0 .0.borrow_mut().events.push(Event::DelayUs(us));
    }
}

impl DelayMs<u32> for Delay {
    fn delay_ms(&mut self, ms: u32) {
        self.0 .0.borrow_mut().events.push(Event::DelayMs(ms));
    }
}
