//! Shared test infrastructure for water-pump integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use water_pump::{CalendarClock, TickSource};

// ============================================================================
// Mock Pins
// ============================================================================

/// Input pin whose level is driven by the test through a shared handle
#[derive(Clone, Default)]
pub struct MockInputPin {
    level: Rc<Cell<bool>>,
}

impl MockInputPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_high(&self) {
        self.level.set(true);
    }

    pub fn set_low(&self) {
        self.level.set(false);
    }
}

impl ErrorType for MockInputPin {
    type Error = core::convert::Infallible;
}

impl InputPin for MockInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

/// Output pin that records every level written to it
#[derive(Clone, Default)]
pub struct MockOutputPin {
    level: Rc<Cell<bool>>,
    history: Rc<RefCell<heapless::Vec<bool, 32>>>,
}

impl MockOutputPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set_high(&self) -> bool {
        self.level.get()
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().iter().copied().collect()
    }

    fn record(&self, high: bool) {
        self.level.set(high);
        let _ = self.history.borrow_mut().push(high);
    }
}

impl ErrorType for MockOutputPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

/// Pin fault reported by [`FaultyOutputPin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin that fails on selected writes
#[derive(Clone, Default)]
pub struct FaultyOutputPin {
    pub fail_high: bool,
    pub fail_low: bool,
}

impl ErrorType for FaultyOutputPin {
    type Error = PinFault;
}

impl OutputPin for FaultyOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail_low { Err(PinFault) } else { Ok(()) }
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail_high { Err(PinFault) } else { Ok(()) }
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Delay that returns immediately, recording each hold
///
/// Optionally samples an output pin during the hold and advances a calendar
/// clock by the held time.
#[derive(Clone, Default)]
pub struct MockDelay {
    holds: Rc<RefCell<heapless::Vec<u32, 16>>>,
    levels_during_hold: Rc<RefCell<heapless::Vec<bool, 16>>>,
    probe: Option<MockOutputPin>,
    clock: Option<MockCalendar>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample `pin` whenever a hold starts
    pub fn observing(mut self, pin: &MockOutputPin) -> Self {
        self.probe = Some(pin.clone());
        self
    }

    /// Advance `clock` by whole seconds of each hold
    pub fn advancing(mut self, clock: &MockCalendar) -> Self {
        self.clock = Some(clock.clone());
        self
    }

    pub fn holds(&self) -> Vec<u32> {
        self.holds.borrow().iter().copied().collect()
    }

    pub fn levels_during_hold(&self) -> Vec<bool> {
        self.levels_during_hold.borrow().iter().copied().collect()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        let _ = self.holds.borrow_mut().push(ms);
        if let Some(pin) = &self.probe {
            let _ = self.levels_during_hold.borrow_mut().push(pin.is_set_high());
        }
        if let Some(clock) = &self.clock {
            clock.advance(ms / 1000);
        }
    }
}

// ============================================================================
// Mock Clocks
// ============================================================================

/// Millisecond tick source with controllable time
pub struct MockTickSource {
    now: Cell<u32>,
}

impl MockTickSource {
    pub fn new(start: u32) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, ticks: u32) {
        self.now.set(ticks);
    }

    pub fn advance(&self, ticks: u32) {
        self.now.set(self.now.get().wrapping_add(ticks));
    }
}

impl TickSource<u32> for MockTickSource {
    fn now_ticks(&self) -> u32 {
        self.now.get()
    }
}

/// Calendar clock shared between a pump, its delay and the test
#[derive(Clone, Default)]
pub struct MockCalendar {
    secs: Rc<Cell<u32>>,
}

impl MockCalendar {
    pub fn new(start: u32) -> Self {
        Self {
            secs: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, secs: u32) {
        self.secs.set(self.secs.get() + secs);
    }
}

impl CalendarClock for MockCalendar {
    fn now_secs(&self) -> u32 {
        self.secs.get()
    }

    fn set_secs(&self, secs: u32) {
        self.secs.set(secs);
    }
}
