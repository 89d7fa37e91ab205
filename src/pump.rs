//! Interval-scheduled pump controller.
//!
//! Provides [`Pump`], which drives an output pin for a fixed hold time and
//! re-arms itself every `interval_days` after the last completed run. The
//! hold is delegated to an injected [`DelayNs`], so a run blocks the caller
//! for its whole duration: no polling or other schedule evaluation happens
//! while the pump is on.

use crate::command::PumpAction;
use crate::settings::{ByteStore, PumpSettings};
use crate::time::{CalendarClock, DAY_SECS};
use crate::types::{ActiveLevel, PumpState, SettingsError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Controls a single pump through an interval schedule.
///
/// The pin must already be configured as an output by the HAL.
///
/// # Type Parameters
/// * `'t` - Lifetime of the calendar clock reference
/// * `P` - Output pin type
/// * `D` - Blocking delay used for the hold
/// * `C` - Calendar clock implementation type
pub struct Pump<'t, P: OutputPin, D: DelayNs, C: CalendarClock> {
    pin: P,
    active: ActiveLevel,
    delay: D,
    clock: &'t C,
    state: PumpState,
    interval_days: i16,
    watering_amount: u32,
    last_run_at: u32,
    last_run_amount: u32,
}

impl<'t, P: OutputPin, D: DelayNs, C: CalendarClock> Pump<'t, P, D, C> {
    /// Creates an idle, unscheduled pump with an active-high output.
    ///
    /// The output is not touched until the first run.
    pub fn new(pin: P, delay: D, clock: &'t C) -> Self {
        Self::with_active_level(pin, ActiveLevel::High, delay, clock)
    }

    /// Creates an idle, unscheduled pump with the given output polarity.
    pub fn with_active_level(pin: P, active: ActiveLevel, delay: D, clock: &'t C) -> Self {
        Self {
            pin,
            active,
            delay,
            clock,
            state: PumpState::Idle,
            interval_days: 0,
            watering_amount: 0,
            last_run_at: 0,
            last_run_amount: 0,
        }
    }

    /// Runs for the default [`watering_amount`](Self::watering_amount).
    pub fn run(&mut self) -> Result<(), P::Error> {
        self.run_for(0)
    }

    /// Runs for `amount_ms` milliseconds, blocking until the hold ends.
    ///
    /// An amount of zero substitutes the default watering amount. The run is
    /// recorded once the output has been released, even if releasing it
    /// reported an error.
    pub fn run_for(&mut self, amount_ms: u32) -> Result<(), P::Error> {
        let amount = if amount_ms == 0 {
            self.watering_amount
        } else {
            amount_ms
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("pump: watering for {=u32} ms", amount);

        self.drive(true)?;
        self.state = PumpState::Running;

        self.delay.delay_ms(amount);

        let released = self.drive(false);
        self.state = PumpState::Idle;
        self.last_run_at = self.clock.now_secs();
        self.last_run_amount = amount;

        released
    }

    /// Seconds until the next scheduled run.
    ///
    /// Returns `0` when the schedule is disabled. Zero or negative values
    /// otherwise mean the run is due or overdue.
    pub fn time_until_next_run(&self) -> i64 {
        match self.next_due_at() {
            Some(due) => due - self.clock.now_secs() as i64,
            None => 0,
        }
    }

    /// Calendar time the next run is due, or `None` if the schedule is disabled.
    pub fn next_due_at(&self) -> Option<i64> {
        if self.interval_days > 0 {
            Some(self.last_run_at as i64 + self.interval_days as i64 * DAY_SECS)
        } else {
            None
        }
    }

    /// Runs once with the default amount if the schedule is due.
    ///
    /// Call once per loop tick. Returns `Ok(true)` if a run happened.
    pub fn evaluate_schedule(&mut self) -> Result<bool, P::Error> {
        match self.next_due_at() {
            Some(due) if due <= self.clock.now_secs() as i64 => {
                self.run()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Handles a pump action by dispatching to the appropriate method.
    ///
    /// # Returns
    /// * `Ok(true)` - The action ran the pump
    /// * `Ok(false)` - Configuration changed or schedule not due
    /// * `Err` - Driving the output failed
    pub fn handle_action(&mut self, action: PumpAction) -> Result<bool, P::Error> {
        match action {
            PumpAction::Run => self.run().map(|_| true),
            PumpAction::RunFor(amount_ms) => self.run_for(amount_ms).map(|_| true),
            PumpAction::SetInterval(days) => {
                self.set_interval_days(days);
                Ok(false)
            }
            PumpAction::SetWateringAmount(amount_ms) => {
                self.set_watering_amount(amount_ms);
                Ok(false)
            }
            PumpAction::Evaluate => self.evaluate_schedule(),
        }
    }

    /// Returns a snapshot of the persisted fields, stamped with the current
    /// calendar time.
    pub fn settings(&self) -> PumpSettings {
        PumpSettings {
            clock: self.clock.now_secs(),
            last_run_at: self.last_run_at,
            last_run_amount: self.last_run_amount,
            interval_days: self.interval_days,
            watering_amount: self.watering_amount,
        }
    }

    /// Restores schedule and history from `settings`.
    ///
    /// A positive stored clock resets the calendar clock.
    pub fn apply_settings(&mut self, settings: &PumpSettings) {
        if settings.clock > 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("pump: calendar clock reset to {=u32}", settings.clock);
            self.clock.set_secs(settings.clock);
        }
        self.last_run_at = settings.last_run_at;
        self.last_run_amount = settings.last_run_amount;
        self.interval_days = settings.interval_days;
        self.watering_amount = settings.watering_amount;
    }

    /// Saves the raw settings layout at `cursor` and returns the next free
    /// address, so several pumps can chain saves into one store.
    pub fn save_settings<S: ByteStore + ?Sized>(&self, store: &mut S, cursor: usize) -> usize {
        self.settings().write_raw(store, cursor)
    }

    /// Loads the raw settings layout at `cursor` and returns the next address.
    ///
    /// Nothing is validated: erased or corrupt storage loads garbage.
    /// Range-check [`interval_days`](Self::interval_days) afterwards, or use
    /// [`load_record`](Self::load_record).
    pub fn load_settings<S: ByteStore + ?Sized>(&mut self, store: &S, cursor: usize) -> usize {
        let (settings, next) = PumpSettings::read_raw(store, cursor);
        self.apply_settings(&settings);
        next
    }

    /// Saves a checked settings record at `cursor`.
    pub fn save_record<S: ByteStore + ?Sized>(
        &self,
        store: &mut S,
        cursor: usize,
    ) -> Result<usize, SettingsError> {
        self.settings().write_record(store, cursor)
    }

    /// Loads a checked settings record at `cursor`.
    ///
    /// On error the pump and the calendar clock are left untouched.
    pub fn load_record<S: ByteStore + ?Sized>(
        &mut self,
        store: &S,
        cursor: usize,
    ) -> Result<usize, SettingsError> {
        match PumpSettings::read_record(store, cursor) {
            Ok((settings, next)) => {
                self.apply_settings(&settings);
                Ok(next)
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("pump: rejected settings record: {}", err);
                Err(err)
            }
        }
    }

    /// Returns the current run state.
    pub fn state(&self) -> PumpState {
        self.state
    }

    /// Returns the watering period in days (`<= 0` means disabled).
    pub fn interval_days(&self) -> i16 {
        self.interval_days
    }

    /// Sets the watering period in days. `0` disables the schedule.
    pub fn set_interval_days(&mut self, days: i16) {
        self.interval_days = days;
    }

    /// Returns the default run duration in milliseconds.
    pub fn watering_amount(&self) -> u32 {
        self.watering_amount
    }

    /// Sets the default run duration in milliseconds.
    pub fn set_watering_amount(&mut self, amount_ms: u32) {
        self.watering_amount = amount_ms;
    }

    /// Calendar time the last run completed.
    pub fn last_run_at(&self) -> u32 {
        self.last_run_at
    }

    /// Duration of the last run in milliseconds.
    pub fn last_run_amount(&self) -> u32 {
        self.last_run_amount
    }

    /// Consumes the pump and returns the pin and delay.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn drive(&mut self, on: bool) -> Result<(), P::Error> {
        let high = on == (self.active == ActiveLevel::High);
        if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
