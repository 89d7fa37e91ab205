//! Polled button tracker with edge and press-duration detection.
//!
//! Provides [`SimpleBtn`], which follows a digital input through `Released`
//! and `Pressed` states, latches whether any press happened since the last
//! [`reset`](SimpleBtn::reset), and measures how long the latest press lasted.
//! All state changes happen while polling; nothing runs from interrupts.

use crate::time::{TickCounter, TickSource, elapsed};
use crate::types::{ActiveLevel, ButtonState};
use embedded_hal::digital::InputPin;

/// Tracks a single physical button.
///
/// The pin must already be configured as an input by the HAL. A failed pin
/// read is treated as "released".
///
/// # Type Parameters
/// * `'t` - Lifetime of the tick source reference
/// * `C` - Tick counter type
/// * `P` - Input pin type
/// * `T` - Tick source implementation type
pub struct SimpleBtn<'t, C: TickCounter, P: InputPin, T: TickSource<C>> {
    pin: P,
    active: ActiveLevel,
    tick_source: &'t T,
    state: ButtonState,
    was_pressed: bool,
    press_started_at: C,
    last_press_duration: C,
}

impl<'t, C: TickCounter, P: InputPin, T: TickSource<C>> SimpleBtn<'t, C, P, T> {
    /// Creates a tracker for an active-high button.
    pub fn new(pin: P, tick_source: &'t T) -> Self {
        Self::with_active_level(pin, ActiveLevel::High, tick_source)
    }

    /// Creates a tracker for a button with the given active level.
    pub fn with_active_level(pin: P, active: ActiveLevel, tick_source: &'t T) -> Self {
        Self {
            pin,
            active,
            tick_source,
            state: ButtonState::Released,
            was_pressed: false,
            press_started_at: tick_source.now_ticks(),
            last_press_duration: C::ZERO,
        }
    }

    /// Reads the pin and advances the tracked state.
    ///
    /// Returns the instantaneous level (`true` = pressed). A rising edge
    /// records the press start and latches [`was_pressed`](Self::was_pressed);
    /// a falling edge records the completed press duration.
    pub fn poll(&mut self) -> bool {
        let now_pressed = self.read_pin();

        match (self.state, now_pressed) {
            (ButtonState::Released, true) => {
                self.press_started_at = self.tick_source.now_ticks();
                self.state = ButtonState::Pressed;
                self.was_pressed = true;
            }
            (ButtonState::Pressed, false) => {
                let now = self.tick_source.now_ticks();
                self.last_press_duration = elapsed(now, self.press_started_at);
                self.state = ButtonState::Released;
            }
            _ => {}
        }

        now_pressed
    }

    /// Polls and returns `true` only on the rising edge of a press.
    ///
    /// Every call polls, so state advances even when `false` is returned.
    pub fn unique_press(&mut self) -> bool {
        let before = self.state;
        self.poll();
        before == ButtonState::Released && self.state == ButtonState::Pressed
    }

    /// Returns `true` if any press happened since the last reset.
    pub fn was_pressed(&self) -> bool {
        self.was_pressed
    }

    /// Clears the press latch. Level and duration tracking are unaffected.
    pub fn reset(&mut self) {
        self.was_pressed = false;
    }

    /// Duration of the ongoing press, or of the last completed one.
    ///
    /// Returns zero if no press happened since the last reset. Polls the pin
    /// first so a held button reports a live, growing value.
    ///
    /// Because it polls, this call can observe a rising edge itself. A
    /// following [`unique_press`](Self::unique_press) then returns `false`
    /// for that press.
    pub fn current_or_last_duration(&mut self) -> C {
        if !self.was_pressed {
            return C::ZERO;
        }

        if self.poll() {
            elapsed(self.tick_source.now_ticks(), self.press_started_at)
        } else {
            self.last_press_duration
        }
    }

    /// Duration of the last completed press, regardless of the latch.
    pub fn last_press_duration(&self) -> C {
        self.last_press_duration
    }

    /// Returns the tracked state as of the last poll.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Returns `true` if the button was held at the last poll.
    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }

    /// Returns the level this button treats as pressed.
    pub fn active_level(&self) -> ActiveLevel {
        self.active
    }

    /// Mutable access to the pin, e.g. to reconfigure pulls.
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Consumes the tracker and returns the pin.
    pub fn release(self) -> P {
        self.pin
    }

    fn read_pin(&mut self) -> bool {
        match self.active {
            ActiveLevel::High => self.pin.is_high().unwrap_or(false),
            ActiveLevel::Low => self.pin.is_low().unwrap_or(false),
        }
    }
}
