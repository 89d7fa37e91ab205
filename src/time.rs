//! Clock abstractions and wrap-safe elapsed-time arithmetic.

use core::ops::{Add, Sub};

/// Seconds in one calendar day.
pub const DAY_SECS: i64 = 86_400;

/// Trait abstraction for wrapping tick counter values.
///
/// Implemented for the unsigned integer widths a hardware millisecond
/// counter is usually exposed as.
pub trait TickCounter: Copy + Ord + Add<Output = Self> + Sub<Output = Self> {
    /// Zero ticks.
    const ZERO: Self;

    /// Largest value before the counter wraps back to zero.
    const MAX: Self;
}

macro_rules! impl_tick_counter {
    ($($t:ty),*) => {
        $(
            impl TickCounter for $t {
                const ZERO: Self = 0;
                const MAX: Self = <$t>::MAX;
            }
        )*
    };
}

impl_tick_counter!(u8, u16, u32, u64);

/// Trait for abstracting the monotonic tick clock (milliseconds since boot).
pub trait TickSource<C: TickCounter> {
    /// Returns the current counter value.
    fn now_ticks(&self) -> C;
}

/// Trait for abstracting the calendar clock (seconds since epoch).
///
/// `set_secs` takes `&self` so the clock can be shared by several
/// components; implementations use interior mutability.
pub trait CalendarClock {
    /// Returns the current calendar time.
    fn now_secs(&self) -> u32;

    /// Resets the calendar time.
    fn set_secs(&self, secs: u32);
}

/// Duration elapsed from `older` to `newer` on a wrapping counter.
///
/// If `newer < older` the counter is assumed to have wrapped exactly once and
/// the result is `newer + (MAX - older)`. Two readings taken more than one
/// full counter period apart yield a duration that is too small; callers that
/// can go that long between polls need a wider counter.
#[inline]
pub fn elapsed<C: TickCounter>(newer: C, older: C) -> C {
    if newer < older {
        newer + (C::MAX - older)
    } else {
        newer - older
    }
}
