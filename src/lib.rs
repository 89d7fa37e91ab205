#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`SimpleBtn`**: Tracks a polled button: rising edges, a sticky "was pressed" latch, press durations
//! - **`Pump`**: Drives a pump output for a hold time and re-arms every `interval_days`
//! - **`PumpSettings`**: The persisted schedule and history, with raw and checked encodings
//! - **`ByteStore`**: Trait to implement for your EEPROM or other byte-addressable storage
//! - **`TickSource`**: Trait to implement for your millisecond uptime counter
//! - **`CalendarClock`**: Trait to implement for your wall clock
//! - **`PumpAction`**: Commands that can be sent to control pumps
//!
//! Pins and the blocking hold use the `embedded-hal` 1.0 traits
//! (`InputPin`, `OutputPin`, `DelayNs`), so any HAL implementing them works.
//! Tick-clock durations are always computed with [`elapsed`], which survives
//! one counter wrap between readings.

pub mod button;
pub mod command;
pub mod pump;
pub mod settings;
pub mod time;
pub mod types;

pub use button::SimpleBtn;
pub use command::{PumpAction, PumpCommand};
pub use pump::Pump;
pub use settings::{
    ByteStore, MAX_INTERVAL_DAYS, PumpSettings, RAW_SETTINGS_LEN, RECORD_LEN, crc16,
};
pub use time::{CalendarClock, DAY_SECS, TickCounter, TickSource, elapsed};
pub use types::{ActiveLevel, ButtonState, PumpState, SettingsError};
