//! Core types shared by the button tracker, the pump and the settings codec.

/// Pin level that counts as "active" (button pressed, pump on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Active when the pin reads high.
    #[default]
    High,

    /// Active when the pin reads low (pull-up wiring).
    Low,
}

/// Tracked level of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Button is up.
    Released,

    /// Button is held down.
    Pressed,
}

/// Run state of a pump.
///
/// `Running` only exists for the duration of a blocking run. The pump is
/// mutably borrowed for that whole call, so callers only ever observe `Idle`;
/// the hold itself is visible through the output pin and the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpState {
    /// Output inactive.
    Idle,

    /// Output active, hold in progress.
    Running,
}

/// Checked settings record errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Record does not fit in the store at the given cursor.
    OutOfBounds {
        /// Cursor the record was requested at.
        cursor: usize,
        /// Capacity of the store.
        capacity: usize,
    },

    /// Leading tag byte does not match.
    BadTag(u8),

    /// Record was written by an unknown layout version.
    UnsupportedVersion(u8),

    /// Payload length byte does not match the layout.
    BadLength(u8),

    /// Stored checksum does not match the record contents.
    ChecksumMismatch {
        /// Checksum read from the store.
        stored: u16,
        /// Checksum computed over the record.
        computed: u16,
    },

    /// `interval_days` outside `0..=MAX_INTERVAL_DAYS`.
    InvalidInterval(i16),
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::OutOfBounds { cursor, capacity } => {
                write!(
                    f,
                    "settings record at {} does not fit in store of {} bytes",
                    cursor, capacity
                )
            }
            SettingsError::BadTag(tag) => {
                write!(f, "unexpected settings tag {:#04x}", tag)
            }
            SettingsError::UnsupportedVersion(version) => {
                write!(f, "unsupported settings version {}", version)
            }
            SettingsError::BadLength(len) => {
                write!(f, "unexpected settings payload length {}", len)
            }
            SettingsError::ChecksumMismatch { stored, computed } => {
                write!(
                    f,
                    "settings checksum mismatch: stored {:#06x}, computed {:#06x}",
                    stored, computed
                )
            }
            SettingsError::InvalidInterval(days) => {
                write!(f, "interval of {} days is out of range", days)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}
