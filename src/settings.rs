//! Persistent pump settings.
//!
//! Two encodings of the same five fields are provided:
//!
//! - **Raw layout**: the fields back to back, little-endian, no framing.
//!   Byte-compatible with EEPROM images written by 8-bit AVR firmware
//!   (`time_t` and `unsigned long` are 4 bytes, `int` is 2). Nothing is
//!   checked; uninitialized storage decodes to garbage.
//! - **Checked record**: the raw payload wrapped with a tag, a version, a
//!   length byte and a CRC-16, so corruption is reported instead of loaded.
//!
//! | offset | field             | width |
//! |--------|-------------------|-------|
//! | 0      | calendar clock    | 4     |
//! | 4      | `last_run_at`     | 4     |
//! | 8      | `last_run_amount` | 4     |
//! | 12     | `interval_days`   | 2     |
//! | 14     | `watering_amount` | 4     |

use crate::types::SettingsError;
use heapless::Vec;

/// Length of the raw settings layout in bytes.
pub const RAW_SETTINGS_LEN: usize = 18;

/// First byte of a checked record.
pub const RECORD_TAG: u8 = 0x57;

/// Layout version written into checked records.
pub const RECORD_VERSION: u8 = 1;

const RECORD_HEADER_LEN: usize = 3;
const RECORD_CRC_LEN: usize = 2;

/// Length of a checked record in bytes.
pub const RECORD_LEN: usize = RECORD_HEADER_LEN + RAW_SETTINGS_LEN + RECORD_CRC_LEN;

/// Longest watering interval a checked record accepts.
pub const MAX_INTERVAL_DAYS: i16 = 365;

/// Value read back from erased or out-of-range storage.
pub const ERASED_BYTE: u8 = 0xFF;

/// Trait for abstracting byte-addressable persistent storage (EEPROM, flash
/// emulation, battery-backed RAM).
///
/// Implementations decide what happens outside `0..capacity()`; the raw codec
/// does not check. Wear and atomicity are platform properties.
pub trait ByteStore {
    /// Number of addressable bytes.
    fn capacity(&self) -> usize;

    /// Reads the byte at `address`.
    fn read_byte(&self, address: usize) -> u8;

    /// Writes `byte` at `address`.
    fn write_byte(&mut self, address: usize, byte: u8);
}

/// RAM-backed store. Out-of-range reads return [`ERASED_BYTE`], out-of-range
/// writes are dropped.
impl<const N: usize> ByteStore for [u8; N] {
    fn capacity(&self) -> usize {
        N
    }

    fn read_byte(&self, address: usize) -> u8 {
        self.get(address).copied().unwrap_or(ERASED_BYTE)
    }

    fn write_byte(&mut self, address: usize, byte: u8) {
        if let Some(slot) = self.get_mut(address) {
            *slot = byte;
        }
    }
}

/// Snapshot of everything a pump persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpSettings {
    /// Calendar time when the snapshot was taken.
    pub clock: u32,
    /// Calendar time the last run completed.
    pub last_run_at: u32,
    /// Duration of the last run in milliseconds.
    pub last_run_amount: u32,
    /// Watering period in days; `<= 0` disables the schedule.
    pub interval_days: i16,
    /// Default run duration in milliseconds.
    pub watering_amount: u32,
}

impl PumpSettings {
    /// Encodes the raw layout.
    pub fn to_bytes(&self) -> [u8; RAW_SETTINGS_LEN] {
        let mut out = [0u8; RAW_SETTINGS_LEN];
        out[0..4].copy_from_slice(&self.clock.to_le_bytes());
        out[4..8].copy_from_slice(&self.last_run_at.to_le_bytes());
        out[8..12].copy_from_slice(&self.last_run_amount.to_le_bytes());
        out[12..14].copy_from_slice(&self.interval_days.to_le_bytes());
        out[14..18].copy_from_slice(&self.watering_amount.to_le_bytes());
        out
    }

    /// Decodes the raw layout. Never fails.
    pub fn from_bytes(bytes: &[u8; RAW_SETTINGS_LEN]) -> Self {
        Self {
            clock: le_u32(bytes, 0),
            last_run_at: le_u32(bytes, 4),
            last_run_amount: le_u32(bytes, 8),
            interval_days: i16::from_le_bytes([bytes[12], bytes[13]]),
            watering_amount: le_u32(bytes, 14),
        }
    }

    /// Writes the raw layout at `cursor` and returns the cursor past it.
    pub fn write_raw<S: ByteStore + ?Sized>(&self, store: &mut S, cursor: usize) -> usize {
        write_bytes(store, cursor, &self.to_bytes())
    }

    /// Reads the raw layout at `cursor`, returning the settings and the cursor
    /// past them. No validation is done.
    pub fn read_raw<S: ByteStore + ?Sized>(store: &S, cursor: usize) -> (Self, usize) {
        let bytes: [u8; RAW_SETTINGS_LEN] =
            core::array::from_fn(|i| store.read_byte(cursor.wrapping_add(i)));
        (Self::from_bytes(&bytes), cursor.wrapping_add(RAW_SETTINGS_LEN))
    }

    /// Checks that the values are plausible for a pump schedule.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if (0..=MAX_INTERVAL_DAYS).contains(&self.interval_days) {
            Ok(())
        } else {
            Err(SettingsError::InvalidInterval(self.interval_days))
        }
    }

    /// Writes a checked record at `cursor` and returns the cursor past it.
    ///
    /// Nothing is written if the settings fail [`validate`](Self::validate)
    /// or the record does not fit.
    pub fn write_record<S: ByteStore + ?Sized>(
        &self,
        store: &mut S,
        cursor: usize,
    ) -> Result<usize, SettingsError> {
        check_bounds(store.capacity(), cursor)?;
        self.validate()?;

        let body: Vec<u8, RECORD_LEN> = [RECORD_TAG, RECORD_VERSION, RAW_SETTINGS_LEN as u8]
            .into_iter()
            .chain(self.to_bytes())
            .collect();
        let crc = crc16(&body);

        let next = write_bytes(store, cursor, &body);
        Ok(write_bytes(store, next, &crc.to_le_bytes()))
    }

    /// Reads and verifies a checked record at `cursor`.
    pub fn read_record<S: ByteStore + ?Sized>(
        store: &S,
        cursor: usize,
    ) -> Result<(Self, usize), SettingsError> {
        check_bounds(store.capacity(), cursor)?;

        let record: Vec<u8, RECORD_LEN> =
            (cursor..cursor + RECORD_LEN).map(|a| store.read_byte(a)).collect();

        if record[0] != RECORD_TAG {
            return Err(SettingsError::BadTag(record[0]));
        }
        if record[1] != RECORD_VERSION {
            return Err(SettingsError::UnsupportedVersion(record[1]));
        }
        if record[2] as usize != RAW_SETTINGS_LEN {
            return Err(SettingsError::BadLength(record[2]));
        }

        let body_len = RECORD_LEN - RECORD_CRC_LEN;
        let stored = u16::from_le_bytes([record[body_len], record[body_len + 1]]);
        let computed = crc16(&record[..body_len]);
        if stored != computed {
            return Err(SettingsError::ChecksumMismatch { stored, computed });
        }

        let payload: [u8; RAW_SETTINGS_LEN] =
            core::array::from_fn(|i| record[RECORD_HEADER_LEN + i]);
        let settings = Self::from_bytes(&payload);
        settings.validate()?;

        Ok((settings, cursor + RECORD_LEN))
    }
}

/// CRC-16/CCITT-FALSE (poly `0x1021`, init `0xFFFF`, no reflection).
pub fn crc16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0xFFFF, |crc, &byte| {
        let mut crc = crc ^ ((byte as u16) << 8);
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
        crc
    })
}

fn check_bounds(capacity: usize, cursor: usize) -> Result<(), SettingsError> {
    match cursor.checked_add(RECORD_LEN) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(SettingsError::OutOfBounds { cursor, capacity }),
    }
}

fn write_bytes<S: ByteStore + ?Sized>(store: &mut S, cursor: usize, bytes: &[u8]) -> usize {
    for (offset, &byte) in bytes.iter().enumerate() {
        store.write_byte(cursor.wrapping_add(offset), byte);
    }
    cursor.wrapping_add(bytes.len())
}

#[inline]
fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
