//! Command-based control for pumps.

/// Actions for controlling a pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpAction {
    /// Run for the default watering amount.
    Run,
    /// Run for the given milliseconds (`0` = default amount).
    RunFor(u32),
    /// Set the watering interval in days (`0` disables the schedule).
    SetInterval(i16),
    /// Set the default watering amount in milliseconds.
    SetWateringAmount(u32),
    /// Run if the schedule is due.
    Evaluate,
}

/// Command targeting a specific pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpCommand<Id> {
    pub pump_id: Id,
    pub action: PumpAction,
}

impl<Id> PumpCommand<Id> {
    /// Creates command.
    pub fn new(pump_id: Id, action: PumpAction) -> Self {
        Self { pump_id, action }
    }
}
