//! Battery and connection status
//!
//! Fed by external events only; the watch never polls sensors.

/// Last reported battery state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    /// Charge level, 0-100
    pub percent: u8,
    pub charging: bool,
}

/// Peripheral state shown on the face
///
/// `None` means no report has arrived yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeripheralStatus {
    pub battery: Option<BatteryStatus>,
    pub connected: Option<bool>,
}

impl PeripheralStatus {
    pub fn set_battery(&mut self, percent: u8, charging: bool) {
        self.battery = Some(BatteryStatus {
            percent: percent.min(100),
            charging,
        });
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = Some(connected);
    }
}
