use std::path::PathBuf;
use std::time::Duration;

use crate::error::BlinkError;

/// Name of the GPIO controller, as listed under `/dev`.
pub const GPIO_CHIP_NAME: &str = "gpiochip0";
/// BCM numbering, not the physical header pin.
pub const LED_LINE_OFFSET: u32 = 18;
pub const BLINK_FREQUENCY_HZ: u32 = 5;
pub const CONSUMER_LABEL: &str = "led_blink";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlinkConfig {
    pub chip_name: String,
    pub line_offset: u32,
    pub frequency_hz: u32,
    pub consumer: String,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            chip_name: GPIO_CHIP_NAME.to_string(),
            line_offset: LED_LINE_OFFSET,
            frequency_hz: BLINK_FREQUENCY_HZ,
            consumer: CONSUMER_LABEL.to_string(),
        }
    }
}

impl BlinkConfig {
    pub fn validate(&self) -> Result<(), BlinkError> {
        if self.frequency_hz == 0 || self.half_period().is_zero() {
            return Err(BlinkError::InvalidFrequency(self.frequency_hz));
        }
        Ok(())
    }

    /// One full on/off cycle, truncated to whole milliseconds.
    pub fn period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frequency_hz.max(1)))
    }

    pub fn half_period(&self) -> Duration {
        self.period() / 2
    }

    pub fn chip_path(&self) -> PathBuf {
        chip_path(&self.chip_name)
    }
}

/// A bare name like `gpiochip0` lives under `/dev`, anything with a slash is taken as a path.
pub fn chip_path(name: &str) -> PathBuf {
    if name.contains('/') {
        PathBuf::from(name)
    } else {
        PathBuf::from("/dev").join(name)
    }
}
