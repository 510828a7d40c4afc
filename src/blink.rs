use std::future::Future;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, span, trace, Level as TraceLevel};

use crate::config::BlinkConfig;
use crate::error::BlinkError;
use crate::gpio::{ChipOf, GpioBackend, GpioChip, GpioLine, Level, OutputLine, OutputOf};

/// Opens the named controller.
pub fn initialize<B: GpioBackend>(backend: &B, config: &BlinkConfig) -> Result<B::Chip, BlinkError> {
    config.validate()?;
    let chip = backend.open_chip(&config.chip_name)?;
    info!("GPIO chip '{}' opened successfully", config.chip_name);
    Ok(chip)
}

pub fn acquire_line<C: GpioChip>(chip: &mut C, offset: u32) -> Result<C::Line, BlinkError> {
    let line = chip.line(offset)?;
    info!("GPIO line {} acquired", offset);
    Ok(line)
}

pub fn request_output<L: GpioLine>(line: L, consumer: &str, initial: Level) -> Result<L::Output, BlinkError> {
    let offset = line.offset();
    let output = line.request_output(consumer, initial)?;
    info!("GPIO line {} requested as output by '{}'", offset, consumer);
    Ok(output)
}

/// Owns the controller and the requested line for the life of the process.
///
/// Field order matters: the output is dropped (line released) before the chip
/// is closed.
pub struct BlinkController<B: GpioBackend> {
    output: OutputOf<B>,
    _chip: ChipOf<B>,
    config: BlinkConfig,
    level: Level,
    toggles: u64,
}

impl<B: GpioBackend> BlinkController<B> {
    /// Runs the whole acquisition chain. Whatever was acquired before a
    /// failing step is released when this returns the error.
    pub fn open(backend: &B, config: BlinkConfig) -> Result<Self, BlinkError> {
        let _span_ = span!(TraceLevel::DEBUG, "BlinkController::open", chip = %config.chip_name, offset = config.line_offset).entered();
        let mut chip = initialize(backend, &config)?;
        let line = acquire_line(&mut chip, config.line_offset)?;
        let output = request_output(line, &config.consumer, Level::Low)?;
        Ok(Self {
            output,
            _chip: chip,
            config,
            level: Level::Low,
            toggles: 0,
        })
    }

    pub fn config(&self) -> &BlinkConfig {
        &self.config
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn toggles(&self) -> u64 {
        self.toggles
    }

    pub fn set_level(&mut self, level: Level) -> Result<(), BlinkError> {
        self.output.set_level(level)?;
        trace!("Line {} -> {}", self.output.offset(), level);
        self.level = level;
        Ok(())
    }

    /// Alternates HIGH and LOW every half-period until `shutdown` resolves.
    ///
    /// The first transition happens immediately. A stop request wakes the loop
    /// in the middle of a half-period. A write fault ends the loop with the
    /// error and is never retried.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), BlinkError>
    where
        F: Future<Output = ()>,
    {
        let half_period = self.config.half_period();
        info!(
            "LED blinking at {} Hz (half-period {:?}). Press Ctrl+C to stop.",
            self.config.frequency_hz, half_period
        );
        tokio::pin!(shutdown);
        let mut ticker = time::interval(half_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Stop requested after {} toggles", self.toggles);
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }
            self.set_level(!self.level)?;
            self.toggles += 1;
        }
    }

    /// Releases the line and closes the chip. Dropping the controller does
    /// the same, this only adds the log lines.
    pub fn close(self) {
        info!("Releasing GPIO line {} and chip '{}'", self.config.line_offset, self.config.chip_name);
        drop(self);
        debug!("GPIO resources released");
    }
}
