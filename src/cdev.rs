use gpio_cdev::{Chip, Line, LineHandle, LineRequestFlags};
use tracing::{debug, trace};

use crate::config::chip_path;
use crate::error::BlinkError;
use crate::gpio::{GpioBackend, GpioChip, GpioLine, Level, OutputLine};

/// Linux GPIO character device (`/dev/gpiochipN`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Cdev;

pub struct CdevChip {
    name: String,
    chip: Chip,
}

pub struct CdevLine {
    line: Line,
}

pub struct CdevOutput {
    offset: u32,
    handle: LineHandle,
}

impl GpioBackend for Cdev {
    type Chip = CdevChip;

    fn open_chip(&self, name: &str) -> Result<CdevChip, BlinkError> {
        let chip = Chip::new(chip_path(name)).map_err(|e| BlinkError::ControllerOpen {
            chip: name.to_string(),
            source: e.into(),
        })?;
        debug!(
            "Chip {} ({}) has {} lines",
            chip.name(),
            chip.label(),
            chip.num_lines()
        );
        Ok(CdevChip {
            name: name.to_string(),
            chip,
        })
    }
}

impl GpioChip for CdevChip {
    type Line = CdevLine;

    fn line(&mut self, offset: u32) -> Result<CdevLine, BlinkError> {
        let line = self
            .chip
            .get_line(offset)
            .map_err(|e| BlinkError::LineAcquire {
                offset,
                chip: self.name.clone(),
                source: e.into(),
            })?;
        Ok(CdevLine { line })
    }
}

impl Drop for CdevChip {
    fn drop(&mut self) {
        trace!("Closing chip {}", self.name);
    }
}

impl GpioLine for CdevLine {
    type Output = CdevOutput;

    fn offset(&self) -> u32 {
        self.line.offset()
    }

    fn request_output(self, consumer: &str, initial: Level) -> Result<CdevOutput, BlinkError> {
        let offset = self.line.offset();
        let handle = self
            .line
            .request(LineRequestFlags::OUTPUT, initial.into(), consumer)
            .map_err(|e| BlinkError::LineRequest {
                offset,
                source: e.into(),
            })?;
        Ok(CdevOutput { offset, handle })
    }
}

impl OutputLine for CdevOutput {
    fn offset(&self) -> u32 {
        self.offset
    }

    fn set_level(&mut self, level: Level) -> Result<(), BlinkError> {
        self.handle
            .set_value(level.into())
            .map_err(|e| BlinkError::LineWrite {
                offset: self.offset,
                level,
                source: e.into(),
            })
    }
}

impl Drop for CdevOutput {
    fn drop(&mut self) {
        trace!("Releasing line {}", self.offset);
    }
}
