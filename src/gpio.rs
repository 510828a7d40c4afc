//! Resource handles for one GPIO controller and one of its lines.
//!
//! Every handle releases its kernel resource when dropped, so a partially
//! acquired chain (chip only, or chip plus line) is cleaned up on whatever
//! path the caller leaves by.

use std::fmt;
use std::ops::Not;

use crate::error::BlinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        match level {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Opens controllers by name.
pub trait GpioBackend {
    type Chip: GpioChip;

    fn open_chip(&self, name: &str) -> Result<Self::Chip, BlinkError>;
}

/// An open controller. Closed on drop.
pub trait GpioChip {
    type Line: GpioLine;

    fn line(&mut self, offset: u32) -> Result<Self::Line, BlinkError>;
}

/// A line that has not been claimed yet. Released on drop.
pub trait GpioLine {
    type Output: OutputLine;

    fn offset(&self) -> u32;

    /// Claims exclusive write access and drives `initial` right away.
    fn request_output(self, consumer: &str, initial: Level) -> Result<Self::Output, BlinkError>;
}

/// A line held as output. Dropping it revokes the request and releases the line.
pub trait OutputLine {
    fn offset(&self) -> u32;

    fn set_level(&mut self, level: Level) -> Result<(), BlinkError>;
}

pub type ChipOf<B> = <B as GpioBackend>::Chip;
pub type OutputOf<B> = <<ChipOf<B> as GpioChip>::Line as GpioLine>::Output;
