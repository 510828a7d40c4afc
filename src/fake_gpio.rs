//! In-memory backend that records every call, for tests.

use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;

use crate::error::BlinkError;
use crate::gpio::{GpioBackend, GpioChip, GpioLine, Level, OutputLine};

#[derive(Debug, Default)]
pub struct FakeState {
    pub opens: usize,
    pub closes: usize,
    pub acquires: usize,
    pub releases: usize,
    pub requests: Vec<(u32, String, Level)>,
    pub writes: Vec<(Instant, Level)>,
    pub level: Option<Level>,
}

#[derive(Debug, Clone)]
pub struct FakeBackend {
    chip_name: String,
    num_lines: u32,
    busy: HashSet<u32>,
    writes_before_failure: Option<usize>,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new(chip_name: &str, num_lines: u32) -> Self {
        Self {
            chip_name: chip_name.to_string(),
            num_lines,
            busy: HashSet::new(),
            writes_before_failure: None,
            state: Arc::default(),
        }
    }

    /// Marks a line as already held by another consumer.
    pub fn with_busy_line(mut self, offset: u32) -> Self {
        self.busy.insert(offset);
        self
    }

    /// The device "goes away" after `count` successful writes.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.writes_before_failure = Some(count);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

pub struct FakeChip {
    backend: FakeBackend,
}

pub struct FakeLine {
    offset: u32,
    backend: FakeBackend,
}

pub struct FakeOutput {
    // Keeps the line's drop (release) tied to the output's lifetime.
    line: FakeLine,
}

impl GpioBackend for FakeBackend {
    type Chip = FakeChip;

    fn open_chip(&self, name: &str) -> Result<FakeChip, BlinkError> {
        if name != self.chip_name {
            return Err(BlinkError::ControllerOpen {
                chip: name.to_string(),
                source: io::Error::from(io::ErrorKind::NotFound).into(),
            });
        }
        self.state().opens += 1;
        Ok(FakeChip {
            backend: self.clone(),
        })
    }
}

impl GpioChip for FakeChip {
    type Line = FakeLine;

    fn line(&mut self, offset: u32) -> Result<FakeLine, BlinkError> {
        if offset >= self.backend.num_lines {
            return Err(BlinkError::LineAcquire {
                offset,
                chip: self.backend.chip_name.clone(),
                source: io::Error::from_raw_os_error(22).into(),
            });
        }
        self.backend.state().acquires += 1;
        Ok(FakeLine {
            offset,
            backend: self.backend.clone(),
        })
    }
}

impl Drop for FakeChip {
    fn drop(&mut self) {
        self.backend.state().closes += 1;
    }
}

impl GpioLine for FakeLine {
    type Output = FakeOutput;

    fn offset(&self) -> u32 {
        self.offset
    }

    fn request_output(self, consumer: &str, initial: Level) -> Result<FakeOutput, BlinkError> {
        if self.backend.busy.contains(&self.offset) {
            return Err(BlinkError::LineRequest {
                offset: self.offset,
                source: io::Error::from_raw_os_error(16).into(),
            });
        }
        {
            let mut state = self.backend.state();
            state.requests.push((self.offset, consumer.to_string(), initial));
            state.level = Some(initial);
        }
        Ok(FakeOutput { line: self })
    }
}

impl Drop for FakeLine {
    fn drop(&mut self) {
        self.backend.state().releases += 1;
    }
}

impl OutputLine for FakeOutput {
    fn offset(&self) -> u32 {
        self.line.offset
    }

    fn set_level(&mut self, level: Level) -> Result<(), BlinkError> {
        let backend = &self.line.backend;
        let mut state = backend.state();
        if backend.writes_before_failure == Some(state.writes.len()) {
            return Err(BlinkError::LineWrite {
                offset: self.line.offset,
                level,
                source: io::Error::from_raw_os_error(19).into(),
            });
        }
        state.writes.push((Instant::now(), level));
        state.level = Some(level);
        Ok(())
    }
}
