use thiserror::Error;

use crate::gpio::Level;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One variant per device interaction. None of them are retried.
#[derive(Debug, Error)]
pub enum BlinkError {
    #[error("error opening GPIO chip {chip}")]
    ControllerOpen { chip: String, source: BoxError },
    #[error("error getting line {offset} from chip {chip}")]
    LineAcquire {
        offset: u32,
        chip: String,
        source: BoxError,
    },
    #[error("error requesting line {offset} as output")]
    LineRequest { offset: u32, source: BoxError },
    #[error("error setting line {offset} value to {level}")]
    LineWrite {
        offset: u32,
        level: Level,
        source: BoxError,
    },
    #[error("blink frequency of {0} Hz has no usable half-period")]
    InvalidFrequency(u32),
}
