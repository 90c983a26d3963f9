use rppal::{gpio, spi};
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpdError>;

#[derive(Error, Debug)]
pub enum EpdError {
    #[error(transparent)]
    Gpio(#[from] gpio::Error),
    #[error(transparent)]
    Spi(#[from] spi::Error),
    /// The panel never drove the busy line to the awaited level.
    #[error("busy line did not go {expected:?} within {waited:?}")]
    BusyTimeout {
        expected: gpio::Level,
        waited: Duration,
    },
    /// `init` ran on a driver that already completed its init sequence.
    #[error("panel already initialised")]
    AlreadyInitialised,
    /// The panel is in the wrong lifecycle state for the operation.
    #[error("panel not ready ({0})")]
    NotReady(&'static str),
}
