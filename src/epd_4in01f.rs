//! 4.01" ACeP 7-colour

use crate::board::Board;
use crate::error::EpdError;
use crate::frame::Frame;
use crate::Result;
use log::{debug, warn};
use rppal::{
    gpio::{Gpio, InputPin, Level, OutputPin},
    spi::{Mode, Spi},
};
use std::thread;
use std::time::{Duration, Instant};

pub const EPD_WIDTH: usize = 640;
pub const EPD_HEIGHT: usize = 400;

/// Colour indices understood by the panel.
pub const BLACK: u8 = 0x0;
pub const WHITE: u8 = 0x1;
pub const GREEN: u8 = 0x2;
pub const BLUE: u8 = 0x3;
pub const RED: u8 = 0x4;
pub const YELLOW: u8 = 0x5;
pub const ORANGE: u8 = 0x6;
pub const CLEAN: u8 = 0x7;

const BUSY_TIMEOUT: Duration = Duration::from_secs(10);
const BUSY_POLL: Duration = Duration::from_millis(10);
// spidev rejects transfers larger than its block size
const SPI_CHUNK: usize = 4096;

// 640 sources, 400 gates
const RESOLUTION: [u8; 4] = [0x02, 0x80, 0x01, 0x90];

/// What `display` does once the refresh is triggered. A refresh takes the
/// panel several seconds, and the power-off sequence must follow it exactly
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshWait {
    /// Wait for the panel to finish, then power it off.
    Block,
    /// As `Block`, but give up after the given duration. On timeout the
    /// panel is left refreshing and the caller keeps the power-off duty.
    Timeout(Duration),
    /// Return as soon as the refresh is queued; the caller polls `is_busy`
    /// and ends the cycle with `power_off`.
    Defer,
}

#[derive(Debug, PartialEq, Eq)]
enum State {
    Cold,
    Ready,
    Refreshing,
}

pub struct Epd {
    reset_pin: OutputPin,
    dc_pin: OutputPin,
    cs_pin: OutputPin,
    busy_pin: InputPin,
    spi: Spi,
    frame: Frame,
    state: State,
}

impl Epd {
    /// Claim the control lines and the SPI port described by `board` and
    /// allocate an all-white frame. The panel itself is not touched until
    /// `init`.
    pub fn new(board: &Board) -> Result<Self> {
        let gpio = Gpio::new()?;
        let spi = Spi::new(
            board.bus,
            board.slave_select,
            board.spi_clock_hz,
            Mode::Mode0,
        )?;
        Ok(Self {
            reset_pin: gpio.get(board.reset)?.into_output(),
            dc_pin: gpio.get(board.data_command)?.into_output(),
            cs_pin: gpio.get(board.chip_select)?.into_output_high(),
            busy_pin: gpio.get(board.busy)?.into_input(),
            spi,
            frame: Frame::new(),
            state: State::Cold,
        })
    }

    /// Reset the panel and run its power/driving configuration sequence.
    /// Must run exactly once per driver instance.
    pub fn init(&mut self) -> Result<()> {
        if self.state != State::Cold {
            return Err(EpdError::AlreadyInitialised);
        }

        self.reset();
        self.wait_busy(Level::High)?;
        debug!("reset complete");

        // panel setting
        self.send_command(0x00)?;
        self.send_data(&[0x2F, 0x00])?;

        // power setting
        self.send_command(0x01)?;
        self.send_data(&[0x37, 0x01, 0x05, 0x05])?;

        // power-off sequence setting
        self.send_command(0x03)?;
        self.send_data(&[0x00])?;

        // booster soft start
        self.send_command(0x06)?;
        self.send_data(&[0xC7, 0xC7, 0x1D])?;

        // temperature sensor
        self.send_command(0x41)?;
        self.send_data(&[0x00])?;

        // Vcom and data interval
        self.send_command(0x50)?;
        self.send_data(&[0x37])?;

        // TCON
        self.send_command(0x60)?;
        self.send_data(&[0x22])?;

        // resolution
        self.send_command(0x61)?;
        self.send_data(&RESOLUTION)?;

        // power saving
        self.send_command(0xE3)?;
        self.send_data(&[0xAA])?;

        debug!("init complete");
        self.state = State::Ready;
        Ok(())
    }

    /// Set one pixel in the frame buffer. Nothing reaches the panel until
    /// `display` runs.
    pub fn set_pixel(&mut self, x: usize, y: usize, colour: u8) {
        self.frame.set_pixel(x, y, colour);
    }

    /// Reset the frame buffer to all white. Does not touch the panel.
    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// Push the frame buffer to the panel and trigger a refresh.
    pub fn display(&mut self, wait: RefreshWait) -> Result<()> {
        match self.state {
            State::Cold => return Err(EpdError::NotReady("init has not run")),
            State::Refreshing => return Err(EpdError::NotReady("refresh in flight")),
            State::Ready => {}
        }

        // The controller wants its geometry re-asserted before every frame.
        self.send_command(0x61)?;
        self.send_data(&RESOLUTION)?;

        self.send_command(0x10)?; // begin frame write
        self.stream_frame()?;

        self.send_command(0x04)?; // power on
        self.wait_busy(Level::High)?;
        self.send_command(0x12)?; // display refresh
        self.state = State::Refreshing;

        match wait {
            RefreshWait::Block => {
                debug!("blocking until the refresh settles");
                while self.is_busy() {
                    thread::sleep(BUSY_POLL);
                }
                self.power_off()
            }
            RefreshWait::Timeout(limit) => {
                self.wait_busy_for(Level::High, limit)?;
                self.power_off()
            }
            RefreshWait::Defer => Ok(()),
        }
    }

    /// Paint eight vertical colour bars and push them to the panel.
    pub fn test_pattern(&mut self, wait: RefreshWait) -> Result<()> {
        const BAR_WIDTH: usize = EPD_WIDTH / 8;
        for y in 0..EPD_HEIGHT {
            for x in 0..EPD_WIDTH {
                self.frame.set_pixel(x, y, (x / BAR_WIDTH) as u8);
            }
        }
        self.display(wait)
    }

    /// Whether the panel is still holding the busy line.
    pub fn is_busy(&self) -> bool {
        self.busy_pin.is_low()
    }

    /// Send the power-off sequence that ends a refresh cycle. Exactly one
    /// call per refresh; afterwards the driver accepts the next `display`.
    pub fn power_off(&mut self) -> Result<()> {
        if self.state != State::Refreshing {
            return Err(EpdError::NotReady("no refresh in flight"));
        }
        debug!("powering panel off");
        self.send_command(0x02)?;
        self.wait_busy(Level::Low)?;
        self.state = State::Ready;
        Ok(())
    }

    fn reset(&mut self) {
        self.reset_pin.set_high();
        thread::sleep(Duration::from_millis(200));
        self.reset_pin.set_low();
        thread::sleep(Duration::from_millis(1));
        self.reset_pin.set_high();
        thread::sleep(Duration::from_millis(200));
    }

    // Both halves go out in a single chip-select window, not one toggle
    // per byte.
    fn stream_frame(&mut self) -> Result<()> {
        debug!("streaming frame");
        self.dc_pin.set_high();
        self.cs_pin.set_low();
        let mut result = Self::write_all(&mut self.spi, self.frame.upper());
        if result.is_ok() {
            result = Self::write_all(&mut self.spi, self.frame.lower());
        }
        self.cs_pin.set_high();
        result
    }

    fn write_all(spi: &mut Spi, data: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < data.len() {
            let end = (written + SPI_CHUNK).min(data.len());
            written += spi.write(&data[written..end])?;
        }
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> Result<()> {
        self.dc_pin.set_low();
        self.cs_pin.set_low();
        self.spi.write(&[command])?;
        self.cs_pin.set_high();
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<()> {
        self.dc_pin.set_high();
        self.cs_pin.set_low();
        self.spi.write(data)?;
        self.cs_pin.set_high();
        Ok(())
    }

    fn wait_busy(&mut self, level: Level) -> Result<()> {
        self.wait_busy_for(level, BUSY_TIMEOUT)
    }

    fn wait_busy_for(&mut self, level: Level, limit: Duration) -> Result<()> {
        let start = Instant::now();
        while self.busy_pin.read() != level {
            if start.elapsed() >= limit {
                warn!("busy line did not go {:?} within {:?}", level, limit);
                return Err(EpdError::BusyTimeout {
                    expected: level,
                    waited: limit,
                });
            }
            thread::sleep(BUSY_POLL);
        }
        Ok(())
    }
}

impl Drop for Epd {
    fn drop(&mut self) {
        debug!("parking panel control lines");
        self.reset_pin.set_low();
        self.dc_pin.set_low();
    }
}
