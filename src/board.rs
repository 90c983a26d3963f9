//! Pin mappings for the carrier boards this crate knows about.

use rppal::spi::{Bus, SlaveSelect};

/// SD-card slot wiring, for carriers that route one.
#[derive(Debug, Clone, Copy)]
pub struct SdCardPins {
    pub chip_select: u8,
    pub mosi: u8,
    pub miso: u8,
    pub sclk: u8,
}

/// Status LED wiring.
#[derive(Debug, Clone, Copy)]
pub struct LedPin {
    pub pin: u8,
    pub active_low: bool,
}

/// Everything board-specific in one place: the SPI port and control lines
/// the driver needs, plus the extras an application shell may want to pick
/// up (buttons, LED, SD card, battery sense).
#[derive(Debug, Clone)]
pub struct Board {
    pub bus: Bus,
    pub slave_select: SlaveSelect,
    pub spi_clock_hz: u32,
    pub reset: u8,
    pub data_command: u8,
    pub chip_select: u8,
    pub busy: u8,
    pub buttons: &'static [u8],
    pub led: Option<LedPin>,
    pub sd_card: Option<SdCardPins>,
    pub battery_adc: Option<u8>,
}

impl Board {
    /// The Waveshare e-Paper HAT layout, the usual way the panel meets a
    /// Raspberry Pi.
    pub fn waveshare_hat() -> Self {
        Self {
            bus: Bus::Spi0,
            slave_select: SlaveSelect::Ss0,
            spi_clock_hz: 8_000_000,
            reset: 17,
            data_command: 25,
            chip_select: 8,
            busy: 24,
            buttons: &[],
            led: None,
            sd_card: None,
            battery_adc: None,
        }
    }

    /// The LilyGo T5 v2.13 carrier's table, for hardware wired to that
    /// layout. Besides the panel it routes an SD-card slot, one button, a
    /// battery sense line and an active-low LED.
    pub fn lilygo_t5_v213() -> Self {
        Self {
            bus: Bus::Spi0,
            slave_select: SlaveSelect::Ss0,
            spi_clock_hz: 8_000_000,
            reset: 16,
            data_command: 17,
            chip_select: 5,
            busy: 4,
            buttons: &[39],
            led: Some(LedPin {
                pin: 19,
                active_low: true,
            }),
            sd_card: Some(SdCardPins {
                chip_select: 13,
                mosi: 15,
                miso: 2,
                sclk: 14,
            }),
            battery_adc: Some(35),
        }
    }
}
