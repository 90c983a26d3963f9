//! On-hardware smoke tests. They need the panel attached, so they are
//! ignored by default; run them with `cargo test -- --ignored` on the Pi.

use colour_epd::board::Board;
use colour_epd::epd_4in01f::{Epd, RefreshWait, EPD_HEIGHT, EPD_WIDTH, GREEN, RED};
use std::{thread, time::Duration};

#[test]
#[ignore]
fn colour_bars() {
    let mut epd = Epd::new(&Board::waveshare_hat()).unwrap();
    epd.init().unwrap();
    epd.test_pattern(RefreshWait::Block).unwrap();
}

#[test]
#[ignore]
fn deferred_refresh_cycle() {
    let mut epd = Epd::new(&Board::waveshare_hat()).unwrap();
    epd.init().unwrap();
    for y in 0..EPD_HEIGHT {
        for x in 0..EPD_WIDTH {
            let colour = if (x / 80 + y / 80) % 2 == 0 { RED } else { GREEN };
            epd.set_pixel(x, y, colour);
        }
    }
    epd.display(RefreshWait::Defer).unwrap();
    // a second refresh must be refused while one is in flight
    assert!(epd.display(RefreshWait::Defer).is_err());
    // give the controller a moment to pull the busy line down
    thread::sleep(Duration::from_millis(100));
    while epd.is_busy() {
        thread::sleep(Duration::from_millis(250));
    }
    epd.power_off().unwrap();

    epd.clear();
    epd.display(RefreshWait::Block).unwrap();
}

#[test]
#[ignore]
fn double_init_is_rejected() {
    let mut epd = Epd::new(&Board::waveshare_hat()).unwrap();
    epd.init().unwrap();
    assert!(matches!(
        epd.init(),
        Err(colour_epd::Error::AlreadyInitialised)
    ));
}
