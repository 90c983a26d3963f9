use clap::Parser;
use colour_epd::board::Board;
use colour_epd::epd_4in01f::{Epd, RefreshWait};
use simplelog::{LevelFilter, SimpleLogger};
use std::{thread, time::Duration};

/// Push the panel's colour-bar self-test pattern.
#[derive(Parser, Debug)]
struct Opt {
    /// Use the LilyGo T5 v2.13 pin mapping instead of the Waveshare HAT one.
    #[arg(long)]
    lilygo: bool,
    /// Return from the refresh immediately and poll the busy line here.
    #[arg(long)]
    poll: bool,
    /// Give up if the refresh takes longer than this many seconds.
    #[arg(long, conflicts_with = "poll")]
    timeout: Option<u64>,
    /// Log at debug level.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    SimpleLogger::init(
        if opt.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        Default::default(),
    )?;

    let board = if opt.lilygo {
        Board::lilygo_t5_v213()
    } else {
        Board::waveshare_hat()
    };
    let wait = if opt.poll {
        RefreshWait::Defer
    } else {
        match opt.timeout {
            Some(secs) => RefreshWait::Timeout(Duration::from_secs(secs)),
            None => RefreshWait::Block,
        }
    };

    let mut epd = Epd::new(&board)?;
    epd.init()?;
    epd.test_pattern(wait)?;

    if opt.poll {
        log::info!("refresh queued, polling");
        while epd.is_busy() {
            thread::sleep(Duration::from_millis(250));
        }
        epd.power_off()?;
    }
    log::info!("done");

    Ok(())
}
