//! Polls an AHT10 and a MAX30102 over Linux i2c-dev and appends every reading to a log file.
//!
//! Run with `RUST_LOG=debug sensorlog --bus /dev/i2c-2 --period 1` and stop with Ctrl-C.

use env_logger::Builder;
use linux_embedded_hal::Delay;
use log::{error, info, LevelFilter};
use sensorlog::config::USAGE;
use sensorlog::error::ConfigError;
use sensorlog::prelude::*;
use std::io::Write;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> ExitCode {
    Builder::new()
        .format(|buf, record| writeln!(buf, "{} - {}", record.level(), record.args()))
        .filter(None, LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{}\n\n{}", err, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let buses = if config.is_split() {
        let max30102_bus = config.max30102_bus.as_deref().unwrap_or(&config.bus);
        Buses::Split {
            aht10: Bus::open(&config.bus)?,
            max30102: Bus::open(max30102_bus)?,
        }
    } else {
        Buses::Shared(Bus::open(&config.bus)?)
    };

    let mut sink = LineSink::append_to_file(&config.log_path)?;
    info!("Appending readings to {}", config.log_path.display());

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))?;

    let mut poller = Poller::new(
        buses,
        Aht10::new(Delay),
        Max30102::new(Delay).with_led_amplitude(config.led_amplitude),
        config.period,
    );
    poller.start();
    poller.run(&mut sink, &stop);

    Ok(())
}
