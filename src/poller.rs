use crate::error::{SensorError, TransportError};
use crate::record::{Record, Sink};
use crate::sensor::{Aht10, Max30102, Sensor, MAX30102_PART_ID};
use crate::transport::Transport;
use embedded_hal::blocking::delay::DelayMs;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

// Longest the loop sleeps before looking at the stop flag again
const IDLE_SLICE: Duration = Duration::from_millis(50);

/// Either one bus carrying both sensors or one bus per sensor
#[derive(Debug)]
pub enum Buses<T> {
    Shared(T),
    Split { aht10: T, max30102: T },
}

impl<T: Transport> Buses<T> {
    fn aht10(&mut self) -> &mut T {
        match self {
            Buses::Shared(bus) => bus,
            Buses::Split { aht10, .. } => aht10,
        }
    }

    fn max30102(&mut self) -> &mut T {
        match self {
            Buses::Shared(bus) => bus,
            Buses::Split { max30102, .. } => max30102,
        }
    }

    fn close(&mut self) {
        match self {
            Buses::Shared(bus) => bus.close(),
            Buses::Split { aht10, max30102 } => {
                aht10.close();
                max30102.close();
            }
        }
    }
}

/// Reads both sensors once per period and hands the results to a sink
pub struct Poller<T, DA, DM> {
    buses: Buses<T>,
    aht10: Aht10<DA>,
    max30102: Max30102<DM>,
    period: Duration,
}

impl<T, DA, DM> Poller<T, DA, DM>
where
    T: Transport,
    DA: DelayMs<u32>,
    DM: DelayMs<u32>,
{
    pub fn new(buses: Buses<T>, aht10: Aht10<DA>, max30102: Max30102<DM>, period: Duration) -> Self {
        Self {
            buses,
            aht10,
            max30102,
            period,
        }
    }

    pub fn aht10(&self) -> &Aht10<DA> {
        &self.aht10
    }

    pub fn max30102(&self) -> &Max30102<DM> {
        &self.max30102
    }

    /// Initializes both sensors. A sensor that fails stays disabled for the
    /// lifetime of the poller, the other one carries on.
    pub fn start(&mut self) {
        match self.aht10.init(self.buses.aht10()) {
            Ok(()) => info!("AHT10 initialized"),
            Err(err) => warn!("{}, sensor disabled", err),
        }

        match self.max30102.part_id(self.buses.max30102()) {
            Ok(MAX30102_PART_ID) => debug!("MAX30102 part id {:#04x}", MAX30102_PART_ID),
            Ok(id) => warn!(
                "MAX30102 part id is {:#04x}, expected {:#04x}",
                id, MAX30102_PART_ID
            ),
            Err(err) => debug!("Could not query MAX30102 part id: {}", err),
        }

        match self.max30102.init(self.buses.max30102()) {
            Ok(()) => info!("MAX30102 initialized"),
            Err(err) => warn!("{}, sensor disabled", err),
        }
    }

    /// Runs one cycle: AHT10 then MAX30102, each only if initialized.
    ///
    /// Failed reads leave their field empty. Only a closed bus is returned as an error.
    pub fn poll_once(&mut self) -> Result<Record, TransportError> {
        let mut climate = None;
        let mut optical = None;

        if self.aht10.is_initialized() {
            climate = Self::skip_failed(self.aht10.read(self.buses.aht10()))?;
        }
        if self.max30102.is_initialized() {
            optical = Self::skip_failed(self.max30102.read(self.buses.max30102()))?;
        }

        Ok(Record {
            timestamp: OffsetDateTime::now_utc(),
            climate,
            optical,
        })
    }

    fn skip_failed<R>(result: Result<R, SensorError>) -> Result<Option<R>, TransportError> {
        match result {
            Ok(reading) => Ok(Some(reading)),
            Err(err) if err.is_bus_closed() => Err(TransportError::ClosedError),
            Err(err) => {
                warn!("Skipped {} reading: {}", err.sensor(), err);
                Ok(None)
            }
        }
    }

    /// Polls until `stop` is raised or a bus goes away, then closes the buses.
    ///
    /// The stop flag is only looked at between transactions.
    pub fn run<S: Sink>(mut self, sink: &mut S, stop: &AtomicBool) {
        if !self.aht10.is_initialized() && !self.max30102.is_initialized() {
            warn!("No sensor initialized, nothing will be recorded");
        }

        while !stop.load(Ordering::Relaxed) {
            let cycle_start = Instant::now();

            match self.poll_once() {
                Ok(record) => Self::deliver(sink, &record),
                Err(err) => {
                    error!("Stopping: {}", err);
                    break;
                }
            }

            Self::idle_until(cycle_start + self.period, stop);
        }

        self.buses.close();
        info!("Polling stopped");
    }

    fn deliver<S: Sink>(sink: &mut S, record: &Record) {
        if record.is_empty() {
            debug!("Nothing read this cycle");
            return;
        }
        if let Some(climate) = record.climate {
            info!(
                "{} -> temperature {:.2} C, humidity {:.2} %",
                Sensor::Aht10,
                climate.temperature,
                climate.humidity
            );
        }
        if let Some(optical) = record.optical {
            info!("{} -> red {}, IR {}", Sensor::Max30102, optical.red, optical.ir);
        }
        if let Err(err) = sink.append(record) {
            error!("{}", err);
        }
    }

    fn idle_until(deadline: Instant, stop: &AtomicBool) {
        loop {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            sleep((deadline - now).min(IDLE_SLICE));
        }
    }
}
