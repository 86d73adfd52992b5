use crate::error::SinkError;
use crate::{ClimateReading, OpticalSample};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Everything read during one polling cycle. Missing fields mean the sensor was
/// skipped or failed that cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    pub timestamp: OffsetDateTime,
    pub climate: Option<ClimateReading>,
    pub optical: Option<OpticalSample>,
}

impl Record {
    pub fn new(timestamp: OffsetDateTime) -> Self {
        Self {
            timestamp,
            climate: None,
            optical: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.climate.is_none() && self.optical.is_none()
    }

    /// Space delimited line, timestamp first
    pub fn to_line(&self) -> Result<String, SinkError> {
        let mut line = self.timestamp.format(&Rfc3339)?;
        if let Some(climate) = self.climate {
            line.push_str(&format!(
                " temperature_c={:.2} humidity_pct={:.2}",
                climate.temperature, climate.humidity
            ));
        }
        if let Some(optical) = self.optical {
            line.push_str(&format!(" red={} ir={}", optical.red, optical.ir));
        }
        Ok(line)
    }
}

/// Append only destination for records
pub trait Sink {
    fn append(&mut self, record: &Record) -> Result<(), SinkError>;
}

impl Sink for Vec<Record> {
    fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        self.push(*record);
        Ok(())
    }
}

/// Writes each record as one text line
#[derive(Debug)]
pub struct LineSink<W> {
    writer: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineSink<File> {
    /// Opens `path` for appending, creating it when missing
    pub fn append_to_file(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> Sink for LineSink<W> {
    fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        let line = record.to_line()?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn combined_line() {
        let record = Record {
            timestamp: datetime!(2024-03-01 12:30:05 UTC),
            climate: Some(ClimateReading {
                temperature: 23.456,
                humidity: 41.0,
            }),
            optical: Some(OpticalSample { red: 1200, ir: 3400 }),
        };

        assert_eq!(
            record.to_line().unwrap(),
            "2024-03-01T12:30:05Z temperature_c=23.46 humidity_pct=41.00 red=1200 ir=3400"
        );
    }

    #[test]
    fn partial_line_omits_missing_sensor() {
        let mut record = Record::new(datetime!(2024-03-01 12:30:05 UTC));
        assert!(record.is_empty());
        record.optical = Some(OpticalSample { red: 7, ir: 9 });

        assert_eq!(record.to_line().unwrap(), "2024-03-01T12:30:05Z red=7 ir=9");
    }

    #[test]
    fn line_sink_appends() {
        let mut sink = LineSink::new(Vec::new());
        let mut record = Record::new(datetime!(2024-03-01 00:00:00 UTC));
        record.climate = Some(ClimateReading {
            temperature: -50.0,
            humidity: 0.0,
        });

        sink.append(&record).unwrap();
        record.climate = None;
        record.optical = Some(OpticalSample { red: 1, ir: 2 });
        sink.append(&record).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "2024-03-01T00:00:00Z temperature_c=-50.00 humidity_pct=0.00\n\
             2024-03-01T00:00:00Z red=1 ir=2\n"
        );
    }

    #[test]
    fn file_sink_appends_across_reopens() {
        let path = std::env::temp_dir().join(format!("sensorlog-append-{}.txt", std::process::id()));
        if path.exists() {
            std::fs::remove_file(&path).unwrap();
        }
        let mut record = Record::new(datetime!(2024-03-01 00:00:00 UTC));
        record.optical = Some(OpticalSample { red: 1, ir: 2 });

        LineSink::append_to_file(&path).unwrap().append(&record).unwrap();
        record.timestamp = datetime!(2024-03-01 00:00:01 UTC);
        LineSink::append_to_file(&path).unwrap().append(&record).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            text,
            "2024-03-01T00:00:00Z red=1 ir=2\n\
             2024-03-01T00:00:01Z red=1 ir=2\n"
        );
    }
}
