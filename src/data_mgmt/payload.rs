use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::models::{Reading, ReadingKind};

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("no {0} reading available for payload")]
    MissingReading(&'static str),
}

/// The wire form of one measurement cycle. `humidity` is null when the
/// external sensor does not measure it; `resistance` is 0.0 when no light
/// sensor is configured.
#[derive(Debug, Serialize, PartialEq)]
pub struct TelemetryPayload {
    pub timestamp: String,
    pub int_temp: f64,
    pub ext_temp: f64,
    pub humidity: Option<f64>,
    pub resistance: f64,
}

impl TelemetryPayload {
    pub fn from_readings(
        timestamp: DateTime<Utc>,
        readings: &[Reading],
    ) -> Result<Self, PayloadError> {
        let value_of = |kind: ReadingKind| {
            readings
                .iter()
                .find(|r| r.kind == kind)
                .map(|r| r.value)
        };

        Ok(Self {
            timestamp: timestamp.to_rfc3339(),
            int_temp: value_of(ReadingKind::InternalTemp)
                .ok_or(PayloadError::MissingReading("internal temperature"))?,
            ext_temp: value_of(ReadingKind::ExternalTemp)
                .ok_or(PayloadError::MissingReading("external temperature"))?,
            humidity: value_of(ReadingKind::Humidity),
            resistance: value_of(ReadingKind::LightResistance).unwrap_or(0.0),
        })
    }
}
