use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadingKind {
    InternalTemp,
    ExternalTemp,
    Humidity,
    LightResistance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    RelativeHumidityPercent,
    Ohms,
}

impl ReadingKind {
    pub fn unit(self) -> Unit {
        match self {
            ReadingKind::InternalTemp | ReadingKind::ExternalTemp => Unit::Celsius,
            ReadingKind::Humidity => Unit::RelativeHumidityPercent,
            ReadingKind::LightResistance => Unit::Ohms,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ReadingKind::InternalTemp => "int_temp",
            ReadingKind::ExternalTemp => "ext_temp",
            ReadingKind::Humidity => "humidity",
            ReadingKind::LightResistance => "resistance",
        }
    }
}

impl Unit {
    fn suffix(self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::RelativeHumidityPercent => "%",
            Unit::Ohms => "ohms",
        }
    }
}

/// A single sensor measurement. Produced once the underlying hardware
/// transaction has completed, then consumed exactly once by payload
/// assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub kind: ReadingKind,
    pub value: f64,
    pub unit: Unit,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(kind: ReadingKind, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            value,
            unit: kind.unit(),
            timestamp,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={:.1}{}",
            self.kind.label(),
            self.value,
            self.unit.suffix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_derived_from_kind() {
        let reading = Reading::new(ReadingKind::Humidity, 55.0, Utc::now());
        assert_eq!(reading.unit, Unit::RelativeHumidityPercent);
        assert_eq!(
            Reading::new(ReadingKind::LightResistance, 1.0, Utc::now()).unit,
            Unit::Ohms
        );
    }

    #[test]
    fn display_formats_label_value_and_unit() {
        let ts = Utc::now();
        let reading = Reading::new(ReadingKind::ExternalTemp, 21.75, ts);
        assert_eq!(reading.to_string(), "ext_temp=21.8C");
    }
}
