//! DHT22 temperature/humidity read with a reference-cache sanity check.
//!
//! The hardware transaction itself is the driver's problem (it retries
//! internally until it has a complete frame or gives up). This module
//! cross-checks the raw temperature against the last raw temperature from
//! a previous cycle and re-reads once when the jump is implausibly large,
//! which filters the single-sample glitches the sensor is prone to.

use thiserror::Error;

use crate::constants::defaults;
use crate::interfaces::ref_cache::RefCache;

mod driver;

pub use driver::BitBangDht22;

#[derive(Clone, Debug)]
pub struct Dht22Options {
    /// Maximum plausible jump from the cached reference, in Celsius.
    pub tolerance: f64,
    /// Log a warning when the temperature exceeds this, in Celsius.
    pub threshold: f64,
}

impl Default for Dht22Options {
    fn default() -> Self {
        Self {
            tolerance: defaults::DHT_TOLERANCE_CELSIUS,
            threshold: defaults::TEMP_WARN_THRESHOLD_CELSIUS,
        }
    }
}

/// One raw frame from the sensor; either field may be missing when the
/// driver gave up without a complete read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DhtReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// The opaque read-with-internal-retry primitive the hardware driver
/// provides.
pub trait HumidityDriver {
    fn read_retry(&mut self) -> DhtReading;
}

#[derive(Error, Debug)]
pub enum Dht22Error {
    #[error("DHT22 sensor returned incomplete data")]
    IncompleteReading,
}

/// Read `(temperature, humidity)` from the sensor.
pub fn read(
    driver: &mut dyn HumidityDriver,
    cache: &dyn RefCache,
    opts: &Dht22Options,
) -> Result<(f64, f64), Dht22Error> {
    log::debug!("Started reading sensor");
    let reference = cache.get();

    let (mut temp, mut humidity) = read_and_cache(driver, cache)?;
    if let Some(reference) = reference {
        if (temp - reference).abs() > opts.tolerance {
            log::warn!(
                "temp {:.1}C deviates from reference {:.1}C by more than {:.1}C; re-reading",
                temp,
                reference,
                opts.tolerance
            );
            (temp, humidity) = read_and_cache(driver, cache)?;
        }
    }

    if temp > opts.threshold {
        log::warn!(
            "temp {:.1}C exceeds threshold {:.1}C",
            temp,
            opts.threshold
        );
    }
    log::info!("temp={:.1}C humidity={:.1}%", temp, humidity);
    Ok((temp, humidity))
}

/// One raw driver read. The raw temperature is persisted before any
/// completeness or tolerance verdict, so the cache always holds the most
/// recent raw read.
fn read_and_cache(
    driver: &mut dyn HumidityDriver,
    cache: &dyn RefCache,
) -> Result<(f64, f64), Dht22Error> {
    let reading = driver.read_retry();
    if let Some(temp) = reading.temperature {
        if let Err(e) = cache.set(temp) {
            log::error!("Could not persist reference temperature: {:#}", e);
        }
    }
    match (reading.temperature, reading.humidity) {
        (Some(temp), Some(humidity)) => Ok((temp, humidity)),
        _ => Err(Dht22Error::IncompleteReading),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedDriver {
        frames: VecDeque<DhtReading>,
        reads: u32,
    }

    impl ScriptedDriver {
        fn new(frames: &[DhtReading]) -> Self {
            Self {
                frames: frames.iter().copied().collect(),
                reads: 0,
            }
        }
    }

    impl HumidityDriver for ScriptedDriver {
        fn read_retry(&mut self) -> DhtReading {
            self.reads += 1;
            self.frames.pop_front().expect("driver read past script")
        }
    }

    struct MemoryCache {
        value: RefCell<Option<f64>>,
        writes: RefCell<Vec<f64>>,
    }

    impl MemoryCache {
        fn holding(value: Option<f64>) -> Self {
            Self {
                value: RefCell::new(value),
                writes: RefCell::new(Vec::new()),
            }
        }
    }

    impl RefCache for MemoryCache {
        fn get(&self) -> Option<f64> {
            *self.value.borrow()
        }
        fn set(&self, value: f64) -> anyhow::Result<()> {
            *self.value.borrow_mut() = Some(value);
            self.writes.borrow_mut().push(value);
            Ok(())
        }
    }

    fn frame(temp: f64, humidity: f64) -> DhtReading {
        DhtReading {
            temperature: Some(temp),
            humidity: Some(humidity),
        }
    }

    #[test]
    fn reading_within_tolerance_is_taken_as_is() {
        let mut driver = ScriptedDriver::new(&[frame(24.0, 60.0)]);
        let cache = MemoryCache::holding(Some(20.0));
        let opts = Dht22Options::default();

        let (temp, humidity) = read(&mut driver, &cache, &opts).unwrap();
        assert_eq!((temp, humidity), (24.0, 60.0));
        assert_eq!(driver.reads, 1);
        assert_eq!(*cache.writes.borrow(), vec![24.0]);
    }

    #[test]
    fn tolerance_violation_triggers_exactly_one_re_read() {
        let mut driver = ScriptedDriver::new(&[frame(30.0, 60.0), frame(21.0, 58.0)]);
        let cache = MemoryCache::holding(Some(20.0));
        let opts = Dht22Options::default();

        let (temp, humidity) = read(&mut driver, &cache, &opts).unwrap();
        // The second read replaces the first.
        assert_eq!((temp, humidity), (21.0, 58.0));
        assert_eq!(driver.reads, 2);
        // Both raw reads were persisted, the rejected one included.
        assert_eq!(*cache.writes.borrow(), vec![30.0, 21.0]);
    }

    #[test]
    fn second_read_is_final_even_outside_tolerance() {
        let mut driver = ScriptedDriver::new(&[frame(30.0, 60.0), frame(31.0, 59.0)]);
        let cache = MemoryCache::holding(Some(20.0));
        let opts = Dht22Options::default();

        // A single bounded re-read, not a loop.
        let (temp, _) = read(&mut driver, &cache, &opts).unwrap();
        assert_eq!(temp, 31.0);
        assert_eq!(driver.reads, 2);
    }

    #[test]
    fn no_reference_means_no_re_read() {
        let mut driver = ScriptedDriver::new(&[frame(35.0, 40.0)]);
        let cache = MemoryCache::holding(None);
        let opts = Dht22Options::default();

        let (temp, _) = read(&mut driver, &cache, &opts).unwrap();
        assert_eq!(temp, 35.0);
        assert_eq!(driver.reads, 1);
        assert_eq!(*cache.writes.borrow(), vec![35.0]);
    }

    #[test]
    fn incomplete_frame_is_an_error_but_still_caches_temperature() {
        let mut driver = ScriptedDriver::new(&[DhtReading {
            temperature: Some(22.5),
            humidity: None,
        }]);
        let cache = MemoryCache::holding(None);
        let opts = Dht22Options::default();

        assert!(matches!(
            read(&mut driver, &cache, &opts),
            Err(Dht22Error::IncompleteReading)
        ));
        assert_eq!(*cache.writes.borrow(), vec![22.5]);
    }

    #[test]
    fn empty_frame_is_an_error() {
        let mut driver = ScriptedDriver::new(&[DhtReading::default()]);
        let cache = MemoryCache::holding(Some(20.0));
        let opts = Dht22Options::default();

        assert!(matches!(
            read(&mut driver, &cache, &opts),
            Err(Dht22Error::IncompleteReading)
        ));
        assert!(cache.writes.borrow().is_empty());
    }
}
