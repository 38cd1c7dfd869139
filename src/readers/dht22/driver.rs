//! Bit-banged DHT22 (AM2302) driver.
//!
//! The sensor multiplexes a request pulse, an acknowledgement, and a
//! 40-bit frame over one data line; bits are distinguished by the length
//! of the high pulse. Frames fail often (the protocol has microsecond
//! tolerances and no flow control), so `read_retry` keeps trying with a
//! pause between attempts and reports an empty reading once it gives up,
//! leaving the completeness verdict to the caller.

use std::thread;
use std::time::{Duration, Instant};

use rppal::gpio::{Gpio, IoPin, Level, Mode};
use thiserror::Error;

use crate::constants::defaults;

use super::{DhtReading, HumidityDriver};

const FRAME_BITS: usize = 40;
/// Host-side request pulse: hold the line low long enough for the sensor
/// to notice (datasheet: at least 1 ms).
const START_LOW: Duration = Duration::from_micros(1100);
/// Upper bound for any single level transition within a frame.
const TRANSITION_TIMEOUT: Duration = Duration::from_micros(1000);
/// High pulses longer than this are ones (zeros run 26-28us, ones ~70us).
const BIT_ONE_THRESHOLD: Duration = Duration::from_micros(50);

#[derive(Error, Debug)]
enum FrameError {
    #[error("timed out waiting for {0}")]
    Transition(&'static str),
    #[error("checksum mismatch")]
    Checksum,
}

pub struct BitBangDht22 {
    pin: IoPin,
    retries: u32,
    retry_interval: Duration,
}

impl BitBangDht22 {
    pub fn new(gpio: &Gpio, bcm_pin: u8) -> Result<Self, rppal::gpio::Error> {
        Ok(Self {
            pin: gpio.get(bcm_pin)?.into_io(Mode::Input),
            retries: defaults::DHT_DRIVER_RETRIES,
            retry_interval: defaults::DHT_DRIVER_RETRY_INTERVAL,
        })
    }

    fn read_frame(&mut self) -> Result<DhtReading, FrameError> {
        self.pin.set_mode(Mode::Output);
        self.pin.set_low();
        thread::sleep(START_LOW);
        self.pin.set_mode(Mode::Input);

        // Acknowledgement: the sensor pulls low for ~80us, high for ~80us,
        // then starts the first bit's low period.
        self.wait_for(Level::Low, "sensor response")?;
        self.wait_for(Level::High, "sensor ready")?;
        self.wait_for(Level::Low, "frame start")?;

        let mut bytes = [0u8; 5];
        for bit in 0..FRAME_BITS {
            self.wait_for(Level::High, "bit pulse")?;
            let high = self.time_until(Level::Low, "bit settle")?;
            if high > BIT_ONE_THRESHOLD {
                bytes[bit / 8] |= 1 << (7 - bit % 8);
            }
        }

        let sum = bytes[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        if sum != bytes[4] {
            return Err(FrameError::Checksum);
        }

        Ok(decode(bytes))
    }

    fn wait_for(&mut self, level: Level, what: &'static str) -> Result<(), FrameError> {
        self.time_until(level, what).map(|_| ())
    }

    /// Busy-wait until the line reaches `level`, returning the elapsed
    /// time. Waits are bounded so a wedged line fails the frame instead of
    /// hanging the cycle.
    fn time_until(&mut self, level: Level, what: &'static str) -> Result<Duration, FrameError> {
        let start = Instant::now();
        while self.pin.read() != level {
            if start.elapsed() > TRANSITION_TIMEOUT {
                return Err(FrameError::Transition(what));
            }
        }
        Ok(start.elapsed())
    }
}

impl HumidityDriver for BitBangDht22 {
    fn read_retry(&mut self) -> DhtReading {
        for attempt in 1..=self.retries {
            match self.read_frame() {
                Ok(reading) => return reading,
                Err(e) => {
                    log::debug!(
                        "DHT22 read attempt {}/{} failed: {}",
                        attempt,
                        self.retries,
                        e
                    );
                    thread::sleep(self.retry_interval);
                }
            }
        }
        log::warn!("DHT22 driver gave up after {} attempts", self.retries);
        DhtReading::default()
    }
}

fn decode(bytes: [u8; 5]) -> DhtReading {
    let humidity = u16::from_be_bytes([bytes[0], bytes[1]]) as f64 / 10.0;
    let magnitude = u16::from_be_bytes([bytes[2] & 0x7f, bytes[3]]) as f64 / 10.0;
    let temperature = if bytes[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    DhtReading {
        temperature: Some(temperature),
        humidity: Some(humidity),
    }
}
