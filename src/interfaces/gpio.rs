//! GPIO capability seam.
//!
//! The timing-sensitive sensor logic only sees the [`DigitalPin`] trait, so
//! it can run against simulated pins in tests; [`BcmPin`] backs it with a
//! real mode-switchable pin on the Pi's BCM header.

use rppal::gpio::{Gpio, IoPin, Mode, OutputPin};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<rppal::gpio::Level> for Level {
    fn from(level: rppal::gpio::Level) -> Self {
        match level {
            rppal::gpio::Level::Low => Level::Low,
            rppal::gpio::Level::High => Level::High,
        }
    }
}

impl From<Level> for rppal::gpio::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => rppal::gpio::Level::Low,
            Level::High => rppal::gpio::Level::High,
        }
    }
}

/// A digital pin whose direction can be switched at runtime.
pub trait DigitalPin {
    fn set_input(&mut self);
    fn set_output(&mut self);
    fn write(&mut self, level: Level);
    fn read(&mut self) -> Level;
}

pub struct BcmPin {
    pin: IoPin,
}

impl BcmPin {
    pub fn open(gpio: &Gpio, bcm_pin: u8) -> Result<Self, rppal::gpio::Error> {
        Ok(Self {
            pin: gpio.get(bcm_pin)?.into_io(Mode::Input),
        })
    }
}

impl DigitalPin for BcmPin {
    fn set_input(&mut self) {
        self.pin.set_mode(Mode::Input);
    }

    fn set_output(&mut self) {
        self.pin.set_mode(Mode::Output);
    }

    fn write(&mut self, level: Level) {
        self.pin.write(level.into());
    }

    fn read(&mut self) -> Level {
        self.pin.read().into()
    }
}

/// Activity LED; lit for the duration of a measurement cycle.
pub struct Led {
    pin: OutputPin,
}

impl Led {
    pub fn new(gpio: &Gpio, bcm_pin: u8) -> Result<Self, rppal::gpio::Error> {
        Ok(Self {
            pin: gpio.get(bcm_pin)?.into_output(),
        })
    }

    pub fn on(&mut self) {
        self.pin.set_high();
    }

    pub fn off(&mut self) {
        self.pin.set_low();
    }
}
