//! Photoresistor read via RC charge timing.
//!
//! The sensor sits in a resistor-capacitor loop across two GPIO lines: one
//! line charges the capacitor through the photoresistor while the other
//! senses the rising edge, so the charge duration tracks the resistance.
//! Each sample is one discharge/charge cycle; the mean of the trimmed
//! samples is converted back to ohms through the RC model.

use std::f64::consts::E;
use std::time::{Duration, Instant};

use itertools::Itertools;
use thiserror::Error;

use crate::constants::defaults;
use crate::helpers::Delay;
use crate::interfaces::gpio::{DigitalPin, Level};

#[derive(Clone, Debug)]
pub struct RcTiming {
    /// Capacitance of the timing capacitor, in microfarads.
    pub capacitance_uf: f64,
    /// Known series resistance, in ohms.
    pub resistance_ohm: f64,
    /// Supply voltage, in volts.
    pub voltage: f64,
    /// Number of samples retained after outlier trimming.
    pub samples: usize,
    /// Budget for the whole sampling loop.
    pub timeout: Duration,
}

#[derive(Error, Debug)]
pub enum LightSensorError {
    #[error(
        "timed out after {0:.1}s while waiting for the capacitor to charge; \
         try a smaller capacitor or fewer samples"
    )]
    TimedOut(f64),
}

/// Measure the photoresistor's resistance in ohms.
///
/// Takes `samples + 2` timing samples, discards the single minimum and
/// single maximum, and averages the rest. The deadline is checked inside
/// the charge busy-wait, so a stuck line cannot hang the cycle past the
/// configured timeout.
pub fn read(
    pin_a: &mut dyn DigitalPin,
    pin_b: &mut dyn DigitalPin,
    rc: &RcTiming,
    delay: &mut dyn Delay,
) -> Result<f64, LightSensorError> {
    log::debug!("Started reading sensor");
    let started = Instant::now();
    let deadline = started + rc.timeout;

    let samples = rc.samples.max(1);
    let mut timings_us = Vec::with_capacity(samples + 2);
    for _ in 0..samples + 2 {
        timings_us.push(charge_cycle(pin_a, pin_b, deadline, delay)?);
    }

    let mean_us = trimmed_mean(timings_us);
    let mut ohms = charge_time_to_ohms(mean_us, rc);
    if ohms < 0.0 {
        log::warn!(
            "Computed resistance {:.1}ohms is negative; normalizing to 0",
            ohms
        );
        ohms = 0.0;
    }

    log::info!("resistance={:.1}ohms", ohms);
    log::debug!(
        "Finished reading sensor ({:.1}s)",
        started.elapsed().as_secs_f64()
    );
    Ok(ohms)
}

/// One full sample: settle the capacitor low, time the charge, then drain
/// it again so the circuit is left discharged even when the wait fails.
fn charge_cycle(
    pin_a: &mut dyn DigitalPin,
    pin_b: &mut dyn DigitalPin,
    deadline: Instant,
    delay: &mut dyn Delay,
) -> Result<f64, LightSensorError> {
    discharge(pin_a, pin_b, delay);
    let timing = time_charge(pin_a, pin_b, deadline);
    discharge(pin_a, pin_b, delay);
    timing
}

fn discharge(pin_a: &mut dyn DigitalPin, pin_b: &mut dyn DigitalPin, delay: &mut dyn Delay) {
    pin_a.set_input();
    pin_b.set_output();
    pin_b.write(Level::Low);
    delay.sleep(defaults::DISCHARGE_SETTLE);
}

/// Drive pin A high and return the microseconds until pin B follows.
fn time_charge(
    pin_a: &mut dyn DigitalPin,
    pin_b: &mut dyn DigitalPin,
    deadline: Instant,
) -> Result<f64, LightSensorError> {
    pin_a.set_output();
    pin_b.set_input();
    pin_a.write(Level::High);
    let start = Instant::now();
    while pin_b.read() == Level::Low {
        if Instant::now() > deadline {
            return Err(LightSensorError::TimedOut(
                start.elapsed().as_secs_f64(),
            ));
        }
    }
    Ok(start.elapsed().as_secs_f64() * 1e6)
}

/// Mean of the samples with the single smallest and largest discarded.
fn trimmed_mean(timings: Vec<f64>) -> f64 {
    let sorted = timings
        .into_iter()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect::<Vec<_>>();
    let kept = &sorted[1..sorted.len() - 1];
    kept.iter().sum::<f64>() / kept.len() as f64
}

fn charge_time_to_ohms(mean_us: f64, rc: &RcTiming) -> f64 {
    let t = mean_us * (E - 1.0) / E * rc.voltage;
    t / rc.capacitance_uf - rc.resistance_ohm
}
