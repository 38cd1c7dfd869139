//! Internal (die) temperature from the kernel thermal zone interface.
//!
//! `/sys/class/thermal/thermal_zone0/temp` is a safe default on a
//! single-zone board; on multi-zone hardware the `type` file in the same
//! directory identifies the right zone.

use std::fs;
use std::num::ParseFloatError;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CpuThermalError {
    #[error("could not read thermal zone file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed thermal zone value: {0}")]
    Parse(#[from] ParseFloatError),
}

pub fn read(file: &Path) -> Result<f64, CpuThermalError> {
    log::debug!("Started reading sensor at {}", file.display());
    let raw = fs::read_to_string(file)?;
    let temp = raw.trim().parse::<f64>()? / 1000.0;
    log::info!("int_temp={:.1}C", temp);
    Ok(temp)
}
