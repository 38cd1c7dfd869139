//! DS18B20 temperature via the kernel 1-wire interface.
//!
//! The kernel exposes each probe as a `w1_slave` file holding two lines:
//! the first ends in `YES` once the CRC checks out, the second carries the
//! reading as `t=<millidegrees>`. The file is polled until the ready marker
//! appears or the poll budget runs out.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::constants::defaults;
use crate::helpers::Delay;

const CRC_VALID_MARKER: &str = "YES";
const TEMP_FIELD: &str = "t=";

#[derive(Clone, Debug)]
pub struct Ds18b20Options {
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Log a warning when the temperature exceeds this, in Celsius.
    pub threshold: f64,
}

impl Default for Ds18b20Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs_f64(defaults::DS18B20_TIMEOUT_SECONDS),
            poll_interval: Duration::from_secs_f64(defaults::DS18B20_POLL_INTERVAL_SECONDS),
            threshold: defaults::TEMP_WARN_THRESHOLD_CELSIUS,
        }
    }
}

#[derive(Error, Debug)]
pub enum Ds18b20Error {
    #[error("timed out waiting for data from DS18B20 sensor at {0}")]
    TimedOut(PathBuf),
    #[error("sensor discovery failed: {0}")]
    Discovery(String),
    #[error("could not read 1-wire device file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed 1-wire payload: {0:?}")]
    Malformed(String),
}

/// Read the external temperature in Celsius.
///
/// With no explicit `file`, exactly one probe is expected on the bus and is
/// discovered under the sysfs master directory.
pub fn read(
    file: Option<&Path>,
    opts: &Ds18b20Options,
    delay: &mut dyn Delay,
) -> Result<f64, Ds18b20Error> {
    let file = match file {
        Some(file) => file.to_path_buf(),
        None => discover()?,
    };

    log::debug!("Started reading sensor at {}", file.display());
    let temp = poll(&file, opts, delay)?;
    if temp > opts.threshold {
        log::warn!(
            "temp {:.1}C exceeds threshold {:.1}C",
            temp,
            opts.threshold
        );
    }
    log::info!("temp={:.1}C", temp);
    Ok(temp)
}

/// Locate the single `28-*` probe under `dir` and return its `w1_slave`
/// path. Zero probes and multiple probes are both discovery failures.
pub fn discover_in(dir: &Path) -> Result<PathBuf, Ds18b20Error> {
    log::debug!("Discovering sensor under {}", dir.display());
    let mut nodes = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(defaults::W1_DEVICE_PREFIX)
        {
            nodes.push(entry.path());
        }
    }

    match nodes.as_slice() {
        [] => Err(Ds18b20Error::Discovery(
            "no 1-wire device nodes exist".into(),
        )),
        [node] => {
            let file = node.join(defaults::W1_SLAVE_FILENAME);
            log::info!("Discovered 1-wire interface file at {}", file.display());
            Ok(file)
        }
        _ => Err(Ds18b20Error::Discovery(
            "more than one 1-wire device node exists".into(),
        )),
    }
}

fn discover() -> Result<PathBuf, Ds18b20Error> {
    discover_in(Path::new(defaults::W1_DEVICES_DIR))
}

fn poll(
    file: &Path,
    opts: &Ds18b20Options,
    delay: &mut dyn Delay,
) -> Result<f64, Ds18b20Error> {
    let attempts = (opts.timeout.as_nanos() / opts.poll_interval.as_nanos().max(1)) as usize;
    for _ in 0..attempts {
        let raw = fs::read_to_string(file)?;
        if let Some(temp) = parse_payload(&raw)? {
            return Ok(temp);
        }
        delay.sleep(opts.poll_interval);
    }
    Err(Ds18b20Error::TimedOut(file.to_path_buf()))
}

/// `Ok(None)` means the CRC marker has not appeared yet and the caller
/// should poll again; a ready payload without a parseable `t=` field is
/// malformed.
fn parse_payload(raw: &str) -> Result<Option<f64>, Ds18b20Error> {
    let mut lines = raw.lines();
    let (Some(crc_line), Some(data_line)) = (lines.next(), lines.next()) else {
        return Ok(None);
    };
    if !crc_line.trim_end().ends_with(CRC_VALID_MARKER) {
        return Ok(None);
    }

    let field = data_line
        .find(TEMP_FIELD)
        .map(|i| &data_line[i + TEMP_FIELD.len()..])
        .ok_or_else(|| Ds18b20Error::Malformed(raw.to_string()))?;
    let millidegrees = field
        .trim()
        .parse::<f64>()
        .map_err(|_| Ds18b20Error::Malformed(raw.to_string()))?;
    Ok(Some(millidegrees / 1000.0))
}
