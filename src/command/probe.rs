//! One-shot read of a single named sensor, for checking wiring without
//! running a full cycle or touching the API.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rppal::gpio::Gpio;

use crate::argsets::ProbeArgs;
use crate::config::{Config, TemperatureConfig};
use crate::data_mgmt::models::{Reading, ReadingKind};
use crate::helpers::ThreadDelay;
use crate::readers::dht22::Dht22Options;
use crate::readers::ds18b20::{self, Ds18b20Options};
use crate::readers::cpu_thermal;

use super::read::{read_dht22, read_light};

pub fn probe(args: ProbeArgs) -> Result<()> {
    let config = Config::from_file(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    let timestamp = Utc::now();
    let mut delay = ThreadDelay;

    let readings = match args.sensor.as_str() {
        "internal" => vec![Reading::new(
            ReadingKind::InternalTemp,
            cpu_thermal::read(&config.internal.file)?,
            timestamp,
        )],
        "dht22" => {
            let TemperatureConfig::Dht22 {
                pin,
                tolerance,
                threshold,
            } = config.temperature
            else {
                bail!("config does not define a dht22 temperature sensor");
            };
            let opts = Dht22Options {
                tolerance,
                threshold,
            };
            let (temp, humidity) = read_dht22(&Gpio::new()?, pin, &opts)?;
            vec![
                Reading::new(ReadingKind::ExternalTemp, temp, timestamp),
                Reading::new(ReadingKind::Humidity, humidity, timestamp),
            ]
        }
        "ds18b20" => {
            let TemperatureConfig::Ds18b20 {
                file,
                timeout,
                wait,
                threshold,
            } = config.temperature
            else {
                bail!("config does not define a ds18b20 temperature sensor");
            };
            let opts = Ds18b20Options {
                timeout: Duration::from_secs_f64(timeout),
                poll_interval: Duration::from_secs_f64(wait),
                threshold,
            };
            let temp = ds18b20::read(file.as_deref(), &opts, &mut delay)?;
            vec![Reading::new(ReadingKind::ExternalTemp, temp, timestamp)]
        }
        "light" => {
            let light = config
                .light
                .as_ref()
                .context("config does not define a light sensor")?;
            vec![read_light(&Gpio::new()?, light, timestamp, &mut delay)?]
        }
        other => bail!(
            "unknown sensor '{}'; expected one of 'internal', 'dht22', 'ds18b20', 'light'",
            other
        ),
    };

    for reading in readings {
        println!("{}", reading);
    }
    Ok(())
}
