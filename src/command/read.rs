//! The measurement cycle: one pass over the configured sensors, one
//! payload, one delivery attempt.
//!
//! The PID-file lock keeps overlapping timer invocations from fighting
//! over the GPIO lines and the reference cache; any sensor failure aborts
//! the cycle and releases the lock on unwind.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rppal::gpio::Gpio;

use crate::argsets::ReadArgs;
use crate::config::{Config, LightConfig, TemperatureConfig};
use crate::constants::defaults;
use crate::data_mgmt::models::{Reading, ReadingKind};
use crate::data_mgmt::payload::TelemetryPayload;
use crate::helpers::{base_path, Delay, LockFile, ThreadDelay};
use crate::interfaces::gpio::{BcmPin, Led};
use crate::interfaces::http_api;
use crate::interfaces::ref_cache::FileRefCache;
use crate::readers::dht22::{self, BitBangDht22, Dht22Options};
use crate::readers::ds18b20::{self, Ds18b20Options};
use crate::readers::{cpu_thermal, photoresistor};

pub fn read(args: ReadArgs) -> Result<()> {
    let config = Config::from_file(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let _lock = LockFile::acquire(
        base_path::LOCK_FILE.as_path(),
        defaults::LOCK_RETRIES,
        defaults::LOCK_RETRY_INTERVAL,
    )?;

    let gpio = needs_gpio(&config).then(Gpio::new).transpose()?;
    let mut led = match (&config.led, &gpio) {
        (Some(led_config), Some(gpio)) => Some(Led::new(gpio, led_config.pin)?),
        _ => None,
    };

    log::debug!("Starting measurement cycle");
    if let Some(led) = led.as_mut() {
        led.on();
    }
    let cycle_start = Instant::now();
    let timestamp = Utc::now();
    let mut delay = ThreadDelay;

    let mut readings = vec![Reading::new(
        ReadingKind::InternalTemp,
        cpu_thermal::read(&config.internal.file)?,
        timestamp,
    )];
    read_external(gpio.as_ref(), &config, timestamp, &mut delay, &mut readings)?;
    if let Some(light) = &config.light {
        let gpio = gpio.as_ref().context("GPIO required for the light sensor")?;
        readings.push(read_light(gpio, light, timestamp, &mut delay)?);
    }

    let payload = TelemetryPayload::from_readings(timestamp, &readings)?;
    if args.dry_run {
        log::info!("Dry run; not posting data");
    } else if let Some(api) = &config.api {
        http_api::write(&payload, api, &mut delay);
    }

    if let Some(led) = led.as_mut() {
        led.off();
    }

    let summary = readings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    log::info!(
        "{} runtime={:.1}s",
        summary,
        cycle_start.elapsed().as_secs_f64()
    );
    log::debug!("Completed measurement cycle");
    Ok(())
}

fn needs_gpio(config: &Config) -> bool {
    config.led.is_some() || config.light.is_some() || config.temperature.needs_gpio()
}

fn read_external(
    gpio: Option<&Gpio>,
    config: &Config,
    timestamp: DateTime<Utc>,
    delay: &mut dyn Delay,
    readings: &mut Vec<Reading>,
) -> Result<()> {
    match &config.temperature {
        TemperatureConfig::Dht22 {
            pin,
            tolerance,
            threshold,
        } => {
            let gpio = gpio.context("GPIO required for the DHT22 sensor")?;
            let opts = Dht22Options {
                tolerance: *tolerance,
                threshold: *threshold,
            };
            let (temp, humidity) = read_dht22(gpio, *pin, &opts)?;
            readings.push(Reading::new(ReadingKind::ExternalTemp, temp, timestamp));
            readings.push(Reading::new(ReadingKind::Humidity, humidity, timestamp));
        }
        TemperatureConfig::Ds18b20 {
            file,
            timeout,
            wait,
            threshold,
        } => {
            let opts = Ds18b20Options {
                timeout: Duration::from_secs_f64(*timeout),
                poll_interval: Duration::from_secs_f64(*wait),
                threshold: *threshold,
            };
            let temp = ds18b20::read(file.as_deref(), &opts, delay)?;
            readings.push(Reading::new(ReadingKind::ExternalTemp, temp, timestamp));
        }
    }
    Ok(())
}

pub(crate) fn read_dht22(gpio: &Gpio, pin: u8, opts: &Dht22Options) -> Result<(f64, f64)> {
    let mut driver = BitBangDht22::new(gpio, pin)?;
    let cache = FileRefCache::at_default_path();
    Ok(dht22::read(&mut driver, &cache, opts)?)
}

pub(crate) fn read_light(
    gpio: &Gpio,
    light: &LightConfig,
    timestamp: DateTime<Utc>,
    delay: &mut dyn Delay,
) -> Result<Reading> {
    let [charge_pin, sense_pin] = light.pins;
    let mut pin_a = BcmPin::open(gpio, charge_pin)?;
    let mut pin_b = BcmPin::open(gpio, sense_pin)?;
    let ohms = photoresistor::read(&mut pin_a, &mut pin_b, &light.rc_timing(), delay)?;
    Ok(Reading::new(ReadingKind::LightResistance, ohms, timestamp))
}
