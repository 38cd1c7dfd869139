use std::time::Duration;

pub const LOG_LEVEL: &str = "info";

pub const LOCK_RETRIES: u32 = 120;
pub const LOCK_RETRY_INTERVAL: Duration = Duration::from_secs(1);

pub const THERMAL_ZONE_FILE: &str = "/sys/class/thermal/thermal_zone0/temp";

// DHT22
pub const DHT_TOLERANCE_CELSIUS: f64 = 5.0;
pub const TEMP_WARN_THRESHOLD_CELSIUS: f64 = 32.0;
pub const DHT_DRIVER_RETRIES: u32 = 15;
pub const DHT_DRIVER_RETRY_INTERVAL: Duration = Duration::from_secs(2);

// DS18B20
pub const W1_DEVICES_DIR: &str = "/sys/devices/w1_bus_master1";
pub const W1_DEVICE_PREFIX: &str = "28-";
pub const W1_SLAVE_FILENAME: &str = "w1_slave";
pub const DS18B20_TIMEOUT_SECONDS: f64 = 10.0;
pub const DS18B20_POLL_INTERVAL_SECONDS: f64 = 0.2;

// Photoresistor
pub const LIGHT_VOLTAGE: f64 = 3.3;
pub const LIGHT_SAMPLES: usize = 20;
pub const LIGHT_TIMEOUT_SECONDS: f64 = 300.0;
pub const DISCHARGE_SETTLE: Duration = Duration::from_millis(10);

// API delivery
pub const API_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const API_MAX_RETRIES: u32 = 10;
pub const API_RETRY_INTERVAL: Duration = Duration::from_secs(2);
