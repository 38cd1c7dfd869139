use pisense::config::{Config, TemperatureConfig};

mod stubs;

#[test]
fn test_parse_full_config() {
    let config: Config = stubs::config::FULL_CONFIG.parse().unwrap();
    assert_eq!(config.led.unwrap().pin, 21);
    assert!(config.temperature.needs_gpio());
    assert_eq!(config.light.unwrap().pins, [23, 24]);
    assert_eq!(
        config.api.unwrap().endpoint,
        "https://api.example.com/v1/readings"
    );
}

#[test]
fn test_parse_ds18b20_config_with_defaults() {
    let config: Config = stubs::config::DS18B20_CONFIG.parse().unwrap();
    match &config.temperature {
        TemperatureConfig::Ds18b20 { timeout, wait, .. } => {
            assert_eq!(*timeout, 10.0);
            assert_eq!(*wait, 0.2);
        }
        other => panic!("unexpected sensor: {:?}", other),
    }
    assert!(!config.temperature.needs_gpio());
}

#[test]
fn test_parse_bad_config() {
    // A DHT22 section without its data pin is unusable.
    assert!(stubs::config::BAD_CONFIG.parse::<Config>().is_err());
}
