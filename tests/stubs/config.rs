pub const FULL_CONFIG: &str = r#"
{
    "led": {"pin": 21},
    "internal": {"file": "/sys/class/thermal/thermal_zone0/temp"},
    "temperature": {
        "sensor": "dht22",
        "pin": 4,
        "tolerance": 5,
        "threshold": 32
    },
    "light": {
        "pins": [23, 24],
        "capacitance": 1.0,
        "resistance": 2200,
        "voltage": 3.3,
        "samples": 20,
        "timeout": 300
    },
    "api": {
        "endpoint": "https://api.example.com/v1/readings",
        "api_key": "0123456789abcdef",
        "timeout": 30,
        "max_retries": 10
    }
}
"#;

pub const DS18B20_CONFIG: &str = r#"
{
    "temperature": {
        "sensor": "ds18b20"
    }
}
"#;

pub const BAD_CONFIG: &str = r#"
{
    "temperature": {
        "sensor": "dht22"
    }
}
"#;
