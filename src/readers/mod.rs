pub mod cpu_thermal;
pub mod dht22;
pub mod ds18b20;
pub mod photoresistor;
