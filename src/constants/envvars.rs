pub const TEMP_DIR: &str = "PISENSE_TEMP_DIR";
pub const LOCK_FILE: &str = "PISENSE_LOCK_FILE";

pub const LOG_LEVEL: &str = "LOG_LEVEL";
