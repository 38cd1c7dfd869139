use std::{env, path::PathBuf};

use once_cell::sync::Lazy;

use crate::constants::envvars;

pub static TEMP_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(temp_dir) = env::var(envvars::TEMP_DIR) {
        return temp_dir.into();
    }
    PathBuf::from("/tmp")
});

pub static LOCK_FILE: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(lock_file) = env::var(envvars::LOCK_FILE) {
        return lock_file.into();
    }
    PathBuf::from("/var/tmp/pisense.lock")
});
