//! Last-accepted-temperature store backing the DHT22 consistency check.
//!
//! The on-disk form is a single decimal line in a scratch file, overwritten
//! after every raw read. There is no locking here; the caller's process
//! lock is the only thing keeping writers exclusive.

use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;

use crate::helpers::base_path;

pub static REF_CACHE_PATH: Lazy<PathBuf> =
    Lazy::new(|| base_path::TEMP_DIR.join("pisense-ref-temp"));

pub trait RefCache {
    /// The cached reference, or `None` if it is absent or unreadable.
    fn get(&self) -> Option<f64>;
    fn set(&self, value: f64) -> anyhow::Result<()>;
}

pub struct FileRefCache {
    path: PathBuf,
}

impl FileRefCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_path() -> Self {
        Self::new(REF_CACHE_PATH.clone())
    }
}

impl RefCache for FileRefCache {
    fn get(&self) -> Option<f64> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("No reference cache at {}: {}", self.path.display(), e);
                return None;
            }
        };
        match raw.trim().parse::<f64>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!(
                    "Discarding unparseable reference cache {:?} at {}: {}",
                    raw,
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn set(&self, value: f64) -> anyhow::Result<()> {
        fs::write(&self.path, format!("{:.6}\n", value))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_in(dir: &tempfile::TempDir) -> FileRefCache {
        FileRefCache::new(dir.path().join("ref-temp"))
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cache_in(&dir).get(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.set(23.5).unwrap();
        assert_eq!(cache.get(), Some(23.5));
    }

    #[test]
    fn file_holds_a_single_decimal_line() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.set(23.5).unwrap();
        let raw = fs::read_to_string(dir.path().join("ref-temp")).unwrap();
        assert_eq!(raw, "23.500000\n");
    }

    #[test]
    fn corrupt_content_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        fs::write(dir.path().join("ref-temp"), "not a number\n").unwrap();
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.set(20.0).unwrap();
        cache.set(-4.25).unwrap();
        assert_eq!(cache.get(), Some(-4.25));
    }
}
