use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("failed to acquire lock at {0} after {1} attempts")]
    Busy(PathBuf, u32),
    #[error("lock file error: {0}")]
    Io(#[from] io::Error),
}

/// Advisory PID-file lock guarding against overlapping measurement cycles.
///
/// The file is created exclusively and holds this process's PID; it is
/// removed when the guard is dropped, including on an aborted cycle.
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    pub fn acquire(path: &Path, retries: u32, retry_interval: Duration) -> Result<Self, LockError> {
        log::debug!("Acquiring lock at {}", path.display());
        for attempt in 1..=retries.max(1) {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    write!(file, "{}", std::process::id())?;
                    log::debug!("Lock acquired");
                    return Ok(Self { path: path.to_path_buf() });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log::debug!(
                        "Lock at {} held by another process (attempt {}/{})",
                        path.display(),
                        attempt,
                        retries
                    );
                    if attempt < retries {
                        thread::sleep(retry_interval);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LockError::Busy(path.to_path_buf(), retries))
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        log::debug!("Relinquishing lock");
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("No lock to relinquish: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_writes_pid_and_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pisense.lock");

        let lock = LockFile::acquire(&path, 1, Duration::ZERO).unwrap();
        let pid: u32 = fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(pid, std::process::id());

        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn contended_lock_gives_up_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pisense.lock");

        let _held = LockFile::acquire(&path, 1, Duration::ZERO).unwrap();
        let result = LockFile::acquire(&path, 3, Duration::ZERO);
        assert!(matches!(result, Err(LockError::Busy(_, 3))));
    }

    #[test]
    fn lock_can_be_reacquired_after_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pisense.lock");

        drop(LockFile::acquire(&path, 1, Duration::ZERO).unwrap());
        assert!(LockFile::acquire(&path, 1, Duration::ZERO).is_ok());
    }
}
