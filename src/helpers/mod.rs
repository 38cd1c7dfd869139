mod delay;
mod lockfile;
mod retry;

pub use delay::{Delay, ThreadDelay};
pub use lockfile::{LockError, LockFile};
pub use retry::{retry_fixed, RetryError};

pub mod base_path;

#[cfg(test)]
pub use delay::RecordingDelay;
