use std::fmt::Display;
use std::time::Duration;

use super::Delay;

/// Classifies an operation failure for the retry loop: transient errors are
/// retried at a fixed interval up to the attempt bound, permanent errors
/// stop the loop immediately.
#[derive(Debug)]
pub enum RetryError<E> {
    Transient(E),
    Permanent(E),
}

/// Run `fn_to_try` up to `max_attempts` times, sleeping `interval` between
/// transient failures. There is no sleep after the final attempt.
pub fn retry_fixed<F, T, E>(
    max_attempts: u32,
    interval: Duration,
    delay: &mut dyn Delay,
    mut fn_to_try: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Result<T, RetryError<E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match fn_to_try() {
            Ok(value) => return Ok(value),
            Err(RetryError::Permanent(e)) => return Err(RetryError::Permanent(e)),
            Err(RetryError::Transient(e)) => {
                log::warn!(
                    "Temporary error on attempt {}/{}: {}",
                    attempt,
                    max_attempts,
                    e
                );
                if attempt >= max_attempts {
                    return Err(RetryError::Transient(e));
                }
                delay.sleep(interval);
            }
        }
    }
}
