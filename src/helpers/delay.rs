use std::thread;
use std::time::Duration;

/// Sleep abstraction for poll and retry loops.
///
/// Injected so that the bounded loops in the DS18B20 poller and the
/// uploader can be tested without real wall-clock delays.
pub trait Delay {
    fn sleep(&mut self, dur: Duration);
}

pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn sleep(&mut self, dur: Duration) {
        thread::sleep(dur);
    }
}

#[cfg(test)]
pub struct RecordingDelay {
    pub slept: Vec<Duration>,
}

#[cfg(test)]
impl RecordingDelay {
    pub fn new() -> Self {
        Self { slept: Vec::new() }
    }
}

#[cfg(test)]
impl Delay for RecordingDelay {
    fn sleep(&mut self, dur: Duration) {
        self.slept.push(dur);
    }
}
