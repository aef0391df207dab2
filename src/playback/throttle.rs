//! Rate limiter that keeps only the latest rejected input.

/// Accepts at most one value per interval.
///
/// A value offered too early is held as pending, replacing any earlier
/// pending value; [`Throttle::flush`] releases it once the interval is up.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval_ms: f64,
    last_accepted: Option<f64>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
            pending: None,
        }
    }

    fn ready(&self, now_ms: f64) -> bool {
        self.last_accepted
            .map_or(true, |t| now_ms - t >= self.interval_ms)
    }

    /// Offer `value` at `now_ms`. Returns it if accepted.
    pub fn offer(&mut self, now_ms: f64, value: T) -> Option<T> {
        if self.ready(now_ms) {
            self.last_accepted = Some(now_ms);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the pending value if the interval has elapsed.
    pub fn flush(&mut self, now_ms: f64) -> Option<T> {
        if self.pending.is_some() && self.ready(now_ms) {
            self.last_accepted = Some(now_ms);
            self.pending.take()
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}
