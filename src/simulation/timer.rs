use std::time::{Duration, Instant};

/// A repeating timer polled from the frame loop.
///
/// `poll` fires at most once per call. When it fires, the next deadline is
/// re-armed relative to the instant passed in, so periods missed while the
/// window was not repainting are dropped rather than replayed.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_deadline: Instant,
}

impl Ticker {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_deadline: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_deadline {
            return false;
        }
        self.next_deadline = now + self.period;
        true
    }

    /// Restart the period from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.next_deadline = now + self.period;
    }

    pub fn deadline(&self) -> Instant {
        self.next_deadline
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }
}

/// One-shot delay used to chain the voice assistant stages.
#[derive(Debug, Clone, Copy)]
pub struct Delay {
    deadline: Instant,
}

impl Delay {
    pub fn new(delay: Duration, now: Instant) -> Self {
        Self {
            deadline: now + delay,
        }
    }

    pub fn elapsed(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_does_not_fire_early() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(2000), start);
        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(1999)));
        assert!(ticker.poll(start + Duration::from_millis(2000)));
    }

    #[test]
    fn test_ticker_fires_once_per_poll_and_drops_missed_periods() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(100), start);

        // ten periods late, still only one tick
        let late = start + Duration::from_millis(1000);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.deadline(), late + Duration::from_millis(100));
    }

    #[test]
    fn test_ticker_reset_pushes_deadline() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(100), start);
        ticker.reset(start + Duration::from_millis(90));
        assert!(!ticker.poll(start + Duration::from_millis(150)));
        assert!(ticker.poll(start + Duration::from_millis(190)));
    }

    #[test]
    fn test_remaining_saturates() {
        let start = Instant::now();
        let ticker = Ticker::new(Duration::from_millis(100), start);
        assert_eq!(
            ticker.remaining(start + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
        assert_eq!(
            ticker.remaining(start + Duration::from_secs(5)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_delay() {
        let start = Instant::now();
        let delay = Delay::new(Duration::from_millis(3000), start);
        assert!(!delay.elapsed(start + Duration::from_millis(2999)));
        assert!(delay.elapsed(start + Duration::from_millis(3000)));
    }
}
