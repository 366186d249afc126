use std::time::{Duration, Instant};

/// How long the copied acknowledgment stays visible.
pub const COPIED_BANNER_DURATION: Duration = Duration::from_millis(2000);

/// Single pending expiry. Arming again replaces the previous deadline, so at
/// most one expiry is ever outstanding.
#[derive(Debug, Clone)]
pub struct ExpiryTimer {
    duration: Duration,
    deadline: Option<Instant>,
}

impl ExpiryTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.duration);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarms the timer once its deadline has passed. Returns true only on
    /// the call that performs the expiry.
    pub fn expire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl Default for ExpiryTimer {
    fn default() -> Self {
        Self::new(COPIED_BANNER_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once_after_duration() {
        let start = Instant::now();
        let mut timer = ExpiryTimer::new(Duration::from_millis(2000));
        timer.arm(start);

        assert!(!timer.expire_if_due(start + Duration::from_millis(1999)));
        assert!(timer.is_armed());
        assert!(timer.expire_if_due(start + Duration::from_millis(2000)));
        assert!(!timer.is_armed());
        assert!(!timer.expire_if_due(start + Duration::from_millis(5000)));
    }

    #[test]
    fn rearming_replaces_deadline() {
        let start = Instant::now();
        let mut timer = ExpiryTimer::default();
        timer.arm(start);
        timer.arm(start + Duration::from_millis(1500));

        assert!(!timer.expire_if_due(start + Duration::from_millis(2500)));
        assert_eq!(
            timer.remaining(start + Duration::from_millis(2500)),
            Some(Duration::from_millis(1000))
        );
        assert!(timer.expire_if_due(start + Duration::from_millis(3500)));
    }

    #[test]
    fn unarmed_timer_has_nothing_remaining() {
        let timer = ExpiryTimer::default();
        assert!(!timer.is_armed());
        assert_eq!(timer.remaining(Instant::now()), None);
    }
}
