use std::time::{Duration, Instant};

// Pull-to-refresh cooldown
pub const REFRESH_COOLDOWN: Duration = Duration::from_secs(6);

// Debounce on the last accepted refresh. A request inside the window is
// dropped outright, not queued or delayed, and does not move the stored
// timestamp. Bursts exactly at the boundary are allowed.
#[derive(Debug)]
pub struct RefreshGate {
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl RefreshGate {
    pub fn new(cooldown: Duration) -> Self {
        RefreshGate {
            cooldown,
            last_accepted: None,
        }
    }

    pub fn try_begin(&mut self) -> bool {
        self.try_begin_at(Instant::now())
    }

    // Unconditional accept, used for the mount-time load
    pub fn begin(&mut self) {
        self.last_accepted = Some(Instant::now());
    }

    fn try_begin_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_accepted() {
        let mut gate = RefreshGate::new(REFRESH_COOLDOWN);
        assert!(gate.try_begin_at(Instant::now()));
    }

    #[test]
    fn requests_inside_the_window_are_dropped() {
        let mut gate = RefreshGate::new(REFRESH_COOLDOWN);
        let t0 = Instant::now();
        assert!(gate.try_begin_at(t0));
        assert!(!gate.try_begin_at(t0 + Duration::from_millis(1)));
        assert!(!gate.try_begin_at(t0 + Duration::from_millis(5999)));
    }

    #[test]
    fn boundary_request_is_accepted_and_moves_the_timestamp() {
        let mut gate = RefreshGate::new(REFRESH_COOLDOWN);
        let t0 = Instant::now();
        assert!(gate.try_begin_at(t0));
        assert!(gate.try_begin_at(t0 + Duration::from_secs(6)));
        // window restarts from the newly accepted request
        assert!(!gate.try_begin_at(t0 + Duration::from_secs(11)));
        assert!(gate.try_begin_at(t0 + Duration::from_secs(12)));
    }

    #[test]
    fn dropped_requests_do_not_extend_the_window() {
        let mut gate = RefreshGate::new(REFRESH_COOLDOWN);
        let t0 = Instant::now();
        assert!(gate.try_begin_at(t0));
        assert!(!gate.try_begin_at(t0 + Duration::from_secs(5)));
        // still measured from t0, not from the dropped request
        assert!(gate.try_begin_at(t0 + Duration::from_secs(6)));
    }
}
