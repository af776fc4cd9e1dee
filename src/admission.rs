use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Single global admission gate enforcing a minimum spacing between
/// accepted requests.
///
/// The check and the timestamp update happen inside one critical section,
/// so two requests landing within the window can never both observe a
/// stale `last_accepted` and both pass. A rejected request leaves the
/// state untouched.
#[derive(Debug)]
pub struct AdmissionGate {
    min_interval: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl AdmissionGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: Mutex::new(None),
        }
    }

    /// Returns true and records `now` if the request is admitted, false if
    /// it arrived inside the spacing window of the last accepted request.
    pub fn try_admit(&self, now: Instant) -> bool {
        let mut last = self
            .last_accepted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match *last {
            Some(prev) if now.saturating_duration_since(prev) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(950);

    #[test]
    fn first_request_is_admitted() {
        let gate = AdmissionGate::new(WINDOW);
        assert!(gate.try_admit(Instant::now()));
    }

    #[test]
    fn request_inside_window_is_rejected() {
        let gate = AdmissionGate::new(WINDOW);
        let t0 = Instant::now();
        assert!(gate.try_admit(t0));
        assert!(!gate.try_admit(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn request_past_window_is_admitted() {
        let gate = AdmissionGate::new(WINDOW);
        let t0 = Instant::now();
        assert!(gate.try_admit(t0));
        assert!(gate.try_admit(t0 + Duration::from_millis(951)));
    }

    #[test]
    fn rejection_does_not_move_the_window() {
        let gate = AdmissionGate::new(WINDOW);
        let t0 = Instant::now();
        assert!(gate.try_admit(t0));
        // Rejected probe must not reset the spacing reference point.
        assert!(!gate.try_admit(t0 + Duration::from_millis(900)));
        assert!(gate.try_admit(t0 + Duration::from_millis(1000)));
    }

    #[test]
    fn of_two_close_requests_at_most_one_passes() {
        let gate = AdmissionGate::new(WINDOW);
        let t0 = Instant::now();
        let admitted = [t0, t0 + Duration::from_millis(10)]
            .iter()
            .filter(|&&t| gate.try_admit(t))
            .count();
        assert_eq!(admitted, 1);
    }
}
