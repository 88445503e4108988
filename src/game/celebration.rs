//! Short-lived overlays: the winner banner and the bonus notification.

use std::time::{Duration, Instant};

/// How long the winner banner stays up.
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(3);

/// How long the bonus notification stays up.
pub const BONUS_DURATION: Duration = Duration::from_millis(2500);

/// A payload that is visible for a fixed window after being shown.
#[derive(Debug, Clone)]
pub struct Flash<T> {
    current: Option<(T, Instant)>,
    duration: Duration,
}

impl<T> Flash<T> {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            duration,
        }
    }

    /// Show `payload`, restarting the window if something is already up.
    pub fn show(&mut self, payload: T, now: Instant) {
        self.current = Some((payload, now));
    }

    /// The payload while its window is open.
    pub fn visible(&self, now: Instant) -> Option<&T> {
        match &self.current {
            Some((payload, shown)) if now.duration_since(*shown) < self.duration => Some(payload),
            _ => None,
        }
    }

    /// Drop an expired payload. Returns it exactly once, when the window closes.
    pub fn expire(&mut self, now: Instant) -> Option<T> {
        let expired = matches!(
            &self.current,
            Some((_, shown)) if now.duration_since(*shown) >= self.duration
        );
        if expired {
            self.current.take().map(|(payload, _)| payload)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_for_exactly_the_window() {
        let start = Instant::now();
        let mut banner = Flash::new(CELEBRATION_DURATION);
        assert!(banner.visible(start).is_none());

        banner.show("Ana".to_string(), start);
        assert_eq!(banner.visible(start).map(String::as_str), Some("Ana"));
        assert!(banner.visible(start + Duration::from_millis(2999)).is_some());
        assert!(banner.visible(start + CELEBRATION_DURATION).is_none());
    }

    #[test]
    fn test_expire_fires_once() {
        let start = Instant::now();
        let mut banner = Flash::new(Duration::from_secs(1));
        banner.show(1, start);

        assert_eq!(banner.expire(start), None);
        assert_eq!(banner.expire(start + Duration::from_secs(1)), Some(1));
        assert_eq!(banner.expire(start + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_show_again_restarts() {
        let start = Instant::now();
        let mut banner = Flash::new(Duration::from_secs(3));
        banner.show("a", start);
        banner.show("b", start + Duration::from_secs(2));
        assert_eq!(banner.visible(start + Duration::from_secs(4)), Some(&"b"));
    }
}
