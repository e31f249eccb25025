//! Blinking prompt cursor.
//!
//! Visibility is derived from elapsed time alone. Nothing about the blink is
//! stored anywhere, and it never touches reveal state.

use std::time::{Duration, Instant};

pub const CURSOR_GLYPH: &str = "█";

#[derive(Debug, Clone, Copy)]
pub struct CursorBlink {
    origin: Instant,
    half_period: Duration,
}

impl CursorBlink {
    pub fn new(origin: Instant, half_period: Duration) -> Self {
        Self {
            origin,
            half_period: half_period.max(Duration::from_millis(1)),
        }
    }

    /// On for the first half-period, off for the next, and so on.
    pub fn is_visible(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.origin).as_millis();
        (elapsed / self.half_period.as_millis()) % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_alternates_each_half_period() {
        let origin = Instant::now();
        let blink = CursorBlink::new(origin, Duration::from_millis(500));

        assert!(blink.is_visible(origin));
        assert!(blink.is_visible(origin + Duration::from_millis(499)));
        assert!(!blink.is_visible(origin + Duration::from_millis(500)));
        assert!(!blink.is_visible(origin + Duration::from_millis(999)));
        assert!(blink.is_visible(origin + Duration::from_millis(1000)));
    }

    #[test]
    fn test_time_before_origin_counts_as_visible() {
        let origin = Instant::now() + Duration::from_secs(1);
        let blink = CursorBlink::new(origin, Duration::from_millis(500));
        assert!(blink.is_visible(Instant::now()));
    }

    #[test]
    fn test_zero_period_does_not_divide_by_zero() {
        let origin = Instant::now();
        let blink = CursorBlink::new(origin, Duration::ZERO);
        let _ = blink.is_visible(origin + Duration::from_millis(3));
    }
}
