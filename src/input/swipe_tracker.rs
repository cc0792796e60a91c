use std::collections::VecDeque;
use std::time::Duration;

/// How far back motion events are kept for velocity estimation.
const HISTORY_LIMIT: Duration = Duration::from_millis(150);

/// Tracks a one-dimensional pointer movement to compute its position and velocity.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    history: VecDeque<Event>,
    pos: f64,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    delta: f64,
    timestamp: Duration,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            pos: 0.,
        }
    }

    /// Records a movement of `delta` at `timestamp`.
    pub fn push(&mut self, delta: f64, timestamp: Duration) {
        if let Some(last) = self.history.back() {
            if timestamp < last.timestamp {
                trace!(
                    "ignoring event with timestamp {timestamp:?} earlier than last {:?}",
                    last.timestamp
                );
                return;
            }
        }

        self.history.push_back(Event { delta, timestamp });
        self.pos += delta;

        self.trim_history();
    }

    /// Total accumulated movement.
    pub fn pos(&self) -> f64 {
        self.pos
    }

    /// Average velocity over the kept history, in units per second.
    pub fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.;
        };

        let total_time = (last.timestamp - first.timestamp).as_secs_f64();
        if total_time == 0. {
            return 0.;
        }

        let total_delta = self.history.iter().map(|event| event.delta).sum::<f64>();
        total_delta / total_time
    }

    fn trim_history(&mut self) {
        let Some(&Event { timestamp: now, .. }) = self.history.back() else {
            return;
        };

        while let Some(first) = self.history.front() {
            if now <= first.timestamp + HISTORY_LIMIT {
                break;
            }

            let _ = self.history.pop_front();
        }
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn constant_motion_velocity() {
        let mut tracker = SwipeTracker::new();
        for i in 0..=10 {
            tracker.push(if i == 0 { 0. } else { 5. }, Duration::from_millis(i * 10));
        }
        assert_eq!(tracker.pos(), 50.);
        assert_abs_diff_eq!(tracker.velocity(), 500., epsilon = 1e-9);
    }

    #[test]
    fn old_events_are_forgotten() {
        let mut tracker = SwipeTracker::new();
        tracker.push(0., Duration::ZERO);
        tracker.push(100., Duration::from_millis(10));
        tracker.push(0., Duration::from_millis(500));
        tracker.push(0., Duration::from_millis(510));
        assert_eq!(tracker.pos(), 100.);
        assert_eq!(tracker.velocity(), 0.);
    }

    #[test]
    fn out_of_order_events_are_ignored() {
        let mut tracker = SwipeTracker::new();
        tracker.push(10., Duration::from_millis(20));
        tracker.push(10., Duration::from_millis(10));
        assert_eq!(tracker.pos(), 10.);
    }
}
