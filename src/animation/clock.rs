use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Shared animation clock.
///
/// All animations driven by one clock observe the same time within a frame. The host calls
/// [`Clock::clear`] once per frame so that the next query samples the monotonic time again.
/// Tests drive the clock manually with [`Clock::with_time`] and [`Clock::set_unadjusted`].
#[derive(Debug, Default, Clone)]
pub struct Clock {
    inner: Rc<RefCell<AdjustableClock>>,
}

#[derive(Debug, Default)]
struct LazyClock {
    origin: Option<Instant>,
    time: Option<Duration>,
}

/// Clock that can have its rate adjusted and can jump to the end of all animations.
#[derive(Debug)]
struct AdjustableClock {
    inner: LazyClock,
    current_time: Duration,
    last_seen_time: Duration,
    rate: f64,
    complete_instantly: bool,
}

impl Clock {
    /// Creates a new clock with the given time, which is never advanced automatically.
    pub fn with_time(time: Duration) -> Self {
        let clock = AdjustableClock::new(LazyClock::with_time(time));
        Self {
            inner: Rc::new(RefCell::new(clock)),
        }
    }

    /// Returns the current adjusted time.
    pub fn now(&self) -> Duration {
        self.inner.borrow_mut().now()
    }

    /// Returns the current unadjusted time.
    pub fn now_unadjusted(&self) -> Duration {
        self.inner.borrow_mut().inner.now()
    }

    /// Overrides the current unadjusted time.
    pub fn set_unadjusted(&mut self, time: Duration) {
        self.inner.borrow_mut().inner.set(time);
    }

    /// Clears the stored time so it's re-sampled on the next query.
    pub fn clear(&mut self) {
        self.inner.borrow_mut().inner.clear();
    }

    pub fn rate(&self) -> f64 {
        self.inner.borrow().rate
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.inner.borrow_mut().set_rate(rate);
    }

    pub fn should_complete_instantly(&self) -> bool {
        self.inner.borrow().complete_instantly
    }

    pub fn set_complete_instantly(&mut self, value: bool) {
        self.inner.borrow_mut().complete_instantly = value;
    }
}

impl PartialEq for Clock {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Clock {}

impl LazyClock {
    fn with_time(time: Duration) -> Self {
        Self {
            origin: None,
            time: Some(time),
        }
    }

    fn clear(&mut self) {
        // A manually driven clock keeps its time.
        if self.origin.is_some() || self.time.is_none() {
            self.time = None;
        }
    }

    fn set(&mut self, time: Duration) {
        self.time = Some(time);
    }

    fn now(&mut self) -> Duration {
        if let Some(time) = self.time {
            return time;
        }

        let origin = *self.origin.get_or_insert_with(Instant::now);
        let time = origin.elapsed();
        self.time = Some(time);
        time
    }
}

impl AdjustableClock {
    fn new(mut inner: LazyClock) -> Self {
        let time = inner.now();
        Self {
            inner,
            current_time: time,
            last_seen_time: time,
            rate: 1.,
            complete_instantly: false,
        }
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate.clamp(0., 1000.);
    }

    fn now(&mut self) -> Duration {
        let time = self.inner.now();

        if self.last_seen_time == time {
            return self.current_time;
        }

        if self.last_seen_time < time {
            let delta = time - self.last_seen_time;
            let delta = delta.mul_f64(self.rate);
            self.current_time = self.current_time.saturating_add(delta);
        } else {
            let delta = self.last_seen_time - time;
            let delta = delta.mul_f64(self.rate);
            self.current_time = self.current_time.saturating_sub(delta);
        }

        self.last_seen_time = time;
        self.current_time
    }
}

impl Default for AdjustableClock {
    fn default() -> Self {
        Self::new(LazyClock::default())
    }
}
