//! Time-driven text effects: typed-out headline and counting statistics.
//!
//! Both are pure functions of elapsed time so callers can sample them from
//! any clock.

use std::time::Duration;

pub const TYPE_INTERVAL: Duration = Duration::from_millis(100);
pub const COUNTER_STEP: Duration = Duration::from_millis(20);
const COUNTER_STEPS: u64 = 100;

#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    interval: Duration,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            interval: TYPE_INTERVAL,
        }
    }

    fn typed_chars(&self, elapsed: Duration) -> usize {
        if self.interval.is_zero() {
            return usize::MAX;
        }
        usize::try_from(elapsed.as_nanos() / self.interval.as_nanos()).unwrap_or(usize::MAX)
    }

    /// Prefix shown after `elapsed`, one character per interval.
    pub fn visible_at(&self, elapsed: Duration) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.typed_chars(elapsed))
            .map_or(self.text.len(), |(idx, _)| idx);
        &self.text[..end]
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        self.typed_chars(elapsed) >= self.text.chars().count()
    }
}

/// Counts up to `target` in a hundred equal increments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterAnimation {
    target: u64,
}

impl CounterAnimation {
    pub const fn new(target: u64) -> Self {
        Self { target }
    }

    pub const fn target(&self) -> u64 {
        self.target
    }

    pub fn value_at(&self, elapsed: Duration) -> u64 {
        let steps = u64::try_from(elapsed.as_nanos() / COUNTER_STEP.as_nanos()).unwrap_or(u64::MAX);
        if steps >= COUNTER_STEPS {
            return self.target;
        }
        // floor(steps * target / 100) without losing precision on large targets
        let value = u128::from(steps) * u128::from(self.target) / u128::from(COUNTER_STEPS);
        u64::try_from(value).unwrap_or(self.target).min(self.target)
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        self.value_at(elapsed) == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::{CounterAnimation, Typewriter};
    use std::time::Duration;

    #[test]
    fn typewriter_reveals_one_char_per_tick() {
        let typed = Typewriter::new("مرحبا dev");
        assert_eq!(typed.visible_at(Duration::ZERO), "");
        assert_eq!(typed.visible_at(Duration::from_millis(250)), "مر");
        assert!(!typed.is_done(Duration::from_millis(800)));
        assert_eq!(typed.visible_at(Duration::from_secs(1)), "مرحبا dev");
        assert!(typed.is_done(Duration::from_millis(900)));
    }

    #[test]
    fn counter_steps_and_clamps() {
        let counter = CounterAnimation::new(250);
        assert_eq!(counter.value_at(Duration::ZERO), 0);
        assert_eq!(counter.value_at(Duration::from_millis(20)), 2);
        assert_eq!(counter.value_at(Duration::from_millis(1000)), 125);
        assert_eq!(counter.value_at(Duration::from_millis(1990)), 247);
        assert_eq!(counter.value_at(Duration::from_secs(2)), 250);
        assert!(counter.is_done(Duration::from_secs(30)));
    }
}
