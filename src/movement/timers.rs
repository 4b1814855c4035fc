//! Movement domain: fixed-tick countdowns for coyote time, jump buffering and landing lock.

/// Remaining time below this counts as expired.
pub const TIMER_EPSILON: f32 = 1e-5;

/// A one-shot countdown advanced once per fixed tick.
///
/// Starting an active countdown replaces it; there is never more than one
/// pending instance of the same logical timer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: Option<f32>,
}

impl Countdown {
    /// A zero duration is active for the current tick only.
    pub fn start(&mut self, duration: f32) {
        self.remaining = Some(duration.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, zero when inactive.
    pub fn remaining(&self) -> f32 {
        self.remaining.unwrap_or(0.0)
    }

    /// Advance by `dt`. Returns true on the tick the countdown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };

        let left = remaining - dt;
        if left <= TIMER_EPSILON {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }
}
