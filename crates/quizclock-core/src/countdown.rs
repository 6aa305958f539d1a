//! A cancellable one-second countdown.
//!
//! The countdown does not own a thread or a timer. Its owner calls
//! [`Countdown::tick`] once per elapsed second and reacts to the returned
//! [`CountdownEvent`] on the spot, so a tick and a cancellation can never
//! interleave.

use crate::error::QuizError;

/// What happened on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed; the payload is the time still remaining.
    Tick(u32),
    /// The last second elapsed. Reported exactly once.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running { remaining: u32 },
    Expired,
    Cancelled { remaining: u32 },
}

/// A single logical timer.
#[derive(Debug, Clone)]
pub struct Countdown {
    state: State,
    duration: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            duration: 0,
        }
    }

    /// Begin counting down from `duration_secs`.
    ///
    /// Fails with [`QuizError::AlreadyRunning`] if the countdown is live.
    /// A finished or cancelled countdown can be started again.
    pub fn start(&mut self, duration_secs: u32) -> Result<(), QuizError> {
        if self.is_running() {
            return Err(QuizError::AlreadyRunning);
        }
        if duration_secs == 0 {
            return Err(QuizError::Configuration(
                "countdown duration must be positive".into(),
            ));
        }
        self.duration = duration_secs;
        self.state = State::Running {
            remaining: duration_secs,
        };
        tracing::debug!(duration_secs, "countdown started");
        Ok(())
    }

    /// Advance by one second.
    ///
    /// Returns `None` unless the countdown is running; in particular nothing
    /// is ever reported after [`cancel`](Self::cancel) or after expiry.
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        let State::Running { remaining } = self.state else {
            return None;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.state = State::Expired;
            tracing::debug!("countdown expired");
            Some(CountdownEvent::Expired)
        } else {
            self.state = State::Running { remaining };
            Some(CountdownEvent::Tick(remaining))
        }
    }

    /// Stop the countdown. Idempotent; a no-op once expired.
    pub fn cancel(&mut self) {
        if let State::Running { remaining } = self.state {
            self.state = State::Cancelled { remaining };
            tracing::debug!(remaining, "countdown cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.state, State::Expired)
    }

    /// Seconds left. Zero once expired, and frozen at the cancellation
    /// point after `cancel`.
    pub fn remaining(&self) -> u32 {
        match self.state {
            State::Idle => self.duration,
            State::Running { remaining } | State::Cancelled { remaining } => remaining,
            State::Expired => 0,
        }
    }

    /// The duration the countdown was last started with.
    pub fn duration(&self) -> u32 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_down_then_expires_once() {
        let mut countdown = Countdown::new();
        countdown.start(3).unwrap();

        assert_eq!(countdown.tick(), Some(CountdownEvent::Tick(2)));
        assert_eq!(countdown.tick(), Some(CountdownEvent::Tick(1)));
        assert_eq!(countdown.tick(), Some(CountdownEvent::Expired));
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.tick(), None);
        assert!(countdown.is_expired());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn start_while_running_fails() {
        let mut countdown = Countdown::new();
        countdown.start(10).unwrap();
        assert_eq!(countdown.start(5), Err(QuizError::AlreadyRunning));
        // The original timer is untouched.
        assert_eq!(countdown.remaining(), 10);
    }

    #[test]
    fn cancel_on_the_expiring_tick_suppresses_expiry() {
        let mut countdown = Countdown::new();
        countdown.start(2).unwrap();
        assert_eq!(countdown.tick(), Some(CountdownEvent::Tick(1)));

        // The next tick would expire; cancel first.
        countdown.cancel();
        let expiries = (0..5)
            .filter_map(|_| countdown.tick())
            .filter(|e| *e == CountdownEvent::Expired)
            .count();
        assert_eq!(expiries, 0);
        assert_eq!(countdown.remaining(), 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut countdown = Countdown::new();
        countdown.start(5).unwrap();
        countdown.cancel();
        countdown.cancel();
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), None);
    }

    #[test]
    fn cancelled_countdown_can_restart() {
        let mut countdown = Countdown::new();
        countdown.start(5).unwrap();
        countdown.cancel();
        countdown.start(2).unwrap();
        assert_eq!(countdown.tick(), Some(CountdownEvent::Tick(1)));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut countdown = Countdown::new();
        assert!(matches!(
            countdown.start(0),
            Err(QuizError::Configuration(_))
        ));
    }
}
