//! # Connection Retry Policy
//!
//! Exponential backoff for opening a printer connection. Only errors that
//! [`TermicaError::is_transient`] reports are retried; validation and
//! configuration errors return immediately.
//!
//! ```text
//! attempt 1 ── fail ── wait initial_delay
//! attempt 2 ── fail ── wait initial_delay × multiplier
//! attempt 3 ── fail ── wait min(initial_delay × multiplier², max_delay)
//! ...
//! attempt max_attempts ── fail ── return last error
//! ```

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, TermicaError};

/// Retry schedule for connection establishment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
}

impl Default for Backoff {
    /// 3 attempts, 200ms doubling, capped at 2s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            multiplier: 2.0,
            max_delay: Duration::from_secs(2),
        }
    }
}

impl Backoff {
    /// Build a policy.
    ///
    /// ## Errors
    ///
    /// [`TermicaError::Config`] when `max_attempts` is 0, `multiplier` is
    /// below 1.0 or not finite, or `max_delay < initial_delay`.
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
    ) -> Result<Self> {
        if max_attempts == 0 {
            return Err(TermicaError::Config(
                "backoff needs at least one attempt".to_string(),
            ));
        }
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(TermicaError::Config(format!(
                "backoff multiplier must be >= 1.0, got {}",
                multiplier
            )));
        }
        if max_delay < initial_delay {
            return Err(TermicaError::Config(format!(
                "backoff max delay {:?} is shorter than initial delay {:?}",
                max_delay, initial_delay
            )));
        }
        Ok(Self {
            max_attempts,
            initial_delay,
            multiplier,
            max_delay,
        })
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the failed `attempt` (1-based).
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exp);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    pub fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        self.run_with_sleep(op, thread::sleep)
    }

    fn run_with_sleep<T, F, S>(&self, mut op: F, mut sleep: S) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
        S: FnMut(Duration),
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.next_delay(attempt);
                    warn!(attempt, ?delay, error = %e, "connection attempt failed, retrying");
                    sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn policy() -> Backoff {
        Backoff::new(
            4,
            Duration::from_millis(100),
            2.0,
            Duration::from_millis(300),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let ms = Duration::from_millis;
        for result in [
            Backoff::new(0, ms(10), 2.0, ms(100)),
            Backoff::new(3, ms(10), 0.5, ms(100)),
            Backoff::new(3, ms(10), f64::NAN, ms(100)),
            Backoff::new(3, ms(200), 2.0, ms(100)),
        ] {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn test_delays_grow_and_cap() {
        let b = policy();
        assert_eq!(b.next_delay(1), Duration::from_millis(100));
        assert_eq!(b.next_delay(2), Duration::from_millis(200));
        assert_eq!(b.next_delay(3), Duration::from_millis(300));
        assert_eq!(b.next_delay(40), Duration::from_millis(300));
    }

    #[test]
    fn test_retries_transient_until_success() {
        let mut slept = Vec::new();
        let result = policy().run_with_sleep(
            |attempt| {
                if attempt < 3 {
                    Err(TermicaError::Connection("refused".into()))
                } else {
                    Ok(attempt)
                }
            },
            |d| slept.push(d),
        );
        assert_eq!(result.unwrap(), 3);
        assert_eq!(
            slept,
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<()> = policy().run_with_sleep(
            |_| {
                calls += 1;
                Err(TermicaError::Connection("refused".into()))
            },
            |_| {},
        );
        assert!(result.is_err());
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_permanent_error_not_retried() {
        let mut calls = 0;
        let result: Result<()> = policy().run_with_sleep(
            |_| {
                calls += 1;
                Err(TermicaError::Config("bad address".into()))
            },
            |_| panic!("should not sleep"),
        );
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_none_is_single_attempt() {
        let mut calls = 0;
        let _: Result<()> = Backoff::none().run_with_sleep(
            |_| {
                calls += 1;
                Err(TermicaError::Connection("down".into()))
            },
            |_| {},
        );
        assert_eq!(calls, 1);
    }
}
