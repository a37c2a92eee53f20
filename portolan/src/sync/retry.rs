//! Tick-polled retry scheduling.
//!
//! All "asynchronous" behavior in the engine (fetch retries, deferred layer
//! creation) is expressed as state machines polled once per tick against an
//! injectable [`Clock`]. Nothing here spawns tasks or sleeps; cancellation is
//! dropping the schedule.

use maybe_sync::{MaybeSend, MaybeSync};
use web_time::{Duration, Instant};

/// Source of the current instant.
///
/// Production uses [`SystemClock`]; tests drive a manual clock so retry
/// timing is deterministic without real timers.
pub trait Clock: MaybeSend + MaybeSync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

type DelayFn = Box<dyn Fn(u32) -> Duration + MaybeSend + MaybeSync>;

/// How often and how many times an operation may be retried.
pub struct RetryPolicy {
    max_attempts: u32,
    delay: DelayFn,
}

impl RetryPolicy {
    /// Policy with the same delay between every attempt.
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Box::new(move |_| interval),
        }
    }

    /// Policy whose delay after `n` failures is `n² × base`.
    pub fn quadratic(base: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Box::new(move |attempt| base * attempt * attempt),
        }
    }

    /// Delay to wait after the given number of failures.
    pub fn delay_after(&self, failures: u32) -> Duration {
        (self.delay)(failures)
    }

    /// Attempt count past which the schedule is exhausted.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Result of polling a [`RetrySchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStatus {
    /// The next attempt may run now.
    Due,
    /// The backoff delay has not elapsed yet.
    Wait,
    /// The attempt cap was reached. Terminal.
    Exhausted,
}

/// Retry state for one operation.
///
/// The first attempt is due immediately; each recorded failure schedules the
/// next attempt per the policy's delay function. Once the failure count
/// reaches the policy cap the schedule reports [`RetryStatus::Exhausted`]
/// forever.
pub struct RetrySchedule {
    policy: RetryPolicy,
    attempts: u32,
    next_due: Option<Instant>,
}

impl RetrySchedule {
    /// Creates a schedule with no attempts made yet.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            next_due: None,
        }
    }

    /// Whether an attempt may run at `now`.
    pub fn poll(&self, now: Instant) -> RetryStatus {
        if self.attempts >= self.policy.max_attempts() {
            return RetryStatus::Exhausted;
        }

        match self.next_due {
            Some(due) if now < due => RetryStatus::Wait,
            _ => RetryStatus::Due,
        }
    }

    /// Records a failed attempt at `now` and schedules the next one.
    pub fn record_failure(&mut self, now: Instant) {
        self.attempts += 1;
        self.next_due = Some(now + self.policy.delay_after(self.attempts));
    }

    /// Number of failed attempts so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
