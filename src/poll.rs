// ABOUTME: Single poll utility shared by instance discovery, readiness, and status polling.
// ABOUTME: Iterative loop over an injected clock with fixed or linearly growing waits.

use std::future::Future;
use std::time::Duration;

use crate::clock::Clock;

/// How often to poll and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Wait after the first unsatisfied poll.
    pub interval: Duration,
    /// Added to the wait after every unsatisfied poll. Zero means fixed cadence.
    pub increment: Duration,
    /// Wall-clock budget. `None` polls until the predicate holds.
    pub timeout: Option<Duration>,
}

impl PollSchedule {
    /// Fixed cadence bounded by a timeout.
    pub fn fixed(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            increment: Duration::ZERO,
            timeout: Some(timeout),
        }
    }

    /// Linearly growing waits with no upper bound on the wait or attempt count.
    pub fn linear(base: Duration, increment: Duration) -> Self {
        Self {
            interval: base,
            increment,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Backoff state for one poll loop.
///
/// The wait never decreases and never drops below the base interval.
#[derive(Debug, Clone, Copy)]
pub struct PollState {
    current_wait: Duration,
    increment: Duration,
}

impl PollState {
    pub fn new(schedule: &PollSchedule) -> Self {
        Self {
            current_wait: schedule.interval,
            increment: schedule.increment,
        }
    }

    pub fn current_wait(&self) -> Duration {
        self.current_wait
    }

    /// Return the wait to use now and grow the next one.
    pub fn advance(&mut self) -> Duration {
        let wait = self.current_wait;
        self.current_wait = self.current_wait.saturating_add(self.increment);
        wait
    }
}

/// Why a poll loop stopped without the predicate holding.
#[derive(Debug)]
pub enum PollError<E> {
    /// The budget ran out.
    TimedOut { attempts: u32, elapsed: Duration },
    /// A fetch failed; fetch errors are never retried.
    Failed(E),
}

/// Fetch repeatedly until `done` accepts a value.
///
/// A fetch error ends the loop immediately. With a timeout, no poll happens
/// past the budget. A fixed cadence shortens its final sleep so the budget
/// boundary itself gets polled. A growing schedule never sleeps less than its
/// current wait, so it times out once that wait would overrun the budget.
pub async fn poll_until<T, E, F, Fut, P>(
    clock: &dyn Clock,
    schedule: &PollSchedule,
    mut fetch: F,
    mut done: P,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&T) -> bool,
{
    let started = clock.now();
    let mut state = PollState::new(schedule);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let value = fetch().await.map_err(PollError::Failed)?;
        if done(&value) {
            tracing::debug!(attempts, "poll condition met");
            return Ok(value);
        }

        let mut wait = state.advance();
        if let Some(timeout) = schedule.timeout {
            let elapsed = clock.now().saturating_duration_since(started);
            let remaining = timeout.saturating_sub(elapsed);
            let overruns = !schedule.increment.is_zero() && wait > remaining;
            if remaining.is_zero() || overruns {
                tracing::debug!(attempts, ?elapsed, "poll budget exhausted");
                return Err(PollError::TimedOut { attempts, elapsed });
            }
            wait = wait.min(remaining);
        }

        tracing::debug!(attempts, wait_ms = wait.as_millis() as u64, "condition not met, waiting");
        clock.sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_state_never_grows() {
        let schedule = PollSchedule::fixed(Duration::from_secs(10), Duration::from_secs(60));
        let mut state = PollState::new(&schedule);
        assert_eq!(state.advance(), Duration::from_secs(10));
        assert_eq!(state.advance(), Duration::from_secs(10));
        assert_eq!(state.current_wait(), Duration::from_secs(10));
    }

    #[test]
    fn linear_state_grows_by_increment() {
        let schedule = PollSchedule::linear(Duration::from_secs(30), Duration::from_secs(15));
        let mut state = PollState::new(&schedule);
        let waits: Vec<_> = (0..4).map(|_| state.advance().as_secs()).collect();
        assert_eq!(waits, vec![30, 45, 60, 75]);
    }
}
