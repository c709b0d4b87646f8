//! Retry-until-success with a fixed delay between attempts.
//!
//! There is no attempt ceiling and no backoff: the operation is retried
//! every `delay` until it succeeds. The sleep function is injectable so
//! callers can test the schedule without waiting on a real clock.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

/// A fallible operation that [`FixedDelay`] drives to success.
#[async_trait]
pub trait Attempt: Send {
    type Output: Send;
    type Error: Send;

    /// Run one attempt. `n` starts at 1.
    async fn attempt(&mut self, n: u32) -> Result<Self::Output, Self::Error>;

    /// Called after attempt `n` fails, before the delay.
    fn failed(&mut self, _n: u32, _error: &Self::Error) {}
}

/// The successful value plus how many attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<T> {
    pub value: T,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Retry `op` until it succeeds, sleeping on the tokio timer between attempts.
    pub async fn run<A: Attempt>(&self, op: &mut A) -> Retried<A::Output> {
        self.run_with_sleep(op, tokio::time::sleep).await
    }

    /// Retry `op` until it succeeds, using `sleep` for the delay.
    pub async fn run_with_sleep<A, S, F>(&self, op: &mut A, mut sleep: S) -> Retried<A::Output>
    where
        A: Attempt,
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            match op.attempt(attempts).await {
                Ok(value) => return Retried { value, attempts },
                Err(e) => {
                    op.failed(attempts, &e);
                    sleep(self.delay).await;
                }
            }
        }
    }
}
