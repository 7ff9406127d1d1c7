//! Availability probing for the backing stores.
//!
//! A probe runs a connect-and-health-check closure until it succeeds or the
//! retry budget is spent. The retry loop is an explicit [`ProbeState`]
//! machine and waiting goes through a [`Sleeper`], so tests can drive it
//! without a network or real sleeps.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

/// Retry budget for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub attempts: u32,
    /// Wait between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// State of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// About to run the given attempt (1-based).
    Probing { attempt: u32 },
    /// The health check passed.
    Connected,
    /// Every attempt failed.
    Exhausted,
}

impl ProbeState {
    /// Initial state for a budget of `attempts`.
    pub fn start(attempts: u32) -> Self {
        if attempts == 0 {
            Self::Exhausted
        } else {
            Self::Probing { attempt: 1 }
        }
    }

    /// Transition after a successful attempt.
    pub fn on_success(self) -> Self {
        match self {
            Self::Probing { .. } => Self::Connected,
            other => other,
        }
    }

    /// Transition after a failed attempt.
    pub fn on_failure(self, attempts: u32) -> Self {
        match self {
            Self::Probing { attempt } if attempt < attempts => Self::Probing {
                attempt: attempt + 1,
            },
            Self::Probing { .. } => Self::Exhausted,
            other => other,
        }
    }
}

/// Waits between probe attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Errors returned by a probe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The retry budget ran out before the health check passed.
    #[error("{target} not reachable after {attempts} attempts: {last_error}")]
    Exhausted {
        target: String,
        attempts: u32,
        last_error: String,
    },
}

impl ProbeError {
    fn exhausted(target: &str, attempts: u32, last_error: Option<String>) -> Self {
        Self::Exhausted {
            target: target.to_string(),
            attempts,
            last_error: last_error.unwrap_or_else(|| "no attempts configured".to_string()),
        }
    }
}

/// Runs a health check against one store under a retry policy.
pub struct Prober<S = TokioSleeper> {
    target: String,
    policy: RetryPolicy,
    sleeper: S,
}

impl Prober<TokioSleeper> {
    /// Create a prober that waits with the tokio timer.
    ///
    /// # Arguments
    ///
    /// * `target` - Human readable name of the store, used in logs and errors
    /// * `policy` - Retry budget
    pub fn new(target: impl Into<String>, policy: RetryPolicy) -> Self {
        Self::with_sleeper(target, policy, TokioSleeper)
    }
}

impl<S: Sleeper> Prober<S> {
    /// Create a prober with a custom sleeper.
    pub fn with_sleeper(target: impl Into<String>, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            target: target.into(),
            policy,
            sleeper,
        }
    }

    /// Run `check` until it succeeds or the retry budget is spent.
    ///
    /// There is no wait after the final failed attempt.
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The handle produced by the first successful attempt
    /// * `Err(ProbeError::Exhausted)` - If every attempt failed
    pub async fn probe<T, E, F, Fut>(&self, mut check: F) -> Result<T, ProbeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.policy.attempts;
        let mut state = ProbeState::start(attempts);
        let mut handle = None;
        let mut last_error = None;

        loop {
            state = match state {
                ProbeState::Probing { attempt } => match check().await {
                    Ok(connected) => {
                        info!(store = %self.target, attempt, "Connection established");
                        handle = Some(connected);
                        state.on_success()
                    }
                    Err(e) => {
                        let next = state.on_failure(attempts);
                        if let ProbeState::Probing { .. } = next {
                            warn!(
                                store = %self.target,
                                attempt,
                                attempts,
                                retry_in_secs = self.policy.delay.as_secs_f64(),
                                error = %e,
                                "Not ready yet, retrying"
                            );
                            self.sleeper.sleep(self.policy.delay).await;
                        } else {
                            warn!(
                                store = %self.target,
                                attempt,
                                attempts,
                                error = %e,
                                "Not ready yet, no attempts left"
                            );
                        }
                        last_error = Some(e.to_string());
                        next
                    }
                },
                ProbeState::Connected => {
                    return handle.ok_or_else(|| {
                        ProbeError::exhausted(&self.target, attempts, last_error.take())
                    });
                }
                ProbeState::Exhausted => {
                    error!(store = %self.target, attempts, "Could not connect");
                    return Err(ProbeError::exhausted(&self.target, attempts, last_error));
                }
            };
        }
    }
}
