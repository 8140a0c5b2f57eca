//! Circuit breaker guarding calls to an unreliable dependency.
//!
//! ```text
//!            failures >= threshold
//!   Closed ─────────────────────────▶ Open
//!     ▲                                │ cool-down elapsed
//!     │ trial succeeds                 ▼
//!     └──────────────────────────── HalfOpen ──trial fails──▶ Open
//! ```
//!
//! Callers ask for a [`CallPermit`] before calling the dependency and settle it
//! with the outcome. All state lives behind one mutex that is never held across
//! an `.await`, so counting a failure, checking the threshold and switching state
//! happen atomically with respect to concurrent callers.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};

/// Classes of failure a guarded call can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The call did not finish within its timeout.
    Timeout,
    /// No connection could be established.
    Connect,
    /// Any other transport-level error.
    Transport,
    /// The dependency answered with an unexpected status.
    Status,
    /// The response body could not be decoded.
    Decode,
    /// The response decoded but lacked required data.
    Incomplete,
}

impl FailureKind {
    pub const ALL: [FailureKind; 6] = [
        FailureKind::Timeout,
        FailureKind::Connect,
        FailureKind::Transport,
        FailureKind::Status,
        FailureKind::Decode,
        FailureKind::Incomplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Transport => "transport",
            Self::Status => "status",
            Self::Decode => "decode",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown failure kind '{}'", s.trim()))
    }
}

/// Tuning knobs for a [`CircuitBreaker`].
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Counted failures within `failure_window` that open the circuit.
    pub failure_threshold: u32,
    /// How long the circuit stays open before admitting a trial call.
    pub break_duration: Duration,
    /// Failures older than this no longer count towards the threshold.
    pub failure_window: Duration,
    /// Failure kinds that count towards the threshold.
    pub trip_on: Vec<FailureKind>,
}

impl CircuitBreakerConfig {
    pub fn trips_on(&self, kind: FailureKind) -> bool {
        self.trip_on.contains(&kind)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            break_duration: Duration::from_secs(30),
            failure_window: Duration::from_secs(60),
            trip_on: FailureKind::ALL.to_vec(),
        }
    }
}

/// Externally visible breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }

    fn gauge_value(&self) -> f64 {
        match self {
            Self::Closed => 0.0,
            Self::HalfOpen => 1.0,
            Self::Open => 2.0,
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned instead of a permit while calls are not admitted.
#[derive(Debug, Error)]
#[error("circuit breaker '{name}' is open")]
pub struct BrokenCircuit {
    pub name: &'static str,
    /// Time until a trial call may be admitted, when known.
    pub retry_after: Option<Duration>,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failures: u32,
    window_started: Option<Instant>,
    open_until: Option<Instant>,
    trial_in_flight: bool,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            failures: 0,
            window_started: None,
            open_until: None,
            trial_in_flight: false,
        }
    }
}

/// Thread-safe circuit breaker.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct CircuitBreaker {
    name: &'static str,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            config,
            inner: Mutex::new(BreakerState::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Asks to make one call through the breaker.
    ///
    /// - **Closed**: always admitted.
    /// - **Open**: rejected until the cool-down has elapsed; the first caller
    ///   after that moves the breaker to half-open and gets the trial permit.
    /// - **HalfOpen**: admitted only if no trial is currently in flight.
    ///
    /// # Errors
    ///
    /// Returns [`BrokenCircuit`] when the call must not reach the dependency.
    pub fn try_acquire(&self) -> Result<CallPermit<'_>, BrokenCircuit> {
        let mut st = self.lock();
        let now = Instant::now();

        match st.state {
            CircuitState::Closed => Ok(CallPermit::new(self, false)),
            CircuitState::Open => match st.open_until {
                Some(until) if now < until => Err(self.rejected(Some(until - now))),
                _ => {
                    st.state = CircuitState::HalfOpen;
                    st.open_until = None;
                    st.trial_in_flight = true;
                    info!(breaker = self.name, "Circuit half-open, admitting trial call");
                    record_state_gauge(self.name, CircuitState::HalfOpen);
                    Ok(CallPermit::new(self, true))
                }
            },
            CircuitState::HalfOpen => {
                if st.trial_in_flight {
                    Err(self.rejected(None))
                } else {
                    st.trial_in_flight = true;
                    Ok(CallPermit::new(self, true))
                }
            }
        }
    }

    /// Current state. An open breaker whose cool-down has elapsed reports
    /// [`CircuitState::HalfOpen`], since the next call will be a trial.
    pub fn state(&self) -> CircuitState {
        let st = self.lock();
        match (st.state, st.open_until) {
            (CircuitState::Open, Some(until)) if Instant::now() >= until => CircuitState::HalfOpen,
            (state, _) => state,
        }
    }

    /// Failures counted in the current observation window.
    pub fn failure_count(&self) -> u32 {
        self.lock().failures
    }

    /// Forces the breaker back to closed (operator override).
    pub fn reset(&self) {
        let mut st = self.lock();
        *st = BreakerState::default();
        info!(breaker = self.name, "Circuit manually reset");
        record_state_gauge(self.name, CircuitState::Closed);
    }

    fn on_success(&self, trial: bool) {
        let mut st = self.lock();
        match st.state {
            CircuitState::HalfOpen if trial => self.close(&mut st),
            CircuitState::Closed => {
                st.failures = 0;
                st.window_started = None;
            }
            // Outcome of a call admitted before the breaker opened.
            _ => {}
        }
    }

    fn on_failure(&self, trial: bool, kind: FailureKind) {
        let mut st = self.lock();

        if !self.config.trips_on(kind) {
            if trial && st.state == CircuitState::HalfOpen {
                st.trial_in_flight = false;
            }
            return;
        }

        let now = Instant::now();
        match st.state {
            CircuitState::HalfOpen if trial => self.open(&mut st, now, kind),
            CircuitState::Closed => {
                let window_expired = st
                    .window_started
                    .is_some_and(|started| now.duration_since(started) >= self.config.failure_window);
                if window_expired || st.window_started.is_none() {
                    st.failures = 0;
                    st.window_started = Some(now);
                }

                st.failures += 1;
                if st.failures >= self.config.failure_threshold {
                    self.open(&mut st, now, kind);
                }
            }
            _ => {}
        }
    }

    fn on_abandoned(&self, trial: bool) {
        if !trial {
            return;
        }
        let mut st = self.lock();
        if st.state == CircuitState::HalfOpen {
            st.trial_in_flight = false;
        }
    }

    fn open(&self, st: &mut BreakerState, now: Instant, cause: FailureKind) {
        st.state = CircuitState::Open;
        st.open_until = Some(now + self.config.break_duration);
        st.trial_in_flight = false;
        warn!(
            breaker = self.name,
            cause = %cause,
            failures = st.failures,
            break_seconds = self.config.break_duration.as_secs(),
            "Circuit breaker opened"
        );
        record_state_gauge(self.name, CircuitState::Open);
    }

    fn close(&self, st: &mut BreakerState) {
        *st = BreakerState::default();
        info!(breaker = self.name, "Circuit breaker reset, calls resumed");
        record_state_gauge(self.name, CircuitState::Closed);
    }

    fn rejected(&self, retry_after: Option<Duration>) -> BrokenCircuit {
        BrokenCircuit {
            name: self.name,
            retry_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        // State stays consistent even if a holder panicked: every mutation is
        // a handful of field writes with no early exit.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("failures", &self.failure_count())
            .finish()
    }
}

fn record_state_gauge(name: &'static str, state: CircuitState) {
    metrics::gauge!("review_circuit_state", "breaker" => name).set(state.gauge_value());
}

/// Admission ticket for one guarded call.
///
/// Settle it with [`CallPermit::success`] or [`CallPermit::failure`]. A permit
/// dropped unsettled (for example because the caller's future was cancelled)
/// frees the half-open trial slot without changing state.
#[must_use = "settle the permit with success() or failure()"]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> CallPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    /// Whether this permit is the half-open trial call.
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    pub fn success(mut self) {
        self.settled = true;
        self.breaker.on_success(self.trial);
    }

    pub fn failure(mut self, kind: FailureKind) {
        self.settled = true;
        self.breaker.on_failure(self.trial, kind);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_abandoned(self.trial);
        }
    }
}
