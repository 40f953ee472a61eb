//! Poll timing configuration.
//!
//! Each kind of wait has its own timeout: snapshotting an image legitimately
//! takes far longer than a reboot. Poll periods are shared.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Timing for a single polling call.
///
/// A `timeout` of zero is accepted: the condition is then evaluated exactly
/// once and the call times out unless that first evaluation is already done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    timeout: Duration,
    initial_period: Duration,
    max_period: Duration,
}

impl PollConfig {
    /// Create a poll configuration.
    ///
    /// Fails if `initial_period` is zero or greater than `max_period`.
    pub fn new(
        timeout: Duration,
        initial_period: Duration,
        max_period: Duration,
    ) -> Result<Self, ConfigError> {
        let period = PollPeriod::new(initial_period, max_period)?;
        Ok(Self::from_parts(timeout, period))
    }

    fn from_parts(timeout: Duration, period: PollPeriod) -> Self {
        Self {
            timeout,
            initial_period: period.initial,
            max_period: period.max,
        }
    }

    /// Maximum wall-clock time from the first check.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delay before the second check.
    pub fn initial_period(&self) -> Duration {
        self.initial_period
    }

    /// Upper bound for any delay between checks.
    pub fn max_period(&self) -> Duration {
        self.max_period
    }
}

/// The kinds of waits a compute adapter performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitKind {
    /// A node reaching the running state (create, power on, reboot).
    NodeRunning,
    /// A node reaching the powered-off state.
    NodeSuspended,
    /// A node disappearing after deletion.
    NodeTerminated,
    /// A snapshot image becoming available.
    ImageAvailable,
}

impl fmt::Display for WaitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitKind::NodeRunning => write!(f, "node-running"),
            WaitKind::NodeSuspended => write!(f, "node-suspended"),
            WaitKind::NodeTerminated => write!(f, "node-terminated"),
            WaitKind::ImageAvailable => write!(f, "image-available"),
        }
    }
}

/// Per-wait timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Timeout for a node to reach the running state.
    pub node_running: Duration,

    /// Timeout for a node to power off.
    pub node_suspended: Duration,

    /// Timeout for a deleted node to disappear.
    pub node_terminated: Duration,

    /// Timeout for a snapshot image to become available.
    pub image_available: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            node_running: Duration::from_secs(1200),
            node_suspended: Duration::from_secs(120),
            node_terminated: Duration::from_secs(30),
            image_available: Duration::from_secs(3600),
        }
    }
}

impl Timeouts {
    /// Timeout for the given wait kind.
    pub fn for_kind(&self, kind: WaitKind) -> Duration {
        match kind {
            WaitKind::NodeRunning => self.node_running,
            WaitKind::NodeSuspended => self.node_suspended,
            WaitKind::NodeTerminated => self.node_terminated,
            WaitKind::ImageAvailable => self.image_available,
        }
    }
}

/// Validated initial and maximum poll periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPeriod {
    initial: Duration,
    max: Duration,
}

impl Default for PollPeriod {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(50),
            max: Duration::from_secs(1),
        }
    }
}

impl PollPeriod {
    /// Create poll periods, enforcing `0 < initial <= max`.
    pub fn new(initial: Duration, max: Duration) -> Result<Self, ConfigError> {
        if initial.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        if initial > max {
            return Err(ConfigError::PeriodOrder { initial, max });
        }
        Ok(Self { initial, max })
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

/// All poll timing for an adapter, built once at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSettings {
    pub timeouts: Timeouts,
    pub period: PollPeriod,
}

impl PollSettings {
    pub fn new(timeouts: Timeouts, period: PollPeriod) -> Self {
        Self { timeouts, period }
    }

    /// The poll configuration for one kind of wait.
    pub fn config_for(&self, kind: WaitKind) -> PollConfig {
        PollConfig::from_parts(self.timeouts.for_kind(kind), self.period)
    }
}
