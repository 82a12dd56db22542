//! Bounded-wait timeout value object.

use super::BrokerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Longest wait any single operation may request.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(86_400);

/// Upper bound on how long a caller is prepared to wait for exclusive access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeout(Duration);

impl Timeout {
    /// A timeout that only succeeds when access is immediately available.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Creates a timeout from a duration.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerDomainError::TimeoutTooLong`] when `duration` exceeds
    /// [`MAX_TIMEOUT`].
    pub fn new(duration: Duration) -> Result<Self, BrokerDomainError> {
        if duration > MAX_TIMEOUT {
            return Err(BrokerDomainError::TimeoutTooLong(format!(
                "{}s",
                duration.as_secs_f64()
            )));
        }
        Ok(Self(duration))
    }

    /// Creates a timeout from a number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerDomainError::InvalidTimeout`] for negative, NaN or
    /// infinite input and [`BrokerDomainError::TimeoutTooLong`] above
    /// [`MAX_TIMEOUT`].
    pub fn from_secs_f64(seconds: f64) -> Result<Self, BrokerDomainError> {
        if !seconds.is_finite() || (seconds.is_sign_negative() && seconds != 0.0) {
            return Err(BrokerDomainError::InvalidTimeout(seconds.to_string()));
        }
        let duration = Duration::try_from_secs_f64(seconds.abs())
            .map_err(|_| BrokerDomainError::InvalidTimeout(seconds.to_string()))?;
        Self::new(duration)
    }

    /// Creates a timeout from whole milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerDomainError::TimeoutTooLong`] above [`MAX_TIMEOUT`].
    pub fn from_millis(millis: u64) -> Result<Self, BrokerDomainError> {
        Self::new(Duration::from_millis(millis))
    }

    /// Returns the timeout as a [`Duration`].
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Returns the timeout in fractional seconds.
    #[must_use]
    pub const fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self(Duration::from_secs(1))
    }
}

impl TryFrom<f64> for Timeout {
    type Error = BrokerDomainError;

    fn try_from(seconds: f64) -> Result<Self, Self::Error> {
        Self::from_secs_f64(seconds)
    }
}

impl TryFrom<Duration> for Timeout {
    type Error = BrokerDomainError;

    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        Self::new(duration)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.3}s", self.0.as_secs_f64())
    }
}
