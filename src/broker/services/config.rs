//! Broker configuration.

use crate::broker::domain::Timeout;

/// Configuration shared by every broker service.
///
/// # Examples
///
/// ```
/// use syncport::broker::services::BrokerConfig;
///
/// let config = BrokerConfig::default();
/// assert!(!config.trace_io());
///
/// let verbose = BrokerConfig::verbose();
/// assert!(verbose.trace_io());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerConfig {
    default_timeout: Timeout,
    trace_io: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            default_timeout: Timeout::default(),
            trace_io: false,
        }
    }
}

impl BrokerConfig {
    /// Creates a configuration that logs every device transfer.
    ///
    /// Useful when diagnosing a misbehaving device.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            trace_io: true,
            ..Self::default()
        }
    }

    /// Sets the timeout a freshly connected binding starts with.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Timeout) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Enables or disables the device I/O trace.
    #[must_use]
    pub const fn with_trace_io(mut self, enabled: bool) -> Self {
        self.trace_io = enabled;
        self
    }

    /// Returns the timeout a freshly connected binding starts with.
    #[must_use]
    pub const fn default_timeout(&self) -> Timeout {
        self.default_timeout
    }

    /// Returns whether each transfer is logged with its value.
    #[must_use]
    pub const fn trace_io(&self) -> bool {
        self.trace_io
    }
}
