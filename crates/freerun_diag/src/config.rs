//! Configuration for the diagnostic logger.

use std::time::Duration;

/// Where to send diagnostics and how long to wait for the network.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// IPv4 or IPv6 literal of the log collector.
    pub address: String,
    /// TCP port of the log collector.
    pub port: u16,
    /// Upper bound on the connectivity wait and on the connect call.
    pub connect_timeout: Duration,
    /// Delay between connectivity polls.
    pub poll_interval: Duration,
}

impl LoggerConfig {
    /// Creates a configuration for the given collector.
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            connect_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
        }
    }

    /// Sets the connectivity and connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the connectivity poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 3080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn builder_pattern() {
        let config = LoggerConfig::new("10.0.0.2", 9000)
            .with_connect_timeout(Duration::from_millis(250))
            .with_poll_interval(Duration::from_millis(1));

        assert_eq!(config.port, 9000);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.poll_interval, Duration::from_millis(1));
    }
}
