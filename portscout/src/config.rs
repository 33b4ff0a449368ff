//! Discovery configuration passed explicitly into the resolver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inputs that shape candidate discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiscoveryConfig {
    /// Glob patterns expanded against the filesystem and appended.
    pub additional_ports: Vec<String>,
    /// Glob patterns; matching candidates are removed.
    pub blacklisted_ports: Vec<String>,
    /// Last port that connected successfully; tried first when present.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub port: Option<String>,
}

impl DiscoveryConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an additional-port pattern.
    #[must_use]
    pub fn with_additional_port(mut self, pattern: impl Into<String>) -> Self {
        self.additional_ports
            .push(pattern.into());
        self
    }

    /// Add a blacklist pattern.
    #[must_use]
    pub fn with_blacklisted_port(mut self, pattern: impl Into<String>) -> Self {
        self.blacklisted_ports
            .push(pattern.into());
        self
    }

    /// Set the preferred (last used) port.
    #[must_use]
    pub fn with_preferred_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }
}
