//! Host-side helpers wiring the default discovery and opening strategies.

use crate::{
    config::DiscoveryConfig,
    connect::{ConnectOptions, connect_first},
    error::Result,
    port::{BridgePaths, BridgeProvider, Port, PortOpener},
    resolver::{PortDiscovery, PortResolver},
};

/// Resolve candidates using the platform's default device source.
#[must_use]
pub fn discover_candidates(config: &DiscoveryConfig) -> Vec<String> {
    PortResolver::for_platform().candidates(config)
}

/// Build the platform resolver, advertising `label` while the bridge exists.
pub fn bridged_resolver(label: &str, paths: BridgePaths) -> PortResolver {
    PortResolver::for_platform().with_provider(BridgeProvider::new(label, paths))
}

/// Resolve with `discovery` and connect to the first candidate that opens.
///
/// Returns the open port; its name is the candidate that succeeded.
pub fn discover_and_connect(
    discovery: &dyn PortDiscovery,
    config: &DiscoveryConfig,
    options: ConnectOptions,
    opener: &dyn PortOpener,
) -> Result<Box<dyn Port>> {
    let candidates = discovery.candidates(config);
    connect_first(&candidates, options, opener)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            device::StaticLister,
            error::Error,
            port::{BridgeOpener, SerialConfig},
        },
        std::fs,
        tempfile::tempdir,
    };

    #[test]
    fn test_discover_candidates_respects_blacklist() {
        let config = DiscoveryConfig::new().with_blacklisted_port("*");
        assert!(discover_candidates(&config).is_empty());
    }

    #[test]
    fn test_discover_and_connect_prefers_remembered_port() {
        let dir = tempdir().unwrap();
        let paths = BridgePaths::new(
            dir.path()
                .join("input"),
            dir.path()
                .join("output"),
        );
        fs::write(&paths.input, b"").unwrap();

        let resolver = PortResolver::new(Box::new(StaticLister::new(["/dev/ttyUSB0"])))
            .with_provider(BridgeProvider::new("BRIDGE", paths.clone()));
        let config = DiscoveryConfig::new().with_preferred_port("BRIDGE");

        // Every name opens as the bridge, so the first candidate wins.
        let port = discover_and_connect(
            &resolver,
            &config,
            ConnectOptions::default(),
            &BridgeOpener::new(paths),
        )
        .unwrap();

        assert_eq!(port.name(), "BRIDGE");
    }

    #[test]
    fn test_discover_and_connect_without_candidates() {
        struct Nothing;

        impl PortDiscovery for Nothing {
            fn candidates(&self, _config: &DiscoveryConfig) -> Vec<String> {
                Vec::new()
            }
        }

        struct Unused;

        impl PortOpener for Unused {
            fn open(&self, _config: &SerialConfig) -> Result<Box<dyn Port>> {
                unreachable!("no candidate to open")
            }
        }

        let result = discover_and_connect(
            &Nothing,
            &DiscoveryConfig::new(),
            ConnectOptions::default(),
            &Unused,
        );
        assert!(matches!(result, Err(Error::NoCandidates)));
    }
}
