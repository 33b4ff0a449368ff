//! Port candidate resolution.
//!
//! Builds the ordered list of ports a host should try before connecting:
//!
//! 1. Devices reported by the OS lister
//! 2. Matches of each additional-port glob
//! 3. Names contributed by registered providers
//! 4. Minus every candidate matching a blacklist glob
//! 5. With the preferred port moved to the front if it survived
//!
//! Every source failure degrades to "contributes nothing"; resolution itself
//! never fails.

use {
    crate::{
        config::DiscoveryConfig,
        device::{DeviceLister, platform_lister},
        pattern::{self, Blacklist},
        provider::{PortProvider, ProviderRegistry},
    },
    log::{debug, warn},
};

/// Strategy a host uses to obtain port candidates.
///
/// Hosts accept an implementation at startup instead of relying on a
/// hard-wired discovery routine.
pub trait PortDiscovery: Send + Sync {
    /// Ordered list of port identifiers to try.
    fn candidates(&self, config: &DiscoveryConfig) -> Vec<String>;
}

/// Resolve candidates from a lister, configuration and providers.
pub fn resolve_candidates(
    lister: &dyn DeviceLister,
    config: &DiscoveryConfig,
    providers: &ProviderRegistry,
) -> Vec<String> {
    let mut candidates = match lister.list_devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!("Serial device enumeration unavailable: {e}");
            Vec::new()
        },
    };

    for additional in &config.additional_ports {
        match pattern::expand(additional) {
            Ok(found) => {
                debug!(
                    "Additional port pattern '{additional}' matched {} path(s)",
                    found.len()
                );
                candidates.extend(found);
            },
            Err(e) => warn!("Ignoring additional port pattern '{additional}': {e}"),
        }
    }

    providers.collect_into(&mut candidates);

    let blacklist = Blacklist::new(&config.blacklisted_ports);
    if !blacklist.is_empty() {
        candidates.retain(|c| {
            let blocked = blacklist.is_blocked(c);
            if blocked {
                debug!("Dropping blacklisted port {c}");
            }
            !blocked
        });
    }

    if let Some(prev) = &config.port {
        promote(&mut candidates, prev);
    }

    candidates
}

/// Move the first occurrence of `preferred` to the front.
fn promote(candidates: &mut Vec<String>, preferred: &str) {
    if let Some(index) = candidates
        .iter()
        .position(|c| c == preferred)
    {
        let port = candidates.remove(index);
        candidates.insert(0, port);
    }
}

/// Default [`PortDiscovery`] implementation.
pub struct PortResolver {
    lister: Box<dyn DeviceLister>,
    providers: ProviderRegistry,
}

impl PortResolver {
    /// Create a resolver over the given device source, with no providers.
    pub fn new(lister: Box<dyn DeviceLister>) -> Self {
        Self {
            lister,
            providers: ProviderRegistry::new(),
        }
    }

    /// Create a resolver over the platform's default device source.
    pub fn for_platform() -> Self {
        Self::new(platform_lister())
    }

    /// Register an extension provider.
    #[must_use]
    pub fn with_provider<P: PortProvider + 'static>(mut self, provider: P) -> Self {
        self.providers
            .register(provider);
        self
    }

    /// Registered providers.
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Mutable access for registering providers after construction.
    pub fn providers_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.providers
    }
}

impl PortDiscovery for PortResolver {
    fn candidates(&self, config: &DiscoveryConfig) -> Vec<String> {
        resolve_candidates(self.lister.as_ref(), config, &self.providers)
    }
}

impl std::fmt::Debug for PortResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortResolver")
            .field("providers", &self.providers)
            .finish_non_exhaustive()
    }
}
