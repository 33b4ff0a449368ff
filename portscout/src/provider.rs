//! Extension providers contributing extra port names.
//!
//! A provider sees the candidates accumulated so far and returns names to
//! append. Providers run in registration order. A provider that returns an
//! error or panics is logged and skipped; the rest of discovery continues.

use {
    crate::error::{Error, Result},
    log::{debug, error},
    std::panic::{self, AssertUnwindSafe},
};

/// A source of additional port names.
pub trait PortProvider: Send + Sync {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Return port names to append to `candidates`.
    fn additional_ports(&self, candidates: &[String]) -> Result<Vec<String>>;
}

/// Adapts a closure into a [`PortProvider`].
pub struct FnProvider<F> {
    name: String,
    f: F,
}

impl<F> FnProvider<F>
where
    F: Fn(&[String]) -> Result<Vec<String>> + Send + Sync,
{
    /// Wrap `f` under the given provider name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> PortProvider for FnProvider<F>
where
    F: Fn(&[String]) -> Result<Vec<String>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn additional_ports(&self, candidates: &[String]) -> Result<Vec<String>> {
        (self.f)(candidates)
    }
}

/// Ordered collection of registered providers.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn PortProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; it runs after all previously registered ones.
    pub fn register<P: PortProvider + 'static>(&mut self, provider: P) -> &mut Self {
        self.providers
            .push(Box::new(provider));
        self
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers
            .len()
    }

    /// Whether no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers
            .is_empty()
    }

    /// Names of the registered providers, in invocation order.
    pub fn names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|p| p.name())
            .collect()
    }

    /// Run every provider and append its contributions to `candidates`.
    pub fn collect_into(&self, candidates: &mut Vec<String>) {
        for provider in &self.providers {
            match invoke(provider.as_ref(), candidates) {
                Ok(extra) => {
                    debug!(
                        "Provider '{}' contributed {} port(s)",
                        provider.name(),
                        extra.len()
                    );
                    candidates.extend(extra);
                },
                Err(e) => {
                    error!("Error while retrieving additional port names: {e}");
                },
            }
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

/// Call a provider, turning panics into provider errors.
fn invoke(provider: &dyn PortProvider, candidates: &[String]) -> Result<Vec<String>> {
    match panic::catch_unwind(AssertUnwindSafe(|| provider.additional_ports(candidates))) {
        Ok(Ok(extra)) => Ok(extra),
        Ok(Err(Error::Provider { message, .. })) => {
            Err(Error::provider(provider.name(), message))
        },
        Ok(Err(e)) => Err(Error::provider(provider.name(), e)),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| {
                    payload
                        .downcast_ref::<String>()
                        .cloned()
                })
                .unwrap_or_else(|| "panicked".to_string());
            Err(Error::provider(provider.name(), message))
        },
    }
}
