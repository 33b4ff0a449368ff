//! # portscout
//!
//! Serial port candidate discovery for host applications.
//!
//! Before connecting to a device, a host needs to know which ports to try
//! and in which order. This crate builds that list from:
//!
//! - Devices reported by the operating system
//! - User-configured additional port globs
//! - Names contributed by registered extension providers
//!
//! It then removes blacklisted entries and moves the last successfully used
//! port to the front. Discovery never fails: a source that cannot be read
//! contributes nothing and is logged.
//!
//! Opening a candidate goes through a [`PortOpener`], which lets a host route
//! names to a native serial port or to a file-backed [`FileBridge`].
//!
//! ## Features
//!
//! - `native` (default): Native serial port support via the `serialport` crate
//! - `serde`: Serialization support for [`DiscoveryConfig`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use portscout::{DiscoveryConfig, FnProvider, PortDiscovery, PortResolver};
//!
//! let resolver = PortResolver::for_platform().with_provider(FnProvider::new(
//!     "virtual",
//!     |_current: &[String]| Ok(vec!["VIRTUAL".to_string()]),
//! ));
//!
//! let config = DiscoveryConfig::new()
//!     .with_additional_port("/dev/serial/by-id/*")
//!     .with_blacklisted_port("/dev/ttyS*")
//!     .with_preferred_port("/dev/ttyACM0");
//!
//! for port in resolver.candidates(&config) {
//!     println!("{port}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connect;
pub mod device;
pub mod error;
pub mod host;
pub mod pattern;
pub mod port;
pub mod provider;
pub mod resolver;

// Re-exports for convenience
#[cfg(feature = "native")]
pub use device::SerialportLister;
#[cfg(feature = "native")]
pub use port::{NativeOpener, NativePort};
pub use {
    config::DiscoveryConfig,
    connect::{ConnectOptions, connect_first},
    device::{DevDirLister, DeviceLister, StaticLister, platform_lister},
    error::{Error, Result},
    host::{bridged_resolver, discover_and_connect, discover_candidates},
    pattern::Blacklist,
    port::{
        BridgeOpener, BridgePaths, BridgeProvider, FileBridge, Port, PortOpener, RoutingOpener,
        SerialConfig,
    },
    provider::{FnProvider, PortProvider, ProviderRegistry},
    resolver::{PortDiscovery, PortResolver, resolve_candidates},
};
