//! Port abstraction for opening resolved candidates.
//!
//! Resolution only yields names. Turning a name into an open connection is
//! delegated to a [`PortOpener`], so a host can redirect some or all names to
//! something other than a real serial device:
//!
//! ```text
//!                +----------------+
//!   candidate -->| RoutingOpener  |
//!                +---+--------+---+
//!        bridge label|        |anything else
//!                    v        v
//!           +-----------+  +--------------+
//!           | FileBridge|  |  NativePort  |
//!           |  (files)  |  | (serialport) |
//!           +-----------+  +--------------+
//! ```

pub mod bridge;
#[cfg(feature = "native")]
pub mod native;

use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

pub use bridge::{BridgeOpener, BridgePaths, BridgeProvider, FileBridge};
#[cfg(feature = "native")]
pub use native::{NativeOpener, NativePort};

/// Connection parameters for opening a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port name/path (e.g., "/dev/ttyUSB0", "COM3").
    pub port_name: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Read/write timeout.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: 115200,
            timeout: Duration::from_millis(1000),
        }
    }
}

impl SerialConfig {
    /// Create a new configuration with port name and baud rate.
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            ..Default::default()
        }
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// An open, byte-oriented connection.
pub trait Port: Read + Write + Send {
    /// Get the port name/path.
    fn name(&self) -> &str;

    /// Get the baud rate the port was opened with.
    fn baud_rate(&self) -> u32;

    /// Get the current timeout.
    fn timeout(&self) -> Duration;

    /// Set the read/write timeout.
    fn set_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Close the port and release resources.
    ///
    /// After calling this method, the port cannot be used for further I/O.
    fn close(&mut self) -> Result<()>;

    /// Write all bytes, blocking until complete.
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<()> {
        std::io::Write::write_all(self, buf)?;
        std::io::Write::flush(self)?;
        Ok(())
    }
}

impl std::fmt::Debug for dyn Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port")
            .field("name", &self.name())
            .field("baud_rate", &self.baud_rate())
            .finish()
    }
}

/// Strategy for turning a candidate name into an open port.
pub trait PortOpener: Send + Sync {
    /// Open the port described by `config`.
    fn open(&self, config: &SerialConfig) -> Result<Box<dyn Port>>;
}

/// Sends one label to a dedicated opener and everything else to a fallback.
pub struct RoutingOpener {
    label: String,
    routed: Box<dyn PortOpener>,
    fallback: Box<dyn PortOpener>,
}

impl RoutingOpener {
    /// Route `label` to `routed`; other names go to `fallback`.
    pub fn new(
        label: impl Into<String>,
        routed: Box<dyn PortOpener>,
        fallback: Box<dyn PortOpener>,
    ) -> Self {
        Self {
            label: label.into(),
            routed,
            fallback,
        }
    }
}

impl PortOpener for RoutingOpener {
    fn open(&self, config: &SerialConfig) -> Result<Box<dyn Port>> {
        if config.port_name == self.label {
            self.routed
                .open(config)
        } else {
            self.fallback
                .open(config)
        }
    }
}
