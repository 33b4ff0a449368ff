//! Connecting to the first usable candidate.

use {
    crate::{
        error::{Error, Result},
        port::{Port, PortOpener, SerialConfig},
    },
    log::{debug, info, warn},
    std::time::Duration,
};

/// Options applied to every connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Baud rate to open each candidate with.
    pub baud_rate: u32,
    /// Read/write timeout for the opened port.
    pub timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        let defaults = SerialConfig::default();
        Self {
            baud_rate: defaults.baud_rate,
            timeout: defaults.timeout,
        }
    }
}

impl ConnectOptions {
    /// Options with the given baud rate and default timeout.
    pub fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Default::default()
        }
    }
}

/// Try candidates in order and return the first port that opens.
///
/// Failures are logged and the next candidate is tried.
pub fn connect_first(
    candidates: &[String],
    options: ConnectOptions,
    opener: &dyn PortOpener,
) -> Result<Box<dyn Port>> {
    if candidates.is_empty() {
        return Err(Error::NoCandidates);
    }

    for (attempt, name) in candidates
        .iter()
        .enumerate()
    {
        debug!(
            "Connection attempt {}/{}: {name}",
            attempt + 1,
            candidates.len()
        );
        let config = SerialConfig::new(name.as_str(), options.baud_rate).with_timeout(options.timeout);
        match opener.open(&config) {
            Ok(port) => {
                info!("Connected to {name} at {} baud", options.baud_rate);
                return Ok(port);
            },
            Err(e) => warn!("Could not open {name}: {e}"),
        }
    }

    Err(Error::DeviceNotFound)
}
