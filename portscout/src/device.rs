//! OS-level serial device enumeration.
//!
//! Enumeration is abstracted behind [`DeviceLister`] so hosts and tests can
//! supply their own source. The default source depends on the platform:
//!
//! - **Unix**: scan `/dev` for entries following common serial naming
//!   conventions (see [`SERIAL_NAME_PREFIXES`])
//! - **Other platforms**: the system enumeration from the `serialport` crate

use {
    crate::error::Result,
    log::{debug, trace},
    std::{
        fs, io,
        path::{Path, PathBuf},
    },
};

/// Device name prefixes that identify serial devices under `/dev`.
///
/// Covers USB CDC/serial converters on Linux, macOS call-out and USB
/// devices, FreeBSD USB serial, onboard UARTs and Bluetooth RFCOMM.
pub const SERIAL_NAME_PREFIXES: &[&str] =
    &["ttyUSB", "ttyACM", "tty.usb", "cu.", "cuaU", "ttyS", "rfcomm"];

/// Check whether a bare device file name looks like a serial device.
pub fn is_serial_device_name(name: &str) -> bool {
    SERIAL_NAME_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Source of raw serial device identifiers.
pub trait DeviceLister: Send + Sync {
    /// List device identifiers currently present on the host.
    fn list_devices(&self) -> Result<Vec<String>>;
}

/// Lists serial devices by scanning a device directory.
#[derive(Debug, Clone)]
pub struct DevDirLister {
    dir: PathBuf,
}

impl DevDirLister {
    /// Default device directory on Unix-like systems.
    pub const DEFAULT_DIR: &'static str = "/dev";

    /// Scan a custom directory instead of `/dev`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory being scanned.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for DevDirLister {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIR)
    }
}

impl DeviceLister for DevDirLister {
    fn list_devices(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)?.map(|entry| entry.map(|e| e.path()));
        let found = serial_paths(entries);
        debug!(
            "Found {} serial device(s) in {}",
            found.len(),
            self.dir
                .display()
        );
        Ok(found)
    }
}

/// Keep the serial device paths from a directory listing, sorted.
///
/// An entry that cannot be read is skipped; the rest of the listing is kept.
fn serial_paths<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut found = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                debug!("Skipping unreadable device entry: {e}");
                continue;
            },
        };
        let Some(name) = path
            .file_name()
            .and_then(|n| n.to_str())
        else {
            continue;
        };
        if !is_serial_device_name(name) {
            continue;
        }
        match path
            .into_os_string()
            .into_string()
        {
            Ok(path) => {
                trace!("Found serial device: {path}");
                found.push(path);
            },
            Err(raw) => trace!("Skipping non UTF-8 device path {raw:?}"),
        }
    }
    // Directory order is unspecified; keep results stable across calls.
    found.sort();
    found
}

/// Lists serial ports through the `serialport` crate.
#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialportLister;

#[cfg(feature = "native")]
impl DeviceLister for SerialportLister {
    fn list_devices(&self) -> Result<Vec<String>> {
        let ports = serialport::available_ports()?;
        debug!("serialport reported {} port(s)", ports.len());
        Ok(ports
            .into_iter()
            .map(|p| p.port_name)
            .collect())
    }
}

/// A fixed list of devices supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticLister {
    devices: Vec<String>,
}

impl StaticLister {
    /// Create a lister that always reports `devices`.
    pub fn new<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            devices: devices
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl DeviceLister for StaticLister {
    fn list_devices(&self) -> Result<Vec<String>> {
        Ok(self
            .devices
            .clone())
    }
}

/// The default device source for the current platform.
#[cfg(unix)]
pub fn platform_lister() -> Box<dyn DeviceLister> {
    Box::new(DevDirLister::default())
}

/// The default device source for the current platform.
#[cfg(all(not(unix), feature = "native"))]
pub fn platform_lister() -> Box<dyn DeviceLister> {
    Box::new(SerialportLister)
}

/// The default device source for the current platform.
///
/// Without native support there is nothing to enumerate.
#[cfg(all(not(unix), not(feature = "native")))]
pub fn platform_lister() -> Box<dyn DeviceLister> {
    Box::new(StaticLister::default())
}
