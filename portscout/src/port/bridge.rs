//! File-backed bridge transport.
//!
//! Some hosts cannot open the serial device themselves; a companion process
//! owns the device and exchanges data through two files. The host reads
//! device output from the input file and writes commands to the output file.
//! Control messages for the companion are written inline as single lines:
//!
//! - `!octo4a: BAUDRATE<baud>` right after opening
//! - `!octo4a: CLOSE` when the port is closed

use {
    crate::{
        error::{Error, Result},
        port::{Port, PortOpener, SerialConfig},
        provider::PortProvider,
    },
    log::{debug, info, trace},
    std::{
        fs::File,
        io::{self, BufRead, BufReader, Read, Write},
        path::PathBuf,
        time::Duration,
    },
};

/// Prefix that marks a line as a control message for the companion process.
pub const CONTROL_PREFIX: &str = "!octo4a: ";

/// Locations of the bridge's input and output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgePaths {
    /// File the companion writes device output to.
    pub input: PathBuf,
    /// File the companion reads commands from.
    pub output: PathBuf,
}

impl BridgePaths {
    /// Create bridge paths.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// A [`Port`] backed by a pair of files.
pub struct FileBridge {
    name: String,
    input: Option<BufReader<File>>,
    output: Option<File>,
    baud_rate: u32,
    timeout: Duration,
}

impl FileBridge {
    /// Open the bridge files and announce the baud rate.
    pub fn open(config: &SerialConfig, paths: &BridgePaths) -> Result<Self> {
        let input = File::open(&paths.input)?;
        let output = File::create(&paths.output)?;

        let mut bridge = Self {
            name: config
                .port_name
                .clone(),
            input: Some(BufReader::new(input)),
            output: Some(output),
            baud_rate: config.baud_rate,
            timeout: config.timeout,
        };
        bridge.send_control(&format!("BAUDRATE{}", config.baud_rate))?;
        debug!(
            "Opened bridge {} ({} -> {})",
            bridge.name,
            paths
                .input
                .display(),
            paths
                .output
                .display()
        );
        Ok(bridge)
    }

    /// Read one line including its terminator; empty at end of input.
    pub fn read_line(&mut self) -> Result<Vec<u8>> {
        let input = self
            .input
            .as_mut()
            .ok_or_else(closed)?;
        let mut line = Vec::new();
        input.read_until(b'\n', &mut line)?;
        Ok(line)
    }

    /// Whether the bridge has been closed.
    pub fn is_closed(&self) -> bool {
        self.output
            .is_none()
    }

    fn send_control(&mut self, message: &str) -> Result<()> {
        trace!("Bridge control: {message}");
        let output = self
            .output
            .as_mut()
            .ok_or_else(closed)?;
        output.write_all(format!("{CONTROL_PREFIX}{message}\n").as_bytes())?;
        output.flush()?;
        Ok(())
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "bridge closed")
}

impl Port for FileBridge {
    fn name(&self) -> &str {
        &self.name
    }

    fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        // Plain files never block on reads, so the value is only recorded.
        self.timeout = timeout;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.send_control("CLOSE")?;
        self.output
            .take();
        self.input
            .take();
        info!("Closed bridge {}", self.name);
        Ok(())
    }
}

impl Read for FileBridge {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input
            .as_mut()
            .ok_or_else(closed)
            .and_then(|i| i.read(buf))
    }
}

impl Write for FileBridge {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let output = self
            .output
            .as_mut()
            .ok_or_else(closed)?;
        let written = output.write(buf)?;
        output.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output
            .as_mut()
            .ok_or_else(closed)
            .and_then(Write::flush)
    }
}

/// Opens every candidate as the file bridge.
#[derive(Debug, Clone)]
pub struct BridgeOpener {
    paths: BridgePaths,
}

impl BridgeOpener {
    /// Create an opener for the given bridge files.
    pub fn new(paths: BridgePaths) -> Self {
        Self { paths }
    }
}

impl PortOpener for BridgeOpener {
    fn open(&self, config: &SerialConfig) -> Result<Box<dyn Port>> {
        Ok(Box::new(FileBridge::open(config, &self.paths)?))
    }
}

/// Contributes the bridge label as a candidate while the bridge is available.
#[derive(Debug, Clone)]
pub struct BridgeProvider {
    label: String,
    paths: BridgePaths,
}

impl BridgeProvider {
    /// Advertise `label` whenever the bridge input file exists.
    pub fn new(label: impl Into<String>, paths: BridgePaths) -> Self {
        Self {
            label: label.into(),
            paths,
        }
    }

    /// Candidate name this provider contributes.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PortProvider for BridgeProvider {
    fn name(&self) -> &str {
        "bridge"
    }

    fn additional_ports(&self, _candidates: &[String]) -> Result<Vec<String>> {
        match self
            .paths
            .input
            .try_exists()
        {
            Ok(true) => Ok(vec![self
                .label
                .clone()]),
            Ok(false) => {
                trace!(
                    "Bridge input {} not present",
                    self.paths
                        .input
                        .display()
                );
                Ok(Vec::new())
            },
            Err(e) => Err(Error::provider(self.name(), e)),
        }
    }
}
