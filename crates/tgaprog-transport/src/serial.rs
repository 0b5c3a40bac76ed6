use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{Connector, Transport};

/// Line settings for the programming cable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Baud rate. The radio's programming mode uses 9600, the default.
    pub baud_rate: u32,
    /// Upper bound on a single [`Transport::read_up_to`] call.
    pub read_timeout: Duration,
}

impl SerialConfig {
    pub const DEFAULT_BAUD_RATE: u32 = 9600;
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: Self::DEFAULT_BAUD_RATE,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        }
    }
}

/// A serial port opened 8N1 without flow control.
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    name: String,
    config: SerialConfig,
}

impl SerialTransport {
    /// Open `port` with the given line settings.
    pub fn open(port: &str, config: &SerialConfig) -> Result<Self> {
        let handle = serialport::new(port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                source,
            })?;

        info!(port, baud = config.baud_rate, "opened serial port");

        Ok(Self {
            port: Some(handle),
            name: port.to_string(),
            config: config.clone(),
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port_mut()?;
        port.write_all(data)?;
        port.flush()?;
        Ok(())
    }

    fn read_up_to(&mut self, max_len: usize) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.config.read_timeout;
        let port = self.port_mut()?;
        let mut buf = vec![0u8; max_len];
        let mut filled = 0usize;

        while filled < max_len {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            port.set_timeout(remaining).map_err(std::io::Error::from)?;

            match port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut => break,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        buf.truncate(filled);
        Ok(buf)
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!(port = %self.name, "closed serial port");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.port.is_none()
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("open", &self.port.is_some())
            .finish()
    }
}

/// Opens [`SerialTransport`]s with a fixed [`SerialConfig`].
#[derive(Debug, Clone, Default)]
pub struct SerialConnector {
    pub config: SerialConfig,
}

impl SerialConnector {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }
}

impl Connector for SerialConnector {
    type Transport = SerialTransport;

    fn connect(&self, port: &str) -> Result<SerialTransport> {
        SerialTransport::open(port, &self.config)
    }
}

/// A serial port visible to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    /// `usb`, `pci`, `bluetooth` or `unknown`.
    pub kind: &'static str,
    pub description: Option<String>,
}

/// Enumerate serial ports on this host.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    Ok(ports
        .into_iter()
        .map(|port| {
            let (kind, description) = match port.port_type {
                SerialPortType::UsbPort(usb) => {
                    let label = match (usb.manufacturer, usb.product) {
                        (Some(m), Some(p)) => format!("{m} {p}"),
                        (Some(m), None) => m,
                        (None, Some(p)) => p,
                        (None, None) => format!("{:04x}:{:04x}", usb.vid, usb.pid),
                    };
                    ("usb", Some(label))
                }
                SerialPortType::PciPort => ("pci", None),
                SerialPortType::BluetoothPort => ("bluetooth", None),
                SerialPortType::Unknown => ("unknown", None),
            };
            PortInfo {
                name: port.port_name,
                kind,
                description,
            }
        })
        .collect())
}
