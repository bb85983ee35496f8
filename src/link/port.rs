use super::{LinkWriter, Transcript};
use crate::config::GameConfig;
use crate::error::{HornetError, Result};
use log::{debug, error, info};
use regex::Regex;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
pub use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, StopBits};

/// Settings used to open the link.
#[derive(Clone, Debug)]
pub struct PortSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
    /// Write timeout. Does not bound the drain after the write, which only
    /// stays short while `flow_control` is `None`.
    pub timeout: Duration,
}

impl PortSettings {
    /// 8N1 settings without flow control.
    pub fn new(port_name: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        PortSettings {
            port_name: port_name.into(),
            baud_rate,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
            timeout,
        }
    }
}

/// Picks the port named `<prefix><digits>` with the greatest number.
///
/// ```
/// use hornet_blaster::link::select_port;
///
/// let ports = ["COM3", "COM12", "COM9", "/dev/ttyS0"];
/// assert_eq!(select_port(ports, "COM").as_deref(), Some("COM12"));
/// assert_eq!(select_port(ports, "/dev/ttyUSB"), None);
/// ```
pub fn select_port<I, S>(names: I, prefix: &str) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pattern = format!(r"^{}(\d+)$", regex::escape(prefix));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            error!("[link] Invalid port prefix {prefix:?}: {e}");
            return None;
        }
    };
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let number: u64 = re.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, name.to_string()))
        })
        .max_by_key(|(number, _)| *number)
        .map(|(_, name)| name)
}

/// Names of the serial ports currently present.
pub fn available_port_names() -> Result<Vec<String>> {
    tokio_serial::available_ports()
        .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
        .map_err(|e| HornetError::link_unavailable(e.to_string()))
}

/// Blocking, write-only serial link. Without a device every write is refused.
pub struct SerialLink {
    port_name: Option<String>,
    port: Option<Mutex<Box<dyn SerialPort>>>,
    transcript: Option<Transcript>,
}

impl SerialLink {
    /// A link with no device behind it.
    pub fn closed() -> Self {
        SerialLink {
            port_name: None,
            port: None,
            transcript: None,
        }
    }

    /// Selects and opens the device described by `config`.
    ///
    /// Selection or open failures are logged and produce a closed link.
    pub fn connect(config: &GameConfig) -> Self {
        let link = available_port_names()
            .and_then(|names| {
                select_port(&names, &config.link.port_prefix).ok_or_else(|| {
                    HornetError::link_unavailable(format!(
                        "no port matching {}<n>",
                        config.link.port_prefix
                    ))
                })
            })
            .and_then(|name| {
                Self::open(&PortSettings::new(
                    name,
                    config.link.baud_rate,
                    config.flush_wait(),
                ))
            });
        let link = match link {
            Ok(link) => link,
            Err(e) => {
                info!("[link] Running without serial link: {e}");
                Self::closed()
            }
        };
        match &config.link.transcript {
            Some(path) => link.with_transcript(Transcript::new(path)),
            None => link,
        }
    }

    /// Opens the port described by `settings`.
    pub fn open(settings: &PortSettings) -> Result<Self> {
        let port = tokio_serial::new(settings.port_name.clone(), settings.baud_rate)
            .data_bits(settings.data_bits)
            .parity(settings.parity)
            .stop_bits(settings.stop_bits)
            .flow_control(settings.flow_control)
            .timeout(settings.timeout)
            .open()
            .map_err(|e| HornetError::port_open(&settings.port_name, e.to_string()))?;
        info!("[link] Serial port opened: {}", settings.port_name);
        Ok(SerialLink {
            port_name: Some(settings.port_name.clone()),
            port: Some(Mutex::new(port)),
            transcript: None,
        })
    }

    /// Records every successful write to `transcript`.
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }
}

impl LinkWriter for SerialLink {
    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write_line(&mut self, line: &[u8]) -> Result<()> {
        let Some(port) = &self.port else {
            return Err(HornetError::link_unavailable("serial port not open"));
        };
        let mut port = port
            .lock()
            .map_err(|_| HornetError::port_write("serial port lock poisoned"))?;
        port.write_all(line)
            .and_then(|()| port.flush())
            .map_err(|e| HornetError::port_write(e.to_string()))?;
        debug!("[link] wrote {}", hex::encode(line));

        if let Some(transcript) = &self.transcript {
            transcript.record(&String::from_utf8_lossy(line));
        }
        Ok(())
    }
}
