use log::info;
use serialport::{SerialPort, SerialPortInfo, SerialPortType};
use std::time::Duration;

use crate::error::StreamError;
use crate::frame_reader::{FrameReader, FrameSource};

/// The meter only talks at this rate.
pub const DEFAULT_BAUD_RATE: u32 = 2400;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let bare = |kind: &str| (kind.to_string(), None, None, None, None, None);
        let (port_type, vid, pid, serial_number, manufacturer, product) = match &info.port_type {
            SerialPortType::UsbPort(usb) => (
                "USB".to_string(),
                Some(usb.vid),
                Some(usb.pid),
                usb.serial_number.clone(),
                usb.manufacturer.clone(),
                usb.product.clone(),
            ),
            SerialPortType::PciPort => bare("PCI"),
            SerialPortType::BluetoothPort => bare("Bluetooth"),
            SerialPortType::Unknown => bare("Unknown"),
        };
        Self {
            port_name: info.port_name,
            port_type,
            vid,
            pid,
            serial_number,
            manufacturer,
            product,
        }
    }
}

/// One `--list` line: `NAME [TYPE] (VID:PID) MANUFACTURER PRODUCT S/N SERIAL`,
/// leaving out whatever the port does not report.
impl std::fmt::Display for PortInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.port_name, self.port_type)?;
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            write!(f, " ({vid:04X}:{pid:04X})")?;
        }
        if let Some(manufacturer) = &self.manufacturer {
            write!(f, " {manufacturer}")?;
        }
        if let Some(product) = &self.product {
            write!(f, " {product}")?;
        }
        if let Some(serial_number) = &self.serial_number {
            write!(f, " S/N {serial_number}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    /// Upper bound for a single blocking read.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Lists serial ports present on the system. Enumeration failures yield an
/// empty list.
pub fn list_ports() -> Vec<PortInfo> {
    serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(PortInfo::from)
        .collect()
}

/// An open meter connection delivering one frame per [`FrameSource::read_frame`].
pub struct SerialService {
    reader: FrameReader<Box<dyn SerialPort>>,
}

impl SerialService {
    pub fn open(cfg: SerialConfig) -> Result<Self, StreamError> {
        let port = serialport::new(&cfg.port_name, cfg.baud_rate)
            .data_bits(cfg.data_bits)
            .parity(cfg.parity)
            .stop_bits(cfg.stop_bits)
            .flow_control(cfg.flow_control)
            .timeout(cfg.timeout)
            .open()
            .map_err(|source| StreamError::Open {
                port: cfg.port_name.clone(),
                source,
            })?;

        info!("opened {} at {} baud", cfg.port_name, cfg.baud_rate);

        Ok(Self {
            reader: FrameReader::new(port),
        })
    }
}

impl FrameSource for SerialService {
    fn read_frame(&mut self) -> Result<Vec<u8>, StreamError> {
        self.reader.read_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb_port() -> PortInfo {
        PortInfo {
            port_name: "/dev/ttyUSB0".to_string(),
            port_type: "USB".to_string(),
            vid: Some(0x1a86),
            pid: Some(0x7523),
            serial_number: Some("A5C3".to_string()),
            manufacturer: Some("QinHeng".to_string()),
            product: Some("USB Serial".to_string()),
        }
    }

    #[test]
    fn test_default_config_matches_meter() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud_rate, 2400);
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert_eq!(cfg.data_bits, serialport::DataBits::Eight);
        assert_eq!(cfg.parity, serialport::Parity::None);
    }

    #[test]
    fn test_port_display() {
        assert_eq!(
            usb_port().to_string(),
            "/dev/ttyUSB0 [USB] (1A86:7523) QinHeng USB Serial S/N A5C3"
        );

        let plain = PortInfo {
            port_name: "COM3".to_string(),
            port_type: "Unknown".to_string(),
            vid: None,
            pid: None,
            serial_number: None,
            manufacturer: None,
            product: None,
        };
        assert_eq!(plain.to_string(), "COM3 [Unknown]");

        let partial = PortInfo {
            serial_number: None,
            manufacturer: None,
            ..usb_port()
        };
        assert_eq!(partial.to_string(), "/dev/ttyUSB0 [USB] (1A86:7523) USB Serial");
    }

    #[test]
    fn test_open_missing_port_fails() {
        let cfg = SerialConfig {
            port_name: "/nonexistent/peakdmm-test-port".to_string(),
            ..Default::default()
        };
        match SerialService::open(cfg) {
            Err(StreamError::Open { port, .. }) => {
                assert_eq!(port, "/nonexistent/peakdmm-test-port")
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("opened a port that does not exist"),
        }
    }
}
