//! Serial I/O, the acquisition loop and output rendering.

pub mod acquisition;
pub mod error;
pub mod frame_reader;
pub mod output;
pub mod serial_service;
pub mod timestamp;

pub use acquisition::{AcquisitionConfig, AcquisitionLoop, LoopStats, StepOutcome};
pub use error::{AcquisitionError, OutputError, StreamError};
pub use frame_reader::{FrameReader, FrameSource};
pub use output::{OutputFormat, ReadingSink, Record, RecordWriter};
pub use serial_service::{list_ports, PortInfo, SerialConfig, SerialService};
pub use timestamp::{Timestamp, TimestampOptions};
