//! Decoder for the 14-byte telemetry frames of the PeakTech 2025 multimeter.
//!
//! Pure and I/O free: [`decode`] turns one frame into a [`Reading`] or a
//! [`DecodeError`]. Reading the serial port and rendering the result are the
//! caller's business.

pub mod decoder;
pub mod error;
pub mod frame;
pub mod reading;

pub use decoder::decode;
pub use error::DecodeError;
pub use frame::{Frame, FRAME_LEN, OVER_RANGE};
pub use reading::{Mode, Prefix, Reading, StatusFlag, StatusSet, Value};
