use thiserror::Error;

use crate::frame::FRAME_LEN;

/// Reasons a frame cannot be turned into a [`Reading`](crate::Reading).
///
/// None of these are fatal; the caller is expected to drop the frame and
/// carry on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame has {actual} bytes, expected {}", FRAME_LEN)]
    FrameWrongLength { actual: usize },

    /// Digit field is neither a decimal number nor the over-range sentinel.
    #[error("invalid digit field \"{}\"", .digits.escape_ascii())]
    InvalidDigits { digits: [u8; 4] },

    /// Decimal-point position byte is not an ASCII digit.
    #[error("invalid decimal position byte {byte:#04x}")]
    InvalidDecimalPosition { byte: u8 },
}
