//! Positional layout of one frame.
//!
//! ```text
//! ┌──────┬──────────┬──────────┬─────────┬──────────────────┬─────┬────────┐
//! │ sign │ digits   │ reserved │ decimal │ status 1..4      │ bar │ CR LF  │
//! │ 0    │ 1..=4    │ 5        │ 6       │ 7..=10           │ 11  │ 12..14 │
//! └──────┴──────────┴──────────┴─────────┴──────────────────┴─────┴────────┘
//! ```

use crate::error::DecodeError;

/// Frame size in bytes, terminator included.
pub const FRAME_LEN: usize = 14;

/// Digit field shown by the meter when the input exceeds the range.
pub const OVER_RANGE: [u8; 4] = *b"?0:?";

pub const SIGN_OFFSET: usize = 0;
pub const DIGITS_OFFSET: usize = 1;
pub const DECIMAL_OFFSET: usize = 6;
pub const STATUS_OFFSET: usize = 7;
pub const BAR_GRAPH_OFFSET: usize = 11;

/// Raw fields of a length-checked frame. Nothing beyond the length is
/// validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub sign: u8,
    pub digits: [u8; 4],
    pub decimal: u8,
    /// Status bytes 1 to 4, in wire order.
    pub status: [u8; 4],
    /// Analog bar-graph level. Not used by the decoder.
    pub bar_graph: u8,
}

impl Frame {
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let bytes: &[u8; FRAME_LEN] = bytes
            .try_into()
            .map_err(|_| DecodeError::FrameWrongLength { actual: bytes.len() })?;

        let field = |offset: usize| -> [u8; 4] {
            [bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]]
        };

        Ok(Self {
            sign: bytes[SIGN_OFFSET],
            digits: field(DIGITS_OFFSET),
            decimal: bytes[DECIMAL_OFFSET],
            status: field(STATUS_OFFSET),
            bar_graph: bytes[BAR_GRAPH_OFFSET],
        })
    }

    pub fn is_over_range(&self) -> bool {
        self.digits == OVER_RANGE
    }

    /// Sign byte as a character. Any byte value is accepted.
    pub fn sign_char(&self) -> char {
        char::from(self.sign)
    }

    /// Decimal-point index, `0` meaning no decimal point.
    pub fn decimal_position(&self) -> Result<u8, DecodeError> {
        match self.decimal {
            b'0'..=b'9' => Ok(self.decimal - b'0'),
            byte => Err(DecodeError::InvalidDecimalPosition { byte }),
        }
    }
}
