//! Frame to [`Reading`] conversion.
//!
//! Bit indices count from the least significant bit. Status bytes are numbered
//! 1 to 4 as on the wire, stored at index 0 to 3 of [`Frame::status`].

use crate::error::DecodeError;
use crate::frame::Frame;
use crate::reading::{Mode, Prefix, Reading, StatusFlag, StatusSet, Value};

const fn bit(n: u8) -> u8 {
    1 << n
}

/// `(status byte index, mask, flag)` for every independent indicator.
const STATUS_BITS: [(usize, u8, StatusFlag); 13] = [
    (0, bit(0), StatusFlag::Bpn),
    (0, bit(1), StatusFlag::Hold),
    (0, bit(2), StatusFlag::Rel),
    (0, bit(3), StatusFlag::Ac),
    (0, bit(4), StatusFlag::Dc),
    (0, bit(5), StatusFlag::Auto),
    (1, bit(2), StatusFlag::Batt),
    (1, bit(3), StatusFlag::Apo),
    (1, bit(4), StatusFlag::Min),
    (1, bit(5), StatusFlag::Max),
    (2, bit(1), StatusFlag::Percent),
    (2, bit(2), StatusFlag::Diode),
    (2, bit(3), StatusFlag::Continuity),
];

/// Prefix bits of status byte 3, in scan order.
const PREFIX_BITS: [(u8, Prefix); 4] = [
    (bit(4), Prefix::Mega),
    (bit(5), Prefix::Kilo),
    (bit(6), Prefix::Milli),
    (bit(7), Prefix::Micro),
];

/// Mode bits of status byte 4, in scan order.
const MODE_BITS: [(u8, Mode); 8] = [
    (bit(0), Mode::Fahrenheit),
    (bit(1), Mode::Celsius),
    (bit(2), Mode::Farad),
    (bit(3), Mode::Hertz),
    (bit(4), Mode::Hfe),
    (bit(5), Mode::Ohm),
    (bit(6), Mode::Ampere),
    (bit(7), Mode::Volt),
];

/// Status byte 2 bit that switches a capacitance reading to nanofarad.
const NANO_BIT: u8 = bit(1);

/// Decimal points past the third digit are clamped.
const MAX_DECIMAL_POSITION: u8 = 3;

/// Decodes one 14-byte frame.
///
/// Same input, same output: the function keeps no state between calls.
pub fn decode(bytes: &[u8]) -> Result<Reading, DecodeError> {
    let frame = Frame::parse(bytes)?;
    let [_, status2, status3, status4] = frame.status;

    let status = status_flags(&frame.status);
    let mode = scan_last(status4, &MODE_BITS);
    let unit = match mode {
        Some(Mode::Farad) if status2 & NANO_BIT != 0 => Prefix::Nano,
        _ => scan_last(status3, &PREFIX_BITS).unwrap_or_default(),
    };

    if frame.is_over_range() {
        return Ok(Reading {
            sign: None,
            value: Value::OverRange,
            unit,
            mode,
            status,
        });
    }

    let decimal = frame.decimal_position()?;
    let value = parse_digits(frame.digits, decimal)?;

    Ok(Reading {
        sign: Some(frame.sign_char()),
        value: Value::Number(value),
        unit,
        mode,
        status,
    })
}

fn status_flags(status: &[u8; 4]) -> StatusSet {
    STATUS_BITS
        .iter()
        .filter(|(index, mask, _)| status[*index] & mask != 0)
        .map(|(_, _, flag)| *flag)
        .collect()
}

/// Finds the tag of the last set bit in `table` order. The meter sets at most
/// one bit per group; when several are set the later entry wins.
fn scan_last<T: Copy>(byte: u8, table: &[(u8, T)]) -> Option<T> {
    table
        .iter()
        .rev()
        .find(|(mask, _)| byte & mask != 0)
        .map(|(_, tag)| *tag)
}

fn parse_digits(digits: [u8; 4], decimal: u8) -> Result<f64, DecodeError> {
    let invalid = || DecodeError::InvalidDigits { digits };

    if !digits.is_ascii() {
        return Err(invalid());
    }

    let mut text: String = digits.iter().map(|&b| char::from(b)).collect();
    if decimal > 0 {
        text.insert(usize::from(decimal.min(MAX_DECIMAL_POSITION)), '.');
    }

    let text = text.trim_matches(|c: char| c.is_ascii_whitespace());
    if !is_decimal(text) {
        return Err(invalid());
    }
    text.parse::<f64>().map_err(|_| invalid())
}

/// Optional sign, then ASCII digits with at most one `.`, at least one digit.
fn is_decimal(text: &str) -> bool {
    let body = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    let mut digits = 0;
    let mut points = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}
