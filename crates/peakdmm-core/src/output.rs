//! Rendering of decoded readings for the output stream.

use peakdmm_decode::{Mode, Prefix, Reading, Value};
use serde::Serialize;
use std::io::Write;

use crate::error::OutputError;
use crate::timestamp::Timestamp;

/// Flattened output row. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isotime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    pub sign: String,
    pub value: Value,
    pub unit: Prefix,
    pub mode: Option<Mode>,
    /// Status labels joined with `,`.
    pub status: String,
}

impl Record {
    pub fn new(timestamp: Timestamp, reading: &Reading) -> Self {
        Self {
            isotime: timestamp.isotime,
            epoch: timestamp.epoch,
            sign: reading.sign.map(String::from).unwrap_or_default(),
            value: reading.value,
            unit: reading.unit,
            mode: reading.mode,
            status: reading.status.joined(),
        }
    }
}

/// Receives every successfully decoded reading.
pub trait ReadingSink {
    fn write_reading(&mut self, record: &Record) -> Result<(), OutputError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `;`-delimited text, one line per record.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

pub enum RecordWriter<W: Write> {
    Text(csv::Writer<W>),
    Json(W),
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text(
                csv::WriterBuilder::new()
                    .delimiter(b';')
                    .has_headers(false)
                    .quote_style(csv::QuoteStyle::Never)
                    .terminator(csv::Terminator::Any(b'\n'))
                    .from_writer(out),
            ),
            OutputFormat::Json => Self::Json(out),
        }
    }
}

impl<W: Write> ReadingSink for RecordWriter<W> {
    fn write_reading(&mut self, record: &Record) -> Result<(), OutputError> {
        match self {
            Self::Text(writer) => {
                writer.serialize(record)?;
                writer.flush()?;
            }
            Self::Json(out) => {
                serde_json::to_writer(&mut *out, record)?;
                out.write_all(b"\n")?;
                out.flush()?;
            }
        }
        Ok(())
    }
}
