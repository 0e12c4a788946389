//! Line-delimited frame reads on top of any byte reader.

use std::io::{ErrorKind, Read};

use crate::error::StreamError;

/// A line longer than this without a delimiter is flushed as one frame.
pub const MAX_LINE_LEN: usize = 1024;

const DELIMITER: u8 = b'\n';

/// Source of raw frames for the acquisition loop.
pub trait FrameSource {
    /// Blocks until one delimited frame is available or the read times out.
    fn read_frame(&mut self) -> Result<Vec<u8>, StreamError>;
}

/// Splits a byte stream into `\n`-terminated frames. The delimiter is kept.
pub struct FrameReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(64),
        }
    }

    /// Bytes received but not yet returned as a frame.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        if let Some(pos) = self.buf.iter().position(|&b| b == DELIMITER) {
            return Some(self.buf.drain(..=pos).collect());
        }
        if self.buf.len() > MAX_LINE_LEN {
            return Some(self.buf.drain(..).collect());
        }
        None
    }

    fn take_partial(&mut self) -> Option<Vec<u8>> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.drain(..).collect())
        }
    }
}

impl<R: Read> FrameSource for FrameReader<R> {
    fn read_frame(&mut self) -> Result<Vec<u8>, StreamError> {
        let mut chunk = [0u8; 256];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(line);
            }
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    return self
                        .take_partial()
                        .ok_or_else(|| StreamError::Read(ErrorKind::UnexpectedEof.into()));
                }
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                // A partial line is handed out as-is once the line goes quiet.
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return self.take_partial().ok_or(StreamError::Timeout);
                }
                Err(e) => return Err(StreamError::Read(e)),
            }
        }
    }
}
