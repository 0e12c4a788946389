//! Read, decode, emit. One frame per iteration, nothing overlaps.

use log::{debug, error, warn};
use peakdmm_decode::{decode, DecodeError};
use std::thread;
use std::time::Duration;

use crate::error::AcquisitionError;
use crate::frame_reader::FrameSource;
use crate::output::{ReadingSink, Record};
use crate::timestamp::TimestampOptions;

/// Fixed pause after a failed read.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    pub timestamps: TimestampOptions,
    /// Pause after each emitted reading.
    pub sleep: Duration,
    pub retry_delay: Duration,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            timestamps: TimestampOptions::default(),
            sleep: Duration::ZERO,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Emitted(Record),
    /// The frame did not decode and was dropped.
    Discarded(DecodeError),
    /// Nothing could be read; the retry delay has already elapsed.
    ReadFailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub emitted: u64,
    pub discarded: u64,
    pub read_failures: u64,
}

pub struct AcquisitionLoop<S, K> {
    source: S,
    sink: K,
    config: AcquisitionConfig,
    stats: LoopStats,
}

impl<S: FrameSource, K: ReadingSink> AcquisitionLoop<S, K> {
    pub fn new(source: S, sink: K, config: AcquisitionConfig) -> Self {
        Self {
            source,
            sink,
            config,
            stats: LoopStats::default(),
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Runs one iteration. Only an output failure is returned as an error.
    pub fn step(&mut self) -> Result<StepOutcome, AcquisitionError> {
        let timestamp = self.config.timestamps.capture();

        let frame = match self.source.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("no data, is the device in USB mode? ({e})");
                self.stats.read_failures += 1;
                pause(self.config.retry_delay);
                return Ok(StepOutcome::ReadFailed);
            }
        };

        let reading = match decode(&frame) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("discarding frame [{}]: {e}", hex::encode(&frame));
                self.stats.discarded += 1;
                return Ok(StepOutcome::Discarded(e));
            }
        };
        debug!("{reading:?}");

        let record = Record::new(timestamp, &reading);
        self.sink.write_reading(&record)?;
        self.stats.emitted += 1;
        Ok(StepOutcome::Emitted(record))
    }

    /// Loops until the sink fails.
    pub fn run(&mut self) -> Result<(), AcquisitionError> {
        loop {
            if let StepOutcome::Emitted(_) = self.step()? {
                pause(self.config.sleep);
            }
        }
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OutputError, StreamError};
    use peakdmm_decode::{Mode, Value};
    use std::collections::VecDeque;
    use std::io;

    struct ScriptedSource(VecDeque<Result<Vec<u8>, StreamError>>);

    impl FrameSource for ScriptedSource {
        fn read_frame(&mut self) -> Result<Vec<u8>, StreamError> {
            self.0.pop_front().unwrap_or(Err(StreamError::Timeout))
        }
    }

    #[derive(Default)]
    struct Collect {
        records: Vec<Record>,
        fail: bool,
    }

    impl ReadingSink for Collect {
        fn write_reading(&mut self, record: &Record) -> Result<(), OutputError> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed").into());
            }
            self.records.push(record.clone());
            Ok(())
        }
    }

    const VOLTS: &[u8; 14] = b"+1234:2\x08\x00\x00\x80\x00\r\n";

    fn config() -> AcquisitionConfig {
        AcquisitionConfig {
            retry_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    fn run_steps(
        frames: Vec<Result<Vec<u8>, StreamError>>,
        steps: usize,
    ) -> AcquisitionLoop<ScriptedSource, Collect> {
        let mut acq = AcquisitionLoop::new(
            ScriptedSource(frames.into()),
            Collect::default(),
            config(),
        );
        for _ in 0..steps {
            acq.step().unwrap();
        }
        acq
    }

    #[test]
    fn test_emits_decoded_reading() {
        let mut acq = AcquisitionLoop::new(
            ScriptedSource(vec![Ok(VOLTS.to_vec())].into()),
            Collect::default(),
            config(),
        );
        match acq.step().unwrap() {
            StepOutcome::Emitted(record) => {
                assert_eq!(record.value, Value::Number(12.34));
                assert_eq!(record.mode, Some(Mode::Volt));
                assert_eq!(record.status, "AC");
                assert_eq!(record.isotime, None);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(acq.sink().records.len(), 1);
    }

    #[test]
    fn test_bad_frames_and_failed_reads_do_not_stop_the_loop() {
        let acq = run_steps(
            vec![
                Ok(b"+12\r\n".to_vec()),
                Err(StreamError::Timeout),
                Ok(b"+12x4:2\x08\x00\x00\x80\x00\r\n".to_vec()),
                Err(StreamError::Read(io::ErrorKind::BrokenPipe.into())),
                Ok(VOLTS.to_vec()),
            ],
            5,
        );
        assert_eq!(
            acq.stats(),
            LoopStats {
                emitted: 1,
                discarded: 2,
                read_failures: 2,
            }
        );
        assert_eq!(acq.sink().records.len(), 1);
    }

    #[test]
    fn test_discarded_outcome_carries_error() {
        let mut acq = AcquisitionLoop::new(
            ScriptedSource(vec![Ok(b"short\n".to_vec())].into()),
            Collect::default(),
            config(),
        );
        assert_eq!(
            acq.step().unwrap(),
            StepOutcome::Discarded(DecodeError::FrameWrongLength { actual: 6 })
        );
        assert_eq!(acq.step().unwrap(), StepOutcome::ReadFailed);
    }

    #[test]
    fn test_timestamps_attached_when_enabled() {
        let mut cfg = config();
        cfg.timestamps = TimestampOptions { isotime: true, epoch: true };
        let mut acq = AcquisitionLoop::new(
            ScriptedSource(vec![Ok(VOLTS.to_vec())].into()),
            Collect::default(),
            cfg,
        );
        acq.step().unwrap();
        let record = &acq.sink().records[0];
        assert!(record.isotime.is_some());
        assert!(record.epoch.is_some());
    }

    #[test]
    fn test_sink_failure_ends_run() {
        let sink = Collect {
            fail: true,
            ..Default::default()
        };
        let mut acq = AcquisitionLoop::new(
            ScriptedSource(
                vec![
                    Err(StreamError::Timeout),
                    Ok(b"junk\n".to_vec()),
                    Ok(VOLTS.to_vec()),
                ]
                .into(),
            ),
            sink,
            config(),
        );
        assert!(matches!(
            acq.run(),
            Err(AcquisitionError::Output(OutputError::Io(_)))
        ));
        assert_eq!(acq.stats().read_failures, 1);
        assert_eq!(acq.stats().discarded, 1);
    }
}
