use chrono::{DateTime, Local};

/// Which timestamp fields to attach to each record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampOptions {
    pub isotime: bool,
    pub epoch: bool,
}

impl TimestampOptions {
    pub fn is_enabled(&self) -> bool {
        self.isotime || self.epoch
    }

    pub fn capture(&self) -> Timestamp {
        if self.is_enabled() {
            Timestamp::at(*self, Local::now())
        } else {
            Timestamp::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timestamp {
    /// Local time, ISO 8601 without offset, microsecond precision.
    pub isotime: Option<String>,
    /// Seconds since the unix epoch with a six digit fraction.
    pub epoch: Option<String>,
}

impl Timestamp {
    pub fn at(options: TimestampOptions, now: DateTime<Local>) -> Self {
        Self {
            isotime: options
                .isotime
                .then(|| now.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()),
            epoch: options
                .epoch
                .then(|| format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Local> {
        Local.timestamp_opt(1_644_400_000, 123_456_000).unwrap()
    }

    #[test]
    fn test_disabled_captures_nothing() {
        assert_eq!(TimestampOptions::default().capture(), Timestamp::default());
    }

    #[test]
    fn test_epoch_format() {
        let ts = Timestamp::at(TimestampOptions { isotime: false, epoch: true }, fixed());
        assert_eq!(ts.epoch.as_deref(), Some("1644400000.123456"));
        assert_eq!(ts.isotime, None);
    }

    #[test]
    fn test_isotime_format() {
        let now = fixed();
        let ts = Timestamp::at(TimestampOptions { isotime: true, epoch: false }, now);
        let iso = ts.isotime.unwrap();
        assert!(iso.ends_with(".123456"), "{iso}");
        assert_eq!(iso.len(), "2022-02-09T10:46:40.123456".len());
        assert_eq!(ts.epoch, None);
    }
}
