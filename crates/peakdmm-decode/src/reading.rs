use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// One decoded measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Sign character from the wire, `None` only when over range.
    pub sign: Option<char>,
    pub value: Value,
    pub unit: Prefix,
    pub mode: Option<Mode>,
    pub status: StatusSet,
}

impl Reading {
    pub fn is_over_range(&self) -> bool {
        self.value == Value::OverRange
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    /// Displayed as `OL` on the meter.
    OverRange,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::OverRange => f.write_str("OL"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::OverRange => serializer.serialize_str("OL"),
        }
    }
}

/// Decimal unit prefix shown next to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Prefix {
    #[default]
    None,
    Milli,
    Micro,
    Kilo,
    Mega,
    /// Only produced for capacitance readings.
    Nano,
}

impl Prefix {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Milli => "m",
            Self::Micro => "µ",
            Self::Kilo => "k",
            Self::Mega => "M",
            Self::Nano => "n",
        }
    }
}

/// Measurement mode selected on the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Fahrenheit,
    Celsius,
    Farad,
    Hertz,
    Hfe,
    Ohm,
    Ampere,
    Volt,
}

impl Mode {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
            Self::Farad => "F",
            Self::Hertz => "Hz",
            Self::Hfe => "hFE",
            Self::Ohm => "Ω",
            Self::Ampere => "A",
            Self::Volt => "V",
        }
    }
}

/// Independent status indicators. Declaration order is the rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusFlag {
    Bpn,
    Hold,
    Rel,
    Ac,
    Dc,
    Auto,
    Batt,
    Apo,
    Min,
    Max,
    Percent,
    Diode,
    Continuity,
}

impl StatusFlag {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bpn => "BPN",
            Self::Hold => "HOLD",
            Self::Rel => "REL",
            Self::Ac => "AC",
            Self::Dc => "DC",
            Self::Auto => "AUTO",
            Self::Batt => "BATT",
            Self::Apo => "APO",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Percent => "%",
            Self::Diode => "Diode",
            Self::Continuity => "Continuity",
        }
    }
}

macro_rules! symbol_display_and_serialize {
    ($ty:ty, $method:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.$method())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.$method())
            }
        }
    };
}

symbol_display_and_serialize!(Prefix, symbol);
symbol_display_and_serialize!(Mode, symbol);
symbol_display_and_serialize!(StatusFlag, label);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusSet(BTreeSet<StatusFlag>);

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, flag: StatusFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusFlag> + '_ {
        self.0.iter().copied()
    }

    /// Labels joined with `,`, e.g. `AC,AUTO`.
    pub fn joined(&self) -> String {
        self.iter().map(|f| f.label()).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<StatusFlag> for StatusSet {
    fn from_iter<I: IntoIterator<Item = StatusFlag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
