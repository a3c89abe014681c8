//! The `$timescale` declaration: a magnitude of 1, 10, or 100 and a time unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of a VCD timescale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
    /// Microseconds.
    Us,
    /// Nanoseconds.
    Ns,
    /// Picoseconds.
    Ps,
    /// Femtoseconds.
    Fs,
}

impl TimeUnit {
    /// The unit suffix as written in a VCD file.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => "us",
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
            TimeUnit::Fs => "fs",
        }
    }
}

/// Resolution of the `#<time>` markers in a document, e.g. `1ps` or `10ns`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timescale {
    magnitude: u32,
    unit: TimeUnit,
}

impl Timescale {
    /// Creates a timescale. Only magnitudes 1, 10 and 100 are valid VCD.
    pub fn new(magnitude: u32, unit: TimeUnit) -> Result<Self, ParseTimescaleError> {
        if !matches!(magnitude, 1 | 10 | 100) {
            return Err(ParseTimescaleError {
                input: format!("{magnitude}{}", unit.as_str()),
            });
        }
        Ok(Self { magnitude, unit })
    }

    /// The magnitude (1, 10 or 100).
    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    /// The unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self {
            magnitude: 1,
            unit: TimeUnit::Ps,
        }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.as_str())
    }
}

/// Error type for parsing timescale strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimescaleError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseTimescaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timescale: '{}'", self.input)
    }
}

impl std::error::Error for ParseTimescaleError {}

impl FromStr for Timescale {
    type Err = ParseTimescaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseTimescaleError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let split = lower
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(err)?;
        let (num, unit) = lower.split_at(split);
        let magnitude: u32 = if num.is_empty() {
            1
        } else {
            num.parse().map_err(|_| err())?
        };
        let unit = match unit.trim() {
            "s" => TimeUnit::S,
            "ms" => TimeUnit::Ms,
            "us" => TimeUnit::Us,
            "ns" => TimeUnit::Ns,
            "ps" => TimeUnit::Ps,
            "fs" => TimeUnit::Fs,
            _ => return Err(err()),
        };
        Timescale::new(magnitude, unit).map_err(|_| err())
    }
}
