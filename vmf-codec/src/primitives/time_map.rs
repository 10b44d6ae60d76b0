//! Offset-indexed timelines of meter and key changes.
use std::{fmt::Display, str::FromStr};

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use super::Length;

/// Meter, e.g. 7/8.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}
impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
    /// Length of one measure in quarter-notes.
    ///
    /// # Example
    /// ```
    /// # use vmf_codec::primitives::{Length, TimeSignature};
    /// assert_eq!(TimeSignature::new(7, 8).length(), Length::from(3.5));
    /// ```
    pub fn length(&self) -> Length {
        Length::from(Fraction::new(
            self.numerator as u64 * 4,
            self.denominator as u64,
        ))
    }
}
impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}
impl Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
impl FromStr for TimeSignature {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s
            .trim()
            .split_once('/')
            .ok_or(format!("Time signature must look like N/D, got: {}", s))?;
        let parse = |x: &str| {
            x.trim()
                .parse::<u32>()
                .map_err(|e| format!("Can not parse time signature {}: {}", s, e))
        };
        let (numerator, denominator) = (parse(num)?, parse(den)?);
        if numerator == 0 || denominator == 0 {
            return Err(format!("Time signature can not hold zero: {}", s));
        }
        Ok(Self::new(numerator, denominator))
    }
}
impl TryFrom<String> for TimeSignature {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl From<TimeSignature> for String {
    fn from(value: TimeSignature) -> Self {
        value.to_string()
    }
}

/// Key signature as signed count of accidentals:
/// positive for sharps, negative for flats.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct KeySignature {
    pub sharps: i32,
}
impl KeySignature {
    pub fn new(sharps: i32) -> Self {
        Self { sharps }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TimeLineEntry<T> {
    pub offset: Length,
    pub value: T,
}

/// Values, changing along the score. Entries are always sorted by offset,
/// and no two entries share one offset.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(
    from = "Vec<TimeLineEntry<T>>",
    into = "Vec<TimeLineEntry<T>>",
    bound(
        serialize = "T: Serialize + Clone",
        deserialize = "T: Deserialize<'de>"
    )
)]
pub struct TimeLine<T> {
    entries: Vec<TimeLineEntry<T>>,
}
impl<T> TimeLine<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
    /// Insert value. Value at the same offset is replaced.
    pub fn insert(&mut self, offset: Length, value: T) -> &mut Self {
        match self.entries.iter().position(|e| e.offset >= offset) {
            Some(idx) if self.entries[idx].offset == offset => {
                self.entries[idx].value = value
            }
            Some(idx) => {
                self.entries.insert(idx, TimeLineEntry { offset, value })
            }
            None => self.entries.push(TimeLineEntry { offset, value }),
        }
        self
    }
    pub fn with(mut self, offset: Length, value: T) -> Self {
        self.insert(offset, value);
        self
    }
    /// Value, active at the given offset.
    pub fn at(&self, offset: Length) -> Option<&T> {
        self.entries
            .iter()
            .take_while(|e| e.offset <= offset)
            .last()
            .map(|e| &e.value)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Length, &T)> {
        self.entries.iter().map(|e| (&e.offset, &e.value))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
impl<T> Default for TimeLine<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> From<Vec<TimeLineEntry<T>>> for TimeLine<T> {
    fn from(value: Vec<TimeLineEntry<T>>) -> Self {
        let mut timeline = Self::new();
        for entry in value {
            timeline.insert(entry.offset, entry.value);
        }
        timeline
    }
}
impl<T> From<TimeLine<T>> for Vec<TimeLineEntry<T>> {
    fn from(value: TimeLine<T>) -> Self {
        value.entries
    }
}
