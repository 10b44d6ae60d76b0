//! Score DOM.
//!
//! Score holds Parts, Part holds Measures, Measure holds concurrent Voices,
//! and Voice holds events. Meter and key changes are kept by Score in
//! timelines, rather than in measures.
//!
//! Decoder produces [ScoreSkeleton], where every part holds full-length
//! voices without measures. Then [MeasureBuilder] turns it into Score.
use serde::{Deserialize, Serialize};

use crate::primitives::{
    EventInfo, KeySignature, Length, TimeLine, TimeSignature,
};

pub mod engine;
pub mod measure_builder;

pub use engine::{EngineError, JsonEngine, NotationEngine};
pub use measure_builder::{BarlineMeasureBuilder, MeasureBuilder};

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    pub parts: Vec<Part>,
    #[serde(default)]
    pub time_signatures: TimeLine<TimeSignature>,
    #[serde(default)]
    pub key_signatures: TimeLine<KeySignature>,
}
impl Score {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            parts,
            ..Default::default()
        }
    }
    pub fn with_time_signature(
        mut self,
        offset: Length,
        time_signature: TimeSignature,
    ) -> Self {
        self.time_signatures.insert(offset, time_signature);
        self
    }
    pub fn with_key_signature(
        mut self,
        offset: Length,
        key_signature: KeySignature,
    ) -> Self {
        self.key_signatures.insert(offset, key_signature);
        self
    }
    /// All events of the score, part by part, measure by measure.
    pub fn events(&self) -> impl Iterator<Item = &EventInfo> {
        self.parts.iter().flat_map(|part| part.events())
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub measures: Vec<Measure>,
}
impl Part {
    pub fn new(measures: Vec<Measure>) -> Self {
        Self {
            name: None,
            measures,
        }
    }
    /// Part with one voice, that lives in a single measure.
    pub fn from_events(events: impl IntoIterator<Item = EventInfo>) -> Self {
        Self::new(vec![Measure::new(vec![Voice::new(events)])])
    }
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn events(&self) -> impl Iterator<Item = &EventInfo> {
        self.measures
            .iter()
            .flat_map(|m| m.voices.iter())
            .flat_map(|v| v.events.iter())
    }
    /// The largest amount of voices, found in one measure.
    /// Part without measures still counts as single voice.
    pub fn voices_count(&self) -> usize {
        self.measures
            .iter()
            .map(|m| m.voices.len())
            .max()
            .unwrap_or(1)
            .max(1)
    }
}

/// Measure contains concurrent voices.
/// Measure without voice splitting has exactly one voice.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Measure {
    pub voices: Vec<Voice>,
}
impl Measure {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }
    /// Length of the longest voice.
    pub fn length(&self) -> Length {
        self.voices
            .iter()
            .map(|v| v.length())
            .fold(Length::zero(), |a, b| match b > a {
                true => b,
                false => a,
            })
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Voice {
    pub events: Vec<EventInfo>,
}
impl Voice {
    pub fn new(events: impl IntoIterator<Item = EventInfo>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
    pub fn push(&mut self, event: EventInfo) -> &mut Self {
        self.events.push(event);
        self
    }
    pub fn length(&self) -> Length {
        self.events
            .iter()
            .fold(Length::zero(), |acc, ev| acc + ev.length)
    }
}

/// Score without measures: what decoder gives back.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ScoreSkeleton {
    pub parts: Vec<PartSkeleton>,
    pub time_signatures: TimeLine<TimeSignature>,
    pub key_signatures: TimeLine<KeySignature>,
}

/// Voices of one part, each spanning the whole score.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PartSkeleton {
    pub voices: Vec<Voice>,
}

#[cfg(test)]
mod tests {
    use super::{Measure, Part, Voice};
    use crate::primitives::{EventInfo, Length, Pitch};

    #[test]
    fn measure_length() {
        let c4 = Pitch::from_midi(60);
        let measure = Measure::new(vec![
            Voice::new([EventInfo::note(c4, Length::from(1.0))]),
            Voice::new([
                EventInfo::note(c4, Length::from(1.5)),
                EventInfo::rest(Length::from(0.5)),
            ]),
        ]);
        assert_eq!(measure.length(), Length::from(2.0));
        assert_eq!(Measure::default().length(), Length::zero());
    }

    #[test]
    fn voices_count() {
        assert_eq!(Part::default().voices_count(), 1);
        let part = Part::new(vec![
            Measure::new(vec![Voice::default()]),
            Measure::new(vec![Voice::default(); 3]),
            Measure::new(vec![]),
        ]);
        assert_eq!(part.voices_count(), 3);
        assert_eq!(part.events().count(), 0);
    }
}
