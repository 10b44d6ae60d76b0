//! Turns measure-less [ScoreSkeleton] into [Score].
//!
//! Barlines are taken from the meter timeline. Every event, that crosses
//! a barline, is split, and sounding parts of it are tied together.
//! Voices, shorter than the score, are filled by rests up to the end.
use crate::primitives::{EventInfo, Length, TimeLine, TimeSignature};

use super::{EngineError, Measure, Part, Score, ScoreSkeleton, Voice};

pub trait MeasureBuilder {
    fn build_measures(&self, skeleton: ScoreSkeleton) -> Result<Score, EngineError>;
}

/// Places barlines by time signatures. Before the first time signature
/// (or without any) `default_time_signature` is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarlineMeasureBuilder {
    pub default_time_signature: TimeSignature,
}
impl BarlineMeasureBuilder {
    pub fn new(default_time_signature: TimeSignature) -> Self {
        Self {
            default_time_signature,
        }
    }

    /// Lengths of measures, covering `total` length.
    ///
    /// Measure, interrupted by time signature change, becomes shorter.
    ///
    /// # Example
    /// ```
    /// # use vmf_codec::dom::BarlineMeasureBuilder;
    /// # use vmf_codec::primitives::{Length, TimeLine, TimeSignature};
    /// let meter = TimeLine::new()
    ///     .with(Length::from(0.0), TimeSignature::new(3, 4))
    ///     .with(Length::from(6.0), TimeSignature::new(5, 8));
    /// let builder = BarlineMeasureBuilder::default();
    /// assert_eq!(
    ///     builder.measure_lengths(&meter, Length::from(8.0)),
    ///     vec![
    ///         Length::from(3.0),
    ///         Length::from(3.0),
    ///         Length::from(2.5)
    ///     ]
    /// );
    /// ```
    pub fn measure_lengths(
        &self,
        meter: &TimeLine<TimeSignature>,
        total: Length,
    ) -> Vec<Length> {
        let mut lengths = Vec::new();
        let mut position = Length::zero();
        while position < total {
            let time_signature = meter
                .at(position)
                .copied()
                .unwrap_or(self.default_time_signature);
            let mut end = position + time_signature.length();
            if let Some((change, _)) = meter
                .iter()
                .find(|(offset, _)| **offset > position && **offset < end)
            {
                end = *change;
            }
            if end <= position {
                log::warn!("empty time signature at {}", position);
                break;
            }
            lengths.push(end.checked_sub(position).unwrap_or_default());
            position = end;
        }
        lengths
    }

    fn split_voice(
        &self,
        voice: &Voice,
        lengths: &[Length],
    ) -> Result<Vec<Voice>, EngineError> {
        let mut measures = vec![Voice::default(); lengths.len()];
        let mut idx = 0;
        let mut room = lengths.first().copied().unwrap_or_default();
        for event in voice.events.iter() {
            let mut event = event.clone();
            loop {
                let measure = measures.get_mut(idx).ok_or_else(|| {
                    EngineError::Measures(format!(
                        "event does not fit into {} measures: {:?}",
                        lengths.len(),
                        event
                    ))
                })?;
                match room.checked_sub(event.length) {
                    Some(left) => {
                        measure.push(event);
                        room = left;
                        if room.is_zero() {
                            idx += 1;
                            room = lengths.get(idx).copied().unwrap_or_default();
                        }
                        break;
                    }
                    None => {
                        let head_length = event
                            .length
                            .checked_sub(room)
                            .unwrap_or_default();
                        let head = event
                            .cut_head(head_length)
                            .map_err(EngineError::Measures)?;
                        log::trace!("split over barline: {:?}", event);
                        measure.push(event);
                        idx += 1;
                        room = lengths.get(idx).copied().unwrap_or_default();
                        event = head;
                    }
                }
            }
        }
        while let Some(measure) = measures.get_mut(idx) {
            measure.push(EventInfo::rest(room));
            idx += 1;
            room = lengths.get(idx).copied().unwrap_or_default();
        }
        Ok(measures)
    }
}
impl MeasureBuilder for BarlineMeasureBuilder {
    fn build_measures(&self, skeleton: ScoreSkeleton) -> Result<Score, EngineError> {
        let total = skeleton
            .parts
            .iter()
            .flat_map(|p| p.voices.iter())
            .map(|v| v.length())
            .fold(Length::zero(), |a, b| match b > a {
                true => b,
                false => a,
            });
        let lengths = self.measure_lengths(&skeleton.time_signatures, total);
        log::debug!(
            "building {} measures for {} parts",
            lengths.len(),
            skeleton.parts.len()
        );
        let mut parts = Vec::with_capacity(skeleton.parts.len());
        for part in skeleton.parts.iter() {
            let mut measures = vec![Measure::default(); lengths.len()];
            for voice in part.voices.iter() {
                for (measure, voice) in measures
                    .iter_mut()
                    .zip(self.split_voice(voice, &lengths)?)
                {
                    measure.voices.push(voice);
                }
            }
            parts.push(Part::new(measures));
        }
        Ok(Score {
            parts,
            time_signatures: skeleton.time_signatures,
            key_signatures: skeleton.key_signatures,
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{BarlineMeasureBuilder, MeasureBuilder};
    use crate::{
        dom::{PartSkeleton, ScoreSkeleton, Voice},
        primitives::{EventInfo, Length, Pitch, Tie, TimeLine, TimeSignature},
    };

    #[test]
    fn default_meter() {
        let builder = BarlineMeasureBuilder::default();
        assert_eq!(
            builder.measure_lengths(&TimeLine::new(), Length::from(9.0)),
            vec![Length::from(4.0); 3]
        );
        assert!(builder
            .measure_lengths(&TimeLine::new(), Length::zero())
            .is_empty());
    }

    #[test]
    fn note_over_barline() {
        let c4 = Pitch::from_midi(60);
        let skeleton = ScoreSkeleton {
            parts: vec![PartSkeleton {
                voices: vec![Voice::new([
                    EventInfo::rest(Length::from(1.0)),
                    EventInfo::note(c4, Length::from(3.0)),
                    EventInfo::note(c4, Length::from(1.0)),
                ])],
            }],
            time_signatures: TimeLine::new()
                .with(Length::zero(), TimeSignature::new(2, 4)),
            ..Default::default()
        };
        let score = BarlineMeasureBuilder::default()
            .build_measures(skeleton)
            .unwrap();
        let part = &score.parts[0];
        assert_eq!(part.measures.len(), 3);
        let expected = [
            vec![
                EventInfo::rest(Length::from(1.0)),
                EventInfo::note(c4, Length::from(1.0)).with_tie(Tie::Start),
            ],
            vec![EventInfo::note(c4, Length::from(2.0)).with_tie(Tie::Stop)],
            vec![
                EventInfo::note(c4, Length::from(1.0)),
                EventInfo::rest(Length::from(1.0)),
            ],
        ];
        for (measure, events) in part.measures.iter().zip_eq(expected) {
            assert_eq!(measure.voices.len(), 1);
            assert_eq!(measure.voices[0].events, events);
        }
    }

    #[test]
    fn long_note_continues() {
        let g4 = Pitch::from_midi(67);
        let skeleton = ScoreSkeleton {
            parts: vec![PartSkeleton {
                voices: vec![
                    Voice::new([EventInfo::note(g4, Length::from(3.0))]),
                    Voice::new([EventInfo::rest(Length::from(1.0))]),
                ],
            }],
            time_signatures: TimeLine::new()
                .with(Length::zero(), TimeSignature::new(1, 4)),
            ..Default::default()
        };
        let score = BarlineMeasureBuilder::default()
            .build_measures(skeleton)
            .unwrap();
        let ties = score.parts[0]
            .measures
            .iter()
            .map(|m| m.voices[0].events[0].event.tie())
            .collect::<Vec<_>>();
        assert_eq!(ties, vec![Tie::Start, Tie::Continue, Tie::Stop]);
        let second_voice = score.parts[0]
            .measures
            .iter()
            .map(|m| m.voices[1].events.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            second_voice,
            vec![vec![EventInfo::rest(Length::from(1.0))]; 3]
        );
    }
}
