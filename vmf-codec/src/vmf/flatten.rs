//! Splits polyphonic parts into single-voice streams.
use crate::{
    dom::Score,
    primitives::{EventInfo, Length},
};

/// One voice of one part, spanning the whole score.
#[derive(Debug, PartialEq, Clone)]
pub struct Stream {
    /// Index of the part in the score.
    pub part_id: usize,
    /// Index of the voice inside the part.
    pub voice_index: usize,
    pub events: Vec<EventInfo>,
}
impl Stream {
    pub fn new(part_id: usize, voice_index: usize) -> Self {
        Self {
            part_id,
            voice_index,
            events: Vec::new(),
        }
    }
    pub fn length(&self) -> Length {
        self.events
            .iter()
            .fold(Length::zero(), |acc, ev| acc + ev.length)
    }
}

/// Every voice of every part becomes a stream. Streams of one part go
/// in voice order, and parts keep their order.
///
/// Voice, missing in a measure, or shorter than the measure, is filled
/// with rest, so all streams of a part stay aligned by measures.
pub fn flatten_voices(score: &Score) -> Vec<Stream> {
    let mut result = Vec::new();
    for (part_id, part) in score.parts.iter().enumerate() {
        let mut streams = (0..part.voices_count())
            .map(|voice_index| Stream::new(part_id, voice_index))
            .collect::<Vec<_>>();
        for measure in part.measures.iter() {
            let measure_length = measure.length();
            for (idx, stream) in streams.iter_mut().enumerate() {
                let filled = match measure.voices.get(idx) {
                    Some(voice) => {
                        stream.events.extend(voice.events.iter().cloned());
                        voice.length()
                    }
                    None => Length::zero(),
                };
                match measure_length.checked_sub(filled) {
                    Some(gap) if !gap.is_zero() => {
                        stream.events.push(EventInfo::rest(gap))
                    }
                    _ => (),
                }
            }
        }
        log::debug!(
            "part {} flattened into {} streams",
            part_id,
            streams.len()
        );
        result.extend(streams);
    }
    result
}
