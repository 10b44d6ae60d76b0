//! Score → VMF.
use fraction::Fraction;

use super::{
    document::{rest_frame, sounding_frame},
    flatten_voices, scan, CodecSettings, Document, Frame, FrameState, Header,
    Stream, VmfError, VmfResult,
};
use crate::{
    dom::Score,
    notation::{articulation_to_vmf, velocity_to_vmf, NO_ARTICULATION},
    primitives::{
        as_integer, format_offset, format_rational, Chord, EventType, Length,
        Note, Pitch,
    },
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Encoder {
    settings: CodecSettings,
}
impl Encoder {
    pub fn new(settings: CodecSettings) -> Self {
        Self { settings }
    }

    pub fn encode(&self, score: &Score) -> VmfResult<Document> {
        let tick = scan::tick_value(score)?;
        let width = scan::largest_chord_width(score);
        let streams = flatten_voices(score);

        let mut columns = streams
            .iter()
            .map(|stream| self.encode_stream(stream, tick, width))
            .collect::<VmfResult<Vec<_>>>()?;
        let ticks = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        for (column, stream) in columns.iter_mut().zip(streams.iter()) {
            let rest = rest_frame(width, part_id(stream)?);
            column.resize(ticks, rest);
        }
        let mut body = vec![Vec::with_capacity(columns.len()); ticks];
        for column in columns {
            for (row, frame) in body.iter_mut().zip(column) {
                row.push(frame);
            }
        }

        let header = Header {
            tick_value: format_rational(tick),
            number_of_parts: score.parts.len(),
            number_of_voices: streams.len(),
            time_signature: score
                .time_signatures
                .iter()
                .map(|(offset, ts)| (format_offset(offset.get()), ts.to_string()))
                .collect(),
            key_signature: score
                .key_signatures
                .iter()
                .map(|(offset, ks)| (format_offset(offset.get()), ks.sharps))
                .collect(),
        };
        log::info!(
            "encoded {} parts into {} voices, {} ticks of {}, chord width {}",
            header.number_of_parts,
            header.number_of_voices,
            body.len(),
            header.tick_value,
            width
        );
        Ok(Document { header, body })
    }

    /// How many ticks the length lasts.
    fn ticks_count(&self, length: Length, tick: Fraction) -> VmfResult<usize> {
        as_integer(length.get() / tick, self.settings.precision)
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| VmfError::unquantizable(length.get(), tick))
    }

    fn encode_stream(
        &self,
        stream: &Stream,
        tick: Fraction,
        width: usize,
    ) -> VmfResult<Vec<Frame>> {
        let part_id = part_id(stream)?;
        let mut frames = Vec::new();
        // Previous event of this stream left tie open.
        let mut tie_open = false;
        let mut previous: &[Pitch] = &[];
        for event in stream.events.iter() {
            let count = self.ticks_count(event.length, tick)?;
            log::trace!("{:?} lasts {} ticks", event, count);
            match &event.event {
                EventType::Rest => {
                    frames.extend(
                        std::iter::repeat(rest_frame(width, part_id)).take(count),
                    );
                    tie_open = false;
                    previous = &[];
                }
                sounding @ (EventType::Note(Note { velocity, .. })
                | EventType::Chord(Chord { velocity, .. })) => {
                    let tie = sounding.tie();
                    let pitches = sounding.pitches();
                    let sustain =
                        tie_open && tie.is_incoming() && pitches == previous;
                    if !sustain && (tie_open || tie.is_incoming()) {
                        log::warn!(
                            "broken tie in part {} voice {}: {:?} after {:?}",
                            stream.part_id,
                            stream.voice_index,
                            event,
                            previous
                        );
                    }
                    let state = match sustain {
                        true => FrameState::Sustain,
                        false => FrameState::Attack,
                    };
                    let dynamic = velocity_to_vmf((*velocity).into())?;
                    let articulation = match sounding.articulations() {
                        [] => NO_ARTICULATION,
                        [first, others @ ..] => {
                            if !others.is_empty() {
                                log::warn!(
                                    "only one articulation fits the frame, \
                                     dropped: {:?}",
                                    others
                                );
                            }
                            articulation_to_vmf(first)?
                        }
                    };
                    frames.push(sounding_frame(
                        state,
                        dynamic,
                        articulation,
                        pitches,
                        width,
                        part_id,
                    ));
                    let held =
                        sounding_frame(FrameState::Sustain, 0, 0, pitches, width, part_id);
                    frames.extend(std::iter::repeat(held).take(count - 1));
                    tie_open = tie.is_outgoing();
                    previous = pitches;
                }
            }
        }
        log::debug!(
            "stream {}:{} encoded into {} frames",
            stream.part_id,
            stream.voice_index,
            frames.len()
        );
        Ok(frames)
    }
}

fn part_id(stream: &Stream) -> VmfResult<i32> {
    i32::try_from(stream.part_id).map_err(|_| {
        VmfError::MalformedDocument(format!(
            "part index {} does not fit the frame",
            stream.part_id
        ))
    })
}
