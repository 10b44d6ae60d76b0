//! VMF → score skeleton.
use std::collections::HashMap;

use fraction::Fraction;

use super::{
    document::{
        part_id, slots, ARTICULATION_INDEX, DYNAMIC_INDEX, STATE_INDEX,
        UNUSED_SLOT,
    },
    CodecSettings, Document, FrameState, VmfError, VmfResult,
};
use crate::{
    dom::{PartSkeleton, ScoreSkeleton, Voice},
    notation::{vmf_to_articulation, vmf_to_velocity},
    primitives::{
        parse_rational, snap_to_integer, Chord, EventInfo, EventType,
        KeySignature, Length, Note, Pitch, TimeLine, TimeSignature,
    },
};

/// Event, which is being accumulated tick by tick.
struct Pending {
    event: EventType,
    ticks: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder {
    settings: CodecSettings,
}
impl Decoder {
    pub fn new(settings: CodecSettings) -> Self {
        Self { settings }
    }

    pub fn decode(&self, document: &Document) -> VmfResult<ScoreSkeleton> {
        let width = document.validate()?;
        let tick = document.tick_value()?;
        let header = &document.header;

        let mut parts: Vec<PartSkeleton> = Vec::new();
        // part_id → index in `parts`
        let mut arena: HashMap<i32, usize> = HashMap::new();
        for voice_idx in 0..document.columns() {
            let Some((id, voice)) = self.decode_column(document, voice_idx, tick)?
            else {
                continue;
            };
            let idx = match arena.get(&id) {
                Some(idx) => *idx,
                None => {
                    if arena.len() >= header.number_of_parts {
                        return Err(VmfError::MalformedDocument(format!(
                            "part_id {} exceeds number_of_parts {}",
                            id, header.number_of_parts
                        )));
                    }
                    parts.push(PartSkeleton::default());
                    arena.insert(id, parts.len() - 1);
                    parts.len() - 1
                }
            };
            if let Some(part) = parts.get_mut(idx) {
                part.voices.push(voice);
            }
        }
        if parts.len() < header.number_of_parts {
            log::warn!(
                "document declares {} parts, found only {}",
                header.number_of_parts,
                parts.len()
            );
        }

        let skeleton = ScoreSkeleton {
            parts,
            time_signatures: self.time_signatures(document)?,
            key_signatures: self.key_signatures(document)?,
        };
        log::info!(
            "decoded {} ticks of {} into {} parts, chord width {}",
            document.body.len(),
            header.tick_value,
            skeleton.parts.len(),
            width
        );
        Ok(skeleton)
    }

    /// Reads one stream. Returns None for document without ticks.
    fn decode_column(
        &self,
        document: &Document,
        voice_idx: usize,
        tick: Fraction,
    ) -> VmfResult<Option<(i32, Voice)>> {
        let mut voice = Voice::default();
        let mut column_part: Option<i32> = None;
        let mut pending: Option<Pending> = None;
        for (tick_idx, frame) in document.column(voice_idx).enumerate() {
            let frame_part = part_id(frame).ok_or_else(|| {
                VmfError::MalformedDocument(format!("empty frame at tick {}", tick_idx))
            })?;
            match column_part {
                None => column_part = Some(frame_part),
                Some(id) if id != frame_part => {
                    return Err(VmfError::MalformedDocument(format!(
                        "voice {} changes part_id from {} to {} at tick {}",
                        voice_idx, id, frame_part, tick_idx
                    )))
                }
                Some(_) => (),
            }
            let invalid = |reason: &str| VmfError::InvalidStateTransition {
                voice: voice_idx,
                tick: tick_idx,
                reason: reason.to_string(),
            };
            let state = FrameState::try_from(frame[STATE_INDEX])
                .map_err(|code| invalid(&format!("unknown state {}", code)))?;
            let pending_rest = pending.as_ref().map(|p| p.event.is_rest());
            match (state, pending_rest) {
                (FrameState::Attack, _) => {
                    self.flush(&mut voice, pending.take(), tick);
                    pending = Some(Pending {
                        event: self.sounding_event(frame, voice_idx, tick_idx)?,
                        ticks: 1,
                    });
                }
                (FrameState::Sustain, Some(false)) | (FrameState::Rest, Some(true)) => {
                    if let Some(current) = pending.as_mut() {
                        current.ticks += 1;
                    }
                }
                (FrameState::Sustain, Some(true)) => {
                    return Err(invalid("sustain after rest"));
                }
                (FrameState::Sustain, None) => {
                    return Err(invalid("sustain without attack"));
                }
                (FrameState::Rest, _) => {
                    self.flush(&mut voice, pending.take(), tick);
                    pending = Some(Pending {
                        event: EventType::Rest,
                        ticks: 1,
                    });
                }
            }
        }
        self.flush(&mut voice, pending.take(), tick);
        log::debug!(
            "voice {} of part {:?}: {} events",
            voice_idx,
            column_part,
            voice.events.len()
        );
        Ok(column_part.map(|id| (id, voice)))
    }

    fn flush(&self, voice: &mut Voice, pending: Option<Pending>, tick: Fraction) {
        let Some(pending) = pending else {
            return;
        };
        let length = snap_to_integer(
            Fraction::new(pending.ticks, 1_u64) * tick,
            self.settings.precision,
        );
        log::trace!("{:?} lasts {}", pending.event, length);
        voice.push(EventInfo::new(Length::from(length), pending.event));
    }

    fn sounding_event(
        &self,
        frame: &[i32],
        voice_idx: usize,
        tick_idx: usize,
    ) -> VmfResult<EventType> {
        let pitches = slots(frame)
            .filter(|slot| *slot != UNUSED_SLOT)
            .map(|(pc, octave)| {
                let checked_pc = u8::try_from(pc).ok().filter(|pc| *pc < 12);
                let checked_octave = i8::try_from(octave).ok();
                match (checked_pc, checked_octave) {
                    (Some(pc), Some(octave)) => Ok(Pitch::new(pc, octave)),
                    _ => Err(VmfError::MalformedDocument(format!(
                        "bad pitch ({}, {}) in voice {} at tick {}",
                        pc, octave, voice_idx, tick_idx
                    ))),
                }
            })
            .collect::<VmfResult<Vec<_>>>()?;
        let velocity = vmf_to_velocity(frame[DYNAMIC_INDEX])?;
        let articulations = vmf_to_articulation(frame[ARTICULATION_INDEX])?
            .into_iter()
            .collect::<Vec<_>>();
        match (pitches.len(), pitches.first()) {
            (_, None) => Err(VmfError::MalformedDocument(format!(
                "attack without pitches in voice {} at tick {}",
                voice_idx, tick_idx
            ))),
            (1, Some(pitch)) => Ok(EventType::Note(Note {
                velocity,
                articulations,
                ..Note::new(*pitch)
            })),
            _ => Ok(EventType::Chord(Chord {
                velocity,
                articulations,
                ..Chord::new(pitches)
            })),
        }
    }

    fn time_signatures(&self, document: &Document) -> VmfResult<TimeLine<TimeSignature>> {
        let mut timeline = TimeLine::new();
        for (offset, value) in document.header.time_signature.iter() {
            let time_signature = value
                .parse::<TimeSignature>()
                .map_err(VmfError::MalformedDocument)?;
            timeline.insert(parse_offset(offset)?, time_signature);
        }
        if timeline.at(Length::zero()).is_none() {
            timeline.insert(Length::zero(), self.settings.default_time_signature);
        }
        Ok(timeline)
    }

    fn key_signatures(&self, document: &Document) -> VmfResult<TimeLine<KeySignature>> {
        let mut timeline = TimeLine::new();
        for (offset, sharps) in document.header.key_signature.iter() {
            timeline.insert(parse_offset(offset)?, KeySignature::new(*sharps));
        }
        if timeline.at(Length::zero()).is_none() {
            timeline.insert(Length::zero(), self.settings.default_key_signature);
        }
        Ok(timeline)
    }
}

fn parse_offset(offset: &str) -> VmfResult<Length> {
    let frac = parse_rational(offset).map_err(VmfError::MalformedDocument)?;
    match frac.is_sign_negative() && frac.numer() != Some(&0) {
        true => Err(VmfError::MalformedDocument(format!(
            "negative offset: {}",
            offset
        ))),
        false => Ok(Length::from(frac)),
    }
}
