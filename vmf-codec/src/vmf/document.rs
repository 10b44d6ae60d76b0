//! VMF document as it lives on the wire.
use std::collections::BTreeMap;

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use super::{VmfError, VmfResult};
use crate::primitives::{parse_rational, Pitch};

/// One stream during one tick.
pub type Frame = Vec<i32>;

pub const STATE_INDEX: usize = 0;
pub const DYNAMIC_INDEX: usize = 1;
pub const ARTICULATION_INDEX: usize = 2;
pub const FIRST_PITCH_INDEX: usize = 3;
/// state, dynamic, articulation and part_id.
pub const SERVICE_SLOTS: usize = 4;

/// Every pitch slot of a rest frame.
pub const REST_SLOT: (i32, i32) = (0, 0);
/// Pitch slot, not used by a note or a narrow chord.
pub const UNUSED_SLOT: (i32, i32) = (-1, -1);

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FrameState {
    Rest,
    Attack,
    Sustain,
}
impl FrameState {
    pub fn code(&self) -> i32 {
        match self {
            Self::Rest => 0,
            Self::Attack => 1,
            Self::Sustain => 2,
        }
    }
}
impl TryFrom<i32> for FrameState {
    type Error = i32;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Rest),
            1 => Ok(Self::Attack),
            2 => Ok(Self::Sustain),
            x => Err(x),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Header {
    pub tick_value: String,
    pub number_of_parts: usize,
    pub number_of_voices: usize,
    #[serde(default)]
    pub time_signature: BTreeMap<String, String>,
    #[serde(default)]
    pub key_signature: BTreeMap<String, i32>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Document {
    pub header: Header,
    /// Ticks, each holding one frame per voice.
    pub body: Vec<Vec<Frame>>,
}
impl Document {
    pub fn from_json(s: &str) -> VmfResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
    pub fn from_slice(bytes: &[u8]) -> VmfResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
    pub fn to_json(&self, pretty: bool) -> VmfResult<String> {
        let s = match pretty {
            true => serde_json::to_string_pretty(self)?,
            false => serde_json::to_string(self)?,
        };
        Ok(s)
    }

    /// Parsed `tick_value`. Must be positive.
    pub fn tick_value(&self) -> VmfResult<Fraction> {
        let tick = parse_rational(&self.header.tick_value)
            .map_err(VmfError::MalformedDocument)?;
        match tick.is_sign_negative() || tick.numer() == Some(&0) {
            true => Err(VmfError::MalformedDocument(format!(
                "tick_value must be positive, got {}",
                self.header.tick_value
            ))),
            false => Ok(tick),
        }
    }

    /// Frames of one voice in tick order.
    pub fn column(&self, voice: usize) -> impl Iterator<Item = &Frame> {
        self.body.iter().filter_map(move |tick| tick.get(voice))
    }

    /// Checks the shape of the header and the body, and returns the chord
    /// width, inferred from the frame length.
    pub fn validate(&self) -> VmfResult<usize> {
        let voices = self.header.number_of_voices;
        if self.header.number_of_parts > voices {
            return Err(VmfError::MalformedDocument(format!(
                "number_of_parts {} exceeds number_of_voices {}",
                self.header.number_of_parts, voices
            )));
        }
        if let Some((idx, tick)) =
            self.body.iter().enumerate().find(|(_, tick)| tick.len() != voices)
        {
            return Err(VmfError::MalformedDocument(format!(
                "tick {} has {} frames, but number_of_voices is {}",
                idx,
                tick.len(),
                voices
            )));
        }
        let Some(frame_length) = self.body.iter().flatten().map(|f| f.len()).next()
        else {
            return Ok(0);
        };
        if frame_length < SERVICE_SLOTS || (frame_length - SERVICE_SLOTS) % 2 != 0 {
            return Err(VmfError::MalformedDocument(format!(
                "frame length {} can not hold pitch pairs",
                frame_length
            )));
        }
        for (idx, tick) in self.body.iter().enumerate() {
            if let Some(frame) = tick.iter().find(|f| f.len() != frame_length) {
                return Err(VmfError::MalformedDocument(format!(
                    "tick {} holds frame of length {}, expected {}",
                    idx,
                    frame.len(),
                    frame_length
                )));
            }
        }
        Ok((frame_length - SERVICE_SLOTS) / 2)
    }

    /// Count of frames in every tick. Zero for document without ticks.
    pub fn columns(&self) -> usize {
        self.body.first().map_or(0, |tick| tick.len())
    }
}

/// Pitch slots of the frame as (pitch class, octave) pairs.
pub(crate) fn slots(frame: &[i32]) -> impl Iterator<Item = (i32, i32)> + '_ {
    let end = frame.len().saturating_sub(1).max(FIRST_PITCH_INDEX);
    frame
        .get(FIRST_PITCH_INDEX..end)
        .unwrap_or_default()
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
}

/// Count pitch pairs, that are not [UNUSED_SLOT].
///
/// # Example
/// ```
/// # use vmf_codec::vmf::find_number_of_notes_in_tick;
/// assert_eq!(
///     find_number_of_notes_in_tick(&[1, -1, 0, 0, 4, -1, -1, -1, -1, 0]),
///     1
/// );
/// assert_eq!(
///     find_number_of_notes_in_tick(&[1, -1, 0, 0, 4, 0, 0, -1, -1, 0]),
///     2
/// );
/// ```
pub fn find_number_of_notes_in_tick(frame: &[i32]) -> usize {
    slots(frame).filter(|slot| *slot != UNUSED_SLOT).count()
}

/// `part_id` is the last element of the frame.
pub(crate) fn part_id(frame: &[i32]) -> Option<i32> {
    frame.last().copied()
}

pub(crate) fn rest_frame(width: usize, part_id: i32) -> Frame {
    let mut frame = vec![FrameState::Rest.code(), 0, 0];
    for _ in 0..width {
        frame.extend([REST_SLOT.0, REST_SLOT.1]);
    }
    frame.push(part_id);
    frame
}

pub(crate) fn sounding_frame(
    state: FrameState,
    dynamic: i32,
    articulation: i32,
    pitches: &[Pitch],
    width: usize,
    part_id: i32,
) -> Frame {
    let mut frame = vec![state.code(), dynamic, articulation];
    for idx in 0..width {
        match pitches.get(idx) {
            Some(pitch) => {
                frame.extend([pitch.pitch_class() as i32, pitch.octave() as i32])
            }
            None => frame.extend([UNUSED_SLOT.0, UNUSED_SLOT.1]),
        }
    }
    frame.push(part_id);
    frame
}
