//! VMF ("vector music format") codec.
//!
//! Score is flattened to single-voice streams, and every stream is
//! sampled by fixed time quantum (tick). Every tick becomes a row of
//! frames, one frame per stream:
//!
//! `[state, dynamic, articulation, pc_1, oct_1, …, pc_K, oct_K, part_id]`
//!
//! # Example
//! ```
//! # use vmf_codec::dom::{Part, Score};
//! # use vmf_codec::primitives::{EventInfo, Length, Pitch};
//! # use vmf_codec::vmf;
//! let score = Score::new(vec![Part::from_events([
//!     EventInfo::note(Pitch::from_midi(60), Length::from(1.0)),
//!     EventInfo::rest(Length::from(0.5)),
//!     EventInfo::chord(
//!         [Pitch::from_midi(60), Pitch::from_midi(64)],
//!         Length::from(1.5),
//!     ),
//! ])]);
//! let document = vmf::encode(&score).unwrap();
//! assert_eq!(document.header.tick_value, "1/2");
//! assert_eq!(document.body.len(), 6);
//! assert_eq!(document.body[0][0], vec![1, -1, 0, 0, 4, -1, -1, 0]);
//!
//! let decoded = vmf::decode(&document).unwrap();
//! assert_eq!(decoded.parts.len(), 1);
//! ```
use fraction::Fraction;

use crate::{
    dom::{BarlineMeasureBuilder, EngineError, MeasureBuilder, Score},
    notation::NotationError,
    primitives::{format_rational, KeySignature, TimeSignature},
};

pub mod decoder;
pub mod document;
pub mod encoder;
pub mod flatten;
pub mod scan;

pub use decoder::Decoder;
pub use document::{find_number_of_notes_in_tick, Document, Frame, FrameState, Header};
pub use encoder::Encoder;
pub use flatten::{flatten_voices, Stream};

/// Tolerance (in quarter-notes) for snapping near-integer tick counts.
pub const PRECISION: f64 = 1e-15;

#[derive(Debug, thiserror::Error)]
pub enum VmfError {
    #[error("Score has no events to quantize")]
    EmptyScore,
    #[error("Duration {length} is not a multiple of tick {tick}")]
    UnquantizableDuration { length: String, tick: String },
    #[error("Invalid state transition in voice {voice} at tick {tick}: {reason}")]
    InvalidStateTransition {
        voice: usize,
        tick: usize,
        reason: String,
    },
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
impl VmfError {
    pub(crate) fn unquantizable(length: Fraction, tick: Fraction) -> Self {
        Self::UnquantizableDuration {
            length: format_rational(length),
            tick: format_rational(tick),
        }
    }
}

pub type VmfResult<T> = Result<T, VmfError>;

/// Settings of [Encoder] and [Decoder].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecSettings {
    /// Distance to integer, below which tick count is snapped to it.
    pub precision: f64,
    /// Used by decoder, if document has no time signature at offset 0.
    pub default_time_signature: TimeSignature,
    /// Used by decoder, if document has no key signature at offset 0.
    pub default_key_signature: KeySignature,
}
impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            precision: PRECISION,
            default_time_signature: TimeSignature::default(),
            default_key_signature: KeySignature::default(),
        }
    }
}

/// Encode score with default settings.
pub fn encode(score: &Score) -> VmfResult<Document> {
    Encoder::new(CodecSettings::default()).encode(score)
}

/// Decode document with default settings, building measures by meter.
pub fn decode(document: &Document) -> VmfResult<Score> {
    let settings = CodecSettings::default();
    decode_with(
        document,
        settings,
        &BarlineMeasureBuilder::new(settings.default_time_signature),
    )
}

/// Decode document, and give the result to the `builder`.
pub fn decode_with(
    document: &Document,
    settings: CodecSettings,
    builder: &impl MeasureBuilder,
) -> VmfResult<Score> {
    let skeleton = Decoder::new(settings).decode(document)?;
    Ok(builder.build_measures(skeleton)?)
}
