//! Elements, from which the score DOM is constructed.
//!
//! Every event is held by a Voice, and knows only its length.
//! Position of event is the sum of lengths of all previous events
//! in the same voice, so voices are always contiguous.

pub mod event;
pub mod fraction_tools;
pub mod length;
pub mod pitch;
pub mod time_map;

pub use event::{Chord, EventInfo, EventType, Note, Tie, DEFAULT_VELOCITY};
pub use fraction_tools::{
    fraction_gcd, limit_denominator, parse_rational, to_f64,
};
pub(crate) use fraction_tools::{
    as_integer, format_offset, format_rational, snap_to_integer,
};
pub use length::Length;
pub use pitch::Pitch;
pub use time_map::{KeySignature, TimeLine, TimeLineEntry, TimeSignature};

/// Denominator limit for lengths, converted from floats.
pub static LIMIT_DENOMINATOR: u64 = 128;
