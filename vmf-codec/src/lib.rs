//! Bidirectional codec between musical score and VMF
//! ("vector music format").
//!
//! - [dom] holds the score model, the notation engine interface and
//!   the measure builder.
//! - [notation] converts dynamics and articulations to VMF codes.
//! - [primitives] are lengths, pitches, events and timelines.
//! - [vmf] is the codec itself.
pub mod dom;
pub mod notation;
pub mod primitives;
pub mod vmf;

pub use dom::{Part, Score};
pub use vmf::{decode, encode, CodecSettings, Document, VmfError};
