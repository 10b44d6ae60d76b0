use serde::{Deserialize, Serialize};

/// Pitch as pitch-class (C = 0 … B = 11) and octave (middle C is C4).
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Serialize,
    Deserialize,
)]
pub struct Pitch {
    pitch_class: u8,
    octave: i8,
}
impl Pitch {
    /// Pitch-class is wrapped into 0..12.
    pub fn new(pitch_class: u8, octave: i8) -> Self {
        Self {
            pitch_class: pitch_class % 12,
            octave,
        }
    }
    /// # Example
    /// ```
    /// # use vmf_codec::primitives::Pitch;
    /// let c4 = Pitch::from_midi(60);
    /// assert_eq!((c4.pitch_class(), c4.octave()), (0, 4));
    /// assert_eq!(Pitch::from_midi(61 + 12).midi(), 73);
    /// ```
    pub fn from_midi(midi: u8) -> Self {
        Self {
            pitch_class: midi % 12,
            octave: (midi / 12) as i8 - 1,
        }
    }
    pub fn pitch_class(&self) -> u8 {
        self.pitch_class
    }
    pub fn octave(&self) -> i8 {
        self.octave
    }
    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch_class as i32
    }
}
