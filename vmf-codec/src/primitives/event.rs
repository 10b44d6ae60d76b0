//! A smallest piece of music, that is held by Voice.
use serde::{Deserialize, Serialize};

use crate::notation::Articulation;

use super::{Length, Pitch};

/// Velocity, given to events which came without one.
pub const DEFAULT_VELOCITY: u8 = 64;

/// Can be considered as "Generic" Event.
///
/// EventInfo is more about length, while
/// EventType responds for Event-representation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    pub length: Length,
    pub event: EventType,
}
impl EventInfo {
    pub fn new(length: Length, event: EventType) -> Self {
        Self { length, event }
    }
    pub fn rest(length: Length) -> Self {
        Self::new(length, EventType::Rest)
    }
    pub fn note(pitch: Pitch, length: Length) -> Self {
        Self::new(length, EventType::Note(Note::new(pitch)))
    }
    pub fn chord(pitches: impl IntoIterator<Item = Pitch>, length: Length) -> Self {
        Self::new(length, EventType::Chord(Chord::new(pitches)))
    }

    pub fn with_tie(mut self, tie: Tie) -> Self {
        self.event.set_tie(tie);
        self
    }
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        match &mut self.event {
            EventType::Note(note) => note.velocity = velocity,
            EventType::Chord(chord) => chord.velocity = velocity,
            EventType::Rest => (),
        }
        self
    }
    pub fn with_articulation(mut self, articulation: Articulation) -> Self {
        match &mut self.event {
            EventType::Note(note) => note.articulations.push(articulation),
            EventType::Chord(chord) => {
                chord.articulations.push(articulation)
            }
            EventType::Rest => (),
        }
        self
    }

    pub fn set_length(&mut self, length: Length) -> &mut Self {
        self.length = length;
        self
    }

    /// Split event, truncate length and return new "head" event,
    /// of given length. Sounding events become tied over the cut.
    ///
    /// # Example
    /// ```
    /// # use vmf_codec::primitives::{EventInfo, Length, Pitch, Tie};
    /// # use fraction::Fraction;
    /// let _3_4 = Fraction::new(3u64, 4u64);
    /// let _1_4 = Fraction::new(1u64, 4u64);
    /// let mut ev1 = EventInfo::note(Pitch::from_midi(60), Length::from(_3_4));
    /// let head = ev1.cut_head(Length::from(_1_4)).unwrap();
    /// assert_eq!(ev1.length, Length::from(Fraction::new(1u64, 2u64)));
    /// assert_eq!(ev1.event.tie(), Tie::Start);
    /// assert_eq!(head.length, Length::from(_1_4));
    /// assert_eq!(head.event.tie(), Tie::Stop);
    /// ```
    pub fn cut_head(&mut self, head_length: Length) -> Result<Self, String> {
        let rest_length = self
            .length
            .checked_sub(head_length)
            .filter(|l| !l.is_zero())
            .ok_or(format!(
                "Trying to cut head not shorter, than body: head: {}, body: {}",
                head_length, self.length
            ))?;
        let tie = self.event.tie();
        let mut head = self.clone();
        head.set_length(head_length);
        head.event.set_tie(Tie::from_links(true, tie.is_outgoing()));
        self.set_length(rest_length);
        self.event.set_tie(Tie::from_links(tie.is_incoming(), true));
        Ok(head)
    }
}

/// Various types of events with concrete realizations
/// as variant args.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Rest,
    Note(Note),
    Chord(Chord),
}
impl EventType {
    pub fn is_rest(&self) -> bool {
        matches!(self, Self::Rest)
    }
    /// Sounding pitches in stable order. Empty for rest.
    pub fn pitches(&self) -> &[Pitch] {
        match self {
            Self::Rest => &[],
            Self::Note(note) => std::slice::from_ref(&note.pitch),
            Self::Chord(chord) => &chord.pitches,
        }
    }
    pub fn tie(&self) -> Tie {
        match self {
            Self::Rest => Tie::None,
            Self::Note(note) => note.tie,
            Self::Chord(chord) => chord.tie,
        }
    }
    /// Rests can not be tied, so nothing happens for them.
    pub fn set_tie(&mut self, tie: Tie) {
        match self {
            Self::Rest => (),
            Self::Note(note) => note.tie = tie,
            Self::Chord(chord) => chord.tie = tie,
        }
    }
    pub fn velocity(&self) -> Option<u8> {
        match self {
            Self::Rest => None,
            Self::Note(note) => Some(note.velocity),
            Self::Chord(chord) => Some(chord.velocity),
        }
    }
    pub fn articulations(&self) -> &[Articulation] {
        match self {
            Self::Rest => &[],
            Self::Note(note) => &note.articulations,
            Self::Chord(chord) => &chord.articulations,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    #[serde(default)]
    pub tie: Tie,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub articulations: Vec<Articulation>,
}
impl Note {
    pub fn new(pitch: Pitch) -> Self {
        Self {
            pitch,
            tie: Tie::None,
            velocity: DEFAULT_VELOCITY,
            articulations: Vec::new(),
        }
    }
}

/// Pitches are kept in the order they were given.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Chord {
    pub pitches: Vec<Pitch>,
    #[serde(default)]
    pub tie: Tie,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub articulations: Vec<Articulation>,
}
impl Chord {
    pub fn new(pitches: impl IntoIterator<Item = Pitch>) -> Self {
        Self {
            pitches: pitches.into_iter().collect(),
            tie: Tie::None,
            velocity: DEFAULT_VELOCITY,
            articulations: Vec::new(),
        }
    }
    pub fn width(&self) -> usize {
        self.pitches.len()
    }
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

/// Tie state of note or chord.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tie {
    #[default]
    None,
    /// Tied to the next event.
    Start,
    /// Tied from the previous event.
    Stop,
    /// Tied from the previous and to the next event.
    Continue,
}
impl Tie {
    pub fn from_links(incoming: bool, outgoing: bool) -> Self {
        match (incoming, outgoing) {
            (false, false) => Self::None,
            (false, true) => Self::Start,
            (true, false) => Self::Stop,
            (true, true) => Self::Continue,
        }
    }
    /// Event continues sound of the previous one.
    pub fn is_incoming(&self) -> bool {
        matches!(self, Self::Stop | Self::Continue)
    }
    /// Event sound is continued by the next one.
    pub fn is_outgoing(&self) -> bool {
        matches!(self, Self::Start | Self::Continue)
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use super::{EventInfo, Tie};
    use crate::primitives::{Length, Pitch};

    #[test]
    fn cut_tied_chain() {
        let quarter = Length::from(Fraction::new(1u64, 1u64));
        let mut ev = EventInfo::note(Pitch::from_midi(67), Length::from(3.0))
            .with_tie(Tie::Stop);
        let head = ev.cut_head(quarter).unwrap();
        assert_eq!(ev.event.tie(), Tie::Continue);
        assert_eq!(head.event.tie(), Tie::Stop);

        let mut rest = EventInfo::rest(Length::from(2.0));
        let head = rest.cut_head(quarter).unwrap();
        assert_eq!(rest.event.tie(), Tie::None);
        assert_eq!(head, EventInfo::rest(quarter));
        assert!(rest.cut_head(quarter).is_err());
    }

    #[test]
    fn event_serde() {
        let ev = EventInfo::chord(
            [Pitch::from_midi(60), Pitch::from_midi(64)],
            Length::from(0.5),
        )
        .with_tie(Tie::Start);
        let json = serde_json::to_string(&ev).unwrap();
        assert_eq!(serde_json::from_str::<EventInfo>(&json).unwrap(), ev);
        let rest: EventInfo =
            serde_json::from_str(r#"{"length": "3/2", "event": "rest"}"#)
                .unwrap();
        assert_eq!(rest, EventInfo::rest(Length::from(1.5)));
    }
}
