//! Analysis pass: everything encoder has to know about the score
//! before writing the first frame.
use fraction::Fraction;

use super::{VmfError, VmfResult};
use crate::{
    dom::Score,
    primitives::{fraction_gcd, EventType},
};

/// The largest quantum, that divides every event length of the score.
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use vmf_codec::dom::{Part, Score};
/// # use vmf_codec::primitives::{EventInfo, Length, Pitch};
/// # use vmf_codec::vmf::scan::tick_value;
/// let c4 = Pitch::from_midi(60);
/// let score = Score::new(vec![Part::from_events([
///     EventInfo::note(c4, Length::from(1.0)),
///     EventInfo::note(c4, Length::from(0.5)),
///     EventInfo::note(c4, Length::from(1.5)),
/// ])]);
/// assert_eq!(tick_value(&score).unwrap(), Fraction::new(1u64, 2u64));
/// ```
pub fn tick_value(score: &Score) -> VmfResult<Fraction> {
    let mut tick: Option<Fraction> = None;
    for event in score.events() {
        let length = event.length.get();
        if event.length.is_zero() {
            continue;
        }
        tick = match tick {
            None => Some(length),
            Some(tick) => Some(
                fraction_gcd(tick, length)
                    .ok_or_else(|| VmfError::unquantizable(length, tick))?,
            ),
        };
    }
    let tick = tick.ok_or(VmfError::EmptyScore)?;
    log::debug!("tick value: {}", tick);
    Ok(tick)
}

/// The widest chord of the score. Single note has width 1.
pub fn largest_chord_width(score: &Score) -> usize {
    score
        .events()
        .map(|event| match &event.event {
            EventType::Rest => 0,
            EventType::Note(_) => 1,
            EventType::Chord(chord) => chord.width(),
        })
        .max()
        .unwrap_or(0)
}

/// Count of concurrent voices in every part.
pub fn voices_per_part(score: &Score) -> Vec<usize> {
    score.parts.iter().map(|part| part.voices_count()).collect()
}

/// Count of streams after flattening.
pub fn number_of_voices(score: &Score) -> usize {
    voices_per_part(score).iter().sum()
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use super::{largest_chord_width, number_of_voices, tick_value, voices_per_part};
    use crate::{
        dom::{Measure, Part, Score, Voice},
        primitives::{EventInfo, Length, Pitch},
        vmf::VmfError,
    };

    fn c4() -> Pitch {
        Pitch::from_midi(60)
    }

    #[test]
    fn tick() {
        let score = Score::new(vec![
            Part::from_events([
                EventInfo::note(c4(), Length::from(Fraction::new(1u64, 3u64))),
                EventInfo::rest(Length::from(1.0)),
            ]),
            Part::from_events([EventInfo::note(c4(), Length::from(0.5))]),
        ]);
        assert_eq!(tick_value(&score).unwrap(), Fraction::new(1u64, 6u64));

        let score = Score::new(vec![Part::from_events([EventInfo::rest(
            Length::from(4.0),
        )])]);
        assert_eq!(tick_value(&score).unwrap(), Fraction::new(4u64, 1u64));
    }

    #[test]
    fn empty() {
        assert!(matches!(
            tick_value(&Score::default()),
            Err(VmfError::EmptyScore)
        ));
        let score = Score::new(vec![Part::new(vec![])]);
        assert!(matches!(tick_value(&score), Err(VmfError::EmptyScore)));
    }

    #[test]
    fn chord_width() {
        let score = Score::new(vec![
            Part::from_events([
                EventInfo::note(c4(), Length::from(1.0)),
                EventInfo::chord(
                    [Pitch::from_midi(60), Pitch::from_midi(64), Pitch::from_midi(67)],
                    Length::from(1.0),
                ),
            ]),
            Part::from_events([EventInfo::chord(
                [Pitch::from_midi(48), Pitch::from_midi(55)],
                Length::from(2.0),
            )]),
        ]);
        assert_eq!(largest_chord_width(&score), 3);

        let notes = Score::new(vec![Part::from_events([EventInfo::note(
            c4(),
            Length::from(1.0),
        )])]);
        assert_eq!(largest_chord_width(&notes), 1);
        let rests = Score::new(vec![Part::from_events([EventInfo::rest(
            Length::from(1.0),
        )])]);
        assert_eq!(largest_chord_width(&rests), 0);
    }

    #[test]
    fn voices() {
        let score = Score::new(vec![
            Part::new(vec![
                Measure::new(vec![Voice::default()]),
                Measure::new(vec![Voice::default(); 3]),
            ]),
            Part::from_events(Vec::<EventInfo>::new()),
            Part::new(vec![]),
        ]);
        assert_eq!(voices_per_part(&score), vec![3, 1, 1]);
        assert_eq!(number_of_voices(&score), 5);
    }
}
