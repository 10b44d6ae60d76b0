use fraction::Fraction;
use itertools::Itertools;
use vmf_codec::{
    dom::{BarlineMeasureBuilder, Measure, Part, Score, Voice},
    notation::Articulation,
    primitives::{
        EventInfo, KeySignature, Length, Pitch, Tie, TimeSignature,
    },
    vmf::{self, CodecSettings, Document},
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Velocity, that survives the round trip: representative of `mp`.
const MP: u8 = 62;

fn note(midi: u8, length: f64) -> EventInfo {
    EventInfo::note(Pitch::from_midi(midi), Length::from(length))
        .with_velocity(MP)
}

fn chord(midi: &[u8], length: f64) -> EventInfo {
    EventInfo::chord(
        midi.iter().map(|m| Pitch::from_midi(*m)),
        Length::from(length),
    )
    .with_velocity(MP)
}

fn rest(length: f64) -> EventInfo {
    EventInfo::rest(Length::from(length))
}

fn with_meter(score: Score, ts: TimeSignature) -> Score {
    score
        .with_time_signature(Length::zero(), ts)
        .with_key_signature(Length::zero(), KeySignature::default())
}

fn round_trip(score: &Score) -> Score {
    let document = vmf::encode(score).expect("Can not encode");
    let json = document.to_json(false).expect("Can not serialize");
    let document = Document::from_json(&json).expect("Can not deserialize");
    vmf::decode(&document).expect("Can not decode")
}

#[test]
fn one_part_three_voices() {
    init_logger();
    let score = with_meter(
        Score::new(vec![Part::new(vec![Measure::new(vec![
            Voice::new([note(72, 1.0), note(74, 1.0), note(76, 1.0), note(77, 1.0)]),
            Voice::new([note(64, 2.0), note(67, 2.0)]),
            Voice::new([chord(&[48, 55], 4.0)]),
        ])])]),
        TimeSignature::new(4, 4),
    );
    let document = vmf::encode(&score).unwrap();
    assert_eq!(document.header.number_of_parts, 1);
    assert_eq!(document.header.number_of_voices, 3);
    assert_eq!(document.header.tick_value, "1");
    assert!(document.body.iter().flatten().all(|f| f.len() == 8));

    let decoded = round_trip(&score);
    assert_eq!(decoded.parts.len(), 1);
    assert_eq!(decoded.parts[0].voices_count(), 3);
    decoded.parts[0]
        .measures
        .iter()
        .zip_eq(score.parts[0].measures.iter())
        .map(|(a, b)| assert_eq!(a, b))
        .count();
}

#[test]
fn tied_chain_becomes_one_note() {
    init_logger();
    let score = with_meter(
        Score::new(vec![Part::from_events([
            note(67, 1.0).with_tie(Tie::Start),
            note(67, 0.5).with_tie(Tie::Continue),
            note(67, 0.5).with_tie(Tie::Stop),
            note(67, 1.0),
            rest(1.0),
        ])]),
        TimeSignature::new(4, 4),
    );
    let decoded = round_trip(&score);
    let events = decoded.parts[0].events().cloned().collect::<Vec<_>>();
    events
        .into_iter()
        .zip_eq([note(67, 2.0), note(67, 1.0), rest(1.0)])
        .map(|(a, b)| assert_eq!(a, b))
        .count();
}

#[test]
fn tie_over_barline() {
    init_logger();
    let score = with_meter(
        Score::new(vec![Part::new(vec![
            Measure::new(vec![Voice::new([
                rest(1.0),
                chord(&[60, 64], 1.0).with_tie(Tie::Start),
            ])]),
            Measure::new(vec![Voice::new([
                chord(&[60, 64], 1.0).with_tie(Tie::Stop),
                note(62, 1.0).with_articulation(Articulation::Accent),
            ])]),
        ])]),
        TimeSignature::new(2, 4),
    );
    let document = vmf::encode(&score).unwrap();
    let states = document.column(0).map(|f| f[0]).collect::<Vec<_>>();
    assert_eq!(states, vec![0, 1, 2, 1]);
    assert_eq!(document.body[3][0][2], 6);
    assert_eq!(round_trip(&score), score);
}

#[test]
fn meter_changes() {
    init_logger();
    let score = Score::new(vec![
        Part::new(vec![
            Measure::new(vec![Voice::new([note(60, 3.0)])]),
            Measure::new(vec![Voice::new([rest(1.0), note(65, 1.0)])]),
            Measure::new(vec![Voice::new([note(67, 2.0)])]),
        ])
        .with_name("Oboe"),
        Part::new(vec![
            Measure::new(vec![Voice::new([chord(&[36, 43, 48], 3.0)])]),
            Measure::new(vec![Voice::new([rest(2.0)])]),
            Measure::new(vec![Voice::new([rest(2.0)])]),
        ]),
    ])
    .with_time_signature(Length::zero(), TimeSignature::new(3, 4))
    .with_time_signature(Length::from(3.0), TimeSignature::new(2, 4))
    .with_key_signature(Length::zero(), KeySignature::new(-1))
    .with_key_signature(Length::from(5.0), KeySignature::new(2));
    let document = vmf::encode(&score).unwrap();
    assert_eq!(document.header.time_signature["3.0"], "2/4");
    assert_eq!(document.header.key_signature["5.0"], 2);
    assert!(document.body.iter().flatten().all(|f| f.len() == 10));

    let decoded = round_trip(&score);
    assert_eq!(decoded.time_signatures, score.time_signatures);
    assert_eq!(decoded.key_signatures, score.key_signatures);
    // part names are not carried by VMF
    assert_eq!(decoded.parts[0].name, None);
    decoded
        .parts
        .iter()
        .zip_eq(score.parts.iter())
        .map(|(a, b)| assert_eq!(a.measures, b.measures))
        .count();
}

#[test]
fn triplets() {
    init_logger();
    let third = Length::from(Fraction::new(1u64, 3u64));
    let score = with_meter(
        Score::new(vec![Part::from_events([
            EventInfo::note(Pitch::from_midi(60), third).with_velocity(MP),
            EventInfo::note(Pitch::from_midi(62), third).with_velocity(MP),
            EventInfo::note(Pitch::from_midi(64), third).with_velocity(MP),
            rest(1.0),
            note(65, 2.0),
        ])]),
        TimeSignature::new(4, 4),
    );
    let document = vmf::encode(&score).unwrap();
    assert_eq!(document.header.tick_value, "1/3");
    assert_eq!(document.body.len(), 12);
    assert_eq!(round_trip(&score), score);
}

#[test]
fn streams_are_padded() {
    init_logger();
    let score = with_meter(
        Score::new(vec![
            Part::from_events([note(60, 4.0)]),
            Part::from_events([note(48, 1.0)]),
        ]),
        TimeSignature::new(4, 4),
    );
    let document = vmf::encode(&score).unwrap();
    assert_eq!(document.body.len(), 4);
    assert_eq!(document.body[3][1], vec![0, 0, 0, 0, 0, 1]);
    let decoded = round_trip(&score);
    decoded.parts[1]
        .events()
        .cloned()
        .zip_eq([note(48, 1.0), rest(3.0)])
        .map(|(a, b)| assert_eq!(a, b))
        .count();
}

#[test]
fn custom_default_meter() {
    init_logger();
    let score = Score::new(vec![Part::from_events([note(60, 3.0)])]);
    let document = vmf::encode(&score).unwrap();
    assert!(document.header.time_signature.is_empty());
    let settings = CodecSettings {
        default_time_signature: TimeSignature::new(3, 8),
        ..Default::default()
    };
    let decoded = vmf::decode_with(
        &document,
        settings,
        &BarlineMeasureBuilder::new(settings.default_time_signature),
    )
    .unwrap();
    assert_eq!(
        decoded.time_signatures.at(Length::zero()),
        Some(&TimeSignature::new(3, 8))
    );
    let ties = decoded.parts[0]
        .events()
        .map(|e| e.event.tie())
        .collect::<Vec<_>>();
    assert_eq!(ties, vec![Tie::Start, Tie::Stop]);
}
