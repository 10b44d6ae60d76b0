//! Notation engine: the thing, that reads and writes scores in formats
//! other than VMF.
//!
//! The codec itself never touches MIDI or MusicXML. [JsonEngine] is the
//! only engine shipped here: it stores [Score] as is, with serde.
use super::Score;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Format is not supported by {engine} engine: {format}")]
    UnsupportedFormat { engine: String, format: String },
    #[error("Can not read score: {0}")]
    Parse(String),
    #[error("Can not write score: {0}")]
    Render(String),
    #[error("Can not build measures: {0}")]
    Measures(String),
}

pub trait NotationEngine {
    /// Name, used in messages.
    fn name(&self) -> &str;
    /// Formats (file extensions without dot), engine can parse and render.
    fn formats(&self) -> &[&str];
    fn parse(&self, bytes: &[u8]) -> Result<Score, EngineError>;
    fn render(&self, score: &Score, format: &str) -> Result<Vec<u8>, EngineError>;

    fn supports(&self, format: &str) -> bool {
        let format = format.trim_start_matches('.').to_lowercase();
        self.formats().iter().any(|f| *f == format)
    }
}

/// Reads and writes the score DOM as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEngine {
    pub pretty: bool,
}
impl JsonEngine {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}
impl NotationEngine for JsonEngine {
    fn name(&self) -> &str {
        "json"
    }
    fn formats(&self) -> &[&str] {
        &["json"]
    }
    fn parse(&self, bytes: &[u8]) -> Result<Score, EngineError> {
        serde_json::from_slice(bytes).map_err(|e| EngineError::Parse(e.to_string()))
    }
    fn render(&self, score: &Score, format: &str) -> Result<Vec<u8>, EngineError> {
        if !self.supports(format) {
            return Err(EngineError::UnsupportedFormat {
                engine: self.name().to_string(),
                format: format.to_string(),
            });
        }
        let result = match self.pretty {
            true => serde_json::to_vec_pretty(score),
            false => serde_json::to_vec(score),
        };
        result.map_err(|e| EngineError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineError, JsonEngine, NotationEngine};
    use crate::{
        dom::{Part, Score},
        primitives::{
            EventInfo, KeySignature, Length, Pitch, Tie, TimeSignature,
        },
    };

    #[test]
    fn json_score() {
        let score = Score::new(vec![Part::from_events([
            EventInfo::note(Pitch::from_midi(60), Length::from(1.0))
                .with_tie(Tie::Start),
            EventInfo::note(Pitch::from_midi(60), Length::from(0.5))
                .with_tie(Tie::Stop),
            EventInfo::rest(Length::from(0.5)),
        ])
        .with_name("Flute")])
        .with_time_signature(Length::zero(), TimeSignature::new(2, 4))
        .with_key_signature(Length::zero(), KeySignature::new(2));
        let engine = JsonEngine::new(true);
        let bytes = engine.render(&score, "json").unwrap();
        assert_eq!(engine.parse(&bytes).unwrap(), score);
        assert!(matches!(
            engine.render(&score, "mid"),
            Err(EngineError::UnsupportedFormat { .. })
        ));
        assert!(engine.supports(".JSON"));
        assert!(matches!(engine.parse(b"{"), Err(EngineError::Parse(_))));
    }
}
