//! File shell around the codec: the direction is chosen by the input
//! extension, `.json` scores are encoded and `.vmf` documents decoded.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use vmf_codec::{
    dom::{BarlineMeasureBuilder, JsonEngine, NotationEngine},
    vmf::{self, CodecSettings, Document, Encoder},
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Score (.json) to encode, or VMF document (.vmf) to decode.
    pub input: PathBuf,

    /// Where to write the result. Input path with swapped extension
    /// by default.
    pub output: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[clap(short, long)]
    pub pretty: bool,

    /// Tick counts closer to integer than this are snapped to it
    #[clap(long, default_value_t = vmf::PRECISION)]
    pub precision: f64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Encode,
    Decode,
}
impl Direction {
    /// Extension of the produced file.
    pub fn target_extension(&self) -> &'static str {
        match self {
            Self::Encode => "vmf",
            Self::Decode => "json",
        }
    }
}

/// Lowercased extension with the leading dot, e.g. ".vmf".
pub fn determine_source_format(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

pub fn direction(path: &Path) -> anyhow::Result<Direction> {
    match determine_source_format(path).as_deref() {
        Some(".vmf") => Ok(Direction::Decode),
        Some(".json") => Ok(Direction::Encode),
        Some(other) => bail!("Unsupported input format: {}", other),
        None => bail!("Can not determine format of {}", path.display()),
    }
}

pub fn default_output(input: &Path, direction: Direction) -> PathBuf {
    input.with_extension(direction.target_extension())
}

/// Convert the input file and return the path of the written one.
pub fn run(args: &Args) -> anyhow::Result<PathBuf> {
    let settings = CodecSettings {
        precision: args.precision,
        ..Default::default()
    };
    let engine = JsonEngine::new(args.pretty);
    let direction = direction(&args.input)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, direction));
    if output == args.input {
        bail!("Output would overwrite input: {}", output.display());
    }

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Can not read {}", args.input.display()))?;
    let result = match direction {
        Direction::Decode => {
            let document = Document::from_slice(&bytes)
                .with_context(|| format!("Can not parse {}", args.input.display()))?;
            let score = vmf::decode_with(
                &document,
                settings,
                &BarlineMeasureBuilder::new(settings.default_time_signature),
            )?;
            engine.render(&score, direction.target_extension())?
        }
        Direction::Encode => {
            let score = engine
                .parse(&bytes)
                .with_context(|| format!("Can not parse {}", args.input.display()))?;
            Encoder::new(settings)
                .encode(&score)?
                .to_json(args.pretty)?
                .into_bytes()
        }
    };
    std::fs::write(&output, result)
        .with_context(|| format!("Can not write {}", output.display()))?;
    log::info!(
        "{:?}: {} -> {}",
        direction,
        args.input.display(),
        output.display()
    );
    Ok(output)
}
