//! Converts between score articulations and VMF articulation codes.
//!
//! Codes 1 and 2 are never used: they would collide with attack and
//! sustain states of the frame.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{NotationError, NotationResult};

/// Code of a frame without articulation.
pub const NO_ARTICULATION: i32 = 0;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Articulation {
    Staccato,
    Staccatissimo,
    StrongAccent,
    Accent,
    Tenuto,
    Spiccato,
    Stress,
    Unstress,
    DetachedLegato,
    Other(String),
}
impl Display for Articulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Staccato => write!(f, "staccato"),
            Self::Staccatissimo => write!(f, "staccatissimo"),
            Self::StrongAccent => write!(f, "strong-accent"),
            Self::Accent => write!(f, "accent"),
            Self::Tenuto => write!(f, "tenuto"),
            Self::Spiccato => write!(f, "spiccato"),
            Self::Stress => write!(f, "stress"),
            Self::Unstress => write!(f, "unstress"),
            Self::DetachedLegato => write!(f, "detached-legato"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}
/// Converts an articulation to a VMF articulation code.
pub fn articulation_to_vmf(articulation: &Articulation) -> NotationResult<i32> {
    match articulation {
        Articulation::Staccato => Ok(3),
        Articulation::Staccatissimo => Ok(4),
        Articulation::StrongAccent => Ok(5),
        Articulation::Accent => Ok(6),
        Articulation::Tenuto => Ok(7),
        x => Err(NotationError::UnsupportedArticulation(x.to_string())),
    }
}

/// Converts a VMF code to an articulation.
///
/// # Returns
/// - None for [NO_ARTICULATION]
/// - Articulation for known codes
/// - Err for anything else.
///
/// # Example
/// ```
/// # use vmf_codec::notation::{vmf_to_articulation, Articulation};
/// assert_eq!(vmf_to_articulation(0), Ok(None));
/// assert_eq!(vmf_to_articulation(7), Ok(Some(Articulation::Tenuto)));
/// assert!(vmf_to_articulation(1).is_err());
/// ```
pub fn vmf_to_articulation(code: i32) -> NotationResult<Option<Articulation>> {
    match code {
        NO_ARTICULATION => Ok(None),
        3 => Ok(Some(Articulation::Staccato)),
        4 => Ok(Some(Articulation::Staccatissimo)),
        5 => Ok(Some(Articulation::StrongAccent)),
        6 => Ok(Some(Articulation::Accent)),
        7 => Ok(Some(Articulation::Tenuto)),
        x => Err(NotationError::UnsupportedArticulation(format!(
            "code {}",
            x
        ))),
    }
}
