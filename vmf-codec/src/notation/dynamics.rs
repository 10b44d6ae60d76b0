//! Converts between velocities and VMF dynamics.
//!
//! Every dynamic owns contiguous inclusive band of velocities, and
//! decodes back to one representative velocity of that band.
use std::fmt::Display;

use super::{NotationError, NotationResult};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Dynamic {
    Pppp,
    Ppp,
    Pp,
    P,
    Mp,
    Mf,
    F,
    Ff,
    Fff,
    Ffff,
}

struct Band {
    dynamic: Dynamic,
    code: i32,
    min: i32,
    max: i32,
    velocity: u8,
}

const BANDS: [Band; 10] = [
    Band {
        dynamic: Dynamic::Pppp,
        code: -5,
        min: 0,
        max: 12,
        velocity: 10,
    },
    Band {
        dynamic: Dynamic::Ppp,
        code: -4,
        min: 13,
        max: 25,
        velocity: 23,
    },
    Band {
        dynamic: Dynamic::Pp,
        code: -3,
        min: 26,
        max: 38,
        velocity: 36,
    },
    Band {
        dynamic: Dynamic::P,
        code: -2,
        min: 39,
        max: 51,
        velocity: 49,
    },
    Band {
        dynamic: Dynamic::Mp,
        code: -1,
        min: 52,
        max: 64,
        velocity: 62,
    },
    Band {
        dynamic: Dynamic::Mf,
        code: 1,
        min: 65,
        max: 77,
        velocity: 75,
    },
    Band {
        dynamic: Dynamic::F,
        code: 2,
        min: 78,
        max: 90,
        velocity: 88,
    },
    Band {
        dynamic: Dynamic::Ff,
        code: 3,
        min: 91,
        max: 103,
        velocity: 101,
    },
    Band {
        dynamic: Dynamic::Fff,
        code: 4,
        min: 104,
        max: 116,
        velocity: 114,
    },
    Band {
        dynamic: Dynamic::Ffff,
        code: 5,
        min: 117,
        max: 127,
        velocity: 127,
    },
];

impl Dynamic {
    fn band(&self) -> &'static Band {
        &BANDS[*self as usize]
    }
    pub fn from_velocity(velocity: i32) -> NotationResult<Self> {
        BANDS
            .iter()
            .find(|b| b.min <= velocity && velocity <= b.max)
            .map(|b| b.dynamic)
            .ok_or(NotationError::DynamicOutOfRange(velocity))
    }
    pub fn from_code(code: i32) -> NotationResult<Self> {
        BANDS
            .iter()
            .find(|b| b.code == code)
            .map(|b| b.dynamic)
            .ok_or(NotationError::DynamicOutOfRange(code))
    }
    /// Value, written to VMF frame.
    pub fn code(&self) -> i32 {
        self.band().code
    }
    /// Representative velocity of the dynamic band.
    pub fn velocity(&self) -> u8 {
        self.band().velocity
    }
}
impl Display for Dynamic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pppp => "pppp",
            Self::Ppp => "ppp",
            Self::Pp => "pp",
            Self::P => "p",
            Self::Mp => "mp",
            Self::Mf => "mf",
            Self::F => "f",
            Self::Ff => "ff",
            Self::Fff => "fff",
            Self::Ffff => "ffff",
        };
        write!(f, "{}", s)
    }
}
/// Converts a midi velocity to a VMF dynamic value.
///
/// # Example
/// ```
/// # use vmf_codec::notation::{velocity_to_vmf, NotationError};
/// assert_eq!(velocity_to_vmf(66), Ok(1));
/// assert_eq!(velocity_to_vmf(150), Err(NotationError::DynamicOutOfRange(150)));
/// ```
pub fn velocity_to_vmf(velocity: i32) -> NotationResult<i32> {
    let dynamic = Dynamic::from_velocity(velocity)?;
    log::trace!("velocity {} is {}", velocity, dynamic);
    Ok(dynamic.code())
}

/// Converts a VMF dynamic value to a midi velocity.
pub fn vmf_to_velocity(code: i32) -> NotationResult<u8> {
    Ok(Dynamic::from_code(code)?.velocity())
}
