//! Symbolic notations, carried by VMF frames as small integer codes.

pub mod articulation;
pub mod dynamics;

pub use articulation::{
    articulation_to_vmf, vmf_to_articulation, Articulation, NO_ARTICULATION,
};
pub use dynamics::{velocity_to_vmf, vmf_to_velocity, Dynamic};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum NotationError {
    #[error("Dynamic out of range: {0}")]
    DynamicOutOfRange(i32),
    #[error("Articulation is not supported: {0}")]
    UnsupportedArticulation(String),
}
pub type NotationResult<T> = Result<T, NotationError>;
