use thiserror::Error;

/// Errors raised by the scene model when the host asks for something that
/// does not exist. The web layer logs these and carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AetherError {
    #[error("unknown visual mode index {0} (expected < {})", crate::shapes::MODE_COUNT)]
    UnknownMode(usize),
    #[error("unknown palette index {0}")]
    UnknownPalette(usize),
    #[error("unknown track id {0}")]
    UnknownTrack(usize),
}

pub type Result<T> = std::result::Result<T, AetherError>;
