//! Error types for light construction and shadow-map management

use thiserror::Error;

/// Configuration errors raised while building lights and rigs
///
/// None of these are transient. They describe a setup that can never render
/// correctly, so callers are expected to abort startup rather than retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LightError {
    /// The backend could not build a complete depth render target
    #[error("shadow map render target '{label}' is incomplete: {reason}")]
    IncompleteRenderTarget { label: String, reason: String },

    /// A shadow map was requested with a zero-sized resolution
    #[error("invalid shadow map resolution {width}x{height}")]
    InvalidShadowResolution { width: u32, height: u32 },

    /// Two shadowed lights in one rig claim the same array slot
    #[error("shadow index {index} is already used by another light")]
    ShadowIndexInUse { index: u32 },

    /// The shadow index does not fit the lit shader's matrix array
    #[error("shadow index {index} exceeds the shadow map capacity of {capacity}")]
    ShadowIndexOutOfRange { index: u32, capacity: u32 },

    /// The shadow index would leave an unused slot below `numShadows`
    #[error("shadow index {index} leaves a gap, the next free index is {expected}")]
    ShadowIndexNotDense { index: u32, expected: u32 },

    /// A directional or spot light was given a zero (or non-finite) direction
    #[error("{light} light needs a non-zero direction")]
    DegenerateDirection { light: &'static str },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LightError>;
