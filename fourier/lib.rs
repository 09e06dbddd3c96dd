use thiserror::Error;

pub mod export;
pub mod mask;
pub mod pipeline;
pub mod transform;

pub use mask::{Mask, MaskScheme};
pub use pipeline::ReferenceTransform;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("dimension {len} along axis {axis} is not a power of two")]
    NonPowerOfTwo { axis: usize, len: usize },

    #[error("mask shape {mask:?} does not match spectrum shape {spectrum:?}")]
    MaskMismatch {
        mask: (usize, usize),
        spectrum: (usize, usize),
    },
}
