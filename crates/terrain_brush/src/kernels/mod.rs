//! Built-in brush kernels.
//!
//! One module per kernel family. Strength means something different to each
//! brush (a world-unit delta, a blend factor, a step size, a noise
//! amplitude) — that mirrors how each operation is naturally parameterized
//! and is part of the brush contract, not something to normalize away.

mod delta;
mod flatten;
mod morph;
mod noise;
mod sharpen;
mod smooth;
mod terrace;

pub use delta::DeltaBrush;
pub use flatten::FlattenBrush;
pub use morph::MorphBrush;
pub use noise::NoiseBrush;
pub use sharpen::SharpenBrush;
pub use smooth::SmoothBrush;
pub use terrace::TerraceBrush;
