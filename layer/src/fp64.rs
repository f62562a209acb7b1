//! High/low decomposition of double-precision map coordinates.
//!
//! Geographic coordinates at planetary scale do not fit an f32 without
//! visible jitter. Each coordinate is carried into the single-precision
//! pipeline as a rounded high part plus the rounding residual, so the
//! consuming stage can reconstruct it to beyond single-precision accuracy.

/// Splits a double so that `high + low` reconstructs it beyond f32 accuracy.
pub fn split(v: f64) -> (f32, f32) {
    (v as f32, low_part(v))
}

/// The low-order correction term: the residual left after rounding to f32.
///
/// Exactly representable inputs yield exactly `0.0`, never near-zero noise.
pub fn low_part(v: f64) -> f32 {
    (v - v as f32 as f64) as f32
}

/// Whether position attributes carry per-instance correction terms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PrecisionMode {
    /// Positions are plain f32; the low-part buffers collapse to a single
    /// shared zero element that is uploaded once, not per instance.
    #[default]
    Single,
    /// Positions carry a per-instance low-order correction term.
    Double,
}
