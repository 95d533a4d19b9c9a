// Standard Library Imports
use std::ops::RangeInclusive;

// Public API ==========================================================================================================

/// Builds the inclusive range of values within `ppm` parts-per-million of `mz`
pub trait PpmWindow: Sized {
    fn ppm_window(mz: f64, ppm: f64) -> RangeInclusive<Self>;
}
