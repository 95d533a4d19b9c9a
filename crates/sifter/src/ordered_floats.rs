// Standard Library Imports
use std::ops::RangeInclusive;

// External Crate Imports
use ordered_float::OrderedFloat;
use polychem::ppm_bounds;

// Local Crate Imports
use crate::ppm_window::PpmWindow;

// Public API ==========================================================================================================

// PERF: Try out `f32` and see if that saves enough space to speed things up!
pub type Mz = OrderedFloat<f64>;

impl PpmWindow for Mz {
    fn ppm_window(mz: f64, ppm: f64) -> RangeInclusive<Self> {
        let (min_mz, max_mz) = ppm_bounds(mz, ppm);
        Self(min_mz)..=Self(max_mz)
    }
}

// Module Tests ========================================================================================================
