// Local Crate Imports
use crate::{Peaks, ordered_floats::Mz, ppm_window::PpmWindow};

// Public API ==========================================================================================================

impl FromIterator<f64> for Peaks {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().map(Mz::from).collect())
    }
}

impl Peaks {
    /// Every peak within `ppm` parts-per-million of `mz`, in ascending order
    pub fn filter_peaks(&self, mz: f64, ppm: f64) -> impl Iterator<Item = f64> {
        self.0.range(Mz::ppm_window(mz, ppm)).map(|&mz| mz.into())
    }

    #[must_use]
    pub fn contains_within(&self, mz: f64, ppm: f64) -> bool {
        self.filter_peaks(mz, ppm).next().is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Module Tests ========================================================================================================
