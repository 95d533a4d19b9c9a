// External Crate Imports
use modgraph::{FragmentScorer, ModificationCatalog};
use polychem::{ChemicalComposition, Massive};

// Local Crate Imports
use crate::{FragmentIon, IonKind, IonScorer, Peaks};

// Public API ==========================================================================================================

pub const PROTON_MASS: f64 = 1.007_276_466_621;

impl<'p> IonScorer<'p> {
    #[must_use]
    pub fn new(catalog: &ModificationCatalog<'_>, peaks: &'p Peaks, ppm_tolerance: f64) -> Self {
        Self {
            peaks,
            ppm_tolerance,
            water_mass: catalog.water().monoisotopic_mass().to_f64(),
        }
    }

    /// The singly-charged b-ion of `prefix` and y-ion of `suffix`, skipping any empty side of the split
    #[must_use]
    pub fn fragment_ions(
        &self,
        prefix: &ChemicalComposition<'_>,
        suffix: &ChemicalComposition<'_>,
    ) -> Vec<FragmentIon> {
        let mut ions = Vec::with_capacity(2);
        if !prefix.is_empty() {
            let mz = prefix.monoisotopic_mass().to_f64() + PROTON_MASS;
            ions.push(FragmentIon::new(IonKind::B, mz));
        }
        if !suffix.is_empty() {
            let mz = suffix.monoisotopic_mass().to_f64() + self.water_mass + PROTON_MASS;
            ions.push(FragmentIon::new(IonKind::Y, mz));
        }
        ions
    }
}

impl FragmentScorer for IonScorer<'_> {
    fn score(&self, prefix: &ChemicalComposition<'_>, suffix: &ChemicalComposition<'_>) -> f64 {
        self.fragment_ions(prefix, suffix)
            .into_iter()
            .filter(|ion| self.peaks.contains_within(ion.mz(), self.ppm_tolerance))
            .map(|_| 1.0)
            .sum()
    }
}

// Module Tests ========================================================================================================
