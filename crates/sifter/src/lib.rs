//! Scoring peptide fragmentations against centroided MS2 peaks

mod fragment_ion;
mod ion_scorer;
mod ordered_floats;
mod peaks;
mod ppm_window;

// Standard Library Imports
use std::collections::BTreeSet;

// External Crate Imports
use derive_more::{Constructor, Display};

// Local Crate Imports
use crate::ordered_floats::Mz;

pub use ion_scorer::PROTON_MASS;
pub use ppm_window::PpmWindow;

// Public API ==========================================================================================================

/// A set of observed fragment m/z values
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Peaks(BTreeSet<Mz>);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum IonKind {
    #[display("b")]
    B,
    #[display("y")]
    Y,
}

/// A singly-protonated fragment ion
#[derive(Copy, Clone, PartialEq, Debug, Constructor)]
pub struct FragmentIon {
    kind: IonKind,
    mz: f64,
}

/// Counts how many of a split's b and y ions can be found among a set of [`Peaks`]
#[derive(Copy, Clone, Debug)]
pub struct IonScorer<'p> {
    peaks: &'p Peaks,
    ppm_tolerance: f64,
    water_mass: f64,
}
