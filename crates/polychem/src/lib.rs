//! Elemental compositions and their masses: the chemistry primitive underneath modification searches

pub mod atoms;
pub mod errors;
pub mod parsers;

// Standard Library Imports
use std::{collections::BTreeMap, num::NonZeroU32};

// External Crate Imports
use derive_more::{Add, AddAssign, Display, From, Into, Neg, Sub, SubAssign, Sum};
use rust_decimal::Decimal;

pub use atoms::{atomic_database::AtomicDatabase, ppm_bounds};
pub use errors::{PolychemError, Result};

// NOTE: For the types in this module, 'a lifetimes indicate references to the `AtomicDatabase`

// ---------------------------------------------------------------------------------------------------------------------

/// A multiset of (possibly isotopically pinned) elements with signed, non-zero counts
///
/// Counts can be negative so that the same type can describe both molecules and the deltas that modifications apply
/// to them. Elements are kept in Hill order (C, then H, then alphabetical) and elements that sum to a count of zero are
/// dropped entirely, so two compositions compare equal exactly when they describe the same formula.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ChemicalComposition<'a> {
    chemical_formula: BTreeMap<Element<'a>, i32>,
}

#[derive(Copy, Clone, Debug)]
pub struct Element<'a> {
    symbol: &'a str,
    name: &'a str,
    mass_number: Option<MassNumber>,
    isotopes: &'a BTreeMap<MassNumber, Isotope>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct MassNumber(NonZeroU32);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Isotope {
    relative_mass: Decimal,
    abundance: Option<Decimal>,
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Display,
    From,
    Into,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Neg,
    Sum,
)]
pub struct MonoisotopicMass(Decimal);

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Display,
    From,
    Into,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Neg,
    Sum,
)]
pub struct AverageMass(Decimal);

// =====================================================================================================================

pub trait Massive {
    fn monoisotopic_mass(&self) -> MonoisotopicMass;
    fn average_mass(&self) -> AverageMass;
    fn nominal_mass(&self) -> i64;
}

// Blanket impls

macro_rules! massive_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Massive> Massive for $ref_type {
                fn monoisotopic_mass(&self) -> MonoisotopicMass {
                    (**self).monoisotopic_mass()
                }

                fn average_mass(&self) -> AverageMass {
                    (**self).average_mass()
                }

                fn nominal_mass(&self) -> i64 {
                    (**self).nominal_mass()
                }
            }
        )+
    };
}

massive_ref_impls!(&T, &mut T, Box<T>);
