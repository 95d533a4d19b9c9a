//! Modification-aware sequence graphs: enumerating, scoring, and localising variable modifications on peptides

pub mod catalog;
pub mod combinations;
pub mod database;
pub mod errors;
pub mod graph;
mod location;
pub mod scorer;
pub mod search;
pub mod settings;

#[cfg(test)]
mod testing_tools;

// External Crate Imports
use derive_more::{Display, From, Into};
use polychem::ChemicalComposition;

pub use catalog::{LocatedResidue, ModificationCatalog};
pub use combinations::{CombinationSpace, ModificationCombination};
pub use database::ChemistryDatabase;
pub use errors::{ModgraphError, Result};
pub use graph::{ModificationSite, ScoredModifications, SequenceGraph};
pub use scorer::FragmentScorer;
pub use search::{Candidate, PeptideMatch, PeptideSearch};
pub use settings::SearchSettings;

// NOTE: For the types in this crate, 'a lifetimes indicate references to the `AtomicDatabase`, whilst 'c lifetimes
// indicate references to a `ModificationCatalog`

// ---------------------------------------------------------------------------------------------------------------------

/// Where in a peptide (or the protein it was cut from) a modification may land, or where a residue sits
///
/// When used to describe a residue's position, `Everywhere` means "somewhere in the middle of the peptide".
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Display)]
pub enum Location {
    #[default]
    #[display("everywhere")]
    Everywhere,
    #[display("peptide-n-term")]
    PeptideNTerm,
    #[display("peptide-c-term")]
    PeptideCTerm,
    #[display("protein-n-term")]
    ProteinNTerm,
    #[display("protein-c-term")]
    ProteinCTerm,
}

/// Whether the peptide's ends coincide with the ends of its parent protein
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Termini {
    pub protein_n_term: bool,
    pub protein_c_term: bool,
}

/// The order in which residues are fed into a `SequenceGraph`
///
/// A `Forward` graph grows from the N-terminus, so node compositions are prefixes (b-ion side). A `Reverse` graph grows
/// from the C-terminus, so node compositions are suffixes (y-ion side).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Into)]
pub struct ModificationId(u32);

/// An opaque handle to a distinct multiset of variable modifications; only meaningful within one `CombinationSpace`
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct CombinationIndex(u32);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum ModificationKind {
    #[display("fixed")]
    Fixed,
    #[display("variable")]
    Variable,
}

/// A residue (or any residue, when `residue` is `None`) at a given location
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Target {
    pub residue: Option<char>,
    pub location: Location,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Modification<'a> {
    pub id: ModificationId,
    pub name: String,
    pub description: String,
    pub delta: ChemicalComposition<'a>,
    pub kind: ModificationKind,
    pub targets: Vec<Target>,
}
