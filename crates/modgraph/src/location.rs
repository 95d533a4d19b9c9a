// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

// Local Crate Imports
use crate::{Location, ModgraphError, Target, Termini};

// Public API ==========================================================================================================

impl Location {
    /// Every location a residue can occupy, in the order catalogs enumerate them
    pub const ALL: [Self; 5] = [
        Self::Everywhere,
        Self::PeptideNTerm,
        Self::PeptideCTerm,
        Self::ProteinNTerm,
        Self::ProteinCTerm,
    ];

    /// Tags the residue at `index` of a `length`-residue peptide
    ///
    /// A single-residue peptide is tagged with its N-terminal location.
    #[must_use]
    pub const fn of_position(index: usize, length: usize, termini: Termini) -> Self {
        if index == 0 {
            if termini.protein_n_term {
                Self::ProteinNTerm
            } else {
                Self::PeptideNTerm
            }
        } else if index + 1 == length {
            if termini.protein_c_term {
                Self::ProteinCTerm
            } else {
                Self::PeptideCTerm
            }
        } else {
            Self::Everywhere
        }
    }

    /// Checks if a residue at `position` meets this location constraint
    ///
    /// Protein termini are also peptide termini, but not the other way around.
    #[must_use]
    pub const fn is_satisfied_by(self, position: Self) -> bool {
        matches!(
            (self, position),
            (Self::Everywhere, _)
                | (Self::PeptideNTerm, Self::PeptideNTerm | Self::ProteinNTerm)
                | (Self::PeptideCTerm, Self::PeptideCTerm | Self::ProteinCTerm)
                | (Self::ProteinNTerm, Self::ProteinNTerm)
                | (Self::ProteinCTerm, Self::ProteinCTerm)
        )
    }
}

impl FromStr for Location {
    type Err = ModgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.to_string() == s)
            .ok_or_else(|| ModgraphError::UnknownLocation(s.to_owned()))
    }
}

impl Target {
    #[must_use]
    pub fn matches(&self, residue: char, position: Location) -> bool {
        self.residue.is_none_or(|r| r == residue) && self.location.is_satisfied_by(position)
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let residue = self.residue.unwrap_or('*');
        write!(f, "{residue:?} at {}", self.location)
    }
}

// Module Tests ========================================================================================================
