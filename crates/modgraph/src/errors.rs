use miette::Diagnostic;
use polychem::PolychemError;
use thiserror::Error;

use crate::CombinationIndex;

pub type Result<T, E = Box<ModgraphError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum ModgraphError {
    #[diagnostic(help(
        "double-check the sequence for non-standard characters, or add {0:?} to the residues section of the \
        chemistry database"
    ))]
    #[error("the residue {0:?} could not be found in the supplied chemistry database")]
    InvalidResidue(char),

    #[diagnostic(help("double-check for typos, or add a new entry to the chemistry database"))]
    #[error("the modification {0:?} could not be found in the supplied chemistry database")]
    UnknownModification(String),

    #[diagnostic(help("a modification must be either fixed or variable, so remove one of the two"))]
    #[error("the modification {0:?} was marked as both fixed and variable")]
    ConflictingModification(String),

    #[diagnostic(help(
        "valid locations are: everywhere, peptide-n-term, peptide-c-term, protein-n-term, and protein-c-term"
    ))]
    #[error("{0:?} is not a valid modification location")]
    UnknownLocation(String),

    #[diagnostic(help("sinks must be chosen from the combinations present in the final layer of the graph"))]
    #[error("no node in the final layer of the graph carries the combination {0}")]
    UnreachableSink(CombinationIndex),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Polychem(#[from] Box<PolychemError>),
}
