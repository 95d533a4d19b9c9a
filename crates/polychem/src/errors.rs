use miette::Diagnostic;
use thiserror::Error;

use crate::{atoms::errors::AtomicLookupError, parsers::errors::CompositionError};

pub type Result<T, E = Box<PolychemError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum PolychemError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Composition {
        #[from]
        error: CompositionError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup {
        #[from]
        error: AtomicLookupError,
    },
}
