use std::collections::BTreeMap;

use miette::Diagnostic;
use thiserror::Error;

use crate::{Isotope, MassNumber};

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum AtomicLookupError {
    #[diagnostic(help("double-check for typos, or add a new entry to the atomic database"))]
    #[error("the element {0:?} could not be found in the supplied atomic database")]
    Element(String),

    #[diagnostic(help("double-check for typos, or add a new entry to the atomic database"))]
    #[error(
        "the isotope \"{0}-{1}\" could not be found in the supplied atomic database, though the following {2} \
        isotopes were found: {3}"
    )]
    Isotope(String, MassNumber, String, String),

    #[diagnostic(help(
        "consider explicitly selecting the isotope to be used in mass calculations, e.g. [{2}{1}]"
    ))]
    #[error("no natural abundance data could be found for {0} ({1}), though the following isotopes were found: {3}")]
    Abundance(String, String, MassNumber, String),
}

impl AtomicLookupError {
    pub(crate) fn element(symbol: &str) -> Self {
        Self::Element(symbol.to_owned())
    }

    pub(crate) fn isotope(
        symbol: &str,
        mass_number: MassNumber,
        name: &str,
        isotopes: &BTreeMap<MassNumber, Isotope>,
    ) -> Self {
        Self::Isotope(
            symbol.to_owned(),
            mass_number,
            name.to_owned(),
            Self::display_vec(isotopes.keys()),
        )
    }

    // NOTE: `isotopes` must be non-empty, which the `AtomicDatabase` validation guarantees for every element
    pub(crate) fn abundance(
        symbol: &str,
        name: &str,
        lightest: MassNumber,
        isotopes: &BTreeMap<MassNumber, Isotope>,
    ) -> Self {
        Self::Abundance(
            name.to_owned(),
            symbol.to_owned(),
            lightest,
            Self::display_vec(isotopes.keys()),
        )
    }

    fn display_vec<I: ToString>(items: impl IntoIterator<Item = I>) -> String {
        let items: Vec<_> = items.into_iter().map(|i| i.to_string()).collect();
        format!("[{}]", items.join(", "))
    }
}
