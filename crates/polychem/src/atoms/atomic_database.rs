// Standard Library Imports
use std::collections::{BTreeMap, btree_map, hash_map::Entry};

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use knuffel::{Decode, span::Span};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use rust_decimal::Decimal;
use thiserror::Error;

// Local Crate Imports
use crate::{Isotope, MassNumber};

// Public API ==========================================================================================================

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AtomicDatabase {
    pub(crate) elements: HashMap<String, ElementDescription>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct ElementDescription {
    pub(crate) name: String,
    pub(crate) isotopes: BTreeMap<MassNumber, Isotope>,
}

impl AtomicDatabase {
    pub fn new(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_db: AtomicDatabaseKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        parsed_db
            .validate()
            .map_err(|e| e.finalize(file_name, kdl_text).into())
    }

    pub fn contains(&self, symbol: impl AsRef<str>) -> bool {
        self.elements.contains_key(symbol.as_ref())
    }
}

pub const DEFAULT_KDL: &str = include_str!("../../data/atomic_database.kdl");

impl Default for AtomicDatabase {
    fn default() -> Self {
        // SAFETY: The embedded database is checked by `default_database_is_valid()` below
        Self::new("atomic_database.kdl", DEFAULT_KDL).unwrap()
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct AtomicDatabaseKdl {
    #[knuffel(child, unwrap(children))]
    elements: Vec<ElementKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ElementKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    symbol: String,
    #[knuffel(argument)]
    name: String,
    #[knuffel(children(name = "isotope", non_empty))]
    isotopes: Vec<IsotopeKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct IsotopeKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    mass_number: u32,
    #[knuffel(property(name = "mass"), str)]
    relative_mass: Decimal,
    #[knuffel(property, str)]
    abundance: Option<Decimal>,
}

// Atomic Database Validation ==========================================================================================

type AtomicResult<T> = Result<T, AtomicErrorKind>;

impl AtomicDatabaseKdl {
    fn validate(self) -> AtomicResult<AtomicDatabase> {
        let mut seen_elements: HashMap<String, (Span, ElementDescription)> = HashMap::new();

        for element in self.elements {
            let span = element.span;
            let (symbol, description) = element.validate()?;
            match seen_elements.entry(symbol) {
                Entry::Occupied(e) => {
                    let (symbol, (first_defined_at, _)) = e.remove_entry();
                    return Err(AtomicErrorKind::DuplicateElement(first_defined_at, span, symbol));
                }
                Entry::Vacant(e) => e.insert((span, description)),
            };
        }

        let elements = seen_elements
            .into_iter()
            .map(|(symbol, (_, description))| (symbol, description))
            .collect();
        Ok(AtomicDatabase { elements })
    }
}

impl ElementKdl {
    fn validate(self) -> AtomicResult<(String, ElementDescription)> {
        if !is_element_symbol(&self.symbol) {
            return Err(AtomicErrorKind::InvalidSymbol(self.span, self.symbol));
        }

        let mut isotopes = BTreeMap::new();
        let mut isotope_spans = BTreeMap::new();
        for isotope in self.isotopes {
            let mass_number = MassNumber::new(isotope.mass_number)
                .ok_or(AtomicErrorKind::ZeroMassNumber(isotope.span))?;
            match isotope_spans.entry(mass_number) {
                btree_map::Entry::Occupied(e) => {
                    return Err(AtomicErrorKind::DuplicateIsotope(
                        *e.get(),
                        isotope.span,
                        mass_number,
                    ));
                }
                btree_map::Entry::Vacant(e) => e.insert(isotope.span),
            };
            isotopes.insert(
                mass_number,
                Isotope {
                    relative_mass: isotope.relative_mass,
                    abundance: isotope.abundance,
                },
            );
        }

        Ok((
            self.symbol,
            ElementDescription {
                name: self.name,
                isotopes,
            },
        ))
    }
}

fn is_element_symbol(symbol: &str) -> bool {
    let chars: Vec<_> = symbol.chars().collect();
    match chars[..] {
        [f] => f.is_ascii_uppercase(),
        [f, l] => f.is_ascii_uppercase() && l.is_ascii_lowercase(),
        _ => false,
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate atomic database file")]
struct AtomicDatabaseError {
    kdl: NamedSource<String>,
    #[source]
    kind: AtomicErrorKind,
}

impl Diagnostic for AtomicDatabaseError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum AtomicErrorKind {
    #[error("the element {2:?} has already been defined")]
    #[diagnostic(help("each element symbol may only be defined once"))]
    DuplicateElement(Span, Span, String),

    #[error("{1:?} is not a valid element symbol")]
    #[diagnostic(help(
        "element symbols are a single uppercase ASCII letter, optionally followed by a lowercase one"
    ))]
    InvalidSymbol(Span, String),

    #[error("the isotope with mass number {2} has already been defined")]
    #[diagnostic(help("double-check for typos, or remove the duplicate isotope"))]
    DuplicateIsotope(Span, Span, MassNumber),

    #[error("isotopes must have a non-zero mass number")]
    ZeroMassNumber(Span),
}

impl AtomicErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateElement(s1, s2, _) | Self::DuplicateIsotope(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::InvalidSymbol(s, _) => vec![(s, "invalid symbol")],
            Self::ZeroMassNumber(s) => vec![(s, "zero mass number")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> AtomicDatabaseError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        AtomicDatabaseError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_database_is_valid() {
        let db = AtomicDatabase::new("atomic_database.kdl", DEFAULT_KDL);
        assert!(db.is_ok());
        let db = db.unwrap();
        for symbol in ["H", "C", "N", "O", "P", "S", "Se", "Tc"] {
            assert!(db.contains(symbol), "missing {symbol}");
        }
        assert!(!db.contains("Xx"));
    }

    #[test]
    fn parse_isotopes() {
        let kdl = indoc! {r#"
            elements {
                C "Carbon" {
                    isotope 12 mass="12" abundance="0.9893"
                    isotope 13 mass="13.00335483507" abundance="0.0107"
                }
                Tc "Technetium" {
                    isotope 99 mass="98.9062508"
                }
            }
        "#};
        let db = AtomicDatabase::new("test", kdl).unwrap();
        let carbon = &db.elements["C"];
        assert_eq!(carbon.name, "Carbon");
        let c13 = carbon.isotopes[&MassNumber::new(13).unwrap()];
        assert_eq!(c13.relative_mass, dec!(13.00335483507));
        assert_eq!(c13.abundance, Some(dec!(0.0107)));
        let tc99 = db.elements["Tc"].isotopes[&MassNumber::new(99).unwrap()];
        assert_eq!(tc99.abundance, None);
    }

    #[test]
    fn reject_invalid_symbols() {
        let kdl = indoc! {r#"
            elements {
                CA "Calcium" {
                    isotope 40 mass="39.962590863" abundance="0.96941"
                }
            }
        "#};
        let error = AtomicDatabase::new("test", kdl).unwrap_err();
        let kind = error.diagnostic_source().unwrap().to_string();
        assert_eq!(kind, "\"CA\" is not a valid element symbol");
    }

    #[test]
    fn reject_duplicates() {
        let kdl = indoc! {r#"
            elements {
                H "Hydrogen" {
                    isotope 1 mass="1.00782503223" abundance="0.999885"
                }
                H "Hydrogen" {
                    isotope 1 mass="1.00782503223" abundance="0.999885"
                }
            }
        "#};
        let error = AtomicDatabase::new("test", kdl).unwrap_err();
        assert_eq!(
            error.diagnostic_source().unwrap().to_string(),
            "the element \"H\" has already been defined"
        );

        let kdl = indoc! {r#"
            elements {
                H "Hydrogen" {
                    isotope 1 mass="1.00782503223" abundance="0.999885"
                    isotope 1 mass="2.01410177812" abundance="0.000115"
                }
            }
        "#};
        let error = AtomicDatabase::new("test", kdl).unwrap_err();
        assert_eq!(
            error.diagnostic_source().unwrap().to_string(),
            "the isotope with mass number 1 has already been defined"
        );
    }

    #[test]
    fn reject_missing_isotopes() {
        let kdl = indoc! {r#"
            elements {
                H "Hydrogen"
            }
        "#};
        assert!(AtomicDatabase::new("test", kdl).is_err());
    }
}
