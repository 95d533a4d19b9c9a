// Standard Library Imports
use std::{
    collections::{BTreeMap, hash_map::Entry},
    sync::LazyLock,
};

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use knuffel::{
    Decode,
    span::{Span, Spanned},
};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use polychem::{AtomicDatabase, ChemicalComposition, PolychemError};
use thiserror::Error;

// Local Crate Imports
use crate::{Location, Target};

// Public API ==========================================================================================================

/// The residues and modifications a search can draw from
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ChemistryDatabase<'a> {
    pub(crate) atomic_db: &'a AtomicDatabase,
    pub residues: Residues<'a>,
    pub modifications: Modifications<'a>,
}

impl<'a> ChemistryDatabase<'a> {
    pub fn new(
        atomic_db: &'a AtomicDatabase,
        file_name: impl AsRef<str>,
        kdl_text: impl AsRef<str>,
    ) -> Result<Self> {
        let parsed_db: ChemistryDatabaseKdl =
            knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        parsed_db
            .validate(atomic_db)
            .map_err(|e| e.finalize(file_name, kdl_text).into())
    }

    #[must_use]
    pub const fn atomic_db(&self) -> &'a AtomicDatabase {
        self.atomic_db
    }
}

pub const DEFAULT_KDL: &str = include_str!("../data/chemistry.kdl");

static DEFAULT_ATOMIC_DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

impl Default for ChemistryDatabase<'static> {
    fn default() -> Self {
        // SAFETY: The embedded database is checked by `default_database_is_valid()` below
        Self::new(&DEFAULT_ATOMIC_DB, "chemistry.kdl", DEFAULT_KDL).unwrap()
    }
}

pub type Residues<'a> = BTreeMap<char, ResidueDescription<'a>>;
pub type Modifications<'a> = BTreeMap<String, ModificationDescription<'a>>;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ResidueDescription<'a> {
    pub name: String,
    pub composition: ChemicalComposition<'a>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ModificationDescription<'a> {
    pub description: String,
    pub delta: ChemicalComposition<'a>,
    pub targets: Vec<Target>,
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ChemistryDatabaseKdl {
    #[knuffel(child, unwrap(children))]
    residues: Vec<ResidueKdl>,
    #[knuffel(child, unwrap(children))]
    modifications: Vec<ModificationKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ResidueKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    code: String,
    #[knuffel(argument)]
    name: String,
    #[knuffel(argument)]
    composition: ChemicalCompositionKdl,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ModificationKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    name: String,
    #[knuffel(argument)]
    description: String,
    #[knuffel(child, unwrap(argument))]
    delta: ChemicalCompositionKdl,
    #[knuffel(children(name = "targeting", non_empty))]
    targets: Vec<TargetKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct TargetKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    residue: String,
    #[knuffel(property(name = "at"))]
    location: Option<String>,
}

type ChemicalCompositionKdl = Spanned<String, Span>;

// Contextual Validation Trait  ========================================================================================

type ChemResult<T> = Result<T, ChemistryErrorKind>;

trait ValidateInto<'c, T> {
    type Context: 'c;

    fn validate(self, ctx: Self::Context) -> ChemResult<T>;
}

// Chemistry Database Validation =======================================================================================

impl<'a> ValidateInto<'a, ChemistryDatabase<'a>> for ChemistryDatabaseKdl {
    type Context = &'a AtomicDatabase;

    fn validate(self, ctx: Self::Context) -> ChemResult<ChemistryDatabase<'a>> {
        let residues = self.residues.validate(ctx)?;
        let modifications = self.modifications.validate((ctx, &residues))?;
        Ok(ChemistryDatabase {
            atomic_db: ctx,
            residues,
            modifications,
        })
    }
}

// Validate Residues ===================================================================================================

impl<'a> ValidateInto<'a, Residues<'a>> for Vec<ResidueKdl> {
    type Context = &'a AtomicDatabase;

    fn validate(self, ctx: Self::Context) -> ChemResult<Residues<'a>> {
        let mut residues = BTreeMap::new();
        let mut seen_residues = HashMap::new();

        for residue in self {
            let span = residue.span;
            let (code, description) = residue.validate(ctx)?;
            match seen_residues.entry(code) {
                Entry::Occupied(e) => {
                    return Err(ChemistryErrorKind::DuplicateResidue(*e.get(), span, code));
                }
                Entry::Vacant(e) => e.insert(span),
            };
            residues.insert(code, description);
        }

        Ok(residues)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

type ResidueEntry<'a> = (char, ResidueDescription<'a>);

impl<'a> ValidateInto<'a, ResidueEntry<'a>> for ResidueKdl {
    type Context = &'a AtomicDatabase;

    fn validate(self, ctx: Self::Context) -> ChemResult<ResidueEntry<'a>> {
        let code = residue_code(&self.code)
            .ok_or_else(|| ChemistryErrorKind::InvalidResidueCode(self.span, self.code))?;

        Ok((
            code,
            ResidueDescription {
                name: self.name,
                composition: self.composition.validate(ctx)?,
            },
        ))
    }
}

// NOTE: `*` is reserved as the wildcard residue for modification targets
fn residue_code(code: &str) -> Option<char> {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '*' => Some(c),
        _ => None,
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl<'a> ValidateInto<'a, ChemicalComposition<'a>> for ChemicalCompositionKdl {
    type Context = &'a AtomicDatabase;

    fn validate(self, ctx: Self::Context) -> ChemResult<ChemicalComposition<'a>> {
        ChemicalComposition::new(ctx, self.as_str())
            .map_err(|e| ChemistryErrorKind::Composition(*self.span(), *e))
    }
}

// Validate Modifications ==============================================================================================

impl<'a: 'r, 'r> ValidateInto<'r, Modifications<'a>> for Vec<ModificationKdl> {
    type Context = (&'a AtomicDatabase, &'r Residues<'a>);

    fn validate(self, ctx: Self::Context) -> ChemResult<Modifications<'a>> {
        let mut modifications = BTreeMap::new();
        let mut seen_modifications: HashMap<String, Span> = HashMap::new();

        for modification in self {
            let span = modification.span;
            let (name, description) = modification.validate(ctx)?;
            if let Some(&first_defined_at) = seen_modifications.get(&name) {
                return Err(ChemistryErrorKind::DuplicateModification(
                    first_defined_at,
                    span,
                    name,
                ));
            }
            seen_modifications.insert(name.clone(), span);
            modifications.insert(name, description);
        }

        Ok(modifications)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

type ModificationEntry<'a> = (String, ModificationDescription<'a>);

impl<'a: 'r, 'r> ValidateInto<'r, ModificationEntry<'a>> for ModificationKdl {
    type Context = (&'a AtomicDatabase, &'r Residues<'a>);

    fn validate(self, ctx: Self::Context) -> ChemResult<ModificationEntry<'a>> {
        let mut targets = Vec::new();
        let mut seen_targets = HashMap::new();
        for target in self.targets {
            let span = target.span;
            let target = target.validate(ctx.1)?;
            match seen_targets.entry(target) {
                Entry::Occupied(e) => {
                    return Err(ChemistryErrorKind::DuplicateTarget(*e.get(), span, target));
                }
                Entry::Vacant(e) => e.insert(span),
            };
            targets.push(target);
        }

        Ok((
            self.name,
            ModificationDescription {
                description: self.description,
                delta: self.delta.validate(ctx.0)?,
                targets,
            },
        ))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl<'a: 'r, 'r> ValidateInto<'r, Target> for TargetKdl {
    type Context = &'r Residues<'a>;

    fn validate(self, ctx: Self::Context) -> ChemResult<Target> {
        let residue = match self.residue.as_str() {
            "*" => None,
            code => {
                let residue = residue_code(code).filter(|c| ctx.contains_key(c)).ok_or_else(|| {
                    ChemistryErrorKind::UnknownTargetResidue(self.span, self.residue.clone())
                })?;
                Some(residue)
            }
        };

        let location = match self.location {
            Some(location) => location
                .parse()
                .map_err(|_| ChemistryErrorKind::UnknownLocation(self.span, location))?,
            None => Location::Everywhere,
        };

        Ok(Target { residue, location })
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate chemistry database file")]
struct ChemistryError {
    kdl: NamedSource<String>,
    #[source]
    kind: ChemistryErrorKind,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl Diagnostic for ChemistryError {
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
enum ChemistryErrorKind {
    #[error("the residue {2:?} has already been defined")]
    #[diagnostic(help("each residue code may only be defined once"))]
    DuplicateResidue(Span, Span, char),

    #[error("{1:?} is not a valid residue code")]
    #[diagnostic(help("residue codes must be a single character other than '*'"))]
    InvalidResidueCode(Span, String),

    #[error("the modification {2:?} has already been defined")]
    #[diagnostic(help("double-check for typos, or pick a new name for one of the modifications"))]
    DuplicateModification(Span, Span, String),

    #[error("the residue {1:?} targeted by this modification is not defined")]
    #[diagnostic(help("double-check for typos, or add {1:?} to the residues section"))]
    UnknownTargetResidue(Span, String),

    #[error("{1:?} is not a valid modification location")]
    #[diagnostic(help(
        "valid locations are: everywhere, peptide-n-term, peptide-c-term, protein-n-term, and protein-c-term"
    ))]
    UnknownLocation(Span, String),

    #[error("the target {2} has already been listed for this modification")]
    #[diagnostic(help("remove the duplicate target"))]
    DuplicateTarget(Span, Span, Target),

    #[error("chemistry database file contained an invalid chemical composition")]
    Composition(
        Span,
        #[source]
        #[diagnostic_source]
        PolychemError,
    ),
}

impl ChemistryErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateResidue(s1, s2, _)
            | Self::DuplicateModification(s1, s2, _)
            | Self::DuplicateTarget(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::InvalidResidueCode(s, _) => vec![(s, "invalid residue code")],
            Self::UnknownTargetResidue(s, _) => vec![(s, "unknown residue")],
            Self::UnknownLocation(s, _) => vec![(s, "unknown location")],
            Self::Composition(s, _) => vec![(s, "invalid chemical composition")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> ChemistryError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        ChemistryError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
