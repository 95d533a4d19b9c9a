// Standard Library Imports
use std::collections::hash_map::Entry;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use knuffel::{Decode, span::Span};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use thiserror::Error;

// Public API ==========================================================================================================

/// Which modifications a search applies, and how many variable modifications a single peptide may carry
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SearchSettings {
    max_variable_modifications: usize,
    fixed: Vec<String>,
    variable: Vec<String>,
}

impl SearchSettings {
    pub fn new(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_settings: SearchSettingsKdl =
            knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        parsed_settings
            .validate()
            .map_err(|e| e.finalize(file_name, kdl_text).into())
    }

    /// Starts an empty set of settings; modifications are then added with [`fix()`](Self::fix) and
    /// [`vary()`](Self::vary)
    #[must_use]
    pub const fn with_capacity(max_variable_modifications: usize) -> Self {
        Self {
            max_variable_modifications,
            fixed: Vec::new(),
            variable: Vec::new(),
        }
    }

    #[must_use]
    pub fn fix(mut self, modification: impl Into<String>) -> Self {
        push_unique(&mut self.fixed, modification.into());
        self
    }

    #[must_use]
    pub fn vary(mut self, modification: impl Into<String>) -> Self {
        push_unique(&mut self.variable, modification.into());
        self
    }

    #[must_use]
    pub const fn max_variable_modifications(&self) -> usize {
        self.max_variable_modifications
    }

    #[must_use]
    pub fn fixed(&self) -> &[String] {
        &self.fixed
    }

    #[must_use]
    pub fn variable(&self) -> &[String] {
        &self.variable
    }
}

pub const DEFAULT_KDL: &str = include_str!("../data/search.kdl");

impl Default for SearchSettings {
    fn default() -> Self {
        // SAFETY: The embedded settings are checked by `default_settings_are_valid()` below
        Self::new("search.kdl", DEFAULT_KDL).unwrap()
    }
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct SearchSettingsKdl {
    #[knuffel(child, unwrap(argument))]
    max_variable_modifications: usize,
    #[knuffel(children(name = "fixed"))]
    fixed: Vec<ModificationNameKdl>,
    #[knuffel(children(name = "variable"))]
    variable: Vec<ModificationNameKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct ModificationNameKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    name: String,
}

// Settings Validation =================================================================================================

type SettingsResult<T> = Result<T, SettingsErrorKind>;

impl SearchSettingsKdl {
    fn validate(self) -> SettingsResult<SearchSettings> {
        let fixed = unique_names(self.fixed)?;
        let variable = unique_names(self.variable)?;

        for (name, &variable_span) in &variable {
            if let Some(&fixed_span) = fixed.get(name) {
                return Err(SettingsErrorKind::ConflictingModification(
                    fixed_span,
                    variable_span,
                    name.clone(),
                ));
            }
        }

        Ok(SearchSettings {
            max_variable_modifications: self.max_variable_modifications,
            fixed: in_file_order(fixed),
            variable: in_file_order(variable),
        })
    }
}

fn unique_names(names: Vec<ModificationNameKdl>) -> SettingsResult<HashMap<String, Span>> {
    let mut seen_names = HashMap::new();
    for ModificationNameKdl { span, name } in names {
        match seen_names.entry(name) {
            Entry::Occupied(e) => {
                return Err(SettingsErrorKind::DuplicateModification(
                    *e.get(),
                    span,
                    e.key().clone(),
                ));
            }
            Entry::Vacant(e) => e.insert(span),
        };
    }
    Ok(seen_names)
}

// NOTE: Modification IDs are handed out in settings order, so the order of the file needs to be restored
fn in_file_order(names: HashMap<String, Span>) -> Vec<String> {
    let mut names: Vec<_> = names.into_iter().collect();
    names.sort_unstable_by_key(|(_, span)| span.0);
    names.into_iter().map(|(name, _)| name).collect()
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate search settings file")]
struct SettingsError {
    kdl: NamedSource<String>,
    #[source]
    kind: SettingsErrorKind,
}

impl Diagnostic for SettingsError {
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
enum SettingsErrorKind {
    #[error("the modification {2:?} has already been listed")]
    #[diagnostic(help("remove the duplicate entry"))]
    DuplicateModification(Span, Span, String),

    #[error("the modification {2:?} was marked as both fixed and variable")]
    #[diagnostic(help("a modification must be either fixed or variable, so remove one of the two"))]
    ConflictingModification(Span, Span, String),
}

impl SettingsErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateModification(s1, s2, _) => {
                vec![(s1, "first listed here"), (s2, "then again here")]
            }
            Self::ConflictingModification(s1, s2, _) => {
                vec![(s1, "fixed here"), (s2, "but variable here")]
            }
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> SettingsError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        SettingsError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
