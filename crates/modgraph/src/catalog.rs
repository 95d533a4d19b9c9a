// External Crate Imports
use ahash::{HashMap, HashMapExt};
use polychem::ChemicalComposition;
use static_assertions::assert_impl_all;

// Local Crate Imports
use crate::{
    ChemistryDatabase, Location, Modification, ModificationId, ModificationKind, Result,
    SearchSettings, errors::ModgraphError,
};

/// Every residue the search knows, at every location it can occupy, with fixed modifications already applied
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ModificationCatalog<'a> {
    modifications: Vec<Modification<'a>>,
    residues: HashMap<(char, Location), LocatedResidue<'a>>,
    max_variable_modifications: usize,
    water: ChemicalComposition<'a>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LocatedResidue<'a> {
    /// The residue's composition plus the deltas of its `fixed_modifications`
    pub composition: ChemicalComposition<'a>,
    pub fixed_modifications: Vec<ModificationId>,
    pub variable_modifications: Vec<ModificationId>,
}

assert_impl_all!(ModificationCatalog<'static>: Send, Sync);

impl<'a> ModificationCatalog<'a> {
    /// Resolves the modifications named in `settings` against `db`
    ///
    /// Fixed modifications are assigned the first IDs, followed by variable ones, each in the order `settings` lists
    /// them.
    ///
    /// # Errors
    ///
    /// Fails if `settings` name a modification that isn't in `db`, or mark one as both fixed and variable.
    pub fn new(db: &ChemistryDatabase<'a>, settings: &SearchSettings) -> Result<Self> {
        if let Some(name) = settings.fixed().iter().find(|&n| settings.variable().contains(n)) {
            return Err(Box::new(ModgraphError::ConflictingModification(name.clone())));
        }

        let mut modifications = Vec::new();
        let requested = settings
            .fixed()
            .iter()
            .map(|name| (name, ModificationKind::Fixed))
            .chain(settings.variable().iter().map(|name| (name, ModificationKind::Variable)));
        for (id, (name, kind)) in (0..).zip(requested) {
            let description = db
                .modifications
                .get(name)
                .ok_or_else(|| ModgraphError::UnknownModification(name.clone()))?;
            modifications.push(Modification {
                id: ModificationId(id),
                name: name.clone(),
                description: description.description.clone(),
                delta: description.delta.clone(),
                kind,
                targets: description.targets.clone(),
            });
        }

        let mut residues = HashMap::with_capacity(db.residues.len() * Location::ALL.len());
        for (&code, residue) in &db.residues {
            for location in Location::ALL {
                let mut located = LocatedResidue {
                    composition: residue.composition.clone(),
                    fixed_modifications: Vec::new(),
                    variable_modifications: Vec::new(),
                };
                for modification in &modifications {
                    if !modification.targets.iter().any(|t| t.matches(code, location)) {
                        continue;
                    }
                    match modification.kind {
                        ModificationKind::Fixed => {
                            located.composition += &modification.delta;
                            located.fixed_modifications.push(modification.id);
                        }
                        ModificationKind::Variable => {
                            located.variable_modifications.push(modification.id);
                        }
                    }
                }
                residues.insert((code, location), located);
            }
        }

        let water =
            ChemicalComposition::new(db.atomic_db(), "H2O").map_err(ModgraphError::from)?;

        Ok(Self {
            modifications,
            residues,
            max_variable_modifications: settings.max_variable_modifications(),
            water,
        })
    }

    /// # Errors
    ///
    /// Returns [`ModgraphError::InvalidResidue`] if `residue` isn't in the chemistry database
    pub fn residue(&self, residue: char, location: Location) -> Result<&LocatedResidue<'a>> {
        self.residues
            .get(&(residue, location))
            .ok_or_else(|| Box::new(ModgraphError::InvalidResidue(residue)))
    }

    /// The variable modifications that may be placed on `residue` at `location`
    ///
    /// # Errors
    ///
    /// Returns [`ModgraphError::InvalidResidue`] if `residue` isn't in the chemistry database
    pub fn applicable_modifications(
        &self,
        residue: char,
        location: Location,
    ) -> Result<&[ModificationId]> {
        Ok(&self.residue(residue, location)?.variable_modifications)
    }

    /// # Panics
    ///
    /// If `id` didn't come from this catalog
    #[must_use]
    pub fn modification(&self, id: ModificationId) -> &Modification<'a> {
        &self.modifications[id.0 as usize]
    }

    #[must_use]
    pub fn modifications(&self) -> &[Modification<'a>] {
        &self.modifications
    }

    #[must_use]
    pub const fn max_variable_modifications(&self) -> usize {
        self.max_variable_modifications
    }

    #[must_use]
    pub const fn water(&self) -> &ChemicalComposition<'a> {
        &self.water
    }
}

// Module Tests ========================================================================================================
