// External Crate Imports
use ahash::{HashMap, HashMapExt};
use polychem::ChemicalComposition;

// Local Crate Imports
use crate::{CombinationIndex, ModificationCatalog, ModificationId};

/// Interns every multiset of variable modifications reached while building a graph
///
/// A combination is identified by its sorted list of modification IDs, so adding the same modifications in any order
/// always leads back to the same [`CombinationIndex`]. Combinations are only allocated when first reached, and never
/// grow past the catalog's maximum number of variable modifications.
#[derive(Clone, Debug)]
pub struct CombinationSpace<'c, 'a> {
    catalog: &'c ModificationCatalog<'a>,
    combinations: Vec<ModificationCombination<'a>>,
    canonical: HashMap<Vec<ModificationId>, CombinationIndex>,
    transitions: HashMap<(CombinationIndex, ModificationId), Option<CombinationIndex>>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ModificationCombination<'a> {
    modifications: Vec<ModificationId>,
    composition: ChemicalComposition<'a>,
}

impl<'c, 'a> CombinationSpace<'c, 'a> {
    #[must_use]
    pub fn new(catalog: &'c ModificationCatalog<'a>) -> Self {
        let empty = ModificationCombination {
            modifications: Vec::new(),
            composition: ChemicalComposition::default(),
        };
        let mut canonical = HashMap::new();
        canonical.insert(Vec::new(), Self::base());
        Self {
            catalog,
            combinations: vec![empty],
            canonical,
            transitions: HashMap::new(),
        }
    }

    /// The index of the empty combination
    #[must_use]
    pub const fn base() -> CombinationIndex {
        CombinationIndex(0)
    }

    /// Adds `modification` to the combination at `index`
    ///
    /// Returns `None` if the combination is already full.
    ///
    /// # Panics
    ///
    /// If `index` didn't come from this space
    pub fn transition(
        &mut self,
        index: CombinationIndex,
        modification: ModificationId,
    ) -> Option<CombinationIndex> {
        if let Some(&next) = self.transitions.get(&(index, modification)) {
            return next;
        }

        let current = self.combination(index).modifications.clone();
        let next = (current.len() < self.catalog.max_variable_modifications()).then(|| {
            let mut modifications = current;
            let insert_at = modifications.partition_point(|&m| m <= modification);
            modifications.insert(insert_at, modification);
            self.intern(modifications)
        });

        self.transitions.insert((index, modification), next);
        next
    }

    /// # Panics
    ///
    /// If `index` didn't come from this space
    #[must_use]
    pub fn composition(&self, index: CombinationIndex) -> &ChemicalComposition<'a> {
        &self.combination(index).composition
    }

    /// # Panics
    ///
    /// If `index` didn't come from this space
    #[must_use]
    pub fn combination(&self, index: CombinationIndex) -> &ModificationCombination<'a> {
        &self.combinations[index.0 as usize]
    }

    /// The number of distinct combinations reached so far, including the empty one
    #[must_use]
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    #[must_use]
    pub const fn catalog(&self) -> &'c ModificationCatalog<'a> {
        self.catalog
    }

    fn intern(&mut self, modifications: Vec<ModificationId>) -> CombinationIndex {
        if let Some(&index) = self.canonical.get(&modifications) {
            return index;
        }

        let composition = modifications
            .iter()
            .map(|&id| &self.catalog.modification(id).delta)
            .sum();
        let index = CombinationIndex(self.combinations.len() as u32);
        self.canonical.insert(modifications.clone(), index);
        self.combinations.push(ModificationCombination {
            modifications,
            composition,
        });
        index
    }
}

impl<'a> ModificationCombination<'a> {
    /// The modifications in this combination, sorted by ID and repeated once per occurrence
    #[must_use]
    pub fn modifications(&self) -> &[ModificationId] {
        &self.modifications
    }

    /// The sum of the deltas of every modification in this combination
    #[must_use]
    pub const fn composition(&self) -> &ChemicalComposition<'a> {
        &self.composition
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }
}

// Module Tests ========================================================================================================
