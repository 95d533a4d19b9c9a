// External Crate Imports
use polychem::ChemicalComposition;

// Local Crate Imports
use super::{Layer, Node, SequenceGraph};
use crate::CombinationIndex;

impl<'a> SequenceGraph<'_, 'a> {
    /// The composition of every residue up to and including `position`, plus the modifications of `combination`
    ///
    /// In a forward graph this is a prefix of the peptide, and in a reverse graph a suffix. Compositions are computed
    /// on first request and then cached. Returns `None` if there is no such node.
    #[must_use]
    pub fn composition(
        &self,
        position: usize,
        combination: CombinationIndex,
    ) -> Option<&ChemicalComposition<'a>> {
        let layer = self.layers.get(position)?;
        let node = layer.node(combination)?;
        Some(self.node_composition(layer, node))
    }

    /// What remains of the sink's composition once the composition at (`position`, `combination`) is removed
    ///
    /// Returns `None` if no sink has been set, or if there is no such node.
    #[must_use]
    pub fn complementary_composition(
        &self,
        position: usize,
        combination: CombinationIndex,
    ) -> Option<&ChemicalComposition<'a>> {
        let layer = self.layers.get(position)?;
        let node = layer.node(combination)?;
        self.node_complement(layer, node)
    }

    /// The composition of the whole peptide (without terminal water), as modified by the sink's combination
    #[must_use]
    pub fn sink_composition(&self) -> Option<&ChemicalComposition<'a>> {
        self.composition(self.len(), self.sink?)
    }

    pub(super) fn node_composition<'s>(
        &'s self,
        layer: &'s Layer<'_, 'a>,
        node: &'s Node<'a>,
    ) -> &'s ChemicalComposition<'a> {
        node.composition.get_or_init(|| {
            &layer.running_composition + self.combinations.composition(node.combination)
        })
    }

    pub(super) fn node_complement<'s>(
        &'s self,
        layer: &'s Layer<'_, 'a>,
        node: &'s Node<'a>,
    ) -> Option<&'s ChemicalComposition<'a>> {
        let sink = self.sink_composition()?;
        Some(
            node.complement
                .get_or_init(|| sink - self.node_composition(layer, node)),
        )
    }
}

// Module Tests ========================================================================================================
