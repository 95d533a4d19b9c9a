mod compositions;
mod scoring;
pub use scoring::{ModificationSite, ScoredModifications};

// Standard Library Imports
use std::cell::OnceCell;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use polychem::ChemicalComposition;
use tracing::{debug, trace};

// Local Crate Imports
use crate::{
    CombinationIndex, CombinationSpace, Direction, LocatedResidue, Location, ModificationCatalog,
    ModificationId, Result, Termini, errors::ModgraphError,
};

/// A layered DAG of every distinct modification state a sequence can reach
///
/// Layer 0 is the source: a single node carrying the empty combination. Each residue added appends a layer holding
/// one node per distinct combination of variable modifications that can be reached after that residue, linked back
/// to every node of the previous layer that can reach it.
#[derive(Clone, Debug)]
pub struct SequenceGraph<'c, 'a> {
    catalog: &'c ModificationCatalog<'a>,
    combinations: CombinationSpace<'c, 'a>,
    direction: Direction,
    layers: Vec<Layer<'c, 'a>>,
    sink: Option<CombinationIndex>,
}

#[derive(Clone, Debug)]
struct Layer<'c, 'a> {
    residue: Option<(char, &'c LocatedResidue<'a>)>,
    location: Location,
    running_composition: ChemicalComposition<'a>,
    nodes: Vec<Node<'a>>,
    node_lookup: HashMap<CombinationIndex, usize>,
}

#[derive(Clone, Debug)]
struct Node<'a> {
    combination: CombinationIndex,
    predecessors: Vec<Edge>,
    composition: OnceCell<ChemicalComposition<'a>>,
    complement: OnceCell<ChemicalComposition<'a>>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Edge {
    predecessor: usize,
    modification: Option<ModificationId>,
}

impl<'c, 'a> SequenceGraph<'c, 'a> {
    #[must_use]
    pub fn new(catalog: &'c ModificationCatalog<'a>, direction: Direction) -> Self {
        Self {
            catalog,
            combinations: CombinationSpace::new(catalog),
            direction,
            layers: vec![Layer::source()],
            sink: None,
        }
    }

    /// Builds a graph for `sequence`, tagging its first and last residues with the appropriate terminal locations
    ///
    /// # Errors
    ///
    /// Returns [`ModgraphError::InvalidResidue`] if `sequence` contains a residue missing from the catalog
    pub fn from_sequence(
        catalog: &'c ModificationCatalog<'a>,
        sequence: &str,
        termini: Termini,
        direction: Direction,
    ) -> Result<Self> {
        let residues: Vec<_> = sequence.chars().collect();
        let length = residues.len();
        let mut located: Vec<_> = residues
            .into_iter()
            .enumerate()
            .map(|(index, residue)| (residue, Location::of_position(index, length, termini)))
            .collect();
        if direction == Direction::Reverse {
            located.reverse();
        }

        let mut graph = Self::new(catalog, direction);
        for (residue, location) in located {
            graph.add_residue(residue, location)?;
        }

        for (position, layer) in graph.layers.iter().enumerate().skip(1) {
            trace!(position, width = layer.nodes.len(), "sequence graph layer");
        }
        debug!(
            sequence,
            ?direction,
            final_nodes = graph.final_layer().nodes.len(),
            combinations = graph.combinations.len(),
            "built sequence graph"
        );

        Ok(graph)
    }

    /// Appends a layer for `residue`, found at `location` in the peptide
    ///
    /// Adding a residue clears any previously set sink.
    ///
    /// # Errors
    ///
    /// Returns [`ModgraphError::InvalidResidue`] if `residue` isn't in the catalog, leaving the graph unchanged
    pub fn add_residue(&mut self, residue: char, location: Location) -> Result<()> {
        let catalog = self.catalog;
        let located = catalog.residue(residue, location)?;
        // SAFETY: The source layer is created in `Self::new()` and layers are never removed
        let previous = self.layers.last().unwrap();

        let mut layer = Layer {
            residue: Some((residue, located)),
            location,
            running_composition: &previous.running_composition + &located.composition,
            nodes: Vec::new(),
            node_lookup: HashMap::new(),
        };
        for (predecessor, node) in previous.nodes.iter().enumerate() {
            layer.merge(node.combination, Edge {
                predecessor,
                modification: None,
            });
            for &modification in &located.variable_modifications {
                if let Some(next) = self.combinations.transition(node.combination, modification) {
                    layer.merge(next, Edge {
                        predecessor,
                        modification: Some(modification),
                    });
                }
            }
        }

        self.clear_sink();
        self.layers.push(layer);
        Ok(())
    }

    /// Closes the graph at the final-layer node carrying `combination`
    ///
    /// # Errors
    ///
    /// Returns [`ModgraphError::UnreachableSink`] if no final-layer node carries `combination`
    pub fn set_sink(&mut self, combination: CombinationIndex) -> Result<()> {
        if !self.final_layer().node_lookup.contains_key(&combination) {
            return Err(Box::new(ModgraphError::UnreachableSink(combination)));
        }
        if self.sink != Some(combination) {
            self.clear_sink();
            self.sink = Some(combination);
        }
        Ok(())
    }

    #[must_use]
    pub const fn sink(&self) -> Option<CombinationIndex> {
        self.sink
    }

    /// The number of residues in the graph (not counting the source layer)
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of distinct nodes at `position`, or `None` if the graph is shorter than that
    #[must_use]
    pub fn layer_width(&self, position: usize) -> Option<usize> {
        self.layers.get(position).map(|l| l.nodes.len())
    }

    /// The combinations that can be chosen as a sink, in the order they were first reached
    pub fn final_combinations(&self) -> impl Iterator<Item = CombinationIndex> + '_ {
        self.final_layer().nodes.iter().map(|n| n.combination)
    }

    /// The combinations present at `position`, in the order they were first reached
    pub fn combinations_at(
        &self,
        position: usize,
    ) -> impl Iterator<Item = CombinationIndex> + '_ {
        self.layers
            .get(position)
            .into_iter()
            .flat_map(|l| l.nodes.iter().map(|n| n.combination))
    }

    #[must_use]
    pub const fn combinations(&self) -> &CombinationSpace<'c, 'a> {
        &self.combinations
    }

    #[must_use]
    pub const fn catalog(&self) -> &'c ModificationCatalog<'a> {
        self.catalog
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// The residues of the graph in the order they were added, with the locations they were tagged with
    pub fn residues(&self) -> impl Iterator<Item = (char, Location)> + '_ {
        self.layers
            .iter()
            .filter_map(|l| l.residue.map(|(residue, _)| (residue, l.location)))
    }

    // Maps a layer index onto a 1-based position in the original sequence
    fn sequence_position(&self, position: usize) -> usize {
        match self.direction {
            Direction::Forward => position,
            Direction::Reverse => self.layers.len() - position,
        }
    }

    fn final_layer(&self) -> &Layer<'c, 'a> {
        // SAFETY: The source layer is created in `Self::new()` and layers are never removed
        self.layers.last().unwrap()
    }

    fn clear_sink(&mut self) {
        self.sink = None;
        for node in self.layers.iter_mut().flat_map(|l| &mut l.nodes) {
            node.complement.take();
        }
    }
}

impl<'a> Layer<'_, 'a> {
    fn source() -> Self {
        let source = CombinationSpace::base();
        let mut node_lookup = HashMap::new();
        node_lookup.insert(source, 0);
        Self {
            residue: None,
            location: Location::default(),
            running_composition: ChemicalComposition::default(),
            nodes: vec![Node::new(source)],
            node_lookup,
        }
    }

    fn merge(&mut self, combination: CombinationIndex, edge: Edge) {
        let index = *self.node_lookup.entry(combination).or_insert_with(|| {
            self.nodes.push(Node::new(combination));
            self.nodes.len() - 1
        });
        self.nodes[index].predecessors.push(edge);
    }

    fn node(&self, combination: CombinationIndex) -> Option<&Node<'a>> {
        self.node_lookup.get(&combination).map(|&i| &self.nodes[i])
    }
}

impl Node<'_> {
    fn new(combination: CombinationIndex) -> Self {
        Self {
            combination,
            predecessors: Vec::new(),
            composition: OnceCell::new(),
            complement: OnceCell::new(),
        }
    }
}

// Module Tests ========================================================================================================
