// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// Local Crate Imports
use super::{Layer, Node, SequenceGraph};
use crate::{
    Direction, FragmentScorer, Modification,
    scorer::outranks,
};

/// The best path through a graph, and the modifications placed along it
#[derive(Clone, PartialEq, Debug)]
pub struct ScoredModifications<'c, 'a> {
    pub score: f64,
    /// Every fixed and variable modification on the best path, in sequence order
    pub modifications: Vec<ModificationSite<'c, 'a>>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ModificationSite<'c, 'a> {
    pub modification: &'c Modification<'a>,
    /// 1-based position in the sequence
    pub position: usize,
}

impl ScoredModifications<'_, '_> {
    #[must_use]
    pub fn names(&self) -> Vec<(&str, usize)> {
        self.modifications
            .iter()
            .map(|s| (s.modification.name.as_str(), s.position))
            .collect()
    }
}

impl Display for ModificationSite<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.modification.name, self.position)
    }
}

// Best-Path Search ====================================================================================================

#[derive(Copy, Clone, Debug)]
struct BestPath {
    score: f64,
    // Index into the node's predecessor list; `None` only at the source
    via: Option<usize>,
}

type BestPaths = Vec<Vec<Option<BestPath>>>;

impl<'c, 'a> SequenceGraph<'c, 'a> {
    /// The score of the best path from the source to the sink
    ///
    /// # Panics
    ///
    /// If no sink has been set with [`set_sink()`](Self::set_sink)
    pub fn score(&self, scorer: &impl FragmentScorer) -> f64 {
        let (best_paths, sink) = self.best_paths(scorer);
        best_at(&best_paths, self.len(), sink).score
    }

    /// The score of the best path from the source to the sink, and the modifications placed along that path
    ///
    /// When several predecessors tie for the best score, the one reached first wins.
    ///
    /// # Panics
    ///
    /// If no sink has been set with [`set_sink()`](Self::set_sink)
    pub fn score_and_modifications(
        &self,
        scorer: &impl FragmentScorer,
    ) -> ScoredModifications<'c, 'a> {
        let catalog = self.catalog;
        let (best_paths, sink) = self.best_paths(scorer);
        let score = best_at(&best_paths, self.len(), sink).score;

        let mut blocks = Vec::with_capacity(self.len());
        let mut node_index = sink;
        for position in (1..=self.len()).rev() {
            let layer = &self.layers[position];
            let node = &layer.nodes[node_index];
            let sequence_position = self.sequence_position(position);

            let mut block = Vec::new();
            if let Some((_, residue)) = layer.residue {
                block.extend(residue.fixed_modifications.iter().map(|&id| ModificationSite {
                    modification: catalog.modification(id),
                    position: sequence_position,
                }));
            }

            // SAFETY: Every non-source node on the best path has a recorded predecessor
            let edge = node.predecessors[best_at(&best_paths, position, node_index).via.unwrap()];
            if let Some(id) = edge.modification {
                block.push(ModificationSite {
                    modification: catalog.modification(id),
                    position: sequence_position,
                });
            }

            blocks.push((sequence_position, block));
            node_index = edge.predecessor;
        }

        blocks.sort_by_key(|&(position, _)| position);
        let modifications = blocks.into_iter().flat_map(|(_, block)| block).collect();

        ScoredModifications {
            score,
            modifications,
        }
    }

    // Scores every ancestor of the sink, returning the table of best paths and the sink's index in the final layer
    fn best_paths(&self, scorer: &impl FragmentScorer) -> (BestPaths, usize) {
        let Some(sink) = self.sink else {
            panic!("a sink must be set with `SequenceGraph::set_sink()` before the graph can be scored");
        };
        let sink = self.final_layer().node_lookup[&sink];

        let mut ancestors: Vec<Vec<bool>> =
            self.layers.iter().map(|l| vec![false; l.nodes.len()]).collect();
        ancestors[self.len()][sink] = true;
        for position in (1..=self.len()).rev() {
            let (earlier, later) = ancestors.split_at_mut(position);
            let previous = &mut earlier[position - 1];
            for (node, _) in self.layers[position].nodes.iter().zip(&later[0]).filter(|&(_, &a)| a) {
                for edge in &node.predecessors {
                    previous[edge.predecessor] = true;
                }
            }
        }

        let mut best_paths: BestPaths =
            self.layers.iter().map(|l| vec![None; l.nodes.len()]).collect();
        best_paths[0][0] = Some(BestPath {
            score: 0.0,
            via: None,
        });
        for position in 1..=self.len() {
            let layer = &self.layers[position];
            for (index, node) in layer.nodes.iter().enumerate() {
                if !ancestors[position][index] {
                    continue;
                }

                let mut best: Option<BestPath> = None;
                for (via, edge) in node.predecessors.iter().enumerate() {
                    let Some(previous) = best_paths[position - 1][edge.predecessor] else {
                        continue;
                    };
                    if best.is_none_or(|b| outranks(previous.score, b.score)) {
                        best = Some(BestPath {
                            score: previous.score,
                            via: Some(via),
                        });
                    }
                }

                best_paths[position][index] = best.map(|b| BestPath {
                    score: self.node_score(scorer, layer, node) + b.score,
                    ..b
                });
            }
        }

        (best_paths, sink)
    }

    fn node_score(&self, scorer: &impl FragmentScorer, layer: &Layer<'_, 'a>, node: &Node<'a>) -> f64 {
        let composition = self.node_composition(layer, node);
        // SAFETY: Only called after `best_paths()` has checked that a sink is set
        let complement = self.node_complement(layer, node).unwrap();
        match self.direction {
            Direction::Forward => scorer.score(composition, complement),
            Direction::Reverse => scorer.score(complement, composition),
        }
    }
}

fn best_at(best_paths: &BestPaths, position: usize, index: usize) -> BestPath {
    // SAFETY: The sink and all of its ancestors are reachable from the source, so they all have a best path
    best_paths[position][index].unwrap()
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::{cell::Cell, sync::LazyLock};

    use assert_float_eq::assert_float_absolute_eq;
    use polychem::{ChemicalComposition, Massive};

    use crate::{
        CombinationIndex, CombinationSpace, Location, ModificationCatalog, ModificationId,
        SearchSettings, Termini,
        testing_tools::{CHEMISTRY_DB, catalog, composition},
    };

    use super::*;

    static OXIDATION_CATALOG: LazyLock<ModificationCatalog<'static>> =
        LazyLock::new(|| catalog(&SearchSettings::with_capacity(1).vary("Oxidation")));

    static MIXED_CATALOG: LazyLock<ModificationCatalog<'static>> = LazyLock::new(|| {
        catalog(
            &SearchSettings::with_capacity(2)
                .fix("Carbamidomethyl")
                .vary("Oxidation")
                .vary("Phospho"),
        )
    });

    const PEPTIDE: Termini = Termini {
        protein_n_term: false,
        protein_c_term: false,
    };

    static OXIDISED_AC: LazyLock<f64> =
        LazyLock::new(|| composition("C6H10N2O3S").monoisotopic_mass().to_f64());

    // Scores 1 for any prefix that weighs the same as an oxidised "AC"
    fn oxidised_ac_prefix(prefix: &ChemicalComposition<'_>, _suffix: &ChemicalComposition<'_>) -> f64 {
        let mass = prefix.monoisotopic_mass().to_f64();
        if (mass - *OXIDISED_AC).abs() < 0.01 { 1.0 } else { 0.0 }
    }

    // An arbitrary, but deterministic, scorer that depends on both fragments
    fn wobbly(prefix: &ChemicalComposition<'_>, suffix: &ChemicalComposition<'_>) -> f64 {
        let prefix = prefix.monoisotopic_mass().to_f64();
        let suffix = suffix.monoisotopic_mass().to_f64();
        (prefix * 0.37).sin() + (suffix * 0.11).cos() * 0.5
    }

    struct ConstantScorer(f64);

    impl FragmentScorer for ConstantScorer {
        fn score(&self, _prefix: &ChemicalComposition<'_>, _suffix: &ChemicalComposition<'_>) -> f64 {
            self.0
        }
    }

    struct CountingScorer(Cell<usize>);

    impl FragmentScorer for CountingScorer {
        fn score(&self, _prefix: &ChemicalComposition<'_>, _suffix: &ChemicalComposition<'_>) -> f64 {
            self.0.set(self.0.get() + 1);
            1.0
        }
    }

    fn graph<'c>(
        catalog: &'c ModificationCatalog<'static>,
        sequence: &str,
        direction: Direction,
    ) -> SequenceGraph<'c, 'static> {
        SequenceGraph::from_sequence(catalog, sequence, PEPTIDE, direction).unwrap()
    }

    #[test]
    fn oxidised_cysteine() {
        let mut graph = graph(&OXIDATION_CATALOG, "ACDK", Direction::Forward);
        let sinks: Vec<_> = graph.final_combinations().collect();
        assert_eq!(sinks.len(), 2);

        graph.set_sink(sinks[1]).unwrap();
        let scored = graph.score_and_modifications(&oxidised_ac_prefix);
        assert_eq!(scored.score, 1.0);
        assert_eq!(scored.names(), [("Oxidation", 2)]);
        assert_eq!(scored.modifications[0].to_string(), "Oxidation@2");
        assert_eq!(graph.score(&oxidised_ac_prefix), 1.0);

        graph.set_sink(sinks[0]).unwrap();
        let scored = graph.score_and_modifications(&oxidised_ac_prefix);
        assert_eq!(scored.score, 0.0);
        assert!(scored.modifications.is_empty());
    }

    #[test]
    fn oxidised_cysteine_in_reverse() {
        let mut graph = graph(&OXIDATION_CATALOG, "ACDK", Direction::Reverse);
        let sinks: Vec<_> = graph.final_combinations().collect();
        assert_eq!(sinks.len(), 2);

        graph.set_sink(sinks[1]).unwrap();
        let scored = graph.score_and_modifications(&oxidised_ac_prefix);
        assert_eq!(scored.score, 1.0);
        assert_eq!(scored.names(), [("Oxidation", 2)]);
    }

    #[test]
    fn unmodified_sequences() {
        let mut graph = graph(&MIXED_CATALOG, "GAGDK", Direction::Forward);
        graph.set_sink(CombinationSpace::base()).unwrap();
        let scored = graph.score_and_modifications(&wobbly);
        assert!(scored.modifications.is_empty());

        // With no modifications, there is only one path to score
        let mut expected = 0.0;
        let total = graph.sink_composition().unwrap().clone();
        let mut prefix = ChemicalComposition::default();
        for residue in "GAGDK".chars() {
            prefix += &CHEMISTRY_DB.residues[&residue].composition;
            expected += wobbly(&prefix, &(&total - &prefix));
        }
        assert_float_absolute_eq!(scored.score, expected, 1e-9);
    }

    #[test]
    fn fixed_and_variable_modifications_are_reported_in_order() {
        let mut graph = graph(&MIXED_CATALOG, "SCMCS", Direction::Forward);
        let sink = graph
            .final_combinations()
            .find(|&c| graph.combinations().combination(c).len() == 2)
            .unwrap();
        graph.set_sink(sink).unwrap();

        let scored = graph.score_and_modifications(&ConstantScorer(0.0));
        let positions: Vec<_> = scored.modifications.iter().map(|s| s.position).collect();
        assert!(positions.is_sorted());
        let fixed: Vec<_> = scored
            .names()
            .into_iter()
            .filter(|&(name, _)| name == "Carbamidomethyl")
            .collect();
        assert_eq!(fixed, [("Carbamidomethyl", 2), ("Carbamidomethyl", 4)]);
        assert_eq!(scored.modifications.len(), 4);
    }

    #[test]
    fn ties_go_to_the_first_predecessor() {
        let mut graph = graph(&OXIDATION_CATALOG, "MM", Direction::Forward);
        let oxidised = graph.final_combinations().nth(1).unwrap();
        graph.set_sink(oxidised).unwrap();

        // Every path scores the same, so the first predecessor recorded (the oxidised edge out of the unmodified
        // node) wins
        let scored = graph.score_and_modifications(&ConstantScorer(1.0));
        assert_eq!(scored.score, 2.0);
        assert_eq!(scored.names(), [("Oxidation", 2)]);
    }

    #[test]
    fn only_ancestors_of_the_sink_are_scored() {
        let mut graph = graph(&OXIDATION_CATALOG, "MGM", Direction::Forward);
        graph.set_sink(CombinationSpace::base()).unwrap();
        let scorer = CountingScorer(Cell::new(0));
        graph.score(&scorer);
        assert_eq!(scorer.0.get(), 3);

        let oxidised = graph.final_combinations().nth(1).unwrap();
        graph.set_sink(oxidised).unwrap();
        let scorer = CountingScorer(Cell::new(0));
        graph.score(&scorer);
        // Layers are {}, {Ox} | {}, {Ox} | {Ox}
        assert_eq!(scorer.0.get(), 5);
    }

    #[test]
    fn non_finite_scores_are_propagated() {
        let mut graph = graph(&OXIDATION_CATALOG, "AMG", Direction::Forward);
        graph.set_sink(CombinationSpace::base()).unwrap();
        assert!(graph.score(&ConstantScorer(f64::NAN)).is_nan());
        assert_eq!(graph.score(&ConstantScorer(f64::INFINITY)), f64::INFINITY);
    }

    static OXIDISED_M: LazyLock<ChemicalComposition<'static>> =
        LazyLock::new(|| composition("C5H9NO2S"));

    // Scores 1 everywhere, except for a negative NaN on an oxidised methionine prefix
    fn negative_nan_on_oxidised_m(prefix: &ChemicalComposition<'_>, _suffix: &ChemicalComposition<'_>) -> f64 {
        if *prefix == *OXIDISED_M { -f64::NAN } else { 1.0 }
    }

    #[test]
    fn negative_nans_are_propagated() {
        let mut graph = graph(&OXIDATION_CATALOG, "MM", Direction::Forward);
        let oxidised = graph
            .final_combinations()
            .find(|&c| graph.combinations().combination(c).len() == 1)
            .unwrap();
        graph.set_sink(oxidised).unwrap();

        // The unmodified first residue reaches the sink with a score of 2, but the NaN path must win
        assert!(graph.score(&negative_nan_on_oxidised_m).is_nan());
        let scored = graph.score_and_modifications(&negative_nan_on_oxidised_m);
        assert!(scored.score.is_nan());
        assert_eq!(scored.names(), [("Oxidation", 1)]);
    }

    #[test]
    fn empty_graphs_score_nothing() {
        let mut graph = graph(&OXIDATION_CATALOG, "", Direction::Forward);
        graph.set_sink(CombinationSpace::base()).unwrap();
        let scored = graph.score_and_modifications(&wobbly);
        assert_eq!(scored.score, 0.0);
        assert!(scored.modifications.is_empty());
    }

    #[test]
    #[should_panic(expected = "a sink must be set")]
    fn scoring_without_a_sink() {
        let graph = graph(&OXIDATION_CATALOG, "ACDK", Direction::Forward);
        graph.score(&wobbly);
    }

    #[test]
    fn scores_agree_with_best_paths() {
        for direction in [Direction::Forward, Direction::Reverse] {
            for sequence in ["SCMCS", "MSMSM", "CAMS", "SSS"] {
                let mut graph = graph(&MIXED_CATALOG, sequence, direction);
                let sinks: Vec<_> = graph.final_combinations().collect();
                for sink in sinks {
                    graph.set_sink(sink).unwrap();
                    let scored = graph.score_and_modifications(&wobbly);
                    assert_eq!(scored.score.to_bits(), graph.score(&wobbly).to_bits());

                    // The reported modifications rebuild the sink's composition from the bare residues
                    let mut rebuilt: ChemicalComposition = sequence
                        .chars()
                        .map(|r| &CHEMISTRY_DB.residues[&r].composition)
                        .sum();
                    for site in &scored.modifications {
                        rebuilt += &site.modification.delta;
                    }
                    assert_eq!(&rebuilt, graph.sink_composition().unwrap());
                }
            }
        }
    }

    // Exhaustive Cross-Check ==========================================================================================

    // Tries every legal placement of variable modifications, returning the best score for each final combination.
    // Forward searches score every non-empty prefix, and reverse searches every non-empty suffix.
    fn brute_force(
        catalog: &ModificationCatalog<'_>,
        sequence: &str,
        direction: Direction,
        scorer: impl Fn(&ChemicalComposition<'_>, &ChemicalComposition<'_>) -> f64,
    ) -> Vec<(Vec<ModificationId>, f64)> {
        let residues: Vec<_> = sequence.chars().collect();
        let located: Vec<_> = residues
            .iter()
            .enumerate()
            .map(|(i, &r)| catalog.residue(r, Location::of_position(i, residues.len(), PEPTIDE)).unwrap())
            .collect();

        let mut placements: Vec<Vec<Option<ModificationId>>> = vec![Vec::new()];
        for residue in &located {
            let options: Vec<_> = std::iter::once(None)
                .chain(residue.variable_modifications.iter().copied().map(Some))
                .collect();
            placements = placements
                .into_iter()
                .flat_map(|placement| {
                    options.iter().map(move |&option| {
                        let mut placement = placement.clone();
                        placement.push(option);
                        placement
                    })
                })
                .filter(|p| p.iter().flatten().count() <= catalog.max_variable_modifications())
                .collect();
        }

        let mut best: Vec<(Vec<ModificationId>, f64)> = Vec::new();
        for placement in placements {
            let mut modified: Vec<_> = located.iter().zip(&placement).collect();
            if direction == Direction::Reverse {
                modified.reverse();
            }
            let partials: Vec<ChemicalComposition> = modified
                .into_iter()
                .scan(ChemicalComposition::default(), |partial, (residue, modification)| {
                    *partial += &residue.composition;
                    if let Some(id) = modification {
                        *partial += &catalog.modification(*id).delta;
                    }
                    Some(partial.clone())
                })
                .collect();
            let total = partials.last().cloned().unwrap_or_default();
            let score: f64 = partials
                .iter()
                .map(|partial| {
                    let rest = &total - partial;
                    match direction {
                        Direction::Forward => scorer(partial, &rest),
                        Direction::Reverse => scorer(&rest, partial),
                    }
                })
                .sum();

            let mut combination: Vec<_> = placement.into_iter().flatten().collect();
            combination.sort_unstable();
            match best.iter_mut().find(|(c, _)| *c == combination) {
                Some((_, s)) => *s = s.max(score),
                None => best.push((combination, score)),
            }
        }
        best
    }

    #[test]
    fn exhaustive_cross_check() {
        for capacity in 0..=2 {
            let catalog = catalog(
                &SearchSettings::with_capacity(capacity)
                    .fix("Carbamidomethyl")
                    .vary("Oxidation")
                    .vary("Phospho"),
            );
            for direction in [Direction::Forward, Direction::Reverse] {
                for sequence in ["MSCSMK", "SMS", "CCMM", "GSDMAS", "M", "AGDK"] {
                    let mut graph =
                        SequenceGraph::from_sequence(&catalog, sequence, PEPTIDE, direction).unwrap();
                    let expected = brute_force(&catalog, sequence, direction, wobbly);
                    let sinks: Vec<CombinationIndex> = graph.final_combinations().collect();
                    assert_eq!(sinks.len(), expected.len());

                    for sink in sinks {
                        let combination =
                            graph.combinations().combination(sink).modifications().to_vec();
                        let (_, best) = expected.iter().find(|(c, _)| *c == combination).unwrap();
                        graph.set_sink(sink).unwrap();
                        assert_float_absolute_eq!(graph.score(&wobbly), *best, 1e-9);
                    }
                }
            }
        }
    }
}
