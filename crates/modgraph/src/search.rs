// Standard Library Imports
use std::sync::atomic::{AtomicBool, Ordering};

// External Crate Imports
use polychem::{Massive, MonoisotopicMass, ppm_bounds};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

// Local Crate Imports
use crate::{
    Direction, FragmentScorer, ModificationCatalog, SequenceGraph, Termini,
    scorer::{outranks, rank_scores},
};

/// A peptide sequence to be searched
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Candidate {
    pub sequence: String,
    pub termini: Termini,
}

/// The best explanation found for one candidate
#[derive(Clone, PartialEq, Debug)]
pub struct PeptideMatch {
    pub sequence: String,
    pub score: f64,
    /// The monoisotopic mass of the modified peptide, including terminal water
    pub neutral_mass: MonoisotopicMass,
    /// Modification names and their 1-based positions, in sequence order
    pub modifications: Vec<(String, usize)>,
}

/// Searches candidate sequences for modified forms matching a precursor mass
#[derive(Copy, Clone, Debug)]
pub struct PeptideSearch<'s, 'a> {
    catalog: &'s ModificationCatalog<'a>,
    precursor_mass: f64,
    ppm_tolerance: f64,
    direction: Direction,
    cancel: Option<&'s AtomicBool>,
}

impl Candidate {
    #[must_use]
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            termini: Termini::default(),
        }
    }

    #[must_use]
    pub fn with_termini(mut self, termini: Termini) -> Self {
        self.termini = termini;
        self
    }
}

impl<'s, 'a> PeptideSearch<'s, 'a> {
    #[must_use]
    pub const fn new(
        catalog: &'s ModificationCatalog<'a>,
        precursor_mass: f64,
        ppm_tolerance: f64,
    ) -> Self {
        Self {
            catalog,
            precursor_mass,
            ppm_tolerance,
            direction: Direction::Forward,
            cancel: None,
        }
    }

    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Candidates that haven't started by the time `flag` is set are skipped
    #[must_use]
    pub const fn cancel_on(mut self, flag: &'s AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Scores every candidate in parallel, returning their best matches from highest to lowest score
    ///
    /// Candidates that contain unknown residues, or that can't be modified to within tolerance of the precursor mass,
    /// produce no match. Equal scores keep the order in which their candidates were given.
    #[instrument(skip_all, fields(precursor_mass = self.precursor_mass, ppm = self.ppm_tolerance))]
    pub fn run<I>(&self, candidates: I, scorer: &(impl FragmentScorer + Sync)) -> Vec<PeptideMatch>
    where
        I: IntoParallelIterator<Item = Candidate>,
    {
        let mut matches: Vec<_> = candidates
            .into_par_iter()
            .filter_map(|candidate| self.search_candidate(candidate, scorer))
            .collect();
        matches.sort_by(|a, b| rank_scores(b.score, a.score));

        info!(matches = matches.len(), "finished peptide search");
        matches
    }

    fn search_candidate(
        &self,
        candidate: Candidate,
        scorer: &impl FragmentScorer,
    ) -> Option<PeptideMatch> {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return None;
        }

        let mut graph = match SequenceGraph::from_sequence(
            self.catalog,
            &candidate.sequence,
            candidate.termini,
            self.direction,
        ) {
            Ok(graph) => graph,
            Err(error) => {
                debug!(sequence = candidate.sequence.as_str(), %error, "skipping candidate");
                return None;
            }
        };

        let water = self.catalog.water().monoisotopic_mass();
        let sinks: Vec<_> = graph
            .final_combinations()
            .filter_map(|sink| {
                let neutral_mass = graph.composition(graph.len(), sink)?.monoisotopic_mass() + water;
                self.within_tolerance(neutral_mass).then_some((sink, neutral_mass))
            })
            .collect();

        let mut best: Option<PeptideMatch> = None;
        for (sink, neutral_mass) in sinks {
            graph.set_sink(sink).ok()?;
            let scored = graph.score_and_modifications(scorer);
            if best.as_ref().is_none_or(|b| outranks(scored.score, b.score)) {
                best = Some(PeptideMatch {
                    sequence: candidate.sequence.clone(),
                    score: scored.score,
                    neutral_mass,
                    modifications: scored
                        .names()
                        .into_iter()
                        .map(|(name, position)| (name.to_owned(), position))
                        .collect(),
                });
            }
        }
        best
    }

    fn within_tolerance(&self, mass: MonoisotopicMass) -> bool {
        let (low, high) = ppm_bounds(self.precursor_mass, self.ppm_tolerance);
        (low..=high).contains(&mass.to_f64())
    }
}

// Module Tests ========================================================================================================
