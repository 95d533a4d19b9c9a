// Standard Library Imports
use std::cmp::Ordering;

// External Crate Imports
use polychem::ChemicalComposition;

/// Scores how well a split of a peptide into `prefix` (N-terminal) and `suffix` (C-terminal) fragments is supported
/// by the observed data
///
/// Any `Fn(&ChemicalComposition, &ChemicalComposition) -> f64` is a `FragmentScorer`.
pub trait FragmentScorer {
    fn score(&self, prefix: &ChemicalComposition<'_>, suffix: &ChemicalComposition<'_>) -> f64;
}

impl<F> FragmentScorer for F
where
    F: Fn(&ChemicalComposition<'_>, &ChemicalComposition<'_>) -> f64,
{
    fn score(&self, prefix: &ChemicalComposition<'_>, suffix: &ChemicalComposition<'_>) -> f64 {
        self(prefix, suffix)
    }
}

/// Orders scores so that a NaN (of either sign) outranks every number and ties with any other NaN
pub(crate) fn rank_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Only a strictly better score displaces the current best, so the first of several tied scores is kept
pub(crate) fn outranks(score: f64, best: f64) -> bool {
    rank_scores(score, best).is_gt()
}

// Module Tests ========================================================================================================
