// Standard Library Imports
use std::{
    collections::btree_map::Entry,
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

// External Crate Imports
use rust_decimal::Decimal;

// Local Crate Imports
use crate::{
    AtomicDatabase, AverageMass, ChemicalComposition, Element, Massive, MonoisotopicMass, Result,
    parsers::{chemical_composition, errors::final_parser},
};

// Public API ==========================================================================================================

impl<'a> ChemicalComposition<'a> {
    pub fn new(db: &'a AtomicDatabase, formula: impl AsRef<str>) -> Result<Self> {
        let mut parser = final_parser(chemical_composition(db));
        parser(formula.as_ref()).map_err(|e| Box::new(e.into()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chemical_formula.is_empty()
    }

    /// Iterates over elements (in Hill order) and their non-zero counts
    pub fn iter(&self) -> impl Iterator<Item = (Element<'a>, i32)> + '_ {
        self.chemical_formula.iter().map(|(&e, &c)| (e, c))
    }

    pub(crate) fn from_counts(counts: Vec<(Element<'a>, i32)>) -> Self {
        let mut composition = Self::default();
        for (element, count) in counts {
            composition.offset_element(element, count);
        }
        composition
    }
}

// Arithmetic Trait Implementations ====================================================================================

impl<'a> AddAssign<&ChemicalComposition<'a>> for ChemicalComposition<'a> {
    fn add_assign(&mut self, rhs: &ChemicalComposition<'a>) {
        self.offset(rhs, 1);
    }
}

impl<'a> SubAssign<&ChemicalComposition<'a>> for ChemicalComposition<'a> {
    fn sub_assign(&mut self, rhs: &ChemicalComposition<'a>) {
        self.offset(rhs, -1);
    }
}

impl<'a> Add for ChemicalComposition<'a> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}

impl<'a> Add for &ChemicalComposition<'a> {
    type Output = ChemicalComposition<'a>;

    fn add(self, rhs: Self) -> Self::Output {
        let mut sum = self.clone();
        sum += rhs;
        sum
    }
}

impl<'a> Sub for ChemicalComposition<'a> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self::Output {
        self -= &rhs;
        self
    }
}

impl<'a> Sub for &ChemicalComposition<'a> {
    type Output = ChemicalComposition<'a>;

    fn sub(self, rhs: Self) -> Self::Output {
        let mut difference = self.clone();
        difference -= rhs;
        difference
    }
}

impl Neg for ChemicalComposition<'_> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for count in self.chemical_formula.values_mut() {
            *count = -*count;
        }
        self
    }
}

impl Mul<i32> for ChemicalComposition<'_> {
    type Output = Self;

    fn mul(mut self, rhs: i32) -> Self::Output {
        if rhs == 0 {
            self.chemical_formula.clear();
        } else {
            for count in self.chemical_formula.values_mut() {
                *count *= rhs;
            }
        }
        self
    }
}

impl<'a, 'c> Sum<&'c ChemicalComposition<'a>> for ChemicalComposition<'a> {
    fn sum<I: Iterator<Item = &'c ChemicalComposition<'a>>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut sum, composition| {
            sum += composition;
            sum
        })
    }
}

// Massive Trait Implementation ========================================================================================

impl Massive for ChemicalComposition<'_> {
    fn monoisotopic_mass(&self) -> MonoisotopicMass {
        MonoisotopicMass(self.mass(|e| e.monoisotopic_mass().0))
    }

    fn average_mass(&self) -> AverageMass {
        AverageMass(self.mass(|e| e.average_mass().0))
    }

    fn nominal_mass(&self) -> i64 {
        self.iter()
            .map(|(element, count)| i64::from(count) * element.nominal_mass())
            .sum()
    }
}

// Display Trait Implementation ========================================================================================

impl Display for ChemicalComposition<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (element, count) in self.iter() {
            if count == 1 {
                write!(f, "{element}")?;
            } else {
                write!(f, "{element}{count}")?;
            }
        }
        Ok(())
    }
}

// Private Helper Methods ==============================================================================================

impl<'a> ChemicalComposition<'a> {
    fn offset(&mut self, other: &Self, multiplier: i32) {
        for (&element, &count) in &other.chemical_formula {
            self.offset_element(element, count * multiplier);
        }
    }

    fn offset_element(&mut self, element: Element<'a>, count: i32) {
        match self.chemical_formula.entry(element) {
            Entry::Occupied(mut e) => {
                *e.get_mut() += count;
                if *e.get() == 0 {
                    e.remove();
                }
            }
            Entry::Vacant(e) => {
                if count != 0 {
                    e.insert(count);
                }
            }
        }
    }

    fn mass(&self, accessor: impl Fn(&Element<'a>) -> Decimal) -> Decimal {
        self.chemical_formula
            .iter()
            .map(|(element, &count)| Decimal::from(count) * accessor(element))
            .sum()
    }
}

// Module Tests ========================================================================================================
