use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

use rust_decimal::Decimal;

use crate::{AverageMass, Element, Isotope, MassNumber, Massive, MonoisotopicMass};

use super::{
    atomic_database::{AtomicDatabase, ElementDescription},
    errors::AtomicLookupError,
};

impl<'a> Element<'a> {
    pub(crate) fn new(
        db: &'a AtomicDatabase,
        symbol: impl AsRef<str>,
    ) -> Result<Self, AtomicLookupError> {
        Self::lookup(db, symbol, None)
    }

    pub(crate) fn new_isotope(
        db: &'a AtomicDatabase,
        symbol: impl AsRef<str>,
        mass_number: MassNumber,
    ) -> Result<Self, AtomicLookupError> {
        Self::lookup(db, symbol, Some(mass_number))
    }

    pub const fn symbol(&self) -> &'a str {
        self.symbol
    }

    pub const fn name(&self) -> &'a str {
        self.name
    }

    pub const fn mass_number(&self) -> Option<MassNumber> {
        self.mass_number
    }

    fn lookup(
        db: &'a AtomicDatabase,
        symbol: impl AsRef<str>,
        mass_number: Option<MassNumber>,
    ) -> Result<Self, AtomicLookupError> {
        let symbol = symbol.as_ref();
        let (symbol, ElementDescription { name, isotopes }) = db
            .elements
            .get_key_value(symbol)
            .ok_or_else(|| AtomicLookupError::element(symbol))?;

        let element = Self {
            symbol,
            name,
            mass_number,
            isotopes,
        };

        element.validate_isotopes()
    }

    fn validate_isotopes(self) -> Result<Self, AtomicLookupError> {
        let Self {
            symbol,
            name,
            mass_number,
            isotopes,
        } = self;

        if let Some(mass_number) = mass_number {
            if !isotopes.contains_key(&mass_number) {
                return Err(AtomicLookupError::isotope(
                    symbol,
                    mass_number,
                    name,
                    isotopes,
                ));
            }
        } else if self.most_abundant_isotope().is_none() {
            // NOTE: Database validation guarantees at least one isotope per element
            let lightest = isotopes.keys().next().copied();
            if let Some(lightest) = lightest {
                return Err(AtomicLookupError::abundance(
                    symbol, name, lightest, isotopes,
                ));
            }
        }

        Ok(self)
    }

    fn most_abundant_isotope(&self) -> Option<(&'a MassNumber, &'a Isotope)> {
        self.isotopes
            .iter()
            .filter(|(_, i)| i.abundance.is_some())
            .max_by_key(|(_, i)| i.abundance)
    }

    fn representative_isotope(&self) -> (MassNumber, Isotope) {
        let (&mass_number, &isotope) = self
            .mass_number
            .and_then(|a| self.isotopes.get_key_value(&a))
            .or_else(|| self.most_abundant_isotope())
            // SAFETY: `validate_isotopes()` ensures that one of the above lookups succeeds
            .unwrap();
        (mass_number, isotope)
    }

    // Hill ordering: carbon, then hydrogen, then everything else alphabetically
    fn hill_key(&self) -> (u8, &'a str, Option<MassNumber>) {
        let rank = match self.symbol {
            "C" => 0,
            "H" => 1,
            _ => 2,
        };
        (rank, self.symbol, self.mass_number)
    }
}

// Display, Ordering and Hash Trait Implementations ====================================================================

impl Display for Element<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = self.symbol;
        if let Some(mass_number) = self.mass_number {
            write!(f, "[{mass_number}{symbol}]")
        } else {
            write!(f, "{symbol}")
        }
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hill_key() == other.hill_key()
    }
}

impl Eq for Element<'_> {}

impl PartialOrd for Element<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hill_key().cmp(&other.hill_key())
    }
}

impl Hash for Element<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.mass_number.hash(state);
    }
}

// Massive Trait Implementation ========================================================================================

impl Massive for Element<'_> {
    fn monoisotopic_mass(&self) -> MonoisotopicMass {
        MonoisotopicMass(self.representative_isotope().1.relative_mass)
    }

    fn average_mass(&self) -> AverageMass {
        if self.mass_number.is_some() {
            return AverageMass(self.representative_isotope().1.relative_mass);
        }

        let mass: Decimal = self
            .isotopes
            .values()
            .filter_map(|i| i.abundance.map(|abundance| i.relative_mass * abundance))
            .sum();
        AverageMass(mass)
    }

    fn nominal_mass(&self) -> i64 {
        self.representative_isotope().0.into()
    }
}

// Module Tests ========================================================================================================
