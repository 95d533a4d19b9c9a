use std::sync::LazyLock;

use indoc::indoc;
use polychem::{AtomicDatabase, ChemicalComposition};

use crate::{ChemistryDatabase, ModificationCatalog, SearchSettings};

pub static ATOMIC_DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

pub static CHEMISTRY_DB: LazyLock<ChemistryDatabase<'static>> =
    LazyLock::new(|| ChemistryDatabase::new(&ATOMIC_DB, "test_chemistry.kdl", TEST_KDL).unwrap());

const TEST_KDL: &str = indoc! {r#"
    residues {
        A "Alanine" "C3H5NO"
        C "Cysteine" "C3H5NOS"
        D "Aspartic Acid" "C4H5NO3"
        G "Glycine" "C2H3NO"
        K "Lysine" "C6H12N2O"
        M "Methionine" "C5H9NOS"
        S "Serine" "C3H5NO2"
    }
    modifications {
        Oxidation "Oxidation or Hydroxylation" {
            delta "O"
            targeting "C"
            targeting "M"
        }
        Phospho "Phosphorylation" {
            delta "HO3P"
            targeting "S"
        }
        Carbamidomethyl "Iodoacetamide derivative" {
            delta "H3C2NO"
            targeting "C"
        }
        Acetyl "Acetylation" {
            delta "H2C2O"
            targeting "K"
            targeting "*" at="protein-n-term"
        }
        Amidated "Amidation" {
            delta "HNO-1"
            targeting "*" at="protein-c-term"
        }
    }
"#};

pub fn catalog(settings: &SearchSettings) -> ModificationCatalog<'static> {
    ModificationCatalog::new(&CHEMISTRY_DB, settings).unwrap()
}

pub fn composition(formula: &str) -> ChemicalComposition<'static> {
    ChemicalComposition::new(&ATOMIC_DB, formula).unwrap()
}
