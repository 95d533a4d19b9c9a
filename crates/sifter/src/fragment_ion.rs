// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// Local Crate Imports
use crate::{FragmentIon, IonKind};

// Public API ==========================================================================================================

impl FragmentIon {
    #[must_use]
    pub const fn kind(&self) -> IonKind {
        self.kind
    }

    #[must_use]
    pub const fn mz(&self) -> f64 {
        self.mz
    }
}

impl Display for FragmentIon {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-ion ({:.4} m/z)", self.kind, self.mz)
    }
}

// Module Tests ========================================================================================================
