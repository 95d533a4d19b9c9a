use std::num::NonZeroU32;

use crate::MassNumber;

impl MassNumber {
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }
}

impl From<MassNumber> for u32 {
    fn from(value: MassNumber) -> Self {
        value.0.get()
    }
}

impl From<MassNumber> for i64 {
    fn from(value: MassNumber) -> Self {
        value.0.get().into()
    }
}
