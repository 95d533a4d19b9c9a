// External Crate Imports
use rust_decimal::{Decimal, prelude::ToPrimitive};

// Local Crate Imports
use crate::{AverageMass, MonoisotopicMass};

// Public API ==========================================================================================================

macro_rules! mass_impls {
    ($($mass_type:ident),+ $(,)?) => {
        $(
            impl $mass_type {
                /// Lossy conversion for downstream floating-point work, like matching fragment m/z values
                pub fn to_f64(self) -> f64 {
                    // NOTE: `Decimal` has a much smaller range than `f64`, so this conversion can't actually fail
                    self.0.to_f64().unwrap_or(f64::NAN)
                }

                pub fn round_dp(self, decimal_points: u32) -> Decimal {
                    self.0.round_dp(decimal_points)
                }
            }

            impl From<$mass_type> for f64 {
                fn from(value: $mass_type) -> Self {
                    value.to_f64()
                }
            }
        )+
    };
}

mass_impls!(MonoisotopicMass, AverageMass);

/// The inclusive bounds of the window within `ppm` parts-per-million of `value`
#[must_use]
pub fn ppm_bounds(value: f64, ppm: f64) -> (f64, f64) {
    let width = value * ppm / 1e6;
    (value - width, value + width)
}

// Module Tests ========================================================================================================
