pub mod atomic_database;
mod chemical_composition;
mod element;
pub mod errors;
mod mass;
mod mass_number;

pub use mass::ppm_bounds;
