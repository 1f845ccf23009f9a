//! Project parameter structures and input loading

mod data;
pub mod loader;

pub use data::{Development, ProjectParameters, SoftCosts, StagedBuild, Unit, MAX_PROJECT_MONTHS};
pub use loader::{load_parameters, load_units, load_units_from_reader, parse_parameters, with_units};
