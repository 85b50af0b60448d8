pub mod calculations;
pub mod models;

pub use calculations::{TaxEngine, TaxEngineError, ValidatedInputs};
pub use models::*;
