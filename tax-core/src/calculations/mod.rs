//! Tax calculations for Greek freelancers.
//!
//! [`engine`] holds the step-by-step calculation; [`common`] the rounding
//! helpers it shares with report code.

pub mod common;
pub mod engine;

pub use engine::{EfkaContributions, TaxEngine, TaxEngineError, ValidatedInputs};
