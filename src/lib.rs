//! Machine census over a front-end repo's mock data: extract machine records
//! from three differently-shaped sources, reconcile them by identity key,
//! and tally categories.

pub mod census;
pub mod cli;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod report;
pub mod sources;
pub mod tally;

pub use error::{CensusError, Result};
