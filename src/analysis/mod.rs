//! Analysis modules.
//!
//! Grouping of parsed records by thread count and the statistics
//! derived from those groups.

pub mod aggregator;

pub use aggregator::*;
