//! Gate applicability: decides APPLICABLE / NOT_APPLICABLE from codebase
//! characteristics before any pattern work is done.

pub mod filter;
pub mod types;

pub use filter::ApplicabilityFilter;
pub use types::*;
