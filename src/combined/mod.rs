//! The combined workload: mass create, directory-listing cross-check and
//! mass delete over one generated file set.

pub mod mask;
pub mod runner;

pub use mask::{MaskError, OperationMask};
pub use runner::{file_set, missing_from_listing, CombinedRunner};
