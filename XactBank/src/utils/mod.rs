//! Utility functions

pub mod hash;
pub mod path;

pub use hash::fcs16;
pub use path::normalize_separators;
