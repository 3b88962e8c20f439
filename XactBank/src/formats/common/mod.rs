//! Binary reading helpers shared by the format decoders

pub mod cursor;

pub use cursor::BinaryCursor;
