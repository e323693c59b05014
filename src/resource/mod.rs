//! Resources read during rendering.

pub mod file;
