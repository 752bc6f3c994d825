//! Windows installer creation.

pub mod msi;
pub mod sign;
