//! Shared helpers for filesystem, network and process work.

pub mod archive;
pub mod command;
pub mod fs;
pub mod http;
