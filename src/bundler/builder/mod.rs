//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that drives the
//! MSI pipeline and reports the resulting artifact.
//!
//! # Overview
//!
//! The bundler:
//! 1. Reads configuration from [`Settings`](crate::bundler::Settings)
//! 2. Builds the application with cargo
//! 3. Delegates to the MSI platform module
//! 4. Calculates size and checksum of the package
//! 5. Returns a [`BundledArtifact`](crate::bundler::BundledArtifact)
//!
//! # Module Organization
//!
//! - [`cargo`] - `cargo build` invocation
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`tool_detection`] - External tool availability checking

pub mod cargo;
pub mod checksum;
mod orchestrator;
pub mod tool_detection;

pub use orchestrator::Bundler;
