//! Core domain types for the NEON_CORE boot sequence.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod ids;
mod script;

pub use ids::{StyleTag, SurfaceId};
pub use script::{InvalidScriptError, Script, ScriptLine, ScriptStep, Steps};
