//! Domain types and planning logic
//!
//! This module contains the overarching parameter entity, its validated
//! value types, and the feasibility calculator that derives visit plans.

pub mod config_types;
pub mod feasibility;
pub mod fixtures;
pub mod parameters;
pub mod validation_constants;

pub use feasibility::*;
pub use parameters::*;
