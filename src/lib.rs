//! Field Monitoring - site-visit planning for monitored activities
//!
//! Each activity carries a handful of planning inputs (operation duration,
//! risk level, site count and optionally a feasible site count). The
//! feasibility calculator derives visit intervals, per-cycle site targets and
//! a feasibility ratio from them, and the parameter service keeps those
//! derived values consistent with the stored inputs.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::Application;
pub use error::{Error, Result};
