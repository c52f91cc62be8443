//! Infrastructure layer for field monitoring
//!
//! This module contains the implementations for external concerns like
//! database access and the parameter repositories.

pub mod database;
pub mod log_messages;
pub mod memory_store;
pub mod postgres_store;

pub use database::*;
pub use memory_store::{InMemoryParameterRepository, SimulatedLatency};
pub use postgres_store::PostgresParameterRepository;
