//! Application services and business logic orchestration
//!
//! This module contains application services that coordinate
//! domain logic and infrastructure components.

pub mod app;
pub mod parameter_service;
pub mod parameter_store;
pub mod reporting;

pub use app::Application;
pub use parameter_service::ParameterService;
pub use parameter_store::ParameterRepository;
pub use reporting::{ParameterReport, ParameterReportRow, ReportSummary};
