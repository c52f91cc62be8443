use crate::domain::feasibility::{FeasibilityError, PlanningField};
use thiserror::Error;

/// Field monitoring error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid planning parameters: {0}")]
    Feasibility(#[from] FeasibilityError),

    #[error("Incomplete planning parameters, missing: {}", join_fields(.missing))]
    IncompleteParameters { missing: Vec<PlanningField> },

    #[error("Invalid input: {field}")]
    InvalidInput { field: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Already exists: {resource}")]
    Conflict { resource: String },

    #[error("Application error: {message}")]
    Application { message: String },
}

fn join_fields(fields: &[PlanningField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
