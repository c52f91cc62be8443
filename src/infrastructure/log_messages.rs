//! Log message constants for infrastructure components
//!
//! This module centralizes the log messages used by the application,
//! repository and database layers so wording stays consistent.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting field monitoring application";
    pub const STARTED_SUCCESSFULLY: &str = "Application started successfully";
    pub const CONNECTING_TO_DATABASE: &str = "Connecting to database";
    pub const REPOSITORY_SELECTED: &str = "Parameter repository selected";
    pub const SEEDING_FIXTURES: &str = "Seeding fixture parameter records";
    pub const SEEDING_SKIPPED: &str = "Repository already holds parameter records; fixtures not seeded";
    pub const REPORT_READY: &str = "Parameter report ready";
}

/// Database-related log messages
pub mod database {
    pub const HEALTH_CHECK_FAILED: &str = "Database health check failed";
    pub const CONNECTION_ESTABLISHED: &str = "Database connection established";
    pub const MIGRATION_STARTED: &str = "Running database migrations";
    pub const MIGRATION_COMPLETED: &str = "Database migrations completed successfully";
}

/// Parameter service and repository messages
pub mod parameters {
    pub const PREVIEW_NOT_COMPUTED: &str = "Planning draft incomplete; derived fields not computed";
    pub const CREATED: &str = "Parameter record created";
    pub const UPDATED: &str = "Parameter record replaced";
    pub const DELETED: &str = "Parameter record deleted";
    pub const DELETE_MISSING: &str = "Delete requested for unknown parameter record";
    pub const REJECTED: &str = "Parameter input rejected";
    pub const SHORTFALL: &str = "Feasible sites fall short of the targeted sites";
    pub const SIMULATED_LATENCY: &str = "Applying simulated repository latency";
}
