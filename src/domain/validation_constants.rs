//! Validation constants for domain types
//!
//! This module centralizes the limits and fixed numbers used by the
//! parameter types and the feasibility calculator.

/// CSP activity number validation constants
pub mod csp_activity_number {
    /// Maximum activity number length
    pub const MAX_LENGTH: usize = 64;
}

/// Field office validation constants
pub mod field_office {
    /// Maximum field office name length
    pub const MAX_LENGTH: usize = 128;
}

/// Feasibility calculation constants
pub mod feasibility {
    /// Decimal places kept on the feasibility ratio
    pub const RATIO_DECIMAL_PLACES: u32 = 2;

    /// Shortest interval, in months, a plan may ever report
    pub const INTERVAL_FLOOR_MONTHS: u64 = 1;

    /// Smallest risk level used as a divisor
    pub const RISK_LEVEL_FLOOR: u64 = 1;
}

/// Simulated repository latency constants
pub mod latency {
    /// Default fixed delay applied by the in-memory repository (milliseconds)
    pub const DEFAULT_BASE_MS: u64 = 0;

    /// Default random jitter added on top of the base delay (milliseconds)
    pub const DEFAULT_JITTER_MS: u64 = 0;
}

/// Test run size constants
pub mod test_runs {
    /// Default number of property test iterations
    pub const DEFAULT_PROPTEST_CASES: u32 = 256;
}
