//! Site-visit planning and feasibility calculation
//!
//! Derives how often sites under an activity must be visited and how far the
//! realistic visiting capacity falls short of that. The pipeline is pure and
//! deterministic:
//!
//! 1. minimum required interval = `max(1, ceil(duration / max(risk, 1)))`
//! 2. targeted sites per cycle = `ceil(sites / interval)`
//! 3. feasible sites default to the targeted count
//! 4. feasibility ratio = `feasible / targeted`, two decimal places
//! 5. minimum required frequency = `ceil(duration / interval)`
//! 6. adjusted frequency = `ceil(frequency * ratio)`
//! 7. adjusted interval = `max(1, ceil(duration / adjusted frequency))`
//!
//! A draft missing any of duration, risk level or site count is never
//! computed; it comes back untouched as [`Computation::NotComputed`].

use derive_more::Display;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::parameters::{NumberOfSites, OperationDuration, RiskLevel};
use crate::domain::validation_constants::feasibility::{
    INTERVAL_FLOOR_MONTHS, RATIO_DECIMAL_PLACES, RISK_LEVEL_FLOOR,
};

/// Planning inputs of a draft, used to label missing and out-of-range values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PlanningField {
    #[display("operation_duration")]
    OperationDuration,
    #[display("risk_level")]
    RiskLevel,
    #[display("number_of_sites")]
    NumberOfSites,
    #[display("feasible_number_of_sites")]
    FeasibleNumberOfSites,
}

/// Precondition failures for a complete draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeasibilityError {
    #[error("operation duration must be positive, got {0}")]
    NonPositiveDuration(i64),

    #[error("risk level must be positive, got {0}")]
    NonPositiveRiskLevel(i64),

    #[error("number of sites must be positive, got {0}")]
    NonPositiveSiteCount(i64),

    #[error("feasible number of sites cannot be negative, got {0}")]
    NegativeFeasibleSites(i64),

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: PlanningField, value: i64 },
}

/// Partially filled planning inputs, as edited in the parameters form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDraft {
    pub operation_duration: Option<i64>,
    pub risk_level: Option<i64>,
    pub number_of_sites: Option<i64>,
    pub feasible_number_of_sites: Option<i64>,
}

impl ParameterDraft {
    pub fn new(operation_duration: i64, risk_level: i64, number_of_sites: i64) -> Self {
        Self {
            operation_duration: Some(operation_duration),
            risk_level: Some(risk_level),
            number_of_sites: Some(number_of_sites),
            feasible_number_of_sites: None,
        }
    }

    pub fn with_feasible_sites(mut self, feasible_number_of_sites: i64) -> Self {
        self.feasible_number_of_sites = Some(feasible_number_of_sites);
        self
    }

    /// Required fields that are still absent, in form order
    pub fn missing_fields(&self) -> Vec<PlanningField> {
        [
            (self.operation_duration, PlanningField::OperationDuration),
            (self.risk_level, PlanningField::RiskLevel),
            (self.number_of_sites, PlanningField::NumberOfSites),
        ]
        .into_iter()
        .filter_map(|(value, field)| value.is_none().then_some(field))
        .collect()
    }

    /// Split the draft into incomplete vs validated complete inputs
    ///
    /// Values are only validated once every required field is present.
    pub fn classify(&self) -> Result<Completeness, FeasibilityError> {
        let (Some(duration), Some(risk), Some(sites)) =
            (self.operation_duration, self.risk_level, self.number_of_sites)
        else {
            return Ok(Completeness::Incomplete {
                missing: self.missing_fields(),
            });
        };

        let operation_duration =
            OperationDuration::try_new(non_negative_u32(duration, PlanningField::OperationDuration)?)
                .map_err(|_| FeasibilityError::NonPositiveDuration(duration))?;
        let risk_level = RiskLevel::try_new(non_negative_u32(risk, PlanningField::RiskLevel)?)
            .map_err(|_| FeasibilityError::NonPositiveRiskLevel(risk))?;
        let number_of_sites =
            NumberOfSites::try_new(non_negative_u32(sites, PlanningField::NumberOfSites)?)
                .map_err(|_| FeasibilityError::NonPositiveSiteCount(sites))?;
        let feasible_number_of_sites = self
            .feasible_number_of_sites
            .map(|feasible| {
                if feasible < 0 {
                    return Err(FeasibilityError::NegativeFeasibleSites(feasible));
                }
                to_u32(feasible, PlanningField::FeasibleNumberOfSites)
            })
            .transpose()?;

        Ok(Completeness::Complete(PlanningInputs {
            operation_duration,
            risk_level,
            number_of_sites,
            feasible_number_of_sites,
        }))
    }
}

// Negative values collapse to zero so the positivity check on the value type
// reports them with the original input
fn non_negative_u32(value: i64, field: PlanningField) -> Result<u32, FeasibilityError> {
    to_u32(value.max(0), field)
}

fn to_u32(value: i64, field: PlanningField) -> Result<u32, FeasibilityError> {
    u32::try_from(value).map_err(|_| FeasibilityError::OutOfRange { field, value })
}

/// Whether a draft carries enough to run the calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    Incomplete { missing: Vec<PlanningField> },
    Complete(PlanningInputs),
}

/// Validated inputs for one activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningInputs {
    pub operation_duration: OperationDuration,
    pub risk_level: RiskLevel,
    pub number_of_sites: NumberOfSites,
    pub feasible_number_of_sites: Option<u32>,
}

impl PlanningInputs {
    /// Back to the raw form representation
    pub fn to_draft(&self) -> ParameterDraft {
        ParameterDraft {
            operation_duration: Some(i64::from(self.operation_duration.into_inner())),
            risk_level: Some(i64::from(self.risk_level.into_inner())),
            number_of_sites: Some(i64::from(self.number_of_sites.into_inner())),
            feasible_number_of_sites: self.feasible_number_of_sites.map(i64::from),
        }
    }
}

/// Ratio of feasible to targeted sites, kept at two decimal places
///
/// Rounded half away from zero. Exact decimal arithmetic keeps values such as
/// `0.77` exact when they are multiplied back into a frequency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
pub struct FeasibilityRatio(Decimal);

impl FeasibilityRatio {
    /// Ratio when capacity matches the target exactly
    pub fn full() -> Self {
        Self::from_decimal(Decimal::ONE)
    }

    /// `feasible / targeted`, or full when nothing is targeted
    pub fn of(feasible: u32, targeted: u32) -> Self {
        if targeted == 0 {
            return Self::full();
        }
        Self::from_decimal(Decimal::from(feasible) / Decimal::from(targeted))
    }

    /// Round an arbitrary decimal into a ratio
    pub fn from_decimal(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(RATIO_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(RATIO_DECIMAL_PLACES);
        Self(rounded)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Capacity cannot cover the targeted sites
    pub fn is_shortfall(&self) -> bool {
        self.0 < Decimal::ONE
    }
}

/// The five persisted derived metrics plus the intermediate frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub minimum_required_interval: u32,
    pub targeted_number_of_sites: u32,
    pub feasible_number_of_sites: u32,
    pub feasibility_ratio: FeasibilityRatio,
    pub adjusted_required_interval: u32,
    #[serde(skip)]
    pub minimum_required_frequency: u32,
    #[serde(skip)]
    pub adjusted_required_frequency: u64,
}

/// Outcome of [`compute_derived`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Computation {
    /// Required inputs were missing; the draft is returned as given
    NotComputed(ParameterDraft),
    Computed {
        inputs: PlanningInputs,
        derived: DerivedMetrics,
    },
}

impl Computation {
    pub fn is_computed(&self) -> bool {
        matches!(self, Computation::Computed { .. })
    }

    pub fn derived(&self) -> Option<&DerivedMetrics> {
        match self {
            Computation::NotComputed(_) => None,
            Computation::Computed { derived, .. } => Some(derived),
        }
    }
}

/// `max(floor, ceil(numerator / denominator))`, or `floor` when the
/// denominator is zero
pub fn safe_divide_ceil(numerator: u64, denominator: u64, floor: u64) -> u64 {
    if denominator == 0 {
        return floor;
    }
    numerator.div_ceil(denominator).max(floor)
}

/// Run the calculation if the draft is complete
pub fn compute_derived(draft: ParameterDraft) -> Result<Computation, FeasibilityError> {
    match draft.classify()? {
        Completeness::Incomplete { .. } => Ok(Computation::NotComputed(draft)),
        Completeness::Complete(inputs) => Ok(Computation::Computed {
            derived: derive_metrics(&inputs),
            inputs,
        }),
    }
}

/// The planning pipeline over validated inputs
pub fn derive_metrics(inputs: &PlanningInputs) -> DerivedMetrics {
    let duration = u64::from(inputs.operation_duration.into_inner());
    let risk = u64::from(inputs.risk_level.into_inner()).max(RISK_LEVEL_FLOOR);
    let sites = u64::from(inputs.number_of_sites.into_inner());

    let minimum_required_interval = safe_divide_ceil(duration, risk, INTERVAL_FLOOR_MONTHS);
    let targeted_number_of_sites = safe_divide_ceil(sites, minimum_required_interval, 0);
    let targeted = saturate_u32(targeted_number_of_sites);
    let feasible = inputs.feasible_number_of_sites.unwrap_or(targeted);
    let feasibility_ratio = FeasibilityRatio::of(feasible, targeted);

    let minimum_required_frequency = safe_divide_ceil(duration, minimum_required_interval, 0);
    let adjusted_required_frequency = (Decimal::from(minimum_required_frequency)
        * feasibility_ratio.as_decimal())
    .ceil()
    .to_u64()
    .unwrap_or(u64::MAX);
    let adjusted_required_interval =
        safe_divide_ceil(duration, adjusted_required_frequency, INTERVAL_FLOOR_MONTHS);

    DerivedMetrics {
        minimum_required_interval: saturate_u32(minimum_required_interval),
        targeted_number_of_sites: targeted,
        feasible_number_of_sites: feasible,
        feasibility_ratio,
        adjusted_required_interval: saturate_u32(adjusted_required_interval),
        minimum_required_frequency: saturate_u32(minimum_required_frequency),
        adjusted_required_frequency,
    }
}

// Every derived count is bounded by a u32 input
fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
