//! Overarching parameters for monitored activities
//!
//! An [`OverarchingParameter`] stores the base planning inputs of one
//! activity alongside the metrics derived from them. Derived metrics are only
//! ever produced by the feasibility calculator, so a record built from inputs
//! is always consistent; edits go through [`OverarchingParameter::replan`].

use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::feasibility::{
    derive_metrics, DerivedMetrics, FeasibilityRatio, ParameterDraft, PlanningInputs,
};
use crate::error::{Error, Result};

/// Unique identifier for a parameter record
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRef,
    Display
))]
pub struct ParameterId(Uuid);

impl ParameterId {
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

impl Default for ParameterId {
    fn default() -> Self {
        Self::generate()
    }
}

/// Country strategic plan activity number (opaque)
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct CspActivityNumber(String);

/// Field office responsible for the activity
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct FieldOffice(String);

/// Months an operation runs
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct OperationDuration(u32);

/// Risk tier; lower tiers require more frequent visits
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct RiskLevel(u32);

/// Total sites under an activity
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct NumberOfSites(u32);

/// Program activity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    GeneralFoodAssistance,
    CashBasedTransfers,
    Nutrition,
    SchoolFeeding,
    FoodAssistanceForAssets,
    Livelihoods,
    CapacityStrengthening,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 7] = [
        ActivityCategory::GeneralFoodAssistance,
        ActivityCategory::CashBasedTransfers,
        ActivityCategory::Nutrition,
        ActivityCategory::SchoolFeeding,
        ActivityCategory::FoodAssistanceForAssets,
        ActivityCategory::Livelihoods,
        ActivityCategory::CapacityStrengthening,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::GeneralFoodAssistance => "general_food_assistance",
            ActivityCategory::CashBasedTransfers => "cash_based_transfers",
            ActivityCategory::Nutrition => "nutrition",
            ActivityCategory::SchoolFeeding => "school_feeding",
            ActivityCategory::FoodAssistanceForAssets => "food_assistance_for_assets",
            ActivityCategory::Livelihoods => "livelihoods",
            ActivityCategory::CapacityStrengthening => "capacity_strengthening",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::invalid_input(format!("activity_category: {s}")))
    }
}

/// Descriptive fields of an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub csp_activity_number: CspActivityNumber,
    pub field_office: FieldOffice,
    pub activity_category: ActivityCategory,
}

impl ActivityDetails {
    pub fn parse(
        csp_activity_number: impl Into<String>,
        field_office: impl Into<String>,
        activity_category: ActivityCategory,
    ) -> Result<Self> {
        Ok(Self {
            csp_activity_number: CspActivityNumber::try_new(csp_activity_number.into())
                .map_err(|_| Error::invalid_input("csp_activity_number"))?,
            field_office: FieldOffice::try_new(field_office.into())
                .map_err(|_| Error::invalid_input("field_office"))?,
            activity_category,
        })
    }
}

/// Raw create/edit payload from the parameters form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterForm {
    pub csp_activity_number: String,
    pub field_office: String,
    pub activity_category: ActivityCategory,
    #[serde(flatten)]
    pub draft: ParameterDraft,
}

impl ParameterForm {
    pub fn details(&self) -> Result<ActivityDetails> {
        ActivityDetails::parse(
            self.csp_activity_number.as_str(),
            self.field_office.as_str(),
            self.activity_category,
        )
    }
}

/// A stored parameter record with its derived planning metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverarchingParameter {
    id: ParameterId,
    #[serde(flatten)]
    details: ActivityDetails,
    operation_duration: OperationDuration,
    number_of_sites: NumberOfSites,
    risk_level: RiskLevel,
    minimum_required_interval: u32,
    targeted_number_of_sites: u32,
    feasible_number_of_sites: u32,
    adjusted_required_interval: u32,
    feasibility_ratio: FeasibilityRatio,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OverarchingParameter {
    /// Build a new record, computing its derived metrics
    pub fn plan(
        id: ParameterId,
        details: ActivityDetails,
        inputs: PlanningInputs,
        now: DateTime<Utc>,
    ) -> Self {
        let derived = derive_metrics(&inputs);
        Self {
            id,
            details,
            operation_duration: inputs.operation_duration,
            number_of_sites: inputs.number_of_sites,
            risk_level: inputs.risk_level,
            minimum_required_interval: derived.minimum_required_interval,
            targeted_number_of_sites: derived.targeted_number_of_sites,
            feasible_number_of_sites: derived.feasible_number_of_sites,
            adjusted_required_interval: derived.adjusted_required_interval,
            feasibility_ratio: derived.feasibility_ratio,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replacement record for an edit; keeps identity and creation time
    pub fn replan(&self, details: ActivityDetails, inputs: PlanningInputs, now: DateTime<Utc>) -> Self {
        Self {
            created_at: self.created_at,
            ..Self::plan(self.id, details, inputs, now)
        }
    }

    /// Rebuild a record exactly as it was stored, without recomputing
    pub(crate) fn from_stored(
        id: ParameterId,
        details: ActivityDetails,
        inputs: PlanningInputs,
        derived: StoredMetrics,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            operation_duration: inputs.operation_duration,
            number_of_sites: inputs.number_of_sites,
            risk_level: inputs.risk_level,
            minimum_required_interval: derived.minimum_required_interval,
            targeted_number_of_sites: derived.targeted_number_of_sites,
            feasible_number_of_sites: derived.feasible_number_of_sites,
            adjusted_required_interval: derived.adjusted_required_interval,
            feasibility_ratio: derived.feasibility_ratio,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ParameterId {
        self.id
    }

    pub fn details(&self) -> &ActivityDetails {
        &self.details
    }

    pub fn csp_activity_number(&self) -> &CspActivityNumber {
        &self.details.csp_activity_number
    }

    pub fn field_office(&self) -> &FieldOffice {
        &self.details.field_office
    }

    pub fn activity_category(&self) -> ActivityCategory {
        self.details.activity_category
    }

    pub fn operation_duration(&self) -> OperationDuration {
        self.operation_duration
    }

    pub fn number_of_sites(&self) -> NumberOfSites {
        self.number_of_sites
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn minimum_required_interval(&self) -> u32 {
        self.minimum_required_interval
    }

    pub fn targeted_number_of_sites(&self) -> u32 {
        self.targeted_number_of_sites
    }

    pub fn feasible_number_of_sites(&self) -> u32 {
        self.feasible_number_of_sites
    }

    pub fn adjusted_required_interval(&self) -> u32 {
        self.adjusted_required_interval
    }

    pub fn feasibility_ratio(&self) -> FeasibilityRatio {
        self.feasibility_ratio
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Base inputs as they would be fed back to the calculator
    pub fn planning_inputs(&self) -> PlanningInputs {
        PlanningInputs {
            operation_duration: self.operation_duration,
            risk_level: self.risk_level,
            number_of_sites: self.number_of_sites,
            feasible_number_of_sites: Some(self.feasible_number_of_sites),
        }
    }

    /// Base inputs in form shape, for pre-filling an edit
    pub fn to_form(&self) -> ParameterForm {
        ParameterForm {
            csp_activity_number: self.details.csp_activity_number.to_string(),
            field_office: self.details.field_office.to_string(),
            activity_category: self.details.activity_category,
            draft: self.planning_inputs().to_draft(),
        }
    }

    /// True if the stored metrics match a fresh computation
    pub fn is_consistent(&self) -> bool {
        let derived = derive_metrics(&self.planning_inputs());
        StoredMetrics::from(derived) == self.stored_metrics()
    }

    pub fn stored_metrics(&self) -> StoredMetrics {
        StoredMetrics {
            minimum_required_interval: self.minimum_required_interval,
            targeted_number_of_sites: self.targeted_number_of_sites,
            feasible_number_of_sites: self.feasible_number_of_sites,
            feasibility_ratio: self.feasibility_ratio,
            adjusted_required_interval: self.adjusted_required_interval,
        }
    }
}

/// The five derived fields persisted with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMetrics {
    pub minimum_required_interval: u32,
    pub targeted_number_of_sites: u32,
    pub feasible_number_of_sites: u32,
    pub feasibility_ratio: FeasibilityRatio,
    pub adjusted_required_interval: u32,
}

impl From<DerivedMetrics> for StoredMetrics {
    fn from(derived: DerivedMetrics) -> Self {
        Self {
            minimum_required_interval: derived.minimum_required_interval,
            targeted_number_of_sites: derived.targeted_number_of_sites,
            feasible_number_of_sites: derived.feasible_number_of_sites,
            feasibility_ratio: derived.feasibility_ratio,
            adjusted_required_interval: derived.adjusted_required_interval,
        }
    }
}
