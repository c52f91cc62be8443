//! PostgreSQL parameter repository
//!
//! Rows live in `overarching_parameters` (see `migrations/`). Derived columns
//! are written exactly as computed and read back without recomputation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    application::parameter_store::ParameterRepository,
    domain::{
        ActivityDetails, FeasibilityRatio, NumberOfSites, OperationDuration,
        OverarchingParameter, ParameterId, PlanningInputs, RiskLevel, StoredMetrics,
    },
    error::{Error, Result},
    infrastructure::database::Database,
};

const SELECT_COLUMNS: &str = "SELECT id, csp_activity_number, field_office, activity_category, \
     operation_duration, number_of_sites, risk_level, minimum_required_interval, \
     targeted_number_of_sites, feasible_number_of_sites, adjusted_required_interval, \
     feasibility_ratio, created_at, updated_at FROM overarching_parameters";

#[derive(Debug, FromRow)]
struct ParameterRow {
    id: Uuid,
    csp_activity_number: String,
    field_office: String,
    activity_category: String,
    operation_duration: i64,
    number_of_sites: i64,
    risk_level: i64,
    minimum_required_interval: i64,
    targeted_number_of_sites: i64,
    feasible_number_of_sites: i64,
    adjusted_required_interval: i64,
    feasibility_ratio: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn stored_u32(column: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::application(format!("stored {column} out of range: {value}")))
}

fn stored_invalid(column: &str) -> Error {
    Error::application(format!("stored {column} is invalid"))
}

impl ParameterRow {
    fn into_record(self) -> Result<OverarchingParameter> {
        let details = ActivityDetails::parse(
            self.csp_activity_number,
            self.field_office,
            self.activity_category.parse()?,
        )?;
        let inputs = PlanningInputs {
            operation_duration: OperationDuration::try_new(stored_u32(
                "operation_duration",
                self.operation_duration,
            )?)
            .map_err(|_| stored_invalid("operation_duration"))?,
            risk_level: RiskLevel::try_new(stored_u32("risk_level", self.risk_level)?)
                .map_err(|_| stored_invalid("risk_level"))?,
            number_of_sites: NumberOfSites::try_new(stored_u32(
                "number_of_sites",
                self.number_of_sites,
            )?)
            .map_err(|_| stored_invalid("number_of_sites"))?,
            feasible_number_of_sites: Some(stored_u32(
                "feasible_number_of_sites",
                self.feasible_number_of_sites,
            )?),
        };
        let metrics = StoredMetrics {
            minimum_required_interval: stored_u32(
                "minimum_required_interval",
                self.minimum_required_interval,
            )?,
            targeted_number_of_sites: stored_u32(
                "targeted_number_of_sites",
                self.targeted_number_of_sites,
            )?,
            feasible_number_of_sites: stored_u32(
                "feasible_number_of_sites",
                self.feasible_number_of_sites,
            )?,
            feasibility_ratio: FeasibilityRatio::from_decimal(self.feasibility_ratio),
            adjusted_required_interval: stored_u32(
                "adjusted_required_interval",
                self.adjusted_required_interval,
            )?,
        };

        Ok(OverarchingParameter::from_stored(
            ParameterId::new(self.id),
            details,
            inputs,
            metrics,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Parameter repository backed by PostgreSQL
#[derive(Clone)]
pub struct PostgresParameterRepository {
    database: Database,
}

impl PostgresParameterRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ParameterRepository for PostgresParameterRepository {
    #[instrument(skip(self))]
    async fn get(&self, id: ParameterId) -> Result<Option<OverarchingParameter>> {
        let row = sqlx::query_as::<_, ParameterRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.into_inner())
            .fetch_optional(self.database.pool())
            .await?;
        row.map(ParameterRow::into_record).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<OverarchingParameter>> {
        sqlx::query_as::<_, ParameterRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(self.database.pool())
            .await?
            .into_iter()
            .map(ParameterRow::into_record)
            .collect()
    }

    #[instrument(skip(self, record), fields(id = %record.id()))]
    async fn create(&self, record: OverarchingParameter) -> Result<OverarchingParameter> {
        let metrics = record.stored_metrics();
        let result = sqlx::query(
            "INSERT INTO overarching_parameters (id, csp_activity_number, field_office, \
             activity_category, operation_duration, number_of_sites, risk_level, \
             minimum_required_interval, targeted_number_of_sites, feasible_number_of_sites, \
             adjusted_required_interval, feasibility_ratio, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(record.id().into_inner())
        .bind(record.csp_activity_number().to_string())
        .bind(record.field_office().to_string())
        .bind(record.activity_category().as_str())
        .bind(i64::from(record.operation_duration().into_inner()))
        .bind(i64::from(record.number_of_sites().into_inner()))
        .bind(i64::from(record.risk_level().into_inner()))
        .bind(i64::from(metrics.minimum_required_interval))
        .bind(i64::from(metrics.targeted_number_of_sites))
        .bind(i64::from(metrics.feasible_number_of_sites))
        .bind(i64::from(metrics.adjusted_required_interval))
        .bind(metrics.feasibility_ratio.as_decimal())
        .bind(record.created_at())
        .bind(record.updated_at())
        .execute(self.database.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::conflict(format!("parameter {}", record.id())));
        }
        Ok(record)
    }

    #[instrument(skip(self, record), fields(id = %record.id()))]
    async fn update(&self, record: OverarchingParameter) -> Result<OverarchingParameter> {
        let metrics = record.stored_metrics();
        let result = sqlx::query(
            "UPDATE overarching_parameters SET csp_activity_number = $2, field_office = $3, \
             activity_category = $4, operation_duration = $5, number_of_sites = $6, \
             risk_level = $7, minimum_required_interval = $8, targeted_number_of_sites = $9, \
             feasible_number_of_sites = $10, adjusted_required_interval = $11, \
             feasibility_ratio = $12, created_at = $13, updated_at = $14 WHERE id = $1",
        )
        .bind(record.id().into_inner())
        .bind(record.csp_activity_number().to_string())
        .bind(record.field_office().to_string())
        .bind(record.activity_category().as_str())
        .bind(i64::from(record.operation_duration().into_inner()))
        .bind(i64::from(record.number_of_sites().into_inner()))
        .bind(i64::from(record.risk_level().into_inner()))
        .bind(i64::from(metrics.minimum_required_interval))
        .bind(i64::from(metrics.targeted_number_of_sites))
        .bind(i64::from(metrics.feasible_number_of_sites))
        .bind(i64::from(metrics.adjusted_required_interval))
        .bind(metrics.feasibility_ratio.as_decimal())
        .bind(record.created_at())
        .bind(record.updated_at())
        .execute(self.database.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("parameter {}", record.id())));
        }
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ParameterId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM overarching_parameters WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.database.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
